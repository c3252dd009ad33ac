//! Content rating → advisory rating lookup

use std::collections::BTreeMap;

use feedgen_common::config::default_rating_table;
use feedgen_common::feed::AdvisoryRating;

/// Rating authority attached to every advisory entry
pub const ADVISORY_SOURCE: &str = "USA_PR";

/// Exact-match lookup table (case- and punctuation-sensitive)
#[derive(Debug, Clone)]
pub struct RatingMapper {
    table: BTreeMap<String, String>,
}

impl RatingMapper {
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    /// Advisory list for a rating code: one entry if the code is known, else empty
    pub fn map(&self, code: Option<&str>) -> Vec<AdvisoryRating> {
        code.and_then(|c| self.table.get(c))
            .map(|value| AdvisoryRating {
                source: ADVISORY_SOURCE.to_string(),
                value: value.clone(),
            })
            .into_iter()
            .collect()
    }
}

impl Default for RatingMapper {
    fn default() -> Self {
        Self::new(default_rating_table())
    }
}
