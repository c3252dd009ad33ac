//! Raw content records as delivered by the source
//!
//! The content API is loosely typed: numbers arrive as strings, flags as
//! strings, genres as objects or plain names, and `null` shows up anywhere.
//! Decoding accepts all of these; a value of the wrong kind becomes "absent"
//! instead of failing the record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use feedgen_common::time;

/// One content item from the source, immutable once fetched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "_id", default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,

    #[serde(rename = "shortDescription", default, deserialize_with = "lenient::opt_string")]
    pub short_description: Option<String>,

    #[serde(rename = "longDescription", default, deserialize_with = "lenient::opt_string")]
    pub long_description: Option<String>,

    #[serde(rename = "createdAt", default, deserialize_with = "lenient::created_at")]
    pub created_at: Option<CreatedAt>,

    /// Content rating code (e.g. "PG-13")
    #[serde(rename = "ageRating", default, deserialize_with = "lenient::opt_string")]
    pub rating: Option<String>,

    /// Duration in seconds
    #[serde(rename = "duration", default, deserialize_with = "lenient::opt_seconds")]
    pub duration_secs: Option<f64>,

    #[serde(rename = "isLiveStream", default, deserialize_with = "lenient::flag")]
    pub is_live_stream: bool,

    #[serde(rename = "genres", default, deserialize_with = "lenient::genre_tags")]
    pub genre_tags: Vec<String>,

    #[serde(rename = "landscapeThumbnail", default, deserialize_with = "lenient::thumbnail_url")]
    pub thumbnail_url: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub content_type: Option<String>,
}

impl RawRecord {
    /// Identifier, or empty string when the source has none
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Release date as `YYYY-MM-DD`, or empty string
    pub fn release_date(&self) -> String {
        match &self.created_at {
            None => String::new(),
            Some(created) => match created.release_date() {
                Some(date) => date,
                None => {
                    tracing::warn!(
                        record_id = %self.id_or_empty(),
                        created_at = ?created,
                        "Unparseable creation timestamp, leaving release date empty"
                    );
                    String::new()
                }
            },
        }
    }
}

/// Creation timestamp in either of the shapes the source uses
#[derive(Debug, Clone, PartialEq)]
pub enum CreatedAt {
    Text(String),
    EpochMillis(i64),
}

impl CreatedAt {
    pub fn release_date(&self) -> Option<String> {
        match self {
            CreatedAt::Text(text) => time::release_date_from_text(text),
            CreatedAt::EpochMillis(ms) => time::release_date_from_millis(*ms),
        }
    }
}

/// Records decoded from a source payload
#[derive(Debug, Clone, Default)]
pub struct FetchedRecords {
    pub records: Vec<RawRecord>,
    /// Payload entries that were not record objects at all
    pub undecodable: usize,
}

/// Decode payload entries one by one; a bad entry is skipped, not fatal
pub fn decode_records(values: Vec<Value>) -> FetchedRecords {
    let mut fetched = FetchedRecords::default();
    for (index, value) in values.into_iter().enumerate() {
        // Arrays would otherwise decode positionally into an all-default record
        if !value.is_object() {
            tracing::warn!(index, "Skipping record that is not a JSON object");
            fetched.undecodable += 1;
            continue;
        }
        match serde_json::from_value::<RawRecord>(value) {
            Ok(record) => fetched.records.push(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping undecodable record");
                fetched.undecodable += 1;
            }
        }
    }
    fetched
}

/// Deserializers for loosely typed source fields
pub(crate) mod lenient {
    use super::*;

    fn non_empty(s: String) -> Option<String> {
        if s.trim().is_empty() {
            None
        } else {
            Some(s)
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => non_empty(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn opt_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let secs = match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(secs.filter(|v| v.is_finite() && *v >= 0.0))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
            _ => false,
        })
    }

    pub fn genre_tags<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(tags_from_value(Value::deserialize(d)?))
    }

    pub(crate) fn tags_from_value(value: Value) -> Vec<String> {
        let names: Vec<String> = match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Object(mut obj) => match obj.remove("name") {
                        Some(Value::String(s)) => Some(s),
                        _ => None,
                    },
                    _ => None,
                })
                .collect(),
            Value::String(s) => s.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };

        names
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn thumbnail_url<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => non_empty(s),
            Value::Object(mut obj) => match obj.remove("url") {
                Some(Value::String(s)) => non_empty(s),
                _ => None,
            },
            _ => None,
        })
    }

    pub fn created_at<'de, D: Deserializer<'de>>(d: D) -> Result<Option<CreatedAt>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => non_empty(s).map(CreatedAt::Text),
            Value::Number(n) => n.as_i64().map(CreatedAt::EpochMillis),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_api_record() {
        let record: RawRecord = serde_json::from_value(json!({
            "_id": "66a1",
            "title": "Zoo Safari",
            "shortDescription": "",
            "longDescription": null,
            "createdAt": "2024-05-01T12:30:00.000Z",
            "ageRating": "PG-13",
            "duration": "45",
            "isLiveStream": false,
            "genres": [{ "name": "Documentary" }, "Travel", { "id": 3 }],
            "landscapeThumbnail": { "url": "https://cdn.example.com/zoo.jpg" },
            "type": "Movie",
            "unknownField": { "nested": true }
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("66a1"));
        assert_eq!(record.short_description, None);
        assert_eq!(record.long_description, None);
        assert_eq!(record.duration_secs, Some(45.0));
        assert_eq!(record.genre_tags, vec!["Documentary", "Travel"]);
        assert_eq!(record.thumbnail_url.as_deref(), Some("https://cdn.example.com/zoo.jpg"));
        assert_eq!(record.release_date(), "2024-05-01");
    }

    #[test]
    fn test_missing_fields_default() {
        let record: RawRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record, RawRecord::default());
        assert_eq!(record.id_or_empty(), "");
        assert_eq!(record.release_date(), "");
    }

    #[test]
    fn test_lenient_scalars() {
        let record: RawRecord = serde_json::from_value(json!({
            "_id": 42,
            "createdAt": 1_709_251_199_999i64,
            "duration": -5,
            "isLiveStream": "true",
            "genres": "Kids, Music ,"
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.release_date(), "2024-02-29");
        assert_eq!(record.duration_secs, None);
        assert!(record.is_live_stream);
        assert_eq!(record.genre_tags, vec!["Kids", "Music"]);
    }

    #[test]
    fn test_unparseable_timestamp_gives_empty_date() {
        let record = RawRecord {
            created_at: Some(CreatedAt::Text("someday".to_string())),
            ..Default::default()
        };
        assert_eq!(record.release_date(), "");
    }

    #[test]
    fn test_decode_records_skips_non_objects() {
        let fetched = decode_records(vec![json!({"_id": "a"}), json!("oops"), json!({"_id": "b"})]);
        assert_eq!(fetched.records.len(), 2);
        assert_eq!(fetched.undecodable, 1);
        assert_eq!(fetched.records[1].id.as_deref(), Some("b"));
    }

    #[test]
    fn test_decode_records_counts_arrays_and_null() {
        let fetched = decode_records(vec![json!([]), json!(["a", "t"]), json!(null), json!({})]);
        assert_eq!(fetched.records.len(), 1);
        assert_eq!(fetched.undecodable, 3);
    }
}
