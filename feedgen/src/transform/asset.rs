//! Output asset construction

use rand::Rng;

use feedgen_common::feed::{
    AdvisoryRating, AssetContent, AssetImage, AssetType, AvailabilityInfo, FeedDefaults,
    LocalizedText, OutputAsset, PlayOption,
};

use crate::models::RawRecord;
use crate::transform::description::Descriptions;
use crate::transform::duration::DurationPolicy;

/// Per-record values computed by the other transform steps
#[derive(Debug, Clone)]
pub struct AssetInputs {
    pub advisories: Vec<AdvisoryRating>,
    pub genres: Vec<String>,
    pub descriptions: Descriptions,
    pub images: Vec<AssetImage>,
}

/// Assembles one `OutputAsset` from a record and its computed parts
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    defaults: FeedDefaults,
    durations: DurationPolicy,
}

impl AssetBuilder {
    pub fn new(defaults: FeedDefaults, durations: DurationPolicy) -> Self {
        Self { defaults, durations }
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        record: &RawRecord,
        inputs: AssetInputs,
        rng: &mut R,
    ) -> OutputAsset {
        let lang = self.defaults.default_language.as_str();
        let id = record.id_or_empty().to_string();

        OutputAsset {
            id: id.clone(),
            asset_type: asset_type(record),
            titles: vec![LocalizedText::new(record.title_or_empty(), lang)],
            short_descriptions: vec![LocalizedText::new(inputs.descriptions.short, lang)],
            long_descriptions: vec![LocalizedText::new(inputs.descriptions.long, lang)],
            release_date: record.release_date(),
            genres: inputs.genres,
            advisory_ratings: inputs.advisories,
            images: inputs.images,
            duration_in_seconds: self
                .durations
                .resolve(record.duration_secs, record.is_live_stream, rng),
            content: AssetContent {
                play_options: vec![PlayOption {
                    license: self.defaults.license.clone(),
                    quality: self.defaults.quality.clone(),
                    play_id: id,
                    availability_start_time: self.defaults.availability_start_time.clone(),
                    availability_end_time: self.defaults.availability_end_time.clone(),
                    availability_info: AvailabilityInfo {
                        country: self.defaults.availability_countries.clone(),
                    },
                }],
            },
        }
    }
}

/// Source label lower-cased; without one, live streams are `live` and the rest `movie`
fn asset_type(record: &RawRecord) -> AssetType {
    match record.content_type.as_deref() {
        Some(label) => AssetType::from_label(label),
        None if record.is_live_stream => AssetType::Live,
        None => AssetType::Movie,
    }
}
