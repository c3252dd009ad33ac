//! Feed document assembly

use feedgen_common::feed::{Feed, FeedDefaults, OutputAsset};

/// Wrap already-filtered assets in the feed envelope
///
/// Asset order is kept. Assets are not re-validated here.
pub fn assemble(defaults: &FeedDefaults, assets: Vec<OutputAsset>) -> Feed {
    Feed {
        version: defaults.version.clone(),
        provider_name: defaults.provider_name.clone(),
        default_language: defaults.default_language.clone(),
        default_availability_countries: defaults.availability_countries.clone(),
        assets,
    }
}
