//! Feed document schema
//!
//! Types describing the generated streaming-platform feed. Field names follow
//! the platform's JSON schema (camelCase). Every list-valued field always
//! serializes, even when empty, so consumers can rely on the key existing.

use serde::{Deserialize, Serialize};

// ============================================================================
// Top-level document
// ============================================================================

/// Top-level feed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    /// Schema version tag (e.g. "1")
    pub version: String,
    /// Provider display name, only emitted when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Default language tag for all assets (e.g. "en")
    pub default_language: String,
    /// Default availability country codes
    #[serde(default)]
    pub default_availability_countries: Vec<String>,
    /// Assets, in source order
    #[serde(default)]
    pub assets: Vec<OutputAsset>,
}

/// Feed-level defaults applied by the feed assembler and the asset builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDefaults {
    pub version: String,
    pub provider_name: Option<String>,
    pub default_language: String,
    pub availability_countries: Vec<String>,
    pub license: String,
    pub quality: String,
    pub availability_start_time: Option<String>,
    pub availability_end_time: Option<String>,
}

impl Default for FeedDefaults {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            provider_name: None,
            default_language: "en".to_string(),
            availability_countries: vec!["us".to_string(), "mx".to_string()],
            license: "free".to_string(),
            quality: "hd".to_string(),
            availability_start_time: Some("2024-01-01T00:00:00Z".to_string()),
            availability_end_time: None,
        }
    }
}

// ============================================================================
// Assets
// ============================================================================

/// One transformed content record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default)]
    pub titles: Vec<LocalizedText>,
    #[serde(default)]
    pub short_descriptions: Vec<LocalizedText>,
    #[serde(default)]
    pub long_descriptions: Vec<LocalizedText>,
    /// `YYYY-MM-DD`, or empty when the source has no creation timestamp
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub advisory_ratings: Vec<AdvisoryRating>,
    #[serde(default)]
    pub images: Vec<AssetImage>,
    pub duration_in_seconds: u64,
    pub content: AssetContent,
}

/// Asset type label
///
/// Known labels get their own variant; anything else from the source is kept
/// verbatim (lower-cased).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetType {
    Movie,
    Shortform,
    Live,
    Other(String),
}

impl AssetType {
    /// Parse a raw source label (case-insensitive, surrounding whitespace ignored)
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "movie" => AssetType::Movie,
            "shortform" => AssetType::Shortform,
            "live" => AssetType::Live,
            _ => AssetType::Other(lower),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetType::Movie => "movie",
            AssetType::Shortform => "shortform",
            AssetType::Live => "live",
            AssetType::Other(s) => s,
        }
    }
}

impl From<String> for AssetType {
    fn from(s: String) -> Self {
        AssetType::from_label(&s)
    }
}

impl From<AssetType> for String {
    fn from(t: AssetType) -> Self {
        t.as_str().to_string()
    }
}

/// Text value tagged with the languages it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub value: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl LocalizedText {
    pub fn new(value: impl Into<String>, language: &str) -> Self {
        Self {
            value: value.into(),
            languages: vec![language.to_string()],
        }
    }
}

/// Content-maturity label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRating {
    /// Rating authority (always "USA_PR" for ratings produced here)
    pub source: String,
    pub value: String,
}

/// Artwork reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetImage {
    /// Image role, e.g. "main"
    #[serde(rename = "type")]
    pub image_type: String,
    pub url: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl AssetImage {
    pub fn main(url: impl Into<String>, language: &str) -> Self {
        Self {
            image_type: "main".to_string(),
            url: url.into(),
            languages: vec![language.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetContent {
    #[serde(default)]
    pub play_options: Vec<PlayOption>,
}

/// License, quality and availability for playing an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOption {
    pub license: String,
    pub quality: String,
    pub play_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_end_time: Option<String>,
    pub availability_info: AvailabilityInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityInfo {
    #[serde(default)]
    pub country: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_asset() -> OutputAsset {
        OutputAsset {
            id: "abc".to_string(),
            asset_type: AssetType::Shortform,
            titles: vec![LocalizedText::new("Zoo Safari", "en")],
            short_descriptions: vec![LocalizedText::new("short", "en")],
            long_descriptions: vec![LocalizedText::new("long", "en")],
            release_date: "2024-05-01".to_string(),
            genres: vec!["Documentary".to_string()],
            advisory_ratings: vec![],
            images: vec![],
            duration_in_seconds: 4321,
            content: AssetContent {
                play_options: vec![PlayOption {
                    license: "free".to_string(),
                    quality: "hd".to_string(),
                    play_id: "abc".to_string(),
                    availability_start_time: Some("2024-01-01T00:00:00Z".to_string()),
                    availability_end_time: None,
                    availability_info: AvailabilityInfo {
                        country: vec!["us".to_string()],
                    },
                }],
            },
        }
    }

    #[test]
    fn test_empty_lists_are_serialized() {
        let json = serde_json::to_value(sample_asset()).unwrap();

        assert_eq!(json["advisoryRatings"], Value::Array(vec![]));
        assert_eq!(json["images"], Value::Array(vec![]));
        assert_eq!(json["type"], "shortform");
        assert_eq!(json["durationInSeconds"], 4321);
        assert!(json["content"]["playOptions"][0].get("availabilityEndTime").is_none());
    }

    #[test]
    fn test_feed_round_trip() {
        let feed = Feed {
            version: "1".to_string(),
            provider_name: None,
            default_language: "en".to_string(),
            default_availability_countries: vec!["us".to_string(), "mx".to_string()],
            assets: vec![sample_asset()],
        };

        let text = serde_json::to_string_pretty(&feed).unwrap();
        let parsed: Feed = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, feed);
        assert!(!text.contains("providerName"));
    }

    #[test]
    fn test_asset_type_labels() {
        assert_eq!(AssetType::from_label("Movie"), AssetType::Movie);
        assert_eq!(AssetType::from_label(" LIVE "), AssetType::Live);
        assert_eq!(
            AssetType::from_label("Episode"),
            AssetType::Other("episode".to_string())
        );
        assert_eq!(AssetType::Other("episode".to_string()).as_str(), "episode");
    }
}
