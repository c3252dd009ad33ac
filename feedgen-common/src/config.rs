//! Configuration loading and config file resolution
//!
//! One `TomlConfig` value carries every deployment choice (rating table,
//! genre keyword table, duration policy, image mode, sink settings). It is
//! loaded once at startup and shared read-only.
//!
//! Config file priority order:
//! 1. Command-line argument (highest priority)
//! 2. `FEEDGEN_CONFIG` environment variable
//! 3. `{config_dir}/feedgen/config.toml` if it exists
//! 4. Compiled defaults (fallback)
//!
//! Individual values can then be overridden from the environment
//! (see [`TomlConfig::apply_overrides`]).

use crate::feed::FeedDefaults;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FEEDGEN_CONFIG";

/// Default content API base
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://backend.castify.ai/api";

/// Default blob storage hostname (a region prefix may be added)
pub const DEFAULT_STORAGE_HOSTNAME: &str = "storage.bunnycdn.com";

/// Most genre labels an asset may carry
pub const MAX_GENRES_PER_ASSET: usize = 3;

/// Lowest duration floor the platform accepts (seconds)
pub const MIN_DURATION_FLOOR_SECS: u64 = 60;

// ============================================================================
// Top-level config
// ============================================================================

/// Complete feedgen configuration as read from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub feed: FeedConfig,
    pub pipeline: PipelineConfig,
    /// Rating code → advisory value. Empty means the built-in table.
    pub ratings: BTreeMap<String, String>,
    /// Ordered genre keyword table. Empty means the built-in table.
    pub genres: Vec<GenreRule>,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

// ============================================================================
// Sections
// ============================================================================

/// Where raw records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Content-listing REST API (bearer token)
    #[default]
    Api,
    /// Airtable-style tabular store
    Airtable,
    /// Local JSON file in the API response shape
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub base_url: String,
    /// `limit` query parameter for the content listing
    pub limit: u32,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub airtable: AirtableConfig,
    /// Input file for `kind = "file"`
    pub file: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Api,
            base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
            limit: 1000,
            api_token: None,
            timeout_secs: 30,
            airtable: AirtableConfig::default(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirtableConfig {
    pub api_url: String,
    pub base_id: Option<String>,
    pub table: Option<String>,
    pub token: Option<String>,
    pub page_size: u32,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.airtable.com/v0".to_string(),
            base_id: None,
            table: None,
            token: None,
            page_size: 100,
        }
    }
}

/// Blob storage (upload) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage region; prefixes the hostname (`{region}.storage.bunnycdn.com`)
    pub region: Option<String>,
    pub hostname: String,
    /// Full endpoint override (scheme + host), takes precedence over hostname/region
    pub endpoint: Option<String>,
    pub zone: Option<String>,
    pub api_key: Option<String>,
    /// Public CDN base the uploaded objects are served from
    pub cdn_base: Option<String>,
    /// Folder (inside the zone) feeds are written to
    pub path: String,
    /// Folder (inside the zone) re-hosted images are written to
    pub image_path: String,
    pub timeout_secs: u64,
    /// Append `_{epoch_ms}` to uploaded feed file names
    pub timestamped_filenames: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: None,
            hostname: DEFAULT_STORAGE_HOSTNAME.to_string(),
            endpoint: None,
            zone: None,
            api_key: None,
            cdn_base: None,
            path: String::new(),
            image_path: "images".to_string(),
            timeout_secs: 30,
            timestamped_filenames: false,
        }
    }
}

impl StorageConfig {
    /// Scheme + host of the storage API
    pub fn storage_endpoint(&self) -> String {
        if let Some(endpoint) = &self.endpoint {
            return endpoint.trim_end_matches('/').to_string();
        }
        match self.region.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(region) => format!("https://{}.{}", region, self.hostname),
            None => format!("https://{}", self.hostname),
        }
    }

    /// Whether zone, access key and CDN base are all present
    pub fn is_upload_configured(&self) -> bool {
        [&self.zone, &self.api_key, &self.cdn_base]
            .iter()
            .all(|v| v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false))
    }
}

/// Feed-level defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub version: String,
    pub provider_name: Option<String>,
    pub default_language: String,
    pub availability_countries: Vec<String>,
    pub license: String,
    pub quality: String,
    pub availability_start_time: Option<String>,
    pub availability_end_time: Option<String>,
    /// Platform name used in synthesized description text
    pub platform_name: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let d = FeedDefaults::default();
        Self {
            version: d.version,
            provider_name: d.provider_name,
            default_language: d.default_language,
            availability_countries: d.availability_countries,
            license: d.license,
            quality: d.quality,
            availability_start_time: d.availability_start_time,
            availability_end_time: d.availability_end_time,
            platform_name: "Roku".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn defaults(&self) -> FeedDefaults {
        FeedDefaults {
            version: self.version.clone(),
            provider_name: self.provider_name.clone(),
            default_language: self.default_language.clone(),
            availability_countries: self.availability_countries.clone(),
            license: self.license.clone(),
            quality: self.quality.clone(),
            availability_start_time: self.availability_start_time.clone(),
            availability_end_time: self.availability_end_time.clone(),
        }
    }
}

/// How keyword matches turn into genre labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenrePolicy {
    /// First genre (in table order) with a matching keyword
    #[default]
    FirstMatch,
    /// Every matching genre in table order, capped at `max_genres`
    AllMatches,
}

/// Where genre labels come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreStrategy {
    /// Keyword heuristic over title and descriptions
    #[default]
    Keywords,
    /// The record's own genre tags; keyword heuristic when it has none
    SourceTags,
}

/// What happens to a record's thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    /// Validated source URL is used unchanged
    #[default]
    Passthrough,
    /// Fetch, resize, re-encode and upload to blob storage
    Rehost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub genre_strategy: GenreStrategy,
    pub genre_policy: GenrePolicy,
    pub max_genres: usize,
    /// Fallback label for non-live records without keyword matches
    pub fallback_genre: String,
    /// Fallback label for live records without keyword matches
    pub live_fallback_genre: String,
    pub image_mode: ImageMode,
    /// Drop the whole record when its image is rejected (otherwise keep it with no images)
    pub drop_on_image_failure: bool,
    pub duration: DurationConfig,
    pub image: ImageConfig,
    pub image_retry: RetryConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            genre_strategy: GenreStrategy::Keywords,
            genre_policy: GenrePolicy::FirstMatch,
            max_genres: 3,
            fallback_genre: "Action".to_string(),
            live_fallback_genre: "News".to_string(),
            image_mode: ImageMode::Passthrough,
            drop_on_image_failure: false,
            duration: DurationConfig::default(),
            image: ImageConfig::default(),
            image_retry: RetryConfig::default(),
        }
    }
}

/// Duration defaulting policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    /// Durations below this are treated as unknown
    pub floor_secs: u64,
    /// Duration used for live streams without a valid duration
    pub live_default_secs: u64,
    /// Duration used for everything else without a valid duration
    pub non_live: NonLiveDuration,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            floor_secs: 60,
            live_default_secs: 7200,
            non_live: NonLiveDuration::Fixed { seconds: 300 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NonLiveDuration {
    Fixed { seconds: u64 },
    /// Uniform in `[min, max]` (inclusive)
    Random { min: u64, max: u64 },
}

/// Re-hosted image geometry and encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 1152,
            height: 648,
            jpeg_quality: 85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
    /// Double the delay after every failed attempt
    pub exponential: bool,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 3000,
            exponential: false,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> crate::RetryPolicy {
        use std::time::Duration;
        if self.exponential {
            crate::RetryPolicy::exponential(
                self.max_attempts,
                Duration::from_millis(self.delay_ms),
                Duration::from_millis(self.max_delay_ms),
            )
        } else {
            crate::RetryPolicy::fixed(self.max_attempts, Duration::from_millis(self.delay_ms))
        }
    }
}

/// One row of the genre keyword table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRule {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "feedgen=info,feedgen_common=info,tower_http=info".to_string(),
        }
    }
}

// ============================================================================
// Built-in tables
// ============================================================================

/// Built-in content rating → advisory rating table
pub fn default_rating_table() -> BTreeMap<String, String> {
    [
        ("G", "TVY"),
        ("PG", "TVY7"),
        ("PG-13", "TV14"),
        ("PG13", "TV14"),
        ("R", "TVMA"),
        ("NC-17", "TVMA"),
        ("NC17", "TVMA"),
        ("UR", "NR"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Built-in ordered genre keyword table
pub fn default_genre_rules() -> Vec<GenreRule> {
    let table: &[(&str, &[&str])] = &[
        ("Kids", &["kids", "cartoon", "animation", "children", "family"]),
        ("Sports", &["football", "soccer", "basketball", "tennis", "race"]),
        ("Documentary", &["documentary", "history", "wildlife", "nature"]),
        ("Travel", &["travel", "journey", "explore", "adventure"]),
        ("Music", &["music", "song", "concert"]),
        ("Food", &["food", "cooking", "recipe"]),
        ("Educational", &["learn", "education", "tutorial"]),
        ("Comedy", &["funny", "comedy", "laugh"]),
        ("Drama", &["drama", "series", "emotional"]),
        ("Horror", &["horror", "ghost", "scary"]),
        ("Romance", &["love", "romance"]),
        ("News", &["news", "headline", "report"]),
        ("Adventure", &["adventure", "exploration", "journey"]),
        ("Lifestyle", &["fashion", "style", "beauty", "trend", "culture"]),
    ];

    table
        .iter()
        .map(|(name, keywords)| GenreRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

/// Pick the config file to load, if any
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: user config directory
    dirs::config_dir()
        .map(|d| d.join("feedgen").join("config.toml"))
        .filter(|p| p.exists())
}

impl TomlConfig {
    /// Load configuration, apply environment overrides and validate.
    ///
    /// An explicitly requested file that does not exist is an error. With no
    /// file at all, compiled defaults are used.
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(cli_arg) {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Read {} failed: {}", path.display(), e))
                })?;
                info!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&content)?
            }
            None => {
                warn!("No config file found, using compiled defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text (no overrides, no validation)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("FEEDGEN_API_TOKEN") {
            self.source.api_token = Some(v);
        }
        if let Some(v) = get("FEEDGEN_SOURCE_BASE_URL") {
            self.source.base_url = v;
        }
        if let Some(v) = get("FEEDGEN_AIRTABLE_TOKEN") {
            self.source.airtable.token = Some(v);
        }
        if let Some(v) = get("FEEDGEN_STORAGE_ZONE") {
            self.storage.zone = Some(v);
        }
        if let Some(v) = get("FEEDGEN_STORAGE_API_KEY") {
            self.storage.api_key = Some(v);
        }
        if let Some(v) = get("FEEDGEN_STORAGE_REGION") {
            self.storage.region = Some(v);
        }
        if let Some(v) = get("FEEDGEN_CDN_BASE") {
            self.storage.cdn_base = Some(v);
        }
        if let Some(v) = get("FEEDGEN_STORAGE_PATH") {
            self.storage.path = v;
        }
        if let Some(v) = get("FEEDGEN_PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring FEEDGEN_PORT={}: not a port number", v),
            }
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        let d = &self.pipeline.duration;
        if d.floor_secs < MIN_DURATION_FLOOR_SECS {
            return Err(Error::Config(format!(
                "pipeline.duration.floor_secs ({}) must be at least {}",
                d.floor_secs, MIN_DURATION_FLOOR_SECS
            )));
        }
        if d.live_default_secs < d.floor_secs {
            return Err(Error::Config(format!(
                "pipeline.duration.live_default_secs ({}) is below floor_secs ({})",
                d.live_default_secs, d.floor_secs
            )));
        }
        match d.non_live {
            NonLiveDuration::Fixed { seconds } if seconds < d.floor_secs => {
                return Err(Error::Config(format!(
                    "pipeline.duration.non_live seconds ({}) is below floor_secs ({})",
                    seconds, d.floor_secs
                )));
            }
            NonLiveDuration::Random { min, max } if min > max || min < d.floor_secs => {
                return Err(Error::Config(format!(
                    "pipeline.duration.non_live range [{}, {}] must be ordered and at least floor_secs ({})",
                    min, max, d.floor_secs
                )));
            }
            _ => {}
        }

        if self.pipeline.image_retry.max_attempts == 0 {
            return Err(Error::Config(
                "pipeline.image_retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_GENRES_PER_ASSET).contains(&self.pipeline.max_genres) {
            return Err(Error::Config(format!(
                "pipeline.max_genres ({}) must be within 1..={}",
                self.pipeline.max_genres, MAX_GENRES_PER_ASSET
            )));
        }
        if self.pipeline.image.jpeg_quality == 0 || self.pipeline.image.jpeg_quality > 100 {
            return Err(Error::Config(
                "pipeline.image.jpeg_quality must be within 1..=100".to_string(),
            ));
        }
        if self.pipeline.image.width == 0 || self.pipeline.image.height == 0 {
            return Err(Error::Config("pipeline.image dimensions must be non-zero".to_string()));
        }
        if self.pipeline.image_mode == ImageMode::Rehost && !self.storage.is_upload_configured() {
            return Err(Error::Config(
                "pipeline.image_mode = \"rehost\" requires storage.zone, storage.api_key and storage.cdn_base"
                    .to_string(),
            ));
        }
        if self.source.kind == SourceKind::File && self.source.file.is_none() {
            return Err(Error::Config(
                "source.kind = \"file\" requires source.file".to_string(),
            ));
        }
        if self.genres.iter().any(|g| g.name.trim().is_empty()) {
            return Err(Error::Config("genres entries need a non-empty name".to_string()));
        }

        Ok(())
    }

    /// Effective rating table
    pub fn rating_table(&self) -> BTreeMap<String, String> {
        if self.ratings.is_empty() {
            default_rating_table()
        } else {
            self.ratings.clone()
        }
    }

    /// Effective genre keyword table
    pub fn genre_rules(&self) -> Vec<GenreRule> {
        if self.genres.is_empty() {
            default_genre_rules()
        } else {
            self.genres.clone()
        }
    }

    /// Serialize with secrets replaced, for display
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut copy = self.clone();
        let redact = |v: &mut Option<String>| {
            if v.is_some() {
                *v = Some("<redacted>".to_string());
            }
        };
        redact(&mut copy.source.api_token);
        redact(&mut copy.source.airtable.token);
        redact(&mut copy.storage.api_key);
        toml::to_string_pretty(&copy).map_err(|e| Error::Internal(format!("TOML encode failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_validate() {
        let config = TomlConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rating_table().len(), 8);
        assert_eq!(config.genre_rules()[0].name, "Kids");
    }

    #[test]
    fn test_parse_sections() {
        let config = TomlConfig::from_toml_str(
            r#"
            [source]
            kind = "airtable"

            [source.airtable]
            base_id = "appXYZ"
            table = "Live TV"

            [pipeline]
            genre_policy = "all_matches"
            fallback_genre = "Sports"
            drop_on_image_failure = true

            [pipeline.duration.non_live]
            mode = "random"
            min = 120
            max = 900

            [[genres]]
            name = "Space"
            keywords = ["rocket", "nasa"]
            "#,
        )
        .unwrap();

        assert_eq!(config.source.kind, SourceKind::Airtable);
        assert_eq!(config.source.airtable.table.as_deref(), Some("Live TV"));
        assert_eq!(config.pipeline.genre_policy, GenrePolicy::AllMatches);
        assert!(config.pipeline.drop_on_image_failure);
        assert_eq!(
            config.pipeline.duration.non_live,
            NonLiveDuration::Random { min: 120, max: 900 }
        );
        // Untouched values keep their defaults
        assert_eq!(config.pipeline.duration.live_default_secs, 7200);
        assert_eq!(config.genre_rules().len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_live_default_below_floor_is_rejected() {
        let mut config = TomlConfig::default();
        config.pipeline.duration.non_live = NonLiveDuration::Fixed { seconds: 45 };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.pipeline.duration.non_live = NonLiveDuration::Random { min: 900, max: 120 };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_max_genres_bounds() {
        let mut config = TomlConfig::default();
        for ok in 1..=3 {
            config.pipeline.max_genres = ok;
            assert!(config.validate().is_ok(), "max_genres = {}", ok);
        }
        for bad in [0, 4, 6] {
            config.pipeline.max_genres = bad;
            assert!(matches!(config.validate(), Err(Error::Config(_))), "max_genres = {}", bad);
        }
    }

    #[test]
    fn test_duration_floor_cannot_drop_below_sixty() {
        let mut config = TomlConfig::default();
        config.pipeline.duration.floor_secs = 59;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.pipeline.duration.floor_secs = 0;
        assert!(config.validate().is_err());

        config.pipeline.duration.floor_secs = 60;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rehost_requires_storage() {
        let mut config = TomlConfig::default();
        config.pipeline.image_mode = ImageMode::Rehost;
        assert!(config.validate().is_err());

        config.storage.zone = Some("zone".to_string());
        config.storage.api_key = Some("key".to_string());
        config.storage.cdn_base = Some("https://cdn.example.com".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("FEEDGEN_API_TOKEN", "tok"),
            ("FEEDGEN_STORAGE_ZONE", "zone"),
            ("FEEDGEN_STORAGE_REGION", "ny"),
            ("FEEDGEN_PORT", "8080"),
            ("FEEDGEN_CDN_BASE", ""),
        ]
        .into_iter()
        .collect();

        let mut config = TomlConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.source.api_token.as_deref(), Some("tok"));
        assert_eq!(config.storage.zone.as_deref(), Some("zone"));
        assert_eq!(config.server.port, 8080);
        // Empty values do not override
        assert!(config.storage.cdn_base.is_none());
        assert_eq!(config.storage.storage_endpoint(), "https://ny.storage.bunnycdn.com");
    }

    #[test]
    fn test_redacted_output_hides_secrets() {
        let mut config = TomlConfig::default();
        config.source.api_token = Some("super-secret".to_string());
        let text = config.to_redacted_toml().unwrap();
        assert!(!text.contains("super-secret"));
        assert!(text.contains("<redacted>"));
    }
}
