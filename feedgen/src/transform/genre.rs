//! Genre classification
//!
//! The keyword classifier is a heuristic: plain substring containment over the
//! lower-cased title and descriptions, no tokenizing or stemming. Short
//! keywords therefore match inside longer words ("race" in "embrace").

use std::sync::Arc;

use feedgen_common::config::{GenrePolicy, GenreRule, GenreStrategy, TomlConfig};

use crate::models::RawRecord;

/// Assigns genre labels to a record
pub trait GenreClassifier: Send + Sync {
    /// Between 1 and the configured maximum labels, deduplicated, in priority order
    fn classify(&self, record: &RawRecord) -> Vec<String>;
}

/// Fallback labels used when nothing matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreFallback {
    pub live: String,
    pub default: String,
}

impl Default for GenreFallback {
    fn default() -> Self {
        Self {
            live: "News".to_string(),
            default: "Action".to_string(),
        }
    }
}

/// Ordered keyword table classifier
#[derive(Debug, Clone)]
pub struct KeywordGenreClassifier {
    rules: Vec<GenreRule>,
    policy: GenrePolicy,
    max_genres: usize,
    fallback: GenreFallback,
}

impl KeywordGenreClassifier {
    pub fn new(
        rules: Vec<GenreRule>,
        policy: GenrePolicy,
        max_genres: usize,
        fallback: GenreFallback,
    ) -> Self {
        // Matching is done on lower-cased text, so keywords must be lower-cased too
        let rules = rules
            .into_iter()
            .map(|rule| GenreRule {
                name: rule.name,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();

        Self {
            rules,
            policy,
            max_genres: max_genres.max(1),
            fallback,
        }
    }

    pub fn from_config(config: &TomlConfig) -> Self {
        Self::new(
            config.genre_rules(),
            config.pipeline.genre_policy,
            config.pipeline.max_genres,
            GenreFallback {
                live: config.pipeline.live_fallback_genre.clone(),
                default: config.pipeline.fallback_genre.clone(),
            },
        )
    }

    /// Genres whose keywords occur in `text` (already lower-cased), per policy
    pub fn matching_genres(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for rule in &self.rules {
            if !rule.keywords.iter().any(|k| text.contains(k.as_str())) {
                continue;
            }
            if found.contains(&rule.name) {
                continue;
            }
            found.push(rule.name.clone());

            let limit = match self.policy {
                GenrePolicy::FirstMatch => 1,
                GenrePolicy::AllMatches => self.max_genres,
            };
            if found.len() >= limit {
                break;
            }
        }

        found
    }

    fn fallback_for(&self, record: &RawRecord) -> Vec<String> {
        if record.is_live_stream {
            vec![self.fallback.live.clone()]
        } else {
            vec![self.fallback.default.clone()]
        }
    }
}

impl GenreClassifier for KeywordGenreClassifier {
    fn classify(&self, record: &RawRecord) -> Vec<String> {
        let text = format!(
            "{} {} {}",
            record.title.as_deref().unwrap_or(""),
            record.short_description.as_deref().unwrap_or(""),
            record.long_description.as_deref().unwrap_or(""),
        )
        .to_lowercase();

        let found = self.matching_genres(&text);
        if found.is_empty() {
            self.fallback_for(record)
        } else {
            found
        }
    }
}

/// Uses the record's own genre tags, falling back to keywords when it has none
#[derive(Debug, Clone)]
pub struct SourceTagGenreClassifier {
    keywords: KeywordGenreClassifier,
    max_genres: usize,
}

impl SourceTagGenreClassifier {
    pub fn new(keywords: KeywordGenreClassifier, max_genres: usize) -> Self {
        Self {
            keywords,
            max_genres: max_genres.max(1),
        }
    }
}

impl GenreClassifier for SourceTagGenreClassifier {
    fn classify(&self, record: &RawRecord) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in &record.genre_tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags.truncate(self.max_genres);

        if tags.is_empty() {
            self.keywords.classify(record)
        } else {
            tags
        }
    }
}

/// Build the configured classifier
pub fn classifier_from_config(config: &TomlConfig) -> Arc<dyn GenreClassifier> {
    let keywords = KeywordGenreClassifier::from_config(config);
    match config.pipeline.genre_strategy {
        GenreStrategy::Keywords => Arc::new(keywords),
        GenreStrategy::SourceTags => Arc::new(SourceTagGenreClassifier::new(
            keywords,
            config.pipeline.max_genres,
        )),
    }
}
