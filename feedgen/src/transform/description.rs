//! Short/long description sanitizing
//!
//! Output is always two non-empty strings that differ. When the source gives
//! identical text, the short one is cut down and marked; it then reads as a
//! prefix of the long one, which the platform accepts as distinct.

/// Characters kept when deriving a short description from the long one
const DERIVED_SHORT_MAX_CHARS: usize = 100;

/// Characters kept when shortening a short description that equals the long one
const DISTINCT_SHORT_MAX_CHARS: usize = 80;

/// Sanitized description pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptions {
    pub short: String,
    pub long: String,
}

/// Fills in and de-duplicates descriptions
#[derive(Debug, Clone)]
pub struct DescriptionSanitizer {
    platform: String,
}

impl DescriptionSanitizer {
    /// `platform` is the name used in synthesized text ("Watch X now on {platform}.")
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    pub fn sanitize(&self, title: &str, short: &str, long: &str) -> Descriptions {
        let title = title.trim();
        let mut short = short.trim().to_string();
        let mut long = long.trim().to_string();

        if short.is_empty() && long.is_empty() {
            let (subject, subject_capitalized) = if title.is_empty() {
                ("this video", "This video")
            } else {
                (title, title)
            };
            short = format!("Watch {} now on {}.", subject, self.platform);
            long = format!(
                "{} is available to stream on {}. Enjoy the content now!",
                subject_capitalized, self.platform
            );
        }

        if short.is_empty() {
            short = truncate_chars(&long, DERIVED_SHORT_MAX_CHARS, "…");
        }

        if long.is_empty() {
            long = format!("{} Full episode available on {}.", short, self.platform);
        }

        if short == long {
            short = format!("{}...", take_chars(&short, DISTINCT_SHORT_MAX_CHARS));
        }

        Descriptions { short, long }
    }
}

impl Default for DescriptionSanitizer {
    fn default() -> Self {
        Self::new("Roku")
    }
}

/// First `max` characters of `text`
fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// First `max` characters of `text`, plus `marker` if anything was cut
fn truncate_chars(text: &str, max: usize, marker: &str) -> String {
    let kept = take_chars(text, max);
    if kept.len() < text.len() {
        format!("{}{}", kept, marker)
    } else {
        kept.to_string()
    }
}
