//! Record → asset transformation
//!
//! Everything in here is synchronous and free of I/O; image handling lives
//! in `services::image_normalizer`.

pub mod asset;
pub mod description;
pub mod duration;
pub mod feed;
pub mod genre;
pub mod rating;

pub use asset::{AssetBuilder, AssetInputs};
pub use description::{DescriptionSanitizer, Descriptions};
pub use duration::DurationPolicy;
pub use genre::{
    classifier_from_config, GenreClassifier, GenreFallback, KeywordGenreClassifier,
    SourceTagGenreClassifier,
};
pub use rating::RatingMapper;
