//! # feedgen Common Library
//!
//! Shared code for the feed generator:
//! - Feed document schema (Feed, OutputAsset and friends)
//! - Configuration loading
//! - Error types
//! - Bounded retry helper
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod feed;
pub mod retry;
pub mod time;

pub use error::{Error, Result};
pub use retry::{retry_with_policy, RetryPolicy};
