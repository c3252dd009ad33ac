//! HTTP API

pub mod generate;
pub mod health;

pub use generate::{generate_routes, GenerateResponse};
pub use health::{health_routes, HealthResponse};
