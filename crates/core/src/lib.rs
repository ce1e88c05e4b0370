//! Shared building blocks for cinematch — configuration, the error taxonomy,
//! request/response types, and the data-source contract used by loaders.

pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::AppConfig;
pub use error::{RecommendError, RecommendResult};
pub use source::{ItemAttributes, RatingSource, UserRatings};
