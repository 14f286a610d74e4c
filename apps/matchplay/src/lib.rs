#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod rating;
pub mod services;

// Re-exports for public API
pub use adapters::{HttpRatingService, InMemoryRatingService};
pub use config::rating::RatingApiConfig;
pub use error::AppError;
pub use rating::{RatingError, RatingService, SubmissionStage};
pub use services::{OrderedSubmissionPipeline, ScoringSession, SubmissionReport};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    matchplay_test_support::logging::init();
}
