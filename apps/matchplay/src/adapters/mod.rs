//! Concrete [`RatingService`](crate::rating::RatingService) implementations.

pub mod rating_http;
pub mod rating_memory;

pub use rating_http::HttpRatingService;
pub use rating_memory::{InMemoryRatingService, RatingCall};
