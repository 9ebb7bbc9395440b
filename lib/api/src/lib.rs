//! # networth-api
//!
//! HTTP front end for the net worth lookalike estimator: photo upload,
//! raw-vector ranking, profile listing and dataset reload.

pub mod rest;
pub mod format;

pub use rest::{AppState, RestApi, IMAGE_FIELD, MAX_UPLOAD_BYTES};
pub use format::{format_estimate, format_similarity, format_usd, match_caption, NO_MATCHES_DISPLAY};
