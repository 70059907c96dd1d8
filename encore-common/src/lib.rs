//! # Encore Common Library
//!
//! Shared code for the Encore song-request service:
//! - Session and request domain model
//! - Request-queue operations (append, remove, reorder, advance)
//! - Error types

pub mod error;
pub mod model;

pub use error::{Error, Result};
