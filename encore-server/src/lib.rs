//! # Encore Server Library
//!
//! Session store, lifecycle manager, and HTTP API for the Encore
//! song-request service.
//!
//! **Purpose:** Hold all live sessions in process memory, enforce the
//! session and request state machines, and expose the operations over a
//! JSON HTTP interface for the admin, patron, and display pages.

pub mod api;
pub mod config;
pub mod lifecycle;
pub mod store;
