//! Core library for the KatiCRM console
//!
//! This crate contains everything below the page controllers:
//! - Backend records and the HTTP API client
//! - The query cache used to share and invalidate reads
//! - Durable key-value storage, session and API settings
//! - The schedule form state machine

pub mod api;
pub mod cache;
pub mod error;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod storage;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
