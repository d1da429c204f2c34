//! Reporting backend access
//!
//! This module provides the backend records, the [`ReportApi`] seam and its
//! HTTP implementation.

mod client;
mod model;
mod repository;

pub use client::{ApiClient, ApiConfig, Operation};
pub use model::*;
pub use repository::ReportApi;
