//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by concern.

pub mod export;
pub mod health;
pub mod orders;
pub mod queries;

use serde::Deserialize;

/// `?page=&pageSize=` query parameters, kept as raw text so malformed values
/// are reported as input errors rather than extractor rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// Requested page
    pub page: Option<String>,
    /// Requested page size
    pub page_size: Option<String>,
}

// Re-export common handler utilities
pub use health::health_check;
