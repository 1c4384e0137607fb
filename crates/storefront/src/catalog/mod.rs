//! Catalog backend client.
//!
//! The hosted backend owns product data, authentication, and sale
//! recording; this module is the read/record boundary against its REST
//! interface. Product rows come back in the shape
//! [`clothing_fit_core::catalog::Product`] and flow straight into the
//! pricing engine.

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when interacting with the catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the request.
    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },
}
