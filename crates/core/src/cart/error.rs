//! Cart operation errors.

use thiserror::Error;

/// Errors surfaced by explicit cart mutations.
///
/// Pricing resolution never produces an error (dirty discount data
/// degrades to the base price); these cover caller input only, and a
/// failing operation leaves the cart untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity was zero or otherwise not a positive integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A negative unit price was passed to an admin override.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// No line with the given key exists.
    #[error("no cart line with key {0}")]
    LineNotFound(String),
}
