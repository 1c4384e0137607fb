//! Clothing Fit Core - Pricing and cart engine.
//!
//! This crate provides the domain logic shared by the Clothing Fit
//! components:
//! - `storefront` - Public-facing shop and admin sale entry
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O beyond the
//! [`cart::CartStorage`] trait, no database access, no HTTP clients.
//! Product records come in from the catalog collaborator as plain data,
//! flow through the discount resolver, and end up as cart lines with a
//! pricing snapshot.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`catalog`] - Read-only product record shape from the catalog service
//! - [`pricing`] - Discount resolution (single canonical precedence)
//! - [`cart`] - Cart lines, the cart store, and its persistence boundary
//! - [`checkout`] - WhatsApp order summary builder
//! - [`sale`] - Sale drafts for the admin sale-entry flow

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod pricing;
pub mod sale;
pub mod types;

pub use types::*;
