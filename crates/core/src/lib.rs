//! Restyla Trade Core - Shared types and order rules.
//!
//! This crate holds the parts of the salon trade portal that have no I/O:
//! the order submission types and the quantity rules applied before any
//! draft order is created in Shopify.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, variant IDs and line items
//! - [`validation`] - The per-order unit limit

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{MAX_UNITS_PER_ORDER, QuantityError, validate_quantity};
