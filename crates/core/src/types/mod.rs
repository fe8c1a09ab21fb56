//! Core types for the salon trade portal.
//!
//! This module provides type-safe wrappers for the order submission domain.

pub mod email;
pub mod order;

pub use email::{Email, EmailError};
pub use order::{LineItem, OrderRequest, OrderRequestError, VariantId};
