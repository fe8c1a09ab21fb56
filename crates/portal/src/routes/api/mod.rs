//! JSON API endpoints.

pub mod draft_order;
