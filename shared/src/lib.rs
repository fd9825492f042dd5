//! Shared types and models for the Stockcast platform
//!
//! This crate contains the catalog, inventory, alert and forecast types
//! shared between the backend and other consumers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
