//! Shared types and models for the POS back office
//!
//! Domain records, wire enums and the pure rules (stock thresholds, header
//! summary checks, sales reporting) used by the backend.

pub mod models;
pub mod reporting;
pub mod stock;
pub mod types;
pub mod validation;

pub use models::*;
pub use stock::QuantityOverflow;
pub use types::*;
pub use validation::*;
