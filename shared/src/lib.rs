//! Shared types and models for Stockbook
//!
//! This crate contains the domain model, measurement units, and validation
//! helpers shared between the backend and other components of the system.

pub mod models;
pub mod units;
pub mod validation;

pub use models::*;
pub use units::*;
pub use validation::*;
