//! Shared types and map constants for the worldgrid spatial index.
//!
//! # Invariants
//! - A `GridConfig` that passed `validate` describes a grid whose cell
//!   indices fit in `i32`.

pub mod config;
mod types;

pub use config::{ConfigError, GridConfig, GridOrigin};
pub use types::{EntityId, Locatable, ObjectCategory};
