//! World Kernel: live entity positions, tick stepping, mutation event log.
//!
//! # Invariants
//! - All state mutations flow through explicit operations and are logged.
//! - Entity iteration order is deterministic (`BTreeMap`).

pub mod world;

pub use world::{EntityData, World, WorldEvent};
