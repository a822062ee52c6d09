//! Core type definitions for the carstate relay.
//!
//! This crate defines the plain data types shared by the ingestion engine,
//! the snapshot store and the HTTP layer:
//! - Entity identifiers (opaque vehicle ids taken from stream topics)
//! - Typed field values and the payload coercion rules
//! - Per-entity snapshots (latest value of every field)
//! - Distance and temperature unit settings
//!
//! Nothing in here performs I/O or holds shared state.

mod ids;
mod snapshot;
mod units;
mod value;

pub use ids::EntityId;
pub use snapshot::{Snapshot, fields};
pub use units::{DistanceUnit, KM_PER_MILE, TemperatureUnit, celsius_to_fahrenheit, round2};
pub use value::FieldValue;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid entity id: {0:?}")]
    InvalidEntityId(String),

    #[error("invalid distance unit: {0:?} (expected \"km\" or \"imperial\")")]
    InvalidDistanceUnit(String),

    #[error("invalid temperature unit: {0:?} (expected \"C\" or \"F\")")]
    InvalidTemperatureUnit(String),
}
