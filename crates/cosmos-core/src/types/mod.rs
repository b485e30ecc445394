//! # Core Type Definitions
//!
//! This module contains the shared types of the catalog:
//! - Row identifiers (`ScientistId`, `PlanetId`, `MissionId`)
//! - Table statistics (`TableCounts`)
//! - Error types (`CosmosError`, `ValidationError`)
//!
//! Identifiers are plain `u64` newtypes. The value `0` is never handed out
//! by a store; it is reserved for "unsaved" records and for absent foreign
//! keys, which validation rejects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ROW IDENTIFIERS
// =============================================================================

/// Primary key of a row in the `scientists` table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ScientistId(pub u64);

/// Primary key of a row in the `planets` table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PlanetId(pub u64);

/// Primary key of a row in the `missions` table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct MissionId(pub u64);

macro_rules! row_id {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// Whether this id was assigned by a store.
                #[must_use]
                pub const fn is_assigned(self) -> bool {
                    self.0 != 0
                }

                /// Get the raw id value.
                #[must_use]
                pub const fn value(self) -> u64 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

row_id!(ScientistId, PlanetId, MissionId);

// =============================================================================
// TABLE COUNTS
// =============================================================================

/// Number of rows per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableCounts {
    pub scientists: usize,
    pub planets: usize,
    pub missions: usize,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// A field failed validation.
///
/// Raised at construction and on every later assignment, never only at
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty or absent.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A required foreign key is absent (zero).
    #[error("{field} is required")]
    MissingReference { field: &'static str },

    /// A foreign key does not resolve to a live row.
    #[error("{field} {id} does not reference an existing row")]
    UnknownReference { field: &'static str, id: u64 },

    /// The field exists but may not be assigned through a partial update.
    #[error("{field} is read-only")]
    ReadOnlyField { field: String },

    /// The field does not exist on the record.
    #[error("unknown field {field}")]
    UnknownField { field: String },

    /// The assigned value has the wrong type for the field.
    #[error("{field} expects a string")]
    WrongType { field: String },
}

/// Errors that can occur in the catalog.
///
/// - `Validation` is a client error and never leaves a partial write behind
/// - the `*NotFound` variants are lookups by id that found no row
/// - everything else is an infrastructure failure
#[derive(Debug, Error)]
pub enum CosmosError {
    /// A field failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No scientist with this id.
    #[error("Scientist not found: {0}")]
    ScientistNotFound(ScientistId),

    /// No planet with this id.
    #[error("Planet not found: {0}")]
    PlanetNotFound(PlanetId),

    /// The id counter of a table cannot advance any further.
    #[error("Id space exhausted for table {0}")]
    IdSpaceExhausted(&'static str),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl CosmosError {
    /// Whether this error is a client-side validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error is a failed lookup by id.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ScientistNotFound(_) | Self::PlanetNotFound(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
