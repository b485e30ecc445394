//! # cosmos-core
//!
//! The catalog logic for Cosmos - THE LOGIC.
//!
//! Three record types (scientists, planets and the missions joining them),
//! their field validation, the per-endpoint output views, and the storage
//! layer with its cascade-delete rules.
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - The only place where state lives; the binary holds a `Catalog`
//! - Validation errors, missing rows and infrastructure failures are
//!   distinct `CosmosError` variants; the core never panics

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod model;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CosmosError, MissionId, PlanetId, ScientistId, TableCounts, ValidationError};

// =============================================================================
// RE-EXPORTS: Records, Views, Storage
// =============================================================================

pub use catalog::{Catalog, StorageBackend};
pub use model::{FieldValue, Mission, Planet, Scientist};
pub use storage::RedbStore;
pub use store::{CatalogStore, MemoryStore};
pub use view::{Expand, MissionView, PlanetSummary, ScientistDetail, ScientistSummary};
