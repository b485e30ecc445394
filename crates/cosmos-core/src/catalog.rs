//! # Catalog Module
//!
//! The `Catalog` is the domain facade used by the HTTP handlers and the CLI.
//! Each operation validates its input, performs a single write (or a read)
//! against the store, and returns the output view for its endpoint.
//!
//! ## Storage Backends
//!
//! A catalog runs on one of two backends:
//! - `InMemory`: uses `MemoryStore` (fast, volatile)
//! - `Persistent`: uses `RedbStore` for disk-backed ACID storage

use crate::model::{FieldValue, Mission, Planet, Scientist};
use crate::storage::RedbStore;
use crate::store::{CatalogStore, MemoryStore};
use crate::view::{Expand, MissionView, PlanetSummary, ScientistDetail, ScientistSummary};
use crate::{CosmosError, PlanetId, ScientistId, TableCounts};
use std::path::Path;

/// Storage backend for a Catalog.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory tables (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed tables using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

/// Domain operations over scientists, planets and missions.
#[derive(Debug, Default)]
pub struct Catalog {
    backend: StorageBackend,
}

impl Catalog {
    /// Create an empty catalog with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CosmosError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbStore::open(path)?),
        })
    }

    /// Whether writes survive the process.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    fn store(&self) -> &dyn CatalogStore {
        match &self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    fn store_mut(&mut self) -> &mut dyn CatalogStore {
        match &mut self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    fn load_scientist(&self, id: ScientistId) -> Result<Scientist, CosmosError> {
        self.store()
            .scientist(id)?
            .ok_or(CosmosError::ScientistNotFound(id))
    }

    /// Shape a mission, embedding the owners selected by `expand`.
    fn mission_view(&self, mission: &Mission, expand: Expand) -> Result<MissionView, CosmosError> {
        let mut view = MissionView::bare(mission);
        if expand.scientist {
            let scientist = self.load_scientist(mission.scientist_id())?;
            view = view.with_scientist(&scientist);
        }
        if expand.planet {
            let planet = self
                .store()
                .planet(mission.planet_id())?
                .ok_or(CosmosError::PlanetNotFound(mission.planet_id()))?;
            view = view.with_planet(&planet);
        }
        Ok(view)
    }

    // =========================================================================
    // SCIENTISTS
    // =========================================================================

    /// All scientists, without missions.
    pub fn list_scientists(&self) -> Result<Vec<ScientistSummary>, CosmosError> {
        Ok(self
            .store()
            .scientists()?
            .iter()
            .map(ScientistSummary::from)
            .collect())
    }

    /// Create a scientist. Both fields are required.
    pub fn create_scientist(
        &mut self,
        name: &str,
        field_of_study: &str,
    ) -> Result<ScientistSummary, CosmosError> {
        let scientist = Scientist::new(name, field_of_study)?;
        let saved = self.store_mut().insert_scientist(scientist)?;
        Ok(ScientistSummary::from(&saved))
    }

    /// One scientist with its missions; each mission embeds its planet.
    pub fn scientist_detail(&self, id: ScientistId) -> Result<ScientistDetail, CosmosError> {
        let scientist = self.load_scientist(id)?;
        let missions = self
            .store()
            .missions_for_scientist(id)?
            .iter()
            .map(|mission| self.mission_view(mission, Expand::PLANET))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScientistDetail::new(&scientist, missions))
    }

    /// Fails with `ScientistNotFound` unless the scientist exists. Missions
    /// are not loaded.
    pub fn ensure_scientist(&self, id: ScientistId) -> Result<(), CosmosError> {
        self.load_scientist(id).map(|_| ())
    }

    /// Apply field assignments to a scientist.
    ///
    /// The lookup happens first, so an unknown id is reported as not found
    /// even when the assignments are invalid. Assignments are validated as a
    /// batch; on failure nothing is written.
    pub fn patch_scientist(
        &mut self,
        id: ScientistId,
        assignments: &[(String, FieldValue)],
    ) -> Result<ScientistSummary, CosmosError> {
        let mut scientist = self.load_scientist(id)?;
        scientist.apply(
            assignments
                .iter()
                .map(|(field, value)| (field.as_str(), value)),
        )?;
        self.store_mut().update_scientist(&scientist)?;
        Ok(ScientistSummary::from(&scientist))
    }

    /// Delete a scientist and its missions. Returns how many missions the
    /// cascade removed.
    pub fn delete_scientist(&mut self, id: ScientistId) -> Result<usize, CosmosError> {
        self.store_mut().delete_scientist(id)
    }

    // =========================================================================
    // PLANETS
    // =========================================================================

    /// All planets, without missions.
    pub fn list_planets(&self) -> Result<Vec<PlanetSummary>, CosmosError> {
        Ok(self
            .store()
            .planets()?
            .iter()
            .map(PlanetSummary::from)
            .collect())
    }

    /// Create a planet.
    pub fn create_planet(
        &mut self,
        name: &str,
        distance_from_earth: i64,
        nearest_star: &str,
    ) -> Result<PlanetSummary, CosmosError> {
        let planet = Planet::new(name, distance_from_earth, nearest_star);
        let saved = self.store_mut().insert_planet(planet)?;
        Ok(PlanetSummary::from(&saved))
    }

    /// Delete a planet and its missions. Returns how many missions the
    /// cascade removed.
    pub fn delete_planet(&mut self, id: PlanetId) -> Result<usize, CosmosError> {
        self.store_mut().delete_planet(id)
    }

    // =========================================================================
    // MISSIONS
    // =========================================================================

    /// Create a mission between an existing scientist and planet.
    ///
    /// An empty name, a zero id, or an id with no row are all validation
    /// errors. Returns the mission with both owners embedded.
    pub fn create_mission(
        &mut self,
        name: &str,
        scientist_id: ScientistId,
        planet_id: PlanetId,
    ) -> Result<MissionView, CosmosError> {
        let mission = Mission::new(name, scientist_id, planet_id)?;
        let saved = self.store_mut().insert_mission(mission)?;
        self.mission_view(&saved, Expand::OWNERS)
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    /// Row counts of all three tables.
    pub fn status(&self) -> Result<TableCounts, CosmosError> {
        self.store().counts()
    }

    /// Compact the database file. In-memory tables have nothing to reclaim.
    pub fn compact(&mut self) -> Result<bool, CosmosError> {
        match &mut self.backend {
            StorageBackend::InMemory(_) => Ok(false),
            StorageBackend::Persistent(store) => store.compact(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ValidationError;

    fn catalog_with_owners() -> (Catalog, ScientistId, PlanetId) {
        let mut catalog = Catalog::new();
        let scientist = catalog.create_scientist("Nancy Roman", "Astronomy").unwrap();
        let planet = catalog.create_planet("Jupiter", 588, "Sun").unwrap();
        (catalog, ScientistId(scientist.id), PlanetId(planet.id))
    }

    #[test]
    fn new_catalog_is_empty_and_volatile() {
        let catalog = Catalog::new();
        assert!(!catalog.is_persistent());
        assert_eq!(catalog.status().unwrap(), TableCounts::default());
    }

    #[test]
    fn created_scientist_has_empty_missions() {
        let (catalog, scientist, _) = catalog_with_owners();
        let detail = catalog.scientist_detail(scientist).unwrap();
        assert_eq!(detail.name, "Nancy Roman");
        assert!(detail.missions.is_empty());
    }

    #[test]
    fn create_scientist_rejects_empty_fields() {
        let mut catalog = Catalog::new();
        let err = catalog.create_scientist("", "Astronomy").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(catalog.status().unwrap().scientists, 0);
    }

    #[test]
    fn missing_scientist_is_not_found() {
        let catalog = Catalog::new();
        assert!(matches!(
            catalog.scientist_detail(ScientistId(99999)),
            Err(CosmosError::ScientistNotFound(ScientistId(99999)))
        ));
    }

    #[test]
    fn compact_is_a_no_op_in_memory() {
        let (mut catalog, _, _) = catalog_with_owners();
        assert!(!catalog.compact().unwrap());
        assert_eq!(catalog.status().unwrap().scientists, 1);
    }

    #[test]
    fn ensure_scientist_checks_existence_only() {
        let (catalog, scientist, _) = catalog_with_owners();
        assert!(catalog.ensure_scientist(scientist).is_ok());
        assert!(matches!(
            catalog.ensure_scientist(ScientistId(404)),
            Err(CosmosError::ScientistNotFound(ScientistId(404)))
        ));
    }

    #[test]
    fn mission_round_trip_through_scientist() {
        let (mut catalog, scientist, planet) = catalog_with_owners();
        let mission = catalog
            .create_mission("Great Red Spot", scientist, planet)
            .unwrap();

        assert_eq!(mission.scientist.as_ref().map(|s| s.id), Some(scientist.0));
        assert_eq!(mission.planet.as_ref().map(|p| p.id), Some(planet.0));

        let detail = catalog.scientist_detail(scientist).unwrap();
        assert_eq!(detail.missions.len(), 1);
        assert_eq!(detail.missions[0].id, mission.id);
        assert_eq!(detail.missions[0].name, "Great Red Spot");
        assert!(detail.missions[0].scientist.is_none());
        assert!(detail.missions[0].planet.is_some());
    }

    #[test]
    fn mission_with_missing_owner_is_validation_error() {
        let (mut catalog, scientist, _) = catalog_with_owners();
        let err = catalog
            .create_mission("Nowhere", scientist, PlanetId(42))
            .unwrap_err();
        assert!(err.is_validation());

        let err = catalog
            .create_mission("Nowhere", ScientistId(0), PlanetId(1))
            .unwrap_err();
        assert!(matches!(
            err,
            CosmosError::Validation(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn patch_updates_and_persists() {
        let (mut catalog, scientist, _) = catalog_with_owners();
        let summary = catalog
            .patch_scientist(scientist, &[("name".to_string(), "New Name".into())])
            .unwrap();
        assert_eq!(summary.name, "New Name");
        assert_eq!(catalog.scientist_detail(scientist).unwrap().name, "New Name");
    }

    #[test]
    fn failed_patch_leaves_record_unchanged() {
        let (mut catalog, scientist, _) = catalog_with_owners();
        let err = catalog
            .patch_scientist(
                scientist,
                &[
                    ("name".to_string(), "Changed".into()),
                    ("field_of_study".to_string(), FieldValue::Null),
                ],
            )
            .unwrap_err();
        assert!(err.is_validation());

        let detail = catalog.scientist_detail(scientist).unwrap();
        assert_eq!(detail.name, "Nancy Roman");
        assert_eq!(detail.field_of_study, "Astronomy");
    }

    #[test]
    fn patch_unknown_id_is_not_found_before_validation() {
        let mut catalog = Catalog::new();
        let err = catalog
            .patch_scientist(ScientistId(5), &[("id".to_string(), FieldValue::Other)])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_scientist_cascades_missions() {
        let (mut catalog, scientist, planet) = catalog_with_owners();
        catalog.create_mission("Juno", scientist, planet).unwrap();

        assert_eq!(catalog.delete_scientist(scientist).unwrap(), 1);
        assert_eq!(catalog.status().unwrap().missions, 0);
        assert!(catalog.delete_scientist(scientist).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_planet_cascades_missions() {
        let (mut catalog, scientist, planet) = catalog_with_owners();
        catalog.create_mission("Juno", scientist, planet).unwrap();

        assert_eq!(catalog.delete_planet(planet).unwrap(), 1);
        assert!(catalog.scientist_detail(scientist).unwrap().missions.is_empty());
    }

    #[test]
    fn planet_list_has_no_missions() {
        let (mut catalog, scientist, planet) = catalog_with_owners();
        catalog.create_mission("Juno", scientist, planet).unwrap();
        catalog.create_mission("Galileo", scientist, planet).unwrap();

        let planets = catalog.list_planets().unwrap();
        assert_eq!(planets.len(), 1);
        assert_eq!(planets[0].name, "Jupiter");
    }
}
