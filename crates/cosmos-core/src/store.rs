//! # Catalog Storage
//!
//! The `CatalogStore` trait abstracts row access over the three tables, and
//! `MemoryStore` is its volatile implementation. The persistent
//! implementation lives in `storage::RedbStore`.
//!
//! ## Relational rules every store enforces
//!
//! - ids come from per-table counters starting at 1 and are never reused
//! - a mission's owners must exist when the mission is inserted
//! - deleting a scientist or planet deletes the missions referencing it
//! - a failed write leaves every table unchanged

use crate::model::{Mission, Planet, Scientist};
use crate::{CosmosError, MissionId, PlanetId, ScientistId, TableCounts, ValidationError};
use std::collections::BTreeMap;

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Row-level access to scientists, planets and missions.
///
/// Both `MemoryStore` and `RedbStore` implement this trait.
pub trait CatalogStore {
    /// Insert a scientist, assigning its id. Returns the saved row.
    fn insert_scientist(&mut self, scientist: Scientist) -> Result<Scientist, CosmosError>;

    /// Look up a scientist by id.
    fn scientist(&self, id: ScientistId) -> Result<Option<Scientist>, CosmosError>;

    /// All scientists in id order.
    fn scientists(&self) -> Result<Vec<Scientist>, CosmosError>;

    /// Overwrite an existing scientist row.
    ///
    /// Returns `ScientistNotFound` if no row has the scientist's id.
    fn update_scientist(&mut self, scientist: &Scientist) -> Result<(), CosmosError>;

    /// Delete a scientist and its missions. Returns the number of missions
    /// removed by the cascade.
    fn delete_scientist(&mut self, id: ScientistId) -> Result<usize, CosmosError>;

    /// Insert a planet, assigning its id. Returns the saved row.
    fn insert_planet(&mut self, planet: Planet) -> Result<Planet, CosmosError>;

    /// Look up a planet by id.
    fn planet(&self, id: PlanetId) -> Result<Option<Planet>, CosmosError>;

    /// All planets in id order.
    fn planets(&self) -> Result<Vec<Planet>, CosmosError>;

    /// Delete a planet and its missions. Returns the number of missions
    /// removed by the cascade.
    fn delete_planet(&mut self, id: PlanetId) -> Result<usize, CosmosError>;

    /// Insert a mission, assigning its id.
    ///
    /// Fails with `ValidationError::UnknownReference` if either owner does
    /// not exist; nothing is written in that case.
    fn insert_mission(&mut self, mission: Mission) -> Result<Mission, CosmosError>;

    /// Missions owned by a scientist, in id order.
    fn missions_for_scientist(&self, id: ScientistId) -> Result<Vec<Mission>, CosmosError>;

    /// Missions owned by a planet, in id order.
    fn missions_for_planet(&self, id: PlanetId) -> Result<Vec<Mission>, CosmosError>;

    /// Row counts of all three tables.
    fn counts(&self) -> Result<TableCounts, CosmosError>;
}

/// Advance an id counter, returning the id to hand out.
pub(crate) fn next_id(counter: &mut u64, table: &'static str) -> Result<u64, CosmosError> {
    let id = (*counter).max(1);
    *counter = id
        .checked_add(1)
        .ok_or(CosmosError::IdSpaceExhausted(table))?;
    Ok(id)
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Volatile store backed by `BTreeMap` tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scientists: BTreeMap<ScientistId, Scientist>,
    planets: BTreeMap<PlanetId, Planet>,
    missions: BTreeMap<MissionId, Mission>,
    next_scientist_id: u64,
    next_planet_id: u64,
    next_mission_id: u64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn cascade<F>(&mut self, owned: F) -> usize
    where
        F: Fn(&Mission) -> bool,
    {
        let before = self.missions.len();
        self.missions.retain(|_, mission| !owned(mission));
        before - self.missions.len()
    }
}

impl CatalogStore for MemoryStore {
    fn insert_scientist(&mut self, scientist: Scientist) -> Result<Scientist, CosmosError> {
        let id = ScientistId(next_id(&mut self.next_scientist_id, "scientists")?);
        let saved = scientist.with_id(id);
        self.scientists.insert(id, saved.clone());
        Ok(saved)
    }

    fn scientist(&self, id: ScientistId) -> Result<Option<Scientist>, CosmosError> {
        Ok(self.scientists.get(&id).cloned())
    }

    fn scientists(&self) -> Result<Vec<Scientist>, CosmosError> {
        Ok(self.scientists.values().cloned().collect())
    }

    fn update_scientist(&mut self, scientist: &Scientist) -> Result<(), CosmosError> {
        match self.scientists.get_mut(&scientist.id()) {
            Some(row) => {
                *row = scientist.clone();
                Ok(())
            }
            None => Err(CosmosError::ScientistNotFound(scientist.id())),
        }
    }

    fn delete_scientist(&mut self, id: ScientistId) -> Result<usize, CosmosError> {
        if self.scientists.remove(&id).is_none() {
            return Err(CosmosError::ScientistNotFound(id));
        }
        Ok(self.cascade(|mission| mission.scientist_id() == id))
    }

    fn insert_planet(&mut self, planet: Planet) -> Result<Planet, CosmosError> {
        let id = PlanetId(next_id(&mut self.next_planet_id, "planets")?);
        let saved = planet.with_id(id);
        self.planets.insert(id, saved.clone());
        Ok(saved)
    }

    fn planet(&self, id: PlanetId) -> Result<Option<Planet>, CosmosError> {
        Ok(self.planets.get(&id).cloned())
    }

    fn planets(&self) -> Result<Vec<Planet>, CosmosError> {
        Ok(self.planets.values().cloned().collect())
    }

    fn delete_planet(&mut self, id: PlanetId) -> Result<usize, CosmosError> {
        if self.planets.remove(&id).is_none() {
            return Err(CosmosError::PlanetNotFound(id));
        }
        Ok(self.cascade(|mission| mission.planet_id() == id))
    }

    fn insert_mission(&mut self, mission: Mission) -> Result<Mission, CosmosError> {
        if !self.scientists.contains_key(&mission.scientist_id()) {
            return Err(ValidationError::UnknownReference {
                field: "scientist_id",
                id: mission.scientist_id().value(),
            }
            .into());
        }
        if !self.planets.contains_key(&mission.planet_id()) {
            return Err(ValidationError::UnknownReference {
                field: "planet_id",
                id: mission.planet_id().value(),
            }
            .into());
        }

        let id = MissionId(next_id(&mut self.next_mission_id, "missions")?);
        let saved = mission.with_id(id);
        self.missions.insert(id, saved.clone());
        Ok(saved)
    }

    fn missions_for_scientist(&self, id: ScientistId) -> Result<Vec<Mission>, CosmosError> {
        Ok(self
            .missions
            .values()
            .filter(|mission| mission.scientist_id() == id)
            .cloned()
            .collect())
    }

    fn missions_for_planet(&self, id: PlanetId) -> Result<Vec<Mission>, CosmosError> {
        Ok(self
            .missions
            .values()
            .filter(|mission| mission.planet_id() == id)
            .cloned()
            .collect())
    }

    fn counts(&self) -> Result<TableCounts, CosmosError> {
        Ok(TableCounts {
            scientists: self.scientists.len(),
            planets: self.planets.len(),
            missions: self.missions.len(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn seeded() -> (MemoryStore, ScientistId, PlanetId) {
        let mut store = MemoryStore::new();
        let scientist = store
            .insert_scientist(Scientist::new("Carl Sagan", "Planetary science").unwrap())
            .unwrap();
        let planet = store
            .insert_planet(Planet::new("Mars", 225, "Sun"))
            .unwrap();
        (store, scientist.id(), planet.id())
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let (mut store, first, _) = seeded();
        let second = store
            .insert_scientist(Scientist::new("Jill Tarter", "SETI").unwrap())
            .unwrap();
        assert_eq!(first, ScientistId(1));
        assert_eq!(second.id(), ScientistId(2));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (mut store, first, _) = seeded();
        store.delete_scientist(first).unwrap();
        let next = store
            .insert_scientist(Scientist::new("Jill Tarter", "SETI").unwrap())
            .unwrap();
        assert_eq!(next.id(), ScientistId(2));
    }

    #[test]
    fn mission_with_unknown_owner_is_rejected() {
        let (mut store, scientist, planet) = seeded();

        let err = store
            .insert_mission(Mission::new("Lost", ScientistId(99), planet).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            CosmosError::Validation(ValidationError::UnknownReference {
                field: "scientist_id",
                id: 99
            })
        ));

        let err = store
            .insert_mission(Mission::new("Lost", scientist, PlanetId(99)).unwrap())
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.counts().unwrap().missions, 0);
    }

    #[test]
    fn rejected_mission_does_not_consume_an_id() {
        let (mut store, scientist, planet) = seeded();
        let _ = store.insert_mission(Mission::new("Lost", ScientistId(99), planet).unwrap());
        let saved = store
            .insert_mission(Mission::new("Viking", scientist, planet).unwrap())
            .unwrap();
        assert_eq!(saved.id(), MissionId(1));
    }

    #[test]
    fn deleting_scientist_cascades() {
        let (mut store, scientist, planet) = seeded();
        let other = store
            .insert_scientist(Scientist::new("Jill Tarter", "SETI").unwrap())
            .unwrap()
            .id();
        store
            .insert_mission(Mission::new("Viking", scientist, planet).unwrap())
            .unwrap();
        store
            .insert_mission(Mission::new("Phoenix", other, planet).unwrap())
            .unwrap();

        assert_eq!(store.delete_scientist(scientist).unwrap(), 1);
        assert!(store.missions_for_scientist(scientist).unwrap().is_empty());
        assert_eq!(store.missions_for_planet(planet).unwrap().len(), 1);
    }

    #[test]
    fn deleting_planet_cascades() {
        let (mut store, scientist, planet) = seeded();
        store
            .insert_mission(Mission::new("Viking", scientist, planet).unwrap())
            .unwrap();

        assert_eq!(store.delete_planet(planet).unwrap(), 1);
        assert!(store.missions_for_scientist(scientist).unwrap().is_empty());
        assert!(store.scientist(scientist).unwrap().is_some());
    }

    #[test]
    fn deleting_missing_rows_is_not_found() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.delete_scientist(ScientistId(4)),
            Err(CosmosError::ScientistNotFound(ScientistId(4)))
        ));
        assert!(matches!(
            store.delete_planet(PlanetId(4)),
            Err(CosmosError::PlanetNotFound(PlanetId(4)))
        ));
    }

    #[test]
    fn update_requires_existing_row() {
        let (mut store, id, _) = seeded();
        let mut scientist = store.scientist(id).unwrap().unwrap();
        scientist.set_name("C. Sagan").unwrap();
        store.update_scientist(&scientist).unwrap();
        assert_eq!(store.scientist(id).unwrap().unwrap().name(), "C. Sagan");

        let unsaved = Scientist::new("Nobody", "Nothing").unwrap();
        assert!(store.update_scientist(&unsaved).is_err());
    }
}
