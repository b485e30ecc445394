//! # redb-backed Catalog Storage
//!
//! A disk-backed `CatalogStore` using the redb embedded database.
//!
//! ## Schema
//!
//! | Table                | Key                       | Value            |
//! |----------------------|---------------------------|------------------|
//! | `scientists`         | scientist id              | postcard row     |
//! | `planets`            | planet id                 | postcard row     |
//! | `missions`           | mission id                | postcard row     |
//! | `scientist_missions` | (scientist id, mission id)| `()`             |
//! | `planet_missions`    | (planet id, mission id)   | `()`             |
//! | `metadata`           | counter name              | next id (`u64`)  |
//!
//! The two index tables are the foreign keys of `missions`. Every write
//! (including a cascade) happens in one write transaction, so a failure
//! part-way through never becomes visible: an uncommitted transaction is
//! aborted when it is dropped.

use crate::model::{Mission, Planet, Scientist};
use crate::store::{CatalogStore, next_id};
use crate::{CosmosError, MissionId, PlanetId, ScientistId, TableCounts, ValidationError};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Table for scientists: ScientistId(u64) -> serialized Scientist bytes
const SCIENTISTS: TableDefinition<u64, &[u8]> = TableDefinition::new("scientists");

/// Table for planets: PlanetId(u64) -> serialized Planet bytes
const PLANETS: TableDefinition<u64, &[u8]> = TableDefinition::new("planets");

/// Table for missions: MissionId(u64) -> serialized Mission bytes
const MISSIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("missions");

/// Foreign key index: (scientist_id, mission_id)
const SCIENTIST_MISSIONS: TableDefinition<(u64, u64), ()> =
    TableDefinition::new("scientist_missions");

/// Foreign key index: (planet_id, mission_id)
const PLANET_MISSIONS: TableDefinition<(u64, u64), ()> = TableDefinition::new("planet_missions");

/// Table for metadata: counter name -> next id
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_SCIENTIST_ID: &str = "next_scientist_id";
const NEXT_PLANET_ID: &str = "next_planet_id";
const NEXT_MISSION_ID: &str = "next_mission_id";

fn io_err(e: impl std::fmt::Display) -> CosmosError {
    CosmosError::IoError(e.to_string())
}

fn encode<T: Serialize>(row: &T) -> Result<Vec<u8>, CosmosError> {
    postcard::to_allocvec(row).map_err(|e| CosmosError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CosmosError> {
    postcard::from_bytes(bytes).map_err(|e| CosmosError::DeserializationError(e.to_string()))
}

/// A disk-backed catalog store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a catalog database at the given path.
    ///
    /// Creates every table on first open, so the schema exists before any
    /// request is served.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CosmosError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        let write_txn = db.begin_write().map_err(io_err)?;
        {
            write_txn.open_table(SCIENTISTS).map_err(io_err)?;
            write_txn.open_table(PLANETS).map_err(io_err)?;
            write_txn.open_table(MISSIONS).map_err(io_err)?;
            write_txn.open_table(SCIENTIST_MISSIONS).map_err(io_err)?;
            write_txn.open_table(PLANET_MISSIONS).map_err(io_err)?;
            write_txn.open_table(METADATA).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        Ok(Self { db })
    }

    /// Compact the database file. Returns whether any space was reclaimed.
    pub fn compact(&mut self) -> Result<bool, CosmosError> {
        self.db.compact().map_err(io_err)
    }

    /// Take the next id from a counter inside an open write transaction.
    fn allocate_id(
        txn: &WriteTransaction,
        counter: &'static str,
        table: &'static str,
    ) -> Result<u64, CosmosError> {
        let mut meta = txn.open_table(METADATA).map_err(io_err)?;
        let mut next = meta
            .get(counter)
            .map_err(io_err)?
            .map(|v| v.value())
            .unwrap_or(0);
        let id = next_id(&mut next, table)?;
        meta.insert(counter, next).map_err(io_err)?;
        Ok(id)
    }

    /// Read one row by id.
    fn get_row<T: DeserializeOwned>(
        &self,
        def: TableDefinition<'static, u64, &'static [u8]>,
        id: u64,
    ) -> Result<Option<T>, CosmosError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(def).map_err(io_err)?;
        table
            .get(id)
            .map_err(io_err)?
            .map(|data| decode(data.value()))
            .transpose()
    }

    /// Read every row of a table in id order.
    fn all_rows<T: DeserializeOwned>(
        &self,
        def: TableDefinition<'static, u64, &'static [u8]>,
    ) -> Result<Vec<T>, CosmosError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(def).map_err(io_err)?;

        let mut rows = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            rows.push(decode(value.value())?);
        }
        Ok(rows)
    }

    /// Missions referenced from an index table for one owner.
    fn indexed_missions(
        &self,
        index: TableDefinition<'static, (u64, u64), ()>,
        owner: u64,
    ) -> Result<Vec<Mission>, CosmosError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let index_table = read_txn.open_table(index).map_err(io_err)?;
        let missions_table = read_txn.open_table(MISSIONS).map_err(io_err)?;

        let mut missions = Vec::new();
        for entry in index_table
            .range((owner, 0u64)..=(owner, u64::MAX))
            .map_err(io_err)?
        {
            let (key, _) = entry.map_err(io_err)?;
            let (_owner, mission_id) = key.value();
            if let Some(data) = missions_table.get(mission_id).map_err(io_err)? {
                missions.push(decode(data.value())?);
            }
        }
        Ok(missions)
    }

    /// Delete every mission listed under `owner` in `index`, keeping both
    /// index tables in sync. Runs inside the caller's write transaction.
    fn cascade_missions(
        txn: &WriteTransaction,
        index: TableDefinition<'static, (u64, u64), ()>,
        owner: u64,
    ) -> Result<usize, CosmosError> {
        let mut mission_ids = Vec::new();
        {
            let index_table = txn.open_table(index).map_err(io_err)?;
            for entry in index_table
                .range((owner, 0u64)..=(owner, u64::MAX))
                .map_err(io_err)?
            {
                let (key, _) = entry.map_err(io_err)?;
                mission_ids.push(key.value().1);
            }
        }

        let mut missions_table = txn.open_table(MISSIONS).map_err(io_err)?;
        let mut scientist_index = txn.open_table(SCIENTIST_MISSIONS).map_err(io_err)?;
        let mut planet_index = txn.open_table(PLANET_MISSIONS).map_err(io_err)?;

        for &mission_id in &mission_ids {
            let mission: Option<Mission> = missions_table
                .remove(mission_id)
                .map_err(io_err)?
                .map(|data| decode(data.value()))
                .transpose()?;
            let (scientist_key, planet_key) = match mission {
                Some(mission) => (
                    (mission.scientist_id().value(), mission_id),
                    (mission.planet_id().value(), mission_id),
                ),
                // Dangling index entry: mission ids are unique, so clearing
                // (owner, id) from both indexes only touches this entry.
                None => ((owner, mission_id), (owner, mission_id)),
            };
            scientist_index.remove(scientist_key).map_err(io_err)?;
            planet_index.remove(planet_key).map_err(io_err)?;
        }
        Ok(mission_ids.len())
    }

    fn table_len(
        &self,
        def: TableDefinition<'static, u64, &'static [u8]>,
    ) -> Result<usize, CosmosError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(def).map_err(io_err)?;
        let count = table.len().map_err(io_err)?;
        Ok(count as usize)
    }
}

// =============================================================================
// CATALOGSTORE TRAIT IMPLEMENTATION
// =============================================================================

impl CatalogStore for RedbStore {
    fn insert_scientist(&mut self, scientist: Scientist) -> Result<Scientist, CosmosError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let id = Self::allocate_id(&write_txn, NEXT_SCIENTIST_ID, "scientists")?;
        let saved = scientist.with_id(ScientistId(id));
        {
            let mut table = write_txn.open_table(SCIENTISTS).map_err(io_err)?;
            table
                .insert(id, encode(&saved)?.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(saved)
    }

    fn scientist(&self, id: ScientistId) -> Result<Option<Scientist>, CosmosError> {
        self.get_row(SCIENTISTS, id.value())
    }

    fn scientists(&self) -> Result<Vec<Scientist>, CosmosError> {
        self.all_rows(SCIENTISTS)
    }

    fn update_scientist(&mut self, scientist: &Scientist) -> Result<(), CosmosError> {
        let id = scientist.id();
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(SCIENTISTS).map_err(io_err)?;
            let exists = table.get(id.value()).map_err(io_err)?.is_some();
            if !exists {
                return Err(CosmosError::ScientistNotFound(id));
            }
            table
                .insert(id.value(), encode(scientist)?.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    fn delete_scientist(&mut self, id: ScientistId) -> Result<usize, CosmosError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(SCIENTISTS).map_err(io_err)?;
            let removed = table.remove(id.value()).map_err(io_err)?.is_some();
            if !removed {
                return Err(CosmosError::ScientistNotFound(id));
            }
        }
        let cascaded = Self::cascade_missions(&write_txn, SCIENTIST_MISSIONS, id.value())?;
        write_txn.commit().map_err(io_err)?;
        Ok(cascaded)
    }

    fn insert_planet(&mut self, planet: Planet) -> Result<Planet, CosmosError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let id = Self::allocate_id(&write_txn, NEXT_PLANET_ID, "planets")?;
        let saved = planet.with_id(PlanetId(id));
        {
            let mut table = write_txn.open_table(PLANETS).map_err(io_err)?;
            table
                .insert(id, encode(&saved)?.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(saved)
    }

    fn planet(&self, id: PlanetId) -> Result<Option<Planet>, CosmosError> {
        self.get_row(PLANETS, id.value())
    }

    fn planets(&self) -> Result<Vec<Planet>, CosmosError> {
        self.all_rows(PLANETS)
    }

    fn delete_planet(&mut self, id: PlanetId) -> Result<usize, CosmosError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(PLANETS).map_err(io_err)?;
            let removed = table.remove(id.value()).map_err(io_err)?.is_some();
            if !removed {
                return Err(CosmosError::PlanetNotFound(id));
            }
        }
        let cascaded = Self::cascade_missions(&write_txn, PLANET_MISSIONS, id.value())?;
        write_txn.commit().map_err(io_err)?;
        Ok(cascaded)
    }

    fn insert_mission(&mut self, mission: Mission) -> Result<Mission, CosmosError> {
        let scientist_id = mission.scientist_id().value();
        let planet_id = mission.planet_id().value();

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let scientists = write_txn.open_table(SCIENTISTS).map_err(io_err)?;
            if scientists.get(scientist_id).map_err(io_err)?.is_none() {
                return Err(ValidationError::UnknownReference {
                    field: "scientist_id",
                    id: scientist_id,
                }
                .into());
            }
            let planets = write_txn.open_table(PLANETS).map_err(io_err)?;
            if planets.get(planet_id).map_err(io_err)?.is_none() {
                return Err(ValidationError::UnknownReference {
                    field: "planet_id",
                    id: planet_id,
                }
                .into());
            }
        }

        let id = Self::allocate_id(&write_txn, NEXT_MISSION_ID, "missions")?;
        let saved = mission.with_id(MissionId(id));
        {
            let mut missions = write_txn.open_table(MISSIONS).map_err(io_err)?;
            missions
                .insert(id, encode(&saved)?.as_slice())
                .map_err(io_err)?;
            let mut by_scientist = write_txn.open_table(SCIENTIST_MISSIONS).map_err(io_err)?;
            by_scientist.insert((scientist_id, id), ()).map_err(io_err)?;
            let mut by_planet = write_txn.open_table(PLANET_MISSIONS).map_err(io_err)?;
            by_planet.insert((planet_id, id), ()).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(saved)
    }

    fn missions_for_scientist(&self, id: ScientistId) -> Result<Vec<Mission>, CosmosError> {
        self.indexed_missions(SCIENTIST_MISSIONS, id.value())
    }

    fn missions_for_planet(&self, id: PlanetId) -> Result<Vec<Mission>, CosmosError> {
        self.indexed_missions(PLANET_MISSIONS, id.value())
    }

    fn counts(&self) -> Result<TableCounts, CosmosError> {
        Ok(TableCounts {
            scientists: self.table_len(SCIENTISTS)?,
            planets: self.table_len(PLANETS)?,
            missions: self.table_len(MISSIONS)?,
        })
    }
}
