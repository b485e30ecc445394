//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::{Backend, Settings, StorageSettings};
use crate::error::AppError;
use cosmos_core::{Catalog, CosmosError, PlanetId, ScientistId, TableCounts};

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(settings: &Settings, seed: bool) -> Result<(), AppError> {
    let mut catalog = open_catalog(&settings.storage)?;
    if seed && catalog.status()? == TableCounts::default() {
        let counts = seed_demo(&mut catalog)?;
        tracing::info!(
            scientists = counts.scientists,
            planets = counts.planets,
            missions = counts.missions,
            "Seeded demo catalog"
        );
    }

    println!("Cosmos Mission Catalog Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", settings.server.addr());
    println!("  Backend:  {}", settings.storage.backend);
    println!("  Database: {:?}", settings.storage.database);
    println!();
    println!("Endpoints:");
    println!("  GET    /scientists       - List scientists");
    println!("  POST   /scientists       - Create a scientist");
    println!("  GET    /scientists/{{id}}  - Scientist with missions");
    println!("  PATCH  /scientists/{{id}}  - Update a scientist");
    println!("  DELETE /scientists/{{id}}  - Delete a scientist");
    println!("  GET    /planets          - List planets");
    println!("  POST   /missions         - Create a mission");
    println!("  GET    /health           - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&settings.server.addr(), catalog, &settings.http).await?;
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show row counts.
pub fn cmd_status(storage: &StorageSettings, json_mode: bool) -> Result<(), AppError> {
    let catalog = open_catalog(storage)?;
    let counts = catalog.status()?;

    if json_mode {
        let output = serde_json::json!({
            "database": storage.database.to_string_lossy(),
            "backend": storage.backend.to_string(),
            "scientists": counts.scientists,
            "planets": counts.planets,
            "missions": counts.missions,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Cosmos Catalog Status");
    println!("=====================");
    println!("Database: {:?}", storage.database);
    println!("Backend:  {}", storage.backend);
    println!();
    print_counts(&counts);

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database.
pub fn cmd_init(storage: &StorageSettings, force: bool) -> Result<(), AppError> {
    if storage.backend == Backend::Memory {
        return Err(AppError::Usage(
            "The memory backend has no database to initialize.".to_string(),
        ));
    }

    let path = &storage.database;
    if path.exists() {
        if !force {
            return Err(AppError::Usage(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(path)?;
        tracing::info!("Removed existing database at {:?}", path);
    }

    Catalog::with_redb(path)?;
    println!("Initialized new redb database at {:?}", path);
    Ok(())
}

// =============================================================================
// SEED COMMAND
// =============================================================================

/// Insert the demo data set.
pub fn cmd_seed(storage: &StorageSettings, json_mode: bool) -> Result<(), AppError> {
    let mut catalog = open_catalog(storage)?;
    if !catalog.is_persistent() {
        tracing::warn!("Seeding the memory backend; rows are dropped on exit");
    }
    let counts = seed_demo(&mut catalog)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&counts).unwrap_or_default()
        );
    } else {
        println!("Seeded demo data. Catalog now holds:");
        print_counts(&counts);
    }
    Ok(())
}

/// Insert three scientists, three planets and four missions.
///
/// Returns the row counts afterwards. Rows are appended, so seeding twice
/// yields duplicates under new ids.
pub fn seed_demo(catalog: &mut Catalog) -> Result<TableCounts, CosmosError> {
    let mut scientists = Vec::new();
    for (name, field) in [
        ("Mae Jemison", "Astronautics"),
        ("Carl Sagan", "Planetary Science"),
        ("Vera Rubin", "Astronomy"),
    ] {
        scientists.push(ScientistId(catalog.create_scientist(name, field)?.id));
    }

    let mut planets = Vec::new();
    for (name, distance, star) in [
        ("Mars", 140, "Sun"),
        ("Proxima b", 40_140, "Proxima Centauri"),
        ("TRAPPIST-1e", 376_000, "TRAPPIST-1"),
    ] {
        planets.push(PlanetId(catalog.create_planet(name, distance, star)?.id));
    }

    for (name, scientist, planet) in [
        ("Red Horizon", 0, 0),
        ("Pale Blue Return", 1, 0),
        ("Centauri Relay", 1, 1),
        ("Dark Halo Survey", 2, 2),
    ] {
        catalog.create_mission(name, scientists[scientist], planets[planet])?;
    }

    catalog.status()
}

// =============================================================================
// PLANET COMMANDS
// =============================================================================

/// Insert a planet.
pub fn cmd_add_planet(
    storage: &StorageSettings,
    json_mode: bool,
    name: &str,
    distance: i64,
    star: &str,
) -> Result<(), AppError> {
    let mut catalog = open_catalog(storage)?;
    let planet = catalog.create_planet(name, distance, star)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&planet).unwrap_or_default()
        );
    } else {
        println!("Added planet {} ({})", planet.id, planet.name);
    }
    Ok(())
}

/// Delete a planet and its missions.
pub fn cmd_remove_planet(
    storage: &StorageSettings,
    json_mode: bool,
    id: u64,
) -> Result<(), AppError> {
    let mut catalog = open_catalog(storage)?;
    let cascaded = catalog.delete_planet(PlanetId(id))?;

    if json_mode {
        let output = serde_json::json!({
            "removed": id,
            "missions_removed": cascaded,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Removed planet {} and {} mission(s)", id, cascaded);
    }
    Ok(())
}

// =============================================================================
// COMPACT COMMAND
// =============================================================================

/// Compact the redb database file.
pub fn cmd_compact(storage: &StorageSettings, json_mode: bool) -> Result<(), AppError> {
    if storage.backend == Backend::Memory {
        return Err(AppError::Usage(
            "The memory backend has no database to compact.".to_string(),
        ));
    }

    let mut catalog = open_catalog(storage)?;
    let reclaimed = catalog.compact()?;
    tracing::info!(reclaimed, "Compacted database at {:?}", storage.database);

    if json_mode {
        let output = serde_json::json!({
            "database": storage.database.to_string_lossy(),
            "reclaimed": reclaimed,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else if reclaimed {
        println!("Compacted {:?}", storage.database);
    } else {
        println!("{:?} was already compact", storage.database);
    }
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the catalog selected by the storage settings.
pub fn open_catalog(storage: &StorageSettings) -> Result<Catalog, CosmosError> {
    match storage.backend {
        Backend::Redb => Catalog::with_redb(&storage.database),
        Backend::Memory => Ok(Catalog::new()),
    }
}

fn print_counts(counts: &TableCounts) {
    println!("Scientists: {}", counts.scientists);
    println!("Planets:    {}", counts.planets);
    println!("Missions:   {}", counts.missions);
}

// =============================================================================
// TESTS
// =============================================================================
