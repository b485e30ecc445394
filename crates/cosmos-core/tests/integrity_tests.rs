//! # Integrity Tests (T0-T3)
//!
//! Catalog-level checks run against both backends.
//!
//! ## Tiers
//! - T0: Field validation
//! - T1: Referential integrity
//! - T2: Cascade delete
//! - T3: Persistence

#![allow(clippy::unwrap_used, clippy::panic)]

use cosmos_core::{Catalog, CosmosError, FieldValue, PlanetId, ScientistId, ValidationError};
use tempfile::TempDir;

/// Both backends, the redb one rooted in a temp dir kept alive by the caller.
fn catalogs() -> (TempDir, Vec<Catalog>) {
    let temp = tempfile::tempdir().expect("temp dir");
    let redb = Catalog::with_redb(temp.path().join("catalog.redb")).expect("open db");
    (temp, vec![Catalog::new(), redb])
}

fn with_owners(catalog: &mut Catalog) -> (ScientistId, PlanetId) {
    let scientist = catalog
        .create_scientist("Cecilia Payne", "Astrophysics")
        .unwrap();
    let planet = catalog.create_planet("Venus", 41, "Sun").unwrap();
    (ScientistId(scientist.id), PlanetId(planet.id))
}

// =============================================================================
// TIER T0: FIELD VALIDATION
// =============================================================================

mod t0_field_validation {
    use super::*;

    /// T0.1: Empty scientist fields are rejected at creation.
    #[test]
    fn empty_fields_rejected() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            for (name, field) in [("", "Physics"), ("Lise Meitner", ""), ("", "")] {
                let err = catalog.create_scientist(name, field).unwrap_err();
                assert!(matches!(
                    err,
                    CosmosError::Validation(ValidationError::Empty { .. })
                ));
            }
            assert_eq!(catalog.status().unwrap().scientists, 0);
        }
    }

    /// T0.2: Later assignments are validated too.
    #[test]
    fn patch_that_clears_field_rejected() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            let (scientist, _) = with_owners(catalog);
            let err = catalog
                .patch_scientist(scientist, &[("name".to_string(), FieldValue::from(""))])
                .unwrap_err();
            assert!(err.is_validation());
            assert_eq!(
                catalog.scientist_detail(scientist).unwrap().name,
                "Cecilia Payne"
            );
        }
    }

    /// T0.3: The identifier cannot be overwritten.
    #[test]
    fn identifier_is_read_only() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            let (scientist, _) = with_owners(catalog);
            let err = catalog
                .patch_scientist(scientist, &[("id".to_string(), FieldValue::Other)])
                .unwrap_err();
            assert!(matches!(
                err,
                CosmosError::Validation(ValidationError::ReadOnlyField { .. })
            ));
            assert_eq!(catalog.list_scientists().unwrap()[0].id, scientist.0);
        }
    }

    /// T0.4: Text columns have no length limit.
    #[test]
    fn long_text_accepted() {
        let (_temp, mut catalogs) = catalogs();
        let long = "A".repeat(300);
        for catalog in &mut catalogs {
            let scientist = catalog.create_scientist(&long, "Astronomy").unwrap();
            let id = ScientistId(scientist.id);
            assert_eq!(scientist.name, long);

            let patched = catalog
                .patch_scientist(
                    id,
                    &[("field_of_study".to_string(), FieldValue::from(long.as_str()))],
                )
                .unwrap();
            assert_eq!(patched.field_of_study, long);

            let planet = catalog.create_planet(&long, 7, &long).unwrap();
            let mission = catalog
                .create_mission(&long, id, PlanetId(planet.id))
                .unwrap();
            assert_eq!(mission.name, long);
            assert_eq!(catalog.scientist_detail(id).unwrap().missions[0].name, long);
        }
    }
}

// =============================================================================
// TIER T1: REFERENTIAL INTEGRITY
// =============================================================================

mod t1_referential_integrity {
    use super::*;

    /// T1.1: A mission needs a live scientist.
    #[test]
    fn unknown_scientist_rejected() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            let (_, planet) = with_owners(catalog);
            let err = catalog
                .create_mission("Transit", ScientistId(404), planet)
                .unwrap_err();
            assert!(err.is_validation());
            assert_eq!(catalog.status().unwrap().missions, 0);
        }
    }

    /// T1.2: A mission needs a live planet.
    #[test]
    fn unknown_planet_rejected() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            let (scientist, _) = with_owners(catalog);
            let err = catalog
                .create_mission("Transit", scientist, PlanetId(404))
                .unwrap_err();
            assert!(err.is_validation());
        }
    }

    /// T1.3: A valid mission embeds both owners.
    #[test]
    fn valid_mission_embeds_owners() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            let (scientist, planet) = with_owners(catalog);
            let mission = catalog
                .create_mission("Transit", scientist, planet)
                .unwrap();
            assert_eq!(mission.id, 1);
            assert_eq!(
                mission.scientist.map(|s| s.name),
                Some("Cecilia Payne".to_string())
            );
            assert_eq!(mission.planet.map(|p| p.name), Some("Venus".to_string()));
        }
    }
}

// =============================================================================
// TIER T2: CASCADE DELETE
// =============================================================================

mod t2_cascade_delete {
    use super::*;

    /// T2.1: Deleting a scientist removes its missions only.
    #[test]
    fn scientist_delete_cascades() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            let (scientist, planet) = with_owners(catalog);
            let other = ScientistId(
                catalog
                    .create_scientist("Annie Cannon", "Spectroscopy")
                    .unwrap()
                    .id,
            );
            catalog.create_mission("A", scientist, planet).unwrap();
            catalog.create_mission("B", other, planet).unwrap();

            assert_eq!(catalog.delete_scientist(scientist).unwrap(), 1);
            assert_eq!(catalog.status().unwrap().missions, 1);
            assert_eq!(catalog.scientist_detail(other).unwrap().missions.len(), 1);
        }
    }

    /// T2.2: Deleting a planet removes its missions from every scientist.
    #[test]
    fn planet_delete_cascades() {
        let (_temp, mut catalogs) = catalogs();
        for catalog in &mut catalogs {
            let (scientist, planet) = with_owners(catalog);
            catalog.create_mission("A", scientist, planet).unwrap();
            catalog.create_mission("B", scientist, planet).unwrap();

            assert_eq!(catalog.delete_planet(planet).unwrap(), 2);
            assert!(catalog.scientist_detail(scientist).unwrap().missions.is_empty());
            assert!(catalog.list_planets().unwrap().is_empty());
        }
    }
}

// =============================================================================
// TIER T3: PERSISTENCE
// =============================================================================

mod t3_persistence {
    use super::*;

    /// T3.1: A redb catalog survives reopening.
    #[test]
    fn redb_catalog_survives_reopen() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("catalog.redb");

        let scientist = {
            let mut catalog = Catalog::with_redb(&path).unwrap();
            assert!(catalog.is_persistent());
            let (scientist, planet) = with_owners(&mut catalog);
            catalog.create_mission("Magellan", scientist, planet).unwrap();
            catalog
                .patch_scientist(scientist, &[("name".to_string(), "C. Payne".into())])
                .unwrap();
            scientist
        };

        let catalog = Catalog::with_redb(&path).unwrap();
        let detail = catalog.scientist_detail(scientist).unwrap();
        assert_eq!(detail.name, "C. Payne");
        assert_eq!(detail.missions.len(), 1);
        assert_eq!(detail.missions[0].name, "Magellan");
    }
}
