//! # Output Views
//!
//! Per-endpoint output shapes for the three records.
//!
//! Each view is a plain struct, so which relationships appear in the output
//! is decided when the view is built, not at serialization time. No view
//! embeds a structure that could lead back to itself:
//!
//! | View               | Embeds                                      |
//! |--------------------|---------------------------------------------|
//! | `ScientistSummary` | nothing                                     |
//! | `PlanetSummary`    | nothing                                     |
//! | `ScientistDetail`  | missions, each with its planet summary      |
//! | `MissionView`      | owner summaries selected by `Expand`        |

use crate::model::{Mission, Planet, Scientist};
use serde::{Deserialize, Serialize};

// =============================================================================
// EXPANSION RULE
// =============================================================================

/// Which owners a mission view embeds.
///
/// An owner that is not expanded is represented by its id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Expand {
    pub scientist: bool,
    pub planet: bool,
}

impl Expand {
    /// Ids only.
    pub const NONE: Self = Self {
        scientist: false,
        planet: false,
    };

    /// Embed the planet; used inside a scientist, whose missions must not
    /// re-expand the scientist.
    pub const PLANET: Self = Self {
        scientist: false,
        planet: true,
    };

    /// Embed both owners; used for a standalone mission.
    pub const OWNERS: Self = Self {
        scientist: true,
        planet: true,
    };
}

// =============================================================================
// SCIENTIST VIEWS
// =============================================================================

/// Scientist without missions (list, create and patch responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScientistSummary {
    pub id: u64,
    pub name: String,
    pub field_of_study: String,
}

impl From<&Scientist> for ScientistSummary {
    fn from(scientist: &Scientist) -> Self {
        Self {
            id: scientist.id().value(),
            name: scientist.name().to_string(),
            field_of_study: scientist.field_of_study().to_string(),
        }
    }
}

/// Scientist with its missions (single fetch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScientistDetail {
    pub id: u64,
    pub name: String,
    pub field_of_study: String,
    pub missions: Vec<MissionView>,
}

impl ScientistDetail {
    /// Build the detail view. `missions` should already be shaped with
    /// `Expand::PLANET`.
    #[must_use]
    pub fn new(scientist: &Scientist, missions: Vec<MissionView>) -> Self {
        Self {
            id: scientist.id().value(),
            name: scientist.name().to_string(),
            field_of_study: scientist.field_of_study().to_string(),
            missions,
        }
    }
}

// =============================================================================
// PLANET VIEW
// =============================================================================

/// Planet without missions (list responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetSummary {
    pub id: u64,
    pub name: String,
    pub distance_from_earth: i64,
    pub nearest_star: String,
}

impl From<&Planet> for PlanetSummary {
    fn from(planet: &Planet) -> Self {
        Self {
            id: planet.id().value(),
            name: planet.name().to_string(),
            distance_from_earth: planet.distance_from_earth(),
            nearest_star: planet.nearest_star().to_string(),
        }
    }
}

// =============================================================================
// MISSION VIEW
// =============================================================================

/// A mission with optionally embedded owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionView {
    pub id: u64,
    pub name: String,
    pub scientist_id: u64,
    pub planet_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientist: Option<ScientistSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<PlanetSummary>,
}

impl MissionView {
    /// Mission with owner ids only.
    #[must_use]
    pub fn bare(mission: &Mission) -> Self {
        Self {
            id: mission.id().value(),
            name: mission.name().to_string(),
            scientist_id: mission.scientist_id().value(),
            planet_id: mission.planet_id().value(),
            scientist: None,
            planet: None,
        }
    }

    /// Embed the owning scientist.
    #[must_use]
    pub fn with_scientist(mut self, scientist: &Scientist) -> Self {
        self.scientist = Some(ScientistSummary::from(scientist));
        self
    }

    /// Embed the owning planet.
    #[must_use]
    pub fn with_planet(mut self, planet: &Planet) -> Self {
        self.planet = Some(PlanetSummary::from(planet));
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{MissionId, PlanetId, ScientistId};

    fn fixtures() -> (Scientist, Planet, Mission) {
        let scientist = Scientist::new("Vera Rubin", "Astronomy")
            .unwrap()
            .with_id(ScientistId(1));
        let planet = Planet::new("Kepler-22b", 620, "Kepler-22")
            .with_id(PlanetId(2));
        let mission = Mission::new("Rotation curves", ScientistId(1), PlanetId(2))
            .unwrap()
            .with_id(MissionId(3));
        (scientist, planet, mission)
    }

    #[test]
    fn bare_mission_has_ids_only() {
        let (_, _, mission) = fixtures();
        let view = MissionView::bare(&mission);
        assert_eq!(view.scientist_id, 1);
        assert_eq!(view.planet_id, 2);
        assert!(view.scientist.is_none() && view.planet.is_none());
    }

    #[test]
    fn detail_missions_embed_planet_only() {
        let (scientist, planet, mission) = fixtures();
        let detail = ScientistDetail::new(
            &scientist,
            vec![MissionView::bare(&mission).with_planet(&planet)],
        );

        assert_eq!(detail.missions.len(), 1);
        assert!(detail.missions[0].scientist.is_none());
        assert_eq!(
            detail.missions[0].planet.as_ref().map(|p| p.name.as_str()),
            Some("Kepler-22b")
        );
    }

    #[test]
    fn summaries_copy_columns() {
        let (scientist, planet, _) = fixtures();
        let s = ScientistSummary::from(&scientist);
        let p = PlanetSummary::from(&planet);
        assert_eq!((s.id, s.field_of_study.as_str()), (1, "Astronomy"));
        assert_eq!((p.id, p.distance_from_earth), (2, 620));
    }

    #[test]
    fn expand_presets() {
        assert_eq!(Expand::default(), Expand::NONE);
        assert!(Expand::PLANET.planet && !Expand::PLANET.scientist);
        assert!(Expand::OWNERS.planet && Expand::OWNERS.scientist);
    }
}
