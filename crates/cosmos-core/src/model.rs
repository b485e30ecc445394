//! # Record Types
//!
//! The three persisted entities and their field-level validation.
//!
//! Fields are private: every write goes through a constructor or a setter
//! that runs the validator for that field, so a record held by the caller
//! always satisfies the column rules.
//!
//! ```text
//!   Scientist 1 ──< Mission >── 1 Planet
//! ```
//!
//! Mission is the join entity between scientists and planets. Deleting
//! either owner cascades to its missions (enforced by the stores).

use crate::validation::{require_reference, require_text};
use crate::{MissionId, PlanetId, ScientistId, ValidationError};
use serde::{Deserialize, Serialize};

// =============================================================================
// FIELD ASSIGNMENT
// =============================================================================

/// A value assigned to a named field by a partial update.
///
/// Partial updates arrive as untyped field maps; the caller classifies each
/// value before it reaches the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A string value.
    Text(String),
    /// An explicit null.
    Null,
    /// Any non-string value (number, bool, array, object).
    Other,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// =============================================================================
// SCIENTIST
// =============================================================================

/// A scientist. Owns zero or more missions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scientist {
    id: ScientistId,
    name: String,
    field_of_study: String,
}

impl Scientist {
    /// Build an unsaved scientist. Both fields are required.
    pub fn new(name: &str, field_of_study: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ScientistId::default(),
            name: require_text("name", name)?,
            field_of_study: require_text("field_of_study", field_of_study)?,
        })
    }

    #[must_use]
    pub fn id(&self) -> ScientistId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field_of_study(&self) -> &str {
        &self.field_of_study
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = require_text("name", name)?;
        Ok(())
    }

    pub fn set_field_of_study(&mut self, field_of_study: &str) -> Result<(), ValidationError> {
        self.field_of_study = require_text("field_of_study", field_of_study)?;
        Ok(())
    }

    /// Assign a field by name.
    ///
    /// Only `name` and `field_of_study` are assignable. `id` and the
    /// `missions` relationship are read-only; any other name is unknown.
    /// A null clears the field and therefore fails presence validation.
    pub fn assign(&mut self, field: &str, value: &FieldValue) -> Result<(), ValidationError> {
        let text = match (field, value) {
            ("id" | "missions", _) => {
                return Err(ValidationError::ReadOnlyField {
                    field: field.to_string(),
                });
            }
            ("name" | "field_of_study", FieldValue::Text(text)) => text.as_str(),
            ("name" | "field_of_study", FieldValue::Null) => "",
            ("name" | "field_of_study", FieldValue::Other) => {
                return Err(ValidationError::WrongType {
                    field: field.to_string(),
                });
            }
            _ => {
                return Err(ValidationError::UnknownField {
                    field: field.to_string(),
                });
            }
        };

        if field == "name" {
            self.set_name(text)
        } else {
            self.set_field_of_study(text)
        }
    }

    /// Apply a batch of assignments, all or nothing.
    ///
    /// Every assignment is validated against a working copy; `self` is only
    /// replaced once all of them succeed.
    pub fn apply<'a, I>(&mut self, assignments: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a FieldValue)>,
    {
        let mut draft = self.clone();
        for (field, value) in assignments {
            draft.assign(field, value)?;
        }
        *self = draft;
        Ok(())
    }

    pub(crate) fn with_id(mut self, id: ScientistId) -> Self {
        self.id = id;
        self
    }
}

// =============================================================================
// PLANET
// =============================================================================

/// A planet. Owns zero or more missions.
///
/// Planet columns carry no presence rule, so construction cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    id: PlanetId,
    name: String,
    distance_from_earth: i64,
    nearest_star: String,
}

impl Planet {
    /// Build an unsaved planet.
    #[must_use]
    pub fn new(name: &str, distance_from_earth: i64, nearest_star: &str) -> Self {
        Self {
            id: PlanetId::default(),
            name: name.to_string(),
            distance_from_earth,
            nearest_star: nearest_star.to_string(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlanetId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn distance_from_earth(&self) -> i64 {
        self.distance_from_earth
    }

    #[must_use]
    pub fn nearest_star(&self) -> &str {
        &self.nearest_star
    }

    pub(crate) fn with_id(mut self, id: PlanetId) -> Self {
        self.id = id;
        self
    }
}

// =============================================================================
// MISSION
// =============================================================================

/// A mission: one scientist visiting one planet.
///
/// Construction checks that both foreign keys are present. Whether they
/// resolve to live rows is checked by the store inside the insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    id: MissionId,
    name: String,
    scientist_id: ScientistId,
    planet_id: PlanetId,
}

impl Mission {
    /// Build an unsaved mission.
    pub fn new(
        name: &str,
        scientist_id: ScientistId,
        planet_id: PlanetId,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: MissionId::default(),
            name: require_text("name", name)?,
            scientist_id: ScientistId(require_reference("scientist_id", scientist_id.0)?),
            planet_id: PlanetId(require_reference("planet_id", planet_id.0)?),
        })
    }

    #[must_use]
    pub fn id(&self) -> MissionId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn scientist_id(&self) -> ScientistId {
        self.scientist_id
    }

    #[must_use]
    pub fn planet_id(&self) -> PlanetId {
        self.planet_id
    }

    pub(crate) fn with_id(mut self, id: MissionId) -> Self {
        self.id = id;
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
