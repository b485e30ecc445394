//! # API Request/Response Types
//!
//! JSON structures for the HTTP API that are not core views.

use cosmos_core::{FieldValue, PlanetId, ScientistId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of every 400 response. Field-level detail is not exposed.
pub const VALIDATION_ERRORS: &str = "validation errors";

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSES
// =============================================================================

/// `{"error": "..."}`, returned with 404.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn not_found(entity: &str) -> Self {
        Self {
            error: format!("{} not found", entity),
        }
    }
}

/// `{"errors": [...]}`, returned with 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}

impl Default for ValidationErrorResponse {
    fn default() -> Self {
        Self {
            errors: vec![VALIDATION_ERRORS.to_string()],
        }
    }
}

// =============================================================================
// SCIENTIST REQUESTS
// =============================================================================

/// `POST /scientists` body. Absent fields fail validation in the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateScientistRequest {
    pub name: Option<String>,
    pub field_of_study: Option<String>,
}

impl CreateScientistRequest {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn field_of_study(&self) -> &str {
        self.field_of_study.as_deref().unwrap_or_default()
    }
}

/// Convert a `PATCH /scientists/{id}` body into ordered field assignments.
///
/// Every key is kept; deciding which fields are assignable is the record's
/// job, so unknown keys surface as validation errors there.
pub fn field_assignments(body: Map<String, Value>) -> Vec<(String, FieldValue)> {
    body.into_iter()
        .map(|(field, value)| {
            let value = match value {
                Value::String(text) => FieldValue::Text(text),
                Value::Null => FieldValue::Null,
                _ => FieldValue::Other,
            };
            (field, value)
        })
        .collect()
}

// =============================================================================
// MISSION REQUEST
// =============================================================================

/// `POST /missions` body. Absent ids become zero, which validation rejects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMissionRequest {
    pub name: Option<String>,
    pub scientist_id: Option<u64>,
    pub planet_id: Option<u64>,
}

impl CreateMissionRequest {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn scientist_id(&self) -> ScientistId {
        ScientistId(self.scientist_id.unwrap_or_default())
    }

    pub fn planet_id(&self) -> PlanetId {
        PlanetId(self.planet_id.unwrap_or_default())
    }
}
