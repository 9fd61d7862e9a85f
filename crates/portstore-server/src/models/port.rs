//! Port - Wire representation of a shipping port

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use portstore::{Port, PortFields};

/// Port attributes as they travel over the wire
///
/// Every field is optional on input; required-field checks happen when the
/// payload is turned into a domain [`Port`]. In the bulk ingestion format
/// the `id` comes from the object key and any `id` in the value is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PortPayload {
    pub id: String,
    pub name: String,
    pub code: String,
    pub city: String,
    pub country: String,
    pub alias: Vec<String>,
    pub regions: Vec<String>,
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
    pub province: String,
    pub timezone: String,
    pub unlocs: Vec<String>,
}

impl PortPayload {
    /// Attribute set keyed by `id`, overriding whatever the payload carried
    pub fn into_fields_with_id(self, id: String) -> PortFields {
        PortFields {
            id,
            ..PortFields::from(self)
        }
    }
}

impl From<PortPayload> for PortFields {
    fn from(payload: PortPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            code: payload.code,
            city: payload.city,
            country: payload.country,
            alias: payload.alias,
            regions: payload.regions,
            coordinates: payload.coordinates,
            province: payload.province,
            timezone: payload.timezone,
            unlocs: payload.unlocs,
        }
    }
}

/// Port response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PortResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub city: String,
    pub country: String,
    pub alias: Vec<String>,
    pub regions: Vec<String>,
    pub coordinates: Vec<f64>,
    pub province: String,
    pub timezone: String,
    pub unlocs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Port> for PortResponse {
    fn from(port: Port) -> Self {
        let created_at = port.created_at();
        let updated_at = port.updated_at();
        let fields = port.into_fields();
        Self {
            id: fields.id,
            name: fields.name,
            code: fields.code,
            city: fields.city,
            country: fields.country,
            alias: fields.alias,
            regions: fields.regions,
            coordinates: fields.coordinates,
            province: fields.province,
            timezone: fields.timezone,
            unlocs: fields.unlocs,
            created_at,
            updated_at,
        }
    }
}

/// Query parameters for single-port lookup
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PortQuery {
    /// Port identifier (e.g. `USNYC`)
    pub id: Option<String>,
}

/// Query parameters for bulk deletion
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeletePortsQuery {
    /// Must be `true` to delete every port
    pub all: Option<String>,
}

impl DeletePortsQuery {
    pub fn confirms_all(&self) -> bool {
        self.all.as_deref() == Some("true")
    }
}

/// Port count response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: usize,
}

/// Bulk ingestion summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    pub total_ports: usize,
}
