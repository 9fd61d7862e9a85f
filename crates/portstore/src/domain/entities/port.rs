//! Port - Shipping Port Reference Record
//!
//! Pure domain entity without infrastructure dependencies.
//!
//! Fields are private so the required-field invariants established by the
//! constructor cannot be broken afterwards. Sequence fields are only handed
//! out as shared slices; anything that needs to keep them clones.

use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;

/// Raw attribute set used to build a [`Port`]
///
/// Nothing here is validated until it goes through [`Port::from_fields`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortFields {
    pub id: String,
    pub name: String,
    pub code: String,
    pub city: String,
    pub country: String,
    pub alias: Vec<String>,
    pub regions: Vec<String>,
    /// Conventionally `[longitude, latitude]`
    pub coordinates: Vec<f64>,
    pub province: String,
    pub timezone: String,
    pub unlocs: Vec<String>,
}

/// Port - validated shipping port record
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: String,
    name: String,
    code: String,
    city: String,
    country: String,
    alias: Vec<String>,
    regions: Vec<String>,
    coordinates: Vec<f64>,
    province: String,
    timezone: String,
    unlocs: Vec<String>,
    /// Set by the store on first write, `None` until then
    created_at: Option<DateTime<Utc>>,
    /// Refreshed by the store on every write
    updated_at: Option<DateTime<Utc>>,
}

impl Port {
    /// Create a new Port, rejecting empty id, name, city or country
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        alias: Vec<String>,
        regions: Vec<String>,
        coordinates: Vec<f64>,
        province: impl Into<String>,
        timezone: impl Into<String>,
        unlocs: Vec<String>,
    ) -> Result<Self, DomainError> {
        Self::from_fields(PortFields {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            city: city.into(),
            country: country.into(),
            alias,
            regions,
            coordinates,
            province: province.into(),
            timezone: timezone.into(),
            unlocs,
        })
    }

    /// Validate an attribute set and build a Port from it
    pub fn from_fields(fields: PortFields) -> Result<Self, DomainError> {
        require("id", &fields.id)?;
        require("name", &fields.name)?;
        require("city", &fields.city)?;
        require("country", &fields.country)?;

        Ok(Self {
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
            created_at: None,
            updated_at: None,
        })
    }

    /// Attach store-managed timestamps
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    /// Change the name of this instance only
    ///
    /// Stored copies are unaffected until the record is upserted again.
    pub fn rename(&mut self, new_name: impl Into<String>) -> Result<(), DomainError> {
        let new_name = new_name.into();
        require("name", &new_name)?;
        self.name = new_name;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn alias(&self) -> &[String] {
        &self.alias
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn unlocs(&self) -> &[String] {
        &self.unlocs
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Owned copy of the attribute set, timestamps excluded
    pub fn to_fields(&self) -> PortFields {
        PortFields {
            id: self.id.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            alias: self.alias.clone(),
            regions: self.regions.clone(),
            coordinates: self.coordinates.clone(),
            province: self.province.clone(),
            timezone: self.timezone.clone(),
            unlocs: self.unlocs.clone(),
        }
    }

    /// Consume the record into its attribute set, timestamps excluded
    pub fn into_fields(self) -> PortFields {
        PortFields {
            id: self.id,
            name: self.name,
            code: self.code,
            city: self.city,
            country: self.country,
            alias: self.alias,
            regions: self.regions,
            coordinates: self.coordinates,
            province: self.province,
            timezone: self.timezone,
            unlocs: self.unlocs,
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation(format!(
            "port {} must not be empty",
            field
        )));
    }
    Ok(())
}
