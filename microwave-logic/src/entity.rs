use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::{GeoPoint, LocationComponent};

/// Primary key of a record in the backend
pub type EntityId = i64;

/// Convenience alias for UTC DT
pub type UtcDT = DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Building,
    Microwave,
}

impl EntityKind {
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Microwave => "microwave",
        }
    }

    pub const fn plural(self) -> &'static str {
        match self {
            Self::Building => "buildings",
            Self::Microwave => "microwaves",
        }
    }
}

/// Anything the locator can measure a distance to.
pub trait Locatable {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;
    /// Human readable name shown in popups and the info panel
    fn label(&self) -> &str;
    /// Where this entity is, [None] if the backend has no coordinates for it
    fn location(&self) -> Option<GeoPoint>;
    /// Extra line of info for the info panel
    fn detail(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub floors: Option<u32>,
    #[serde(default)]
    pub lat: Option<LocationComponent>,
    #[serde(default)]
    pub lng: Option<LocationComponent>,
}

impl Locatable for Building {
    const KIND: EntityKind = EntityKind::Building;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microwave {
    pub id: EntityId,
    /// The building this microwave is in, older records only have the name
    #[serde(default)]
    pub building_id: Option<EntityId>,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lat: Option<LocationComponent>,
    #[serde(default)]
    pub lng: Option<LocationComponent>,
    #[serde(default)]
    pub broken: bool,
    /// Submissions stay hidden from the public map until an admin approves them
    #[serde(default = "default_approved")]
    pub approved: bool,
    /// Filled in client-side from the report list, see [crate::reports::apply_report_counts]
    #[serde(default, rename = "report_amt")]
    pub report_count: u32,
}

const fn default_approved() -> bool {
    true
}

impl Microwave {
    pub fn status(&self) -> &'static str {
        if self.broken { "Broken" } else { "Working" }
    }
}

impl Locatable for Microwave {
    const KIND: EntityKind = EntityKind::Microwave;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.building
    }

    fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.lat, self.lng)
    }

    fn detail(&self) -> Option<String> {
        let floor = self
            .floor
            .map(|f| format!("Floor {f}, "))
            .unwrap_or_default();
        Some(format!(
            "{floor}{}, {} report(s)",
            self.status(),
            self.report_count
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A user report that a microwave isn't working
pub struct Report {
    pub id: EntityId,
    pub microwave_id: EntityId,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<UtcDT>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Body for submitting a new microwave, it will be pending until approved
pub struct NewMicrowave {
    pub building_id: Option<EntityId>,
    pub building: String,
    pub floor: Option<i32>,
    pub description: String,
    pub lat: LocationComponent,
    pub lng: LocationComponent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    pub microwave_id: EntityId,
    pub reason: Option<String>,
}
