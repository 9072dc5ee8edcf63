use serde::{Deserialize, Serialize};

/// A "part" of a location
pub type LocationComponent = f64;

/// Distance along the earth's surface, in meters
pub type Meters = f64;

/// Mean earth radius used for great-circle distances, matches what Leaflet uses for `distanceTo`
pub const EARTH_RADIUS_METERS: Meters = 6_371_000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Some location in the world as gotten from a Geolocation API or the backend
pub struct GeoPoint {
    /// Latitude
    pub lat: LocationComponent,
    /// Longitude
    pub lng: LocationComponent,
}

impl GeoPoint {
    pub const fn new(lat: LocationComponent, lng: LocationComponent) -> Self {
        Self { lat, lng }
    }

    /// Build a point out of two optional coordinates, the backend may leave either one null
    pub fn from_parts(
        lat: Option<LocationComponent>,
        lng: Option<LocationComponent>,
    ) -> Option<Self> {
        Some(Self::new(lat?, lng?)).filter(GeoPoint::is_finite)
    }

    /// Whether both coordinates are real numbers, distances to anything else are NaN
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Great-circle distance to `other` using the haversine formula
    pub fn distance_to(&self, other: &GeoPoint) -> Meters {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = ((d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }
}

pub trait LocationService {
    /// The user's current position, [None] if it couldn't be determined
    fn get_loc(&self) -> Option<GeoPoint>;
}
