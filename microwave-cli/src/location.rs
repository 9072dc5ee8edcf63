use microwave_logic::{GeoPoint, LocationService};

/// Middle of campus, used when no position is given
pub const CAMPUS_CENTER: GeoPoint = GeoPoint::new(53.5232, -113.5263);

/// A terminal has no GPS, so the user tells us where they are
pub struct FixedLocation(pub GeoPoint);

impl LocationService for FixedLocation {
    fn get_loc(&self) -> Option<GeoPoint> {
        Some(self.0)
    }
}
