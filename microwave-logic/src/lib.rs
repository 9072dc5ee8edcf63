mod admin;
mod api;
mod entity;
mod location;
pub mod locator;
mod map;
pub mod reports;
mod session;

pub use admin::AdminConsole;
pub use api::MicrowaveApi;
pub use entity::{
    Building, EntityId, EntityKind, Locatable, Microwave, NewMicrowave, NewReport, Report, UtcDT,
};
pub use location::{EARTH_RADIUS_METERS, GeoPoint, LocationService, Meters};
pub use locator::{LocatorError, RankedEntity};
pub use map::{InfoPanel, MapPresenter, Marker, MicrowaveMap};
pub use reports::{ReportSummary, ReportWindow};
pub use session::NearestSession;

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::{Context, anyhow, bail};
}
