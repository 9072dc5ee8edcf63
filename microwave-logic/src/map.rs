use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    api::MicrowaveApi,
    entity::{Building, EntityId, EntityKind, Locatable, Microwave, NewMicrowave, NewReport},
    location::{GeoPoint, LocationService, Meters},
    locator::{LocatorError, RankedEntity},
    prelude::*,
    reports::{self, ReportWindow},
    session::NearestSession,
};

/// Whatever is drawing the map. Called every time the selected entity changes.
pub trait MapPresenter {
    /// Draw a line from the user to the selected entity, replacing any previous line
    fn show_connector(&self, from: GeoPoint, to: GeoPoint);
    /// Replace the contents of the info panel
    fn show_info(&self, panel: &InfoPanel);
    /// Show a non-fatal message to the user
    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// What the info panel shows for the selected entity
pub struct InfoPanel {
    pub kind: EntityKind,
    pub id: EntityId,
    pub label: String,
    pub detail: Option<String>,
    pub location: GeoPoint,
    pub distance: Meters,
    /// Zero-based index of this entity in the ranking
    pub position: usize,
    pub total: usize,
}

impl InfoPanel {
    fn new<T: Locatable>(ranked: &RankedEntity<T>, position: usize, total: usize) -> Self {
        Self {
            kind: T::KIND,
            id: ranked.entity.id(),
            label: ranked.entity.label().to_string(),
            detail: ranked.entity.detail(),
            location: ranked.location,
            distance: ranked.distance,
            position,
            total,
        }
    }

    /// Distance in kilometers, to two decimal places
    pub fn distance_km(&self) -> String {
        format!("{:.2}", self.distance / 1000.0)
    }

    pub fn maps_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.location.lat, self.location.lng
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Marker {
    Building {
        building: Building,
        microwave_count: u32,
    },
    Microwave(Microwave),
}

impl Marker {
    pub fn location(&self) -> Option<GeoPoint> {
        match self {
            Self::Building { building, .. } => building.location(),
            Self::Microwave(microwave) => microwave.location(),
        }
    }

    /// Text shown when the marker is clicked
    pub fn popup(&self) -> String {
        match self {
            Self::Building {
                building,
                microwave_count,
            } => {
                let floors = building
                    .floors
                    .map(|f| format!("{f} floor(s)\n"))
                    .unwrap_or_default();
                format!(
                    "{name}\n{floors}Currently {microwave_count} microwave(s) located in {name}",
                    name = building.name
                )
            }
            Self::Microwave(microwave) => {
                let floor = microwave
                    .floor
                    .map(|f| format!(", Floor {f}"))
                    .unwrap_or_default();
                format!(
                    "{}{floor}\nStatus: {}\nReports: {}",
                    microwave.building,
                    microwave.status(),
                    microwave.report_count
                )
            }
        }
    }
}

#[derive(Debug, Default)]
enum Selection {
    #[default]
    Nothing,
    Buildings(NearestSession<Building>),
    Microwaves(NearestSession<Microwave>),
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Next,
    Previous,
}

fn notice_text(kind: EntityKind, err: LocatorError) -> String {
    match err {
        LocatorError::NoMoreEntities => format!("No more {}.", kind.plural()),
        LocatorError::NoCloserEntity => format!("No closer {}.", kind.singular()),
        LocatorError::OutOfRange { .. } => format!("No {} selected.", kind.singular()),
    }
}

fn start_session<T: Locatable + Clone>(
    reference: GeoPoint,
    entities: &[T],
) -> (NearestSession<T>, Option<InfoPanel>) {
    let mut session = NearestSession::new();
    session.relocate(Some(reference), entities);
    let (position, total) = session.position();
    let first = session
        .current()
        .map(|ranked| InfoPanel::new(ranked, position, total));
    (session, first)
}

fn step_session<T: Locatable + Clone>(
    session: &mut NearestSession<T>,
    step: Step,
) -> Result<InfoPanel, LocatorError> {
    let selected = match step {
        Step::Next => session.next(),
        Step::Previous => session.previous(),
    }?
    .clone();
    let (position, total) = session.position();
    Ok(InfoPanel::new(&selected, position, total))
}

/// The public map, fetches from [MicrowaveApi], gets the user's position with
/// [LocationService], and pushes what should be displayed to a [MapPresenter].
pub struct MicrowaveMap<A: MicrowaveApi, L: LocationService, P: MapPresenter> {
    api: Arc<A>,
    location: L,
    presenter: P,
    report_window: ReportWindow,
    selection: RwLock<Selection>,
}

impl<A: MicrowaveApi, L: LocationService, P: MapPresenter> MicrowaveMap<A, L, P> {
    pub fn new(api: Arc<A>, location: L, presenter: P) -> Self {
        Self {
            api,
            location,
            presenter,
            report_window: ReportWindow::default(),
            selection: RwLock::new(Selection::default()),
        }
    }

    /// Only count reports within this window on microwave markers
    pub fn with_report_window(mut self, window: ReportWindow) -> Self {
        self.report_window = window;
        self
    }

    async fn microwaves_with_reports(&self) -> Result<Vec<Microwave>> {
        let mut microwaves = self
            .api
            .microwaves()
            .await
            .context("Failed to fetch microwaves")?;
        let reports = self
            .api
            .reports()
            .await
            .context("Failed to fetch reports")?;
        let counts = reports::report_counts(&reports, self.report_window, Utc::now());
        reports::apply_report_counts(&mut microwaves, &counts);
        Ok(microwaves)
    }

    /// Everything that should be plotted on the map, buildings first
    pub async fn load_markers(&self) -> Result<Vec<Marker>> {
        let buildings = self
            .api
            .buildings()
            .await
            .context("Failed to fetch buildings")?;
        let microwaves = self.microwaves_with_reports().await?;
        let per_building = reports::microwave_counts(&microwaves);

        let markers = buildings
            .into_iter()
            .map(|building| Marker::Building {
                microwave_count: per_building.get(&building.id).copied().unwrap_or_default(),
                building,
            })
            .chain(microwaves.into_iter().map(Marker::Microwave))
            .filter(|marker| {
                let plottable = marker.location().is_some();
                if !plottable {
                    debug!("Skipping marker without a location: {marker:?}");
                }
                plottable
            })
            .collect::<Vec<_>>();

        info!("Loaded {} markers", markers.len());
        Ok(markers)
    }

    fn present(&self, reference: Option<GeoPoint>, panel: &InfoPanel) {
        if let Some(reference) = reference {
            self.presenter.show_connector(reference, panel.location);
        }
        self.presenter.show_info(panel);
    }

    /// Rank all entities of `kind` by distance from the user and select the closest one
    pub async fn locate_closest(&self, kind: EntityKind) -> Result<Option<InfoPanel>> {
        let Some(reference) = self.location.get_loc().filter(GeoPoint::is_finite) else {
            warn!("No location available, can't rank {}", kind.plural());
            *self.selection.write().await = match kind {
                EntityKind::Building => Selection::Buildings(NearestSession::new()),
                EntityKind::Microwave => Selection::Microwaves(NearestSession::new()),
            };
            self.presenter.notify("Unable to find your location.");
            return Ok(None);
        };

        let (selection, first) = match kind {
            EntityKind::Building => {
                let buildings = self
                    .api
                    .buildings()
                    .await
                    .context("Failed to fetch buildings")?;
                let (session, first) = start_session(reference, &buildings);
                (Selection::Buildings(session), first)
            }
            EntityKind::Microwave => {
                let microwaves = self.microwaves_with_reports().await?;
                let (session, first) = start_session(reference, &microwaves);
                (Selection::Microwaves(session), first)
            }
        };

        *self.selection.write().await = selection;

        match &first {
            Some(panel) => {
                debug!(
                    "Closest {} is {} ({}m)",
                    kind.singular(),
                    panel.label,
                    panel.distance
                );
                self.present(Some(reference), panel);
            }
            None => {
                self.presenter.notify(&format!("No {} found.", kind.plural()));
            }
        }

        Ok(first)
    }

    async fn step(&self, step: Step) -> Option<InfoPanel> {
        let mut selection = self.selection.write().await;
        let (kind, reference, res) = match &mut *selection {
            Selection::Nothing => {
                self.presenter.notify("Nothing selected yet.");
                return None;
            }
            Selection::Buildings(session) => (
                EntityKind::Building,
                session.reference(),
                step_session(session, step),
            ),
            Selection::Microwaves(session) => (
                EntityKind::Microwave,
                session.reference(),
                step_session(session, step),
            ),
        };
        drop(selection);

        match res {
            Ok(panel) => {
                self.present(reference, &panel);
                Some(panel)
            }
            Err(why) => {
                if !why.is_notice() {
                    warn!("Unexpected locator error: {why}");
                }
                self.presenter.notify(&notice_text(kind, why));
                None
            }
        }
    }

    /// Select the next farther entity, [None] if there isn't one (the user is notified)
    pub async fn next(&self) -> Option<InfoPanel> {
        self.step(Step::Next).await
    }

    /// Select the next closer entity, [None] if there isn't one (the user is notified)
    pub async fn previous(&self) -> Option<InfoPanel> {
        self.step(Step::Previous).await
    }

    pub async fn report_broken(&self, microwave_id: EntityId, reason: Option<String>) -> Result {
        let report = NewReport {
            microwave_id,
            reason,
        };
        self.api
            .create_report(&report)
            .await
            .context("Failed to submit report")?;
        info!("Reported microwave {microwave_id}");
        Ok(())
    }

    pub async fn mark_broken(&self, microwave_id: EntityId) -> Result {
        self.api
            .mark_broken(microwave_id)
            .await
            .context("Failed to mark microwave as broken")?;
        info!("Marked microwave {microwave_id} as broken");
        Ok(())
    }

    pub async fn submit_microwave(&self, microwave: &NewMicrowave) -> Result {
        self.api
            .create_microwave(microwave)
            .await
            .context("Failed to submit microwave")?;
        info!("Submitted microwave in {} for approval", microwave.building);
        Ok(())
    }
}
