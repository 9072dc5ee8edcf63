use microwave_logic::{GeoPoint, InfoPanel, MapPresenter, Marker, Microwave, ReportSummary};
use serde::Serialize;

use crate::Result;

/// Draws the map as plain text on stdout
pub struct TerminalPresenter;

fn fmt_point(p: &GeoPoint) -> String {
    format!("({:.5}, {:.5})", p.lat, p.lng)
}

impl MapPresenter for TerminalPresenter {
    fn show_connector(&self, from: GeoPoint, to: GeoPoint) {
        println!("You {} ----> {}", fmt_point(&from), fmt_point(&to));
    }

    fn show_info(&self, panel: &InfoPanel) {
        println!("{}", render_panel(panel));
    }

    fn notify(&self, message: &str) {
        println!("! {message}");
    }
}

pub fn render_panel(panel: &InfoPanel) -> String {
    let detail = panel
        .detail
        .as_ref()
        .map(|d| format!("{d}\n"))
        .unwrap_or_default();
    format!(
        "[{}/{}] {}\n{detail}{} km away\nOpen in Google Maps: {}",
        panel.position + 1,
        panel.total,
        panel.label,
        panel.distance_km(),
        panel.maps_link()
    )
}

pub fn render_markers(markers: &[Marker]) -> String {
    markers
        .iter()
        .filter_map(|marker| {
            marker.location().map(|loc| {
                let tag = match marker {
                    Marker::Building { .. } => "building",
                    Marker::Microwave(_) => "microwave",
                };
                format!("[{tag}] {}\n{}", fmt_point(&loc), marker.popup())
            })
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_pending(pending: &[Microwave]) -> String {
    if pending.is_empty() {
        return "No pending microwaves.".to_string();
    }
    pending
        .iter()
        .map(|m| format!("#{} {}\n{}", m.id, m.building, m.description))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

pub fn render_summary(summary: &[ReportSummary]) -> String {
    summary
        .iter()
        .map(|s| {
            format!(
                "#{} {}\n{}\ntotal reports: {}",
                s.microwave_id, s.building, s.description, s.report_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

pub fn print_json(value: &impl Serialize) -> Result {
    let encoded = serde_json::to_string_pretty(value)?;
    println!("{encoded}");
    Ok(())
}
