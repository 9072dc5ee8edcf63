use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Microwave, Report, UtcDT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Which reports count towards a microwave's total
pub enum ReportWindow {
    #[default]
    AllTime,
    /// Only reports made within this long before now. Reports without a timestamp are left out.
    Trailing(Duration),
}

impl ReportWindow {
    pub fn trailing_days(days: u32) -> Self {
        Self::Trailing(Duration::days(days as i64))
    }

    fn includes(&self, report: &Report, now: UtcDT) -> bool {
        match self {
            Self::AllTime => true,
            Self::Trailing(span) => report
                .created_at
                .is_some_and(|at| at <= now && now - at <= *span),
        }
    }
}

/// Count reports per microwave in a single pass
pub fn report_counts(
    reports: &[Report],
    window: ReportWindow,
    now: UtcDT,
) -> HashMap<EntityId, u32> {
    let mut counts = HashMap::with_capacity(reports.len());
    for report in reports.iter().filter(|r| window.includes(r, now)) {
        *counts.entry(report.microwave_id).or_insert(0) += 1;
    }
    counts
}

/// Overwrite each microwave's report count, microwaves with no reports get zero
pub fn apply_report_counts(microwaves: &mut [Microwave], counts: &HashMap<EntityId, u32>) {
    for microwave in microwaves.iter_mut() {
        microwave.report_count = counts.get(&microwave.id).copied().unwrap_or_default();
    }
}

/// Number of microwaves in each building, keyed by building id
pub fn microwave_counts(microwaves: &[Microwave]) -> HashMap<EntityId, u32> {
    let mut counts = HashMap::new();
    for building_id in microwaves.iter().filter_map(|m| m.building_id) {
        *counts.entry(building_id).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A row in the admin's report list
pub struct ReportSummary {
    pub microwave_id: EntityId,
    pub building: String,
    pub description: String,
    pub broken: bool,
    pub report_count: u32,
}

impl From<&Microwave> for ReportSummary {
    fn from(m: &Microwave) -> Self {
        Self {
            microwave_id: m.id,
            building: m.building.clone(),
            description: m.description.clone(),
            broken: m.broken,
            report_count: m.report_count,
        }
    }
}

/// Summaries for every microwave, most reported first
pub fn summarize(microwaves: &[Microwave], counts: &HashMap<EntityId, u32>) -> Vec<ReportSummary> {
    let mut summaries = microwaves
        .iter()
        .map(|m| ReportSummary {
            report_count: counts.get(&m.id).copied().unwrap_or_default(),
            ..ReportSummary::from(m)
        })
        .collect::<Vec<_>>();
    summaries.sort_by(|a, b| b.report_count.cmp(&a.report_count));
    summaries
}
