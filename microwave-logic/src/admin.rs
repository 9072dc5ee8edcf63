use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::{
    api::MicrowaveApi,
    entity::{EntityId, Microwave},
    prelude::*,
    reports::{self, ReportSummary, ReportWindow},
};

/// Moderation view, approves or rejects submitted microwaves and shows which microwaves get the
/// most reports.
pub struct AdminConsole<A: MicrowaveApi> {
    api: Arc<A>,
}

impl<A: MicrowaveApi> AdminConsole<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Submissions waiting on a decision
    pub async fn pending(&self) -> Result<Vec<Microwave>> {
        self.api
            .pending_microwaves()
            .await
            .context("Failed to fetch pending microwaves")
    }

    pub async fn approve(&self, id: EntityId) -> Result {
        self.api
            .approve_microwave(id)
            .await
            .with_context(|| format!("Failed to approve microwave {id}"))?;
        info!("Approved microwave {id}");
        Ok(())
    }

    pub async fn reject(&self, id: EntityId) -> Result {
        self.api
            .reject_microwave(id)
            .await
            .with_context(|| format!("Failed to reject microwave {id}"))?;
        info!("Rejected microwave {id}");
        Ok(())
    }

    /// Every microwave with its report total inside `window`, most reported first
    pub async fn report_summary(&self, window: ReportWindow) -> Result<Vec<ReportSummary>> {
        let microwaves = self
            .api
            .microwaves()
            .await
            .context("Failed to fetch microwaves")?;
        let reports = self
            .api
            .reports()
            .await
            .context("Failed to fetch reports")?;
        let counts = reports::report_counts(&reports, window, Utc::now());
        Ok(reports::summarize(&microwaves, &counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MockApi;
    use tokio::test;

    #[test]
    async fn test_approve() {
        let api = Arc::new(MockApi::campus());
        let id = api.add_pending("CCIS").await;
        let admin = AdminConsole::new(api.clone());

        let pending = admin.pending().await.unwrap();
        assert_eq!(pending.iter().map(|m| m.id).collect::<Vec<_>>(), vec![id]);

        admin.approve(id).await.unwrap();

        assert!(admin.pending().await.unwrap().is_empty());
        assert!(api.microwave(id).await.is_some_and(|m| m.approved));
    }

    #[test]
    async fn test_reject() {
        let api = Arc::new(MockApi::campus());
        let keep = api.add_pending("CCIS").await;
        let rejected = api.add_pending("ETLC").await;
        let admin = AdminConsole::new(api.clone());

        admin.reject(rejected).await.unwrap();

        let pending = admin.pending().await.unwrap();
        assert_eq!(pending.iter().map(|m| m.id).collect::<Vec<_>>(), vec![keep]);
        assert!(api.microwave(rejected).await.is_none());
    }

    #[test]
    async fn test_reject_unknown() {
        let admin = AdminConsole::new(Arc::new(MockApi::campus()));
        assert!(admin.reject(42).await.is_err());
    }

    #[test]
    async fn test_needs_admin() {
        let admin = AdminConsole::new(Arc::new(MockApi::campus().without_admin()));
        let err = admin.pending().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch pending microwaves");
        assert!(admin.approve(1).await.is_err());
    }

    #[test]
    async fn test_report_summary() {
        let admin = AdminConsole::new(Arc::new(MockApi::campus()));

        let summary = admin.report_summary(ReportWindow::AllTime).await.unwrap();

        assert_eq!(
            summary
                .iter()
                .map(|s| (s.microwave_id, s.report_count))
                .collect::<Vec<_>>(),
            vec![(10, 2), (11, 0), (12, 0)]
        );

        // Mock reports are undated, so any trailing window drops them
        let recent = admin
            .report_summary(ReportWindow::trailing_days(30))
            .await
            .unwrap();
        assert!(recent.iter().all(|s| s.report_count == 0));
    }
}
