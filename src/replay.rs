//! Replay Module
//!
//! Replay mode substitutes a historical daily snapshot for live data until
//! the user exits it. One session tracks one project; the staged snapshot
//! and the pre-loaded list of available dates live here, never in the
//! cache.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::backend::DashboardBackend;
use crate::error::{AnalyticsError, Result};
use crate::models::DailySnapshot;

// == Replay State ==
/// Whether the dashboard shows live data or a staged historical snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayState {
    Live,
    Replay {
        date: NaiveDate,
        snapshot: DailySnapshot,
    },
}

impl ReplayState {
    pub fn is_live(&self) -> bool {
        matches!(self, ReplayState::Live)
    }

    /// The replayed date, None while live.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ReplayState::Live => None,
            ReplayState::Replay { date, .. } => Some(*date),
        }
    }

    /// The staged snapshot, None while live.
    pub fn snapshot(&self) -> Option<&DailySnapshot> {
        match self {
            ReplayState::Live => None,
            ReplayState::Replay { snapshot, .. } => Some(snapshot),
        }
    }
}

// == Replay Session ==
/// State machine: Live, entered into Replay by a successful snapshot
/// fetch, re-staged by navigation, and returned to Live on exit.
///
/// A fetch that finds no snapshot leaves the current state exactly as it
/// was and surfaces the not-found to the caller. Navigation availability
/// derives from the date list loaded up front, not from extra fetches.
pub struct ReplaySession {
    backend: Arc<dyn DashboardBackend>,
    project_id: String,
    state: ReplayState,
    available_dates: Vec<NaiveDate>,
}

impl ReplaySession {
    // == Constructor ==
    pub fn new(backend: Arc<dyn DashboardBackend>, project_id: impl Into<String>) -> Self {
        Self {
            backend,
            project_id: project_id.into(),
            state: ReplayState::Live,
            available_dates: Vec::new(),
        }
    }

    // == Date List ==
    /// Fetches the ascending list of snapshot dates for the project.
    /// Called once when the session is set up; previous/next availability
    /// reads this list only.
    pub async fn load_available_dates(&mut self) -> Result<()> {
        self.available_dates = self.backend.list_snapshot_dates(&self.project_id).await?;
        Ok(())
    }

    pub fn available_dates(&self) -> &[NaiveDate] {
        &self.available_dates
    }

    // == Transitions ==
    /// Live -> Replay. Fetches the snapshot for `date` and stages it; when
    /// no snapshot exists the session stays exactly as it was and the
    /// caller gets the not-found.
    pub async fn enter(&mut self, date: NaiveDate) -> Result<DailySnapshot> {
        self.stage(date).await
    }

    /// Replay -> Replay on another date. Same fetch and same not-found
    /// behavior as `enter`.
    pub async fn navigate_to(&mut self, date: NaiveDate) -> Result<DailySnapshot> {
        self.stage(date).await
    }

    /// Back to live data, dropping the staged snapshot.
    pub fn exit(&mut self) {
        if !self.state.is_live() {
            info!(project = %self.project_id, "replay mode exited");
        }
        self.state = ReplayState::Live;
    }

    // == Navigation Availability ==
    /// The chronologically previous available date, None while live, when
    /// the current date is not in the loaded list, or at the start.
    pub fn previous_date(&self) -> Option<NaiveDate> {
        let idx = self.current_index()?;
        idx.checked_sub(1).map(|i| self.available_dates[i])
    }

    /// The chronologically next available date.
    pub fn next_date(&self) -> Option<NaiveDate> {
        let idx = self.current_index()?;
        self.available_dates.get(idx + 1).copied()
    }

    // == Accessors ==
    pub fn state(&self) -> &ReplayState {
        &self.state
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    // == Internal ==
    async fn stage(&mut self, date: NaiveDate) -> Result<DailySnapshot> {
        match self.backend.fetch_snapshot(&self.project_id, date).await? {
            Some(snapshot) => {
                info!(project = %self.project_id, %date, "replay snapshot staged");
                self.state = ReplayState::Replay {
                    date,
                    snapshot: snapshot.clone(),
                };
                Ok(snapshot)
            }
            None => Err(AnalyticsError::SnapshotNotFound {
                project: self.project_id.clone(),
                date,
            }),
        }
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.state.date()?;
        self.available_dates.iter().position(|d| *d == current)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, DEMO_PROJECT_ID};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, day).unwrap()
    }

    async fn demo_session() -> ReplaySession {
        let backend = Arc::new(InMemoryBackend::with_demo_data());
        let mut session = ReplaySession::new(backend, DEMO_PROJECT_ID);
        session.load_available_dates().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_enter_stages_the_snapshot() {
        let mut session = demo_session().await;

        let snapshot = session.enter(date(2)).await.unwrap();

        assert_eq!(snapshot.date, date(2));
        assert!(!session.state().is_live());
        assert_eq!(session.state().date(), Some(date(2)));
    }

    #[tokio::test]
    async fn test_enter_missing_date_stays_live() {
        let mut session = demo_session().await;

        let result = session.enter(date(25)).await;

        assert!(matches!(
            result,
            Err(AnalyticsError::SnapshotNotFound { .. })
        ));
        assert!(session.state().is_live());
    }

    #[tokio::test]
    async fn test_failed_navigation_keeps_current_snapshot() {
        let mut session = demo_session().await;
        session.enter(date(2)).await.unwrap();

        let result = session.navigate_to(date(25)).await;

        assert!(result.is_err());
        assert_eq!(session.state().date(), Some(date(2)));
        assert!(session.state().snapshot().is_some());
    }

    #[tokio::test]
    async fn test_navigation_availability_at_middle_and_edges() {
        let mut session = demo_session().await;

        // Live: no navigation at all.
        assert_eq!(session.previous_date(), None);
        assert_eq!(session.next_date(), None);

        session.enter(date(2)).await.unwrap();
        assert_eq!(session.previous_date(), Some(date(1)));
        assert_eq!(session.next_date(), Some(date(3)));

        session.navigate_to(date(1)).await.unwrap();
        assert_eq!(session.previous_date(), None);
        assert_eq!(session.next_date(), Some(date(2)));

        session.navigate_to(date(3)).await.unwrap();
        assert_eq!(session.previous_date(), Some(date(2)));
        assert_eq!(session.next_date(), None);
    }

    #[tokio::test]
    async fn test_exit_returns_to_live() {
        let mut session = demo_session().await;
        session.enter(date(1)).await.unwrap();

        session.exit();

        assert!(session.state().is_live());
        assert!(session.state().snapshot().is_none());

        // Exiting while live is harmless.
        session.exit();
        assert!(session.state().is_live());
    }

    #[tokio::test]
    async fn test_dates_load_ascending() {
        let session = demo_session().await;
        assert_eq!(session.available_dates(), &[date(1), date(2), date(3)]);
    }
}
