//! Tracker - the session service every front end talks to.
//!
//! Owns the in-memory session and runs each action as one unit:
//! 1. reduce the session with [`engine::dispatch`]
//! 2. evaluate achievements against the new stats
//! 3. install the new session in memory
//! 4. write the whole session through to the store
//!
//! Actions are serialized by a mutex, so the session is never observed half
//! updated.

use crate::{
    core::{
        achievements::{self, Achievement},
        catalog::Catalog,
        dates,
        engine::{self, Action},
        merge,
        state::SessionState,
        storage::{self, StorageKeys},
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Result of one applied action
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// Session before the action
    pub previous: SessionState,
    /// Session after the action and achievement evaluation
    pub state: SessionState,
    /// Achievements unlocked by this action, in catalog order
    pub unlocked: Vec<&'static Achievement>,
}

impl ActionOutcome {
    /// Whether the action left the session untouched (rejected or no-op).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.previous == self.state
    }
}

/// Session service backed by the key-value store
#[derive(Debug)]
pub struct Tracker {
    db: DatabaseConnection,
    keys: StorageKeys,
    catalog: Catalog,
    session: Mutex<SessionState>,
}

impl Tracker {
    /// Loads the saved session (or defaults) and returns a ready tracker.
    ///
    /// Achievements are evaluated once on load so that stats carried over
    /// from an older save unlock anything they already qualify for.
    #[instrument(skip(db, catalog))]
    pub async fn open(db: DatabaseConnection, keys: StorageKeys, catalog: Catalog) -> Result<Self> {
        let blob = storage::load(&db, &keys).await?;
        let mut session = merge::restore(blob.as_deref(), &catalog, dates::today());
        let unlocked = achievements::evaluate(&mut session.stats);

        info!(
            current_date = %session.current_date,
            tasks = session.tasks.len(),
            unlocked = unlocked.len(),
            "Tracker session restored"
        );

        let blob = session.to_blob(Utc::now())?;
        storage::save(&db, &keys, &blob).await?;

        Ok(Self {
            db,
            keys,
            catalog,
            session: Mutex::new(session),
        })
    }

    /// The catalog this tracker reconciles against.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A copy of the current session.
    pub async fn snapshot(&self) -> SessionState {
        self.session.lock().await.clone()
    }

    /// Applies one action, evaluates achievements, and persists the result.
    ///
    /// The in-memory session is updated before the write; if the write fails
    /// the error is returned and the next successful action persists both.
    #[instrument(skip(self))]
    pub async fn apply(&self, action: Action) -> Result<ActionOutcome> {
        let mut session = self.session.lock().await;
        let previous = session.clone();
        let now = Utc::now();

        let mut next = engine::dispatch(previous.clone(), action, &self.catalog, now);
        let unlocked = achievements::evaluate(&mut next.stats);
        *session = next.clone();

        if let Err(e) = self.persist(&next).await {
            error!("Failed to save session: {}", e);
            return Err(e);
        }

        Ok(ActionOutcome {
            previous,
            state: next,
            unlocked,
        })
    }

    async fn persist(&self, session: &SessionState) -> Result<()> {
        let blob = session.to_blob(Utc::now())?;
        storage::save(&self.db, &self.keys, &blob).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    async fn open_tracker(db: &DatabaseConnection) -> Result<Tracker> {
        Tracker::open(db.clone(), StorageKeys::default(), Catalog::builtin()).await
    }

    #[tokio::test]
    async fn test_open_fresh_store_saves_defaults() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let tracker = open_tracker(&db).await?;

        let session = tracker.snapshot().await;
        assert_eq!(session.tasks.len(), 15);
        assert_eq!(session.current_date, dates::today());
        assert!(
            storage::load(&db, &StorageKeys::default())
                .await?
                .is_some()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_persists_every_action() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let tracker = open_tracker(&db).await?;

        let outcome = tracker
            .apply(Action::Increment {
                task_id: "t1".to_string(),
            })
            .await?;
        assert!(!outcome.is_noop());
        assert_eq!(outcome.state.wallet_balance, 10.0);
        assert_eq!(outcome.previous.wallet_balance, 0.0);

        // A second tracker over the same store sees the change
        let reopened = open_tracker(&db).await?;
        let session = reopened.snapshot().await;
        assert_eq!(session.wallet_balance, 10.0);
        assert_eq!(session.task("t1").unwrap().current_count, 1);
        assert_eq!(session.stats.total_points_earned, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_reports_unlocked_achievements() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let tracker = open_tracker(&db).await?;

        // t1 is worth 10 points
        let outcome = tracker
            .apply(Action::Increment {
                task_id: "t1".to_string(),
            })
            .await?;
        let ids: Vec<&str> = outcome.unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["ach_first_step"]);
        assert!(outcome.state.stats.has_unlocked("ach_first_step"));

        let outcome = tracker
            .apply(Action::Spend {
                amount: 1.0,
                reason: "tea".to_string(),
            })
            .await?;
        let ids: Vec<&str> = outcome.unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["ach_spend_1"]);

        // Nothing new on a no-op
        let outcome = tracker
            .apply(Action::Decrement {
                task_id: "t4".to_string(),
            })
            .await?;
        assert!(outcome.is_noop());
        assert!(outcome.unlocked.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_through_tracker() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let tracker = open_tracker(&db).await?;
        let today = tracker.snapshot().await.current_date;

        tracker
            .apply(Action::Increment {
                task_id: "t10".to_string(),
            })
            .await?;
        let outcome = tracker
            .apply(Action::Settle {
                archive_date: today,
                next_date: dates::next_day(today),
            })
            .await?;

        assert_eq!(outcome.previous.today_score(), 2);
        assert_eq!(outcome.state.today_score(), 0);
        assert_eq!(outcome.state.current_date, dates::next_day(today));
        assert_eq!(outcome.state.record(today).unwrap().points_earned, 2);
        assert_eq!(outcome.state.stats.current_streak, 1);

        let reopened = open_tracker(&db).await?;
        assert_eq!(
            reopened.snapshot().await.current_date,
            dates::next_day(today)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_open_with_corrupt_blob_falls_back() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        storage::set_value(&db, crate::core::storage::DEFAULT_STORAGE_KEY, "garbage").await?;

        let tracker = open_tracker(&db).await?;
        let session = tracker.snapshot().await;
        assert_eq!(session.wallet_balance, 0.0);
        assert_eq!(session.tasks.len(), 15);
        Ok(())
    }
}
