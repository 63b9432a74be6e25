use crate::models::{CommittedSwipe, MatchRecord, SwipeDecision};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Decision stored in the ledger; cancelled gestures are never recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "swipe_decision", rename_all = "lowercase")]
pub enum LedgerDecision {
    Pass,
    Like,
    Superlike,
}

impl TryFrom<SwipeDecision> for LedgerDecision {
    type Error = LedgerError;

    fn try_from(value: SwipeDecision) -> Result<Self, Self::Error> {
        match value {
            SwipeDecision::Pass => Ok(LedgerDecision::Pass),
            SwipeDecision::Like => Ok(LedgerDecision::Like),
            SwipeDecision::SuperLike => Ok(LedgerDecision::Superlike),
            SwipeDecision::Cancel => Err(LedgerError::InvalidInput("cancel is not a committed decision".into())),
        }
    }
}

impl From<LedgerDecision> for SwipeDecision {
    fn from(value: LedgerDecision) -> Self {
        match value {
            LedgerDecision::Pass => SwipeDecision::Pass,
            LedgerDecision::Like => SwipeDecision::Like,
            LedgerDecision::Superlike => SwipeDecision::SuperLike,
        }
    }
}

/// PostgreSQL ledger of committed swipes
///
/// Keeps the latest decision per (user, candidate) so matches survive
/// session eviction and restarts.
pub struct SwipeLedger {
    pool: PgPool,
}

impl SwipeLedger {
    /// Create a new ledger from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new ledger from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, LedgerError> {
        tracing::info!("Connecting swipe ledger to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Record a committed swipe
    ///
    /// Uses INSERT ... ON CONFLICT so re-swiping a candidate on the second
    /// lap replaces the earlier decision.
    pub async fn record(&self, swipe: &CommittedSwipe) -> Result<(), LedgerError> {
        let decision = LedgerDecision::try_from(swipe.decision)?;

        let query = r#"
            INSERT INTO swipe_ledger (user_id, candidate_id, decision, decided_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, candidate_id)
            DO UPDATE SET
                decision = EXCLUDED.decision,
                decided_at = EXCLUDED.decided_at
        "#;

        sqlx::query(query)
            .bind(&swipe.user_id)
            .bind(&swipe.candidate_id)
            .bind(decision)
            .bind(swipe.decided_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded swipe: {} -> {} ({})",
            swipe.user_id,
            swipe.candidate_id,
            swipe.decision.as_str()
        );

        Ok(())
    }

    /// Drain committed swipes from a channel into the ledger until it closes
    pub fn spawn_recorder(self: Arc<Self>, mut swipes: UnboundedReceiver<CommittedSwipe>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(swipe) = swipes.recv().await {
                if let Err(e) = self.record(&swipe).await {
                    tracing::error!(
                        "Failed to record swipe {} -> {}: {}",
                        swipe.user_id,
                        swipe.candidate_id,
                        e
                    );
                }
            }
            tracing::info!("Swipe ledger recorder stopped");
        })
    }

    /// Liked and super-liked candidates, newest first
    pub async fn list_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, LedgerError> {
        let query = r#"
            SELECT user_id, candidate_id, decision, decided_at
            FROM swipe_ledger
            WHERE user_id = $1 AND decision IN ('like', 'superlike')
            ORDER BY decided_at DESC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let matches = rows
            .iter()
            .map(|row| {
                let decision: LedgerDecision = row.try_get("decision")?;
                Ok(MatchRecord {
                    user_id: row.try_get("user_id")?,
                    candidate_id: row.try_get("candidate_id")?,
                    decision: decision.into(),
                    decided_at: row.try_get("decided_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!("User {} has {} matches", user_id, matches.len());

        Ok(matches)
    }

    /// Forget every decision a user made (account deletion)
    pub async fn clear_user(&self, user_id: &str) -> Result<u64, LedgerError> {
        let query = r#"
            DELETE FROM swipe_ledger
            WHERE user_id = $1 OR candidate_id = $1
        "#;

        let result = sqlx::query(query).bind(user_id).execute(&self.pool).await?;

        tracing::info!(
            "Cleared {} ledger rows for user {}",
            result.rows_affected(),
            user_id
        );

        Ok(result.rows_affected())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, LedgerError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
