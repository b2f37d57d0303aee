//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The only periodic task is the substitution plan refresh:
//!
//! ```text
//! startup ──────────────► refresh()
//! Scheduler (every 5 min) ─► refresh()   (skipped while another cycle runs)
//! ```
//!
//! The orchestrator serializes cycles itself, so a slow upstream can never
//! stack refreshes on top of each other.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::substitutions::{RefreshOrchestrator, RefreshOutcome};

/// Start the periodic refresh on the given cron schedule (6 fields, with seconds)
pub async fn start_scheduler(
    orchestrator: Arc<RefreshOrchestrator>,
    schedule: &str,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .context("Failed to create job scheduler")?;

    let refresh_job = Job::new_async(schedule, move |_uuid, _lock| {
        let orchestrator = orchestrator.clone();
        Box::pin(async move {
            tracing::info!("Scheduled update triggered");
            log_outcome("scheduled", orchestrator.refresh().await);
        })
    })
    .with_context(|| format!("Invalid refresh schedule: {}", schedule))?;

    scheduler.add(refresh_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %schedule, "Scheduled tasks started (substitution plan refresh)");
    Ok(scheduler)
}

/// Kick off the initial refresh without blocking server startup
pub fn spawn_startup_refresh(orchestrator: Arc<RefreshOrchestrator>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Performing initial data fetch...");
        log_outcome("startup", orchestrator.refresh().await);
    })
}

fn log_outcome(trigger: &str, outcome: RefreshOutcome) {
    match outcome {
        RefreshOutcome::Updated {
            today_records,
            tomorrow_records,
        } => tracing::info!(
            trigger,
            today_records,
            tomorrow_records,
            "Substitution plans updated"
        ),
        RefreshOutcome::Failed(message) => {
            tracing::warn!(trigger, error = %message, "Substitution plan refresh failed")
        }
        RefreshOutcome::AlreadyRunning => {
            tracing::debug!(trigger, "Refresh skipped, previous cycle still running")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::substitutions::{
        DocumentSources, PatternExtractor, SnapshotStore,
    };
    use crate::kernel::{MockDocumentFetcher, MockTextExtractor, ServerDeps};
    use std::time::Duration;

    fn orchestrator(fetcher: MockDocumentFetcher) -> Arc<RefreshOrchestrator> {
        let deps = ServerDeps::new(
            Arc::new(fetcher),
            Arc::new(MockTextExtractor::new()),
            Arc::new(PatternExtractor::new()),
        );
        let sources = DocumentSources {
            today_url: "mock://today".to_string(),
            tomorrow_url: "mock://tomorrow".to_string(),
            credentials: None,
            fetch_timeout: Duration::from_secs(1),
        };
        Arc::new(RefreshOrchestrator::new(deps, sources, Arc::new(SnapshotStore::new())))
    }

    #[tokio::test]
    async fn test_startup_refresh_publishes() {
        let fetcher = MockDocumentFetcher::new()
            .with_document("mock://today", "1 5a D Mey 101")
            .with_document("mock://tomorrow", "2 5b E Kra 102");
        let orchestrator = orchestrator(fetcher);

        spawn_startup_refresh(orchestrator.clone()).await.unwrap();

        let snapshot = orchestrator.store().read();
        assert!(snapshot.last_updated.is_some());
        assert_eq!(snapshot.today.as_ref().unwrap().records.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_schedule_is_rejected() {
        let result = start_scheduler(orchestrator(MockDocumentFetcher::new()), "not a cron").await;
        assert!(result.is_err());
    }
}
