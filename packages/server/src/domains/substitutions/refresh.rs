//! Refresh orchestrator - one fetch → extract → parse → publish cycle.
//!
//! ```text
//! refresh()
//!     ├─► fetch today ──► fetch tomorrow          (FetchError aborts)
//!     ├─► extract text today ──► tomorrow         (ExtractionError aborts)
//!     ├─► parse both days with the configured extractor (never aborts)
//!     └─► publish new snapshot, or carry the old days over with last_error set
//! ```
//!
//! Steps are strictly sequential to keep load on the upstream host bounded.
//! Cycles never overlap: a trigger that arrives while one is running is
//! turned away with `RefreshOutcome::AlreadyRunning`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::models::{Day, DaySnapshot, PlanSnapshot, RefreshError};
use super::store::SnapshotStore;
use crate::config::Config;
use crate::kernel::{Credentials, ExtractionError, FetchError, ServerDeps};

/// Where the two plans live and how to ask for them
#[derive(Debug, Clone)]
pub struct DocumentSources {
    pub today_url: String,
    pub tomorrow_url: String,
    pub credentials: Option<Credentials>,
    pub fetch_timeout: Duration,
}

impl DocumentSources {
    pub fn from_config(config: &Config) -> Self {
        Self {
            today_url: config.today_url.clone(),
            tomorrow_url: config.tomorrow_url.clone(),
            credentials: config.credentials.clone(),
            fetch_timeout: config.fetch_timeout,
        }
    }

    fn url(&self, day: Day) -> &str {
        match day {
            Day::Today => &self.today_url,
            Day::Tomorrow => &self.tomorrow_url,
        }
    }
}

/// Why a cycle was aborted
#[derive(Error, Debug)]
pub enum RefreshFailure {
    #[error("Failed to fetch {day}'s plan: {source}")]
    Fetch { day: Day, source: FetchError },

    #[error("Failed to extract text from {day}'s plan: {source}")]
    Extraction { day: Day, source: ExtractionError },
}

/// Result of one `refresh()` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New snapshot published
    Updated {
        today_records: usize,
        tomorrow_records: usize,
    },
    /// Cycle aborted; `last_error` recorded, previous days kept
    Failed(String),
    /// Another cycle was in flight; nothing done
    AlreadyRunning,
}

pub struct RefreshOrchestrator {
    deps: ServerDeps,
    sources: DocumentSources,
    store: Arc<SnapshotStore>,
    in_flight: Mutex<()>,
}

impl RefreshOrchestrator {
    pub fn new(deps: ServerDeps, sources: DocumentSources, store: Arc<SnapshotStore>) -> Self {
        Self {
            deps,
            sources,
            store,
            in_flight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Run one refresh cycle.
    ///
    /// Never fails: upstream problems end up in the store's `last_error`.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            info!("Refresh already in progress, skipping trigger");
            return RefreshOutcome::AlreadyRunning;
        };

        info!("Starting substitution plan refresh");

        match self.run_cycle().await {
            Ok((today, tomorrow)) => {
                let outcome = RefreshOutcome::Updated {
                    today_records: today.records.len(),
                    tomorrow_records: tomorrow.records.len(),
                };
                let previous = self.store.read();
                let last_updated = next_timestamp(previous.last_updated);
                let published = self
                    .store
                    .publish(PlanSnapshot::succeeded(today, tomorrow, last_updated));

                info!(
                    version = published.version,
                    last_updated = %last_updated,
                    ?outcome,
                    "Refresh completed"
                );
                outcome
            }
            Err(failure) => {
                let message = failure.to_string();
                error!(error = %message, "Refresh failed, keeping previous plans");

                let previous = self.store.read();
                self.store.publish(previous.failed(RefreshError {
                    message: message.clone(),
                    timestamp: Utc::now(),
                }));
                RefreshOutcome::Failed(message)
            }
        }
    }

    async fn run_cycle(&self) -> Result<(DaySnapshot, DaySnapshot), RefreshFailure> {
        let today_bytes = self.fetch(Day::Today).await?;
        let tomorrow_bytes = self.fetch(Day::Tomorrow).await?;

        let today_text = self.extract_text(Day::Today, today_bytes).await?;
        let tomorrow_text = self.extract_text(Day::Tomorrow, tomorrow_bytes).await?;

        let today_date = Local::now().date_naive();
        let tomorrow_date = next_day(today_date);

        // Unfiltered: class queries filter the full extraction later.
        // One instant per cycle, so both days carry the same extraction time.
        let extracted_at = Utc::now();
        let today = self.parse(Day::Today, today_text, today_date, extracted_at).await;
        let tomorrow = self
            .parse(Day::Tomorrow, tomorrow_text, tomorrow_date, extracted_at)
            .await;

        Ok((today, tomorrow))
    }

    async fn fetch(&self, day: Day) -> Result<Vec<u8>, RefreshFailure> {
        let url = self.sources.url(day);
        let bytes = self
            .deps
            .fetcher
            .fetch(url, self.sources.credentials.as_ref(), self.sources.fetch_timeout)
            .await
            .map_err(|source| RefreshFailure::Fetch { day, source })?;

        info!(%day, size = bytes.len(), "Plan document fetched");
        Ok(bytes)
    }

    async fn extract_text(&self, day: Day, bytes: Vec<u8>) -> Result<String, RefreshFailure> {
        self.deps
            .text_extractor
            .extract_text(bytes)
            .await
            .map_err(|source| RefreshFailure::Extraction { day, source })
    }

    async fn parse(
        &self,
        day: Day,
        raw_text: String,
        date: NaiveDate,
        extracted_at: DateTime<Utc>,
    ) -> DaySnapshot {
        let extractor = &self.deps.substitution_extractor;
        let records = extractor.extract(&raw_text, None, extracted_at).await;

        if records.is_empty() {
            warn!(%day, strategy = extractor.name(), "No substitutions extracted");
        } else {
            info!(%day, strategy = extractor.name(), records = records.len(), "Substitutions extracted");
        }

        DaySnapshot {
            records,
            raw_text,
            date,
        }
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// Now, but strictly after `previous` even if the clock has not moved.
fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(previous) if now <= previous => previous + chrono::Duration::milliseconds(1),
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_day_crosses_month_and_year() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(next_day(date), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn test_next_timestamp_is_strictly_increasing() {
        let future = Utc::now() + chrono::Duration::seconds(60);
        assert!(next_timestamp(Some(future)) > future);
        assert!(next_timestamp(None) <= Utc::now());
    }

    #[test]
    fn test_failure_messages_name_the_day() {
        let failure = RefreshFailure::Fetch {
            day: Day::Tomorrow,
            source: FetchError::Status {
                url: "https://plans.example/morgen.pdf".to_string(),
                status: 401,
            },
        };
        assert_eq!(
            failure.to_string(),
            "Failed to fetch tomorrow's plan: HTTP 401 for https://plans.example/morgen.pdf"
        );
    }
}
