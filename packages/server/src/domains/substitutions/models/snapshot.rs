use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::record::SubstitutionRecord;

/// Which published plan a request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Today,
    Tomorrow,
}

impl Day {
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Today => "today",
            Day::Tomorrow => "tomorrow",
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DaySnapshot - one day's parse result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySnapshot {
    /// Records in the order they appear in the source text
    #[serde(rename = "substitutions")]
    pub records: Vec<SubstitutionRecord>,
    /// Full extracted text, kept for debugging and re-derivation
    pub raw_text: String,
    /// Calendar date this plan is for (ISO `YYYY-MM-DD`)
    pub date: NaiveDate,
}

/// Failure of the most recent refresh cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshError {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// PlanSnapshot - the value held by the snapshot store
///
/// Published values are immutable; a refresh builds a new one. Days are
/// shared behind `Arc` so a failed cycle can carry them over cheaply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub today: Option<Arc<DaySnapshot>>,
    pub tomorrow: Option<Arc<DaySnapshot>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<RefreshError>,
    /// Publication counter, assigned by the store
    #[serde(skip)]
    pub version: u64,
}

impl PlanSnapshot {
    pub fn day(&self, day: Day) -> Option<&Arc<DaySnapshot>> {
        match day {
            Day::Today => self.today.as_ref(),
            Day::Tomorrow => self.tomorrow.as_ref(),
        }
    }

    /// Successor after a completed cycle: new days, cleared error.
    pub fn succeeded(
        today: DaySnapshot,
        tomorrow: DaySnapshot,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            today: Some(Arc::new(today)),
            tomorrow: Some(Arc::new(tomorrow)),
            last_updated: Some(last_updated),
            last_error: None,
            version: 0,
        }
    }

    /// Successor after an aborted cycle: days and `last_updated` carried over.
    pub fn failed(&self, error: RefreshError) -> Self {
        Self {
            today: self.today.clone(),
            tomorrow: self.tomorrow.clone(),
            last_updated: self.last_updated,
            last_error: Some(error),
            version: 0,
        }
    }
}
