//! Read-side queries against the current snapshot.
//!
//! Every query reads the store once and answers from that single value. While
//! the last refresh failed, queries report the error instead of stale data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::models::{Day, DaySnapshot, PlanSnapshot, RefreshError};
use super::store::SnapshotStore;
use crate::common::{class_matches, normalize_class_key};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Last refresh failed: {}", .0.message)]
    RefreshFailed(RefreshError),
}

/// Which days a class query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    Today,
    Tomorrow,
    #[default]
    Both,
}

impl DayFilter {
    /// Lenient parse of the `day` query parameter; anything unknown means both.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(|p| p.trim().to_ascii_lowercase()).as_deref() {
            Some("today") => DayFilter::Today,
            Some("tomorrow") => DayFilter::Tomorrow,
            _ => DayFilter::Both,
        }
    }

    pub fn includes(&self, day: Day) -> bool {
        match self {
            DayFilter::Both => true,
            DayFilter::Today => day == Day::Today,
            DayFilter::Tomorrow => day == Day::Tomorrow,
        }
    }
}

/// Both days
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllSubstitutions {
    pub today: Option<Arc<DaySnapshot>>,
    pub tomorrow: Option<Arc<DaySnapshot>>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// One day, flattened, plus `lastUpdated`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    #[serde(flatten)]
    pub day: Option<Arc<DaySnapshot>>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Class-filtered view.
///
/// The outer `Option` says whether the day was requested (absent key when
/// not); the inner one whether a plan exists yet (`null` before the first
/// successful refresh).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<Option<DaySnapshot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomorrow: Option<Option<DaySnapshot>>,
    pub target_class: String,
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct SubstitutionQueries {
    store: Arc<SnapshotStore>,
}

impl SubstitutionQueries {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    fn current(&self) -> Result<Arc<PlanSnapshot>, QueryError> {
        let snapshot = self.store.read();
        match &snapshot.last_error {
            Some(error) => Err(QueryError::RefreshFailed(error.clone())),
            None => Ok(snapshot),
        }
    }

    pub fn get_all(&self) -> Result<AllSubstitutions, QueryError> {
        let snapshot = self.current()?;
        Ok(AllSubstitutions {
            today: snapshot.today.clone(),
            tomorrow: snapshot.tomorrow.clone(),
            last_updated: snapshot.last_updated,
        })
    }

    pub fn get_day(&self, day: Day) -> Result<DayView, QueryError> {
        let snapshot = self.current()?;
        Ok(DayView {
            day: snapshot.day(day).cloned(),
            last_updated: snapshot.last_updated,
        })
    }

    /// Records of the requested day(s) whose class matches `class_label`.
    ///
    /// Derived from the stored extraction; the snapshot itself is untouched.
    pub fn get_by_class(&self, class_label: &str, days: DayFilter) -> Result<ClassView, QueryError> {
        let snapshot = self.current()?;
        let key = normalize_class_key(Some(class_label));

        let view = |day: Day| -> Option<Option<DaySnapshot>> {
            if !days.includes(day) {
                return None;
            }
            Some(snapshot.day(day).map(|plan| DaySnapshot {
                records: plan
                    .records
                    .iter()
                    .filter(|record| class_matches(&record.class_key, &key))
                    .cloned()
                    .collect(),
                raw_text: plan.raw_text.clone(),
                date: plan.date,
            }))
        };

        Ok(ClassView {
            today: view(Day::Today),
            tomorrow: view(Day::Tomorrow),
            target_class: class_label.to_string(),
            last_updated: snapshot.last_updated,
        })
    }
}
