//! Substitutions domain - fetch, parse and serve the school's substitution plans

pub mod extraction;
pub mod models;
pub mod queries;
pub mod refresh;
pub mod store;

pub use extraction::{build_extractor, InterpreterExtractor, PatternExtractor, SubstitutionExtractor};
pub use models::{
    Day, DaySnapshot, PlanSnapshot, RefreshError, SubstitutionKind, SubstitutionRecord,
};
pub use queries::{AllSubstitutions, ClassView, DayFilter, DayView, QueryError, SubstitutionQueries};
pub use refresh::{DocumentSources, RefreshFailure, RefreshOrchestrator, RefreshOutcome};
pub use store::SnapshotStore;
