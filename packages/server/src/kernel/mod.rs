//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod document_fetcher;
pub mod errors;
pub mod pdf;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIClient;
pub use deps::ServerDeps;
pub use document_fetcher::HttpDocumentFetcher;
pub use errors::{ExtractionError, FetchError};
pub use pdf::PdfTextExtractor;
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{MockAI, MockDocumentFetcher, MockTextExtractor};
pub use traits::*;
