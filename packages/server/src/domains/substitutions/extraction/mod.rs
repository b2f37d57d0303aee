//! Substitution extraction - raw plan text in, ordered records out.
//!
//! Two interchangeable strategies share the `SubstitutionExtractor` contract:
//! - `PatternExtractor`: fixed-field line grammar, deterministic
//! - `InterpreterExtractor`: delegates to an LLM, tolerant of layout drift
//!
//! The strategy is chosen once when the server is built. Extraction never
//! fails: unusable input degrades to an empty list.

pub mod interpreter;
pub mod pattern;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::SubstitutionRecord;
use crate::config::ExtractionStrategy;
use crate::kernel::BaseAI;

pub use interpreter::InterpreterExtractor;
pub use pattern::PatternExtractor;

#[async_trait]
pub trait SubstitutionExtractor: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Extract records from `text`, all stamped with `extracted_at`.
    ///
    /// `target_class_key` is an already-normalized class key; when present only
    /// records for that class are wanted.
    async fn extract(
        &self,
        text: &str,
        target_class_key: Option<&str>,
        extracted_at: DateTime<Utc>,
    ) -> Vec<SubstitutionRecord>;
}

/// Build the extractor for the configured strategy.
///
/// The interpreter strategy needs an AI client; asking for it without one is a
/// configuration error.
pub fn build_extractor(
    strategy: ExtractionStrategy,
    ai: Option<Arc<dyn BaseAI>>,
) -> Result<Arc<dyn SubstitutionExtractor>> {
    match strategy {
        ExtractionStrategy::Pattern => Ok(Arc::new(PatternExtractor::new())),
        ExtractionStrategy::Interpreter => {
            let ai = ai.ok_or_else(|| anyhow!("Interpreter strategy requires an AI client"))?;
            Ok(Arc::new(InterpreterExtractor::new(ai)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockAI;

    #[test]
    fn test_build_extractor_selects_strategy() {
        let pattern = build_extractor(ExtractionStrategy::Pattern, None).unwrap();
        assert_eq!(pattern.name(), "pattern");

        let ai: Arc<dyn BaseAI> = Arc::new(MockAI::new());
        let interpreter = build_extractor(ExtractionStrategy::Interpreter, Some(ai)).unwrap();
        assert_eq!(interpreter.name(), "interpreter");
    }

    #[test]
    fn test_interpreter_without_ai_is_rejected() {
        assert!(build_extractor(ExtractionStrategy::Interpreter, None).is_err());
    }
}
