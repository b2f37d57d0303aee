//! Fixed-field line grammar for the plan's text layer.
//!
//! Each non-blank line is matched independently against
//!
//! ```text
//! [kind] period  class  subject  teacher  room  [notes...]
//! ```
//!
//! with fields separated by runs of whitespace. Assignment is strictly
//! positional. Lines that do not match (headers, footers, page numbers) are
//! skipped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::debug;

use super::SubstitutionExtractor;
use crate::common::class_matches;
use crate::domains::substitutions::models::{SubstitutionKind, SubstitutionRecord};

lazy_static! {
    // Optional kind keyword, then period (single or range) and five
    // whitespace-separated fields, then free-text notes.
    static ref LINE_REGEX: Regex = Regex::new(
        r"^(?:(?P<kind>(?i:vertretung|entfall|raum-vtr\.?|verlegung))\s*)?(?P<period>\d{1,2}(?:\s*-\s*\d{1,2})?)\s+(?P<class>\S+)\s+(?P<subject>\S+)\s+(?P<teacher>\S+)\s+(?P<room>\S+)(?:\s+(?P<notes>.*\S))?\s*$"
    ).unwrap();
}

/// Deterministic regex-based extractor
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse every matching line of `text`, in source order.
    pub fn parse(&self, text: &str, extracted_at: DateTime<Utc>) -> Vec<SubstitutionRecord> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| LINE_REGEX.captures(line))
            .map(|caps| record_from_captures(&caps, extracted_at))
            .collect()
    }
}

fn record_from_captures(caps: &Captures<'_>, extracted_at: DateTime<Utc>) -> SubstitutionRecord {
    let field = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

    let kind = caps
        .name("kind")
        .map(|m| SubstitutionKind::from_label(m.as_str()))
        .unwrap_or_default();

    // "3 - 4" and "3-4" are the same period range
    let period: String = caps["period"].chars().filter(|c| !c.is_whitespace()).collect();

    SubstitutionRecord {
        subject: field("subject"),
        teacher: field("teacher"),
        room: field("room"),
        notes: field("notes"),
        ..SubstitutionRecord::new(kind, period, &caps["class"], extracted_at)
    }
}

#[async_trait]
impl SubstitutionExtractor for PatternExtractor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    async fn extract(
        &self,
        text: &str,
        target_class_key: Option<&str>,
        extracted_at: DateTime<Utc>,
    ) -> Vec<SubstitutionRecord> {
        let mut records = self.parse(text, extracted_at);

        if let Some(key) = target_class_key {
            records.retain(|record| class_matches(&record.class_key, key));
        }

        debug!(
            records = records.len(),
            target_class = ?target_class_key,
            "Pattern extraction complete"
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        "2026-10-19T06:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_positional_fields() {
        let records = PatternExtractor::new().parse("3  6abcd  Kob  102  Cop", at());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.kind, SubstitutionKind::Unknown);
        assert_eq!(record.period, "3");
        assert_eq!(record.class_key, "6abcd");
        assert_eq!(record.subject.as_deref(), Some("Kob"));
        assert_eq!(record.teacher.as_deref(), Some("102"));
        assert_eq!(record.room.as_deref(), Some("Cop"));
        assert_eq!(record.notes, None);
        assert_eq!(record.original_teacher, None);
    }

    #[test]
    fn test_kind_keyword_and_notes() {
        let text = "Entfall 5 6c Nph Pie NWT3 fällt aus\nRaum-Vtr. 3 7b Ph Bru 310";
        let records = PatternExtractor::new().parse(text, at());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, SubstitutionKind::Cancellation);
        assert_eq!(records[0].notes.as_deref(), Some("fällt aus"));
        assert_eq!(records[1].kind, SubstitutionKind::RoomChange);
        assert_eq!(records[1].room.as_deref(), Some("310"));
    }

    #[test]
    fn test_period_range() {
        let records = PatternExtractor::new().parse("3 - 4 9c F Brn 203", at());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].period, "3-4");
        assert_eq!(records[0].class_key, "9c");
    }

    #[test]
    fn test_non_matching_lines_are_skipped() {
        let text = "Lessing-Gymnasium Karlsruhe\n\nStunde Klasse Fach Lehrer Raum\n19.10.2026 Montag\n2 J12 M Sch 104\nSeite 1 / 1\n";
        let records = PatternExtractor::new().parse(text, at());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].class_key, "J12");
    }

    #[tokio::test]
    async fn test_order_and_determinism() {
        let text = "1 5a D Mey 101\n2 5b E Kra 102\n3 5a M Sch 103";
        let extractor = PatternExtractor::new();
        let first = extractor.extract(text, None, at()).await;
        let second = extractor.extract(text, None, at()).await;

        assert_eq!(first, second);
        let periods: Vec<&str> = first.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_target_class_filter_matches_post_filter() {
        let text = "1 5a D Mey 101\n2 5 B E Kra 102\n3 5A M Sch 103\n4 6abcd Kob 102 Cop";
        let extractor = PatternExtractor::new();

        let filtered = extractor.extract(text, Some("5a"), at()).await;
        let post_filtered: Vec<_> = extractor
            .extract(text, None, at())
            .await
            .into_iter()
            .filter(|r| crate::common::normalize_class_key(Some(&r.class_key)) == "5a")
            .collect();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered, post_filtered);
    }
}
