//! LLM-backed extraction.
//!
//! The prompt describes the four entry shapes of the plan with one worked
//! example each and asks for a bare JSON array. Responses are recovered with
//! `extract_first_json_array`; anything that cannot be decoded yields no
//! records. A class filter is passed to the model as an instruction and is
//! not re-checked afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::SubstitutionExtractor;
use crate::common::extract_first_json_array;
use crate::domains::substitutions::models::{SubstitutionKind, SubstitutionRecord};
use crate::kernel::BaseAI;

/// Build the extraction prompt for one plan.
pub fn build_prompt(text: &str, target_class: Option<&str>, timestamp: DateTime<Utc>) -> String {
    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    let filter = target_class
        .map(|class| {
            format!(
                "FILTER: Only return entries for class \"{}\" (case-insensitive, ignore spaces).\n\n",
                class
            )
        })
        .unwrap_or_default();

    format!(
        r#"Analyze this German substitute plan (Vertretungsplan) and extract ALL substitution entries as a JSON array.

IMPORTANT: Look for these patterns in the text:
- "Vertretung3 - 46abcdKob102kRCop102" = Substitution for period 3, classes 6abcd, teacher Kob, room 102, replacing teacher Cop
- "Entfall5 - 66c---------NphPieNWT3" = Cancellation for period 5, class 6c, subject Nph, teacher Pie, room NWT3
- "Raum-Vtr.3 - 47bBruPh310PhBruPHHS" = Room change for period 3, class 7b, teacher Bru, subject Ph, new room 310, old room PHHS
- "Verlegung39cBrnF203ChBetCHHS" = Relocation for period 3, class 9c, teacher Brn, subject F, room 203, replacing Ch teacher Bet

Extract EVERY substitution entry and return as valid JSON array:
[
  {{
    "type": "Vertretung|Entfall|Raum-Vtr|Verlegung",
    "period": "period number",
    "class": "class name (e.g. 6abcd, 7b, J12)",
    "subject": "subject abbreviation",
    "teacher": "teacher name",
    "room": "room number",
    "originalSubject": "original subject if different",
    "originalTeacher": "original teacher if different",
    "originalRoom": "original room if different",
    "notes": "additional notes",
    "timestamp": "{timestamp}"
  }}
]

{filter}TEXT TO ANALYZE:
{text}

Return ONLY valid JSON array, no explanations or markdown."#
    )
}

/// Lenient shape of one array element as the model emits it.
///
/// Models mix strings and numbers ("period": 3, "room": 102) and use "" for
/// absent values, so every field is read as raw JSON first.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InterpretedRecord {
    #[serde(rename = "type", alias = "kind")]
    kind: Option<Value>,
    period: Option<Value>,
    #[serde(rename = "class", alias = "classKey")]
    class_key: Option<Value>,
    subject: Option<Value>,
    teacher: Option<Value>,
    room: Option<Value>,
    original_subject: Option<Value>,
    original_teacher: Option<Value>,
    original_room: Option<Value>,
    notes: Option<Value>,
    #[serde(alias = "extractedAt")]
    timestamp: Option<Value>,
}

fn text_value(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl InterpretedRecord {
    /// Convert into a record; `None` when the required period is missing.
    fn into_record(self, extracted_at: DateTime<Utc>) -> Option<SubstitutionRecord> {
        let period = text_value(self.period)?;
        let kind = text_value(self.kind)
            .map(|label| SubstitutionKind::from_label(&label))
            .unwrap_or_default();
        let extracted_at = text_value(self.timestamp)
            .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or(extracted_at);

        Some(SubstitutionRecord {
            kind,
            period,
            class_key: text_value(self.class_key).unwrap_or_default(),
            subject: text_value(self.subject),
            teacher: text_value(self.teacher),
            room: text_value(self.room),
            original_subject: text_value(self.original_subject),
            original_teacher: text_value(self.original_teacher),
            original_room: text_value(self.original_room),
            notes: text_value(self.notes),
            extracted_at,
        })
    }
}

/// Decode an interpreter response into records.
///
/// Elements without the required structure are dropped individually; a
/// response with no decodable array yields an empty list.
pub fn decode_response(response: &str, extracted_at: DateTime<Utc>) -> Vec<SubstitutionRecord> {
    let Some(values) = extract_first_json_array(response) else {
        warn!(
            response_length = response.len(),
            "Interpreter response contained no JSON array"
        );
        return Vec::new();
    };

    let total = values.len();
    let records: Vec<SubstitutionRecord> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<InterpretedRecord>(value).ok())
        .filter_map(|record| record.into_record(extracted_at))
        .collect();

    if records.len() < total {
        debug!(
            dropped = total - records.len(),
            "Dropped malformed interpreter entries"
        );
    }
    records
}

/// Extractor that delegates to an LLM
pub struct InterpreterExtractor {
    ai: Arc<dyn BaseAI>,
}

impl InterpreterExtractor {
    pub fn new(ai: Arc<dyn BaseAI>) -> Self {
        Self { ai }
    }
}

#[async_trait]
impl SubstitutionExtractor for InterpreterExtractor {
    fn name(&self) -> &'static str {
        "interpreter"
    }

    async fn extract(
        &self,
        text: &str,
        target_class_key: Option<&str>,
        extracted_at: DateTime<Utc>,
    ) -> Vec<SubstitutionRecord> {
        let prompt = build_prompt(text, target_class_key, extracted_at);

        debug!(
            text_length = text.len(),
            target_class = ?target_class_key,
            "Sending plan to interpreter"
        );

        let response = match self.ai.complete(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Interpreter unavailable, returning no records");
                return Vec::new();
            }
        };

        let records = decode_response(&response, extracted_at);
        info!(records = records.len(), "Interpreter extraction complete");
        records
    }
}
