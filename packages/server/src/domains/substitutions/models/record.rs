use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of substitution entry as printed on the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubstitutionKind {
    /// "Vertretung" - another teacher covers the lesson
    Substitution,
    /// "Entfall" - the lesson is cancelled
    Cancellation,
    /// "Raum-Vtr." - same lesson, different room
    RoomChange,
    /// "Verlegung" - the lesson moves to another period
    Relocation,
    #[default]
    Unknown,
}

impl SubstitutionKind {
    /// Label used on the wire and in the plan itself
    pub fn as_str(&self) -> &'static str {
        match self {
            SubstitutionKind::Substitution => "Vertretung",
            SubstitutionKind::Cancellation => "Entfall",
            SubstitutionKind::RoomChange => "Raum-Vtr",
            SubstitutionKind::Relocation => "Verlegung",
            SubstitutionKind::Unknown => "Unbekannt",
        }
    }

    /// Classify a label (German plan keyword or English name).
    ///
    /// Case-insensitive, ignores a trailing period; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().trim_end_matches('.').to_lowercase();
        match label.as_str() {
            "vertretung" | "substitution" => SubstitutionKind::Substitution,
            "entfall" | "cancellation" => SubstitutionKind::Cancellation,
            "raum-vtr" | "raumvertretung" | "roomchange" | "room change" => {
                SubstitutionKind::RoomChange
            }
            "verlegung" | "relocation" => SubstitutionKind::Relocation,
            _ => SubstitutionKind::Unknown,
        }
    }
}

impl std::fmt::Display for SubstitutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SubstitutionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubstitutionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(SubstitutionKind::from_label(&label))
    }
}

/// SubstitutionRecord - one row of the substitution plan
///
/// Field names on the wire follow the existing mobile clients
/// (`type`, `class`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionRecord {
    #[serde(rename = "type", alias = "kind")]
    pub kind: SubstitutionKind,
    /// Period as printed; may be a range such as "3-4"
    pub period: String,
    /// Class label as printed; may name several classes ("6abcd")
    #[serde(rename = "class", alias = "classKey")]
    pub class_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_teacher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the record was extracted, not when the lesson takes place
    #[serde(rename = "timestamp", alias = "extractedAt")]
    pub extracted_at: DateTime<Utc>,
}

impl SubstitutionRecord {
    /// Minimal record with only the required fields set
    pub fn new(
        kind: SubstitutionKind,
        period: impl Into<String>,
        class_key: impl Into<String>,
        extracted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            period: period.into(),
            class_key: class_key.into(),
            subject: None,
            teacher: None,
            room: None,
            original_subject: None,
            original_teacher: None,
            original_room: None,
            notes: None,
            extracted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_label() {
        assert_eq!(SubstitutionKind::from_label("Vertretung"), SubstitutionKind::Substitution);
        assert_eq!(SubstitutionKind::from_label("ENTFALL"), SubstitutionKind::Cancellation);
        assert_eq!(SubstitutionKind::from_label("Raum-Vtr."), SubstitutionKind::RoomChange);
        assert_eq!(SubstitutionKind::from_label("Raum-Vtr"), SubstitutionKind::RoomChange);
        assert_eq!(SubstitutionKind::from_label("verlegung"), SubstitutionKind::Relocation);
        assert_eq!(SubstitutionKind::from_label("Klausur"), SubstitutionKind::Unknown);
    }

    #[test]
    fn test_record_wire_format() {
        let mut record = SubstitutionRecord::new(
            SubstitutionKind::RoomChange,
            "3",
            "7b",
            "2026-10-19T07:00:00Z".parse().unwrap(),
        );
        record.room = Some("310".to_string());
        record.original_room = Some("PHHS".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Raum-Vtr");
        assert_eq!(json["class"], "7b");
        assert_eq!(json["originalRoom"], "PHHS");
        assert_eq!(json["timestamp"], "2026-10-19T07:00:00Z");
        assert!(json.get("teacher").is_none());
    }

    #[test]
    fn test_record_accepts_aliases() {
        let record: SubstitutionRecord = serde_json::from_value(serde_json::json!({
            "kind": "Entfall",
            "period": "5",
            "classKey": "6c",
            "extractedAt": "2026-10-19T07:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.kind, SubstitutionKind::Cancellation);
        assert_eq!(record.class_key, "6c");
        assert_eq!(record.subject, None);
    }
}
