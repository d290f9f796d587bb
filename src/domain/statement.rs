//! Statement types and the extracted-statement record.
//!
//! `StatementType` carries the Dutch surface forms ("denkt", "voelt",
//! "doet", "zegt") as the single lookup table shared by the extractor,
//! the heuristic classifier, and the serialization boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Classification of an extracted statement.
///
/// Closed enumeration; the serialized form is the Dutch surface form,
/// matching the on-disk format of interview files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementType {
    /// Opinions, beliefs, thoughts ("denkt")
    #[serde(rename = "denkt")]
    Thought,

    /// Emotions, moods, experiences ("voelt")
    #[serde(rename = "voelt")]
    Feeling,

    /// Actions, behavior ("doet")
    #[serde(rename = "doet")]
    Action,

    /// Direct statements, declarations ("zegt")
    #[serde(rename = "zegt")]
    Statement,
}

impl StatementType {
    /// All variants in classifier scan order. Ties between keyword scores
    /// resolve to the earliest variant in this ordering.
    pub const ALL: [StatementType; 4] = [
        StatementType::Thought,
        StatementType::Feeling,
        StatementType::Action,
        StatementType::Statement,
    ];

    /// The Dutch verb used both as the serialized value and as the
    /// sentence-construction template key ("{name} {verb} ...").
    pub fn surface_form(self) -> &'static str {
        match self {
            StatementType::Thought => "denkt",
            StatementType::Feeling => "voelt",
            StatementType::Action => "doet",
            StatementType::Statement => "zegt",
        }
    }

    /// Map a surface form back to its variant, case-insensitively.
    /// Unknown values yield `None`; the extractor drops such records.
    pub fn from_surface_form(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "denkt" => Some(StatementType::Thought),
            "voelt" => Some(StatementType::Feeling),
            "doet" => Some(StatementType::Action),
            "zegt" => Some(StatementType::Statement),
            _ => None,
        }
    }

    /// Keyword indicators for the heuristic classifier.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            StatementType::Thought => &["denk", "vind", "meen", "geloof", "verwacht"],
            StatementType::Feeling => &["voel", "bang", "blij", "boos", "verdrietig", "zorgen"],
            StatementType::Action => &["doe", "maak", "ga", "gebruik", "werk"],
            StatementType::Statement => &["zeg", "vertel", "antwoord", "reageer", "opmerk"],
        }
    }
}

/// One extracted, typed, confidence-scored statement attributed to an
/// interviewee.
///
/// Statements are never mutated in place; edits replace the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// Final human-readable sentence. Starts with the interviewee's name
    /// as the grammatical subject (by construction, not validated).
    pub text: String,

    /// Classification label
    #[serde(rename = "type")]
    pub kind: StatementType,

    /// Original sentence this was derived from (may be empty for
    /// manually edited statements)
    pub source_text: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Open key/value map for collaborator-defined flags
    /// (e.g. `edited`, `interview_name`)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Statement {
    /// Create a new statement with empty metadata
    pub fn new(
        text: impl Into<String>,
        kind: StatementType,
        source_text: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            source_text: source_text.into(),
            confidence,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_form_round_trip() {
        for kind in StatementType::ALL {
            assert_eq!(
                StatementType::from_surface_form(kind.surface_form()),
                Some(kind)
            );
        }
    }

    #[test]
    fn test_surface_form_case_insensitive() {
        assert_eq!(
            StatementType::from_surface_form("DENKT"),
            Some(StatementType::Thought)
        );
        assert_eq!(
            StatementType::from_surface_form("  Zegt "),
            Some(StatementType::Statement)
        );
        assert_eq!(StatementType::from_surface_form("vraagt"), None);
    }

    #[test]
    fn test_statement_serialization_uses_dutch_forms() {
        let statement = Statement::new(
            "Jan zegt dat hij blij is",
            StatementType::Statement,
            "ik ben blij",
            0.9,
        );

        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json["type"], "zegt");
        assert_eq!(json["confidence"], 0.9);

        let parsed: Statement = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.kind, StatementType::Statement);
        assert_eq!(parsed.text, "Jan zegt dat hij blij is");
    }

    #[test]
    fn test_metadata_entries_survive_serialization() {
        let statement = Statement::new("Jan zegt iets", StatementType::Statement, "iets", 1.0)
            .with_metadata("edited", serde_json::Value::Bool(true));

        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json["metadata"]["edited"], true);
    }

    #[test]
    fn test_every_type_has_keywords() {
        for kind in StatementType::ALL {
            assert!(!kind.keywords().is_empty());
        }
    }
}
