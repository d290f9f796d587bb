//! Interview records: one interviewee's full processed transcript.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::statement::{Statement, StatementType};

/// Metadata key holding the durable storage identity of an interview.
pub const META_FILENAME: &str = "filename";
/// Metadata key for the per-interview analysis gate.
pub const META_READY: &str = "ready_for_analysis";
/// Metadata key recording the last statement-table edit.
pub const META_LAST_EDITED: &str = "last_edited";
/// Metadata key with the sha256 digest of the ingested transcript.
pub const META_SOURCE_DIGEST: &str = "source_sha256";

/// One interviewee's full processed record.
///
/// `metadata.filename` is the durable identity once persisted; the
/// statement list preserves extraction order and is only ever replaced
/// wholesale, never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    /// Display name of the interviewee (non-empty)
    pub interviewee: String,

    /// Creation timestamp (defaults to now)
    pub date: DateTime<Utc>,

    /// Original unsegmented input text
    pub raw_text: String,

    /// Extracted statements in chunk-submission order
    #[serde(default)]
    pub statements: Vec<Statement>,

    /// Open key/value map (`filename`, `ready_for_analysis`,
    /// `created_at`, `last_edited`, ...)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Interview {
    /// Create a fresh interview record stamped with the current time
    pub fn new(interviewee: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut metadata = HashMap::new();
        metadata.insert(
            "created_at".to_string(),
            serde_json::Value::String(now.to_rfc3339()),
        );
        metadata.insert(META_READY.to_string(), serde_json::Value::Bool(false));

        Self {
            interviewee: interviewee.into(),
            date: now,
            raw_text: raw_text.into(),
            statements: Vec::new(),
            metadata,
        }
    }

    /// Append a statement, preserving extraction order
    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Replace the statement list wholesale (user edit / reclassification)
    /// and stamp the edit time.
    pub fn replace_statements(&mut self, statements: Vec<Statement>) {
        self.statements = statements;
        self.metadata.insert(
            META_LAST_EDITED.to_string(),
            serde_json::Value::String(Utc::now().to_rfc3339()),
        );
    }

    /// Storage identity, present once the interview has been persisted
    pub fn filename(&self) -> Option<&str> {
        self.metadata.get(META_FILENAME).and_then(|v| v.as_str())
    }

    /// Record the storage identity
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.metadata.insert(
            META_FILENAME.to_string(),
            serde_json::Value::String(filename.into()),
        );
    }

    /// Whether this interview is gated in for cross-interview analysis
    pub fn ready_for_analysis(&self) -> bool {
        self.metadata
            .get(META_READY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Toggle the analysis gate
    pub fn set_ready(&mut self, ready: bool) {
        self.metadata
            .insert(META_READY.to_string(), serde_json::Value::Bool(ready));
    }

    /// Statements of a single type
    pub fn statements_of(&self, kind: StatementType) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(move |s| s.kind == kind)
    }

    /// Summary counts per type, in classifier scan order
    pub fn type_counts(&self) -> [(StatementType, usize); 4] {
        StatementType::ALL.map(|kind| (kind, self.statements_of(kind).count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interview_defaults() {
        let interview = Interview::new("Jan", "ruwe tekst");
        assert_eq!(interview.interviewee, "Jan");
        assert!(interview.statements.is_empty());
        assert!(!interview.ready_for_analysis());
        assert!(interview.filename().is_none());
        assert!(interview.metadata.contains_key("created_at"));
    }

    #[test]
    fn test_ready_toggle() {
        let mut interview = Interview::new("Jan", "");
        interview.set_ready(true);
        assert!(interview.ready_for_analysis());
        interview.set_ready(false);
        assert!(!interview.ready_for_analysis());
    }

    #[test]
    fn test_replace_statements_stamps_edit_time() {
        let mut interview = Interview::new("Jan", "");
        interview.add_statement(Statement::new(
            "Jan zegt iets",
            StatementType::Statement,
            "iets",
            1.0,
        ));
        assert!(!interview.metadata.contains_key(META_LAST_EDITED));

        interview.replace_statements(vec![Statement::new(
            "Jan denkt iets anders",
            StatementType::Thought,
            "",
            0.5,
        )]);

        assert_eq!(interview.statements.len(), 1);
        assert_eq!(interview.statements[0].kind, StatementType::Thought);
        assert!(interview.metadata.contains_key(META_LAST_EDITED));
    }

    #[test]
    fn test_type_counts() {
        let mut interview = Interview::new("Jan", "");
        interview.add_statement(Statement::new("a", StatementType::Thought, "", 0.5));
        interview.add_statement(Statement::new("b", StatementType::Thought, "", 0.5));
        interview.add_statement(Statement::new("c", StatementType::Action, "", 0.5));

        let counts = interview.type_counts();
        assert_eq!(counts[0], (StatementType::Thought, 2));
        assert_eq!(counts[1], (StatementType::Feeling, 0));
        assert_eq!(counts[2], (StatementType::Action, 1));
        assert_eq!(counts[3], (StatementType::Statement, 0));
    }
}
