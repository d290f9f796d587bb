//! Analysis artifacts: reports, immutable versions, and chat turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How an analysis version came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    /// First report produced by the analysis engine
    Initial,

    /// Saved by hand from the application layer
    Manual,

    /// Produced by a chat turn that returned a full replacement report
    AiChat,
}

/// Required metadata for a saved analysis version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionMeta {
    pub version_type: VersionType,

    /// Number of interviews included in the analysis
    pub interviews_analyzed: usize,

    /// Number of statements included in the analysis
    pub statements_analyzed: usize,

    /// For `ai_chat` versions: the user prompt that triggered the rewrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Model that produced the report text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// One immutable snapshot of a cross-interview report.
///
/// Versions are append-only: edits produce a new version, never an
/// in-place update. "Latest" is the version with the maximum timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisVersion {
    /// Markdown-like report body
    pub text: String,

    /// Research questions this report answers (ordered, non-empty)
    pub questions: Vec<String>,

    /// Version metadata
    pub metadata: VersionMeta,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Storage identity, assigned at creation
    #[serde(default)]
    pub filename: String,
}

/// Structured result of one analysis-engine run, before persistence
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Raw report text from the oracle
    pub text: String,

    /// Questions echoed back in order
    pub questions: Vec<String>,

    /// Count of statements analyzed
    pub statements_analyzed: usize,

    /// Count of interviews analyzed
    pub interviews_analyzed: usize,

    /// Model that produced the report
    pub model: String,

    /// When the analysis completed
    pub timestamp: DateTime<Utc>,
}

impl AnalysisReport {
    /// Version metadata for persisting this report as the initial version
    pub fn version_meta(&self) -> VersionMeta {
        VersionMeta {
            version_type: VersionType::Initial,
            interviews_analyzed: self.interviews_analyzed,
            statements_analyzed: self.statements_analyzed,
            prompt: None,
            model: Some(self.model.clone()),
        }
    }
}

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the revision chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
