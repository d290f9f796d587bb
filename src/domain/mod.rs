//! Domain types for the interview analysis pipeline.
//!
//! This module contains the core data structures:
//! - Statement: one typed, confidence-scored extracted sentence
//! - Interview: an interviewee's full processed record
//! - AnalysisVersion: an immutable snapshot of a cross-interview report

pub mod analysis;
pub mod interview;
pub mod statement;

// Re-export commonly used types
pub use analysis::{
    AnalysisReport, AnalysisVersion, ChatMessage, ChatRole, VersionMeta, VersionType,
};
pub use interview::Interview;
pub use statement::{Statement, StatementType};
