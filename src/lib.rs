//! inzicht - Interview statement extraction and analysis
//!
//! Turns raw Dutch interview transcripts into typed, confidence-scored
//! statements and answers research questions across a set of
//! interviews.
//!
//! # Architecture
//!
//! The pipeline is a straight line with one external dependency, the
//! oracle (a language model behind a text-completion trait):
//! - Transcripts are cleaned, split into sentences, and chunked
//! - Each chunk is sent to the oracle, whose semi-structured reply is
//!   parsed into statements (an offline heuristic path exists too)
//! - Interviews marked ready are analyzed together into a report
//! - Reports are revised over chat; every accepted revision becomes a
//!   new immutable version
//!
//! # Modules
//!
//! - `domain`: Data structures (Statement, Interview, AnalysisVersion)
//! - `core`: Segmentation, classification, extraction, analysis, chat
//! - `oracle`: The language-model interface and the Anthropic client
//! - `store`: File-backed interview and version persistence
//! - `ingest`: Transcript file reading (.txt, .pdf)
//! - `export`: Markdown report export
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Ingest a transcript
//! inzicht ingest transcript.txt --name "Jan de Vries"
//!
//! # Gate it in and analyze
//! inzicht mark Jan_de_Vries_20240101_120000.json
//! inzicht analyze -q "Wat vinden medewerkers van het project?"
//!
//! # Revise the report interactively
//! inzicht chat
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod ingest;
pub mod oracle;
pub mod store;

// Re-export main types at crate root for convenience
pub use crate::core::{AnalysisSession, ChatReply};
pub use domain::{AnalysisReport, AnalysisVersion, Interview, Statement, StatementType};
pub use oracle::{AnthropicOracle, Oracle, OracleError, OracleRequest};
pub use store::{InterviewStore, VersionStore};
