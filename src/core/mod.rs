//! Pipeline core: deterministic text processing and oracle-backed
//! extraction and analysis.
//!
//! - `segmenter`: sentence splitting, cleaning, chunking
//! - `classifier`: keyword-based statement typing
//! - `extractor`: per-chunk oracle extraction and reply parsing
//! - `aggregator`: whole-interview processing (oracle and heuristic)
//! - `analysis`: cross-interview report generation
//! - `session`: conversational revision of a report

pub mod aggregator;
pub mod analysis;
pub mod classifier;
pub mod extractor;
pub mod segmenter;
pub mod session;

pub use aggregator::{process_heuristic, process_with_oracle, validate_submission};
pub use analysis::{analyze, flatten_statements, search_statements};
pub use classifier::classify;
pub use extractor::{extract, parse_reply};
pub use segmenter::{clean_text, split_into_segments, split_sentences};
pub use session::{AnalysisSession, ChatReply, REPORT_MARKER};
