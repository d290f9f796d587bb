//! Whole-interview processing.
//!
//! Turns a raw transcript into an `Interview`: clean, segment, extract
//! per chunk (oracle path) or classify per sentence (heuristic path),
//! concatenating statements in chunk order. No deduplication is
//! performed; overlap across chunk boundaries is an accepted tradeoff
//! of chunk-local extraction.

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::config::{OracleSettings, ProcessingSettings};
use crate::core::classifier::classify;
use crate::core::extractor::extract;
use crate::core::segmenter::{clean_text, split_into_segments, split_sentences};
use crate::domain::{Interview, Statement};
use crate::oracle::Oracle;

/// Reject empty submissions before any oracle call is attempted.
pub fn validate_submission(interviewee: &str, text: &str) -> Result<()> {
    if interviewee.trim().is_empty() {
        anyhow::bail!("Interviewee name must not be empty");
    }
    if text.trim().is_empty() {
        anyhow::bail!("Transcript text must not be empty");
    }
    Ok(())
}

/// Process a full transcript with oracle-backed extraction.
///
/// Chunks are processed sequentially; statements keep chunk-submission
/// order. A failed chunk contributes nothing but never aborts the rest.
#[instrument(skip_all, fields(interviewee = %interviewee))]
pub async fn process_with_oracle(
    oracle: &dyn Oracle,
    text: &str,
    interviewee: &str,
    processing: &ProcessingSettings,
    oracle_settings: &OracleSettings,
) -> Interview {
    let cleaned = clean_text(text);
    let mut interview = Interview::new(interviewee, cleaned.clone());

    let chunks = split_into_segments(&cleaned, processing.chunk_size);
    info!(chunks = chunks.len(), "Processing interview transcript");

    for (index, chunk) in chunks.iter().enumerate() {
        debug!(chunk = index + 1, total = chunks.len(), "Extracting chunk");
        for statement in extract(oracle, chunk, interviewee, oracle_settings).await {
            interview.add_statement(statement);
        }
    }

    info!(
        statements = interview.statements.len(),
        "Interview processed"
    );
    interview
}

/// Process a full transcript with the deterministic heuristic pipeline.
///
/// Sentences outside the configured length gate are skipped; kept
/// sentences are classified and rephrased as
/// `"{interviewee} {verb} {sentence}"`.
pub fn process_heuristic(
    text: &str,
    interviewee: &str,
    processing: &ProcessingSettings,
) -> Interview {
    let cleaned = clean_text(text);
    let mut interview = Interview::new(interviewee, cleaned.clone());

    for sentence in split_sentences(&cleaned) {
        let length = sentence.chars().count();
        if length < processing.min_statement_length || length > processing.max_statement_length {
            continue;
        }

        let (kind, confidence) = classify(&sentence);
        let text = format!("{} {} {}", interviewee, kind.surface_form(), sentence);
        interview.add_statement(Statement::new(text, kind, sentence, confidence));
    }

    info!(
        interviewee,
        statements = interview.statements.len(),
        "Interview processed heuristically"
    );
    interview
}
