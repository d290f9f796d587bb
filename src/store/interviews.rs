//! Interview persistence: one JSON document per interview.
//!
//! Filenames are `{sanitized_interviewee}_{YYYYmmdd_HHMMSS}.json`,
//! assigned on first save and stable afterwards; the filename is the
//! interview's identity across loads. `load_all` is tolerant: foreign
//! or malformed files are skipped with a warning instead of failing the
//! whole listing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Interview, Statement};

/// On-disk document shape
#[derive(Debug, Serialize, Deserialize)]
struct StoredInterview {
    interviewee: String,
    date: DateTime<Utc>,
    raw_text: String,
    statements: Vec<Statement>,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    ready_for_analysis: bool,
}

impl StoredInterview {
    fn from_interview(interview: &Interview) -> Self {
        Self {
            interviewee: interview.interviewee.clone(),
            date: interview.date,
            raw_text: interview.raw_text.clone(),
            statements: interview.statements.clone(),
            metadata: interview.metadata.clone(),
            ready_for_analysis: interview.ready_for_analysis(),
        }
    }

    fn into_interview(self, filename: &str) -> Interview {
        let mut interview = Interview {
            interviewee: self.interviewee,
            date: self.date,
            raw_text: self.raw_text,
            statements: self.statements,
            metadata: self.metadata,
        };
        interview.set_ready(self.ready_for_analysis);
        interview.set_filename(filename);
        interview
    }
}

/// Directory-backed interview store
pub struct InterviewStore {
    root: PathBuf,
}

impl InterviewStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an interview, assigning a filename on first save.
    ///
    /// Returns the filename the interview is stored under.
    pub async fn save(&self, interview: &mut Interview) -> Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create data directory: {}", self.root.display()))?;

        let filename = match interview.filename() {
            Some(existing) => existing.to_string(),
            None => {
                let filename = format!(
                    "{}_{}.json",
                    sanitize_name(&interview.interviewee),
                    interview.date.format("%Y%m%d_%H%M%S")
                );
                interview.set_filename(&filename);
                filename
            }
        };

        let stored = StoredInterview::from_interview(interview);
        let json = serde_json::to_string_pretty(&stored)
            .context("Failed to serialize interview")?;

        let path = self.root.join(&filename);
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write interview file: {}", path.display()))?;

        debug!(filename, "Saved interview");
        Ok(filename)
    }

    /// Load one interview by filename.
    pub async fn load(&self, filename: &str) -> Result<Interview> {
        let path = self.root.join(filename);
        let json = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read interview file: {}", path.display()))?;

        let stored: StoredInterview = serde_json::from_str(&json)
            .with_context(|| format!("Malformed interview file: {}", path.display()))?;

        Ok(stored.into_interview(filename))
    }

    /// Load every interview in the data directory, in filename order.
    ///
    /// Skips non-JSON files, analysis artifacts, and malformed
    /// documents.
    pub async fn load_all(&self) -> Result<Vec<Interview>> {
        let mut filenames = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("Failed to read data directory: {}", self.root.display())
                });
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to list data directory")?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".json") || name.starts_with("analysis_") {
                continue;
            }
            filenames.push(name);
        }
        filenames.sort();

        let mut interviews = Vec::new();
        for filename in filenames {
            match self.load(&filename).await {
                Ok(interview) => interviews.push(interview),
                Err(error) => {
                    warn!(filename, error = %error, "Skipping unreadable interview file");
                }
            }
        }

        Ok(interviews)
    }

    /// Delete one interview file.
    ///
    /// Refuses anything that is not an interview: non-JSON names,
    /// analysis artifacts, and files whose content does not parse as an
    /// interview document.
    pub async fn delete(&self, filename: &str) -> Result<()> {
        if !filename.ends_with(".json") || filename.starts_with("analysis_") {
            anyhow::bail!("Not an interview file: {}", filename);
        }

        let path = self.root.join(filename);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                anyhow::bail!("Interview not found: {}", filename)
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("Failed to read interview file: {}", path.display())
                });
            }
        };
        if serde_json::from_str::<StoredInterview>(&json).is_err() {
            anyhow::bail!("Not an interview file: {}", filename);
        }

        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to delete interview file: {}", path.display()))
    }

    /// Flip the ready-for-analysis flag and persist the change.
    pub async fn set_ready(&self, filename: &str, ready: bool) -> Result<()> {
        let mut interview = self.load(filename).await?;
        interview.set_ready(ready);
        self.save(&mut interview).await?;
        Ok(())
    }
}

/// Replace anything outside `[A-Za-z0-9_-]` so the interviewee name is
/// safe as a filename component.
fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "interview".to_string()
    } else {
        sanitized
    }
}
