//! Markdown export of analysis versions.
//!
//! Rendering is pure; `write_report` only adds the filesystem side.
//! The export prepends a metadata front block and the research
//! questions to the stored report text.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::{AnalysisVersion, VersionType};

fn version_type_label(version_type: VersionType) -> &'static str {
    match version_type {
        VersionType::Initial => "initieel",
        VersionType::Manual => "handmatig",
        VersionType::AiChat => "ai_chat",
    }
}

/// Render one version as a standalone markdown document.
pub fn render_markdown(version: &AnalysisVersion) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!(
        "Datum: {}\n",
        version.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Type: {}\n",
        version_type_label(version.metadata.version_type)
    ));
    out.push_str(&format!(
        "Interviews: {}\n",
        version.metadata.interviews_analyzed
    ));
    out.push_str(&format!(
        "Statements: {}\n",
        version.metadata.statements_analyzed
    ));
    if let Some(model) = &version.metadata.model {
        out.push_str(&format!("Model: {}\n", model));
    }
    out.push_str("---\n\n");

    if !version.questions.is_empty() {
        out.push_str("## Onderzoeksvragen\n\n");
        for question in &version.questions {
            out.push_str(&format!("- {}\n", question));
        }
        out.push('\n');
    }

    out.push_str(&version.text);
    if !version.text.ends_with('\n') {
        out.push('\n');
    }

    out
}

/// Write a version to `{dir}/{version stem}.md`; returns the path.
pub async fn write_report(version: &AnalysisVersion, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let stem = version
        .filename
        .strip_suffix(".json")
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("analyse_{}", version.timestamp.format("%Y%m%d_%H%M%S")));

    let path = dir.join(format!("{}.md", stem));
    tokio::fs::write(&path, render_markdown(version))
        .await
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    info!(path = %path.display(), "Exported analysis report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionMeta;
    use chrono::Utc;
    use tempfile::TempDir;

    fn version() -> AnalysisVersion {
        AnalysisVersion {
            text: "# Interview Analyse Rapport\n\nBevindingen.".to_string(),
            questions: vec!["Wat vinden medewerkers?".to_string()],
            metadata: VersionMeta {
                version_type: VersionType::AiChat,
                interviews_analyzed: 2,
                statements_analyzed: 12,
                prompt: Some("maak het korter".to_string()),
                model: Some("claude-3-5-sonnet-20241022".to_string()),
            },
            timestamp: Utc::now(),
            filename: "analysis_20240101_120000_ab12cd34.json".to_string(),
        }
    }

    #[test]
    fn test_render_includes_metadata_questions_and_body() {
        let rendered = render_markdown(&version());

        assert!(rendered.starts_with("---\n"));
        assert!(rendered.contains("Type: ai_chat"));
        assert!(rendered.contains("Interviews: 2"));
        assert!(rendered.contains("Statements: 12"));
        assert!(rendered.contains("Model: claude-3-5-sonnet-20241022"));
        assert!(rendered.contains("- Wat vinden medewerkers?"));
        assert!(rendered.contains("# Interview Analyse Rapport"));
        assert!(rendered.ends_with("Bevindingen.\n"));
    }

    #[test]
    fn test_render_without_questions_skips_section() {
        let mut version = version();
        version.questions.clear();
        let rendered = render_markdown(&version);
        assert!(!rendered.contains("Onderzoeksvragen"));
    }

    #[tokio::test]
    async fn test_write_report_uses_version_stem() {
        let temp = TempDir::new().unwrap();
        let path = write_report(&version(), temp.path()).await.unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "analysis_20240101_120000_ab12cd34.md"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Bevindingen."));
    }
}
