//! Append-only analysis version history.
//!
//! Every saved report becomes a new file named
//! `analysis_{YYYYmmdd_HHMMSS}_{uuid8}.json`; the uuid suffix keeps
//! filenames unique when two versions land within the same second.
//! Versions are never updated or deleted; "latest" is the version with
//! the maximum timestamp.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{AnalysisVersion, VersionMeta};

/// Directory-backed version store
pub struct VersionStore {
    root: PathBuf,
}

impl VersionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Append a new version; returns its filename.
    pub async fn save(
        &self,
        text: impl Into<String>,
        questions: Vec<String>,
        metadata: VersionMeta,
    ) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await.with_context(|| {
            format!(
                "Failed to create versions directory: {}",
                self.root.display()
            )
        })?;

        let timestamp = Utc::now();
        let id = Uuid::new_v4().simple().to_string();
        let filename = format!(
            "analysis_{}_{}.json",
            timestamp.format("%Y%m%d_%H%M%S"),
            &id[..8]
        );

        let version = AnalysisVersion {
            text: text.into(),
            questions,
            metadata,
            timestamp,
            filename: filename.clone(),
        };

        let json =
            serde_json::to_string_pretty(&version).context("Failed to serialize version")?;
        let path = self.root.join(&filename);
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write version file: {}", path.display()))?;

        debug!(filename, "Saved analysis version");
        Ok(filename)
    }

    /// Load one version by filename.
    pub async fn load(&self, filename: &str) -> Result<AnalysisVersion> {
        let path = self.root.join(filename);
        let json = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read version file: {}", path.display()))?;

        let mut version: AnalysisVersion = serde_json::from_str(&json)
            .with_context(|| format!("Malformed version file: {}", path.display()))?;
        version.filename = filename.to_string();
        Ok(version)
    }

    /// Load every version, newest first.
    ///
    /// Malformed files are skipped with a warning. The sort is stable,
    /// so versions with equal timestamps keep filename order.
    pub async fn load_all(&self) -> Result<Vec<AnalysisVersion>> {
        let mut filenames = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!(
                        "Failed to read versions directory: {}",
                        self.root.display()
                    )
                });
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to list versions directory")?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("analysis_") && name.ends_with(".json") {
                filenames.push(name);
            }
        }
        filenames.sort();

        let mut versions = Vec::new();
        for filename in filenames {
            match self.load(&filename).await {
                Ok(version) => versions.push(version),
                Err(error) => {
                    warn!(filename, error = %error, "Skipping unreadable version file");
                }
            }
        }

        versions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(versions)
    }

    /// The version with the maximum timestamp, if any exist.
    pub async fn latest(&self) -> Result<Option<AnalysisVersion>> {
        Ok(self.load_all().await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionType;
    use tempfile::TempDir;

    fn meta(version_type: VersionType) -> VersionMeta {
        VersionMeta {
            version_type,
            interviews_analyzed: 2,
            statements_analyzed: 10,
            prompt: None,
            model: Some("claude-3-5-sonnet-20241022".to_string()),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_unique_filenames() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path());

        // Both saves land within the same second; the suffix keeps them
        // distinct files.
        let first = store
            .save("versie een", vec!["vraag".to_string()], meta(VersionType::Initial))
            .await
            .unwrap();
        let second = store
            .save("versie twee", vec!["vraag".to_string()], meta(VersionType::AiChat))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("analysis_"));

        let versions = store.load_all().await.unwrap();
        assert_eq!(versions.len(), 2);
    }

    #[tokio::test]
    async fn test_save_never_mutates_existing_versions() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path());

        let first = store
            .save("origineel", vec![], meta(VersionType::Initial))
            .await
            .unwrap();
        store
            .save("herschreven", vec![], meta(VersionType::AiChat))
            .await
            .unwrap();

        let original = store.load(&first).await.unwrap();
        assert_eq!(original.text, "origineel");
        assert_eq!(original.metadata.version_type, VersionType::Initial);
    }

    #[tokio::test]
    async fn test_latest_has_maximum_timestamp() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path());
        assert!(store.latest().await.unwrap().is_none());

        store
            .save("eerste", vec![], meta(VersionType::Initial))
            .await
            .unwrap();
        store
            .save("tweede", vec![], meta(VersionType::AiChat))
            .await
            .unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        let versions = store.load_all().await.unwrap();
        let max = versions.iter().map(|v| v.timestamp).max().unwrap();
        assert_eq!(latest.timestamp, max);
    }

    #[tokio::test]
    async fn test_load_all_skips_malformed_files() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path());

        store
            .save("geldig", vec![], meta(VersionType::Initial))
            .await
            .unwrap();
        std::fs::write(temp.path().join("analysis_kapot.json"), "niet geldig").unwrap();

        let versions = store.load_all().await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].text, "geldig");
    }
}
