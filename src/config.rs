//! Configuration for inzicht paths and pipeline settings.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (INZICHT_HOME, INZICHT_DATA)
//! 2. Config file (.inzicht/config.yaml)
//! 3. Defaults (~/.inzicht)
//!
//! Config file discovery:
//! - Searches current directory and parents for .inzicht/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<std::result::Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub processing: Option<ProcessingConfig>,
    #[serde(default)]
    pub oracle: Option<OracleConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Engine state directory (relative to config file)
    pub home: Option<String>,
    /// Interview/version data directory (relative to config file)
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessingConfig {
    pub chunk_size: Option<usize>,
    pub min_statement_length: Option<usize>,
    pub max_statement_length: Option<usize>,
    pub max_file_size_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OracleConfig {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to inzicht home
    pub home: PathBuf,
    /// Absolute path to the data directory (interviews + versions)
    pub data: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Text-processing settings
    pub processing: ProcessingSettings,
    /// Oracle settings
    pub oracle: OracleSettings,
}

/// Segmentation and statement-length settings
#[derive(Debug, Clone)]
pub struct ProcessingSettings {
    /// Characters per chunk sent to the oracle
    pub chunk_size: usize,
    /// Shortest sentence the heuristic path keeps
    pub min_statement_length: usize,
    /// Longest sentence the heuristic path keeps
    pub max_statement_length: usize,
    /// Upload size limit for transcript files
    pub max_file_size_mb: u64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            min_statement_length: 10,
            max_statement_length: 750,
            max_file_size_mb: 10,
        }
    }
}

/// Oracle invocation settings
#[derive(Debug, Clone)]
pub struct OracleSettings {
    /// Model identifier
    pub model: String,
    /// Output token budget per call
    pub max_tokens: u32,
    /// Request timeout; a timeout is an oracle failure
    pub timeout_seconds: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 8192,
            timeout_seconds: 60,
        }
    }
}

impl OracleSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".inzicht").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(&path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

fn processing_settings(config: Option<&ProcessingConfig>) -> ProcessingSettings {
    let defaults = ProcessingSettings::default();
    ProcessingSettings {
        chunk_size: config
            .and_then(|c| c.chunk_size)
            .unwrap_or(defaults.chunk_size),
        min_statement_length: config
            .and_then(|c| c.min_statement_length)
            .unwrap_or(defaults.min_statement_length),
        max_statement_length: config
            .and_then(|c| c.max_statement_length)
            .unwrap_or(defaults.max_statement_length),
        max_file_size_mb: config
            .and_then(|c| c.max_file_size_mb)
            .unwrap_or(defaults.max_file_size_mb),
    }
}

fn oracle_settings(config: Option<&OracleConfig>) -> OracleSettings {
    let defaults = OracleSettings::default();
    OracleSettings {
        model: config
            .and_then(|c| c.model.clone())
            .unwrap_or(defaults.model),
        max_tokens: config
            .and_then(|c| c.max_tokens)
            .unwrap_or(defaults.max_tokens),
        timeout_seconds: config
            .and_then(|c| c.timeout_seconds)
            .unwrap_or(defaults.timeout_seconds),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".inzicht");

    let config_file = find_config_file();

    let (home, data, processing, oracle) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .inzicht/
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        let home = if let Ok(env_home) = std::env::var("INZICHT_HOME") {
            PathBuf::from(env_home)
        } else if let Some(ref home_path) = config.paths.home {
            let inzicht_dir = config_path.parent().unwrap_or(Path::new("."));
            resolve_path(inzicht_dir, home_path)
        } else {
            default_home.clone()
        };

        let data = if let Ok(env_data) = std::env::var("INZICHT_DATA") {
            PathBuf::from(env_data)
        } else if let Some(ref data_path) = config.paths.data {
            resolve_path(base_dir, data_path)
        } else {
            home.join("data")
        };

        (
            home,
            data,
            processing_settings(config.processing.as_ref()),
            oracle_settings(config.oracle.as_ref()),
        )
    } else {
        let home = std::env::var("INZICHT_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home.clone());

        let data = std::env::var("INZICHT_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join("data"));

        (
            home,
            data,
            ProcessingSettings::default(),
            OracleSettings::default(),
        )
    };

    Ok(ResolvedConfig {
        home,
        data,
        config_file,
        processing,
        oracle,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Directory holding interview JSON files
pub fn data_dir() -> Result<PathBuf> {
    Ok(config()?.data.clone())
}

/// Directory holding analysis version files ($data/analysis_versions)
pub fn versions_dir() -> Result<PathBuf> {
    Ok(config()?.data.join("analysis_versions"))
}

/// Directory report exports default to ($data/exports)
pub fn exports_dir() -> Result<PathBuf> {
    Ok(config()?.data.join("exports"))
}
