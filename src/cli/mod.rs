//! Command-line interface for inzicht.
//!
//! Provides commands for ingesting transcripts, managing interviews,
//! running the cross-interview analysis, revising reports over chat,
//! and exporting versions.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, OracleSettings};
use crate::core::{
    analyze, classify, process_heuristic, process_with_oracle, search_statements,
    validate_submission, AnalysisSession, ChatReply,
};
use crate::domain::interview::META_SOURCE_DIGEST;
use crate::domain::{Interview, Statement, VersionType};
use crate::export;
use crate::ingest;
use crate::oracle::AnthropicOracle;
use crate::store::{InterviewStore, VersionStore};

/// inzicht - Interview statement extraction and analysis
#[derive(Parser, Debug)]
#[command(name = "inzicht")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a transcript file (.txt or .pdf) as a new interview
    Ingest {
        /// Transcript file to ingest
        file: PathBuf,

        /// Name of the interviewee
        #[arg(short, long)]
        name: String,

        /// Use the offline heuristic pipeline instead of the oracle
        #[arg(long)]
        heuristic: bool,
    },

    /// List stored interviews
    List,

    /// Show one interview's statements
    Show {
        /// Interview filename (see `list`)
        filename: String,
    },

    /// Toggle the ready-for-analysis flag of an interview
    Mark {
        /// Interview filename
        filename: String,

        /// Clear the flag instead of setting it
        #[arg(long)]
        not_ready: bool,
    },

    /// Delete an interview
    Delete {
        /// Interview filename
        filename: String,
    },

    /// Re-run the heuristic classifier over an interview's statements
    Reclassify {
        /// Interview filename
        filename: String,
    },

    /// Search the statements of all ready interviews
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },

    /// Analyze all ready interviews against research questions
    Analyze {
        /// Research question (repeatable)
        #[arg(short, long = "question", required = true)]
        questions: Vec<String>,
    },

    /// Revise the latest analysis in an interactive chat
    Chat,

    /// List stored analysis versions, newest first
    Versions,

    /// Export an analysis version as markdown
    Export {
        /// Version filename (defaults to the latest version)
        #[arg(long)]
        version: Option<String>,

        /// Output directory (defaults to the data exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Ingest {
                file,
                name,
                heuristic,
            } => ingest_transcript(&file, &name, heuristic).await,
            Commands::List => list_interviews().await,
            Commands::Show { filename } => show_interview(&filename).await,
            Commands::Mark {
                filename,
                not_ready,
            } => mark_interview(&filename, !not_ready).await,
            Commands::Delete { filename } => delete_interview(&filename).await,
            Commands::Reclassify { filename } => reclassify_interview(&filename).await,
            Commands::Search { query } => search_interviews(&query).await,
            Commands::Analyze { questions } => run_analysis(questions).await,
            Commands::Chat => run_chat().await,
            Commands::Versions => list_versions().await,
            Commands::Export { version, output } => export_version(version, output).await,
            Commands::Config => show_config(),
        }
    }
}

fn interview_store() -> Result<InterviewStore> {
    Ok(InterviewStore::new(config::data_dir()?))
}

fn version_store() -> Result<VersionStore> {
    Ok(VersionStore::new(config::versions_dir()?))
}

fn oracle_from_config(settings: &OracleSettings) -> Result<AnthropicOracle> {
    AnthropicOracle::from_env(settings.model.clone(), settings.timeout())
}

/// Ingest a transcript file and persist the resulting interview
async fn ingest_transcript(file: &PathBuf, name: &str, heuristic: bool) -> Result<()> {
    let cfg = config::config()?;
    let text = ingest::read_transcript(file, cfg.processing.max_file_size_mb)
        .await
        .with_context(|| format!("Failed to ingest {}", file.display()))?;

    validate_submission(name, &text)?;

    let digest = ingest::content_digest(&text);
    let store = interview_store()?;
    for existing in store.load_all().await? {
        let known = existing
            .metadata
            .get(META_SOURCE_DIGEST)
            .and_then(|v| v.as_str());
        if known == Some(digest.as_str()) {
            eprintln!(
                "Warning: identical transcript already ingested as {} ({})",
                existing.filename().unwrap_or("?"),
                existing.interviewee
            );
        }
    }

    let mut interview = if heuristic {
        process_heuristic(&text, name, &cfg.processing)
    } else {
        let oracle = oracle_from_config(&cfg.oracle)?;
        process_with_oracle(&oracle, &text, name, &cfg.processing, &cfg.oracle).await
    };

    interview.metadata.insert(
        META_SOURCE_DIGEST.to_string(),
        serde_json::Value::String(digest),
    );

    let filename = store.save(&mut interview).await?;

    println!("Ingested {} as {}", file.display(), filename);
    for (kind, count) in interview.type_counts() {
        println!("  {}: {}", kind.surface_form(), count);
    }
    println!("Total: {} statements", interview.statements.len());
    Ok(())
}

/// List stored interviews with their analysis gate
async fn list_interviews() -> Result<()> {
    let interviews = interview_store()?.load_all().await?;
    if interviews.is_empty() {
        println!("No interviews stored yet. Use `inzicht ingest` to add one.");
        return Ok(());
    }

    for interview in &interviews {
        let gate = if interview.ready_for_analysis() {
            "ready"
        } else {
            "draft"
        };
        println!(
            "{:<40} {:<20} {:>4} statements  [{}]",
            interview.filename().unwrap_or("?"),
            interview.interviewee,
            interview.statements.len(),
            gate
        );
    }
    Ok(())
}

/// Show one interview in full
async fn show_interview(filename: &str) -> Result<()> {
    let interview = interview_store()?.load(filename).await?;

    println!("Interviewee: {}", interview.interviewee);
    println!("Date: {}", interview.date.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "Ready for analysis: {}",
        if interview.ready_for_analysis() {
            "yes"
        } else {
            "no"
        }
    );
    println!();

    for (index, statement) in interview.statements.iter().enumerate() {
        println!(
            "{:>3}. [{}] ({:.2}) {}",
            index + 1,
            statement.kind.surface_form(),
            statement.confidence,
            statement.text
        );
    }
    println!("\nTotal: {} statements", interview.statements.len());
    Ok(())
}

async fn mark_interview(filename: &str, ready: bool) -> Result<()> {
    interview_store()?.set_ready(filename, ready).await?;
    println!(
        "{} is now {}",
        filename,
        if ready { "ready for analysis" } else { "a draft" }
    );
    Ok(())
}

async fn delete_interview(filename: &str) -> Result<()> {
    interview_store()?.delete(filename).await?;
    println!("Deleted {}", filename);
    Ok(())
}

/// Re-run the keyword classifier over the stored statements
async fn reclassify_interview(filename: &str) -> Result<()> {
    let store = interview_store()?;
    let mut interview = store.load(filename).await?;

    let interviewee = interview.interviewee.clone();
    let reclassified: Vec<Statement> = interview
        .statements
        .iter()
        .map(|statement| {
            let source = statement.source_text.clone();
            let (kind, confidence) = classify(&source);
            let text = format!("{} {} {}", interviewee, kind.surface_form(), source);
            Statement::new(text, kind, source, confidence)
        })
        .collect();

    interview.replace_statements(reclassified);
    store.save(&mut interview).await?;

    println!("Reclassified {} statements in {}", interview.statements.len(), filename);
    Ok(())
}

/// Search the statements of all ready interviews
async fn search_interviews(query: &str) -> Result<()> {
    let ready: Vec<Interview> = interview_store()?
        .load_all()
        .await?
        .into_iter()
        .filter(|i| i.ready_for_analysis())
        .collect();
    if ready.is_empty() {
        println!("No interviews are marked ready for analysis.");
        return Ok(());
    }

    let matches = search_statements(&ready, query);
    if matches.is_empty() {
        println!("No statements match '{}'.", query);
        return Ok(());
    }

    for (interviewee, statement) in &matches {
        println!(
            "{:<20} [{}] ({:.2}) {}",
            interviewee,
            statement.kind.surface_form(),
            statement.confidence,
            statement.text
        );
    }
    println!("\nTotal: {} matching statements", matches.len());
    Ok(())
}

/// Load the interviews gated in for analysis, failing when none are
fn ready_interviews(all: Vec<Interview>) -> Result<Vec<Interview>> {
    let ready: Vec<Interview> = all
        .into_iter()
        .filter(|i| i.ready_for_analysis())
        .collect();

    if ready.is_empty() {
        anyhow::bail!("No interviews are marked ready for analysis. Use `inzicht mark <filename>`.");
    }
    Ok(ready)
}

/// Run the cross-interview analysis and save the initial version
async fn run_analysis(questions: Vec<String>) -> Result<()> {
    let cfg = config::config()?;
    let interviews = ready_interviews(interview_store()?.load_all().await?)?;
    let oracle = oracle_from_config(&cfg.oracle)?;

    let report = analyze(&oracle, &interviews, &questions, &cfg.oracle)
        .await
        .context("Analysis failed")?;

    let filename = version_store()?
        .save(report.text.clone(), report.questions.clone(), report.version_meta())
        .await?;

    println!("{}", report.text);
    eprintln!(
        "\n[Analyzed {} statements across {} interviews; saved as {}]",
        report.statements_analyzed, report.interviews_analyzed, filename
    );
    Ok(())
}

/// Interactive revision chat over the latest analysis version
async fn run_chat() -> Result<()> {
    let cfg = config::config()?;
    let versions = version_store()?;
    let latest = versions
        .latest()
        .await?
        .context("No analysis versions yet. Run `inzicht analyze` first.")?;

    let interviews = ready_interviews(interview_store()?.load_all().await?)?;
    let oracle = oracle_from_config(&cfg.oracle)?;

    let mut session = AnalysisSession::new(
        latest.questions.clone(),
        interviews,
        Some(latest.text.clone()),
    );

    println!("Chatting about {} (type 'exit' to quit)", latest.filename);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?
            == 0
        {
            break;
        }

        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if matches!(prompt, "exit" | "quit" | "stop") {
            break;
        }

        match session.ask(&oracle, prompt, &cfg.oracle).await {
            ChatReply::NewReport { text } => {
                let meta = session.version_meta(prompt, &cfg.oracle.model);
                let filename = versions
                    .save(text.clone(), session.questions().to_vec(), meta)
                    .await?;
                session.adopt_report(text.clone());

                println!("{}", text);
                eprintln!("\n[Saved new version {}]", filename);
            }
            ChatReply::Answer { text } => println!("{}", text),
            ChatReply::Failed { message } => eprintln!("{}", message),
        }
    }

    Ok(())
}

/// List stored analysis versions, newest first
async fn list_versions() -> Result<()> {
    let versions = version_store()?.load_all().await?;
    if versions.is_empty() {
        println!("No analysis versions yet. Run `inzicht analyze` first.");
        return Ok(());
    }

    for version in &versions {
        let kind = match version.metadata.version_type {
            VersionType::Initial => "initial",
            VersionType::Manual => "manual",
            VersionType::AiChat => "ai_chat",
        };
        println!(
            "{:<45} {}  {:<8} {} interviews / {} statements",
            version.filename,
            version.timestamp.format("%Y-%m-%d %H:%M:%S"),
            kind,
            version.metadata.interviews_analyzed,
            version.metadata.statements_analyzed
        );
    }
    Ok(())
}

/// Export a version (default: the latest) as markdown
async fn export_version(version: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let store = version_store()?;
    let version = match version {
        Some(filename) => store.load(&filename).await?,
        None => store
            .latest()
            .await?
            .context("No analysis versions yet. Run `inzicht analyze` first.")?,
    };

    let dir = match output {
        Some(dir) => dir,
        None => config::exports_dir()?,
    };

    let path = export::write_report(&version, &dir).await?;
    println!("Exported to {}", path.display());
    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Resolved configuration:");
    println!("  home: {}", cfg.home.display());
    println!("  data: {}", cfg.data.display());
    match &cfg.config_file {
        Some(path) => println!("  config file: {}", path.display()),
        None => println!("  config file: (none found, using defaults)"),
    }
    println!("  chunk_size: {}", cfg.processing.chunk_size);
    println!(
        "  statement length: {}..={}",
        cfg.processing.min_statement_length, cfg.processing.max_statement_length
    );
    println!("  max_file_size_mb: {}", cfg.processing.max_file_size_mb);
    println!("  model: {}", cfg.oracle.model);
    println!("  max_tokens: {}", cfg.oracle.max_tokens);
    println!("  timeout_seconds: {}", cfg.oracle.timeout_seconds);
    Ok(())
}
