//! Storage, ingestion, and export behavior against a real directory
//! tree.

use tempfile::TempDir;

use inzicht::config::ProcessingSettings;
use inzicht::core::process_heuristic;
use inzicht::domain::{VersionMeta, VersionType};
use inzicht::export;
use inzicht::ingest;
use inzicht::{InterviewStore, VersionStore};

fn meta() -> VersionMeta {
    VersionMeta {
        version_type: VersionType::Initial,
        interviews_analyzed: 1,
        statements_analyzed: 3,
        prompt: None,
        model: Some("claude-3-5-sonnet-20241022".to_string()),
    }
}

#[tokio::test]
async fn test_interviews_and_versions_share_a_data_directory() {
    // Mirrors the production layout: versions live in a subdirectory of
    // the interview data directory and never show up in listings.
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    let interviews = InterviewStore::new(&data);
    let versions = VersionStore::new(data.join("analysis_versions"));

    let mut interview = process_heuristic(
        "Ik denk dat dit goed werkt.",
        "Jan",
        &ProcessingSettings::default(),
    );
    interviews.save(&mut interview).await.unwrap();
    versions
        .save("# Interview Analyse Rapport\n\nTekst.", vec![], meta())
        .await
        .unwrap();

    assert_eq!(interviews.load_all().await.unwrap().len(), 1);
    assert_eq!(versions.load_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ingested_transcript_round_trips_through_store() {
    let temp = TempDir::new().unwrap();
    let transcript = temp.path().join("gesprek.txt");
    std::fs::write(
        &transcript,
        "Ik denk dat het project goed gaat. Ik voel me gewaardeerd door het team.",
    )
    .unwrap();

    let text = ingest::read_transcript(&transcript, 10).await.unwrap();
    let digest = ingest::content_digest(&text);

    let store = InterviewStore::new(temp.path().join("data"));
    let mut interview = process_heuristic(&text, "Jan", &ProcessingSettings::default());
    interview.metadata.insert(
        "source_sha256".to_string(),
        serde_json::Value::String(digest.clone()),
    );
    let filename = store.save(&mut interview).await.unwrap();

    let loaded = store.load(&filename).await.unwrap();
    assert_eq!(
        loaded.metadata.get("source_sha256").and_then(|v| v.as_str()),
        Some(digest.as_str())
    );
    assert_eq!(loaded.statements.len(), 2);
}

#[tokio::test]
async fn test_export_writes_latest_version_as_markdown() {
    let temp = TempDir::new().unwrap();
    let versions = VersionStore::new(temp.path().join("versions"));

    versions
        .save(
            "# Interview Analyse Rapport\n\nBevindingen.",
            vec!["Wat vinden medewerkers?".to_string()],
            meta(),
        )
        .await
        .unwrap();

    let latest = versions.latest().await.unwrap().unwrap();
    let exports = temp.path().join("exports");
    let path = export::write_report(&latest, &exports).await.unwrap();

    assert_eq!(path.extension().unwrap(), "md");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Interviews: 1"));
    assert!(content.contains("- Wat vinden medewerkers?"));
    assert!(content.contains("Bevindingen."));
}

#[tokio::test]
async fn test_delete_leaves_other_interviews_intact() {
    let temp = TempDir::new().unwrap();
    let store = InterviewStore::new(temp.path());

    let mut first = process_heuristic(
        "Ik denk dat dit goed werkt.",
        "Jan",
        &ProcessingSettings::default(),
    );
    let mut second = process_heuristic(
        "Ik voel me hier prettig bij.",
        "Marie",
        &ProcessingSettings::default(),
    );
    let first_name = store.save(&mut first).await.unwrap();
    store.save(&mut second).await.unwrap();

    store.delete(&first_name).await.unwrap();

    let remaining = store.load_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].interviewee, "Marie");
}
