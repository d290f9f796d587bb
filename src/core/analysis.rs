//! Cross-interview analysis engine.
//!
//! Flattens every statement from the selected interviews into one
//! context block, asks the oracle for a structured report (summary,
//! per-question answers with evidence and caveats, overarching
//! conclusions), and returns the report plus run metadata. Oracle
//! failure is returned as a value; the caller degrades to an error
//! message instead of crashing the analysis view.

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::config::OracleSettings;
use crate::domain::{AnalysisReport, Interview, Statement};
use crate::oracle::{Oracle, OracleError, OracleRequest};

/// Flatten all statements, each annotated inline with its confidence,
/// preserving interview order then statement order.
pub fn flatten_statements(interviews: &[Interview]) -> Vec<String> {
    interviews
        .iter()
        .flat_map(|interview| {
            interview
                .statements
                .iter()
                .map(|s| format!("{} (Betrouwbaarheid: {:.2})", s.text, s.confidence))
        })
        .collect()
}

/// Case-insensitive substring search over all statements, preserving
/// interview order then statement order. Each match is paired with the
/// interviewee it belongs to.
pub fn search_statements<'a>(
    interviews: &'a [Interview],
    query: &str,
) -> Vec<(&'a str, &'a Statement)> {
    let needle = query.to_lowercase();
    interviews
        .iter()
        .flat_map(|interview| {
            interview
                .statements
                .iter()
                .filter(|s| s.text.to_lowercase().contains(&needle))
                .map(|s| (interview.interviewee.as_str(), s))
        })
        .collect()
}

/// Run the cross-interview analysis.
#[instrument(skip_all, fields(interviews = interviews.len(), questions = questions.len()))]
pub async fn analyze(
    oracle: &dyn Oracle,
    interviews: &[Interview],
    questions: &[String],
    settings: &OracleSettings,
) -> Result<AnalysisReport, OracleError> {
    let statements = flatten_statements(interviews);
    info!(statements = statements.len(), "Starting analysis");

    let request = OracleRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: user_prompt(questions, &statements),
        temperature: 0.0,
        max_tokens: settings.max_tokens,
    };

    let text = oracle.complete(request).await.map_err(|error| {
        warn!(error = %error, "Analysis failed");
        error
    })?;

    Ok(AnalysisReport {
        text,
        questions: questions.to_vec(),
        statements_analyzed: statements.len(),
        interviews_analyzed: interviews.len(),
        model: settings.model.clone(),
        timestamp: Utc::now(),
    })
}

const SYSTEM_PROMPT: &str = r#"Je bent een expert in het analyseren van interview data en het trekken van diepgaande conclusies.
Je analyseert grondig alle patronen, thema's en verbanden tussen de verschillende statements.
Je onderbouwt al je conclusies met concrete voorbeelden en citaten uit de interviews.
Je structureert je antwoorden zeer duidelijk met:
- Een korte samenvatting aan het begin
- Duidelijke kopjes per onderzoeksvraag
- Subkopjes voor verschillende aspecten
- Concrete voorbeelden en citaten
- Heldere conclusies
- Nuances en kanttekeningen waar nodig
- Aanbevelingen voor vervolgonderzoek

Wees zo uitgebreid als nodig om de vragen goed te beantwoorden."#;

fn user_prompt(questions: &[String], statements: &[String]) -> String {
    let questions_block = questions
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyseer de volgende interview statements en beantwoord de onderzoeksvragen.
Geef een zeer grondige analyse met:

1. Samenvatting
- Korte overview van de belangrijkste bevindingen
- Algemene patronen en thema's
- Belangrijkste conclusies

2. Per onderzoeksvraag:
- Duidelijk antwoord op de vraag
- Uitgebreide onderbouwing met relevante statements
- Analyse van patronen en thema's
- Concrete voorbeelden en citaten
- Nuances en kanttekeningen
- Deelconclusies

3. Overkoepelende conclusies
- Synthese van alle bevindingen
- Belangrijkste inzichten
- Aanbevelingen voor vervolgonderzoek

Onderzoeksvragen:
{questions}

Interview Statements:
{statements}"#,
        questions = questions_block,
        statements = statements.join("\n")
    )
}
