//! Oracle-backed statement extraction.
//!
//! Per chunk: build the Dutch extraction prompt, call the oracle at
//! temperature 0.0, and parse its semi-structured reply into typed
//! statements. The reply grammar is repeated three-line blocks
//! (`TYPE:`, `TEKST:`, `ZEKERHEID:`) separated by blank lines.
//!
//! Failure policy: an oracle failure loses only this chunk (empty
//! result, logged); a malformed block loses only that record.

use tracing::{debug, warn};

use crate::config::OracleSettings;
use crate::domain::{Statement, StatementType};
use crate::oracle::{Oracle, OracleRequest};

const TYPE_FIELD: &str = "TYPE:";
const TEXT_FIELD: &str = "TEKST:";
const CONFIDENCE_FIELD: &str = "ZEKERHEID:";

/// Confidence assigned when the `ZEKERHEID:` value is missing or not a
/// number.
const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Extract statements from one transcript chunk.
///
/// Oracle failures are recovered here: the chunk yields no statements
/// and processing of the remaining chunks continues.
pub async fn extract(
    oracle: &dyn Oracle,
    chunk: &str,
    interviewee: &str,
    settings: &OracleSettings,
) -> Vec<Statement> {
    let request = OracleRequest {
        system: system_prompt(interviewee),
        user: user_prompt(interviewee, chunk),
        temperature: 0.0,
        max_tokens: settings.max_tokens,
    };

    match oracle.complete(request).await {
        Ok(reply) => {
            let statements = parse_reply(&reply);
            debug!(
                interviewee,
                chunk_chars = chunk.chars().count(),
                statements = statements.len(),
                "Extracted statements from chunk"
            );
            statements
        }
        Err(error) => {
            warn!(
                interviewee,
                error = %error,
                "Statement extraction failed for chunk, continuing with remaining chunks"
            );
            Vec::new()
        }
    }
}

/// In-progress parse state for one reply block
#[derive(Debug, Default)]
struct PendingStatement {
    kind: Option<String>,
    text: Option<String>,
    confidence: Option<f64>,
}

impl PendingStatement {
    fn is_empty(&self) -> bool {
        self.kind.is_none() && self.text.is_none() && self.confidence.is_none()
    }

    /// Turn the accumulated fields into a statement, or drop the record
    /// when the type is missing/unmapped or the text is missing.
    fn flush(&mut self) -> Option<Statement> {
        if self.is_empty() {
            return None;
        }

        let pending = std::mem::take(self);

        let Some(raw_kind) = pending.kind else {
            warn!("Dropping statement without type");
            return None;
        };
        let Some(kind) = StatementType::from_surface_form(&raw_kind) else {
            warn!(value = %raw_kind, "Dropping statement with unmapped type");
            return None;
        };

        let Some(text) = pending.text else {
            warn!("Dropping statement without text");
            return None;
        };

        let confidence = pending.confidence.unwrap_or(DEFAULT_CONFIDENCE);
        Some(Statement::new(text.clone(), kind, text, confidence))
    }
}

/// Parse an oracle reply into statements.
///
/// Line-oriented: field lines accumulate into a pending record, a blank
/// line flushes it, and any still-pending record is flushed after the
/// final line (the reply may not end with a blank line).
pub fn parse_reply(reply: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut pending = PendingStatement::default();

    for raw_line in reply.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            if let Some(statement) = pending.flush() {
                statements.push(statement);
            }
            continue;
        }

        if let Some(value) = line.strip_prefix(TYPE_FIELD) {
            pending.kind = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(TEXT_FIELD) {
            pending.text = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(CONFIDENCE_FIELD) {
            pending.confidence = Some(value.trim().parse().unwrap_or(DEFAULT_CONFIDENCE));
        }
    }

    if let Some(statement) = pending.flush() {
        statements.push(statement);
    }

    statements
}

/// System instructions: statement format, per-type verbs, confidence
/// rubric.
fn system_prompt(interviewee: &str) -> String {
    format!(
        r#"Je bent een expert in het analyseren van interviews.
Je extraheert belangrijke uitspraken en formuleert ze ALTIJD in het exacte format: "{name} [werkwoord] [statement]"
Gebruik altijd de naam '{name}' aan het begin van elke zin.
Begin elke zin met:
- "{name} denkt..." voor meningen en gedachten
- "{name} voelt..." voor emoties en gevoelens
- "{name} doet..." voor acties en handelingen
- "{name} zegt..." voor uitspraken en mededelingen

Zorg dat elke uitspraak op een nieuwe regel begint en gebruik een lege regel tussen uitspraken.

Bepaal voor elke uitspraak een betrouwbaarheidsscore (ZEKERHEID) tussen 0.0 en 1.0:
- 1.0: Directe quotes of expliciete uitspraken
- 0.9: Zeer duidelijke implicaties of herhaalde thema's
- 0.8: Duidelijke interpretaties van de context
- 0.7: Redelijke aannames gebaseerd op meerdere uitspraken
- 0.6: Voorzichtige interpretaties
- 0.5 of lager: Speculatieve of onduidelijke interpretaties"#,
        name = interviewee
    )
}

/// User message: the reply grammar demand plus the chunk itself
fn user_prompt(interviewee: &str, chunk: &str) -> String {
    format!(
        r#"Analyseer het volgende interview segment en extraheer belangrijke uitspraken.
Formuleer elke uitspraak in het exacte format: "{name} [werkwoord] [statement]"

Voor elke relevante uitspraak, bepaal het type:
- DENKT: "{name} denkt/vindt/gelooft..." (voor meningen, overtuigingen, gedachten)
- VOELT: "{name} voelt/is/wordt..." (voor emoties, stemmingen, ervaringen)
- DOET: "{name} gaat/maakt/gebruikt..." (voor acties, gedrag, handelingen)
- ZEGT: "{name} zegt/vertelt/geeft aan..." (voor directe uitspraken, verklaringen)

Geef voor elke uitspraak terug:
TYPE: [denkt/voelt/doet/zegt]
TEKST: {name} [werkwoord] [statement]
ZEKERHEID: [0.0-1.0] (hoe zekerder de interpretatie, hoe hoger de score)

Voorbeeld format:
TYPE: zegt
TEKST: {name} zegt verschillende hobby's te hebben
ZEKERHEID: 1.0

TYPE: denkt
TEKST: {name} vindt zijn hobby's belangrijk
ZEKERHEID: 0.8

Interview segment met {name}:
{chunk}"#,
        name = interviewee,
        chunk = chunk
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::testing::ScriptedOracle;
    use crate::oracle::OracleError;

    #[test]
    fn test_parse_single_block_without_trailing_blank_line() {
        // Reply ends at the last field, no trailing blank line.
        let reply = "TYPE: zegt\nTEKST: Jan zegt dat hij blij is\nZEKERHEID: 0.9\n";
        let statements = parse_reply(reply);

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].kind, StatementType::Statement);
        assert_eq!(statements[0].text, "Jan zegt dat hij blij is");
        assert_eq!(statements[0].confidence, 0.9);
    }

    #[test]
    fn test_parse_multiple_blocks() {
        let reply = "TYPE: denkt\nTEKST: Jan denkt dat het goed gaat\nZEKERHEID: 0.8\n\n\
                     TYPE: voelt\nTEKST: Jan voelt zich zeker\nZEKERHEID: 0.7\n\n\
                     TYPE: doet\nTEKST: Jan doet elke dag onderzoek\nZEKERHEID: 1.0\n";
        let statements = parse_reply(reply);

        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].kind, StatementType::Thought);
        assert_eq!(statements[1].kind, StatementType::Feeling);
        assert_eq!(statements[2].kind, StatementType::Action);
    }

    #[test]
    fn test_malformed_block_is_dropped_not_fatal() {
        // The middle block has an unmapped type; the other two survive.
        let reply = "TYPE: zegt\nTEKST: Jan zegt a\nZEKERHEID: 1.0\n\n\
                     TYPE: vraagt\nTEKST: Jan vraagt b\nZEKERHEID: 0.9\n\n\
                     TYPE: denkt\nTEKST: Jan denkt c\nZEKERHEID: 0.8\n";
        let statements = parse_reply(reply);

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].text, "Jan zegt a");
        assert_eq!(statements[1].text, "Jan denkt c");
    }

    #[test]
    fn test_block_without_text_is_dropped() {
        let reply = "TYPE: zegt\nZEKERHEID: 1.0\n\nTYPE: denkt\nTEKST: Jan denkt c\n";
        let statements = parse_reply(reply);

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].kind, StatementType::Thought);
    }

    #[test]
    fn test_unparseable_confidence_defaults() {
        let reply = "TYPE: zegt\nTEKST: Jan zegt a\nZEKERHEID: hoog\n";
        let statements = parse_reply(reply);

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_missing_confidence_defaults() {
        let reply = "TYPE: voelt\nTEKST: Jan voelt zich goed\n";
        let statements = parse_reply(reply);

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_type_mapping_is_case_insensitive() {
        let reply = "TYPE: ZEGT\nTEKST: Jan zegt a\nZEKERHEID: 1.0\n";
        let statements = parse_reply(reply);

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].kind, StatementType::Statement);
    }

    #[test]
    fn test_empty_reply_yields_nothing() {
        assert!(parse_reply("").is_empty());
        assert!(parse_reply("\n\n\n").is_empty());
    }

    #[tokio::test]
    async fn test_extract_parses_oracle_reply() {
        let oracle =
            ScriptedOracle::replying("TYPE: zegt\nTEKST: Jan zegt dat hij blij is\nZEKERHEID: 0.9");
        let settings = OracleSettings::default();

        let statements = extract(&oracle, "Ik ben blij.", "Jan", &settings).await;
        assert_eq!(statements.len(), 1);

        // Extraction runs at temperature 0.0 and embeds the chunk.
        let requests = oracle.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.0);
        assert!(requests[0].user.contains("Ik ben blij."));
        assert!(requests[0].system.contains("Jan"));
    }

    #[tokio::test]
    async fn test_extract_recovers_from_oracle_failure() {
        let oracle = ScriptedOracle::failing(OracleError::Timeout);
        let settings = OracleSettings::default();

        let statements = extract(&oracle, "Wat tekst.", "Jan", &settings).await;
        assert!(statements.is_empty());
    }
}
