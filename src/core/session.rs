//! Conversational revision of an analysis report.
//!
//! `AnalysisSession` is explicit session state owned by the caller:
//! research questions, the interviews under analysis, the current
//! report, and the chat history. Each `ask` performs exactly one oracle
//! call (no retries) and classifies the reply: a reply containing the
//! literal report header marker is a full replacement report, anything
//! else is a plain answer.
//!
//! Known fragility, preserved deliberately: classification is a literal
//! substring check, so a plain answer that happens to quote the marker
//! is misclassified as a new report.

use tracing::{info, warn};

use crate::config::OracleSettings;
use crate::domain::{ChatMessage, ChatRole, Interview, VersionMeta, VersionType};
use crate::oracle::{Oracle, OracleRequest};

/// Header every full replacement report starts with.
pub const REPORT_MARKER: &str = "# Interview Analyse Rapport";

/// Number of recent chat turns included in the oracle context.
const HISTORY_WINDOW: usize = 5;

/// Assistant turn recorded when a chat turn produced a new report.
const NEW_REPORT_NOTE: &str =
    "Ik heb een nieuwe versie van de analyse gemaakt op basis van je verzoek.";

/// Outcome of one chat turn
#[derive(Debug, Clone)]
pub enum ChatReply {
    /// The oracle produced a full replacement report. The caller must
    /// persist it as an `ai_chat` version and then `adopt_report` it.
    NewReport { text: String },

    /// A plain answer; the current report is unchanged.
    Answer { text: String },

    /// The oracle call failed; `message` is the user-visible assistant
    /// turn. Nothing is persisted, the current report is unchanged.
    Failed { message: String },
}

/// One analysis session's mutable state
pub struct AnalysisSession {
    questions: Vec<String>,
    interviews: Vec<Interview>,
    current_report: Option<String>,
    history: Vec<ChatMessage>,
}

impl AnalysisSession {
    /// Start a session over a set of interviews and questions,
    /// optionally seeded with an existing report.
    pub fn new(
        questions: Vec<String>,
        interviews: Vec<Interview>,
        initial_report: Option<String>,
    ) -> Self {
        Self {
            questions,
            interviews,
            current_report: initial_report,
            history: Vec::new(),
        }
    }

    /// The report this session currently considers authoritative
    pub fn current_report(&self) -> Option<&str> {
        self.current_report.as_deref()
    }

    /// Full chat history in turn order
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Advance the current report after the caller persisted a new
    /// version.
    pub fn adopt_report(&mut self, text: impl Into<String>) {
        self.current_report = Some(text.into());
    }

    /// Version metadata for persisting a chat-produced report
    pub fn version_meta(&self, prompt: &str, model: &str) -> VersionMeta {
        VersionMeta {
            version_type: VersionType::AiChat,
            interviews_analyzed: self.interviews.len(),
            statements_analyzed: self
                .interviews
                .iter()
                .map(|i| i.statements.len())
                .sum(),
            prompt: Some(prompt.to_string()),
            model: Some(model.to_string()),
        }
    }

    /// Run one chat turn.
    ///
    /// Appends the user turn, calls the oracle once with the session
    /// context, records the assistant turn, and classifies the reply.
    pub async fn ask(
        &mut self,
        oracle: &dyn Oracle,
        prompt: &str,
        settings: &OracleSettings,
    ) -> ChatReply {
        self.history.push(ChatMessage::user(prompt));

        let request = OracleRequest {
            system: self.context(),
            user: prompt.to_string(),
            temperature: 0.1,
            max_tokens: settings.max_tokens,
        };

        match oracle.complete(request).await {
            Ok(reply) => {
                if reply.contains(REPORT_MARKER) {
                    info!("Chat turn produced a full replacement report");
                    self.history.push(ChatMessage::assistant(NEW_REPORT_NOTE));
                    ChatReply::NewReport { text: reply }
                } else {
                    self.history.push(ChatMessage::assistant(reply.clone()));
                    ChatReply::Answer { text: reply }
                }
            }
            Err(error) => {
                warn!(error = %error, "Chat turn failed");
                let message = format!("Er is een fout opgetreden: {}", error);
                self.history.push(ChatMessage::assistant(message.clone()));
                ChatReply::Failed { message }
            }
        }
    }

    /// System context: questions, the flattened statement block, and the
    /// most recent chat turns.
    fn context(&self) -> String {
        let questions_text = self
            .questions
            .iter()
            .map(|q| format!("- {}", q))
            .collect::<Vec<_>>()
            .join("\n");

        let statements_text = self
            .interviews
            .iter()
            .flat_map(|interview| {
                interview.statements.iter().map(|s| {
                    format!(
                        "- {} (Type: {}, Confidence: {:.2})",
                        s.text,
                        s.kind.surface_form(),
                        s.confidence
                    )
                })
            })
            .collect::<Vec<_>>()
            .join("\n");

        let recent = self
            .history
            .iter()
            .rev()
            .take(HISTORY_WINDOW)
            .collect::<Vec<_>>();
        let history_text = recent
            .iter()
            .rev()
            .map(|message| {
                let speaker = match message.role {
                    ChatRole::User => "User",
                    ChatRole::Assistant => "Assistant",
                };
                format!("{}: {}", speaker, message.content)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Je bent een behulpzame assistent die ondersteuning biedt bij het analyseren van interviews.
Je hebt toegang tot de volgende informatie:

ONDERZOEKSVRAGEN:
{questions}

STATEMENTS UIT INTERVIEWS:
{statements}

RECENTE CHAT GESCHIEDENIS:
{history}

Je taak is om de gebruiker te helpen met:
1. Het beantwoorden van vragen over de analyse
2. Het herformatteren van de analyse op verzoek
3. Het verduidelijken van conclusies

Belangrijke regels:
- Baseer je conclusies ALLEEN op de gegeven statements
- Wees duidelijk en professioneel
- Als je een nieuwe versie van de analyse maakt, gebruik dan markdown formatting
- Begin elke nieuwe versie van de analyse met de standaard metadata sectie

Als je een nieuwe versie van de analyse maakt, begin dan met '{marker}'
Als je alleen een vraag beantwoordt, geef dan een normaal antwoord."#,
            questions = questions_text,
            statements = statements_text,
            history = history_text,
            marker = REPORT_MARKER
        )
    }
}
