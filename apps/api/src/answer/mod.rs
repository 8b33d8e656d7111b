//! Answer pipeline. Validates the question and credential, resolves the persona,
//! composes the two-message request and makes exactly one service call.
//!
//! Every path ends in an [`Answer`]; nothing is raised to the caller.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::llm_client::{ChatMessage, ChatRequest, CompletionService, MODEL, TEMPERATURE};
use crate::persona::{PersonaRegistry, PersonaSelector};
use crate::secrets::{ConfigProvider, OPENAI_API_KEY};

pub mod handlers;
pub mod page;
pub mod prompts;

use prompts::{
    EMPTY_INPUT_MESSAGE, LENGTH_CONSTRAINT, MISSING_CREDENTIAL_MESSAGE, QUESTION_TEMPLATE,
    SERVICE_FAILURE_PREFIX,
};

/// Outcome of one request. `Display` renders the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Model output, exactly as returned by the service.
    Generated(String),
    EmptyInput,
    MissingCredential,
    /// Carries the failure description.
    ServiceFailure(String),
}

/// Machine-readable label for an [`Answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Ok,
    EmptyInput,
    MissingCredential,
    ServiceFailure,
}

impl Answer {
    pub fn status(&self) -> AnswerStatus {
        match self {
            Answer::Generated(_) => AnswerStatus::Ok,
            Answer::EmptyInput => AnswerStatus::EmptyInput,
            Answer::MissingCredential => AnswerStatus::MissingCredential,
            Answer::ServiceFailure(_) => AnswerStatus::ServiceFailure,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Answer::Generated(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Generated(text) => f.write_str(text),
            Answer::EmptyInput => f.write_str(EMPTY_INPUT_MESSAGE),
            Answer::MissingCredential => f.write_str(MISSING_CREDENTIAL_MESSAGE),
            Answer::ServiceFailure(description) => {
                write!(f, "{SERVICE_FAILURE_PREFIX}{description}")
            }
        }
    }
}

/// Stateless per call: holds only read-only collaborators.
#[derive(Clone)]
pub struct AnswerRequester {
    registry: Arc<PersonaRegistry>,
    service: Arc<dyn CompletionService>,
    credentials: Arc<dyn ConfigProvider>,
    length_constraint: bool,
}

impl AnswerRequester {
    pub fn new(
        registry: Arc<PersonaRegistry>,
        service: Arc<dyn CompletionService>,
        credentials: Arc<dyn ConfigProvider>,
    ) -> Self {
        Self {
            registry,
            service,
            credentials,
            length_constraint: true,
        }
    }

    /// Toggles the advisory 300–600 character line in the user message.
    pub fn with_length_constraint(mut self, enabled: bool) -> Self {
        self.length_constraint = enabled;
        self
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Builds the system + user message pair for a question. Pure.
    pub fn compose(&self, question: &str, selector: PersonaSelector) -> ChatRequest {
        let instruction = self.registry.persona(selector).instruction;

        let mut prompt = QUESTION_TEMPLATE.replace("{question}", question);
        if self.length_constraint {
            prompt.push('\n');
            prompt.push_str(LENGTH_CONSTRAINT);
        }

        ChatRequest {
            model: MODEL.to_string(),
            temperature: TEMPERATURE,
            messages: vec![ChatMessage::system(instruction), ChatMessage::user(prompt)],
        }
    }

    /// Answers `question` as the persona named by `selector_input`, using `credential`.
    ///
    /// Gates run in order: blank question, then missing/blank credential. Only when both
    /// pass is the service called, exactly once.
    pub async fn ask(
        &self,
        question: &str,
        selector_input: &str,
        credential: Option<&str>,
    ) -> Answer {
        if question.trim().is_empty() {
            debug!("Rejected empty question");
            return Answer::EmptyInput;
        }

        let Some(api_key) = credential.map(str::trim).filter(|k| !k.is_empty()) else {
            warn!("{OPENAI_API_KEY} is not configured");
            return Answer::MissingCredential;
        };

        let selector = self.registry.normalize(selector_input);
        let request = self.compose(question, selector);

        info!(persona = selector.code(), model = MODEL, "Requesting answer");

        match self.service.complete(api_key, &request).await {
            Ok(text) => Answer::Generated(text),
            Err(err) => {
                warn!(persona = selector.code(), "Answer request failed: {err}");
                Answer::ServiceFailure(err.description)
            }
        }
    }

    /// Like [`ask`](Self::ask), with the credential looked up from the injected provider.
    pub async fn answer(&self, question: &str, selector_input: &str) -> Answer {
        let credential = self.credentials.get(OPENAI_API_KEY);
        self.ask(question, selector_input, credential.as_deref()).await
    }
}
