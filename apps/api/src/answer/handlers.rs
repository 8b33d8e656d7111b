//! Axum route handlers for the answer page and the JSON ask endpoint.
//!
//! Every answer outcome, failures included, is a 200 carrying display text. A body that
//! cannot be read at all is treated as an empty question.

use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, State},
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answer::AnswerStatus;
use crate::errors::AppError;
use crate::persona::PersonaSelector;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
    /// Selector code or display label; anything unrecognised means persona A.
    pub expert: Option<String>,
}

impl AskRequest {
    fn question(&self) -> &str {
        self.question.as_deref().unwrap_or_default()
    }

    fn expert(&self) -> &str {
        self.expert.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub status: AnswerStatus,
    pub persona: PersonaSelector,
}

/// POST /api/v1/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Json<AskResponse> {
    let request = payload
        .map(|Json(request)| request)
        .unwrap_or_else(|rejection| {
            debug!("Unreadable ask body, treating as empty: {rejection}");
            AskRequest::default()
        });

    let persona = state.requester.registry().normalize(request.expert());
    let answer = state
        .requester
        .answer(request.question(), request.expert())
        .await;

    Json(AskResponse {
        status: answer.status(),
        answer: answer.into_text(),
        persona,
    })
}

/// GET /
pub async fn handle_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = state
        .pages
        .render(state.requester.registry(), "", "", None)?;
    Ok(Html(html))
}

/// POST / (form submit)
pub async fn handle_page_submit(
    State(state): State<AppState>,
    form: Result<Form<AskRequest>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let form = form.map(|Form(form)| form).unwrap_or_else(|rejection| {
        debug!("Unreadable form body, treating as empty: {rejection}");
        AskRequest::default()
    });

    let answer = state
        .requester
        .answer(form.question(), form.expert())
        .await;
    let html = state.pages.render(
        state.requester.registry(),
        form.question(),
        form.expert(),
        Some(&answer),
    )?;
    Ok(Html(html))
}
