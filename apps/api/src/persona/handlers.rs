use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::persona::{Persona, PersonaSelector};
use crate::state::AppState;

#[derive(Serialize)]
pub struct PersonaListResponse {
    pub default: PersonaSelector,
    pub personas: Vec<Persona>,
}

/// GET /api/v1/personas
pub async fn handle_list_personas(State(state): State<AppState>) -> Json<PersonaListResponse> {
    let registry = state.requester.registry();
    Json(PersonaListResponse {
        default: registry.default_selector(),
        personas: registry.personas().to_vec(),
    })
}

/// GET /api/v1/personas/:code
///
/// Strict: unknown codes are a 404, unlike answer requests which fall back to persona A.
pub async fn handle_get_persona(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Persona>, AppError> {
    state
        .requester
        .registry()
        .get(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Persona {code} not found")))
}
