//! Expert switcher: answers a question as one of two expert personas via the OpenAI
//! chat-completions API, served over a small axum app.

pub mod answer;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod persona;
pub mod routes;
pub mod secrets;
pub mod state;
