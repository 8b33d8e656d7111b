pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::answer::handlers::{handle_ask, handle_page, handle_page_submit};
use crate::persona::handlers::{handle_get_persona, handle_list_personas};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_page).post(handle_page_submit))
        .route("/health", get(health::health_handler))
        .route("/api/v1/ask", post(handle_ask))
        .route("/api/v1/personas", get(handle_list_personas))
        .route("/api/v1/personas/:code", get(handle_get_persona))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::answer::page::PageRenderer;
    use crate::answer::AnswerRequester;
    use crate::llm_client::{ChatRequest, CompletionService, ServiceError};
    use crate::persona::PersonaRegistry;
    use crate::secrets::{StaticProvider, OPENAI_API_KEY};

    /// Replies with the system instruction's first word so tests can see which persona ran.
    struct EchoPersona {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CompletionService for EchoPersona {
        async fn complete(&self, _api_key: &str, request: &ChatRequest) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ServiceError::new("connection reset"));
            }
            Ok(format!("answered with: {}", request.messages[0].content))
        }
    }

    fn app(credentials: StaticProvider, fail: bool) -> (Router, Arc<EchoPersona>) {
        let service = Arc::new(EchoPersona {
            calls: AtomicUsize::new(0),
            fail,
        });
        let requester = AnswerRequester::new(
            Arc::new(PersonaRegistry::builtin()),
            service.clone(),
            Arc::new(credentials),
        );
        let state = AppState {
            requester: Arc::new(requester),
            pages: Arc::new(PageRenderer::new().unwrap()),
        };
        (build_router(state), service)
    }

    fn with_key() -> StaticProvider {
        StaticProvider::new().with(OPENAI_API_KEY, "key123")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(with_key(), false);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_ask_returns_generated_text() {
        let (app, service) = app(with_key(), false);
        let response = app
            .oneshot(post_json(
                "/api/v1/ask",
                json!({ "question": "How do I grow?", "expert": " b " }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["persona"], "B");
        assert!(body["answer"]
            .as_str()
            .unwrap()
            .starts_with("answered with: You are a top-tier data scientist."));
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ask_without_key_is_still_ok_status() {
        let (app, service) = app(StaticProvider::new(), false);
        let response = app
            .oneshot(post_json("/api/v1/ask", json!({ "question": "anything" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "missing_credential");
        assert_eq!(body["persona"], "A");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ask_service_failure_is_text() {
        let (app, _) = app(with_key(), true);
        let response = app
            .oneshot(post_json(
                "/api/v1/ask",
                json!({ "question": "anything", "expert": "A" }),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["status"], "service_failure");
        assert_eq!(body["answer"], "An error occurred: connection reset");
    }

    #[tokio::test]
    async fn test_ask_null_question_is_empty_input() {
        let (app, service) = app(with_key(), false);
        let response = app
            .oneshot(post_json(
                "/api/v1/ask",
                json!({ "question": null, "expert": "A" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "empty_input");
        assert_eq!(body["answer"], "Input text is empty. Please enter a question.");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ask_without_json_content_type_is_empty_input() {
        let (app, service) = app(with_key(), false);
        let response = app
            .oneshot(
                Request::post("/api/v1/ask")
                    .body(Body::from(r#"{"question":"anything"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "empty_input");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ask_malformed_json_is_empty_input() {
        let (app, service) = app(with_key(), false);
        let response = app
            .oneshot(
                Request::post("/api/v1/ask")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "empty_input");
        assert_eq!(body["persona"], "A");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_page() {
        let (app, _) = app(with_key(), false);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("value=\"A\" checked"));
        assert!(!html.contains("<h3>Answer</h3>"));
    }

    #[tokio::test]
    async fn test_list_personas() {
        let (app, _) = app(with_key(), false);
        let response = app
            .oneshot(Request::get("/api/v1/personas").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["default"], "A");
        assert_eq!(body["personas"].as_array().unwrap().len(), 2);
        assert_eq!(body["personas"][1]["display_name"], "Data Scientist");
    }

    #[tokio::test]
    async fn test_get_unknown_persona_is_404() {
        let (app, _) = app(with_key(), false);
        let response = app
            .oneshot(Request::get("/api/v1/personas/z").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_persona_by_lowercase_code() {
        let (app, _) = app(with_key(), false);
        let response = app
            .oneshot(Request::get("/api/v1/personas/b").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["selector"], "B");
    }

    #[tokio::test]
    async fn test_page_form_submit_renders_answer() {
        let (app, _) = app(with_key(), false);
        let response = app
            .oneshot(
                Request::post("/")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("question=Grow+revenue%3F&expert=A"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h3>Answer</h3>"));
        assert!(html.contains("answered with: You are a top-tier management consultant."));
        assert!(html.contains(">Grow revenue?</textarea>"));
    }

    #[tokio::test]
    async fn test_page_form_empty_question() {
        let (app, service) = app(with_key(), false);
        let response = app
            .oneshot(
                Request::post("/")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("question=&expert=B"))
                    .unwrap(),
            )
            .await
            .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("Input text is empty. Please enter a question."));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }
}
