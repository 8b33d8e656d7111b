use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use expert_switcher::answer::page::PageRenderer;
use expert_switcher::answer::AnswerRequester;
use expert_switcher::config::Config;
use expert_switcher::llm_client::{self, OpenAiClient};
use expert_switcher::persona::PersonaRegistry;
use expert_switcher::routes::build_router;
use expert_switcher::secrets::{ConfigProvider, LayeredProvider, SecretsFile, OPENAI_API_KEY};
use expert_switcher::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Expert Switcher v{}", env!("CARGO_PKG_VERSION"));

    // Credentials: secrets file first, then environment. Checked per request, not here.
    let secrets = SecretsFile::load(&config.secrets_path)?;
    let credentials = LayeredProvider::secrets_then_env(secrets);
    if credentials.get(OPENAI_API_KEY).map_or(true, |k| k.trim().is_empty()) {
        info!("{OPENAI_API_KEY} not configured; answers will report the missing key");
    }

    // Initialize LLM client
    let llm = OpenAiClient::new(config.openai_base_url.clone())?;
    info!(
        "LLM client initialized (model: {}, base URL: {})",
        llm_client::MODEL,
        llm.base_url()
    );

    let registry = PersonaRegistry::builtin();
    info!("Loaded {} personas", registry.personas().len());

    let requester = AnswerRequester::new(Arc::new(registry), Arc::new(llm), Arc::new(credentials));

    let pages = PageRenderer::new()?;

    let state = AppState {
        requester: Arc::new(requester),
        pages: Arc::new(pages),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
