use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use prompt_composer::{api, backend, config, prompt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    config::Config::dotenv_load();
    let config = config::Config::new();
    config.log_env_vars();

    let client = backend::PromptApiClient::new(config.prompts_api_url.clone())
        .with_token(config.prompts_api_token.clone());
    let client = Arc::new(client);

    let templates = prompt::TemplateStore::load_dir(&config.templates_dir)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Could not load templates from {}: {}", config.templates_dir.display(), e);
            prompt::TemplateStore::new()
        });
    tracing::info!("loaded {} templates", templates.len());

    let state = Arc::new(api::AppState {
        prompt_constructor: prompt::PromptConstructor::new(),
        prompt_store: client.clone(),
        tag_source: client,
        templates: RwLock::new(templates),
        templates_dir: config.templates_dir.clone(),
    });

    let app = api::router(state);

    let socket_address = config.socket_address();
    tracing::info!("listening on {}", socket_address);
    if let Err(e) = axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
