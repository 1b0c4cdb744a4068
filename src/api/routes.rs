//! Shared state and router wiring.
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use super::handlers;
use crate::backend::{PromptStore, TagSource};
use crate::prompt::{PromptConstructor, TemplateStore};

pub struct AppState {
    pub prompt_constructor: PromptConstructor,
    pub prompt_store: Arc<dyn PromptStore>,
    pub tag_source: Arc<dyn TagSource>,
    pub templates: RwLock<TemplateStore>,
    pub templates_dir: PathBuf,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/render", post(handlers::render))
        .route("/wizard", post(handlers::wizard))
        .route("/prompts", post(handlers::save_prompt))
        .route("/tags", get(handlers::tags))
        .route("/templates", get(handlers::list_templates).post(handlers::save_template))
        .route("/templates/:name", get(handlers::get_template))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
