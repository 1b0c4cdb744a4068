//! Axum request handlers for the HTTP API.
use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::routes::AppState;
use crate::backend::{Difficulty, PromptRecord, TagSuggestion};
use crate::error::{AppError, AppResult};
use crate::prompt::wizard::{first_blocking_step, step_views, StepView, WizardStep};
use crate::prompt::{AdvancedPromptData, Draft, PromptFormat, RenderedPrompt, SimplePromptData};
use crate::utils::draft_ops::apply_overrides;

pub async fn root() -> &'static str {
    "Prompt Composer API"
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub draft: Draft,
    #[serde(default)]
    pub format: PromptFormat,
    #[serde(default)]
    pub sets: Vec<String>,
}

pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RenderRequest>,
) -> AppResult<Json<RenderedPrompt>> {
    let draft = apply_overrides(&payload.draft, &payload.sets)?;
    Ok(Json(state.prompt_constructor.construct(&draft, payload.format)))
}

#[derive(Debug, Deserialize)]
pub struct WizardRequest {
    pub data: SimplePromptData,
    #[serde(default)]
    pub current: usize,
    pub target: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub current: usize,
    pub steps: Vec<StepView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_step: Option<&'static str>,
}

pub async fn wizard(Json(payload): Json<WizardRequest>) -> AppResult<Json<WizardResponse>> {
    let last = WizardStep::ALL.len() - 1;
    if payload.current > last || payload.target.is_some_and(|t| t > last) {
        return Err(AppError::InvalidRequest(format!("steps range from 0 to {}", last)));
    }
    let blocking = payload
        .target
        .filter(|t| *t > payload.current)
        .and_then(|t| first_blocking_step(&payload.data, t));
    Ok(Json(WizardResponse {
        current: payload.current,
        steps: step_views(&payload.data, payload.current),
        target: payload.target,
        allowed: payload.target.map(|_| blocking.is_none()),
        blocking_step: blocking.map(|s| s.name()),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SavePromptRequest {
    pub draft: Draft,
    #[serde(default)]
    pub format: PromptFormat,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn save_prompt(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SavePromptRequest>,
) -> AppResult<Json<Value>> {
    if payload.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("a title is required".to_string()));
    }
    let rendered = state.prompt_constructor.construct(&payload.draft, payload.format);
    let record = PromptRecord::new(&payload.title, payload.difficulty, rendered.text, &payload.tags);
    state.prompt_store.save_prompt(&record).await.map(Json)
}

pub async fn tags(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<TagSuggestion>>> {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    state.tag_source.suggest_tags(query).await.map(Json)
}

pub async fn list_templates(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.templates.read().await.names())
}

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub name: String,
    pub data: AdvancedPromptData,
}

pub async fn save_template(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveTemplateRequest>,
) -> AppResult<Json<Value>> {
    state
        .templates
        .write()
        .await
        .save_persisted(&payload.name, &payload.data, &state.templates_dir)
        .await?;
    Ok(Json(json!({"status": "success", "name": payload.name})))
}

pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Json<AdvancedPromptData>> {
    state.templates.read().await.recall(&name).map(Json)
}
