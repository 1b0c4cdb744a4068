//! Thin HTTP client for the prompt REST backend.
//!
//! - `save_prompt` posts a rendered prompt record to `/prompts/`.
//! - `suggest_tags` queries `/tags/?search=...` for tag name candidates.
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Facil,
    Media,
    Dificil,
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facil" | "fácil" => Ok(Difficulty::Facil),
            "media" => Ok(Difficulty::Media),
            "dificil" | "difícil" => Ok(Difficulty::Dificil),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
}

/// What the backend stores: the rendered body, not the structured draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub title: String,
    pub difficulty: Difficulty,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagRef>,
}

impl PromptRecord {
    pub fn new(title: &str, difficulty: Difficulty, body: String, tags: &[String]) -> Self {
        PromptRecord {
            title: title.trim().to_string(),
            difficulty,
            body,
            tags: tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(|name| TagRef { name: name.to_string() })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub name: String,
}

#[async_trait]
pub trait PromptStore: Send + Sync {
    async fn save_prompt(&self, record: &PromptRecord) -> AppResult<Value>;
}

#[async_trait]
pub trait TagSource: Send + Sync {
    async fn suggest_tags(&self, query: &str) -> AppResult<Vec<TagSuggestion>>;
}

#[derive(Clone)]
pub struct PromptApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PromptApiClient {
    pub fn new(base_url: String) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        PromptApiClient { client: Client::new(), base_url: base, token: None }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response, action: &str) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        let message = format!("Failed to {}. Status: {}, Body: {}", action, status, body);
        tracing::error!("{}", message);
        Err(AppError::Backend(message))
    }
}

#[async_trait]
impl PromptStore for PromptApiClient {
    async fn save_prompt(&self, record: &PromptRecord) -> AppResult<Value> {
        let url = format!("{}/prompts/", self.base_url);
        tracing::info!("Saving prompt '{}' to {}", record.title, url);

        let response = self
            .authorized(self.client.post(&url))
            .json(record)
            .send()
            .await
            .map_err(AppError::HttpClient)?;
        let response = Self::check(response, "save prompt").await?;
        let json: Value = response.json().await.map_err(AppError::HttpClient)?;
        tracing::info!("Saved prompt '{}'", record.title);
        Ok(json)
    }
}

#[async_trait]
impl TagSource for PromptApiClient {
    async fn suggest_tags(&self, query: &str) -> AppResult<Vec<TagSuggestion>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/tags/", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .query(&[("search", query)])
            .send()
            .await
            .map_err(AppError::HttpClient)?;
        let response = Self::check(response, "fetch tag suggestions").await?;
        let json: Value = response.json().await.map_err(AppError::HttpClient)?;

        // Plain arrays or paginated `{ "results": [...] }` bodies.
        let items = match json {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<TagSuggestion>(item).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record() -> PromptRecord {
        PromptRecord::new(
            "Resumen",
            Difficulty::Media,
            "Tu objetivo es: resumir.".to_string(),
            &["ia".to_string(), " ".to_string()],
        )
    }

    #[tokio::test]
    async fn save_prompt_posts_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prompts/"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({
                "title": "Resumen",
                "difficulty": "media",
                "body": "Tu objetivo es: resumir.",
                "tags": [{"name": "ia"}]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let client = PromptApiClient::new(format!("{}/", server.uri())).with_token(Some("secret".into()));
        let saved = client.save_prompt(&record()).await.unwrap();
        assert_eq!(saved["id"], 7);
    }

    #[tokio::test]
    async fn save_prompt_surfaces_backend_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prompts/"))
            .respond_with(ResponseTemplate::new(400).set_body_string("title required"))
            .mount(&server)
            .await;

        let client = PromptApiClient::new(server.uri());
        match client.save_prompt(&record()).await {
            Err(AppError::Backend(message)) => assert!(message.contains("title required")),
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn suggest_tags_reads_paginated_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags/"))
            .and(query_param("search", "ed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "results": [{"id": 1, "name": "educación"}, {"name": "edición"}]
            })))
            .mount(&server)
            .await;

        let client = PromptApiClient::new(server.uri());
        let tags = client.suggest_tags(" ed ").await.unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["educación", "edición"]);
        assert_eq!(tags[0].id, Some(json!(1)));
    }

    #[tokio::test]
    async fn blank_query_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let client = PromptApiClient::new(server.uri());
        assert!(client.suggest_tags("   ").await.unwrap().is_empty());
    }

    #[test]
    fn difficulty_parses_accented_names() {
        assert_eq!("Fácil".parse::<Difficulty>(), Ok(Difficulty::Facil));
        assert_eq!("dificil".parse::<Difficulty>(), Ok(Difficulty::Dificil));
        assert!("extrema".parse::<Difficulty>().is_err());
    }
}
