//! Prompt Composer library
//!
//! Modules:
//! - `prompt`: The composition engine. Field sentence builders, simple and
//!   advanced composers, `${name}` substitution, text/markup/JSON renderers,
//!   wizard step gating and named templates.
//! - `session`: A single draft being edited, with debounced re-rendering.
//! - `events`: Outcomes the session reports to an injected reporter.
//! - `backend`: Client for the prompt REST backend (save, tag suggestions).
//! - `api`: Axum HTTP handlers and router setup used by the binary.
//! - `utils`: Debouncer and `KEY=VALUE` draft overrides.
//! - `config`: Env-driven configuration loader.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `PromptApiClient`,
//! `PromptConstructor`, `Draft` and `DraftSession`.
pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod prompt;
pub mod session;
pub mod utils;

pub use backend::client::PromptApiClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use prompt::constructor::{Draft, PromptConstructor, RenderedPrompt};
pub use prompt::render::PromptFormat;
pub use session::DraftSession;
