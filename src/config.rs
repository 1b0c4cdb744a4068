//! Env-driven configuration for the service and library.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binaries. Defaults are provided for convenience during development.
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: String,
    pub prompts_api_url: String,
    pub prompts_api_token: Option<String>,
    pub templates_dir: PathBuf,
    pub render_debounce: Duration,
    pub tag_debounce: Duration,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn millis_or(name: &str, default: u64) -> Duration {
    let raw = var_or(name, &default.to_string());
    let ms = raw.trim().parse::<u64>().unwrap_or_else(|_| {
        tracing::warn!("Invalid {} '{}', falling back to {}ms", name, raw, default);
        default
    });
    Duration::from_millis(ms)
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> Self {
        Config {
            api_host: var_or("API_HOST", "127.0.0.1"),
            api_port: var_or("API_PORT", "8190"),
            prompts_api_url: var_or("PROMPTS_API_URL", "http://localhost:8000/api"),
            prompts_api_token: env::var("PROMPTS_API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            templates_dir: PathBuf::from(var_or("TEMPLATES_DIR", "./templates")),
            render_debounce: millis_or("RENDER_DEBOUNCE_MS", 300),
            tag_debounce: millis_or("TAG_DEBOUNCE_MS", 250),
        }
    }

    /// Bind address, falling back to 127.0.0.1:8190 on unparsable values.
    pub fn socket_address(&self) -> SocketAddr {
        let ip: IpAddr = self.api_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid API_HOST '{}', falling back to 127.0.0.1", self.api_host);
            IpAddr::from([127, 0, 0, 1])
        });
        let port: u16 = self.api_port.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid API_PORT '{}', falling back to 8190", self.api_port);
            8190
        });
        SocketAddr::new(ip, port)
    }

    pub fn log_env_vars(&self) {
        tracing::info!("API_HOST: {}", self.api_host);
        tracing::info!("API_PORT: {}", self.api_port);
        tracing::info!("PROMPTS_API_URL: {}", self.prompts_api_url);
        tracing::info!(
            "PROMPTS_API_TOKEN: {}",
            if self.prompts_api_token.is_some() { "<set>" } else { "<unset>" }
        );
        tracing::info!("TEMPLATES_DIR: {}", self.templates_dir.display());
        tracing::info!("RENDER_DEBOUNCE_MS: {}", self.render_debounce.as_millis());
        tracing::info!("TAG_DEBOUNCE_MS: {}", self.tag_debounce.as_millis());
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
