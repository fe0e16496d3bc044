use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the API key is required; everything else has a sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub entry_path: String,
    pub data_path: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: std::env::var("CEREBRA_MODEL")
                .unwrap_or_else(|_| crate::llm_client::DEFAULT_MODEL.to_string()),
            entry_path: std::env::var("CEREBRA_ENTRY_PATH")
                .unwrap_or_else(|_| "journal_entries.csv".to_string()),
            data_path: std::env::var("CEREBRA_DATA_PATH")
                .unwrap_or_else(|_| "data.csv".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
