//! Process configuration from the environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the assistant's chat-completion collaborator.
    /// Absent keys disable `ask`, not the analysis pipeline.
    pub api_key: Option<String>,
    pub model: String,
    pub database_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present (silently ignored if missing).
        let _ = dotenvy::dotenv();

        Self {
            api_key: env::var("STOCKPILOT_API_KEY").ok(),
            model: env::var("STOCKPILOT_MODEL")
                .unwrap_or_else(|_| "claude-3-5-haiku-latest".to_string()),
            database_path: env::var("STOCKPILOT_DB")
                .unwrap_or_else(|_| "data/stockpilot.db".to_string()),
        }
    }
}
