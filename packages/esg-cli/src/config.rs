use anyhow::{Context, Result};
use dotenvy::dotenv;
use esg_scout::{ModelCredentials, SecretString};
use std::env;

const DEFAULT_EXTRACT_MODEL: &str = "gpt-4o";
const DEFAULT_EXPLAIN_MODEL: &str = "gpt-4.1-mini";

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent disables external search
    pub serper_api_key: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: Option<String>,
    pub extract_model: String,
    pub explain_model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenv();

        Ok(Self {
            serper_api_key: SecretString::from_env("SERPER_API_KEY"),
            openai_api_key: SecretString::from_env("OPENAI_API_KEY"),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            extract_model: env::var("ESG_EXTRACT_MODEL")
                .unwrap_or_else(|_| DEFAULT_EXTRACT_MODEL.to_string()),
            explain_model: env::var("ESG_EXPLAIN_MODEL")
                .unwrap_or_else(|_| DEFAULT_EXPLAIN_MODEL.to_string()),
        })
    }

    /// Credentials for the signal extraction model.
    pub fn extract_credentials(&self) -> Result<ModelCredentials> {
        self.credentials(&self.extract_model)
    }

    /// Credentials for the narrative model.
    pub fn explain_credentials(&self) -> Result<ModelCredentials> {
        self.credentials(&self.explain_model)
    }

    fn credentials(&self, model: &str) -> Result<ModelCredentials> {
        let key = self
            .openai_api_key
            .as_ref()
            .context("OPENAI_API_KEY must be set to score companies")?;

        let credentials = ModelCredentials::new(key.clone(), model);
        Ok(match &self.openai_base_url {
            Some(url) => credentials.with_base_url(url),
            None => credentials,
        })
    }
}
