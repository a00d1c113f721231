use anyhow::{Context, Result};

const DEFAULT_GENERATION_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_GENERATION_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173,\
    http://localhost:8080,https://*.lovable.app,https://*.lovableproject.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub mongodb_database: String,
    /// Optional generative API settings. `None` means template-only cover letters.
    pub generation: Option<GenerationConfig>,
    pub cors_allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let generation = match optional_env("GENERATION_API_KEY") {
            Some(api_key) => Some(GenerationConfig {
                api_key,
                api_url: optional_env("GENERATION_API_URL")
                    .unwrap_or_else(|| DEFAULT_GENERATION_URL.to_string()),
                model: optional_env("GENERATION_MODEL")
                    .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
                timeout_secs: optional_env("GENERATION_TIMEOUT_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse::<u64>()
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            }),
            None => None,
        };

        Ok(Config {
            mongodb_uri: require_env("MONGODB_URI")?,
            mongodb_database: optional_env("MONGODB_DATABASE")
                .unwrap_or_else(|| "job_tracker".to_string()),
            generation,
            cors_allowed_origins: parse_origin_list(
                &optional_env("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an env var, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_list_trims_and_skips_blanks() {
        let origins = parse_origin_list(" http://localhost:3000/ , ,https://*.lovable.app");
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "https://*.lovable.app"]
        );
    }

    #[test]
    fn test_default_origins_include_both_hosting_wildcards() {
        let origins = parse_origin_list(DEFAULT_CORS_ORIGINS);
        assert!(origins.contains(&"https://*.lovable.app".to_string()));
        assert!(origins.contains(&"https://*.lovableproject.com".to_string()));
        assert!(origins.contains(&"http://localhost:5173".to_string()));
    }
}
