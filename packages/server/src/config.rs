use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use handle_directory::{DirectoryConfig, Platform};
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub directory: DirectoryConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let mut directory = DirectoryConfig::default();
        if let Ok(raw) = env::var("DIRECTORY_MATCH_THRESHOLD") {
            let threshold: f64 = raw
                .parse()
                .context("DIRECTORY_MATCH_THRESHOLD must be a number")?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(anyhow!(
                    "DIRECTORY_MATCH_THRESHOLD must be between 0 and 1, got {}",
                    threshold
                ));
            }
            directory = directory.with_match_threshold(threshold);
        }
        if let Ok(raw) = env::var("DIRECTORY_PLATFORM_PRIORITY") {
            directory = directory.with_platform_priority(parse_platform_list(&raw)?);
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            directory,
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated platform list such as `telegram, instagram, x`.
pub fn parse_platform_list(raw: &str) -> Result<Vec<Platform>> {
    parse_list(raw)
        .iter()
        .map(|label| {
            Platform::from_label(label).ok_or_else(|| anyhow!("Unknown platform: {}", label))
        })
        .collect()
}
