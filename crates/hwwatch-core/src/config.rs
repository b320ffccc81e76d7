use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::ConfigError;
use crate::poller::CursorPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_SECS: u64 = 600;

const REQUIRED: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Secrets read once at startup and never changed afterwards.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub endpoint: String,
    pub poll_interval: Duration,
    pub error_backoff: Duration,
    pub cursor_policy: CursorPolicy,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing {
                name: missing[0],
                all: missing,
            });
        }

        let credentials = Credentials {
            practicum_token: get("PRACTICUM_TOKEN").unwrap_or_default(),
            telegram_token: get("TELEGRAM_TOKEN").unwrap_or_default(),
            telegram_chat_id: get("TELEGRAM_CHAT_ID").unwrap_or_default(),
        };

        let endpoint = get("HOMEWORK_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let retry_secs = match get("RETRY_TIME") {
            Some(raw) => parse_secs("RETRY_TIME", &raw)?,
            None => DEFAULT_RETRY_SECS,
        };

        let cursor_policy = match get("ADVANCE_CURSOR") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => CursorPolicy::Advance,
                "0" | "false" | "no" => CursorPolicy::Fixed,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "ADVANCE_CURSOR",
                        value: raw,
                    })
                }
            },
            None => CursorPolicy::Fixed,
        };

        Ok(Self {
            credentials,
            endpoint,
            poll_interval: Duration::from_secs(retry_secs),
            error_backoff: Duration::from_secs(retry_secs),
            cursor_policy,
        })
    }

    /// Overrides both the regular interval and the extra error delay.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self.error_backoff = interval;
        self
    }
}

fn parse_secs(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ConfigError::Invalid {
            name,
            value: raw.to_string(),
        })
}

/// Loads a dotenv file into the process environment. Variables already set
/// win over the file. Without an explicit path a missing `.env` is fine.
pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}
