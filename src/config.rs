//! Process configuration, read from the environment (optionally via `.env`).

use anyhow::{bail, Result};
use std::fmt;
use std::path::PathBuf;

use crate::notify::telegram::DEFAULT_API_BASE;
use crate::scheduler::DelayRange;
use crate::store::DEFAULT_POSTED_FILE;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

fn default_publish_timeout_secs() -> u64 {
    10
}

#[derive(Clone)]
pub struct RelayConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub posted_path: PathBuf,
    pub api_base: String,
    pub publish_timeout_secs: u64,
    pub delay: DelayRange,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`RelayConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match get(key).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => bail!("Missing {key} in environment (.env)"),
            }
        };
        let bot_token = required(ENV_BOT_TOKEN)?;
        let chat_id = required(ENV_CHAT_ID)?;

        let posted_path = get("POSTED_FILE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_POSTED_FILE.to_string())
            .into();
        let api_base = get("TELEGRAM_API_BASE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let default_delay = DelayRange::default();
        let publish_timeout_secs = parse_secs(
            &get,
            "PUBLISH_TIMEOUT_SECS",
            default_publish_timeout_secs(),
        )
        .max(1);
        let delay = DelayRange::new(
            parse_secs(&get, "RELAY_MIN_DELAY_SECS", default_delay.min_secs),
            parse_secs(&get, "RELAY_MAX_DELAY_SECS", default_delay.max_secs),
        );

        Ok(Self {
            bot_token,
            chat_id,
            posted_path,
            api_base,
            publish_timeout_secs,
            delay,
        })
    }
}

fn parse_secs<F>(get: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default, "invalid number, using default");
            default
        }),
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &format_args!("<redacted, {} chars>", self.bot_token.len()))
            .field("chat_id", &self.chat_id)
            .field("posted_path", &self.posted_path)
            .field("api_base", &self.api_base)
            .field("publish_timeout_secs", &self.publish_timeout_secs)
            .field("delay", &self.delay)
            .finish()
    }
}
