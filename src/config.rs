use std::time::Duration;

use crate::cache::CacheConfig;
use crate::error::AppError;

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub port: u16,
    /// `TRUST_FORWARDED_FOR`: take the responder IP from forwarded headers.
    pub trust_forwarded_for: bool,
    pub cache: CacheConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url = std::env::var("BOOKING_API_URL")
            .map_err(|_| AppError::Config("BOOKING_API_URL must be set".to_string()))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "BOOKING_API_URL must be an http(s) url, got `{api_base_url}`"
            )));
        }

        let api_token = std::env::var("BOOKING_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let trust_forwarded_for = std::env::var("TRUST_FORWARDED_FOR")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            api_base_url,
            api_token,
            port,
            trust_forwarded_for,
            cache: CacheConfig::from_env(),
        })
    }
}

pub(crate) fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_trust_needs_an_explicit_yes() {
        for raw in ["1", "true", " TRUE ", "yes", "on"] {
            assert!(parse_flag(raw), "{raw}");
        }
        for raw in ["", "0", "false", "off", "maybe"] {
            assert!(!parse_flag(raw), "{raw}");
        }
    }
}
