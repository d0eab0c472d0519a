//! Configuration types.
//!
//! All settings come from environment variables, read once at startup.

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::presentation::PresentationMode;

/// Telegram transport configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token.
    pub bot_token: SecretString,
    /// Bot API base URL.
    pub api_url: String,
}

/// Weather provider configuration.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// AccuWeather API key.
    pub api_key: SecretString,
    /// Provider base URL.
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

/// Root bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub weather: WeatherConfig,
    /// Which presentation variant to run (text-only, or chart + map).
    pub presentation: PresentationMode,
}

impl BotConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = require("ROUTECAST_BOT_TOKEN")?;
        let api_key = require("ROUTECAST_WEATHER_API_KEY")?;

        let api_url = std::env::var("ROUTECAST_TELEGRAM_API_URL")
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());

        let base_url = std::env::var("ROUTECAST_WEATHER_BASE_URL")
            .unwrap_or_else(|_| "http://dataservice.accuweather.com".to_string());

        let timeout_secs: u64 = std::env::var("ROUTECAST_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let presentation = match std::env::var("ROUTECAST_PRESENTATION") {
            Ok(value) => parse_presentation(&value)?,
            Err(_) => PresentationMode::Text,
        };

        Ok(Self {
            telegram: TelegramConfig {
                bot_token: SecretString::from(bot_token),
                api_url,
            },
            weather: WeatherConfig {
                api_key: SecretString::from(api_key),
                base_url,
                timeout_secs,
            },
            presentation,
        })
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_presentation(value: &str) -> Result<PresentationMode, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(PresentationMode::Text),
        "visual" => Ok(PresentationMode::Visual),
        other => Err(ConfigError::InvalidValue {
            key: "ROUTECAST_PRESENTATION".to_string(),
            message: format!("expected 'text' or 'visual', got '{other}'"),
        }),
    }
}
