//! Error types for Routecast.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send reply on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Errors from the weather lookup pipeline (geocoding, forecast retrieval,
/// payload normalization).
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// A place name or coordinate pair could not be mapped to a location.
    #[error("Could not resolve place: {place}")]
    Resolution { place: String },

    /// Forecast retrieval failed or returned malformed data.
    #[error("Forecast fetch failed: {reason}")]
    Fetch { reason: String },

    /// The forecast payload matched neither the hourly nor the daily shape.
    #[error("Unsupported forecast payload shape")]
    UnsupportedPayload,

    /// Network-level failure talking to an external API.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl WeatherError {
    /// User-facing message for a failed aggregation turn.
    ///
    /// Deliberately identical across variants: the user is told the forecast
    /// could not be retrieved, not which external call broke.
    #[must_use]
    pub fn user_message(&self) -> String {
        "Could not retrieve weather data for your route. Please try again later.".to_string()
    }
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_errors_share_one_user_message() {
        let resolution = WeatherError::Resolution {
            place: "Nowhereville".into(),
        };
        let fetch = WeatherError::Fetch {
            reason: "boom".into(),
        };
        assert_eq!(resolution.user_message(), fetch.user_message());
        assert_eq!(
            WeatherError::UnsupportedPayload.user_message(),
            fetch.user_message()
        );
    }

    #[test]
    fn domain_errors_fold_into_top_level() {
        let err: Error = ConfigError::MissingEnvVar("ROUTECAST_BOT_TOKEN".into()).into();
        assert!(matches!(err, Error::Config(_)));

        let err: Error = WeatherError::UnsupportedPayload.into();
        assert!(matches!(err, Error::Weather(_)));
    }
}
