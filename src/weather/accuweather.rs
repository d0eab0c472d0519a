//! AccuWeather API client.
//!
//! Forward/reverse geocoding against the locations endpoints and raw
//! forecast retrieval against the forecasts endpoints. Every call is a
//! single attempt; failures surface to the caller as [`WeatherError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::WeatherConfig;
use crate::error::WeatherError;
use crate::weather::model::LocationRef;
use crate::weather::{ForecastFetcher, PlaceResolver};

/// HTTP client for the AccuWeather locations and forecasts APIs.
pub struct AccuWeatherClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

/// One entry of a city search response.
#[derive(Debug, Deserialize)]
struct CitySearchResult {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "GeoPosition")]
    geo_position: GeoPosition,
}

#[derive(Debug, Deserialize)]
struct GeoPosition {
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

/// Reverse geocoding response — only the location key is consumed.
#[derive(Debug, Deserialize)]
struct GeopositionResult {
    #[serde(rename = "Key")]
    key: String,
}

impl AccuWeatherClient {
    /// Create a new client from weather configuration.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("routecast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlaceResolver for AccuWeatherClient {
    async fn resolve_name(&self, name: &str) -> Result<LocationRef, WeatherError> {
        debug!("Geocoding place name: {name}");

        let url = format!("{}/locations/v1/cities/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.expose_secret()),
                ("q", name),
                ("language", "en"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("City search for '{name}' returned {}", response.status());
            return Err(WeatherError::Resolution {
                place: name.to_string(),
            });
        }

        let results: Vec<CitySearchResult> =
            response.json().await.map_err(|_| WeatherError::Resolution {
                place: name.to_string(),
            })?;

        let Some(city) = results.into_iter().next() else {
            return Err(WeatherError::Resolution {
                place: name.to_string(),
            });
        };

        debug!(
            "Resolved '{name}' to key {} at ({:.4}, {:.4})",
            city.key, city.geo_position.latitude, city.geo_position.longitude
        );

        Ok(LocationRef {
            latitude: city.geo_position.latitude,
            longitude: city.geo_position.longitude,
            provider_key: city.key,
        })
    }

    async fn resolve_position(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationRef, WeatherError> {
        debug!("Reverse geocoding position: ({latitude}, {longitude})");

        let place = format!("{latitude},{longitude}");
        let url = format!("{}/locations/v1/cities/geoposition/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.expose_secret()),
                ("q", place.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                "Geoposition search for ({latitude}, {longitude}) returned {}",
                response.status()
            );
            return Err(WeatherError::Resolution { place });
        }

        let result: GeopositionResult = response
            .json()
            .await
            .map_err(|_| WeatherError::Resolution {
                place: place.clone(),
            })?;

        Ok(LocationRef {
            latitude,
            longitude,
            provider_key: result.key,
        })
    }
}

#[async_trait]
impl ForecastFetcher for AccuWeatherClient {
    async fn fetch(
        &self,
        location: &LocationRef,
        days: i64,
    ) -> Result<serde_json::Value, WeatherError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            forecast_path(days, &location.provider_key)
        );
        debug!("Fetching forecast: {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.expose_secret()),
                ("details", "true"),
                ("metric", "true"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::Fetch {
                reason: format!("forecast endpoint returned {}", response.status()),
            });
        }

        response.json().await.map_err(|e| WeatherError::Fetch {
            reason: format!("invalid forecast payload: {e}"),
        })
    }
}

/// Endpoint path for a forecast request. `days >= 1` selects the daily
/// forecast, anything lower the hourly one.
fn forecast_path(days: i64, provider_key: &str) -> String {
    if days >= 1 {
        format!("forecasts/v1/daily/{days}day/{provider_key}")
    } else {
        format!("forecasts/v1/hourly/1hour/{provider_key}")
    }
}
