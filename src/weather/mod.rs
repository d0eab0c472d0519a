//! Weather lookup pipeline: place resolution, forecast retrieval,
//! normalization, and route aggregation.

pub mod accuweather;
pub mod aggregator;
pub mod model;
pub mod normalizer;

pub use accuweather::AccuWeatherClient;
pub use aggregator::ForecastAggregator;
pub use model::{ForecastDayRecord, LocationRef, PlaceInput, PointForecast, RouteForecast};

use async_trait::async_trait;

use crate::error::WeatherError;

/// Resolves user-supplied place input to a canonical [`LocationRef`].
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Forward geocode a free-text place name.
    async fn resolve_name(&self, name: &str) -> Result<LocationRef, WeatherError>;

    /// Reverse geocode a device-reported coordinate pair.
    async fn resolve_position(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationRef, WeatherError>;
}

/// Retrieves the raw forecast payload for a resolved location.
#[async_trait]
pub trait ForecastFetcher: Send + Sync {
    /// Fetch the raw payload for `days` days. `days >= 1` selects the daily
    /// endpoint; anything lower selects the hourly one.
    async fn fetch(
        &self,
        location: &LocationRef,
        days: i64,
    ) -> Result<serde_json::Value, WeatherError>;
}
