//! Route forecast aggregation.
//!
//! Turns a finalized route into a per-point, per-day forecast. Lookups run
//! sequentially in route order; any failure aborts the whole aggregation —
//! the caller gets a complete [`RouteForecast`] or a single error, never a
//! partial result.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::WeatherError;
use crate::weather::model::{PlaceInput, PointForecast, RouteForecast};
use crate::weather::{ForecastFetcher, PlaceResolver, normalizer};

/// Aggregates forecasts for every point of a route.
pub struct ForecastAggregator {
    resolver: Arc<dyn PlaceResolver>,
    fetcher: Arc<dyn ForecastFetcher>,
}

impl ForecastAggregator {
    pub fn new(resolver: Arc<dyn PlaceResolver>, fetcher: Arc<dyn ForecastFetcher>) -> Self {
        Self { resolver, fetcher }
    }

    /// Build the forecast for `route` over `days` days.
    ///
    /// Output order exactly matches input order. Resolution and fetch
    /// failures are distinct internally but both abort the aggregation.
    pub async fn aggregate(
        &self,
        route: &[PlaceInput],
        days: i64,
    ) -> Result<RouteForecast, WeatherError> {
        info!("Aggregating {}-day forecast for {} points", days, route.len());

        let day_count = usize::try_from(days).unwrap_or(0);
        let mut points = Vec::with_capacity(route.len());

        for input in route {
            let location = match input {
                PlaceInput::Name(name) => self.resolver.resolve_name(name).await?,
                PlaceInput::Position {
                    latitude,
                    longitude,
                } => {
                    self.resolver
                        .resolve_position(*latitude, *longitude)
                        .await?
                }
            };
            debug!(
                "Resolved '{}' to provider key {}",
                input.label(),
                location.provider_key
            );

            let payload = self.fetcher.fetch(&location, days).await?;

            let mut records = Vec::with_capacity(day_count);
            for index in 0..day_count {
                records.push(normalizer::normalize_day(&payload, index)?);
            }

            points.push(PointForecast {
                label: input.label().to_string(),
                location,
                days: records,
            });
        }

        Ok(RouteForecast { points })
    }
}
