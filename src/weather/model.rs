//! Core weather domain models.

use serde::{Deserialize, Serialize};

/// Display label used for a start point supplied as a device geolocation.
pub const CURRENT_LOCATION_LABEL: &str = "current location";

/// A resolved location: geocoordinates plus the provider's location key.
///
/// Produced exclusively by the place resolver. Two refs are distinct values
/// even when they denote the same physical place — there is no deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Provider-specific location key used for forecast lookups.
    pub provider_key: String,
}

/// One point of a route as the user supplied it.
///
/// Not yet resolved to a [`LocationRef`] — resolution happens eagerly for
/// validation during collection and again at aggregation time.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceInput {
    /// Free-text place name.
    Name(String),
    /// Device-reported geolocation.
    Position { latitude: f64, longitude: f64 },
}

impl PlaceInput {
    /// Display label for this point in route order and rendered output.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            PlaceInput::Name(name) => name,
            PlaceInput::Position { .. } => CURRENT_LOCATION_LABEL,
        }
    }
}

/// One normalized day of forecast data for one place.
///
/// Two variants mirror the two provider payload shapes. Temperatures and
/// wind speed are `None` when the provider omits them; probabilities default
/// to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForecastDayRecord {
    /// From the daily-forecast payload shape.
    Daily {
        min_temperature: Option<f64>,
        max_temperature: Option<f64>,
        wind_speed: Option<f64>,
        snow_probability: f64,
        rain_probability: f64,
    },
    /// From the hourly-list payload shape.
    Hourly {
        temperature: Option<f64>,
        real_feel_temperature: Option<f64>,
        wind_speed: Option<f64>,
        snow_probability: f64,
        rain_probability: f64,
    },
}

impl ForecastDayRecord {
    /// Representative temperature for charting: the daily maximum, or the
    /// point temperature for hourly records.
    #[must_use]
    pub fn headline_temperature(&self) -> Option<f64> {
        match self {
            ForecastDayRecord::Daily {
                max_temperature, ..
            } => *max_temperature,
            ForecastDayRecord::Hourly { temperature, .. } => *temperature,
        }
    }
}

/// Forecast for one route point: its label, resolved location, and one
/// record per requested day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointForecast {
    pub label: String,
    pub location: LocationRef,
    pub days: Vec<ForecastDayRecord>,
}

/// The complete forecast for a finished route, in route order
/// (start, intermediates, end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteForecast {
    pub points: Vec<PointForecast>,
}

impl RouteForecast {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
