//! Forecast payload normalizer.
//!
//! The provider returns one of two shapes: a flat list of hourly entries, or
//! an object with a `DailyForecasts` collection. This module classifies the
//! payload and extracts one canonical record per day index. Missing nested
//! fields degrade per-field; an unclassifiable payload is an error.

use serde_json::Value;

use crate::error::WeatherError;
use crate::weather::model::ForecastDayRecord;

/// Extract the record at `index` from a raw forecast payload.
pub fn normalize_day(payload: &Value, index: usize) -> Result<ForecastDayRecord, WeatherError> {
    if let Some(hourly) = payload.as_array() {
        let entry = hourly.get(index).ok_or_else(|| WeatherError::Fetch {
            reason: format!("hourly payload has no entry at index {index}"),
        })?;

        Ok(ForecastDayRecord::Hourly {
            temperature: number_at(entry, &["Temperature", "Value"]),
            real_feel_temperature: number_at(entry, &["RealFeelTemperature", "Value"]),
            wind_speed: number_at(entry, &["Wind", "Speed", "Value"]),
            snow_probability: number_at(entry, &["SnowProbability"]).unwrap_or(0.0),
            rain_probability: number_at(entry, &["RainProbability"]).unwrap_or(0.0),
        })
    } else if let Some(daily) = payload.get("DailyForecasts").and_then(Value::as_array) {
        let entry = daily.get(index).ok_or_else(|| WeatherError::Fetch {
            reason: format!("daily payload has no entry at index {index}"),
        })?;

        Ok(ForecastDayRecord::Daily {
            min_temperature: number_at(entry, &["Temperature", "Minimum", "Value"]),
            max_temperature: number_at(entry, &["Temperature", "Maximum", "Value"]),
            wind_speed: number_at(entry, &["Day", "Wind", "Speed", "Value"]),
            snow_probability: number_at(entry, &["Day", "SnowProbability"]).unwrap_or(0.0),
            rain_probability: number_at(entry, &["Day", "RainProbability"]).unwrap_or(0.0),
        })
    } else {
        Err(WeatherError::UnsupportedPayload)
    }
}

/// Walk a nested object path and read a number, if present.
fn number_at(value: &Value, path: &[&str]) -> Option<f64> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_f64()
}
