//! Presentation adapter — chat text rendering, plus the seam for the
//! visual variant's chart and map renderer.

use async_trait::async_trait;

use crate::weather::model::{ForecastDayRecord, RouteForecast};

/// Which presentation variant the bot runs, selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Text summary only.
    Text,
    /// Text summary plus chart image and map document.
    Visual,
}

/// External rendering capability for the visual variant.
///
/// The core supplies per-point coordinates and per-day temperature series
/// through [`RouteForecast`]; the produced formats are opaque here.
#[async_trait]
pub trait VisualRenderer: Send + Sync {
    /// Render a temperature chart across the route. Returns encoded image bytes.
    async fn chart(&self, forecast: &RouteForecast) -> anyhow::Result<Vec<u8>>;

    /// Render a route map with one marker per point. Returns document bytes.
    async fn map(&self, forecast: &RouteForecast) -> anyhow::Result<Vec<u8>>;
}

/// Render the complete route forecast as chat text, one block per point in
/// route order.
#[must_use]
pub fn render_route_forecast(forecast: &RouteForecast) -> String {
    let mut out = String::new();

    for point in &forecast.points {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("Forecast for {}:\n", point.label));

        for (index, record) in point.days.iter().enumerate() {
            out.push_str(&format!("Day {}\n", index + 1));
            match record {
                ForecastDayRecord::Daily {
                    min_temperature,
                    max_temperature,
                    wind_speed,
                    snow_probability,
                    rain_probability,
                } => {
                    out.push_str(&format!(
                        "min temperature: {}\n",
                        fmt_measure(*min_temperature, "°C")
                    ));
                    out.push_str(&format!(
                        "max temperature: {}\n",
                        fmt_measure(*max_temperature, "°C")
                    ));
                    out.push_str(&format!(
                        "wind speed: {}\n",
                        fmt_measure(*wind_speed, "km/h")
                    ));
                    out.push_str(&format!("snow probability: {snow_probability:.0}%\n"));
                    out.push_str(&format!("rain probability: {rain_probability:.0}%\n"));
                }
                ForecastDayRecord::Hourly {
                    temperature,
                    real_feel_temperature,
                    wind_speed,
                    snow_probability,
                    rain_probability,
                } => {
                    out.push_str(&format!(
                        "temperature: {}\n",
                        fmt_measure(*temperature, "°C")
                    ));
                    out.push_str(&format!(
                        "real feel temperature: {}\n",
                        fmt_measure(*real_feel_temperature, "°C")
                    ));
                    out.push_str(&format!(
                        "wind speed: {}\n",
                        fmt_measure(*wind_speed, "km/h")
                    ));
                    out.push_str(&format!("snow probability: {snow_probability:.0}%\n"));
                    out.push_str(&format!("rain probability: {rain_probability:.0}%\n"));
                }
            }
        }
    }

    out.trim_end().to_string()
}

/// Format an optional measurement, degrading to an explicit marker.
fn fmt_measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1} {unit}"),
        None => "unavailable".to_string(),
    }
}
