//! Multi-turn route-collection dialogue.
//!
//! Consumes chat events against a per-conversation [`RouteSession`] and
//! emits replies. A session advances only on valid input for its current
//! step; resolution failures re-prompt without moving, and anything that
//! does not match the current step falls through to a generic fallback
//! without mutating the session.

pub mod prompts;
pub mod router;
pub mod session;

pub use router::ConversationRouter;
pub use session::{RouteSession, RouteStep, parse_intermediates};

use std::sync::Arc;

use tracing::{info, warn};

use crate::channels::{ChatEvent, Choice, EventKind, Reply};
use crate::presentation::{self, VisualRenderer};
use crate::weather::model::PlaceInput;
use crate::weather::{ForecastAggregator, ForecastFetcher, PlaceResolver};

/// Drives the route-collection dialogue and the final forecast turn.
pub struct RouteDialogue {
    resolver: Arc<dyn PlaceResolver>,
    aggregator: ForecastAggregator,
    renderer: Option<Arc<dyn VisualRenderer>>,
}

impl RouteDialogue {
    pub fn new(resolver: Arc<dyn PlaceResolver>, fetcher: Arc<dyn ForecastFetcher>) -> Self {
        let aggregator = ForecastAggregator::new(resolver.clone(), fetcher);
        Self {
            resolver,
            aggregator,
            renderer: None,
        }
    }

    /// Attach the chart + map renderer (the visual variant).
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn VisualRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Process one inbound event against the conversation's session.
    ///
    /// The session is created by `/weather`, cleared when the final turn
    /// completes (successfully or not), and left untouched by anything the
    /// current step does not accept.
    pub async fn handle(
        &self,
        session: &mut Option<RouteSession>,
        event: &ChatEvent,
    ) -> Vec<Reply> {
        match &event.kind {
            EventKind::Text(text) => self.handle_text(session, text.trim()).await,
            EventKind::Location {
                latitude,
                longitude,
            } => self.handle_location(session, *latitude, *longitude).await,
            EventKind::Callback(data) => self.handle_callback(session, data).await,
        }
    }

    async fn handle_text(&self, session: &mut Option<RouteSession>, text: &str) -> Vec<Reply> {
        // Commands take precedence over step handling in any state.
        match text {
            "/start" => return vec![Reply::Text(prompts::WELCOME.into())],
            "/help" => return vec![Reply::Text(prompts::HELP.into())],
            "/weather" => {
                *session = Some(RouteSession::new());
                return vec![Reply::LocationRequest {
                    text: prompts::START_PROMPT.into(),
                    button: prompts::SHARE_LOCATION_BUTTON.into(),
                }];
            }
            _ => {}
        }

        let Some(current) = session.as_mut() else {
            return fallback();
        };

        match current.step {
            RouteStep::AwaitingStart => match self.resolver.resolve_name(text).await {
                Ok(_) => {
                    current.set_start(PlaceInput::Name(text.to_string()));
                    vec![Reply::Text(prompts::END_PROMPT.into())]
                }
                Err(e) => {
                    warn!("Start point '{text}' did not resolve: {e}");
                    vec![Reply::Text(prompts::START_RETRY.into())]
                }
            },
            RouteStep::AwaitingEnd => match self.resolver.resolve_name(text).await {
                Ok(_) => {
                    current.set_end(PlaceInput::Name(text.to_string()));
                    vec![Reply::Text(prompts::INTERMEDIATES_PROMPT.into())]
                }
                Err(e) => {
                    warn!("End point '{text}' did not resolve: {e}");
                    vec![Reply::Text(prompts::END_RETRY.into())]
                }
            },
            RouteStep::AwaitingIntermediates => {
                current.set_intermediates(session::parse_intermediates(text));
                vec![Reply::Choices {
                    text: prompts::DAYS_PROMPT.into(),
                    options: day_choices(),
                }]
            }
            // Free text is not a valid answer to the horizon keyboard.
            RouteStep::AwaitingDays => fallback(),
        }
    }

    async fn handle_location(
        &self,
        session: &mut Option<RouteSession>,
        latitude: f64,
        longitude: f64,
    ) -> Vec<Reply> {
        let Some(current) = session.as_mut() else {
            return fallback();
        };
        if current.step != RouteStep::AwaitingStart {
            return fallback();
        }

        match self.resolver.resolve_position(latitude, longitude).await {
            Ok(_) => {
                current.set_start(PlaceInput::Position {
                    latitude,
                    longitude,
                });
                vec![Reply::Text(prompts::END_PROMPT.into())]
            }
            Err(e) => {
                warn!("Geolocation ({latitude}, {longitude}) did not resolve: {e}");
                vec![Reply::Text(prompts::START_RETRY.into())]
            }
        }
    }

    async fn handle_callback(
        &self,
        session: &mut Option<RouteSession>,
        data: &str,
    ) -> Vec<Reply> {
        match session.as_ref().map(|s| s.step) {
            Some(RouteStep::AwaitingDays) => {}
            _ => return fallback(),
        }

        // Only the two offered horizons are valid selections.
        let Some(days) = parse_days_choice(data) else {
            return fallback();
        };
        let Some(mut finished) = session.take() else {
            return fallback();
        };
        finished.set_days(days);

        let mut replies = vec![Reply::Text(prompts::fetching_forecast(days))];

        let Some(route) = finished.route() else {
            // Unreachable by the step invariant; recover with the fallback.
            warn!("Session reached the horizon step without start or end");
            replies.push(Reply::Text(prompts::FALLBACK.into()));
            return replies;
        };

        info!(
            "Building {days}-day forecast for a route of {} points",
            route.len()
        );

        match self.aggregator.aggregate(&route, days).await {
            Ok(forecast) => {
                replies.push(Reply::Text(presentation::render_route_forecast(&forecast)));

                if let Some(renderer) = &self.renderer {
                    match renderer.chart(&forecast).await {
                        Ok(data) => replies.push(Reply::Photo {
                            data,
                            caption: Some("Temperature along the route".into()),
                        }),
                        Err(e) => warn!("Chart rendering failed: {e}"),
                    }
                    match renderer.map(&forecast).await {
                        Ok(data) => replies.push(Reply::Document {
                            data,
                            file_name: "route-map.html".into(),
                            caption: Some("Route map".into()),
                        }),
                        Err(e) => warn!("Map rendering failed: {e}"),
                    }
                }
            }
            Err(e) => {
                warn!("Route aggregation failed: {e}");
                replies.push(Reply::Text(e.user_message()));
            }
        }

        // Session was taken above: cleared whether aggregation succeeded or
        // failed.
        replies
    }
}

/// The horizon keyboard offered after the intermediates step.
fn day_choices() -> Vec<Choice> {
    prompts::DAY_CHOICES
        .iter()
        .map(|(label, data)| Choice {
            label: (*label).to_string(),
            data: (*data).to_string(),
        })
        .collect()
}

/// Map callback data back to a day count, if it is one of the offered
/// choices.
fn parse_days_choice(data: &str) -> Option<i64> {
    prompts::DAY_CHOICES
        .iter()
        .find(|(_, choice_data)| *choice_data == data)
        .and_then(|(_, choice_data)| choice_data.parse().ok())
}

fn fallback() -> Vec<Reply> {
    vec![Reply::Text(prompts::FALLBACK.into())]
}
