//! Integration tests for the route-collection dialogue.
//!
//! Each test drives the full scripted flow — /weather, start, end,
//! intermediates, horizon selection — through a [`RouteDialogue`] backed by
//! stub resolver/fetcher implementations (no real API calls).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use routecast::channels::{ChatEvent, Reply};
use routecast::dialogue::{RouteDialogue, RouteSession, prompts};
use routecast::error::WeatherError;
use routecast::weather::model::LocationRef;
use routecast::weather::{ForecastFetcher, PlaceResolver};

/// Stub resolver that accepts a fixed set of city names.
struct StubResolver {
    known: Vec<String>,
}

impl StubResolver {
    fn knowing(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            known: names.iter().map(ToString::to_string).collect(),
        })
    }
}

#[async_trait]
impl PlaceResolver for StubResolver {
    async fn resolve_name(&self, name: &str) -> Result<LocationRef, WeatherError> {
        if self.known.iter().any(|n| n == name) {
            Ok(LocationRef {
                latitude: 0.0,
                longitude: 0.0,
                provider_key: format!("key-{name}"),
            })
        } else {
            Err(WeatherError::Resolution {
                place: name.to_string(),
            })
        }
    }

    async fn resolve_position(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationRef, WeatherError> {
        Ok(LocationRef {
            latitude,
            longitude,
            provider_key: "key-position".to_string(),
        })
    }
}

/// Stub fetcher returning a single-day daily payload and recording calls.
struct StubFetcher {
    calls: Mutex<Vec<(String, i64)>>,
}

impl StubFetcher {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ForecastFetcher for StubFetcher {
    async fn fetch(&self, location: &LocationRef, days: i64) -> Result<Value, WeatherError> {
        self.calls
            .lock()
            .unwrap()
            .push((location.provider_key.clone(), days));
        let entries: Vec<Value> = (0..days.max(0))
            .map(|_| {
                json!({
                    "Temperature": {
                        "Minimum": { "Value": 2.0 },
                        "Maximum": { "Value": 8.0 }
                    },
                    "Day": {
                        "Wind": { "Speed": { "Value": 12.0 } },
                        "RainProbability": 30
                    }
                })
            })
            .collect();
        Ok(json!({ "DailyForecasts": entries }))
    }
}

fn text_of(reply: &Reply) -> &str {
    match reply {
        Reply::Text(text) => text,
        other => panic!("expected a text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn scripted_berlin_paris_flow_produces_two_point_forecast() {
    let fetcher = StubFetcher::new();
    let dialogue = RouteDialogue::new(StubResolver::knowing(&["Berlin", "Paris"]), fetcher.clone());
    let mut session: Option<RouteSession> = None;

    let replies = dialogue
        .handle(&mut session, &ChatEvent::text("7", "/weather"))
        .await;
    assert!(matches!(replies[0], Reply::LocationRequest { .. }));

    let replies = dialogue
        .handle(&mut session, &ChatEvent::text("7", "Berlin"))
        .await;
    assert_eq!(text_of(&replies[0]), prompts::END_PROMPT);

    let replies = dialogue
        .handle(&mut session, &ChatEvent::text("7", "Paris"))
        .await;
    assert_eq!(text_of(&replies[0]), prompts::INTERMEDIATES_PROMPT);

    let replies = dialogue
        .handle(&mut session, &ChatEvent::text("7", "none"))
        .await;
    assert!(matches!(replies[0], Reply::Choices { .. }));

    let replies = dialogue
        .handle(&mut session, &ChatEvent::callback("7", "1"))
        .await;
    assert_eq!(text_of(&replies[0]), prompts::fetching_forecast(1));

    let body = text_of(&replies[1]);
    let berlin = body.find("Forecast for Berlin:").unwrap();
    let paris = body.find("Forecast for Paris:").unwrap();
    assert!(berlin < paris);
    assert!(body.contains("min temperature: 2.0 °C"));
    assert!(body.contains("rain probability: 30%"));

    // The aggregator looked up exactly the two route points, in order,
    // for one day each.
    let calls = fetcher.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![("key-Berlin".to_string(), 1), ("key-Paris".to_string(), 1)]
    );

    // Completed flow clears the session; further text falls back.
    let replies = dialogue
        .handle(&mut session, &ChatEvent::text("7", "Berlin"))
        .await;
    assert_eq!(text_of(&replies[0]), prompts::FALLBACK);
}

#[tokio::test]
async fn failed_start_keeps_prompting_until_a_city_resolves() {
    let dialogue = RouteDialogue::new(StubResolver::knowing(&["Berlin"]), StubFetcher::new());
    let mut session: Option<RouteSession> = None;

    dialogue
        .handle(&mut session, &ChatEvent::text("7", "/weather"))
        .await;

    let replies = dialogue
        .handle(&mut session, &ChatEvent::text("7", "Nowhereville"))
        .await;
    assert_eq!(text_of(&replies[0]), prompts::START_RETRY);

    // Same step again; a resolvable name now advances.
    let replies = dialogue
        .handle(&mut session, &ChatEvent::text("7", "Berlin"))
        .await;
    assert_eq!(text_of(&replies[0]), prompts::END_PROMPT);
}

#[tokio::test]
async fn five_day_flow_with_intermediates_covers_every_point() {
    let fetcher = StubFetcher::new();
    let dialogue = RouteDialogue::new(
        StubResolver::knowing(&["Berlin", "Hanover", "Cologne", "Paris"]),
        fetcher.clone(),
    );
    let mut session: Option<RouteSession> = None;

    dialogue
        .handle(&mut session, &ChatEvent::text("9", "/weather"))
        .await;
    dialogue
        .handle(&mut session, &ChatEvent::text("9", "Berlin"))
        .await;
    dialogue
        .handle(&mut session, &ChatEvent::text("9", "Paris"))
        .await;
    dialogue
        .handle(&mut session, &ChatEvent::text("9", "Hanover, Cologne"))
        .await;

    let replies = dialogue
        .handle(&mut session, &ChatEvent::callback("9", "5"))
        .await;

    let body = text_of(&replies[1]);
    for label in ["Berlin", "Hanover", "Cologne", "Paris"] {
        assert!(body.contains(&format!("Forecast for {label}:")));
    }
    assert!(body.contains("Day 5"));

    let calls = fetcher.calls.lock().unwrap().clone();
    let keys: Vec<&str> = calls.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        vec!["key-Berlin", "key-Hanover", "key-Cologne", "key-Paris"]
    );
    assert!(calls.iter().all(|(_, d)| *d == 5));
}
