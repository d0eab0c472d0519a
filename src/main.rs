use std::sync::Arc;

use futures::StreamExt;
use routecast::channels::{ChatChannel, TelegramChannel};
use routecast::config::BotConfig;
use routecast::dialogue::{ConversationRouter, RouteDialogue};
use routecast::presentation::PresentationMode;
use routecast::weather::AccuWeatherClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export ROUTECAST_BOT_TOKEN=123456:...");
        eprintln!("  export ROUTECAST_WEATHER_API_KEY=...");
        std::process::exit(1);
    });

    eprintln!("🌦  Routecast v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Weather API: {}", config.weather.base_url);
    eprintln!("   Presentation: {:?}", config.presentation);

    let weather = Arc::new(AccuWeatherClient::new(&config.weather)?);

    let dialogue = RouteDialogue::new(weather.clone(), weather.clone());
    if config.presentation == PresentationMode::Visual {
        // The visual variant needs a VisualRenderer implementation attached
        // via RouteDialogue::with_renderer; none ships with this binary.
        tracing::warn!("Visual presentation selected but no renderer is wired; replies stay text-only");
    }

    let channel = Arc::new(TelegramChannel::new(&config.telegram));
    channel.health_check().await?;

    let mut router = ConversationRouter::new(Arc::new(dialogue), channel.clone());
    let mut events = channel.start().await?;

    eprintln!("   Listening for Telegram updates. Ctrl-C to stop.\n");

    while let Some(event) = events.next().await {
        router.dispatch(event);
    }

    Ok(())
}
