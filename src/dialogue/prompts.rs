//! User-facing dialogue copy: prompts, retries, and keyboard labels.

/// `/start` greeting.
pub const WELCOME: &str = "Hi! I'm a route weather bot.\n\
I can give you a forecast for every point of a travel route.\n\
Use /help to learn more.";

/// `/help` command list.
pub const HELP: &str = "Available commands:\n\
/start - Welcome message\n\
/help - This list\n\
/weather - Request a route forecast";

pub const START_PROMPT: &str =
    "Enter the starting point of your route, or share your location:";
pub const START_RETRY: &str = "Could not determine the starting point. Please try again.";

pub const END_PROMPT: &str = "Enter the destination of your route:";
pub const END_RETRY: &str = "Could not determine the destination. Please try again.";

pub const INTERMEDIATES_PROMPT: &str =
    "Enter intermediate cities separated by commas, or 'none' if there are none.";

pub const DAYS_PROMPT: &str = "Choose the forecast horizon:";

pub const FALLBACK: &str =
    "Sorry, I didn't understand that. Please use a command or one of the offered buttons.";

/// Label on the share-location reply keyboard button.
pub const SHARE_LOCATION_BUTTON: &str = "Share my location";

/// Keyword that means "no intermediate cities".
pub const NONE_KEYWORD: &str = "none";

/// The two forecast horizons offered at the last step, as
/// (button label, callback data) pairs.
pub const DAY_CHOICES: [(&str, &str); 2] = [("1-day forecast", "1"), ("5-day forecast", "5")];

/// Progress line sent while the aggregation runs.
#[must_use]
pub fn fetching_forecast(days: i64) -> String {
    if days == 1 {
        "Fetching the forecast for 1 day...".to_string()
    } else {
        format!("Fetching the forecast for {days} days...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetching_line_handles_singular_and_plural() {
        assert_eq!(fetching_forecast(1), "Fetching the forecast for 1 day...");
        assert_eq!(fetching_forecast(5), "Fetching the forecast for 5 days...");
    }

    #[test]
    fn day_choices_offer_one_and_five() {
        let data: Vec<&str> = DAY_CHOICES.iter().map(|(_, d)| *d).collect();
        assert_eq!(data, vec!["1", "5"]);
    }
}
