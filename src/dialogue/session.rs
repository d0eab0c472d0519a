//! Route-collection session state machine.

use crate::dialogue::prompts;
use crate::weather::model::PlaceInput;

/// The steps of the route-collection dialogue.
///
/// Progresses linearly: AwaitingStart → AwaitingEnd → AwaitingIntermediates
/// → AwaitingDays. Completion is terminal — the session is cleared rather
/// than parked in a final step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStep {
    AwaitingStart,
    AwaitingEnd,
    AwaitingIntermediates,
    AwaitingDays,
}

impl RouteStep {
    /// Get the next step in the linear progression, if any.
    #[must_use]
    pub fn next(&self) -> Option<RouteStep> {
        use RouteStep::*;
        match self {
            AwaitingStart => Some(AwaitingEnd),
            AwaitingEnd => Some(AwaitingIntermediates),
            AwaitingIntermediates => Some(AwaitingDays),
            AwaitingDays => None,
        }
    }
}

impl std::fmt::Display for RouteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingStart => "awaiting_start",
            Self::AwaitingEnd => "awaiting_end",
            Self::AwaitingIntermediates => "awaiting_intermediates",
            Self::AwaitingDays => "awaiting_days",
        };
        write!(f, "{s}")
    }
}

/// One conversation's in-progress route-collection state.
///
/// Invariant: fields populate strictly in step order — the session is never
/// in `AwaitingDays` with `start` or `end` unset. Created on entering the
/// weather flow, mutated once per valid turn, cleared on completion or
/// unrecoverable lookup failure.
#[derive(Debug, Clone)]
pub struct RouteSession {
    pub step: RouteStep,
    pub start: Option<PlaceInput>,
    pub end: Option<PlaceInput>,
    pub intermediates: Vec<PlaceInput>,
    pub days: Option<i64>,
}

impl RouteSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: RouteStep::AwaitingStart,
            start: None,
            end: None,
            intermediates: Vec::new(),
            days: None,
        }
    }

    /// Store the validated start point and advance.
    pub fn set_start(&mut self, start: PlaceInput) {
        self.start = Some(start);
        self.step = RouteStep::AwaitingEnd;
    }

    /// Store the validated end point and advance.
    pub fn set_end(&mut self, end: PlaceInput) {
        self.end = Some(end);
        self.step = RouteStep::AwaitingIntermediates;
    }

    /// Store the (unvalidated) intermediate points and advance.
    pub fn set_intermediates(&mut self, intermediates: Vec<PlaceInput>) {
        self.intermediates = intermediates;
        self.step = RouteStep::AwaitingDays;
    }

    /// Store the selected forecast horizon. Terminal — the caller clears the
    /// session after aggregation.
    pub fn set_days(&mut self, days: i64) {
        self.days = Some(days);
    }

    /// The full route in order (start, intermediates, end), available once
    /// start and end are both set.
    #[must_use]
    pub fn route(&self) -> Option<Vec<PlaceInput>> {
        let start = self.start.clone()?;
        let end = self.end.clone()?;

        let mut route = Vec::with_capacity(self.intermediates.len() + 2);
        route.push(start);
        route.extend(self.intermediates.iter().cloned());
        route.push(end);
        Some(route)
    }
}

impl Default for RouteSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the intermediate-cities answer.
///
/// The "none" keyword (any case, surrounding whitespace) yields an empty
/// list; anything else splits on commas with each token trimmed. No
/// validation happens here — unresolvable names surface at aggregation.
#[must_use]
pub fn parse_intermediates(input: &str) -> Vec<PlaceInput> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case(prompts::NONE_KEYWORD) {
        return Vec::new();
    }

    trimmed
        .split(',')
        .map(|token| PlaceInput::Name(token.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Step progression ────────────────────────────────────────────

    #[test]
    fn steps_progress_linearly() {
        assert_eq!(RouteStep::AwaitingStart.next(), Some(RouteStep::AwaitingEnd));
        assert_eq!(
            RouteStep::AwaitingEnd.next(),
            Some(RouteStep::AwaitingIntermediates)
        );
        assert_eq!(
            RouteStep::AwaitingIntermediates.next(),
            Some(RouteStep::AwaitingDays)
        );
        assert_eq!(RouteStep::AwaitingDays.next(), None);
    }

    #[test]
    fn session_advances_one_step_per_field() {
        let mut session = RouteSession::new();
        assert_eq!(session.step, RouteStep::AwaitingStart);

        session.set_start(PlaceInput::Name("Berlin".into()));
        assert_eq!(session.step, RouteStep::AwaitingEnd);

        session.set_end(PlaceInput::Name("Paris".into()));
        assert_eq!(session.step, RouteStep::AwaitingIntermediates);

        session.set_intermediates(vec![]);
        assert_eq!(session.step, RouteStep::AwaitingDays);
    }

    #[test]
    fn route_is_start_intermediates_end_in_order() {
        let mut session = RouteSession::new();
        session.set_start(PlaceInput::Name("Berlin".into()));
        session.set_end(PlaceInput::Name("Paris".into()));
        session.set_intermediates(vec![
            PlaceInput::Name("Hanover".into()),
            PlaceInput::Name("Cologne".into()),
        ]);

        let route = session.route().unwrap();
        let labels: Vec<&str> = route.iter().map(PlaceInput::label).collect();
        assert_eq!(labels, vec!["Berlin", "Hanover", "Cologne", "Paris"]);
    }

    #[test]
    fn route_requires_start_and_end() {
        let mut session = RouteSession::new();
        assert!(session.route().is_none());

        session.set_start(PlaceInput::Name("Berlin".into()));
        assert!(session.route().is_none());
    }

    // ── Intermediates parsing ───────────────────────────────────────

    #[test]
    fn none_keyword_yields_empty_list() {
        assert!(parse_intermediates("none").is_empty());
        assert!(parse_intermediates("NONE").is_empty());
        assert!(parse_intermediates("  None  ").is_empty());
    }

    #[test]
    fn comma_list_splits_and_trims() {
        let parsed = parse_intermediates(" Hanover , Cologne,Bonn ");
        let labels: Vec<&str> = parsed.iter().map(PlaceInput::label).collect();
        assert_eq!(labels, vec!["Hanover", "Cologne", "Bonn"]);
    }

    #[test]
    fn single_city_is_one_token() {
        let parsed = parse_intermediates("Hanover");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].label(), "Hanover");
    }

    #[test]
    fn token_count_is_preserved_even_for_empty_tokens() {
        // Deferred validation: nothing is dropped here, the aggregation
        // surfaces unresolvable entries later.
        let parsed = parse_intermediates("Hanover,,Bonn");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1].label(), "");
    }
}
