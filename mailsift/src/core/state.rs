//! Scrape lifecycle state held by the controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the controller is in the scrape lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeState {
    /// Ready to accept a trigger.
    #[default]
    Idle,
    /// A page-scripting round trip is outstanding.
    InFlight,
    /// A scrape just finished; triggers are refused until the cooldown ends.
    CoolingDown,
}

impl ScrapeState {
    /// Returns true if a new trigger may start a scrape.
    #[must_use]
    pub fn accepts_trigger(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Label shown on the trigger while in this state.
    #[must_use]
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Idle => "Scrape Emails",
            Self::InFlight => "Scraping...",
            Self::CoolingDown => "Done",
        }
    }
}

impl fmt::Display for ScrapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::InFlight => write!(f, "in_flight"),
            Self::CoolingDown => write!(f, "cooling_down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_idle_accepts() {
        assert!(ScrapeState::Idle.accepts_trigger());
        assert!(!ScrapeState::InFlight.accepts_trigger());
        assert!(!ScrapeState::CoolingDown.accepts_trigger());
    }

    #[test]
    fn test_display_matches_serde() {
        for state in [ScrapeState::Idle, ScrapeState::InFlight, ScrapeState::CoolingDown] {
            let json = serde_json::to_value(state).unwrap();
            assert_eq!(json, serde_json::json!(state.to_string()));
        }
    }
}
