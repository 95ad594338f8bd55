use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Threshold crossings observed by the engine's tick.
///
/// Events are edge-triggered: each one fires on the tick where its
/// boundary is first crossed and not again while the end time is
/// unchanged. The GUI or CLI turns them into voice announcements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Remaining time dropped to five minutes or less.
    FiveMinuteWarning {
        purpose: String,
        at: DateTime<Local>,
    },
    /// Remaining time reached zero.
    TimerCompleted {
        purpose: String,
        at: DateTime<Local>,
    },
}

impl Event {
    /// Spoken text for this event.
    pub fn announcement(&self) -> String {
        match self {
            Event::FiveMinuteWarning { purpose, .. } => {
                format!("5 minutes remaining until {purpose}!")
            }
            Event::TimerCompleted { purpose, .. } => {
                format!("Time is up! It's time for {purpose}!")
            }
        }
    }
}
