//! Nova power-state codes (`OS-EXT-STS:power_state`).
//!
//! The compute API only hands out the integer; this maps it to a label for
//! display. Unknown codes are kept as-is.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    NoState,   // 0
    Running,   // 1
    Paused,    // 3
    Shutdown,  // 4
    Crashed,   // 6
    Suspended, // 7
    Other(i32),
}

impl PowerState {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PowerState::NoState,
            1 => PowerState::Running,
            3 => PowerState::Paused,
            4 => PowerState::Shutdown,
            6 => PowerState::Crashed,
            7 => PowerState::Suspended,
            other => PowerState::Other(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            PowerState::NoState => 0,
            PowerState::Running => 1,
            PowerState::Paused => 3,
            PowerState::Shutdown => 4,
            PowerState::Crashed => 6,
            PowerState::Suspended => 7,
            PowerState::Other(code) => *code,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::NoState => "NOSTATE",
            PowerState::Running => "RUNNING",
            PowerState::Paused => "PAUSED",
            PowerState::Shutdown => "SHUTDOWN",
            PowerState::Crashed => "CRASHED",
            PowerState::Suspended => "SUSPENDED",
            PowerState::Other(_) => "UNKNOWN",
        }
    }
}
