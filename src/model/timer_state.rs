use std::time::Duration;

use serde_with::serde_as;
use serde_with::DurationSeconds;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CountdownStatus {
    Running,
    Cancelled,
    Expired,
}

/// Result of feeding one second into a countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed.
    Ignored,
    Running(Duration),
    Expired,
}

/// A cancelable one-second countdown. The host owns the clock and calls
/// [`Countdown::tick`] once per elapsed second.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Countdown {
    #[serde_as(as = "DurationSeconds<u64>")]
    pub remaining: Duration,
    pub status: CountdownStatus,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: Duration::from_secs(seconds as u64),
            status: CountdownStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining.as_secs() as u32
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(Duration::from_secs(1));
        if self.remaining.is_zero() {
            self.status = CountdownStatus::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining)
        }
    }

    pub fn cancel(&mut self) {
        if self.is_running() {
            self.status = CountdownStatus::Cancelled;
        }
    }
}
