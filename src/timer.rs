//! Rest countdown
//!
//! The countdown is an absolute end instant, not a tick counter. Remaining
//! time is recomputed from the clock on every observation, so a process that
//! was suspended catches up in one step when it next looks.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

// ---------------------------------------------------------------------------
/// Rest Countdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestCountdown {
    duration_secs: u32,
    ends_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
}

impl RestCountdown {
    pub fn start(now: DateTime<Utc>, duration_secs: u32) -> Self {
        Self {
            duration_secs,
            ends_at: now + Duration::seconds(duration_secs as i64),
            paused_at: None,
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Whole seconds left, rounded up. Frozen while paused.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u32 {
        let observed = self.paused_at.unwrap_or(now);
        let ms = (self.ends_at - observed).num_milliseconds();
        if ms <= 0 {
            0
        } else {
            ((ms + 999) / 1000) as u32
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_secs(now) == 0
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Shift the end instant forward by however long we were paused
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if let Some(paused_at) = self.paused_at.take() {
            let paused_for = now - paused_at;
            if paused_for > Duration::zero() {
                self.ends_at += paused_for;
            }
        }
    }

    pub fn toggle_pause(&mut self, now: DateTime<Utc>) {
        if self.is_paused() {
            self.resume(now);
        } else {
            self.pause(now);
        }
    }
}
