//! Simulation clock and deadline-based timed windows.

use bevy::prelude::*;

/// Absolute simulation time plus the length of the current fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    /// Seconds since simulation start
    pub now: f64,
    /// Fixed step length in seconds
    pub dt: f32,
}

impl SimClock {
    pub fn new(now: f64, dt: f32) -> Self {
        Self { now, dt }
    }

    /// Read the clock from bevy's time. Inside `FixedUpdate` this is the fixed clock.
    pub fn from_time(time: &Time) -> Self {
        Self {
            now: time.elapsed_secs_f64(),
            dt: time.delta_secs(),
        }
    }

    /// The clock one step later.
    pub fn advanced(self) -> Self {
        Self {
            now: self.now + self.dt as f64,
            dt: self.dt,
        }
    }
}

/// Slack when comparing against a deadline, so a window whose duration is a
/// whole number of fixed steps closes on the step that reaches it
const DEADLINE_EPSILON: f64 = 1e-6;

/// An ability or effect that stays active until an absolute deadline.
///
/// Nothing suspends while a window is open: callers check [`TimedWindow::expire`]
/// at the start of each tick and react when it reports the deadline passed.
/// Cancelling is just clearing the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct TimedWindow {
    deadline: Option<f64>,
}

impl TimedWindow {
    /// Open (or restart) the window so it closes `duration` seconds after `now`.
    pub fn open(&mut self, now: f64, duration: f32) {
        self.deadline = Some(now + duration.max(0.0) as f64);
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// Close the window if its deadline has passed.
    ///
    /// Returns true exactly once: on the call that closes the window.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now + DEADLINE_EPSILON >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Seconds left before the deadline, zero when closed.
    pub fn remaining(&self, now: f64) -> f32 {
        self.deadline
            .map(|deadline| (deadline - now).max(0.0) as f32)
            .unwrap_or(0.0)
    }
}
