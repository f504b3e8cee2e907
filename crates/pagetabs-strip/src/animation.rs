//! Animation State Machine
//!
//! One [`ValueAnimator`] owns the single animation slot of one resource
//! (indicator bounds, scroll offset, icon scale):
//! ```text
//! Idle
//!   ↓ start
//! Animating ──tick past duration──→ Idle (Finished)
//!   ↓ cancel
//! Cancelling ──tick──→ Idle (Cancelled)
//! ```
//! The host drives it by calling `tick` from its frame clock. A replacement
//! is only started once the running animation has been cancelled.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::easing::Easing;

/// Values that can be interpolated between two endpoints.
pub trait Lerp: Copy {
    fn lerp(start: Self, end: Self, fraction: f32) -> Self;
}

impl Lerp for i32 {
    fn lerp(start: Self, end: Self, fraction: f32) -> Self {
        start + (fraction * (end - start) as f32).round() as i32
    }
}

impl Lerp for f32 {
    fn lerp(start: Self, end: Self, fraction: f32) -> Self {
        start + (end - start) * fraction
    }
}

/// Source of frame timestamps.
pub trait FrameClock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl FrameClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationState<T> {
    /// Nothing in flight
    Idle,
    /// Interpolating from `start` to `target`
    Animating {
        start: T,
        target: T,
        started_at: Instant,
        duration: Duration,
    },
    /// Stopped at `current`; the next tick reports the cancellation
    Cancelling { current: T, target: T, fraction: f32 },
}

/// What a tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent<T> {
    Frame(T),
    Finished(T),
    Cancelled(T),
}

#[derive(Debug, Clone)]
pub struct ValueAnimator<T> {
    state: AnimationState<T>,
    easing: Easing,
}

impl<T: Lerp> ValueAnimator<T> {
    pub fn new(easing: Easing) -> Self {
        Self {
            state: AnimationState::Idle,
            easing,
        }
    }

    pub fn state(&self) -> &AnimationState<T> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Animating { .. })
    }

    pub fn duration(&self) -> Option<Duration> {
        match self.state {
            AnimationState::Animating { duration, .. } => Some(duration),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<T> {
        match self.state {
            AnimationState::Animating { target, .. } | AnimationState::Cancelling { target, .. } => {
                Some(target)
            }
            AnimationState::Idle => None,
        }
    }

    pub fn start(&mut self, start: T, target: T, now: Instant, duration: Duration) {
        debug_assert!(
            !self.is_running(),
            "running animation must be cancelled before it is replaced"
        );
        self.state = AnimationState::Animating {
            start,
            target,
            started_at: now,
            duration,
        };
    }

    /// Linear progress in `[0, 1]` at `now`.
    pub fn fraction(&self, now: Instant) -> Option<f32> {
        match self.state {
            AnimationState::Animating {
                started_at,
                duration,
                ..
            } => Some(Self::progress(started_at, duration, now)),
            _ => None,
        }
    }

    /// Interpolated value at `now`, without advancing the state.
    pub fn value_at(&self, now: Instant) -> Option<T> {
        match self.state {
            AnimationState::Animating {
                start,
                target,
                started_at,
                duration,
            } => {
                let fraction = Self::progress(started_at, duration, now);
                Some(T::lerp(start, target, self.easing.apply(fraction)))
            }
            AnimationState::Cancelling { current, .. } => Some(current),
            AnimationState::Idle => None,
        }
    }

    pub fn tick(&mut self, now: Instant) -> Option<AnimationEvent<T>> {
        match self.state {
            AnimationState::Idle => None,
            AnimationState::Animating {
                start,
                target,
                started_at,
                duration,
            } => {
                let fraction = Self::progress(started_at, duration, now);
                if fraction >= 1.0 {
                    self.state = AnimationState::Idle;
                    Some(AnimationEvent::Finished(target))
                } else {
                    Some(AnimationEvent::Frame(T::lerp(
                        start,
                        target,
                        self.easing.apply(fraction),
                    )))
                }
            }
            AnimationState::Cancelling { current, .. } => {
                self.state = AnimationState::Idle;
                Some(AnimationEvent::Cancelled(current))
            }
        }
    }

    /// Freeze a running animation at its value for `now`.
    ///
    /// Returns that value and the linear fraction that had elapsed.
    pub fn cancel(&mut self, now: Instant) -> Option<(T, f32)> {
        let AnimationState::Animating {
            start,
            target,
            started_at,
            duration,
        } = self.state
        else {
            return None;
        };

        let fraction = Self::progress(started_at, duration, now);
        let current = T::lerp(start, target, self.easing.apply(fraction));
        self.state = AnimationState::Cancelling {
            current,
            target,
            fraction,
        };
        Some((current, fraction))
    }

    fn progress(started_at: Instant, duration: Duration, now: Instant) -> f32 {
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started_at);
        (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
    }
}
