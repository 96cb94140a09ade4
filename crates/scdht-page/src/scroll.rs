#![forbid(unsafe_code)]

//! Go-to-top visibility and the host-clocked scroll animation.
//!
//! [`ScrollAnimation`] carries no clock of its own. The host passes the
//! current monotonic time to [`ScrollAnimation::sample`] on every frame, which
//! keeps the animation deterministic under test.

use core::f64::consts::PI;
use core::time::Duration;

/// Whether the go-to-top control should be visible at `offset`.
///
/// Strictly greater than `threshold`: at exactly the threshold it stays hidden.
#[must_use]
pub fn go_top_visible(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// jQuery's default "swing" easing: slow start, slow finish.
#[must_use]
pub fn swing(progress: f64) -> f64 {
    0.5 - (progress.clamp(0.0, 1.0) * PI).cos() / 2.0
}

/// One scroll animation from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    started: Duration,
    duration: Duration,
}

impl ScrollAnimation {
    #[must_use]
    pub const fn new(from: f64, to: f64, started: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.to
    }

    /// Linear progress in `[0, 1]` at `now`. A zero duration is complete
    /// immediately; a `now` before the start counts as zero progress.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Eased offset at `now`, and whether the animation has finished.
    ///
    /// The final sample returns `to` exactly.
    #[must_use]
    pub fn sample(&self, now: Duration) -> (f64, bool) {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return (self.to, true);
        }
        let offset = self.from + (self.to - self.from) * swing(progress);
        (offset, false)
    }
}
