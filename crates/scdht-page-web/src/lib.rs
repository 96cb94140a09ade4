#![forbid(unsafe_code)]

//! Browser bindings for the SCDht page script.
//!
//! This crate wraps [`scdht_page::PageInteractionController`] with `web-sys`
//! implementations of its collaborators and exports two functions to the page:
//!
//! - `initPageInteractions(configJson?)` binds the Enter key, the search
//!   trigger, the go-to-top control and the scroll listener. Call it once
//!   after the page's elements exist.
//! - `changeLanguage(lang)` writes the language cookie and reloads. It works
//!   with or without a prior `initPageInteractions` call.
//!
//! Only the `wasm32` target carries the bindings; native builds compile the
//! frame-time helpers used by both.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    DocumentCookies, WebDom, WindowLocation, change_language, current_language,
    dispatch_page_event, init_page_interactions,
};

use core::time::Duration;

use chrono::{DateTime, Utc};

/// Convert a `DOMHighResTimeStamp` (milliseconds) into a monotonic duration.
///
/// Negative or non-finite stamps map to zero.
#[must_use]
pub fn frame_time(timestamp_ms: f64) -> Duration {
    if !timestamp_ms.is_finite() || timestamp_ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((timestamp_ms * 1_000_000.0).round() as u64)
}

/// Convert `Date.now()` milliseconds into a UTC wall-clock time.
///
/// Out-of-range values fall back to the Unix epoch.
#[must_use]
pub fn wall_time(epoch_ms: f64) -> DateTime<Utc> {
    if !epoch_ms.is_finite() {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    DateTime::from_timestamp_millis(epoch_ms as i64).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
