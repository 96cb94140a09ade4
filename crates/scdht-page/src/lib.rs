#![forbid(unsafe_code)]

//! `scdht-page` is the platform-independent core of the SCDht page script.
//!
//! It owns the interaction semantics of the search page:
//! - **Search**: Enter or a click on the trigger navigates to
//!   `/search/<encoded key>`, or flags the input group when the key is empty.
//! - **Go to top**: the control is shown past a scroll threshold and a click
//!   animates the page back to offset zero.
//! - **Language**: `change_language` persists a `lang` cookie and reloads.
//!
//! Design goals:
//! - **Host-driven I/O**: DOM, cookie and location access go through the
//!   collaborator traits in [`host`]; the embedding environment implements them.
//! - **Deterministic time**: animation frames carry an explicit monotonic
//!   timestamp pushed by the host.
//! - **No JS types**: `scdht-page-web` wraps this crate with `wasm-bindgen`.

pub mod config;
pub mod controller;
pub mod cookie;
pub mod event;
pub mod host;
pub mod memory;
pub mod scroll;
pub mod search;

pub use config::{GoTopReentry, PageConfig};
pub use controller::{AnimationStatus, PageInteractionController, SearchOutcome};
pub use cookie::{Cookie, gmt_string, parse_cookie_header};
pub use event::{KeyInput, PageEvent, parse_page_event};
pub use host::{CookieStore, Location, PageDom};
pub use scroll::{ScrollAnimation, go_top_visible, swing};
pub use search::{SearchKey, SearchSort, encode_search_key, search_url, search_url_sorted};

/// Errors surfaced by the page controller and its host collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// An element the controller needs is not present in the page.
    #[error("missing page element: {0}")]
    MissingElement(String),
    /// The host refused to store a cookie.
    #[error("cookie rejected: {0}")]
    CookieRejected(String),
    /// The host failed to navigate or reload.
    #[error("navigation failed: {0}")]
    NavigationFailed(String),
    /// `init` was called on an already initialized controller.
    #[error("page interactions already initialized")]
    AlreadyInitialized,
    /// The operation needs the bound page runtime, which does not exist yet.
    #[error("page interactions not initialized")]
    NotInitialized,
    /// Page configuration could not be decoded.
    #[error("invalid page config: {0}")]
    Config(String),
    /// A host-encoded event could not be decoded.
    #[error("invalid page event: {0}")]
    EventDecode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            PageError::MissingElement("#gotop".into()).to_string(),
            "missing page element: #gotop"
        );
        assert_eq!(
            PageError::AlreadyInitialized.to_string(),
            "page interactions already initialized"
        );
        assert_eq!(
            PageError::NotInitialized.to_string(),
            "page interactions not initialized"
        );
        assert_eq!(
            PageError::EventDecode("missing kind".into()).to_string(),
            "invalid page event: missing kind"
        );
    }
}
