#![forbid(unsafe_code)]

//! Collaborator traits implemented by the embedding environment.
//!
//! The controller never touches a browser global directly. `scdht-page-web`
//! implements these over `web-sys`; [`crate::memory`] implements them in
//! memory for tests and native hosts.

use crate::PageError;
use crate::cookie::Cookie;

/// The slice of the DOM the page script reads and writes.
pub trait PageDom {
    /// Current value of the text input with id `id`.
    fn input_value(&self, id: &str) -> Result<String, PageError>;

    /// Add `class` to every element carrying `group_class`. Adding a class an
    /// element already has is a no-op.
    fn add_class(&mut self, group_class: &str, class: &str) -> Result<(), PageError>;

    /// Show or hide the element with id `id`.
    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), PageError>;

    /// Current vertical scroll offset of the document.
    fn scroll_top(&self) -> f64;

    /// Move the document's vertical scroll offset.
    fn set_scroll_top(&mut self, offset: f64);
}

/// Client-side cookie storage.
pub trait CookieStore {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&mut self, cookie: &Cookie) -> Result<(), PageError>;
}

/// The browsing context's location.
pub trait Location {
    /// Full navigation to `url`.
    fn assign(&mut self, url: &str) -> Result<(), PageError>;

    /// Reload the current page.
    fn reload(&mut self) -> Result<(), PageError>;
}
