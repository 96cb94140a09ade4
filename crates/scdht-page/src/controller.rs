#![forbid(unsafe_code)]

//! The page interaction controller.
//!
//! [`PageInteractionController`] owns the three host collaborators and turns
//! page events into DOM writes, cookie writes and navigations. It holds no
//! state besides the init flag and the running go-to-top animation.

use core::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::PageError;
use crate::config::{GoTopReentry, PageConfig};
use crate::cookie::Cookie;
use crate::event::{KeyInput, PageEvent};
use crate::host::{CookieStore, Location, PageDom};
use crate::scroll::{ScrollAnimation, go_top_visible};
use crate::search::{SearchKey, search_url};

/// Result of a search trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The page navigated to this URL.
    Navigated(String),
    /// The key was empty; the input group was flagged instead.
    Rejected,
}

/// State of the go-to-top animation after a click or frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    /// No animation is running.
    Idle,
    /// The animation needs more frames.
    Running,
    /// This frame wrote the final offset.
    Finished,
}

pub struct PageInteractionController<D, C, L> {
    config: PageConfig,
    dom: D,
    cookies: C,
    location: L,
    initialized: bool,
    animation: Option<ScrollAnimation>,
}

impl<D, C, L> PageInteractionController<D, C, L>
where
    D: PageDom,
    C: CookieStore,
    L: Location,
{
    #[must_use]
    pub fn new(config: PageConfig, dom: D, cookies: C, location: L) -> Self {
        Self {
            config,
            dom,
            cookies,
            location,
            initialized: false,
            animation: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub const fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    #[must_use]
    pub const fn cookies(&self) -> &C {
        &self.cookies
    }

    #[must_use]
    pub const fn location(&self) -> &L {
        &self.location
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// One-time page setup: hides the go-to-top control.
    pub fn init(&mut self) -> Result<(), PageError> {
        if self.initialized {
            return Err(PageError::AlreadyInitialized);
        }
        self.dom.set_visible(&self.config.go_top_id, false)?;
        self.initialized = true;
        debug!(go_top = %self.config.go_top_id, "page interactions initialized");
        Ok(())
    }

    /// Enter triggers the search; every other key is ignored.
    pub fn on_key_down(&mut self, key: &KeyInput) -> Result<Option<SearchOutcome>, PageError> {
        if !key.is_enter() {
            return Ok(None);
        }
        self.on_search_triggered().map(Some)
    }

    /// Navigate to the results for the current input, or flag an empty input.
    pub fn on_search_triggered(&mut self) -> Result<SearchOutcome, PageError> {
        let raw = self.dom.input_value(&self.config.search_input_id)?;
        let Some(key) = SearchKey::new(raw) else {
            self.dom
                .add_class(&self.config.input_group_class, &self.config.error_class)?;
            return Ok(SearchOutcome::Rejected);
        };
        let url = search_url(&self.config.search_path_prefix, &key);
        debug!(%url, "navigating to search results");
        self.location.assign(&url)?;
        Ok(SearchOutcome::Navigated(url))
    }

    /// Sync go-to-top visibility with the current scroll offset.
    ///
    /// Returns the visibility that was applied.
    pub fn on_scroll(&mut self) -> Result<bool, PageError> {
        let offset = self.dom.scroll_top();
        let visible = go_top_visible(offset, self.config.go_top_threshold);
        trace!(offset, visible, "go-top visibility");
        self.dom.set_visible(&self.config.go_top_id, visible)?;
        Ok(visible)
    }

    /// Start scrolling back to the top at host time `now`.
    pub fn on_go_to_top_clicked(&mut self, now: Duration) -> AnimationStatus {
        if self.animation.is_some() && self.config.go_top_reentry == GoTopReentry::Ignore {
            trace!("go-top click ignored during animation");
            return AnimationStatus::Running;
        }
        let from = self.dom.scroll_top();
        self.animation = Some(ScrollAnimation::new(
            from,
            0.0,
            now,
            self.config.go_top_duration(),
        ));
        debug!(from, "scroll-to-top started");
        AnimationStatus::Running
    }

    /// Advance the running animation to host time `now`.
    pub fn on_animation_frame(&mut self, now: Duration) -> AnimationStatus {
        let Some(animation) = self.animation else {
            return AnimationStatus::Idle;
        };
        let (offset, done) = animation.sample(now);
        trace!(offset, done, "scroll-to-top frame");
        self.dom.set_scroll_top(offset);
        if done {
            self.animation = None;
            AnimationStatus::Finished
        } else {
            AnimationStatus::Running
        }
    }

    /// Persist `lang` in the language cookie and reload the page.
    ///
    /// `now` is the wall-clock time the expiry is counted from. Languages
    /// outside the configured list are still written; the server falls back
    /// for them.
    pub fn change_language(
        &mut self,
        lang: &str,
        now: DateTime<Utc>,
    ) -> Result<Cookie, PageError> {
        if !self.config.is_supported_language(lang) {
            warn!(lang, "language has no server catalog");
        }
        let cookie = Cookie::expiring_in_days(
            self.config.language_cookie.as_str(),
            lang,
            self.config.cookie_path.as_str(),
            now,
            self.config.cookie_expire_days,
        );
        self.cookies.set(&cookie)?;
        debug!(lang, "language cookie written, reloading");
        self.location.reload()?;
        Ok(cookie)
    }

    /// Language from the cookie, or the configured default.
    #[must_use]
    pub fn current_language(&self) -> String {
        self.cookies
            .get(&self.config.language_cookie)
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| self.config.default_language.clone())
    }

    /// Route one host event to its handler. `wall_now` is only read by
    /// [`PageEvent::ChangeLanguage`].
    pub fn dispatch(
        &mut self,
        event: PageEvent,
        wall_now: DateTime<Utc>,
    ) -> Result<(), PageError> {
        match event {
            PageEvent::KeyDown(key) => {
                self.on_key_down(&key)?;
            }
            PageEvent::SearchClick => {
                self.on_search_triggered()?;
            }
            PageEvent::Scroll => {
                self.on_scroll()?;
            }
            PageEvent::GoTopClick { now } => {
                self.on_go_to_top_clicked(now);
            }
            PageEvent::Frame { now } => {
                self.on_animation_frame(now);
            }
            PageEvent::ChangeLanguage { lang } => {
                self.change_language(&lang, wall_now)?;
            }
        }
        Ok(())
    }
}
