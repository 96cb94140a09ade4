#![forbid(unsafe_code)]

//! Page configuration: element identifiers, thresholds and cookie settings.
//!
//! Every field has a default matching the stock SCDht templates, so a host
//! that passes no configuration (or a partial JSON object) gets the standard
//! behavior.

use core::time::Duration;

use serde::Deserialize;

use crate::PageError;

/// What a click on the go-to-top control does while an animation is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoTopReentry {
    /// Start a fresh animation from the current offset.
    #[default]
    Restart,
    /// Keep the running animation and drop the click.
    Ignore,
}

/// Tuning and wiring for [`crate::PageInteractionController`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Id of the clickable search trigger.
    pub search_trigger_id: String,
    /// Id of the search text input.
    pub search_input_id: String,
    /// Id of the go-to-top control.
    pub go_top_id: String,
    /// Class of the ancestor that receives the error class.
    pub input_group_class: String,
    /// Class applied to the input group on an empty search.
    pub error_class: String,
    /// Path prefix of the search results route.
    pub search_path_prefix: String,
    /// Scroll offsets strictly above this show the go-to-top control.
    pub go_top_threshold: f64,
    /// Duration of the scroll-to-top animation in milliseconds.
    pub go_top_duration_ms: u64,
    /// Behavior of a go-to-top click during a running animation.
    pub go_top_reentry: GoTopReentry,
    /// `display` value used to show the go-to-top control when page CSS
    /// hides it by default.
    pub go_top_display: String,
    /// Name of the language cookie.
    pub language_cookie: String,
    /// Path attribute of the language cookie.
    pub cookie_path: String,
    /// Days until the language cookie expires.
    pub cookie_expire_days: i64,
    /// Languages the server ships catalogs for.
    pub languages: Vec<String>,
    /// Language assumed when no cookie is set.
    pub default_language: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            search_trigger_id: "search".to_owned(),
            search_input_id: "key".to_owned(),
            go_top_id: "gotop".to_owned(),
            input_group_class: "input-group".to_owned(),
            error_class: "has-error".to_owned(),
            search_path_prefix: "/search/".to_owned(),
            go_top_threshold: 100.0,
            go_top_duration_ms: 800,
            go_top_reentry: GoTopReentry::Restart,
            go_top_display: "block".to_owned(),
            language_cookie: "lang".to_owned(),
            cookie_path: "/".to_owned(),
            cookie_expire_days: 9_999_999,
            languages: ["en-US", "zh-CN", "ja-JP", "zh-TW", "ko-KR"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            default_language: "en-US".to_owned(),
        }
    }
}

impl PageConfig {
    /// Decode a (possibly partial) JSON override. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        serde_json::from_str(json).map_err(|e| PageError::Config(e.to_string()))
    }

    /// Go-to-top animation length as a [`Duration`].
    #[must_use]
    pub const fn go_top_duration(&self) -> Duration {
        Duration::from_millis(self.go_top_duration_ms)
    }

    /// Whether `lang` is one of the configured languages.
    #[must_use]
    pub fn is_supported_language(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }
}
