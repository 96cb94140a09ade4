#![forbid(unsafe_code)]

//! Page events pushed by the host, and a JSON decoder for them.
//!
//! Hosts that forward DOM events as JSON strings (for example a replay
//! harness) use [`parse_page_event`]. The expected shape is a flat object
//! with a `kind` discriminator:
//!
//! ```json
//! {"kind":"key","key":"Enter","code":"NumpadEnter","key_code":13,"is_composing":false}
//! {"kind":"search_click"}
//! {"kind":"scroll"}
//! {"kind":"go_top_click","now_ms":1200}
//! {"kind":"frame","now_ms":1216}
//! {"kind":"change_language","lang":"zh-CN"}
//! ```

use core::time::Duration;

use serde::Deserialize;

use crate::PageError;

/// Legacy `KeyboardEvent.keyCode` for Enter.
pub const ENTER_KEY_CODE: u32 = 13;

/// A keyboard event as seen on `document`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// `KeyboardEvent.key`.
    pub key: String,
    /// `KeyboardEvent.code`.
    pub code: String,
    /// `KeyboardEvent.keyCode`, when the host still reports it.
    pub key_code: Option<u32>,
    /// `KeyboardEvent.isComposing`: the key belongs to an IME composition.
    pub is_composing: bool,
}

impl KeyInput {
    #[must_use]
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            key_code: None,
            is_composing: false,
        }
    }

    /// Whether this is an Enter press that should submit, main or numpad.
    ///
    /// Decided on the produced key, never the physical `code`: an Enter that
    /// commits an IME composition arrives as `key: "Process"`, `code: "Enter"`,
    /// `keyCode: 229` and must not submit.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        if self.is_composing {
            return false;
        }
        self.key == "Enter" || self.key_code == Some(ENTER_KEY_CODE)
    }
}

/// Every event the page controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    KeyDown(KeyInput),
    SearchClick,
    Scroll,
    /// Go-to-top click at host monotonic time `now`.
    GoTopClick { now: Duration },
    /// Animation frame at host monotonic time `now`.
    Frame { now: Duration },
    ChangeLanguage { lang: String },
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    kind: String,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    key_code: Option<u32>,
    #[serde(default)]
    is_composing: bool,
    #[serde(default)]
    now_ms: Option<f64>,
    #[serde(default)]
    lang: Option<String>,
}

fn parse_now(raw: &RawEvent) -> Result<Duration, PageError> {
    let ms = raw
        .now_ms
        .ok_or_else(|| PageError::EventDecode("missing now_ms".into()))?;
    if !ms.is_finite() || ms < 0.0 {
        return Err(PageError::EventDecode(format!("invalid now_ms: {ms}")));
    }
    Ok(Duration::from_nanos((ms * 1_000_000.0).round() as u64))
}

/// Decode one JSON-encoded page event.
///
/// Returns `Ok(None)` for kinds the controller does not handle, and `Err` for
/// malformed JSON or missing required fields.
pub fn parse_page_event(json: &str) -> Result<Option<PageEvent>, PageError> {
    let raw: RawEvent =
        serde_json::from_str(json).map_err(|e| PageError::EventDecode(e.to_string()))?;

    let event = match raw.kind.as_str() {
        "key" => {
            if raw.key.is_none() && raw.code.is_none() && raw.key_code.is_none() {
                return Err(PageError::EventDecode("key event without key/code".into()));
            }
            PageEvent::KeyDown(KeyInput {
                key: raw.key.unwrap_or_default(),
                code: raw.code.unwrap_or_default(),
                key_code: raw.key_code,
                is_composing: raw.is_composing,
            })
        }
        "search_click" => PageEvent::SearchClick,
        "scroll" => PageEvent::Scroll,
        "go_top_click" => PageEvent::GoTopClick {
            now: parse_now(&raw)?,
        },
        "frame" => PageEvent::Frame {
            now: parse_now(&raw)?,
        },
        "change_language" => PageEvent::ChangeLanguage {
            lang: raw
                .lang
                .ok_or_else(|| PageError::EventDecode("missing lang".into()))?,
        },
        _ => return Ok(None),
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enter_variants() {
        assert!(KeyInput::new("Enter", "Enter").is_enter());
        assert!(KeyInput::new("Enter", "NumpadEnter").is_enter());
        let legacy = KeyInput {
            key_code: Some(13),
            ..KeyInput::default()
        };
        assert!(legacy.is_enter());
    }

    #[test]
    fn other_keys_are_not_enter() {
        assert!(!KeyInput::new("a", "KeyA").is_enter());
        assert!(!KeyInput::new("Tab", "Tab").is_enter());
        assert!(!KeyInput::default().is_enter());
    }

    #[test]
    fn physical_enter_code_alone_is_not_enter() {
        assert!(!KeyInput::new("", "Enter").is_enter());
        assert!(!KeyInput::new("", "NumpadEnter").is_enter());
    }

    #[test]
    fn ime_commit_enter_is_not_enter() {
        let commit = KeyInput {
            key: "Process".into(),
            code: "Enter".into(),
            key_code: Some(229),
            is_composing: false,
        };
        assert!(!commit.is_enter());
    }

    #[test]
    fn composing_enter_is_not_enter() {
        let composing = KeyInput {
            is_composing: true,
            ..KeyInput::new("Enter", "Enter")
        };
        assert!(!composing.is_enter());
    }

    #[test]
    fn composing_flag_decodes() {
        let event = parse_page_event(
            r#"{"kind":"key","key":"Enter","code":"Enter","is_composing":true}"#,
        )
        .expect("should parse");
        let Some(PageEvent::KeyDown(key)) = event else {
            panic!("expected key event, got {event:?}");
        };
        assert!(key.is_composing);
        assert!(!key.is_enter());
    }

    #[test]
    fn key_event() {
        let event = parse_page_event(r#"{"kind":"key","key":"Enter","code":"Enter"}"#)
            .expect("should parse");
        assert_eq!(event, Some(PageEvent::KeyDown(KeyInput::new("Enter", "Enter"))));
    }

    #[test]
    fn key_event_with_only_key_code() {
        let event = parse_page_event(r#"{"kind":"key","key_code":13}"#).expect("should parse");
        let Some(PageEvent::KeyDown(key)) = event else {
            panic!("expected key event, got {event:?}");
        };
        assert!(key.is_enter());
    }

    #[test]
    fn unit_events() {
        assert_eq!(
            parse_page_event(r#"{"kind":"search_click"}"#).unwrap(),
            Some(PageEvent::SearchClick)
        );
        assert_eq!(
            parse_page_event(r#"{"kind":"scroll"}"#).unwrap(),
            Some(PageEvent::Scroll)
        );
    }

    #[test]
    fn timed_events() {
        assert_eq!(
            parse_page_event(r#"{"kind":"go_top_click","now_ms":1200}"#).unwrap(),
            Some(PageEvent::GoTopClick {
                now: Duration::from_millis(1200)
            })
        );
        assert_eq!(
            parse_page_event(r#"{"kind":"frame","now_ms":16.5}"#).unwrap(),
            Some(PageEvent::Frame {
                now: Duration::from_micros(16_500)
            })
        );
    }

    #[test]
    fn change_language_event() {
        assert_eq!(
            parse_page_event(r#"{"kind":"change_language","lang":"ko-KR"}"#).unwrap(),
            Some(PageEvent::ChangeLanguage {
                lang: "ko-KR".into()
            })
        );
    }

    #[test]
    fn unknown_kind_returns_none() {
        assert_eq!(parse_page_event(r#"{"kind":"resize"}"#).unwrap(), None);
    }

    #[test]
    fn malformed_json_returns_error() {
        assert!(matches!(
            parse_page_event("{"),
            Err(PageError::EventDecode(_))
        ));
    }

    #[test]
    fn missing_fields_return_error() {
        assert!(parse_page_event(r#"{"key":"Enter"}"#).is_err());
        assert!(parse_page_event(r#"{"kind":"key"}"#).is_err());
        assert!(parse_page_event(r#"{"kind":"frame"}"#).is_err());
        assert!(parse_page_event(r#"{"kind":"go_top_click","now_ms":-1}"#).is_err());
        assert!(parse_page_event(r#"{"kind":"change_language"}"#).is_err());
    }
}
