#![forbid(unsafe_code)]

//! Search key validation and search route construction.

use core::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left unescaped by `encodeURIComponent`: alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A search key that is known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey(String);

impl SearchKey {
    /// Accept `raw` unless it is the empty string.
    ///
    /// Whitespace-only keys are accepted; only `""` is rejected.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        (!raw.is_empty()).then_some(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort orders understood by the `/search/<key>/<sort>` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    Hot,
    PutTime,
    Length,
    Views,
    FileCount,
    CreateTime,
}

impl SearchSort {
    pub const ALL: [Self; 6] = [
        Self::Hot,
        Self::PutTime,
        Self::Length,
        Self::Views,
        Self::FileCount,
        Self::CreateTime,
    ];

    #[must_use]
    pub const fn as_path_segment(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::PutTime => "puttime",
            Self::Length => "length",
            Self::Views => "views",
            Self::FileCount => "filecount",
            Self::CreateTime => "createtime",
        }
    }

    #[must_use]
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_path_segment() == segment)
    }
}

/// Percent-encode a key the way `encodeURIComponent` does.
#[must_use]
pub fn encode_search_key(key: &str) -> String {
    utf8_percent_encode(key, URI_COMPONENT).to_string()
}

/// `<prefix><encoded key>`, e.g. `/search/a%20b`.
#[must_use]
pub fn search_url(prefix: &str, key: &SearchKey) -> String {
    format!("{prefix}{}", encode_search_key(key.as_str()))
}

/// `<prefix><encoded key>/<sort>`, the sorted results route.
#[must_use]
pub fn search_url_sorted(prefix: &str, key: &SearchKey, sort: SearchSort) -> String {
    format!("{}/{}", search_url(prefix, key), sort.as_path_segment())
}
