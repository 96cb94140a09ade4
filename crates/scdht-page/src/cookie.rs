#![forbid(unsafe_code)]

//! Language cookie model and `document.cookie` wire format.
//!
//! Cookies are written as `name=value; path=/; expires=<GMT date>` and read
//! back from the `a=b; c=d` header form the browser exposes.

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc, Weekday};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One cookie as written by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires: DateTime<Utc>,
}

impl Cookie {
    /// Build a cookie that expires `days` after `now`.
    ///
    /// Expiries past chrono's representable range clamp to the maximum date.
    #[must_use]
    pub fn expiring_in_days(
        name: impl Into<String>,
        value: impl Into<String>,
        path: impl Into<String>,
        now: DateTime<Utc>,
        days: i64,
    ) -> Self {
        let expires = TimeDelta::try_days(days)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            name: name.into(),
            value: value.into(),
            path: path.into(),
            expires,
        }
    }

    /// Serialize for assignment to `document.cookie`.
    #[must_use]
    pub fn to_cookie_string(&self) -> String {
        format!(
            "{}={}; path={}; expires={}",
            self.name,
            self.value,
            self.path,
            gmt_string(self.expires)
        )
    }
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Format like `Date.prototype.toUTCString`: `Thu, 01 Jan 1970 00:00:00 GMT`.
///
/// Years past 9999 are written without a sign, as browsers do.
#[must_use]
pub fn gmt_string(at: DateTime<Utc>) -> String {
    format!(
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
        weekday_abbrev(at.weekday()),
        at.day(),
        MONTHS[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Look up `name` in a `document.cookie` style header (`a=b; c=d`).
///
/// The first matching pair wins. Pairs without `=` are skipped.
#[must_use]
pub fn parse_cookie_header(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn gmt_string_at_epoch() {
        assert_eq!(gmt_string(epoch()), "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn gmt_string_pads_fields() {
        let at = DateTime::from_timestamp(1_709_254_205, 0).expect("valid timestamp");
        assert_eq!(gmt_string(at), "Fri, 01 Mar 2024 00:50:05 GMT");
    }

    #[test]
    fn far_future_year_has_no_sign() {
        let cookie = Cookie::expiring_in_days("lang", "fr", "/", epoch(), 9_999_999);
        let text = gmt_string(cookie.expires);
        assert!(!text.contains('+'), "unexpected sign in {text}");
        assert!(cookie.expires.year() > 27_000);
    }

    #[test]
    fn cookie_string_format() {
        let cookie = Cookie::expiring_in_days("lang", "zh-CN", "/", epoch(), 1);
        assert_eq!(
            cookie.to_cookie_string(),
            "lang=zh-CN; path=/; expires=Fri, 02 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn overflowing_expiry_clamps() {
        let cookie = Cookie::expiring_in_days("lang", "fr", "/", epoch(), i64::MAX);
        assert_eq!(cookie.expires, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn header_lookup() {
        let header = "theme=dark; lang=ja-JP;  session=abc";
        assert_eq!(parse_cookie_header(header, "lang").as_deref(), Some("ja-JP"));
        assert_eq!(parse_cookie_header(header, "session").as_deref(), Some("abc"));
        assert_eq!(parse_cookie_header(header, "missing"), None);
    }

    #[test]
    fn header_lookup_skips_malformed_pairs() {
        assert_eq!(
            parse_cookie_header("garbage; lang=en-US", "lang").as_deref(),
            Some("en-US")
        );
        assert_eq!(parse_cookie_header("", "lang"), None);
    }

    #[test]
    fn header_lookup_does_not_match_prefix() {
        assert_eq!(parse_cookie_header("language=x", "lang"), None);
    }
}
