#![forbid(unsafe_code)]

//! In-memory implementations of the host collaborators.
//!
//! These back native tests and any host that wants to drive the controller
//! without a browser. Every side effect is captured so callers can assert on
//! it afterwards.

use std::collections::{BTreeMap, BTreeSet};

use crate::PageError;
use crate::cookie::Cookie;
use crate::host::{CookieStore, Location, PageDom};

/// A fake page: input values, element visibility, group classes and scroll.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    inputs: BTreeMap<String, String>,
    visible: BTreeMap<String, bool>,
    group_classes: BTreeMap<String, BTreeSet<String>>,
    scroll_top: f64,
    /// Every offset written through `set_scroll_top`, in order.
    pub scroll_writes: Vec<f64>,
}

impl MemoryDom {
    /// A page with the stock `#key`, `#gotop` and `.input-group` elements.
    #[must_use]
    pub fn standard() -> Self {
        let mut dom = Self::default();
        dom.set_input("key", "");
        dom.visible.insert("gotop".to_owned(), true);
        dom.group_classes
            .insert("input-group".to_owned(), BTreeSet::new());
        dom
    }

    pub fn set_input(&mut self, id: &str, value: &str) {
        self.inputs.insert(id.to_owned(), value.to_owned());
    }

    /// Simulate the user scrolling without going through the controller.
    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll_top = offset;
    }

    /// Visibility of `id`, or `None` if the element does not exist.
    #[must_use]
    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.visible.get(id).copied()
    }

    #[must_use]
    pub fn group_has_class(&self, group_class: &str, class: &str) -> bool {
        self.group_classes
            .get(group_class)
            .is_some_and(|classes| classes.contains(class))
    }

    #[must_use]
    pub fn group_classes(&self, group_class: &str) -> Vec<String> {
        self.group_classes
            .get(group_class)
            .map(|classes| classes.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl PageDom for MemoryDom {
    fn input_value(&self, id: &str) -> Result<String, PageError> {
        self.inputs
            .get(id)
            .cloned()
            .ok_or_else(|| PageError::MissingElement(format!("#{id}")))
    }

    fn add_class(&mut self, group_class: &str, class: &str) -> Result<(), PageError> {
        let classes = self
            .group_classes
            .get_mut(group_class)
            .ok_or_else(|| PageError::MissingElement(format!(".{group_class}")))?;
        classes.insert(class.to_owned());
        Ok(())
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), PageError> {
        let slot = self
            .visible
            .get_mut(id)
            .ok_or_else(|| PageError::MissingElement(format!("#{id}")))?;
        *slot = visible;
        Ok(())
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, offset: f64) {
        self.scroll_top = offset.max(0.0);
        self.scroll_writes.push(self.scroll_top);
    }
}

/// A cookie jar keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: BTreeMap<String, Cookie>,
    reject_writes: bool,
}

impl MemoryCookieJar {
    /// A jar that refuses every write, like a browser with cookies disabled.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }
}

impl CookieStore for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).map(|cookie| cookie.value.clone())
    }

    fn set(&mut self, cookie: &Cookie) -> Result<(), PageError> {
        if self.reject_writes {
            return Err(PageError::CookieRejected(cookie.name.clone()));
        }
        self.cookies.insert(cookie.name.clone(), cookie.clone());
        Ok(())
    }
}

/// One navigation performed through [`MemoryLocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Assign(String),
    Reload,
}

/// Records navigations instead of performing them.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    pub history: Vec<Navigation>,
}

impl MemoryLocation {
    #[must_use]
    pub fn last(&self) -> Option<&Navigation> {
        self.history.last()
    }

    #[must_use]
    pub fn reloads(&self) -> usize {
        self.history
            .iter()
            .filter(|nav| matches!(nav, Navigation::Reload))
            .count()
    }
}

impl Location for MemoryLocation {
    fn assign(&mut self, url: &str) -> Result<(), PageError> {
        self.history.push(Navigation::Assign(url.to_owned()));
        Ok(())
    }

    fn reload(&mut self) -> Result<(), PageError> {
        self.history.push(Navigation::Reload);
        Ok(())
    }
}
