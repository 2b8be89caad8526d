#![forbid(unsafe_code)]

//! Registration map from modal keys to elements.
//!
//! The map is built once and handed to the manager, which never mutates it.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

/// Name under which an element is registered.
///
/// Cloning is a reference-count bump.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModalKey(Arc<str>);

impl ModalKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModalKey {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for ModalKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&ModalKey> for ModalKey {
    fn from(k: &ModalKey) -> Self {
        k.clone()
    }
}

impl Borrow<str> for ModalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable map of registered modal elements.
#[derive(Debug, Clone)]
pub struct ModalWindows<E> {
    entries: AHashMap<ModalKey, E>,
}

impl<E> Default for ModalWindows<E> {
    fn default() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }
}

impl<E> ModalWindows<E> {
    /// Start building a registration map.
    #[must_use]
    pub fn builder() -> ModalWindowsBuilder<E> {
        ModalWindowsBuilder {
            entries: AHashMap::new(),
        }
    }

    /// Look up the element registered under `key`.
    pub fn get(&self, key: &str) -> Option<&E> {
        self.entries.get(key)
    }

    /// Look up the stored key and element registered under `key`.
    pub fn get_key_value(&self, key: &str) -> Option<(&ModalKey, &E)> {
        self.entries.get_key_value(key)
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &ModalKey> {
        self.entries.keys()
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<ModalKey>, E> FromIterator<(K, E)> for ModalWindows<E> {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, e)| (k.into(), e)).collect(),
        }
    }
}

/// Builder for [`ModalWindows`].
#[derive(Debug)]
pub struct ModalWindowsBuilder<E> {
    entries: AHashMap<ModalKey, E>,
}

impl<E> ModalWindowsBuilder<E> {
    /// Register `element` under `key`. A later registration replaces an
    /// earlier one with the same key.
    #[must_use]
    pub fn register(mut self, key: impl Into<ModalKey>, element: E) -> Self {
        self.entries.insert(key.into(), element);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ModalWindows<E> {
        ModalWindows {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_registers_elements() {
        let windows = ModalWindows::builder()
            .register("confirm", 1u32)
            .register("alert", 2u32)
            .build();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows.get("confirm"), Some(&1));
        assert!(windows.contains("alert"));
        assert!(!windows.contains("missing"));
        assert!(windows.get("missing").is_none());
    }

    #[test]
    fn later_registration_wins() {
        let windows = ModalWindows::builder()
            .register("a", "first")
            .register("a", "second")
            .build();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows.get("a"), Some(&"second"));
    }

    #[test]
    fn from_iterator() {
        let windows: ModalWindows<u8> = [("x", 1u8), ("y", 2u8)].into_iter().collect();
        let mut keys: Vec<_> = windows.keys().map(ModalKey::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn key_conversions() {
        let a = ModalKey::from("dialog");
        let b = ModalKey::from(String::from("dialog"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "dialog");
        assert_eq!(a.as_str(), "dialog");
    }

    #[test]
    fn empty_default() {
        let windows: ModalWindows<()> = ModalWindows::default();
        assert!(windows.is_empty());
    }
}
