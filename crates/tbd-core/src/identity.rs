//! Element addresses and the provider that hands them out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a concrete element on the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementAddress(String);

impl ElementAddress {
    /// Wrap a fixed host address (e.g. the `output` region).
    pub fn fixed(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues unique element addresses for the lifetime of a running session.
///
/// Addresses look like `troubadour__button__17`; the counter is shared by all
/// categories so two addresses never collide, whatever their category.
#[derive(Debug, Clone)]
pub struct IdProvider {
    namespace: String,
    next_id: u64,
}

impl IdProvider {
    /// Create a provider whose addresses start with `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            next_id: 0,
        }
    }

    /// Return a fresh address in the given category (may be empty).
    pub fn next(&mut self, category: &str) -> ElementAddress {
        let id = self.next_id;
        self.next_id += 1;
        if category.is_empty() {
            ElementAddress(format!("{}__{id}", self.namespace))
        } else {
            ElementAddress(format!("{}__{category}__{id}", self.namespace))
        }
    }

    /// Number of addresses issued so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_namespaced() {
        let mut ids = IdProvider::new("ns");
        assert_eq!(ids.next("button").as_str(), "ns__button__0");
        assert_eq!(ids.next("").as_str(), "ns__1");
        assert_eq!(ids.next("container").as_str(), "ns__container__2");
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn addresses_never_repeat() {
        let mut ids = IdProvider::new("troubadour");
        let mut seen = std::collections::HashSet::new();
        for i in 0..500 {
            let category = if i % 2 == 0 { "button" } else { "textinput" };
            assert!(seen.insert(ids.next(category)));
        }
    }

    #[test]
    fn fixed_address_display() {
        let addr = ElementAddress::fixed("output");
        assert_eq!(addr.to_string(), "output");
    }
}
