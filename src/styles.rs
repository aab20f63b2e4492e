//! Inline style properties pushed onto retained nodes.

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;

/// The `background-image` style property.
pub const BACKGROUND_IMAGE: &str = "background-image";
/// The `left` style property.
pub const LEFT: &str = "left";

/// A collection of inline style properties, keyed by property name.
///
/// Properties keep their insertion order. Cloning is cheap: the underlying
/// map is only copied when a shared collection is modified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Styles(Arc<IndexMap<Cow<'static, str>, String>>);

impl Styles {
    /// Returns an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a collection with the capacity to hold up to `capacity` elements
    /// without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Arc::new(IndexMap::with_capacity(capacity)))
    }

    /// Sets `property` to `value`.
    pub fn insert(&mut self, property: impl Into<Cow<'static, str>>, value: impl Into<String>) {
        Arc::make_mut(&mut self.0).insert(property.into(), value.into());
    }

    /// Sets `property` to `value` and returns self.
    #[must_use]
    pub fn with(mut self, property: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.insert(property, value);
        self
    }

    /// Returns the value of `property`, if set.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    /// Returns a copy of this collection with every property in `other`
    /// applied on top.
    #[must_use]
    pub fn merged_with(&self, other: &Styles) -> Styles {
        let mut merged = self.clone();
        for (property, value) in other.iter() {
            merged.insert(property.to_string(), value);
        }
        merged
    }

    /// Returns an iterator over the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(property, value)| (property.as_ref(), value.as_str()))
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no properties are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[test]
fn merging_overrides_properties() {
    let base = Styles::new().with(LEFT, "0%").with("opacity", "1");
    let merged = base.merged_with(&Styles::new().with(LEFT, "50%"));
    assert_eq!(merged.get(LEFT), Some("50%"));
    assert_eq!(merged.get("opacity"), Some("1"));
    assert_eq!(base.get(LEFT), Some("0%"));
    assert_eq!(merged.len(), 2);
}

#[test]
fn styles_macro() {
    let styles = crate::styles!(BACKGROUND_IMAGE => "none", LEFT => String::from("10%"));
    assert_eq!(styles.get(BACKGROUND_IMAGE), Some("none"));
    assert_eq!(
        styles.iter().collect::<Vec<_>>(),
        [(BACKGROUND_IMAGE, "none"), (LEFT, "10%")]
    );
    assert!(crate::styles!().is_empty());
}
