// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property model shared by vCard and iCalendar objects.
//!
//! A [`Property`] is one logical content line: a name, an optional group id, an ordered
//! parameter multimap and a decoded value. A [`PropertyList`] keeps properties in wire
//! order and offers name-based and group-based lookup.

use std::fmt;

/// Decoded value of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Plain text with escapes resolved
    Text(String),

    /// Fields of a `;`-separated structured value such as `ADR` or `N`
    Structured(Vec<String>),

    /// Items of a `,`-separated list value such as `CATEGORIES`
    List(Vec<String>),

    /// Raw bytes of a base64 payload without a charset
    Binary(Vec<u8>),
}

impl PropertyValue {
    /// The text of a plain value, `None` for structured, list and binary values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The parts of the value: one part for text, each field or item otherwise.
    #[must_use]
    pub fn parts(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Structured(parts) | Self::List(parts) => parts.iter().map(String::as_str).collect(),
            Self::Binary(_) => Vec::new(),
        }
    }

    /// The part at `index`, empty when missing.
    #[must_use]
    pub fn part(&self, index: usize) -> &str {
        match self {
            Self::Text(text) if index == 0 => text,
            Self::Structured(parts) | Self::List(parts) => {
                parts.get(index).map_or("", String::as_str)
            }
            _ => "",
        }
    }

    /// Whether the value carries no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Structured(parts) | Self::List(parts) => {
                parts.iter().all(|p| p.trim().is_empty())
            }
            Self::Binary(bytes) => bytes.is_empty(),
        }
    }
}

impl Default for PropertyValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(parts) => f.write_str(&parts.join(";")),
            Self::List(parts) => f.write_str(&parts.join(",")),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// Ordered parameter multimap; names are stored upper-cased, values verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(String, String)>);

impl Parameters {
    /// Create an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping any existing ones of the same name.
    pub fn push(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0.push((name.as_ref().to_ascii_uppercase(), value.into()));
    }

    /// Replace all parameters of this name by a single one.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.remove(name.as_ref());
        self.push(name, value);
    }

    /// Remove all parameters of this name, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before - self.0.len()
    }

    /// First value of the named parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values of the named parameter in order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.0
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the named parameter has this value, compared case-insensitively.
    #[must_use]
    pub fn has_value(&self, name: &str, value: &str) -> bool {
        self.get_all(name).any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Iterate over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// One logical content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    /// Group id linking this property to its companions, e.g. `item1`
    pub group: Option<String>,
    /// Parameters in wire order
    pub parameters: Parameters,
    /// Decoded value
    pub value: PropertyValue,
}

impl Property {
    /// Create a property; the name is normalized to upper case.
    pub fn new(name: impl AsRef<str>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.as_ref().to_ascii_uppercase(),
            group: None,
            parameters: Parameters::new(),
            value: value.into(),
        }
    }

    /// Set the group id.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Append a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.parameters.push(name, value);
        self
    }

    /// Canonical (upper-case) property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the property has this name, compared case-insensitively.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether the property belongs to this group.
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.group
            .as_deref()
            .is_some_and(|g| g.eq_ignore_ascii_case(group))
    }

    /// The value as plain text, if it is a text value.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.value.as_text()
    }
}

/// Properties of one component in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyList(Vec<Property>);

impl PropertyList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property.
    pub fn push(&mut self, property: Property) {
        self.0.push(property);
    }

    /// First property with this name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.is(name))
    }

    /// All properties with this name.
    pub fn find_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Property> {
        self.0.iter().filter(move |p| p.is(name))
    }

    /// First property matching the predicate, for extended names such as `X-*-LABEL`.
    pub fn find_by(&self, mut predicate: impl FnMut(&Property) -> bool) -> Option<&Property> {
        self.0.iter().find(|p| predicate(p))
    }

    /// All properties in the group, in wire order.
    #[must_use]
    pub fn find_all_by_group(&self, group: &str) -> Vec<&Property> {
        self.0.iter().filter(|p| p.in_group(group)).collect()
    }

    /// First property with this name in the group.
    #[must_use]
    pub fn find_in_group(&self, group: &str, name: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.in_group(group) && p.is(name))
    }

    /// Replace the value of the first property with this name, or append a new one.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) {
        match self.0.iter_mut().find(|p| p.is(name)) {
            Some(existing) => existing.value = value.into(),
            None => self.0.push(Property::new(name, value)),
        }
    }

    /// Remove the first property equal to `property`, returning whether one was found.
    pub fn remove(&mut self, property: &Property) -> bool {
        match self.0.iter().position(|p| p == property) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove all properties with this name, returning how many were removed.
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|p| !p.is(name));
        before - self.0.len()
    }

    /// Keep only the properties matching the predicate.
    pub fn retain(&mut self, predicate: impl FnMut(&Property) -> bool) {
        self.0.retain(predicate);
    }

    /// Group ids in use, in order of first appearance.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for group in self.0.iter().filter_map(|p| p.group.as_deref()) {
            if !groups.iter().any(|g| g.eq_ignore_ascii_case(group)) {
                groups.push(group);
            }
        }
        groups
    }

    /// Iterate in wire order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.0.iter()
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for PropertyList {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyList {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Property> for PropertyList {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Property> for PropertyList {
    fn extend<I: IntoIterator<Item = Property>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PropertyList {
        [
            Property::new("fn", "Jane Doe"),
            Property::new("EMAIL", "jane@example.com").with_group("item1"),
            Property::new("X-ABLabel", "MyLabel").with_group("item1"),
            Property::new("TEL", "+1 555").with_parameter("type", "CELL"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn names_are_case_insensitive_and_canonical() {
        let list = sample();
        let fn_prop = list.find("Fn").unwrap();
        assert_eq!(fn_prop.name(), "FN");
        assert_eq!(fn_prop.text(), Some("Jane Doe"));
        assert_eq!(list.find("x-ablabel").unwrap().name(), "X-ABLABEL");
    }

    #[test]
    fn finds_properties_by_group() {
        let list = sample();
        let grouped = list.find_all_by_group("ITEM1");
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].name(), "EMAIL");
        assert_eq!(
            list.find_in_group("item1", "X-ABLABEL").unwrap().text(),
            Some("MyLabel")
        );
        assert_eq!(list.groups(), vec!["item1"]);
    }

    #[test]
    fn finds_by_predicate() {
        let list = sample();
        let label = list.find_by(|p| p.name().ends_with("LABEL")).unwrap();
        assert_eq!(label.text(), Some("MyLabel"));
    }

    #[test]
    fn set_replaces_first_in_place_or_appends() {
        let mut list = sample();
        list.set("email", "john@example.com");
        let names: Vec<_> = list.iter().map(Property::name).collect();
        assert_eq!(names, ["FN", "EMAIL", "X-ABLABEL", "TEL"]);
        assert_eq!(list.find("EMAIL").unwrap().text(), Some("john@example.com"));
        assert_eq!(list.find("EMAIL").unwrap().group.as_deref(), Some("item1"));

        list.set("NOTE", "hello");
        assert_eq!(list.iter().last().unwrap().name(), "NOTE");
    }

    #[test]
    fn remove_keeps_order_of_others() {
        let mut list = sample();
        let label = list.find("X-ABLABEL").unwrap().clone();
        assert!(list.remove(&label));
        assert!(!list.remove(&label));
        let names: Vec<_> = list.iter().map(Property::name).collect();
        assert_eq!(names, ["FN", "EMAIL", "TEL"]);
    }

    #[test]
    fn parameters_keep_order_and_duplicates() {
        let mut params = Parameters::new();
        params.push("type", "HOME");
        params.push("TYPE", "VOICE");
        params.push("pref", "1");
        assert_eq!(params.get_all("Type").collect::<Vec<_>>(), ["HOME", "VOICE"]);
        assert!(params.has_value("TYPE", "voice"));
        params.set("TYPE", "WORK");
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            [("PREF", "1"), ("TYPE", "WORK")]
        );
        assert_eq!(params.remove("type"), 1);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn structured_value_parts() {
        let value = PropertyValue::Structured(vec![String::new(), String::new(), "Main St".into()]);
        assert_eq!(value.part(2), "Main St");
        assert_eq!(value.part(7), "");
        assert!(!value.is_empty());
        assert!(PropertyValue::Structured(vec![String::new(); 7]).is_empty());
    }
}
