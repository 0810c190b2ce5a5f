//! Field accessors for response records
//!
//! Response entries such as dimensions carry an open-ended set of fields. They are
//! exposed through [`Fields::get`], which answers [`FieldValue::NotAvailable`] for
//! names the service did not send instead of failing.

use std::fmt;

use crate::xml::XmlElement;

const NOT_AVAILABLE: &str = "N/A";
const DIMENSION_VALUE: &str = "dimensionvalue";

/// Result of a field lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Available(&'a str),
    NotAvailable,
}

impl<'a> FieldValue<'a> {
    pub fn is_available(&self) -> bool {
        matches!(self, FieldValue::Available(_))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Available(value) => Some(value),
            FieldValue::NotAvailable => None,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(NOT_AVAILABLE))
    }
}

/// Field name to value, names compared case-insensitively
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Later entries replace earlier ones with the same (lower-cased) name
    pub fn insert<K: AsRef<str>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.as_ref().to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// # Example
    ///
    /// ```
    /// use endeca_client_rs::{FieldValue, Fields};
    ///
    /// let fields: Fields = [("DimensionName", "Color")].into_iter().collect();
    ///
    /// assert_eq!(fields.get("dimensionname"), FieldValue::Available("Color"));
    /// assert_eq!(fields.get("missing").to_string(), "N/A");
    /// ```
    pub fn get(&self, name: &str) -> FieldValue<'_> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map_or(FieldValue::NotAvailable, |(_, value)| {
                FieldValue::Available(value)
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_available()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes and leaf children of `element`, in document order
    pub fn from_element(element: &XmlElement) -> Self {
        let mut fields = Self::default();
        for (name, value) in element.attributes() {
            fields.insert(name, value.as_str());
        }
        for child in element.children().filter(|child| child.is_leaf()) {
            fields.insert(child.name(), child.text());
        }
        fields
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::default();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// A navigation dimension from a search response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimension {
    fields: Fields,
    dimension_values: Vec<Fields>,
}

impl Dimension {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            dimension_values: Vec::new(),
        }
    }

    /// Build from a dimension element
    ///
    /// Leaf children and attributes become fields; `DimensionValue` children,
    /// either direct or inside one wrapper element, become dimension values.
    pub fn from_element(element: &XmlElement) -> Self {
        let mut dimension = Self::new(Fields::default());

        for (name, value) in element.attributes() {
            dimension.fields.insert(name, value.as_str());
        }
        for child in element.children() {
            if child.name().eq_ignore_ascii_case(DIMENSION_VALUE) {
                dimension.dimension_values.push(Fields::from_element(child));
            } else if child.is_leaf() {
                dimension.fields.insert(child.name(), child.text());
            } else {
                dimension.dimension_values.extend(
                    child
                        .children()
                        .filter(|value| value.name().eq_ignore_ascii_case(DIMENSION_VALUE))
                        .map(Fields::from_element),
                );
            }
        }

        dimension
    }

    pub fn get(&self, name: &str) -> FieldValue<'_> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn dimension_values(&self) -> &[Fields] {
        &self.dimension_values
    }
}
