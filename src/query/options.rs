//! Option normalization
//!
//! Merges the options of a single query over the client's default query options
//! and canonicalizes keys, producing the [`QueryOptions`] the document builder
//! serializes. Normalization never fails: malformed input degrades to empty or
//! defaulted values.

use serde_json::{Map, Value};

use super::keys::{normalize_map, underscore};

const FLAGS: &str = "flags";
const SEARCHES: &str = "searches";
const DIMENSIONS: &str = "dimensions";
const CATEGORY: &str = "category";
const SORTS: &str = "sorts";
const PAGING: &str = "paging";
const ADVANCED: &str = "advanced";

const PAGE: &str = "page";
const PER_PAGE: &str = "per_page";
const OFFSET: &str = "offset";

/// Normalized options of a single query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Flag name (underscored) to value
    pub flags: Map<String, Value>,
    /// Search field key to search term, in insertion order
    pub searches: Map<String, Value>,
    /// Selected dimension value ids, defaults first
    pub dimensions: Vec<Value>,
    pub category: Option<Value>,
    /// Sort field key to direction, in insertion order
    pub sorts: Map<String, Value>,
    /// `page`, `per_page` and the derived `offset`
    pub paging: Map<String, Value>,
    /// Advanced parameters (underscored keys)
    pub advanced: Map<String, Value>,
}

impl QueryOptions {
    /// Merge `options` over `defaults`
    ///
    /// Both arguments are option trees of the same shape; anything that is not a
    /// mapping is treated as empty.
    ///
    /// # Example
    ///
    /// ```
    /// use endeca_client_rs::QueryOptions;
    /// use serde_json::json;
    ///
    /// let options = QueryOptions::normalize(
    ///     &json!({ "flags": { "a": 1 }, "dimensions": [1, 2] }),
    ///     &json!({ "flags": { "b": 2 }, "dimensions": 3, "paging": { "page": 2, "perPage": 10 } }),
    /// );
    ///
    /// assert_eq!(options.flags.len(), 2);
    /// assert_eq!(options.dimensions, vec![json!(1), json!(2), json!(3)]);
    /// assert_eq!(options.offset(), Some(&json!(20)));
    /// ```
    pub fn normalize(defaults: &Value, options: &Value) -> Self {
        let defaults = categories(defaults);
        let options = categories(options);

        let mut paging = merge_mapping(&defaults, &options, PAGING, true);
        derive_offset(&mut paging);

        Self {
            flags: merge_mapping(&defaults, &options, FLAGS, true),
            searches: merge_mapping(&defaults, &options, SEARCHES, false),
            dimensions: merge_dimensions(&defaults, &options),
            category: merge_category(&defaults, &options),
            sorts: merge_mapping(&defaults, &options, SORTS, false),
            paging,
            advanced: merge_mapping(&defaults, &options, ADVANCED, true),
        }
    }

    /// Normalize a single option tree without defaults
    pub fn from_value(options: &Value) -> Self {
        Self::normalize(&Value::Null, options)
    }

    /// Render back into an option tree; empty categories are left out
    pub fn to_value(&self) -> Value {
        let mut tree = Map::new();

        let mappings = [
            (FLAGS, &self.flags),
            (SEARCHES, &self.searches),
            (SORTS, &self.sorts),
            (PAGING, &self.paging),
            (ADVANCED, &self.advanced),
        ];
        for (name, map) in mappings {
            if !map.is_empty() {
                tree.insert(name.to_string(), Value::Object(map.clone()));
            }
        }
        if !self.dimensions.is_empty() {
            tree.insert(DIMENSIONS.to_string(), Value::Array(self.dimensions.clone()));
        }
        if let Some(category) = &self.category {
            tree.insert(CATEGORY.to_string(), category.clone());
        }

        Value::Object(tree)
    }

    pub fn offset(&self) -> Option<&Value> {
        self.paging.get(OFFSET)
    }

    pub fn per_page(&self) -> Option<&Value> {
        self.paging.get(PER_PAGE)
    }
}

/// Top-level categories keyed by their canonical name
fn categories(tree: &Value) -> Map<String, Value> {
    let Value::Object(map) = tree else {
        return Map::new();
    };

    let mut categories = Map::new();
    for (key, value) in map {
        let name = match underscore(key).as_str() {
            "advanced_parameters" => ADVANCED.to_string(),
            name => name.to_string(),
        };
        categories.insert(name, value.clone());
    }
    categories
}

fn as_mapping(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Caller keys win; the caller map is only consulted when it is present
fn merge_mapping(
    defaults: &Map<String, Value>,
    options: &Map<String, Value>,
    name: &str,
    underscore_keys: bool,
) -> Map<String, Value> {
    let canonical = |key: &str| {
        if underscore_keys {
            underscore(key)
        } else {
            key.to_string()
        }
    };

    let mut merged = normalize_map(&as_mapping(defaults.get(name)), &canonical);
    if let Some(caller) = options.get(name).filter(|value| is_present(value)) {
        for (key, value) in normalize_map(&as_mapping(Some(caller)), &canonical) {
            merged.insert(key, value);
        }
    }
    merged
}

fn merge_dimensions(defaults: &Map<String, Value>, options: &Map<String, Value>) -> Vec<Value> {
    fn present(tree: &Map<String, Value>) -> Option<&Value> {
        tree.get(DIMENSIONS).filter(|value| is_present(value))
    }

    let mut dimensions = as_sequence(present(defaults));
    dimensions.extend(as_sequence(present(options)));
    dimensions
}

fn merge_category(defaults: &Map<String, Value>, options: &Map<String, Value>) -> Option<Value> {
    options
        .get(CATEGORY)
        .filter(|value| is_present(value))
        .or_else(|| defaults.get(CATEGORY).filter(|value| is_present(value)))
        .cloned()
}

/// A scalar becomes a one-element sequence; null and mappings become empty
fn as_sequence(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(scalar) => vec![scalar.clone()],
    }
}

/// Store `offset = page * per_page` whenever both keys exist, even when it is zero
fn derive_offset(paging: &mut Map<String, Value>) {
    let (Some(page), Some(per_page)) = (paging.get(PAGE), paging.get(PER_PAGE)) else {
        return;
    };

    let offset = match (to_integer(page), to_integer(per_page)) {
        (Some(page), Some(per_page)) => page.checked_mul(per_page).unwrap_or(0),
        _ => 0,
    };
    paging.insert(OFFSET.to_string(), Value::from(offset));
}

/// Integer conversion for paging values
///
/// Strings use their leading integer (`"12abc"` is 12, `"x"` is 0), floats
/// truncate and null is 0. Booleans, arrays and mappings have no integer form.
pub(crate) fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Null => Some(0),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => Some(leading_integer(text)),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// Null, `false`, blank strings and empty collections are not present
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(true) | Value::Number(_) => true,
    }
}
