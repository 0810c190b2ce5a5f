//! Key casing helpers shared by the option normalizer and the document builder

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Convert a key to its canonical lower-case, underscore-separated form
///
/// `navigationOnly`, `NavigationOnly`, `navigation-only` and `navigation_only`
/// all become `navigation_only`. Acronym runs stay together: `HTMLParser` becomes
/// `html_parser`.
pub fn underscore(key: &str) -> String {
    static ACRONYM_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    static WORD_BOUNDARY: OnceLock<Regex> = OnceLock::new();

    let acronym = ACRONYM_BOUNDARY.get_or_init(|| {
        Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("Failed to compile acronym boundary regex")
    });
    let word = WORD_BOUNDARY.get_or_init(|| {
        Regex::new(r"([a-z\d])([A-Z])").expect("Failed to compile word boundary regex")
    });

    let key = acronym.replace_all(key, "${1}_${2}");
    let key = word.replace_all(&key, "${1}_${2}");
    key.replace('-', "_").to_lowercase()
}

/// Convert an underscored key to an upper camel-case tag name
///
/// `navigation_only` becomes `NavigationOnly`.
pub fn camelize(key: &str) -> String {
    key.split('_').map(capitalize).collect()
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Rewrite every key of a nested mapping with `canonical`
///
/// Recurses through mapping values only; arrays and scalars are leaves. When two
/// keys collapse to the same canonical name the later one wins and keeps the
/// position of the first.
pub fn normalize_keys<F>(value: &Value, canonical: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::Object(map) => Value::Object(normalize_map(map, canonical)),
        other => other.clone(),
    }
}

pub(crate) fn normalize_map<F>(map: &Map<String, Value>, canonical: &F) -> Map<String, Value>
where
    F: Fn(&str) -> String,
{
    map.iter()
        .map(|(key, value)| (canonical(key), normalize_keys(value, canonical)))
        .collect()
}
