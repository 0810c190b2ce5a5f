//! Request document assembly
//!
//! The `Query` document is built from a fixed table of sections. Each section is
//! emitted only when its backing options are present, so no empty containers are
//! written.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;
use tracing::{debug, warn};

use super::keys::{camelize, capitalize};
use super::options::{QueryOptions, is_present};
use crate::error::{EndecaError, Result};

const ROOT: &str = "Query";
const INDENT_SIZE: usize = 2;

type Emit = fn(&QueryOptions, &mut DocumentWriter) -> Result<()>;

struct Section {
    name: &'static str,
    present: fn(&QueryOptions) -> bool,
    emit: Emit,
}

/// Sections in wire order
const SECTIONS: [Section; 7] = [
    Section {
        name: "Flags",
        present: |options| !options.flags.is_empty(),
        emit: flags,
    },
    Section {
        name: "KeywordSearch",
        present: |options| !options.searches.is_empty(),
        emit: keyword_search,
    },
    Section {
        name: "NavigationQuery",
        present: |options| !options.dimensions.is_empty(),
        emit: navigation_query,
    },
    Section {
        name: "CategoryNavigationQuery",
        present: |options| options.category.as_ref().is_some_and(is_present),
        emit: category_navigation_query,
    },
    Section {
        name: "Sorting",
        present: |options| !options.sorts.is_empty(),
        emit: sorting,
    },
    Section {
        name: "Paging",
        present: |options| !options.paging.is_empty(),
        emit: paging,
    },
    Section {
        name: "AdvancedParameters",
        present: |options| !options.advanced.is_empty(),
        emit: advanced_parameters,
    },
];

/// Serialize normalized options into the `Query` request document
///
/// # Example
///
/// ```
/// use endeca_client_rs::QueryOptions;
/// use endeca_client_rs::query::render;
/// use serde_json::json;
///
/// let options = QueryOptions::from_value(&json!({ "category": "42" }));
/// let document = render(&options).unwrap();
///
/// assert_eq!(
///     document,
///     "<Query>\n  <Category>\n    <CategoryId>42</CategoryId>\n  </Category>\n</Query>"
/// );
/// ```
pub fn render(options: &QueryOptions) -> Result<String> {
    let mut writer = DocumentWriter::new();

    writer.container(ROOT, |writer| {
        for section in SECTIONS.iter().filter(|section| (section.present)(options)) {
            debug!(section = section.name, "Writing query section");
            (section.emit)(options, writer)?;
        }
        Ok(())
    })?;

    writer.finish()
}

fn flags(options: &QueryOptions, writer: &mut DocumentWriter) -> Result<()> {
    for (flag, value) in &options.flags {
        let tag = camelize(flag);
        if !is_xml_name(&tag) {
            warn!(flag = %flag, "Skipping flag that is not a valid element name");
            continue;
        }
        writer.element(&tag, &text(value))?;
    }
    Ok(())
}

/// Letter or `_` first, then letters, digits, `-`, `_` or `.`
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn keyword_search(options: &QueryOptions, writer: &mut DocumentWriter) -> Result<()> {
    writer.container("Searches", |writer| {
        for (key, term) in &options.searches {
            writer.container("Search", |writer| {
                writer.element("search-key", key)?;
                writer.element("search-term", &text(term))
            })?;
        }
        Ok(())
    })
}

fn navigation_query(options: &QueryOptions, writer: &mut DocumentWriter) -> Result<()> {
    writer.container("SelectedDimensionValueIds", |writer| {
        for dimension in &options.dimensions {
            writer.element("DimensionValueId", &text(dimension))?;
        }
        Ok(())
    })
}

fn category_navigation_query(options: &QueryOptions, writer: &mut DocumentWriter) -> Result<()> {
    let Some(category) = &options.category else {
        return Ok(());
    };
    writer.container("Category", |writer| {
        writer.element("CategoryId", &text(category))
    })
}

fn sorting(options: &QueryOptions, writer: &mut DocumentWriter) -> Result<()> {
    writer.container("Sorts", |writer| {
        for (key, direction) in &options.sorts {
            writer.container("Sort", |writer| {
                writer.element("sort-key", key)?;
                writer.element("sort-direction", &capitalize(&text(direction)))
            })?;
        }
        Ok(())
    })
}

fn paging(options: &QueryOptions, writer: &mut DocumentWriter) -> Result<()> {
    if let Some(offset) = options.offset() {
        writer.element("RecordOffset", &text(offset))?;
    }
    if let Some(per_page) = options.per_page() {
        writer.element("RecordsPerPage", &text(per_page))?;
    }
    Ok(())
}

// Advanced parameters have no wire representation yet.
fn advanced_parameters(options: &QueryOptions, _writer: &mut DocumentWriter) -> Result<()> {
    debug!(
        count = options.advanced.len(),
        "Advanced parameters are not serialized"
    );
    Ok(())
}

/// Text content of an option value
pub(crate) fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Thin wrapper over an indenting quick-xml writer
struct DocumentWriter {
    writer: Writer<Vec<u8>>,
}

impl DocumentWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| EndecaError::XmlError(e.to_string()))
    }

    /// `<name>text</name>`
    fn element(&mut self, name: &str, text: &str) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name)))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn container<F>(&mut self, name: &str, inner: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.event(Event::Start(BytesStart::new(name)))?;
        inner(self)?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| EndecaError::XmlError(e.to_string()))
    }
}
