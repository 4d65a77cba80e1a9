//! Binding resolver: turns an element's dynamic-content binding into the
//! text, image or rows that renderers and generators display.
//!
//! Every resolution walks a fixed precedence chain and always ends at a
//! visible placeholder, so malformed or missing bound data never surfaces
//! as an error.

use crate::model::{ElementNode, ListItem, PLACEHOLDER_IMAGE, image_url};
use serde_json::Value;

pub const TEXT_PLACEHOLDER: &str = "Text content";
pub const IMAGE_ALT_PLACEHOLDER: &str = "Image";
pub const LIST_HEADER_PLACEHOLDER: &str = "Items";

/// Field names tried, in order, when a bound image has no usable explicit field.
pub const IMAGE_FALLBACK_FIELDS: [&str; 5] =
    ["image", "thumbnail", "photo", "picture", "featuredImage"];

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The binding's explicit `field`.
    Field,
    /// The bound record's `title`.
    Title,
    /// One of the common image field names.
    CommonField,
    /// Pre-fetched collection rows on the binding.
    Collection,
    /// The element's own static content.
    Static,
    /// Nothing usable; a placeholder.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedText {
    pub text: String,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub src: String,
    pub alt: String,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedList {
    pub header: Option<String>,
    pub rows: Vec<ListItem>,
    pub source: Source,
}

/// Resolve display text: bound `field` → bound `title` → `content.text`
/// → placeholder.
pub fn resolve_text(node: &ElementNode) -> ResolvedText {
    resolve_text_or(node, TEXT_PLACEHOLDER)
}

/// Like `resolve_text`, with a caller-chosen placeholder (buttons use "Button").
pub fn resolve_text_or(node: &ElementNode, placeholder: &str) -> ResolvedText {
    if let Some(binding) = &node.cms_binding {
        if let Some(text) = binding
            .field
            .as_deref()
            .and_then(|f| binding.data.get(f))
            .and_then(scalar_text)
        {
            return ResolvedText {
                text,
                source: Source::Field,
            };
        }
        if let Some(text) = binding.data.get("title").and_then(scalar_text) {
            return ResolvedText {
                text,
                source: Source::Title,
            };
        }
    }

    match node.content.text.as_deref() {
        Some(t) if !t.is_empty() => ResolvedText {
            text: t.to_string(),
            source: Source::Static,
        },
        _ => ResolvedText {
            text: placeholder.to_string(),
            source: Source::Placeholder,
        },
    }
}

/// Resolve an image: bound `field` (object with `url`, or a string) →
/// common image field names → `content.src` → placeholder.
pub fn resolve_image(node: &ElementNode) -> ResolvedImage {
    let static_alt = node
        .content
        .alt
        .clone()
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| IMAGE_ALT_PLACEHOLDER.to_string());

    if let Some(binding) = &node.cms_binding {
        let bound_alt = || {
            binding
                .data
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| static_alt.clone())
        };

        if let Some(value) = binding.field.as_deref().and_then(|f| binding.data.get(f))
            && let Some(src) = image_url(value)
        {
            let alt = value
                .get("alt")
                .and_then(Value::as_str)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .unwrap_or_else(bound_alt);
            return ResolvedImage {
                src: src.to_string(),
                alt,
                source: Source::Field,
            };
        }

        for name in IMAGE_FALLBACK_FIELDS {
            if let Some(value) = binding.data.get(name)
                && let Some(src) = image_url(value)
            {
                return ResolvedImage {
                    src: src.to_string(),
                    alt: bound_alt(),
                    source: Source::CommonField,
                };
            }
        }
    }

    match node.content.src.as_deref() {
        Some(src) if !src.is_empty() => ResolvedImage {
            src: src.to_string(),
            alt: static_alt,
            source: Source::Static,
        },
        _ => ResolvedImage {
            src: PLACEHOLDER_IMAGE.to_string(),
            alt: static_alt,
            source: Source::Placeholder,
        },
    }
}

/// Resolve list rows: binding `collection_data` (sliced to
/// `content.max_items`) → `content.items` → three sample rows.
pub fn resolve_list(node: &ElementNode) -> ResolvedList {
    let header = if node.content.show_header.unwrap_or(true) {
        Some(
            node.content
                .header_text
                .clone()
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| LIST_HEADER_PLACEHOLDER.to_string()),
        )
    } else {
        None
    };

    if let Some(rows) = node
        .cms_binding
        .as_ref()
        .and_then(|b| b.collection_data.as_ref())
        .filter(|rows| !rows.is_empty())
    {
        let limit = node.content.max_items.unwrap_or(rows.len());
        return ResolvedList {
            header,
            rows: rows.iter().take(limit).cloned().map(ListItem::from).collect(),
            source: Source::Collection,
        };
    }

    if let Some(items) = node.content.items.as_ref().filter(|i| !i.is_empty()) {
        return ResolvedList {
            header,
            rows: items.clone(),
            source: Source::Static,
        };
    }

    ResolvedList {
        header,
        rows: sample_rows(),
        source: Source::Placeholder,
    }
}

fn sample_rows() -> Vec<ListItem> {
    (1..=3)
        .map(|i| {
            ListItem::record(
                &format!("Sample Item {i}"),
                Some("This is a sample item description."),
            )
        })
        .collect()
}

/// Render a scalar JSON value as text. Objects, arrays, null and empty
/// strings are not displayable.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
