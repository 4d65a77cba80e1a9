//! Persisted project shape: `{ name, elements, canvas, settings }`.
//!
//! The settings bag (SEO metadata, custom CSS/JS) belongs to the host
//! application; generators read it but nothing here interprets it beyond
//! the known keys. Unknown settings keys are carried through untouched.

use crate::document::Document;
use crate::error::Result;
use crate::model::{Canvas, ElementNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementNode>,
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default)]
    pub settings: ProjectSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default)]
    pub seo: SeoSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_js: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The editable part of the project.
    pub fn document(&self) -> Document {
        Document::from_parts(self.elements.clone(), self.canvas.clone())
    }

    /// Consume the project, splitting off the document.
    pub fn into_parts(self) -> (Document, String, ProjectSettings) {
        (
            Document::from_parts(self.elements, self.canvas),
            self.name,
            self.settings,
        )
    }

    /// Rebuild a project around a (possibly edited) document.
    pub fn from_document(name: &str, doc: &Document, settings: &ProjectSettings) -> Self {
        Self {
            name: name.to_string(),
            elements: doc.elements.clone(),
            canvas: doc.canvas.clone(),
            settings: settings.clone(),
        }
    }

    /// Page title for generated output: SEO title, project name, or a default.
    pub fn page_title(&self) -> &str {
        self.settings
            .seo
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(Some(self.name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or("My Website")
    }
}
