//! Core data model for SiteKit pages.
//!
//! A page is a flat, ordered list of `ElementNode`s placed on a single
//! `Canvas`. Each node carries absolute geometry (`Position`, `Dimensions`),
//! an open style map, a type-specific `Content` payload, and optional
//! dynamic-content binding, responsive overrides and animations.
//! Container-like types may reference or embed children.

use crate::error::Error;
use crate::id::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Smallest width or height an element may have, in pixels.
pub const MIN_SIZE: f32 = 20.0;

/// Placeholder shown for images without a usable source.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400?text=Image";

// ─── Style / Geometry Primitives ─────────────────────────────────────────

/// Open style map: camelCase property → CSS value, in author order.
pub type StyleMap = IndexMap<String, String>;

/// Breakpoint key (`mobile`, `tablet`, …) → partial style overrides.
pub type ResponsiveStyles = IndexMap<String, StyleMap>;

/// Canvas-relative placement. `x`/`y` are pixel offsets, `z` is a stacking
/// index that is not kept contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: i32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Same position with `x`/`y` clamped to the canvas origin.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
            z: self.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Same dimensions with both axes raised to at least `MIN_SIZE`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(MIN_SIZE),
            height: self.height.max(MIN_SIZE),
        }
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rect intersects another rectangle (strict AABB overlap).
    pub fn intersects_rect(&self, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
        self.x < rx + rw
            && self.x + self.width > rx
            && self.y < ry + rh
            && self.y + self.height > ry
    }
}

// ─── Element types ───────────────────────────────────────────────────────

/// The fixed set of element variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Button,
    List,
    Section,
    Container,
    Grid,
    Flexbox,
}

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Text,
        ElementKind::Image,
        ElementKind::Button,
        ElementKind::List,
        ElementKind::Section,
        ElementKind::Container,
        ElementKind::Grid,
        ElementKind::Flexbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Button => "button",
            ElementKind::List => "list",
            ElementKind::Section => "section",
            ElementKind::Container => "container",
            ElementKind::Grid => "grid",
            ElementKind::Flexbox => "flexbox",
        }
    }

    /// Types that may hold `children`.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ElementKind::Section | ElementKind::Container | ElementKind::Grid | ElementKind::Flexbox
        )
    }

    /// Size given to a freshly dropped element of this type.
    pub fn default_dimensions(&self) -> Dimensions {
        match self {
            ElementKind::Text => Dimensions::new(200.0, 50.0),
            ElementKind::Image => Dimensions::new(300.0, 200.0),
            ElementKind::Button => Dimensions::new(120.0, 44.0),
            ElementKind::List => Dimensions::new(320.0, 240.0),
            ElementKind::Section => Dimensions::new(800.0, 300.0),
            ElementKind::Container | ElementKind::Grid => Dimensions::new(400.0, 300.0),
            ElementKind::Flexbox => Dimensions::new(400.0, 200.0),
        }
    }

    pub fn default_content(&self) -> Content {
        match self {
            ElementKind::Text => Content {
                text: Some("Edit this text".into()),
                ..Default::default()
            },
            ElementKind::Image => Content {
                src: Some(PLACEHOLDER_IMAGE.into()),
                alt: Some("Image".into()),
                ..Default::default()
            },
            ElementKind::Button => Content {
                text: Some("Button".into()),
                ..Default::default()
            },
            ElementKind::List => Content {
                items: Some(Vec::new()),
                max_items: Some(5),
                show_header: Some(true),
                header_text: Some("Items".into()),
                ..Default::default()
            },
            _ => Content::default(),
        }
    }

    pub fn default_styles(&self) -> StyleMap {
        let pairs: &[(&str, &str)] = match self {
            ElementKind::Text => &[("fontSize", "16px"), ("color", "#333333")],
            ElementKind::Image => &[("objectFit", "cover")],
            ElementKind::Button => &[
                ("backgroundColor", "#3b82f6"),
                ("color", "#ffffff"),
                ("borderRadius", "6px"),
            ],
            ElementKind::List => &[("fontSize", "14px")],
            ElementKind::Section => &[("backgroundColor", "#f8fafc")],
            ElementKind::Container => &[("border", "1px dashed #cbd5e1")],
            ElementKind::Grid => &[
                ("display", "grid"),
                ("gridTemplateColumns", "repeat(2, 1fr)"),
                ("gap", "16px"),
            ],
            ElementKind::Flexbox => &[("display", "flex"), ("gap", "16px")],
        };
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownElementType(s.to_string()))
    }
}

// ─── Content payload ─────────────────────────────────────────────────────

/// Type-specific payload. Every field is optional; readers supply
/// fallbacks. Unknown keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ListItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of a list element: either a bare string or a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Record(Map<String, Value>),
}

impl ListItem {
    pub fn record(title: &str, description: Option<&str>) -> Self {
        let mut map = Map::new();
        map.insert("title".into(), Value::String(title.into()));
        if let Some(d) = description {
            map.insert("description".into(), Value::String(d.into()));
        }
        ListItem::Record(map)
    }

    /// Display title: the string itself, or the first of `title`, `name`,
    /// `label` on a record (also looking inside a nested `data` object).
    pub fn title(&self) -> Option<&str> {
        match self {
            ListItem::Text(s) => Some(s),
            ListItem::Record(map) => record_str(map, &["title", "name", "label"]),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ListItem::Text(_) => None,
            ListItem::Record(map) => {
                record_str(map, &["description", "excerpt", "summary", "subtitle"])
            }
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            ListItem::Text(_) => None,
            ListItem::Record(map) => ["image", "thumbnail", "photo", "picture", "featuredImage"]
                .iter()
                .find_map(|k| lookup(map, k).and_then(image_url)),
        }
    }
}

impl From<Value> for ListItem {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ListItem::Text(s),
            Value::Object(map) => ListItem::Record(map),
            other => ListItem::Text(other.to_string()),
        }
    }
}

/// Look up `key` on a record, falling back to its nested `data` object
/// (content-store rows keep user fields there).
fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key)
        .or_else(|| map.get("data").and_then(Value::as_object)?.get(key))
}

fn record_str<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| lookup(map, k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

/// Extract an image URL from a field value: a plain string, or an object
/// carrying `url`.
pub fn image_url(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(obj) => obj.get("url").and_then(Value::as_str).filter(|s| !s.is_empty()),
        _ => None,
    }
}

// ─── Children ────────────────────────────────────────────────────────────

/// A child slot of a container: a reference to a top-level element by id,
/// or an element embedded in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildRef {
    Id(NodeId),
    Node(Box<ElementNode>),
}

impl ChildRef {
    pub fn id(&self) -> NodeId {
        match self {
            ChildRef::Id(id) => *id,
            ChildRef::Node(node) => node.id,
        }
    }
}

// ─── Dynamic content binding ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BindingKind {
    #[default]
    #[serde(rename = "cms")]
    Cms,
}

/// A resolved snapshot of content-store data bound to an element.
/// Not a live query: `data` and `collection_data` are filled by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsBinding {
    #[serde(rename = "type", default)]
    pub kind: BindingKind,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub collection_slug: String,
    #[serde(default)]
    pub content_id: String,
    #[serde(default)]
    pub content_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Pre-fetched collection rows, only meaningful for list elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_data: Option<Vec<Value>>,
}

// ─── Animation ───────────────────────────────────────────────────────────

/// Animation presets grouped by trigger category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<Animation>,
}

impl Animations {
    pub fn is_empty(&self) -> bool {
        self.entrance.is_none() && self.scroll.is_none() && self.hover.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Preset name, e.g. `fadeIn`, `slideUp`, `scale`.
    #[serde(rename = "type")]
    pub preset: String,
    /// Milliseconds.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Milliseconds.
    #[serde(default)]
    pub delay: f32,
    #[serde(default = "default_easing")]
    pub easing: String,
    /// Preset-specific parameters (`scale`, `distance`, …).
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

fn default_duration() -> f32 {
    600.0
}

fn default_easing() -> String {
    "ease-out".into()
}

// ─── Element node ────────────────────────────────────────────────────────

/// One positioned, styled, typed unit on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    /// Assigned at creation, never reassigned.
    pub id: NodeId,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    pub position: Position,

    pub dimensions: Dimensions,

    #[serde(default)]
    pub styles: StyleMap,

    #[serde(default)]
    pub content: Content,

    /// Only meaningful for container-like types.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub children: SmallVec<[ChildRef; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_binding: Option<CmsBinding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive_styles: Option<ResponsiveStyles>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<Animations>,
}

impl ElementNode {
    /// Create an element with a fresh id and the type's defaults.
    pub fn new(kind: ElementKind, position: Position) -> Self {
        Self::with_id(NodeId::generate(kind.as_str()), kind, position)
    }

    pub fn with_id(id: NodeId, kind: ElementKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position: position.clamped(),
            dimensions: kind.default_dimensions(),
            styles: kind.default_styles(),
            content: kind.default_content(),
            children: SmallVec::new(),
            cms_binding: None,
            responsive_styles: None,
            animations: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.dimensions.width,
            self.dimensions.height,
        )
    }
}

// ─── Partial updates ─────────────────────────────────────────────────────

/// Top-level partial update for `ElementNode`.
///
/// Each present field replaces the node's field wholesale: passing
/// `styles` replaces the entire style map. `cms_binding`,
/// `responsive_styles` and `animations` use a double `Option` so a patch
/// can clear them (`Some(None)`, JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub styles: Option<StyleMap>,
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub children: Option<SmallVec<[ChildRef; 2]>>,
    #[serde(default, deserialize_with = "present")]
    pub cms_binding: Option<Option<CmsBinding>>,
    #[serde(default, deserialize_with = "present")]
    pub responsive_styles: Option<Option<ResponsiveStyles>>,
    #[serde(default, deserialize_with = "present")]
    pub animations: Option<Option<Animations>>,
}

impl ElementPatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn geometry(position: Position, dimensions: Dimensions) -> Self {
        Self {
            position: Some(position),
            dimensions: Some(dimensions),
            ..Default::default()
        }
    }

    pub fn styles(styles: StyleMap) -> Self {
        Self {
            styles: Some(styles),
            ..Default::default()
        }
    }

    pub fn content(content: Content) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `node` at the top level. Geometry is clamped so the
    /// position and size invariants hold after any update.
    pub fn apply_to(&self, node: &mut ElementNode) {
        if let Some(p) = self.position {
            node.position = p.clamped();
        }
        if let Some(d) = self.dimensions {
            node.dimensions = d.clamped();
        }
        if let Some(ref s) = self.styles {
            node.styles = s.clone();
        }
        if let Some(ref c) = self.content {
            node.content = c.clone();
        }
        if let Some(ref c) = self.children {
            node.children = c.clone();
        }
        if let Some(ref b) = self.cms_binding {
            node.cms_binding = b.clone();
        }
        if let Some(ref r) = self.responsive_styles {
            node.responsive_styles = r.clone();
        }
        if let Some(ref a) = self.animations {
            node.animations = a.clone();
        }
    }
}

/// Distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// The single page-level surface record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub grid_size: f32,
    pub snap_to_grid: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background_color: "#ffffff".into(),
            background_image: None,
            grid_size: 20.0,
            snap_to_grid: false,
        }
    }
}

/// Partial update for `Canvas`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasPatch {
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub background_image: Option<Option<String>>,
    #[serde(default)]
    pub grid_size: Option<f32>,
    #[serde(default)]
    pub snap_to_grid: Option<bool>,
}

impl CanvasPatch {
    pub fn apply_to(&self, canvas: &mut Canvas) {
        if let Some(w) = self.width {
            canvas.width = w.max(MIN_SIZE);
        }
        if let Some(h) = self.height {
            canvas.height = h.max(MIN_SIZE);
        }
        if let Some(ref c) = self.background_color {
            canvas.background_color = c.clone();
        }
        if let Some(ref img) = self.background_image {
            canvas.background_image = img.clone();
        }
        if let Some(g) = self.grid_size {
            // A zero grid would make snapping divide by zero.
            canvas.grid_size = g.max(1.0);
        }
        if let Some(s) = self.snap_to_grid {
            canvas.snap_to_grid = s;
        }
    }
}
