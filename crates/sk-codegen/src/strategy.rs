//! Per-type serialization table.
//!
//! Each element type has one strategy that knows its markup tag and
//! attributes, any CSS beyond the shared geometry rule, and how it looks
//! as a component. Markup and component output share tag selection and
//! differ only in `Dialect`.

use crate::context::Context;
use crate::css;
use crate::escape::{class_name, escape_html, escape_jsx};
use sk_core::binding::resolve_text_or;
use sk_core::{ElementKind, ElementNode, resolve_image, resolve_list, resolve_text};

/// Output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Html,
    Jsx,
}

impl Dialect {
    fn class_attr(self) -> &'static str {
        match self {
            Dialect::Html => "class",
            Dialect::Jsx => "className",
        }
    }

    /// Escape text content.
    pub fn text(self, s: &str) -> String {
        match self {
            Dialect::Html => escape_html(s),
            Dialect::Jsx => escape_jsx(s),
        }
    }

    /// Quoted attribute value.
    fn attr(self, name: &str, value: &str) -> String {
        format!(" {name}=\"{}\"", escape_html(value))
    }

    fn comment(self, s: &str) -> String {
        match self {
            Dialect::Html => format!("<!-- {s} -->"),
            Dialect::Jsx => format!("{{/* {s} */}}"),
        }
    }

    fn void_end(self) -> &'static str {
        match self {
            Dialect::Html => ">",
            Dialect::Jsx => " />",
        }
    }

    fn class(self, name: &str) -> String {
        self.attr(self.class_attr(), name)
    }
}

pub trait ElementStrategy: Sync {
    /// Write the element's markup (one element per node).
    fn write_markup(&self, node: &ElementNode, ctx: &mut Context, dialect: Dialect);

    /// Write the element's CSS rules.
    fn write_rules(&self, node: &ElementNode, ctx: &mut Context) {
        css::write_element_rule(ctx, node, &[]);
    }
}

/// The strategy for `kind`.
pub fn strategy_for(kind: ElementKind) -> &'static dyn ElementStrategy {
    match kind {
        ElementKind::Text => &TextStrategy,
        ElementKind::Image => &ImageStrategy,
        ElementKind::Button => &ButtonStrategy,
        ElementKind::List => &ListStrategy,
        ElementKind::Section => &SECTION,
        ElementKind::Container | ElementKind::Grid | ElementKind::Flexbox => &DIV,
    }
}

/// `class` plus the scroll-animation marker, shared by every root tag.
fn root_attrs(node: &ElementNode, ctx: &Context, dialect: Dialect) -> String {
    let mut attrs = dialect.class(&class_name(node.id));
    if ctx.options.include_animations
        && let Some(scroll) = node.animations.as_ref().and_then(|a| a.scroll.as_ref())
    {
        attrs.push_str(&dialect.attr("data-scroll-animation", &scroll.preset));
    }
    attrs
}

/// Heading level sniffed from leading `#` markers. The text itself is
/// emitted unchanged, markers included.
pub fn heading_tag(text: &str) -> &'static str {
    if text.starts_with("###") {
        "h3"
    } else if text.starts_with("##") {
        "h2"
    } else if text.starts_with('#') {
        "h1"
    } else {
        "p"
    }
}

// ─── Text ────────────────────────────────────────────────────────────────

pub struct TextStrategy;

impl ElementStrategy for TextStrategy {
    fn write_markup(&self, node: &ElementNode, ctx: &mut Context, dialect: Dialect) {
        let text = resolve_text(node).text;
        let tag = heading_tag(&text);
        let attrs = root_attrs(node, ctx, dialect);
        ctx.add_line(&format!("<{tag}{attrs}>{}</{tag}>", dialect.text(&text)));
    }

    fn write_rules(&self, node: &ElementNode, ctx: &mut Context) {
        css::write_element_rule(ctx, node, &[("margin", "0")]);
    }
}

// ─── Image ───────────────────────────────────────────────────────────────

pub struct ImageStrategy;

impl ElementStrategy for ImageStrategy {
    fn write_markup(&self, node: &ElementNode, ctx: &mut Context, dialect: Dialect) {
        let image = resolve_image(node);
        let attrs = root_attrs(node, ctx, dialect);
        ctx.add_line(&format!(
            "<img{attrs}{}{}{}",
            dialect.attr("src", &image.src),
            dialect.attr("alt", &image.alt),
            dialect.void_end()
        ));
    }

    fn write_rules(&self, node: &ElementNode, ctx: &mut Context) {
        css::write_element_rule(ctx, node, &[("display", "block")]);
    }
}

// ─── Button ──────────────────────────────────────────────────────────────

pub struct ButtonStrategy;

impl ElementStrategy for ButtonStrategy {
    fn write_markup(&self, node: &ElementNode, ctx: &mut Context, dialect: Dialect) {
        let label = dialect.text(&resolve_text_or(node, "Button").text);
        let attrs = root_attrs(node, ctx, dialect);
        match node.content.href.as_deref().filter(|h| !h.is_empty()) {
            Some(href) => ctx.add_line(&format!(
                "<a{attrs}{}>{label}</a>",
                dialect.attr("href", href)
            )),
            None => ctx.add_line(&format!(
                "<button{attrs}{}>{label}</button>",
                dialect.attr("type", "button")
            )),
        }
    }

    fn write_rules(&self, node: &ElementNode, ctx: &mut Context) {
        css::write_element_rule(
            ctx,
            node,
            &[
                ("display", "flex"),
                ("align-items", "center"),
                ("justify-content", "center"),
                ("border", "none"),
                ("cursor", "pointer"),
                ("text-decoration", "none"),
            ],
        );
    }
}

// ─── List ────────────────────────────────────────────────────────────────

pub struct ListStrategy;

impl ElementStrategy for ListStrategy {
    fn write_markup(&self, node: &ElementNode, ctx: &mut Context, dialect: Dialect) {
        let list = resolve_list(node);
        let attrs = root_attrs(node, ctx, dialect);
        ctx.add_line(&format!("<div{attrs}>"));
        ctx.indent();
        if let Some(header) = &list.header {
            ctx.add_line(&format!(
                "<h3{}>{}</h3>",
                dialect.class("list-header"),
                dialect.text(header)
            ));
        }
        ctx.add_line(&format!("<ul{}>", dialect.class("list-items")));
        ctx.indent();
        for row in &list.rows {
            ctx.add_line(&format!("<li{}>", dialect.class("list-item")));
            ctx.indent();
            if let Some(src) = row.image() {
                ctx.add_line(&format!(
                    "<img{}{}{}{}",
                    dialect.class("list-item-image"),
                    dialect.attr("src", src),
                    dialect.attr("alt", row.title().unwrap_or("")),
                    dialect.void_end()
                ));
            }
            ctx.add_line(&format!(
                "<strong{}>{}</strong>",
                dialect.class("list-item-title"),
                dialect.text(row.title().unwrap_or("Untitled"))
            ));
            if let Some(desc) = row.description() {
                ctx.add_line(&format!(
                    "<span{}>{}</span>",
                    dialect.class("list-item-description"),
                    dialect.text(desc)
                ));
            }
            ctx.dedent();
            ctx.add_line("</li>");
        }
        ctx.dedent();
        ctx.add_line("</ul>");
        ctx.dedent();
        ctx.add_line("</div>");
    }

    fn write_rules(&self, node: &ElementNode, ctx: &mut Context) {
        css::write_element_rule(ctx, node, &[("overflow", "auto")]);
        let class = class_name(node.id);
        let rule = |pairs: &[(&str, &str)]| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        };
        css::write_rule(
            ctx,
            &format!(".{class} .list-items"),
            &rule(&[("list-style", "none"), ("margin", "0"), ("padding", "0")]),
        );
        css::write_rule(
            ctx,
            &format!(".{class} .list-item"),
            &rule(&[
                ("display", "flex"),
                ("flex-direction", "column"),
                ("padding", "8px 0"),
                ("border-bottom", "1px solid #e5e7eb"),
            ]),
        );
    }
}

// ─── Containers ──────────────────────────────────────────────────────────

/// Section, container, grid and flexbox. Children are not serialized;
/// a placeholder comment marks where they would go.
pub struct ContainerStrategy {
    tag: &'static str,
}

static SECTION: ContainerStrategy = ContainerStrategy { tag: "section" };
static DIV: ContainerStrategy = ContainerStrategy { tag: "div" };

impl ElementStrategy for ContainerStrategy {
    fn write_markup(&self, node: &ElementNode, ctx: &mut Context, dialect: Dialect) {
        let attrs = root_attrs(node, ctx, dialect);
        let tag = self.tag;
        ctx.add_line(&format!("<{tag}{attrs}>"));
        ctx.indent();
        let note = match node.children.len() {
            0 => format!("{} content", node.kind),
            n => format!("{} content: {n} nested element(s) not exported", node.kind),
        };
        ctx.add_line(&dialect.comment(&note));
        ctx.dedent();
        ctx.add_line(&format!("</{tag}>"));
    }
}
