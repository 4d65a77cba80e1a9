//! Stylesheet generation.
//!
//! One rule per element (`.element-<id>`) carrying its absolute geometry
//! and every style-map entry, plus the canvas wrapper, animation
//! keyframes and responsive `@media` blocks. Both generators embed the
//! same text: HTML inlines it in `<style>`, the component export ships it
//! as a separate file.

use crate::animation;
use crate::context::{Context, ExportOptions};
use crate::escape::{class_name, kebab_case};
use crate::strategy::strategy_for;
use indexmap::IndexMap;
use sk_core::{Canvas, ElementNode, Project, StyleMap};

/// Global reset emitted ahead of generated rules.
pub const RESET: &[(&str, &[(&str, &str)])] = &[
    ("*, *::before, *::after", &[("box-sizing", "border-box")]),
    ("body", &[("margin", "0")]),
    ("img", &[("display", "block"), ("max-width", "100%")]),
];

pub type Declarations = Vec<(String, String)>;

/// Max width for a responsive breakpoint key. `tablet` and `mobile` are
/// named; any other key must be a pixel width (`"640"` or `"640px"`).
pub fn breakpoint_width(key: &str) -> Option<u32> {
    match key {
        "tablet" => Some(1024),
        "mobile" => Some(768),
        other => other.trim_end_matches("px").trim().parse().ok(),
    }
}

/// Write `selector { decls }`.
pub fn write_rule(ctx: &mut Context, selector: &str, decls: &[(String, String)]) {
    if decls.is_empty() {
        return;
    }
    ctx.add_line(&format!("{selector} {{"));
    ctx.indent();
    for (property, value) in decls {
        ctx.add_line(&format!("{property}: {value};"));
    }
    ctx.dedent();
    ctx.add_line("}");
}

fn owned(pairs: &[(&str, &str)]) -> Declarations {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Style-map entries as CSS declarations.
pub fn style_declarations(styles: &StyleMap) -> Declarations {
    styles
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (kebab_case(k), v.clone()))
        .collect()
}

/// The element's own rule: geometry, then `base` (type defaults), then
/// the style map, so user styles win.
pub fn write_element_rule(ctx: &mut Context, node: &ElementNode, base: &[(&str, &str)]) {
    let mut decls: Declarations = vec![
        ("position".into(), "absolute".into()),
        ("left".into(), format!("{}px", node.position.x)),
        ("top".into(), format!("{}px", node.position.y)),
        ("width".into(), format!("{}px", node.dimensions.width)),
        ("height".into(), format!("{}px", node.dimensions.height)),
        ("z-index".into(), node.position.z.to_string()),
    ];
    decls.extend(owned(base));
    decls.extend(style_declarations(&node.styles));

    let class = class_name(node.id);
    let animations = node
        .animations
        .as_ref()
        .filter(|_| ctx.options.include_animations);

    if let Some(entrance) = animations.and_then(|a| a.entrance.as_ref()) {
        decls.push(("animation".into(), animation::animation_value(entrance)));
    }
    if let Some(hover) = animations.and_then(|a| a.hover.as_ref()) {
        decls.push(("transition".into(), animation::hover_transition(hover)));
    }
    write_rule(ctx, &format!(".{class}"), &decls);

    if let Some(hover) = animations.and_then(|a| a.hover.as_ref())
        && let Some(hover_decls) = animation::hover_declarations(hover)
    {
        write_rule(ctx, &format!(".{class}:hover"), &hover_decls);
    }
    if let Some(scroll) = animations.and_then(|a| a.scroll.as_ref()) {
        // Hidden until the host's observer marks it visible.
        write_rule(
            ctx,
            &format!(".{class}[data-scroll-animation]"),
            &owned(&[("opacity", "0")]),
        );
        write_rule(
            ctx,
            &format!(".{class}[data-scroll-animation].is-visible"),
            &[("animation".into(), animation::animation_value(scroll))],
        );
    }
}

fn write_canvas_root(ctx: &mut Context, canvas: &Canvas) {
    let mut decls: Declarations = vec![
        ("position".into(), "relative".into()),
        ("width".into(), format!("{}px", canvas.width)),
        ("min-height".into(), format!("{}px", canvas.height)),
        ("margin".into(), "0 auto".into()),
        ("background-color".into(), canvas.background_color.clone()),
    ];
    if let Some(image) = canvas.background_image.as_deref().filter(|i| !i.is_empty()) {
        decls.push(("background-image".into(), format!("url(\"{image}\")")));
        decls.push(("background-size".into(), "cover".into()));
    }
    write_rule(ctx, ".canvas-root", &decls);
}

fn write_keyframes(ctx: &mut Context, elements: &[ElementNode]) {
    let mut used: Vec<&'static str> = Vec::new();
    for node in elements {
        let Some(anims) = &node.animations else {
            continue;
        };
        for anim in [&anims.entrance, &anims.scroll].into_iter().flatten() {
            let preset = animation::entrance_preset(&anim.preset);
            if !used.contains(&preset) {
                used.push(preset);
            }
        }
    }

    for preset in used {
        ctx.add_line(&format!("@keyframes {} {{", animation::keyframes_name(preset)));
        ctx.indent();
        for (stop, body) in animation::keyframes(preset) {
            ctx.add_line(&format!("{stop} {{ {body} }}"));
        }
        ctx.dedent();
        ctx.add_line("}");
    }
}

fn write_media_blocks(ctx: &mut Context, elements: &[ElementNode]) {
    // Widest first so narrower breakpoints override.
    let mut blocks: IndexMap<u32, Vec<(String, Declarations)>> = IndexMap::new();
    for node in elements {
        let Some(responsive) = &node.responsive_styles else {
            continue;
        };
        for (key, styles) in responsive {
            let Some(width) = breakpoint_width(key) else {
                log::debug!("skipping unknown breakpoint `{key}` on {}", node.id);
                continue;
            };
            blocks
                .entry(width)
                .or_default()
                .push((class_name(node.id), style_declarations(styles)));
        }
    }
    blocks.sort_by(|a, _, b, _| b.cmp(a));

    for (width, rules) in blocks {
        ctx.add_line(&format!("@media (max-width: {width}px) {{"));
        ctx.indent();
        for (class, decls) in rules {
            write_rule(ctx, &format!(".{class}"), &decls);
        }
        ctx.dedent();
        ctx.add_line("}");
    }
}

/// Write the full stylesheet for `project` into `ctx`.
pub fn write_stylesheet(ctx: &mut Context, project: &Project) {
    if ctx.options.include_reset {
        for (selector, decls) in RESET {
            write_rule(ctx, selector, &owned(decls));
        }
    }
    write_canvas_root(ctx, &project.canvas);

    for node in &project.elements {
        strategy_for(node.kind).write_rules(node, ctx);
    }

    if ctx.options.include_animations {
        write_keyframes(ctx, &project.elements);
    }
    if ctx.options.include_responsive {
        write_media_blocks(ctx, &project.elements);
    }
    if let Some(custom) = project.settings.custom_css.as_deref().filter(|c| !c.trim().is_empty()) {
        ctx.add_block(custom);
    }
}

/// The stylesheet as a standalone file.
pub fn generate_stylesheet(project: &Project, options: &ExportOptions) -> String {
    let mut ctx = Context::new(options);
    write_stylesheet(&mut ctx, project);
    ctx.into_output()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sk_core::{ElementKind, NodeId, Position, ResponsiveStyles};

    fn bare() -> ExportOptions {
        ExportOptions {
            include_reset: false,
            ..Default::default()
        }
    }

    fn section(id: &str) -> ElementNode {
        let mut node = ElementNode::with_id(
            NodeId::intern(id),
            ElementKind::Section,
            Position::new(10.0, 20.0, 3),
        );
        node.styles = StyleMap::from_iter([("backgroundColor".to_string(), "red".to_string())]);
        node
    }

    #[test]
    fn element_rule_has_geometry_and_styles() {
        let options = bare();
        let mut ctx = Context::new(&options);
        write_element_rule(&mut ctx, &section("hero"), &[]);
        assert_eq!(
            ctx.into_output(),
            ".element-hero {\n  position: absolute;\n  left: 10px;\n  top: 20px;\n  \
             width: 800px;\n  height: 300px;\n  z-index: 3;\n  background-color: red;\n}\n"
        );
    }

    #[test]
    fn breakpoints() {
        assert_eq!(breakpoint_width("tablet"), Some(1024));
        assert_eq!(breakpoint_width("mobile"), Some(768));
        assert_eq!(breakpoint_width("640px"), Some(640));
        assert_eq!(breakpoint_width("480"), Some(480));
        assert_eq!(breakpoint_width("watch"), None);
    }

    #[test]
    fn media_blocks_widest_first() {
        let mut a = section("a");
        let mut responsive = ResponsiveStyles::new();
        responsive.insert(
            "mobile".into(),
            StyleMap::from_iter([("display".to_string(), "none".to_string())]),
        );
        responsive.insert(
            "tablet".into(),
            StyleMap::from_iter([("width".to_string(), "100%".to_string())]),
        );
        responsive.insert("watch".into(), StyleMap::new());
        a.responsive_styles = Some(responsive);

        let mut project = Project::new("p");
        project.elements.push(a);
        let css = generate_stylesheet(&project, &bare());

        let tablet = css.find("@media (max-width: 1024px)").unwrap();
        let mobile = css.find("@media (max-width: 768px)").unwrap();
        assert!(tablet < mobile);
        assert!(!css.contains("watch"));
    }

    #[test]
    fn custom_css_is_appended_last() {
        let mut project = Project::new("p");
        project.elements.push(section("a"));
        project.settings.custom_css = Some(".x { color: blue; }".into());
        let css = generate_stylesheet(&project, &bare());
        assert!(css.trim_end().ends_with(".x { color: blue; }"));
    }

    #[test]
    fn canvas_root_carries_background() {
        let mut project = Project::new("p");
        project.canvas.background_image = Some("/bg.png".into());
        let css = generate_stylesheet(&project, &bare());
        assert!(css.contains(".canvas-root {"));
        assert!(css.contains("width: 1200px;"));
        assert!(css.contains("min-height: 800px;"));
        assert!(css.contains("background-image: url(\"/bg.png\");"));
    }
}
