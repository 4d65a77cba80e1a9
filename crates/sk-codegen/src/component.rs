use crate::context::{Context, ExportOptions};
use crate::css::generate_stylesheet;
use crate::escape::sanitize_component_name;
use crate::strategy::{Dialect, strategy_for};
use serde::Serialize;
use sk_core::Project;

/// A function component plus the stylesheet it imports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentExport {
    pub name: String,
    /// `<name>.jsx`
    pub component: String,
    /// `<name>.css`
    pub stylesheet: String,
}

impl ComponentExport {
    pub fn component_file(&self) -> String {
        format!("{}.jsx", self.name)
    }

    pub fn stylesheet_file(&self) -> String {
        format!("{}.css", self.name)
    }
}

/// Compile a project to a component and stylesheet. The component name
/// comes from `name` if given, else the project name.
pub fn generate_component(
    project: &Project,
    name: Option<&str>,
    options: &ExportOptions,
) -> ComponentExport {
    let name = sanitize_component_name(name.unwrap_or(&project.name));
    let mut ctx = Context::new(options);

    ctx.add_line("import React from \"react\";");
    ctx.add_line(&format!("import \"./{name}.css\";"));
    ctx.add_line("");
    ctx.add_line(&format!("export default function {name}() {{"));
    ctx.indent();
    ctx.add_line("return (");
    ctx.indent();
    ctx.add_line("<div className=\"canvas-root\">");
    ctx.indent();
    for node in &project.elements {
        strategy_for(node.kind).write_markup(node, &mut ctx, Dialect::Jsx);
    }
    ctx.dedent();
    ctx.add_line("</div>");
    ctx.dedent();
    ctx.add_line(");");
    ctx.dedent();
    ctx.add_line("}");

    ComponentExport {
        stylesheet: generate_stylesheet(project, options),
        component: ctx.into_output(),
        name,
    }
}
