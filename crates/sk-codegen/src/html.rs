use crate::context::{Context, ExportOptions};
use crate::css;
use crate::escape::escape_html;
use crate::strategy::{Dialect, strategy_for};
use sk_core::Project;

/// Compile a project to one self-contained HTML document.
pub fn generate_html(project: &Project, options: &ExportOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    compile_head(project, &mut ctx);
    compile_body(project, &mut ctx);

    ctx.dedent();
    ctx.add_line("</html>");
    ctx.into_output()
}

fn compile_head(project: &Project, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(project.page_title())));

    let seo = &project.settings.seo;
    for (name, value) in [("description", &seo.description), ("keywords", &seo.keywords)] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            ctx.add_line(&format!(
                "<meta name=\"{name}\" content=\"{}\">",
                escape_html(value)
            ));
        }
    }

    ctx.add_line("<style>");
    ctx.indent();
    css::write_stylesheet(ctx, project);
    ctx.dedent();
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_body(project: &Project, ctx: &mut Context) {
    ctx.add_line("<body>");
    ctx.indent();

    ctx.add_line("<div class=\"canvas-root\">");
    ctx.indent();
    for node in &project.elements {
        strategy_for(node.kind).write_markup(node, ctx, Dialect::Html);
    }
    ctx.dedent();
    ctx.add_line("</div>");

    if let Some(js) = project
        .settings
        .custom_js
        .as_deref()
        .filter(|js| !js.trim().is_empty())
    {
        ctx.add_line("<script>");
        ctx.indent();
        ctx.add_block(js);
        ctx.dedent();
        ctx.add_line("</script>");
    }

    ctx.dedent();
    ctx.add_line("</body>");
}
