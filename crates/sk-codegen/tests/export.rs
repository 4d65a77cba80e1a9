//! Integration tests: exporting the landing fixture.

use pretty_assertions::assert_eq;
use sk_codegen::{ExportOptions, generate_component, generate_html, generate_stylesheet};
use sk_core::Project;

fn landing() -> Project {
    Project::from_json(include_str!("fixtures/landing.json")).unwrap()
}

#[test]
fn html_has_one_element_per_node() {
    let html = generate_html(&landing(), &ExportOptions::default());
    for id in ["hero", "headline", "cta", "shot", "posts"] {
        assert_eq!(
            html.matches(&format!("class=\"element-{id}\"")).count(),
            1,
            "{id}"
        );
        assert!(html.contains(&format!(".element-{id} {{")), "{id}");
    }
}

#[test]
fn html_head_uses_settings() {
    let html = generate_html(&landing(), &ExportOptions::default());
    assert!(html.contains("<title>Launch Day</title>"));
    assert!(html.contains("<meta name=\"description\" content=\"Everything ships today\">"));
    assert!(html.contains("<meta name=\"keywords\" content=\"launch, product\">"));
    // Custom CSS lands after the generated rules.
    let custom = html.find("font-family: system-ui").unwrap();
    let media = html.find("@media (max-width: 768px)").unwrap();
    assert!(media < custom);
}

#[test]
fn html_body_content() {
    let html = generate_html(&landing(), &ExportOptions::default());
    assert!(html.contains("<h1 class=\"element-headline\"># Launch Day</h1>"));
    assert!(html.contains("<a class=\"element-cta\" href=\"/signup\">Get started</a>"));
    assert!(html.contains(
        "<img class=\"element-shot\" src=\"/static/shot.png\" alt=\"Product screenshot\">"
    ));
    assert!(html.contains("<!-- section content: 2 nested element(s) not exported -->"));
    // Bound list: collection rows sliced to maxItems.
    assert!(html.contains("<h3 class=\"list-header\">Latest posts</h3>"));
    assert!(html.contains("Second post"));
    assert!(!html.contains("Third post"));
}

#[test]
fn animations_and_responsive_rules() {
    let css = generate_stylesheet(&landing(), &ExportOptions::default());
    assert!(css.contains("@keyframes sk-slideUp {"));
    assert!(css.contains("animation: sk-slideUp 800ms ease-out 0ms both;"));
    assert!(css.contains(".element-cta:hover {"));
    assert!(css.contains("transform: translateY(-4px);"));
    assert!(css.contains("@media (max-width: 768px) {\n  .element-shot {\n    display: none;\n  }\n}"));
}

#[test]
fn options_switch_sections_off() {
    let options = ExportOptions {
        include_reset: false,
        include_animations: false,
        include_responsive: false,
        ..Default::default()
    };
    let css = generate_stylesheet(&landing(), &options);
    assert!(!css.contains("box-sizing"));
    assert!(!css.contains("@keyframes"));
    assert!(!css.contains(":hover"));
    assert!(!css.contains("@media"));
}

#[test]
fn component_mirrors_html() {
    let project = landing();
    let export = generate_component(&project, None, &ExportOptions::default());
    assert_eq!(export.name, "LaunchPage");
    assert!(export.component.contains("import \"./LaunchPage.css\";"));
    assert!(export.component.contains("export default function LaunchPage() {"));
    assert!(
        export
            .component
            .contains("<h1 className=\"element-headline\"># Launch Day</h1>")
    );
    assert!(export.component.contains("{/* section content: 2 nested element(s) not exported */}"));
    assert!(export.component.contains("alt=\"Product screenshot\" />"));
    assert_eq!(
        export.stylesheet,
        generate_stylesheet(&project, &ExportOptions::default())
    );
    assert!(!export.component.contains("<script>"));
}

#[test]
fn export_does_not_mutate() {
    let project = landing();
    let before = project.clone();
    generate_html(&project, &ExportOptions::default());
    generate_component(&project, Some("X"), &ExportOptions::default());
    assert_eq!(project, before);
}
