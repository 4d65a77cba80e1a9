use anyhow::Context as _;
use clap::Args;
use sk_codegen::{ExportOptions, generate_component, generate_html};
use sk_core::{LintDiagnostic, LintSeverity, Project, lint_document};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Saved project (`.json`)
    pub input: PathBuf,

    /// Output file for HTML, output directory for components.
    /// HTML goes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// No indentation or line breaks in generated code
    #[arg(long)]
    pub compact: bool,

    /// Skip the global CSS reset
    #[arg(long)]
    pub no_reset: bool,
}

impl ExportArgs {
    fn options(&self) -> ExportOptions {
        ExportOptions {
            pretty: !self.compact,
            include_reset: !self.no_reset,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Saved project (`.json`)
    pub input: PathBuf,

    /// Print diagnostics as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub fn load_project(path: &Path) -> anyhow::Result<Project> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let project = Project::from_json(&text).with_context(|| format!("in {}", path.display()))?;
    log::info!(
        "loaded `{}` ({} elements) from {}",
        project.name,
        project.elements.len(),
        path.display()
    );
    Ok(project)
}

fn write_output(path: &Path, contents: &str) -> sk_core::Result<()> {
    fs::write(path, contents)
        .map_err(|e| sk_core::Error::ExportFailed(format!("{}: {e}", path.display())))
}

pub fn export_html(args: &ExportArgs) -> anyhow::Result<()> {
    let project = load_project(&args.input)?;
    let html = generate_html(&project, &args.options());
    match &args.output {
        Some(path) => {
            write_output(path, &html)?;
            println!("wrote {}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

/// Writes `<Name>.jsx` and `<Name>.css` into the output directory.
pub fn export_component(args: &ExportArgs, name: Option<&str>) -> anyhow::Result<()> {
    let project = load_project(&args.input)?;
    let export = generate_component(&project, name, &args.options());

    let dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)
        .map_err(|e| sk_core::Error::ExportFailed(format!("{}: {e}", dir.display())))?;

    for (file, contents) in [
        (export.component_file(), &export.component),
        (export.stylesheet_file(), &export.stylesheet),
    ] {
        let path = dir.join(file);
        write_output(&path, contents)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Prints findings; they never fail the command.
pub fn lint(args: &LintArgs) -> anyhow::Result<()> {
    let project = load_project(&args.input)?;
    let diags = lint_document(&project.document());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&diags)?);
    } else {
        print!("{}", format_diagnostics(&diags));
    }
    Ok(())
}

pub fn format_diagnostics(diags: &[LintDiagnostic]) -> String {
    if diags.is_empty() {
        return "no problems found\n".to_string();
    }
    let mut out = String::new();
    for d in diags {
        let severity = match d.severity {
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        let _ = writeln!(out, "{severity}[{}] {}: {}", d.rule, d.node_id, d.message);
    }
    let warnings = diags
        .iter()
        .filter(|d| d.severity == LintSeverity::Warning)
        .count();
    let _ = writeln!(out, "{} problem(s), {warnings} warning(s)", diags.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const PROJECT: &str = r#"{
        "name": "Cli Demo",
        "elements": [
            { "id": "box", "type": "container", "position": { "x": -5, "y": 0, "z": 0 },
              "dimensions": { "width": 100, "height": 100 }, "children": ["ghost"] }
        ]
    }"#;

    fn write_project(dir: &Path) -> PathBuf {
        let path = dir.join("project.json");
        fs::write(&path, PROJECT).unwrap();
        path
    }

    #[test]
    fn html_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let args = ExportArgs {
            input: write_project(dir.path()),
            output: Some(dir.path().join("index.html")),
            compact: false,
            no_reset: true,
        };
        export_html(&args).unwrap();
        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains("<title>Cli Demo</title>"));
        assert!(!html.contains("box-sizing"));
    }

    #[test]
    fn component_export_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let args = ExportArgs {
            input: write_project(dir.path()),
            output: Some(out.clone()),
            compact: false,
            no_reset: false,
        };
        export_component(&args, Some("Landing")).unwrap();
        assert!(out.join("Landing.jsx").exists());
        assert!(out.join("Landing.css").exists());
    }

    #[test]
    fn unwritable_output_is_export_failure() {
        let dir = TempDir::new().unwrap();
        let args = ExportArgs {
            input: write_project(dir.path()),
            output: Some(dir.path().join("no-such-dir").join("index.html")),
            compact: false,
            no_reset: false,
        };
        let err = export_html(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<sk_core::Error>(),
            Some(sk_core::Error::ExportFailed(_))
        ));
    }

    #[test]
    fn bad_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"elements\": 3 }").unwrap();
        assert!(load_project(&path).is_err());
        assert!(load_project(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn lint_report() {
        let project = Project::from_json(PROJECT).unwrap();
        let report = format_diagnostics(&lint_document(&project.document()));
        assert_eq!(
            report,
            "warning[negative-position] box: `box` sits at (-5, 0), outside the canvas.\n\
             warning[dangling-child] box: `box` references missing child `ghost`.\n\
             2 problem(s), 2 warning(s)\n"
        );
        assert_eq!(format_diagnostics(&[]), "no problems found\n");
    }
}
