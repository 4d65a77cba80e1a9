//! `sitekit` — export saved projects and check them from the shell.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ExportArgs, LintArgs};

/// SiteKit page builder tools
#[derive(Parser, Debug)]
#[command(name = "sitekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a project file
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },

    /// Report problems in a project file
    Lint(LintArgs),
}

#[derive(Subcommand, Debug)]
enum ExportTarget {
    /// One self-contained HTML document
    Html(ExportArgs),

    /// A function component plus its stylesheet
    Component {
        #[command(flatten)]
        args: ExportArgs,

        /// Component name (defaults to the project name)
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Command::Export { target } => match target {
            ExportTarget::Html(args) => commands::export_html(&args),
            ExportTarget::Component { args, name } => {
                commands::export_component(&args, name.as_deref())
            }
        },
        Command::Lint(args) => commands::lint(&args),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
