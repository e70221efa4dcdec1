//! routelens CLI - list the HTTP routes of a project or a single file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use routelens::config::CONFIG_FILE;
use routelens::scan::FileResult;
use routelens::{scan_project, Dispatcher, RouteDescriptor, RouteLensConfig, ScanReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser)]
#[command(name = "routelens")]
#[command(about = "Static HTTP route discovery for Express and NestJS", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project directory
    Scan {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Config file (default: <ROOT>/routelens.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Extract routes from a single file
    File {
        path: PathBuf,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan { root, json, config } => {
            let config_path = config.unwrap_or_else(|| root.join(CONFIG_FILE));
            let config = RouteLensConfig::load(&config_path)
                .with_context(|| format!("loading {}", config_path.display()))?;
            let dispatcher = config.dispatcher();

            let report = scan_project(&root, &config.scan, &dispatcher);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Commands::File { path, json } => {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let outcome = Dispatcher::default().dispatch(&source, &path);

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                for route in &outcome.routes {
                    print_route(route);
                }
                for error in &outcome.errors {
                    eprintln!("{}:{}", path.display(), error);
                }
            }
        }
    }

    Ok(())
}

fn print_route(route: &RouteDescriptor) {
    println!(
        "{:<7} {} -> {} {}:{}",
        route.method,
        route.path,
        route.handler,
        route.source_location.file.display(),
        route.source_location.line
    );
}

fn print_report(report: &ScanReport) {
    for route in report.routes() {
        print_route(route);
    }

    for file in report.files_with_errors() {
        let path = display(&report.root, &file.path);
        match &file.result {
            FileResult::Parsed(outcome) => {
                for error in &outcome.errors {
                    eprintln!("{}:{}", path, error);
                }
            }
            FileResult::Unreadable { message } => eprintln!("{}: {}", path, message),
        }
    }

    println!(
        "\n{} routes in {} files ({} with errors)",
        report.route_count(),
        report.file_count(),
        report.error_count()
    );
}

fn display(root: &Path, relative: &Path) -> String {
    root.join(relative).display().to_string()
}
