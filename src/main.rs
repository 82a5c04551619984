use std::io::{ self, BufWriter };
use std::process;
use clap::{ Parser, ArgAction };
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod error;
mod package;
mod utils;
mod metadata;
mod tree;
mod github_raw;
mod license_resolver;
mod summary;
mod report;

use error::Result;
use github_raw::{ FetchConfig, GithubRawFetcher };
use license_resolver::LicenseResolver;
use metadata::WorkspaceMetadata;
use report::ReportFormat;

/// Summarize the licenses of a workspace package's third-party dependencies.
///
/// Run from anywhere inside the Cargo workspace.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workspace package whose dependency tree should be summarized
    #[arg(index = 1, value_name = "PACKAGE")]
    package: String,

    /// Print a JSON array instead of the plain-text report
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr so they never mix with the report; RUST_LOG=info shows progress
    tracing_subscriber
        ::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(io::stderr)
        .without_time()
        .init();

    if let Err(e) = run(&args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let metadata = WorkspaceMetadata::load()?;
    let deps = tree::resolve_dependencies(&metadata, &args.package)?;

    let config = FetchConfig::default();
    let fetcher = GithubRawFetcher::new(&config)?;
    let resolver = LicenseResolver::new(config, &fetcher);
    let licenses = summary::collect_licenses(&metadata, &deps, &resolver)?;

    let format = if args.json { ReportFormat::Json } else { ReportFormat::Text };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    report::write_report(&licenses, format, &mut out)
}
