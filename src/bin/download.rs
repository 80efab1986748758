//! Schema Download CLI
//!
//! Downloads schemas from the Pub/Sub schema registry into local files.
//! Command-line flags override values from schemas.toml and SCHEMAS__* env vars.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use pubsub_schemas::{DownloadConfig, HttpSchemaService, SchemaDownloader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-download")]
#[command(about = "Download Avro and Protocol Buffer schemas from a Pub/Sub schema registry")]
#[command(version)]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long)]
    config: Option<String>,

    /// Project that owns the schemas
    #[arg(short, long)]
    project: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only download this type (AVRO or PROTOCOL_BUFFER)
    #[arg(short = 't', long)]
    schema_type: Option<String>,

    /// Schema name pattern (repeatable, checked in order)
    #[arg(long = "pattern")]
    patterns: Vec<String>,

    /// Revision for the pattern at the same position (repeatable)
    #[arg(long = "schema-version")]
    versions: Vec<String>,

    /// Registry REST endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// OAuth2 access token
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Skip the download
    #[arg(long)]
    skip: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = DownloadConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    config.download.output_directory = config.output_path();

    let registry = &config.registry;
    let service = HttpSchemaService::with_timeout(
        registry.endpoint.clone(),
        registry.access_token.clone(),
        Duration::from_secs(registry.timeout_secs),
    )
    .context("Failed to create schema service client")?;

    let mut downloader = SchemaDownloader::new(config.download.clone(), Box::new(service));
    let report = downloader
        .execute()
        .with_context(|| format!("Schema download failed for project '{}'", config.download.project))?;

    if report.skipped {
        println!("⏭️  Schema download skipped");
        return Ok(());
    }

    println!("✅ Downloaded {} schemas", report.saved.len());
    for path in &report.saved {
        println!("   - {}", path.display());
    }
    if !report.filtered.is_empty() {
        println!("   ({} schemas filtered out)", report.filtered.len());
    }
    Ok(())
}

fn apply_overrides(config: &mut DownloadConfig, cli: &Cli) {
    if let Some(project) = &cli.project {
        config.registry.project = project.clone();
        config.download.project = project.clone();
    }
    if let Some(output) = &cli.output {
        config.download.output_directory = output.clone();
    }
    if let Some(schema_type) = &cli.schema_type {
        config.download.schema_type = Some(schema_type.clone());
    }
    if !cli.patterns.is_empty() {
        config.download.patterns = cli.patterns.clone();
    }
    if !cli.versions.is_empty() {
        config.download.versions = cli.versions.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.registry.endpoint = endpoint.clone();
    }
    if cli.access_token.is_some() {
        config.registry.access_token = cli.access_token.clone();
    }
    if cli.skip {
        config.download.skip = true;
    }
}
