//! Schema Config CLI
//!
//! View and manage schema downloader configuration.

use clap::{Parser, Subcommand};
use pubsub_schemas::{DownloadConfig, DownloadPlan};

#[derive(Parser)]
#[command(name = "schema-config")]
#[command(about = "View and manage schema downloader configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path (default: schemas.toml)
        #[arg(short, long, default_value = "schemas.toml")]
        output: String,
    },

    /// Validate configuration, including patterns and versions
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = DownloadConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Schema Download Configuration\n");
                println!("Registry:");
                println!("  Project: {}", cfg.registry.project);
                println!("  Endpoint: {}", cfg.registry.endpoint);
                println!("  Access token: {}", if cfg.registry.access_token.is_some() { "set" } else { "unset" });
                println!("  Timeout: {}s", cfg.registry.timeout_secs);

                println!("\nDownload:");
                println!("  Output: {:?}", cfg.download.output_directory);
                println!("  Type: {}", cfg.download.schema_type.as_deref().unwrap_or("all"));
                println!("  Skip: {}", cfg.download.skip);

                if !cfg.download.patterns.is_empty() {
                    println!("\nPatterns:");
                    for (i, pattern) in cfg.download.patterns.iter().enumerate() {
                        match cfg.download.versions.get(i) {
                            Some(version) => println!("  {} -> @{}", pattern, version),
                            None => println!("  {}", pattern),
                        }
                    }
                }
            }
        }

        Commands::Init { output } => {
            let cfg = DownloadConfig::default();
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => {
            let loaded = DownloadConfig::load_from(config.as_deref())
                .map_err(Box::<dyn std::error::Error>::from)
                .and_then(|cfg| {
                    DownloadPlan::from_settings(&cfg.download)
                        .map(|plan| (cfg, plan))
                        .map_err(Into::into)
                });

            match loaded {
                Ok((cfg, plan)) => {
                    println!("✅ Configuration is valid");
                    println!("   Project: {}", plan.project);
                    println!("   Output: {:?}", cfg.download.output_directory);
                    println!("   Patterns: {}", plan.matcher.entries().len());
                }
                Err(e) => {
                    eprintln!("❌ Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
