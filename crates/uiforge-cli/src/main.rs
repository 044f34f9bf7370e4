use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uiforge_core::ForgeConfig;

mod commands;

use commands::{CheckOptions, GenerateOptions, RenderOptions};

/// Config file picked up from the working directory when --config is absent
const DEFAULT_CONFIG_FILE: &str = "uiforge.toml";

/// UIForge - compile UI component IR into Astro components
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (default: ./uiforge.toml if present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an IR file and list every error
    Validate {
        ir: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render an IR file to Astro source
    Render {
        ir: PathBuf,

        /// Style adapter used when the IR names none
        #[arg(long, value_name = "ID")]
        style_system: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Type-check an Astro source file with the configured checker
    Check {
        source: PathBuf,

        /// Component name used for the scratch file
        #[arg(long)]
        name: String,

        /// Let the LLM repair the source within the configured budget
        #[arg(long)]
        repair: bool,

        /// Where to write the (possibly repaired) source
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Synthesize, render and compile one component
    Generate {
        /// PascalCase component name
        #[arg(long)]
        name: String,

        /// What the component should show
        #[arg(long)]
        request: String,

        /// Extra requirement, repeatable
        #[arg(long = "requirement", value_name = "TEXT")]
        requirements: Vec<String>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// Print the full artifact as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { ir, json } => {
            let report = commands::validate(&ir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.valid {
                println!("✓ {} is valid", ir.display());
            } else {
                println!("✗ {} has {} error(s):", ir.display(), report.errors.len());
                for error in &report.errors {
                    println!("  - {}", error);
                }
            }
            if !report.valid {
                anyhow::bail!("validation failed");
            }
        }
        Commands::Render { ir, style_system, out } => {
            let artifact = commands::render(
                &config,
                &RenderOptions {
                    input: ir,
                    style_system,
                    out: out.clone(),
                },
            )?;
            if let Some(path) = out {
                eprintln!("✓ Wrote {} (blake3 {})", path.display(), artifact.content_hash);
            }
            if artifact.has_placeholders() {
                tracing::info!("Unresolved placeholders: {:?}", artifact.placeholders);
            }
        }
        Commands::Check { source, name, repair, out } => {
            let outcome = commands::check(
                &config,
                &CheckOptions {
                    source,
                    name: name.clone(),
                    repair,
                    out,
                },
            )
            .await?;
            println!(
                "✓ {} compiles ({} attempt(s), {} repair(s))",
                name, outcome.compile_attempts, outcome.repairs_used
            );
        }
        Commands::Generate {
            name,
            request,
            requirements,
            out,
            json,
        } => {
            let (path, artifact) = commands::generate(
                &config,
                &GenerateOptions {
                    name,
                    request,
                    requirements,
                    out_dir: out,
                },
            )
            .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&artifact)?);
            } else {
                println!("✓ {} -> {}", artifact.component_name, path.display());
                println!("  IR: {}  score: {:.2}", artifact.ir_origin, artifact.critic.score);
                println!("  compile attempts: {}", artifact.repair.compile_attempts);
                if !artifact.placeholders.is_empty() {
                    println!("  placeholders: {:?}", artifact.placeholders);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ForgeConfig> {
    let mut config = match path {
        Some(path) => ForgeConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => ForgeConfig::from_file(DEFAULT_CONFIG_FILE)?,
        None => ForgeConfig::new(),
    };
    config.apply_env()?;
    Ok(config)
}
