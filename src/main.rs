use clap::{Parser, Subcommand};
use color_eyre::eyre::bail;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;

use topogen::config::PipelineConfig;
use topogen::config_loader::{self, CliOverrides};
use topogen::ip::AllocationReport;
use topogen::orchestrator;

/// Topology-driven network configuration generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the pipeline configuration YAML file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a text description into a topology document
    Ingest {
        /// Text file with device and link lines
        #[arg(short, long)]
        input: PathBuf,

        /// Topology document to write
        #[arg(short, long, default_value = "topology_data.json")]
        document: PathBuf,

        /// Lab name stored in the document
        #[arg(short, long, default_value = "Network_Lab")]
        name: String,
    },

    /// Allocate /30 addresses for every link
    Allocate {
        #[arg(short, long, default_value = "topology_data.json")]
        document: PathBuf,

        /// Fail instead of writing when subnets collide
        #[arg(long)]
        deny_collisions: bool,
    },

    /// Render one configuration file per device
    Synthesize {
        #[arg(short, long, default_value = "topology_data.json")]
        document: PathBuf,

        /// Output directory for <device_id>.txt files
        #[arg(short, long, default_value = "configs")]
        output: PathBuf,

        /// Fail on devices with an unsupported vendor
        #[arg(long)]
        strict: bool,
    },

    /// Report data-quality problems in a topology document
    Check {
        #[arg(short, long, default_value = "topology_data.json")]
        document: PathBuf,
    },

    /// Ingest, allocate and synthesize in one go
    Run {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "topology_data.json")]
        document: PathBuf,

        #[arg(short, long, default_value = "configs")]
        output: PathBuf,

        #[arg(short, long, default_value = "Network_Lab")]
        name: String,

        #[arg(long)]
        deny_collisions: bool,

        #[arg(long)]
        strict: bool,
    },
}

impl Commands {
    fn overrides(&self) -> CliOverrides {
        match *self {
            Commands::Allocate { deny_collisions, .. } => CliOverrides {
                deny_collisions,
                ..CliOverrides::default()
            },
            Commands::Synthesize { strict, .. } => CliOverrides {
                strict,
                ..CliOverrides::default()
            },
            Commands::Run {
                deny_collisions,
                strict,
                ..
            } => CliOverrides {
                strict,
                deny_collisions,
            },
            Commands::Ingest { .. } | Commands::Check { .. } => CliOverrides::default(),
        }
    }
}

fn load_pipeline_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = config_loader::load_or_default(cli.config.as_deref())?;
    config_loader::apply_overrides(&mut config, &cli.command.overrides())?;
    Ok(config)
}

fn log_allocation(report: &AllocationReport) {
    info!(
        "Allocated {} link(s), {} issue(s), {} malformed link(s) skipped",
        report.assignments.len(),
        report.issues.len(),
        report.skipped
    );
    if report.has_collisions() {
        warn!("Subnet collisions found; devices on colliding links will share a subnet");
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    let config = load_pipeline_config(&cli)?;

    match &cli.command {
        Commands::Ingest { input, document, name } => {
            let summary = orchestrator::ingest(input, document, name)?;
            info!(
                "Ingested {} device(s) and {} link(s) into {:?}",
                summary.devices, summary.links, document
            );
        }
        Commands::Allocate { document, .. } => {
            let report = orchestrator::allocate(document, &config)?;
            log_allocation(&report);
        }
        Commands::Synthesize { document, output, .. } => {
            orchestrator::synthesize(document, output, &config)?;
        }
        Commands::Check { document } => {
            let report = orchestrator::check(document)?;
            if report.is_clean() {
                println!("{:?}: no issues found", document);
            } else {
                for issue in &report.issues {
                    println!("{}", issue);
                }
                bail!("{} issue(s) found in {:?}", report.issues.len(), document);
            }
        }
        Commands::Run {
            input,
            document,
            output,
            name,
            ..
        } => {
            let summary = orchestrator::run(input, document, output, name, &config)?;
            log_allocation(&summary.allocation);
            info!("Configurations written to {:?}", output);
        }
    }

    Ok(())
}
