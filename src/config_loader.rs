use crate::config::PipelineConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse pipeline configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<PipelineConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: PipelineConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Load the configuration file if one was given, otherwise use the defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<PipelineConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using built-in defaults");
            Ok(PipelineConfig::default())
        }
    }
}

/// Command-line switches that override values from the configuration file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub strict: bool,
    pub deny_collisions: bool,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut PipelineConfig, overrides: &CliOverrides) -> Result<()> {
    if overrides.strict {
        info!("Unknown vendors will fail synthesis (--strict)");
        config.synthesis.strictness = crate::config::Strictness::Strict;
    }

    if overrides.deny_collisions {
        info!("Subnet collisions will abort allocation (--deny-collisions)");
        config.addressing.deny_collisions = true;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
