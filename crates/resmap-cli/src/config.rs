mod defaults;

use crate::cli::EngineArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use resmap::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAlignmentConfig {
    #[serde(rename = "gap-open")]
    gap_open: Option<i32>,
    #[serde(rename = "gap-extend")]
    gap_extend: Option<i32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialCorrespondenceConfig {
    alignment: Option<PartialAlignmentConfig>,
    #[serde(rename = "ca-atom")]
    ca_atom: Option<String>,
}

impl PartialCorrespondenceConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named in the arguments, or starts empty when none is given.
    pub fn load(args: &EngineArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves every value as CLI argument, then file value, then built-in default.
    pub fn merge_with_cli(mut self, args: &EngineArgs) -> Result<core_config::CorrespondenceConfig> {
        let defaults = DefaultsConfig::default();
        let alignment = self.alignment.take().unwrap_or_default();

        let ca_atom = args
            .ca_atom
            .clone()
            .or(self.ca_atom)
            .unwrap_or(defaults.ca_atom);

        core_config::CorrespondenceConfigBuilder::new()
            .gap_open(
                args.gap_open
                    .or(alignment.gap_open)
                    .unwrap_or(defaults.gap_open),
            )
            .gap_extend(
                args.gap_extend
                    .or(alignment.gap_extend)
                    .unwrap_or(defaults.gap_extend),
            )
            .ca_atom_name(&ca_atom)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}
