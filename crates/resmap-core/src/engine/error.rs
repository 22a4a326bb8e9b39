use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error(
        "Requested range [{start}, {end}) has no coordinates at sequence position {position}"
    )]
    RequestedRangeHasGaps {
        start: usize,
        end: usize,
        position: usize,
    },

    #[error("Invalid range [{start}, {end}) for a sequence of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Chain '{0}' not found in entry")]
    UnknownChain(char),

    #[error("Model {number} not found for chain '{chain}'")]
    UnknownModel { chain: char, number: i32 },

    #[error("Mapping error: {source}")]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
