use crate::core::models::atom::ALPHA_CARBON_ATOM_NAME;
use thiserror::Error;

pub const DEFAULT_GAP_OPEN: i32 = -10;
pub const DEFAULT_GAP_EXTEND: i32 = -1;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Affine gap penalties for the alignment fallback. Both are non-positive scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentConfig {
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrespondenceConfig {
    pub alignment: AlignmentConfig,
    /// Atom used as each residue's positional proxy in coordinate views.
    pub ca_atom_name: String,
}

impl CorrespondenceConfig {
    /// Checks that gap penalties are not positive and the proxy atom name is not blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alignment.gap_open > 0 {
            return Err(ConfigError::InvalidParameter {
                name: "gap_open",
                reason: format!(
                    "penalty must not be positive, got {}",
                    self.alignment.gap_open
                ),
            });
        }
        if self.alignment.gap_extend > 0 {
            return Err(ConfigError::InvalidParameter {
                name: "gap_extend",
                reason: format!(
                    "penalty must not be positive, got {}",
                    self.alignment.gap_extend
                ),
            });
        }
        if self.ca_atom_name.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "ca_atom_name",
                reason: "atom name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for CorrespondenceConfig {
    fn default() -> Self {
        Self {
            alignment: AlignmentConfig::default(),
            ca_atom_name: ALPHA_CARBON_ATOM_NAME.to_string(),
        }
    }
}

#[derive(Default)]
pub struct CorrespondenceConfigBuilder {
    gap_open: Option<i32>,
    gap_extend: Option<i32>,
    ca_atom_name: Option<String>,
}

impl CorrespondenceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gap_open(mut self, penalty: i32) -> Self {
        self.gap_open = Some(penalty);
        self
    }
    pub fn gap_extend(mut self, penalty: i32) -> Self {
        self.gap_extend = Some(penalty);
        self
    }
    pub fn ca_atom_name(mut self, name: &str) -> Self {
        self.ca_atom_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<CorrespondenceConfig, ConfigError> {
        let alignment = AlignmentConfig {
            gap_open: self.gap_open.unwrap_or(DEFAULT_GAP_OPEN),
            gap_extend: self.gap_extend.unwrap_or(DEFAULT_GAP_EXTEND),
        };
        let ca_atom_name = self
            .ca_atom_name
            .unwrap_or_else(|| ALPHA_CARBON_ATOM_NAME.to_string());

        let config = CorrespondenceConfig {
            alignment,
            ca_atom_name,
        };
        config.validate()?;
        Ok(config)
    }
}
