use resmap::core::models::atom::ALPHA_CARBON_ATOM_NAME;
use resmap::engine::config::{DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN};

pub struct DefaultsConfig {
    pub gap_open: i32,
    pub gap_extend: i32,
    pub ca_atom: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
            ca_atom: ALPHA_CARBON_ATOM_NAME.to_string(),
        }
    }
}
