pub mod map;
pub mod slice;

use crate::error::{CliError, Result};
use resmap::core::io::store::ResidueStoreFile;
use resmap::core::io::traits::EntryFile;
use resmap::core::models::entry::Entry;
use std::path::Path;
use tracing::info;

fn read_entry(path: &Path) -> Result<Entry> {
    info!("Loading residue store from {:?}", path);
    ResidueStoreFile::read_from_path(path).map_err(|source| CliError::Store {
        path: path.to_path_buf(),
        source,
    })
}
