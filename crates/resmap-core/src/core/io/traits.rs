use crate::core::models::entry::Entry;
use flate2::read::GzDecoder;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading structure entries from a file format.
///
/// Implementors handle format-specific parsing and hand record-level facts to
/// an [`EntryBuilder`](crate::core::models::builder::EntryBuilder).
pub trait EntryFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads an entry from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    /// * `source` - The path the data came from, used to derive a missing id code.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead, source: Option<&Path>) -> Result<Entry, Self::Error>;

    /// Reads an entry from a file path, decompressing `.gz` files transparently.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Entry, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if is_gzipped(path) {
            let mut reader = BufReader::new(GzDecoder::new(file));
            Self::read_from(&mut reader, Some(path))
        } else {
            let mut reader = BufReader::new(file);
            Self::read_from(&mut reader, Some(path))
        }
    }
}

pub(crate) fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
