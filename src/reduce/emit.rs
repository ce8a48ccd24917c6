use crate::codec::write_records;
use crate::error::{ReduceError, Result};
use crate::KeyValue;
use atomicwrites::{AllowOverwrite, AtomicFile};
use std::fs;
use std::io;
use std::path::Path;

/// Writes `records` to `path` in the order given.
///
/// The file only appears at `path` once every record is written and synced;
/// if anything fails along the way nothing is left at `path`.
pub fn emit(path: &Path, records: &[KeyValue]) -> Result<()> {
    // The staging file has to live next to the destination for the rename to be atomic.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    AtomicFile::new_with_tmpdir(path, AllowOverwrite, dir)
        .write(|f| write_records(f, records).map(|_| ()))
        .map_err(|e| {
            let source = match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
            };
            destination_unavailable(path, source)
        })
}

/// Removes whatever an earlier attempt left at `path`.
pub fn discard(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(destination_unavailable(path, e)),
    }
}

fn destination_unavailable(path: &Path, source: io::Error) -> ReduceError {
    ReduceError::DestinationUnavailable {
        path: path.to_path_buf(),
        source,
    }
}
