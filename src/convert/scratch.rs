use crate::error::Result;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const SOURCE_FILE_NAME: &str = "source.gpkg";

/// A private copy of the source GeoPackage inside its own temporary directory.
///
/// SQLite may create `-wal`, `-shm` or `-journal` files beside the copy, so
/// the whole directory is removed on drop rather than the file alone.
#[derive(Debug)]
pub(crate) struct ScratchGpkg {
    _dir: TempDir,
    path: PathBuf,
}

impl ScratchGpkg {
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Copy `source` into a fresh `.gpkg` file in a new temporary directory under
/// `temp_dir` (or the system temporary directory).
///
/// Nothing is left behind when copying fails part way.
pub(crate) fn persist_source(source: &mut dyn Read, temp_dir: Option<&Path>) -> Result<ScratchGpkg> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("gpkg-geojson-");
    let dir = match temp_dir {
        Some(parent) => builder.tempdir_in(parent)?,
        None => builder.tempdir()?,
    };

    let path = dir.path().join(SOURCE_FILE_NAME);
    let mut file = File::create(&path)?;
    let written = std::io::copy(source, &mut file)?;
    file.flush()?;
    debug!(path = %path.display(), bytes = written, "persisted GeoPackage source");

    Ok(ScratchGpkg { _dir: dir, path })
}
