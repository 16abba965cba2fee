//! Unpacking of mod archives.

use std::{fs, io, path::Path};

use zip::ZipArchive;

use crate::{
    error::{Error, Result},
    util::WorkDir,
};

/// Unpack the archive at `archive` into a fresh working directory at
/// `target`.
///
/// Entries whose path would leave the working directory are skipped. The
/// working directory is removed again if extraction fails.
///
/// # Errors
/// - [`Error::Extraction`] if the archive cannot be read
/// - [`Error::Io`] if the working directory cannot be written
#[tracing::instrument(level = "debug", skip(target))]
pub fn extract(archive: &Path, target: &Path) -> Result<WorkDir> {
    let file = fs::File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|source| extraction_error(archive, source))?;

    let unpacked = WorkDir::create(target)?;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|source| extraction_error(archive, source))?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping unsafe entry {} in {}", entry.name(), archive.display());
            continue;
        };
        let output = unpacked.path().join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&output)?;
        } else {
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&output)?;
            io::copy(&mut entry, &mut outfile)?;
        }
    }

    tracing::debug!("Extracted {} entries", zip.len());
    Ok(unpacked)
}

fn extraction_error(archive: &Path, source: zip::result::ZipError) -> Error {
    Error::Extraction {
        path: archive.to_path_buf(),
        source,
    }
}
