//! Processing of mod archives into compat datapacks.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{datapack_name, Config, ARCHIVE_EXTENSION},
    datapack::Datapack,
    discover::discover_ores,
    error::{Error, Result},
    extract::extract,
    identity::ModIdentity,
    template::TemplateSet,
    util::WorkDir,
    virtual_fs::VFolder,
};

/// Directory inside an archive's scratch directory the archive is unpacked to.
const UNPACKED_DIR: &str = "unpacked";

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Archives written to the output directory.
    pub produced: Vec<PathBuf>,
    /// Mod archives that had nothing to generate, with the reason.
    pub skipped: Vec<(PathBuf, Error)>,
    /// Mod archives whose processing failed.
    pub failed: Vec<(PathBuf, Error)>,
}

/// List the mod archives in `mods_dir`, sorted by file name.
///
/// # Errors
/// - If the directory cannot be read
pub fn find_archives(mods_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = fs::read_dir(mods_dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|extension| extension == ARCHIVE_EXTENSION)
        })
        .collect::<Vec<_>>();
    archives.sort();
    Ok(archives)
}

/// Build a compat datapack for every mod archive in the mods directory.
///
/// Every archive is processed on its own: a mod that is skipped or fails is
/// recorded in the report and the batch moves on.
///
/// # Errors
/// - If the mods directory cannot be read
#[tracing::instrument(level = "debug", skip_all)]
pub fn run_batch(config: &Config, templates: &TemplateSet) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for archive in find_archives(&config.mods_dir)? {
        tracing::info!("Building datapack for {}", archive.display());
        match process_archive(&archive, config, templates) {
            Ok(output) => {
                tracing::info!("Wrote {}", output.display());
                report.produced.push(output);
            }
            Err(err) if err.is_skip() => {
                tracing::info!("Skipping {}: {err}", archive.display());
                report.skipped.push((archive, err));
            }
            Err(err) => {
                tracing::error!("Failed to build datapack for {}: {err}", archive.display());
                report.failed.push((archive, err));
            }
        }
    }

    tracing::info!(
        "Done: {} datapacks written, {} mods skipped, {} failed",
        report.produced.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Build the compat datapack for a single mod archive and move it into the
/// output directory.
///
/// The archive is unpacked and assembled inside its own scratch directory
/// (see [`Config::scratch_dir`]), which is removed on every path, so a mod
/// that produces nothing leaves nothing behind.
///
/// # Errors
/// - Any [`Error`] ending the processing of this mod; see [`Error::is_skip`]
#[tracing::instrument(level = "debug", skip(config, templates))]
pub fn process_archive(archive: &Path, config: &Config, templates: &TemplateSet) -> Result<PathBuf> {
    let scratch = WorkDir::create(config.scratch_dir(archive))?;
    let mod_package = extract(archive, &scratch.path().join(UNPACKED_DIR))?;
    let identity = ModIdentity::resolve(mod_package.path())?;
    let mod_name = identity.mod_name();

    let discovery = discover_ores(mod_package.path(), mod_name)?;
    let datapack = Datapack::render(mod_name, &discovery, templates);

    assemble(&datapack, scratch.path(), &config.output_dir)
}

/// Write `datapack` to a staging directory inside `work_dir`, zip it and move
/// the archive into `output_dir`.
///
/// The staging directory holds both the datapack tree and the zipped archive
/// and is removed whether or not the archive reaches `output_dir`.
///
/// # Errors
/// - [`Error::EmptyDatapack`] if the datapack contains neither tag nor feature
/// - [`Error::Io`] or [`Error::Archive`] if writing fails
#[tracing::instrument(level = "debug", skip_all, fields(mod_name = datapack.mod_name()))]
pub fn assemble(datapack: &Datapack, work_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
    let name = datapack_name(datapack.mod_name());
    let staging = WorkDir::create(work_dir.join(&name))?;
    let datapack_dir = staging.path().join(&name);
    datapack.compile()?.place(&datapack_dir)?;

    let placed = VFolder::try_from(datapack_dir.as_path())?;
    if datapack.is_empty() || placed.get_folder("data").map_or(true, VFolder::is_empty) {
        return Err(Error::EmptyDatapack(datapack.mod_name().to_string()));
    }

    let archive_name = format!("{name}.zip");
    let staged = staging.path().join(&archive_name);
    placed.zip(&staged)?;

    fs::create_dir_all(output_dir)?;
    let destination = output_dir.join(&archive_name);
    if destination.exists() {
        fs::remove_file(&destination)?;
    }
    move_file(&staged, &destination)?;

    Ok(destination)
}

/// Move a file, copying it when source and destination are on different
/// file systems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}
