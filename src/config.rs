//! Run configuration and process-wide constants.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Namespace of the base game.
pub const VANILLA_NAMESPACE: &str = "minecraft";

/// Mod id of Big Globe itself. Archives resolving to this id are skipped and
/// every generated namespace is prefixed with it.
pub const SELF_MOD_ID: &str = "bigglobe";

/// Extension of the mod archives picked up from the mods directory.
pub const ARCHIVE_EXTENSION: &str = "jar";

/// Metadata document of Fabric mods, relative to the archive root.
pub const FABRIC_METADATA: &str = "fabric.mod.json";

/// Metadata document of Forge mods, relative to the archive root.
pub const FORGE_METADATA: &str = "META-INF/mods.toml";

/// Prefix of the per-archive scratch directories created in the work directory.
pub const SCRATCH_PREFIX: &str = ".bigglobe-compat-";

/// Namespace the generated datapack writes its documents into.
#[must_use]
pub fn compat_namespace(mod_name: &str) -> String {
    format!("{SELF_MOD_ID}_{mod_name}")
}

/// Name of the datapack directory and, with `.zip` appended, of its archive.
#[must_use]
pub fn datapack_name(mod_name: &str) -> String {
    format!("{mod_name}_compat_datapack")
}

/// Directories a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory scanned for mod archives.
    pub mods_dir: PathBuf,
    /// Directory holding the six JSON templates.
    pub templates_dir: PathBuf,
    /// Directory receiving the finished datapack archives.
    pub output_dir: PathBuf,
    /// Directory holding the scratch directories archives are unpacked and
    /// assembled in.
    pub work_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mods_dir: PathBuf::from("mods"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("datapacks"),
            work_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Create a configuration with every directory placed under `root`.
    #[must_use]
    pub fn rooted_at(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            mods_dir: root.join(defaults.mods_dir),
            templates_dir: root.join(defaults.templates_dir),
            output_dir: root.join(defaults.output_dir),
            work_dir: root.to_path_buf(),
        }
    }

    /// Get the scratch directory `archive` is processed in: the archive's file
    /// stem behind [`SCRATCH_PREFIX`], inside the work directory.
    #[must_use]
    pub fn scratch_dir(&self, archive: &Path) -> PathBuf {
        let stem = archive
            .file_stem()
            .map_or_else(|| archive.as_os_str().to_owned(), ToOwned::to_owned);
        let mut name = OsString::from(SCRATCH_PREFIX);
        name.push(stem);
        self.work_dir.join(name)
    }
}
