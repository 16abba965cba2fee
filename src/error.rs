//! Errors raised while building a compatibility datapack.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that end the processing of a single mod archive.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither `fabric.mod.json` nor `META-INF/mods.toml` exists.
    #[error("no fabric.mod.json or META-INF/mods.toml found in {0}")]
    MetadataMissing(PathBuf),

    /// A metadata document exists but does not name the mod.
    #[error("invalid metadata in {path}: {reason}")]
    InvalidMetadata {
        /// The metadata document.
        path: PathBuf,
        /// Why it could not be read.
        reason: String,
    },

    /// The archive is Big Globe itself.
    #[error("{0} is the Big Globe mod")]
    SelfReference(String),

    /// The mod ships no configured features.
    #[error("no worldgen data found for mod {0}")]
    NoWorldgenData(String),

    /// The configured features contain no modded ore replacing a vanilla block.
    #[error("no ores found for mod {0}")]
    NoOresFound(String),

    /// Assembly produced neither a tag nor a worldgen document.
    #[error("datapack for mod {0} is empty")]
    EmptyDatapack(String),

    /// The mod archive could not be read.
    #[error("failed to extract {path}: {source}")]
    Extraction {
        /// The mod archive.
        path: PathBuf,
        /// Underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// A template is missing or is not valid JSON.
    #[error("failed to load template {path}: {reason}")]
    Template {
        /// The template file.
        path: PathBuf,
        /// Why it could not be loaded.
        reason: String,
    },

    /// Writing the datapack archive failed.
    #[error("failed to write datapack archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Serializing a rendered document failed.
    #[error("failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error only means there is nothing useful to generate for
    /// the mod, as opposed to something having gone wrong.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::MetadataMissing(_)
                | Self::InvalidMetadata { .. }
                | Self::SelfReference(_)
                | Self::NoWorldgenData(_)
                | Self::NoOresFound(_)
                | Self::EmptyDatapack(_)
        )
    }
}
