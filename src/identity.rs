//! Resolution of a mod's id from its packaged metadata.

use std::{fmt::Display, fs, path::Path};

use getset::Getters;
use serde::Deserialize;

use crate::{
    config::{FABRIC_METADATA, FORGE_METADATA, SELF_MOD_ID},
    error::{Error, Result},
};

/// Metadata format a mod declares itself in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataDialect {
    /// `fabric.mod.json`
    Fabric,
    /// `META-INF/mods.toml`
    Forge,
}

impl Display for MetadataDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fabric => f.write_str("Fabric"),
            Self::Forge => f.write_str("Forge"),
        }
    }
}

/// Identity of an unpacked mod.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ModIdentity {
    /// The mod id, used verbatim as a namespace segment.
    #[get = "pub"]
    mod_name: String,
    /// Which metadata document the id was read from.
    #[get = "pub"]
    dialect: MetadataDialect,
}

#[derive(Deserialize)]
struct FabricMetadata {
    id: String,
}

#[derive(Deserialize)]
struct ForgeMetadata {
    mods: Vec<ForgeMod>,
}

#[derive(Deserialize)]
struct ForgeMod {
    #[serde(rename = "modId")]
    mod_id: String,
}

impl ModIdentity {
    /// Resolve the identity of the mod unpacked at `mod_dir`.
    ///
    /// `fabric.mod.json` takes precedence over `META-INF/mods.toml`.
    ///
    /// # Errors
    /// - [`Error::MetadataMissing`] if neither document exists
    /// - [`Error::InvalidMetadata`] if the document does not name the mod
    /// - [`Error::SelfReference`] if the mod is Big Globe itself
    #[tracing::instrument(level = "debug", skip_all, fields(mod_dir = %mod_dir.display()))]
    pub fn resolve(mod_dir: &Path) -> Result<Self> {
        let fabric = mod_dir.join(FABRIC_METADATA);
        let forge = mod_dir.join(FORGE_METADATA);

        let identity = if fabric.is_file() {
            let metadata: FabricMetadata = serde_json::from_str(&fs::read_to_string(&fabric)?)
                .map_err(|err| invalid(&fabric, err))?;
            Self {
                mod_name: metadata.id,
                dialect: MetadataDialect::Fabric,
            }
        } else if forge.is_file() {
            let metadata: ForgeMetadata = toml::from_str(&fs::read_to_string(&forge)?)
                .map_err(|err| invalid(&forge, err))?;
            let first = metadata
                .mods
                .into_iter()
                .next()
                .ok_or_else(|| invalid(&forge, "no [[mods]] entry"))?;
            Self {
                mod_name: first.mod_id,
                dialect: MetadataDialect::Forge,
            }
        } else {
            return Err(Error::MetadataMissing(mod_dir.to_path_buf()));
        };

        tracing::info!(
            "{} mod detected: {}",
            identity.dialect,
            identity.mod_name
        );

        if identity.mod_name == SELF_MOD_ID {
            return Err(Error::SelfReference(identity.mod_name));
        }

        Ok(identity)
    }
}

fn invalid(path: &Path, reason: impl Display) -> Error {
    Error::InvalidMetadata {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
