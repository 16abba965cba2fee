//! Discovery of the ores a mod places through vanilla configured features.

use std::{fs, path::Path};

use getset::Getters;
use serde_json::Value;

use crate::{
    config::{compat_namespace, VANILLA_NAMESPACE},
    error::{Error, Result},
};

/// A modded ore replacing a vanilla block or block tag.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[get = "pub"]
pub struct OreDescriptor {
    /// Path of the ore block, without its namespace.
    ore_name: String,
    /// The tag the ore replaces, or the block if it targets a single block.
    target: String,
    /// The replaced block, empty if the ore only targets a tag.
    is_block: String,
}

impl OreDescriptor {
    /// Create a new ore descriptor.
    #[must_use]
    pub fn new(ore_name: &str, target: &str, is_block: &str) -> Self {
        Self {
            ore_name: ore_name.to_string(),
            target: target.to_string(),
            is_block: is_block.to_string(),
        }
    }

    /// Whether the ore replaces a single block rather than a tag.
    #[must_use]
    pub fn targets_block(&self) -> bool {
        !self.is_block.is_empty()
    }
}

/// Ores discovered in a mod, along with the tag values pointing at them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
#[get = "pub"]
pub struct Discovery {
    /// Discovered ores in discovery order.
    ores: Vec<OreDescriptor>,
    /// `bigglobe_<mod>:<ore>` for every discovered ore, in the same order.
    tag_values: Vec<String>,
}

impl Discovery {
    pub(crate) fn push(&mut self, mod_name: &str, ore: OreDescriptor) {
        self.tag_values
            .push(format!("{}:{}", compat_namespace(mod_name), ore.ore_name));
        self.ores.push(ore);
    }
}

/// Get the directory holding the configured features of `mod_name`.
#[must_use]
pub fn configured_feature_dir(mod_dir: &Path, mod_name: &str) -> std::path::PathBuf {
    mod_dir
        .join("data")
        .join(mod_name)
        .join("worldgen")
        .join("configured_feature")
}

/// Scan the configured features of the mod unpacked at `mod_dir` for ores.
///
/// Only files directly inside the directory are read, in file name order.
/// Files and targets that cannot be read are skipped.
///
/// # Errors
/// - [`Error::NoWorldgenData`] if the mod has no configured feature directory
/// - [`Error::NoOresFound`] if no qualifying ore is found
/// - [`Error::Io`] if the directory cannot be listed
#[tracing::instrument(level = "debug", skip(mod_dir))]
pub fn discover_ores(mod_dir: &Path, mod_name: &str) -> Result<Discovery> {
    let feature_dir = configured_feature_dir(mod_dir, mod_name);
    if !feature_dir.is_dir() {
        return Err(Error::NoWorldgenData(mod_name.to_string()));
    }

    let mut files = fs::read_dir(&feature_dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    files.sort();

    let mut discovery = Discovery::default();
    for path in files {
        let feature = match fs::read_to_string(&path)
            .map_err(|err| err.to_string())
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|err| err.to_string()))
        {
            Ok(feature) => feature,
            Err(err) => {
                tracing::debug!("Skipping unreadable feature {}: {err}", path.display());
                continue;
            }
        };

        let ores = feature_ores(&feature);
        tracing::debug!("Found {} ores in {}", ores.len(), path.display());
        for ore in ores {
            discovery.push(mod_name, ore);
        }
    }

    if discovery.ores.is_empty() {
        return Err(Error::NoOresFound(mod_name.to_string()));
    }

    tracing::info!("Found {} ores in mod {mod_name}", discovery.ores.len());
    Ok(discovery)
}

/// Extract the qualifying ores of a single configured feature document.
///
/// Features whose `type` is not a vanilla feature type are ignored as a whole.
#[must_use]
pub fn feature_ores(feature: &Value) -> Vec<OreDescriptor> {
    let is_vanilla = feature
        .get("type")
        .and_then(Value::as_str)
        .map(|ty| ty.split(':').next() == Some(VANILLA_NAMESPACE))
        .unwrap_or(false);
    if !is_vanilla {
        return Vec::new();
    }

    feature
        .pointer("/config/targets")
        .and_then(Value::as_array)
        .map(|targets| targets.iter().filter_map(target_ore).collect())
        .unwrap_or_default()
}

fn target_ore(entry: &Value) -> Option<OreDescriptor> {
    let (source_namespace, ore_name) = entry
        .pointer("/state/Name")
        .and_then(Value::as_str)?
        .split_once(':')?;
    if source_namespace.is_empty() || !is_valid_ore_name(ore_name) {
        tracing::debug!("Skipping ore with invalid name {ore_name:?}");
        return None;
    }

    let target = entry.get("target")?;
    let tag = optional_str(target, "tag")?;
    let block = optional_str(target, "block")?;

    if !qualifies(source_namespace, namespace(tag), namespace(block)) {
        return None;
    }

    Some(OreDescriptor::new(
        ore_name,
        if tag.is_empty() { block } else { tag },
        block,
    ))
}

/// Whether an ore from `source` replacing a tag or block from the given
/// namespaces is a modded ore placed into vanilla terrain.
#[must_use]
pub fn qualifies(source: &str, tag_namespace: Option<&str>, block_namespace: Option<&str>) -> bool {
    source != VANILLA_NAMESPACE
        && (tag_namespace == Some(VANILLA_NAMESPACE) || block_namespace == Some(VANILLA_NAMESPACE))
}

/// Whether `name` is a single resource path segment, usable as a file name
/// inside the datapack.
#[must_use]
pub fn is_valid_ore_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-'))
}

/// Read an optional string field, defaulting to an empty string.
/// Present but non-string values make the entry malformed.
fn optional_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    match value.get(key) {
        None => Some(""),
        Some(field) => field.as_str(),
    }
}

fn namespace(id: &str) -> Option<&str> {
    id.split_once(':').map(|(namespace, _)| namespace)
}
