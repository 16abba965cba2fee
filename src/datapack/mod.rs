//! Datapack module for assembling Big Globe compat datapacks.

pub mod tag;
pub use tag::Tag;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

use crate::{
    config::compat_namespace,
    discover::Discovery,
    template::{Placeholder, Substitutions, TemplateKind, TemplateSet},
    virtual_fs::{VFile, VFolder},
};

/// Directory of the ore tag, relative to the datapack namespace.
pub const TAGS_DIR: &str = "tags/worldgen/configured_feature/overworld";
/// Directory of the ore features, relative to the datapack namespace.
pub const ORES_DIR: &str = "worldgen/configured_feature/overworld/ores";

/// A Big Globe compat datapack for a single mod.
#[derive(Debug, Clone, PartialEq)]
pub struct Datapack {
    mod_name: String,
    pack_meta: Value,
    ore_tag: Option<Tag>,
    features: BTreeMap<String, Value>,
}

impl Datapack {
    /// Create a new, empty datapack for `mod_name` with a rendered `pack.mcmeta`.
    #[must_use]
    pub fn new(mod_name: &str, pack_meta: Value) -> Self {
        Self {
            mod_name: mod_name.to_string(),
            pack_meta,
            ore_tag: None,
            features: BTreeMap::new(),
        }
    }

    /// Render the datapack for the ores discovered in `mod_name`.
    ///
    /// The tag is rendered first, then one worldgen feature per ore.
    #[must_use]
    #[tracing::instrument(level = "debug", skip(discovery, templates))]
    pub fn render(mod_name: &str, discovery: &Discovery, templates: &TemplateSet) -> Self {
        let mod_subs = Substitutions::new().with(Placeholder::ModName, mod_name);
        let mut dp = Self::new(mod_name, templates.render(TemplateKind::PackMeta, &mod_subs));

        if !discovery.ores().is_empty() {
            let mut tag = Tag::new(templates.render(TemplateKind::TagOres, &mod_subs));
            for value in discovery.tag_values() {
                tag.add_value(value);
            }
            dp.ore_tag = Some(tag);
        }

        for ore in discovery.ores() {
            let kind = TemplateKind::for_ore(ore);
            tracing::debug!("Rendering {} from {}", ore.ore_name(), kind.file_name());
            let feature = templates.render(kind, &Substitutions::for_ore(mod_name, ore));
            dp.add_feature(ore.ore_name(), feature);
        }

        dp
    }

    /// Get the id of the mod the datapack is for.
    #[must_use]
    pub fn mod_name(&self) -> &str {
        &self.mod_name
    }

    /// Get the ore tag, if any ore was added.
    #[must_use]
    pub fn ore_tag(&self) -> Option<&Tag> {
        self.ore_tag.as_ref()
    }

    /// Get the ore features by ore name.
    #[must_use]
    pub fn features(&self) -> &BTreeMap<String, Value> {
        &self.features
    }

    /// Add the worldgen feature of an ore, replacing an earlier feature of the
    /// same name.
    pub fn add_feature(&mut self, ore_name: &str, feature: Value) {
        if self.features.insert(ore_name.to_string(), feature).is_some() {
            tracing::debug!("Replacing earlier feature for {ore_name}");
        }
    }

    /// Check whether the datapack has neither a tag nor a feature to ship.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ore_tag.is_none() && self.features.is_empty()
    }

    /// Compile the pack into a virtual folder.
    ///
    /// # Errors
    /// - If a document cannot be serialized
    #[tracing::instrument(level = "debug", skip(self), fields(mod_name = %self.mod_name))]
    pub fn compile(&self) -> serde_json::Result<VFolder> {
        let namespace = format!("data/{}", compat_namespace(&self.mod_name));

        let mut root_folder = VFolder::new();
        root_folder.add_file("pack.mcmeta", to_json_file(&self.pack_meta)?);
        root_folder.add_folder(&format!("{namespace}/{TAGS_DIR}"));
        root_folder.add_folder(&format!("{namespace}/{ORES_DIR}"));

        if let Some(tag) = &self.ore_tag {
            root_folder.add_file(&format!("{namespace}/{TAGS_DIR}/ores.json"), tag.compile()?);
        }

        for (ore_name, feature) in &self.features {
            root_folder.add_file(
                &format!("{namespace}/{ORES_DIR}/{ore_name}.json"),
                to_json_file(feature)?,
            );
        }

        Ok(root_folder)
    }
}

/// Serialize a document the way every file of the datapack is written:
/// pretty-printed with four-space indentation.
///
/// # Errors
/// - If the document cannot be serialized
pub fn to_json_file(document: &Value) -> serde_json::Result<VFile> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    Ok(VFile::Text(String::from_utf8_lossy(&buffer).into_owned()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;
    use crate::discover::{feature_ores, OreDescriptor};

    fn templates() -> (tempfile::TempDir, TemplateSet) {
        let dir = tempfile::tempdir().expect("error creating tempdir");
        let write = |kind: TemplateKind, value: Value| {
            fs::write(dir.path().join(kind.file_name()), value.to_string())
                .expect("error writing template");
        };
        write(
            TemplateKind::PackMeta,
            json!({ "pack": { "description": "Big Globe x {MOD_NAME}", "pack_format": 15 } }),
        );
        write(TemplateKind::TagOres, json!({ "replace": false, "values": [] }));
        for kind in [
            TemplateKind::WorldgenBlock,
            TemplateKind::WorldgenDeepslate,
            TemplateKind::WorldgenDirt,
            TemplateKind::WorldgenStone,
        ] {
            write(
                kind,
                json!({
                    "template": kind.file_name(),
                    "state": "{MOD_NAME}:{ORE_NAME}",
                    "replaces": "{BLOCK_NAME}"
                }),
            );
        }
        let set = TemplateSet::load(dir.path()).expect("error loading templates");
        (dir, set)
    }

    fn discovery() -> Discovery {
        let feature = json!({
            "type": "minecraft:ore",
            "config": { "targets": [
                { "target": { "tag": "minecraft:deepslate_ore_replaceables" },
                  "state": { "Name": "examplemod:deepslate_tin_ore" } },
                { "target": { "block": "minecraft:netherrack" },
                  "state": { "Name": "examplemod:nether_tin_ore" } }
            ] }
        });
        let mut discovery = Discovery::default();
        for ore in feature_ores(&feature) {
            discovery.push("examplemod", ore);
        }
        discovery
    }

    #[test]
    fn test_render() {
        let (_dir, templates) = templates();
        let dp = Datapack::render("examplemod", &discovery(), &templates);

        assert_eq!(dp.mod_name(), "examplemod");
        assert_eq!(
            dp.ore_tag().expect("no tag").get_values(),
            &vec![
                "bigglobe_examplemod:deepslate_tin_ore".to_string(),
                "bigglobe_examplemod:nether_tin_ore".to_string()
            ]
        );
        assert_eq!(
            dp.features()["deepslate_tin_ore"],
            json!({
                "template": "worldgen_deepslate_ores_template.json",
                "state": "examplemod:deepslate_tin_ore",
                "replaces": ""
            })
        );
        assert_eq!(
            dp.features()["nether_tin_ore"],
            json!({
                "template": "worldgen_block_template.json",
                "state": "examplemod:nether_tin_ore",
                "replaces": "minecraft:netherrack"
            })
        );
    }

    #[test]
    fn test_render_dirt_ore() {
        let (_dir, templates) = templates();
        let mut discovery = Discovery::default();
        discovery.push("examplemod", OreDescriptor::new("dirt_tin_ore", "dirt", ""));
        discovery.push(
            "examplemod",
            OreDescriptor::new("grassy_tin_ore", "minecraft:grass", ""),
        );
        let dp = Datapack::render("examplemod", &discovery, &templates);

        assert_eq!(
            dp.features()["dirt_tin_ore"]["template"],
            "worldgen_dirt_ores_template.json"
        );
        assert_eq!(dp.features()["dirt_tin_ore"]["state"], "examplemod:dirt_tin_ore");
        assert_eq!(
            dp.features()["grassy_tin_ore"]["template"],
            "worldgen_stone_ores_template.json"
        );
    }

    #[test]
    fn test_render_without_ores() {
        let (_dir, templates) = templates();
        let dp = Datapack::render("examplemod", &Discovery::default(), &templates);
        assert!(dp.is_empty());
    }

    #[test]
    fn test_compile_layout() {
        let (_dir, templates) = templates();
        let folder = Datapack::render("examplemod", &discovery(), &templates)
            .compile()
            .expect("error compiling datapack");

        let mcmeta = folder.get_file("pack.mcmeta").expect("no pack.mcmeta");
        let mcmeta = serde_json::from_slice::<Value>(mcmeta.as_bytes()).expect("invalid mcmeta");
        assert_eq!(mcmeta["pack"]["description"], "Big Globe x examplemod");

        let namespace = folder
            .get_folder("data/bigglobe_examplemod")
            .expect("no namespace folder");
        assert!(namespace
            .get_file("tags/worldgen/configured_feature/overworld/ores.json")
            .is_some());
        let ores = namespace
            .get_folder("worldgen/configured_feature/overworld/ores")
            .expect("no ores folder");
        assert_eq!(
            ores.get_files().keys().collect::<Vec<_>>(),
            vec!["deepslate_tin_ore.json", "nether_tin_ore.json"]
        );
    }

    #[test]
    fn test_compile_empty() {
        let dp = Datapack::new("examplemod", json!({}));
        let folder = dp.compile().expect("error compiling datapack");
        assert!(folder.get_file("pack.mcmeta").is_some());
        assert!(folder
            .get_folder("data/bigglobe_examplemod/worldgen/configured_feature/overworld/ores")
            .expect("no ores folder")
            .is_empty());
    }

    #[test]
    fn test_to_json_file() {
        let VFile::Text(text) = to_json_file(&json!({ "a": [1] })).expect("error serializing")
        else {
            panic!("json should be text not binary")
        };
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}");
    }
}
