//! JSON templates the generated documents are rendered from.

use std::{fmt::Display, fs, path::Path};

use serde_json::Value;

use crate::{
    discover::OreDescriptor,
    error::{Error, Result},
};

/// Token replaced while rendering a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `{MOD_NAME}`, the id of the mod the datapack is generated for.
    ModName,
    /// `{ORE_NAME}`, the path of the ore block.
    OreName,
    /// `{BLOCK_NAME}`, the block replaced by the ore.
    BlockName,
}

impl Placeholder {
    /// Get the literal token as it appears in templates.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::ModName => "{MOD_NAME}",
            Self::OreName => "{ORE_NAME}",
            Self::BlockName => "{BLOCK_NAME}",
        }
    }
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Values substituted for placeholders. Placeholders without a value are
/// left in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: Vec<(Placeholder, String)>,
}

impl Substitutions {
    /// Create an empty set of substitutions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitute `placeholder` with `value`.
    #[must_use]
    pub fn with(mut self, placeholder: Placeholder, value: &str) -> Self {
        self.values.retain(|(existing, _)| *existing != placeholder);
        self.values.push((placeholder, value.to_string()));
        self
    }

    /// Substitutions for the documents of a single ore.
    #[must_use]
    pub fn for_ore(mod_name: &str, ore: &OreDescriptor) -> Self {
        Self::new()
            .with(Placeholder::ModName, mod_name)
            .with(Placeholder::OreName, ore.ore_name())
            .with(Placeholder::BlockName, ore.is_block())
    }

    fn apply(&self, text: &str) -> String {
        self.values
            .iter()
            .fold(text.to_string(), |text, (placeholder, value)| {
                text.replace(placeholder.token(), value)
            })
    }
}

/// The templates a datapack is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `pack.mcmeta`
    PackMeta,
    /// Tag listing every generated ore feature.
    TagOres,
    /// Ore replacing a single block.
    WorldgenBlock,
    /// Ore replacing deepslate.
    WorldgenDeepslate,
    /// Ore replacing grass or dirt.
    WorldgenDirt,
    /// Ore replacing stone, used when nothing more specific applies.
    WorldgenStone,
}

impl TemplateKind {
    /// Every template kind.
    pub const ALL: [TemplateKind; 6] = [
        Self::PackMeta,
        Self::TagOres,
        Self::WorldgenBlock,
        Self::WorldgenDeepslate,
        Self::WorldgenDirt,
        Self::WorldgenStone,
    ];

    /// Get the file name of the template inside the templates directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::PackMeta => "pack_mcmeta_template.json",
            Self::TagOres => "tags_ores_template.json",
            Self::WorldgenBlock => "worldgen_block_template.json",
            Self::WorldgenDeepslate => "worldgen_deepslate_ores_template.json",
            Self::WorldgenDirt => "worldgen_dirt_ores_template.json",
            Self::WorldgenStone => "worldgen_stone_ores_template.json",
        }
    }

    /// Select the worldgen template for an ore.
    #[must_use]
    pub fn for_ore(ore: &OreDescriptor) -> Self {
        let target = ore.target().as_str();
        if ore.targets_block() {
            Self::WorldgenBlock
        } else if target.contains("deepslate") {
            Self::WorldgenDeepslate
        } else if matches!(target, "grass" | "dirt") {
            Self::WorldgenDirt
        } else {
            Self::WorldgenStone
        }
    }
}

/// A loaded JSON template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    document: Value,
}

impl Template {
    /// Load a template from a JSON file.
    ///
    /// # Errors
    /// - [`Error::Template`] if the file cannot be read or is not valid JSON
    pub fn load(path: &Path) -> Result<Self> {
        let invalid = |reason: String| Error::Template {
            path: path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
        let document = serde_json::from_str(&text).map_err(|err| invalid(err.to_string()))?;
        Ok(Self { document })
    }

    /// Render the template, substituting placeholders inside string values.
    /// Object keys are never rewritten.
    #[must_use]
    pub fn render(&self, substitutions: &Substitutions) -> Value {
        let mut document = self.document.clone();
        substitute(&mut document, substitutions);
        document
    }
}

impl From<Value> for Template {
    fn from(document: Value) -> Self {
        Self { document }
    }
}

fn substitute(value: &mut Value, substitutions: &Substitutions) {
    match value {
        Value::String(text) => *text = substitutions.apply(text),
        Value::Array(values) => values
            .iter_mut()
            .for_each(|value| substitute(value, substitutions)),
        Value::Object(map) => map
            .values_mut()
            .for_each(|value| substitute(value, substitutions)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// The six templates a datapack is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    templates: [Template; 6],
}

impl TemplateSet {
    /// Load every template from `dir`.
    ///
    /// # Errors
    /// - [`Error::Template`] if any template is missing or invalid
    #[tracing::instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<Self> {
        let [pack_meta, tag_ores, block, deepslate, dirt, stone] =
            TemplateKind::ALL.map(|kind| Template::load(&dir.join(kind.file_name())));
        Ok(Self {
            templates: [pack_meta?, tag_ores?, block?, deepslate?, dirt?, stone?],
        })
    }

    /// Get the template of the given kind.
    #[must_use]
    pub fn get(&self, kind: TemplateKind) -> &Template {
        &self.templates[kind as usize]
    }

    /// Render the template of the given kind.
    #[must_use]
    pub fn render(&self, kind: TemplateKind, substitutions: &Substitutions) -> Value {
        self.get(kind).render(substitutions)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_mapped_tokens() {
        let template = Template::from(json!({
            "feature": "bigglobe_{MOD_NAME}:overworld/ores/{ORE_NAME}",
            "blocks": ["{MOD_NAME}:{ORE_NAME}", "{BLOCK_NAME}"],
            "count": 4
        }));
        let subs = Substitutions::for_ore(
            "examplemod",
            &OreDescriptor::new("tin_ore", "minecraft:stone", "minecraft:stone"),
        );

        assert_eq!(
            template.render(&subs),
            json!({
                "feature": "bigglobe_examplemod:overworld/ores/tin_ore",
                "blocks": ["examplemod:tin_ore", "minecraft:stone"],
                "count": 4
            })
        );
    }

    #[test]
    fn test_render_leaves_unmapped_tokens() {
        let template = Template::from(json!({
            "pack": {
                "description": "Big Globe compat for {MOD_NAME} ({ORE_NAME})",
                "pack_format": 15
            }
        }));
        let subs = Substitutions::new().with(Placeholder::ModName, "examplemod");

        assert_eq!(
            template.render(&subs),
            json!({
                "pack": {
                    "description": "Big Globe compat for examplemod ({ORE_NAME})",
                    "pack_format": 15
                }
            })
        );
    }

    #[test]
    fn test_render_keeps_keys() {
        let template = Template::from(json!({ "{ORE_NAME}": "{ORE_NAME}" }));
        let subs = Substitutions::new().with(Placeholder::OreName, "tin_ore");

        assert_eq!(template.render(&subs), json!({ "{ORE_NAME}": "tin_ore" }));
    }

    #[test]
    fn test_with_replaces_value() {
        let subs = Substitutions::new()
            .with(Placeholder::ModName, "first")
            .with(Placeholder::ModName, "second");
        assert_eq!(subs.apply("{MOD_NAME}"), "second");
    }

    #[test]
    fn test_template_selection() {
        let select = |target: &str, block: &str| {
            TemplateKind::for_ore(&OreDescriptor::new("tin_ore", target, block))
        };

        assert_eq!(
            select("minecraft:deepslate", "minecraft:deepslate"),
            TemplateKind::WorldgenBlock
        );
        assert_eq!(
            select("minecraft:deepslate_ore_replaceables", ""),
            TemplateKind::WorldgenDeepslate
        );
        assert_eq!(select("dirt", ""), TemplateKind::WorldgenDirt);
        assert_eq!(select("grass", ""), TemplateKind::WorldgenDirt);
        assert_eq!(select("minecraft:grass", ""), TemplateKind::WorldgenStone);
        assert_eq!(select("minecraft:dirt", ""), TemplateKind::WorldgenStone);
        assert_eq!(select("minecraft:dirt_like", ""), TemplateKind::WorldgenStone);
        assert_eq!(
            select("minecraft:stone_ore_replaceables", ""),
            TemplateKind::WorldgenStone
        );
    }

    #[test]
    fn test_load_set() {
        let dir = tempfile::tempdir().expect("error creating tempdir");
        for kind in TemplateKind::ALL {
            fs::write(
                dir.path().join(kind.file_name()),
                json!({ "kind": kind.file_name() }).to_string(),
            )
            .expect("error writing template");
        }

        let set = TemplateSet::load(dir.path()).expect("error loading templates");
        for kind in TemplateKind::ALL {
            assert_eq!(
                set.render(kind, &Substitutions::new()),
                json!({ "kind": kind.file_name() })
            );
        }
    }

    #[test]
    fn test_bundled_templates() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let set = TemplateSet::load(&dir).expect("error loading bundled templates");

        let ore = OreDescriptor::new("tin_ore", "minecraft:stone_ore_replaceables", "");
        let rendered = set.render(
            TemplateKind::for_ore(&ore),
            &Substitutions::for_ore("examplemod", &ore),
        );
        assert!(!rendered.to_string().contains("{MOD_NAME}"));
        assert!(!rendered.to_string().contains("{ORE_NAME}"));
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().expect("error creating tempdir");
        fs::write(
            dir.path().join(TemplateKind::PackMeta.file_name()),
            "{}",
        )
        .expect("error writing template");

        assert!(matches!(
            TemplateSet::load(dir.path()),
            Err(Error::Template { .. })
        ));
    }
}
