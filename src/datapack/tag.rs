//! The tag listing every ore feature of a compat datapack.

use serde_json::Value;

use crate::virtual_fs::VFile;

use super::to_json_file;

/// A configured feature tag rendered from a template.
///
/// The values of the tag are appended to the `values` array of the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    base: Value,
    values: Vec<String>,
}

impl Tag {
    /// Create a new tag on top of a rendered template document.
    #[must_use]
    pub fn new(base: Value) -> Self {
        Self {
            base,
            values: Vec::new(),
        }
    }

    /// Get the values added to the tag.
    #[must_use]
    pub fn get_values(&self) -> &Vec<String> {
        &self.values
    }

    /// Add a value to the tag.
    pub fn add_value(&mut self, value: &str) {
        self.values.push(value.to_string());
    }

    /// Build the tag document.
    ///
    /// A template that is not an object is replaced by one, and a missing or
    /// non-array `values` entry by an empty array.
    #[must_use]
    pub fn to_document(&self) -> Value {
        let mut document = match &self.base {
            Value::Object(_) => self.base.clone(),
            _ => Value::Object(serde_json::Map::new()),
        };
        if !document["values"].is_array() {
            document["values"] = Value::Array(Vec::new());
        }
        if let Some(values) = document["values"].as_array_mut() {
            values.extend(self.values.iter().cloned().map(Value::String));
        }
        document
    }

    /// Compile the tag into a virtual file.
    ///
    /// # Errors
    /// - If the document cannot be serialized
    pub fn compile(&self) -> serde_json::Result<VFile> {
        to_json_file(&self.to_document())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tag() {
        let mut tag = Tag::new(json!({
            "replace": false,
            "values": ["bigglobe:overworld/ores/placeholder"]
        }));
        tag.add_value("bigglobe_examplemod:tin_ore");
        tag.add_value("bigglobe_examplemod:copper_ore");
        assert_eq!(tag.get_values().len(), 2);

        let compiled = tag.compile().expect("error compiling tag");
        let VFile::Text(text) = compiled else {
            panic!("tag should be text not binary")
        };
        let deserialized =
            serde_json::from_str::<Value>(&text).expect("Failed to deserialize tag");
        assert_eq!(
            deserialized,
            json!({
                "replace": false,
                "values": [
                    "bigglobe:overworld/ores/placeholder",
                    "bigglobe_examplemod:tin_ore",
                    "bigglobe_examplemod:copper_ore"
                ]
            })
        );
    }

    #[test]
    fn test_tag_without_values() {
        let mut tag = Tag::new(json!({ "replace": false }));
        tag.add_value("bigglobe_examplemod:tin_ore");
        assert_eq!(
            tag.to_document(),
            json!({ "replace": false, "values": ["bigglobe_examplemod:tin_ore"] })
        );

        let tag = Tag::new(json!("not an object"));
        assert_eq!(tag.to_document(), json!({ "values": [] }));
    }
}
