use serde::{Deserialize, Serialize};

/// Framework conventions the scorer and the driver rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Explicit identifier attribute. Never patched; equal values force a match.
    pub id_attribute: String,
    /// Marker attribute that excludes a subtree from diffing.
    pub skip_attribute: String,
    /// Identifiers regenerated on every render.
    pub generated_ids: GeneratedIds,
    /// Tag of form input elements.
    pub input_tag: String,
    /// Name attribute of input elements.
    pub name_attribute: String,
    /// Type attribute of input elements.
    pub type_attribute: String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            id_attribute: "id".to_string(),
            skip_attribute: "data-diff-skip".to_string(),
            generated_ids: GeneratedIds::default(),
            input_tag: "input".to_string(),
            name_attribute: "name".to_string(),
            type_attribute: "type".to_string(),
        }
    }
}

/// A sentinel prefix plus a fixed total length, counted in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedIds {
    pub prefix: String,
    pub length: usize,
}

impl Default for GeneratedIds {
    fn default() -> Self {
        Self {
            prefix: "F".to_string(),
            length: 17,
        }
    }
}

impl GeneratedIds {
    pub fn matches(&self, value: &str) -> bool {
        value.starts_with(&self.prefix) && value.chars().count() == self.length
    }
}
