use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A closed vocabulary describing one vendor's specification layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Section assigned to lines seen before any header.
    #[serde(default = "default_section")]
    pub default_section: String,
    /// Exact (trimmed) header lines that open a new section.
    pub section_headers: Vec<String>,
    /// Material/color names, in priority order.
    #[serde(default)]
    pub variants: Vec<String>,
    /// Line prefixes marking a continuation of the previous record.
    #[serde(default = "default_continuation_markers")]
    pub continuation_markers: Vec<String>,
    #[serde(default)]
    pub boilerplate: BoilerplateDef,
    /// Known `Label` -> canonical variable name pairs.
    #[serde(default)]
    pub labels: Vec<LabelDef>,
    /// Option codes whose value sits a fixed number of lines below the code.
    #[serde(default)]
    pub code_offsets: BTreeMap<String, usize>,
    /// Fields labelled differently in the two document formats.
    #[serde(default)]
    pub aliases: Vec<AliasDef>,
    /// Field names that documents sometimes repeat inside the value.
    #[serde(default)]
    pub embedded_labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoilerplateDef {
    /// Lines starting with any of these are dropped.
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Lines containing any of these are dropped, unless they carry an option code.
    #[serde(default)]
    pub contains: Vec<String>,
    /// The literal table header line repeated on every page.
    #[serde(default)]
    pub column_header: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDef {
    /// Text as it appears in the document, e.g. "Roof Pitch".
    pub label: String,
    /// Canonical variable name used for comparison.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasDef {
    /// Field name in the first document format.
    pub a: String,
    /// Field name in the second document format.
    pub b: String,
}

fn default_section() -> String {
    "Miscellaneous".to_string()
}

fn default_continuation_markers() -> Vec<String> {
    ["**", "..", "-", "~"].iter().map(|s| s.to_string()).collect()
}
