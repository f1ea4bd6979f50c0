use serde::{Deserialize, Serialize};
use std::fmt;

/// One structured record parsed from a factory specification document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecLine {
    /// Most recently seen section header.
    pub section: String,
    pub feature: String,
    pub option_code: Option<String>,
    pub variant: Option<String>,
    /// Free text left after the structured fields were stripped. Continuation
    /// lines are appended with `" | "`.
    pub description: String,
    pub quantity: Option<String>,
    pub price: Option<String>,
}

impl SpecLine {
    /// A record is worth keeping only if it has a feature and either an
    /// option code or some description.
    pub fn is_meaningful(&self) -> bool {
        !self.feature.is_empty()
            && (self.option_code.as_deref().is_some_and(|c| !c.is_empty())
                || !self.description.is_empty())
    }

    /// Value used when comparing this line against another document:
    /// variant, description, quantity and price joined by spaces.
    pub fn comparable_value(&self) -> String {
        [
            self.variant.as_deref(),
            Some(self.description.as_str()),
            self.quantity.as_deref(),
            self.price.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Key shown in comparison output: the option code, or `section / feature`.
    pub fn line_item(&self) -> String {
        match self.option_code.as_deref() {
            Some(code) => format!("{} ({})", self.feature, code),
            None => format!("{} / {}", self.section, self.feature),
        }
    }
}

/// Where an extracted variable's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSource {
    /// A known `Label` from the vocabulary.
    Label,
    /// The remainder of an option-code line.
    OptionCode,
    /// A line a fixed number of lines below the option code.
    CodeOffset,
    /// A generic `key: value` line.
    KeyValue,
}

impl fmt::Display for VariableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableSource::Label => write!(f, "label"),
            VariableSource::OptionCode => write!(f, "option code"),
            VariableSource::CodeOffset => write!(f, "code offset"),
            VariableSource::KeyValue => write!(f, "key/value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRecord {
    pub name: String,
    pub value: String,
    pub source: VariableSource,
}

/// Ordered name -> value map extracted from one document.
///
/// Insertion order is preserved and the first value recorded for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    records: Vec<VariableRecord>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless the name is already present. Returns whether
    /// the record was added.
    pub fn insert(&mut self, name: &str, value: &str, source: VariableSource) -> bool {
        if self.contains(name) {
            return false;
        }
        self.records.push(VariableRecord {
            name: name.to_string(),
            value: value.to_string(),
            source,
        });
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value.as_str())
    }

    /// Value for `name`, treating empty values and the literal "Not Found"
    /// as absent.
    pub fn present(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| is_present(v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn records(&self) -> &[VariableRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut map = FieldMap::new();
        for (name, value) in iter {
            map.insert(name, value, VariableSource::KeyValue);
        }
        map
    }
}

/// Placeholder some documents use for a missing value.
pub const NOT_FOUND: &str = "Not Found";

/// Whether a field value counts as present for comparison purposes.
pub fn is_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(NOT_FOUND)
}

/// Kind of input document, decided from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
    Xlsx,
}

impl DocumentKind {
    pub fn from_file_name(name: &str) -> Option<DocumentKind> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "text" => Some(DocumentKind::Text),
            "xlsx" => Some(DocumentKind::Xlsx),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "PDF"),
            DocumentKind::Docx => write!(f, "DOCX"),
            DocumentKind::Text => write!(f, "TXT"),
            DocumentKind::Xlsx => write!(f, "XLSX"),
        }
    }
}

/// A grid of cell strings detected in or read from a document.
pub type Table = Vec<Vec<String>>;

/// Text and tables pulled out of one uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub name: String,
    pub kind: DocumentKind,
    /// Whitespace-collapsed text with blank lines removed.
    pub text: String,
    /// Text exactly as the extraction backend produced it.
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(feature: &str, code: Option<&str>, description: &str) -> SpecLine {
        SpecLine {
            section: "Exterior".into(),
            feature: feature.into(),
            option_code: code.map(String::from),
            description: description.into(),
            ..SpecLine::default()
        }
    }

    #[test]
    fn test_meaningful_requires_feature() {
        assert!(!line("", Some("OP000001"), "desc").is_meaningful());
    }

    #[test]
    fn test_meaningful_with_code_only() {
        assert!(line("ROOF", Some("OP000001"), "").is_meaningful());
    }

    #[test]
    fn test_meaningful_with_description_only() {
        assert!(line("ROOF", None, "30 year shingles").is_meaningful());
        assert!(!line("ROOF", None, "").is_meaningful());
    }

    #[test]
    fn test_comparable_value_skips_missing_fields() {
        let mut l = line("FLOORING", Some("OP001088"), "Vinyl plank");
        l.variant = Some("White".into());
        l.price = Some("4,250.00".into());
        assert_eq!(l.comparable_value(), "White Vinyl plank 4,250.00");
    }

    #[test]
    fn test_field_map_first_value_wins() {
        let mut map = FieldMap::new();
        assert!(map.insert("Roof Pitch", "4/12", VariableSource::Label));
        assert!(!map.insert("Roof Pitch", "5/12", VariableSource::KeyValue));
        assert_eq!(map.get("Roof Pitch"), Some("4/12"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_not_found_is_absent() {
        let map: FieldMap = [("Siding", "Not Found"), ("Trim", "  ")].into_iter().collect();
        assert!(map.contains("Siding"));
        assert_eq!(map.present("Siding"), None);
        assert_eq!(map.present("Trim"), None);
    }

    #[test]
    fn test_document_kind_from_extension() {
        assert_eq!(DocumentKind::from_file_name("quote.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("a.b.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("notes.txt"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_file_name("sheet.xlsx"), Some(DocumentKind::Xlsx));
        assert_eq!(DocumentKind::from_file_name("image.png"), None);
        assert_eq!(DocumentKind::from_file_name("README"), None);
    }
}
