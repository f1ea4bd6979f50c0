use crate::error::QuoteDiffError;
use crate::vocab::schema::VocabularyDef;

const FACTORY_SPEC_JSON: &str = include_str!("../../../../vocab/factory-spec.json");

/// Available predefined vocabularies.
pub const PRESETS: &[&str] = &["factory"];

/// Preset used when no vocabulary is specified.
pub const DEFAULT_PRESET: &str = "factory";

/// Load a predefined vocabulary by name.
pub fn load_preset(name: &str) -> Result<VocabularyDef, QuoteDiffError> {
    match name {
        "factory" => {
            let vocab: VocabularyDef = serde_json::from_str(FACTORY_SPEC_JSON)?;
            Ok(vocab)
        }
        _ => Err(QuoteDiffError::VocabularyInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
