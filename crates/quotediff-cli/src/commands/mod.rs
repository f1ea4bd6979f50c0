pub mod compare;
pub mod extract;
pub mod llm;
pub mod parse;
pub mod vocab;

use quotediff_core::config::AppConfig;
use quotediff_core::error::QuoteDiffError;
use quotediff_core::extraction::extract_document;
use quotediff_core::extraction::pdftotext::PdftotextExtractor;
use quotediff_core::model::ExtractedDocument;
use quotediff_core::vocab::{builtin, load_vocabulary, Vocabulary};
use std::path::Path;

/// Settings shared by every command.
pub struct Context {
    pub config: AppConfig,
}

impl Context {
    pub fn load(config_path: Option<&Path>) -> Result<Self, QuoteDiffError> {
        Ok(Self {
            config: AppConfig::load(config_path)?,
        })
    }

    /// Read and extract a document, enforcing the configured size limit.
    pub fn load_document(&self, path: &Path) -> Result<ExtractedDocument, QuoteDiffError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let extractor = PdftotextExtractor::new();
        extract_document(&name, &bytes, &extractor, self.config.max_document_bytes)
    }

    /// Vocabulary from `--vocab`, else `--preset`, else the config file, else
    /// the default preset.
    pub fn vocabulary(
        &self,
        vocab_file: Option<&Path>,
        preset: Option<&str>,
    ) -> Result<Vocabulary, QuoteDiffError> {
        let def = match (vocab_file, preset) {
            (Some(path), _) => load_vocabulary(path)?,
            (None, Some(name)) => builtin::load_preset(name)?,
            (None, None) => match self.config.vocabulary.as_deref() {
                Some(path) => load_vocabulary(path)?,
                None => builtin::load_preset(builtin::DEFAULT_PRESET)?,
            },
        };
        Vocabulary::compile(def)
    }
}
