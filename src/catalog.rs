use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, BridgeError};

const BUILTIN_LANGUAGES: &str = include_str!("../langs/flores.json");

/// Ordered model identifiers; index 0 is the default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<String>,
}

impl ModelCatalog {
    pub fn new(models: Vec<String>) -> Self {
        Self { models }
    }

    /// Identifier at `index` (0 when absent), if that slot is non-empty
    pub fn resolve(&self, index: Option<usize>) -> Result<&str> {
        let index = index.unwrap_or(0);
        self.models
            .get(index)
            .map(String::as_str)
            .filter(|model| !model.trim().is_empty())
            .ok_or(BridgeError::InvalidModelIndex(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.models.iter().map(String::as_str).enumerate()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Human-facing language codes mapped to the codes the model expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCatalog {
    languages: BTreeMap<String, String>,
}

impl LanguageCatalog {
    pub fn new(languages: BTreeMap<String, String>) -> Self {
        Self { languages }
    }

    /// The FLORES-200 table shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_LANGUAGES)
    }

    /// Parse a JSON object of `"code": "model_code"` pairs
    pub fn from_json(content: &str) -> Result<Self> {
        let languages: BTreeMap<String, String> = serde_json::from_str(content)?;
        Ok(Self::new(languages))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading language table from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read language table {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Table from `path` when given, the built-in one otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Model-facing code for a human-facing one
    pub fn resolve(&self, code: &str) -> Result<&str> {
        self.languages
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| BridgeError::InvalidLanguage(code.to_string()))
    }

    /// All accepted codes in sorted order
    pub fn codes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.languages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
