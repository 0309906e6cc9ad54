//! Character replacement dictionaries and the replacement diagnostic log.
//!
//! A replacement dictionary maps individual characters to substitutes, per
//! named table. Each table declares the encoding it was written for, and a
//! field may only use a table whose encoding matches its own.
//!
//! ```toml
//! [tables.kana-fold]
//! encoding = "Shift_JIS"
//! replacements = { "ｱ" = "ア", "～" = "〜" }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;

use crate::error::CodecError;
use crate::Result;

/// Lookup and substitution service used by the character-replacement
/// transform.
pub trait ReplacementDictionary: fmt::Debug + Send + Sync {
    /// Returns true when a table named `name` exists.
    fn contains(&self, name: &str) -> bool;

    /// Encoding label declared by the table.
    fn encoding_of(&self, name: &str) -> Option<&str>;

    /// Substitute characters of `text` according to the table.
    ///
    /// Unknown tables leave the text unchanged.
    fn replace(&self, name: &str, text: &str) -> String;
}

/// One replacement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTable {
    /// Encoding the table was written for.
    pub encoding: String,
    replacements: HashMap<char, String>,
}

impl ReplacementTable {
    /// Create an empty table for an encoding.
    pub fn new(encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
            replacements: HashMap::new(),
        }
    }

    /// Add a substitution.
    pub fn with(mut self, from: char, to: impl Into<String>) -> Self {
        self.replacements.insert(from, to.into());
        self
    }

    /// Apply the table to `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match self.replacements.get(&c) {
                Some(to) => out.push_str(to),
                None => out.push(c),
            }
        }
        out
    }
}

#[derive(Deserialize)]
struct RawTable {
    encoding: String,
    #[serde(default)]
    replacements: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawDictionary {
    #[serde(default)]
    tables: HashMap<String, RawTable>,
}

/// In-memory [`ReplacementDictionary`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterDictionary {
    tables: HashMap<String, ReplacementTable>,
}

impl CharacterDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, table: ReplacementTable) {
        self.tables.insert(name.into(), table);
    }

    /// Parse a dictionary from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawDictionary = toml::from_str(content).map_err(|e| CodecError::Config {
            message: e.to_string(),
        })?;

        let mut dictionary = Self::new();
        for (name, raw_table) in raw.tables {
            let mut table = ReplacementTable::new(raw_table.encoding);
            for (from, to) in raw_table.replacements {
                let mut chars = from.chars();
                let key = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(CodecError::Config {
                            message: format!(
                                "Replacement key {:?} in table {} must be a single character",
                                from, name
                            ),
                        })
                    }
                };
                table = table.with(key, to);
            }
            dictionary.insert(name, table);
        }
        Ok(dictionary)
    }

    /// Load a dictionary from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CodecError::Config {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        let dictionary = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded {} replacement table(s) from {}",
            dictionary.tables.len(),
            path.display()
        );
        Ok(dictionary)
    }
}

impl ReplacementDictionary for CharacterDictionary {
    fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    fn encoding_of(&self, name: &str) -> Option<&str> {
        self.tables.get(name).map(|t| t.encoding.as_str())
    }

    fn replace(&self, name: &str, text: &str) -> String {
        match self.tables.get(name) {
            Some(table) => table.apply(text),
            None => text.to_string(),
        }
    }
}

/// Outcome of one decode-side replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRecord {
    /// Text before replacement.
    pub input: String,
    /// Text after replacement.
    pub output: String,
    /// Whether any character changed.
    pub replaced: bool,
}

/// Latest replacement outcome per field, shared across codecs and threads.
///
/// Each decode overwrites the previous record for its field, so the registry
/// holds one entry per field however many records pass through.
#[derive(Debug, Default)]
pub struct DiagnosticRegistry {
    latest: DashMap<String, ReplacementRecord>,
}

impl DiagnosticRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry wrapped in Arc for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Store `record` as the latest outcome for `field`.
    pub fn record(&self, field: &str, record: ReplacementRecord) {
        self.latest.insert(field.to_string(), record);
    }

    /// Most recent outcome recorded for `field`.
    pub fn latest(&self, field: &str) -> Option<ReplacementRecord> {
        self.latest.get(field).map(|entry| entry.value().clone())
    }

    /// Number of fields with a record.
    pub fn field_count(&self) -> usize {
        self.latest.len()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.latest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICTIONARY: &str = r#"
        [tables.fold]
        encoding = "Shift_JIS"
        replacements = { "ｱ" = "ア", "~" = "-" }

        [tables.latin]
        encoding = "windows-1252"
    "#;

    #[test]
    fn test_from_toml() {
        let dict = CharacterDictionary::from_toml_str(DICTIONARY).unwrap();
        assert!(dict.contains("fold"));
        assert!(dict.contains("latin"));
        assert!(!dict.contains("missing"));
        assert_eq!(dict.encoding_of("fold"), Some("Shift_JIS"));
        assert_eq!(dict.replace("fold", "ｱ~B"), "ア-B");
        assert_eq!(dict.replace("latin", "ｱ~B"), "ｱ~B");
        assert_eq!(dict.replace("missing", "x"), "x");
    }

    #[test]
    fn test_multi_char_key_rejected() {
        let err = CharacterDictionary::from_toml_str(
            r#"
            [tables.bad]
            encoding = "UTF-8"
            replacements = { "ab" = "c" }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replace.toml");
        std::fs::write(&path, DICTIONARY).unwrap();
        let dict = CharacterDictionary::load(&path).unwrap();
        assert!(dict.contains("fold"));
        assert!(CharacterDictionary::load(&dir.path().join("none.toml")).is_err());
    }

    #[test]
    fn test_registry() {
        let registry = DiagnosticRegistry::new();
        let record = |input: &str, output: &str| ReplacementRecord {
            input: input.to_string(),
            output: output.to_string(),
            replaced: input != output,
        };
        registry.record("NAME", record("a", "a"));
        registry.record("NAME", record("~", "-"));
        registry.record("CITY", record("x", "x"));

        let name = registry.latest("NAME").unwrap();
        assert_eq!(name.input, "~");
        assert!(name.replaced);
        assert_eq!(registry.field_count(), 2);
        assert!(registry.latest("ZIP").is_none());

        registry.clear();
        assert_eq!(registry.field_count(), 0);
    }

    #[test]
    fn test_registry_keeps_one_entry_per_field() {
        let registry = DiagnosticRegistry::new();
        for i in 0..10_000 {
            registry.record(
                "NAME",
                ReplacementRecord {
                    input: i.to_string(),
                    output: i.to_string(),
                    replaced: false,
                },
            );
        }
        assert_eq!(registry.field_count(), 1);
        assert_eq!(registry.latest("NAME").unwrap().input, "9999");
    }
}
