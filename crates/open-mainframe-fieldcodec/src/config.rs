//! Engine-wide configuration.
//!
//! Loaded from TOML, typically a `fieldcodec.toml` next to the layout
//! definitions:
//!
//! ```toml
//! default_encoding = "windows-1252"
//!
//! [markers]
//! packed_unsigned = "F"
//! packed_positive = "C"
//! packed_negative = "D"
//! zoned_zone = "3"
//! zoned_positive = "3"
//! zoned_negative = "7"
//!
//! [pipeline]
//! encode_order = "reverse"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::charset::Charset;
use crate::error::CodecError;
use crate::spec::parse_marker;
use crate::Result;

/// Complete codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Encoding used when a field does not name one.
    pub default_encoding: String,
    /// Default sign and zone nibbles for packed and zoned fields.
    pub markers: MarkerConfig,
    /// Transform composition settings.
    pub pipeline: PipelineConfig,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_encoding: "UTF-8".to_string(),
            markers: MarkerConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl CodecConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CodecError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CodecError::Config {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        tracing::debug!("Loading codec configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Resolve the encoding for a field, falling back to the default.
    pub fn charset_for(&self, label: Option<&str>) -> Result<Charset> {
        Charset::for_label(label.unwrap_or(&self.default_encoding))
    }

    fn validate(&self) -> Result<()> {
        Charset::for_label(&self.default_encoding)?;
        let m = &self.markers;
        if m.packed_positive == m.packed_negative {
            return Err(CodecError::Config {
                message: "packed_positive and packed_negative must differ".to_string(),
            });
        }
        if m.zoned_positive == m.zoned_negative {
            return Err(CodecError::Config {
                message: "zoned_positive and zoned_negative must differ".to_string(),
            });
        }
        Ok(())
    }
}

/// Default marker nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Sign nibble written by unsigned packed fields.
    #[serde(deserialize_with = "nibble")]
    pub packed_unsigned: u8,
    /// Sign nibble for non-negative signed packed values.
    #[serde(deserialize_with = "nibble")]
    pub packed_positive: u8,
    /// Sign nibble for negative signed packed values.
    #[serde(deserialize_with = "nibble")]
    pub packed_negative: u8,
    /// Zone nibble of every unsigned zoned digit.
    #[serde(deserialize_with = "nibble")]
    pub zoned_zone: u8,
    /// Rightmost zone for non-negative signed zoned values.
    #[serde(deserialize_with = "nibble")]
    pub zoned_positive: u8,
    /// Rightmost zone for negative signed zoned values.
    #[serde(deserialize_with = "nibble")]
    pub zoned_negative: u8,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            packed_unsigned: 0x0F,
            packed_positive: 0x0C,
            packed_negative: 0x0D,
            zoned_zone: 0x03,
            zoned_positive: 0x03,
            zoned_negative: 0x07,
        }
    }
}

/// Order in which value transforms run on encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformOrder {
    /// Mirror of decode: last declared transform runs first.
    #[default]
    Reverse,
    /// Same order as decode.
    Declared,
}

/// Transform composition settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Encode-side transform order.
    pub encode_order: TransformOrder,
}

fn nibble<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u8),
        Text(String),
    }

    let parsed = match Raw::deserialize(deserializer)? {
        Raw::Int(n) if n <= 0x0F => Some(n),
        Raw::Int(_) => None,
        Raw::Text(s) => parse_marker(&s),
    };
    parsed.ok_or_else(|| de::Error::custom("expected a hexadecimal nibble 0-F"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.default_encoding, "UTF-8");
        assert_eq!(config.markers.packed_positive, 0x0C);
        assert_eq!(config.pipeline.encode_order, TransformOrder::Reverse);
    }

    #[test]
    fn test_parse_partial() {
        let config = CodecConfig::from_toml_str(
            r#"
            default_encoding = "Shift_JIS"

            [markers]
            zoned_zone = "F"
            zoned_positive = "0xC"
            zoned_negative = 13

            [pipeline]
            encode_order = "declared"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_encoding, "Shift_JIS");
        assert_eq!(config.markers.zoned_zone, 0x0F);
        assert_eq!(config.markers.zoned_positive, 0x0C);
        assert_eq!(config.markers.zoned_negative, 0x0D);
        assert_eq!(config.markers.packed_unsigned, 0x0F);
        assert_eq!(config.pipeline.encode_order, TransformOrder::Declared);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(CodecConfig::from_toml_str("default_encoding = \"nope\"").is_err());
        assert!(CodecConfig::from_toml_str("[markers]\npacked_positive = \"XY\"").is_err());
        assert!(CodecConfig::from_toml_str("[markers]\npacked_positive = \"D\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_encoding = \"windows-1252\"").unwrap();
        let config = CodecConfig::load(file.path()).unwrap();
        assert_eq!(config.charset_for(None).unwrap().name(), "windows-1252");
        assert_eq!(
            config.charset_for(Some("utf8")).unwrap().name(),
            "UTF-8"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = CodecConfig::load(Path::new("/nonexistent/fieldcodec.toml")).unwrap_err();
        assert!(matches!(err, CodecError::Config { .. }));
    }
}
