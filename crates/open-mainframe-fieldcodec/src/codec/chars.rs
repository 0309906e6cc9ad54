//! Character-stream text fields.
//!
//! These codecs work on text the record formatter has already decoded, so
//! they do no byte conversion. The variants differ only in how empty text
//! and null are mapped.

use crate::error::CodecError;
use crate::spec::FieldSpec;
use crate::value::{StreamKind, Value, Wire};
use crate::Result;

use super::FieldCodec;

/// Null and empty-text handling of a [`TextCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Decode maps `""` to null when `empty_as_null` is set; encode maps
    /// null to `""`.
    Nullable {
        /// Whether empty decoded text becomes null.
        empty_as_null: bool,
    },
    /// Decode never yields null; encode maps null to `""`.
    Plain,
    /// Decode does nothing; encode maps null to null.
    Passthrough,
}

/// Codec for character-stream text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCodec {
    mode: TextMode,
    width: Option<usize>,
}

impl TextCodec {
    /// Create a text codec.
    pub fn new(mode: TextMode, width: Option<usize>) -> Self {
        Self { mode, width }
    }

    /// Build the nullable variant. Arguments: `[empty_as_null?]`.
    pub fn nullable_from_spec(spec: &FieldSpec) -> Result<Self> {
        let empty_as_null = spec.bool_arg(0, "empty_as_null", false)?;
        Ok(Self::new(TextMode::Nullable { empty_as_null }, spec.width))
    }

    /// The null-handling mode.
    pub fn mode(&self) -> TextMode {
        self.mode
    }
}

impl FieldCodec for TextCodec {
    fn width(&self) -> usize {
        self.width.unwrap_or(0)
    }

    fn stream(&self) -> StreamKind {
        StreamKind::Chars
    }

    fn decode(&self, wire: &Wire) -> Result<Value> {
        let value = match wire {
            Wire::Null => Value::Null,
            Wire::Text(text) => match self.mode {
                TextMode::Nullable {
                    empty_as_null: true,
                } if text.is_empty() => Value::Null,
                _ => Value::Text(text.clone()),
            },
            Wire::Bytes(_) => {
                return Err(CodecError::TypeMismatch {
                    expected: "text",
                    found: wire.type_name(),
                })
            }
        };
        Ok(value)
    }

    fn encode(&self, value: &Value) -> Result<Wire> {
        match (self.mode, value.to_text()?) {
            (TextMode::Passthrough, None) => Ok(Wire::Null),
            (_, None) => Ok(Wire::Text(String::new())),
            (_, Some(text)) => Ok(Wire::Text(text)),
        }
    }
}
