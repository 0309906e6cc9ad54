//! Field codecs.
//!
//! A codec converts between the wire content of one fixed-width field and
//! its domain [`Value`]. Codecs are built once per field from a
//! [`FieldSpec`] and are immutable afterwards, so a single instance can be
//! shared across threads and records.
//!
//! # Codec kinds
//!
//! | Kind | Wire | Domain |
//! |------|------|--------|
//! | `string`, `double-byte-string` | bytes | text |
//! | `bytes` | bytes | bytes |
//! | `text`, `plain-text`, `passthrough` | text | text |
//! | `numeric`, `signed-numeric` | bytes | decimal |
//! | `packed`, `signed-packed` | bytes | decimal |
//! | `zoned`, `signed-zoned` | bytes | decimal |

mod chars;
mod numeric;
mod packed;
mod raw;
mod sign;
mod string;
mod zoned;

use std::fmt;

use serde::Deserialize;

pub use chars::{TextCodec, TextMode};
pub use numeric::{NumericPattern, NumericStringCodec, SignFormat};
pub use packed::{pack_unscaled, unpack_unscaled, PackedCodec};
pub use raw::RawCodec;
pub use sign::SignPolicy;
pub use string::{ByteStringCodec, Density};
pub use zoned::{unzone_unscaled, zone_unscaled, ZonedCodec};

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::spec::FieldSpec;
use crate::value::{StreamKind, Value, Wire};
use crate::Result;

/// Contract implemented by every field codec.
pub trait FieldCodec: fmt::Debug + Send + Sync {
    /// Field width in bytes (or characters for character-stream codecs).
    fn width(&self) -> usize;

    /// Whether the codec exchanges bytes or characters with the record.
    fn stream(&self) -> StreamKind;

    /// Convert wire content to a domain value.
    fn decode(&self, wire: &Wire) -> Result<Value>;

    /// Convert a domain value to wire content.
    fn encode(&self, value: &Value) -> Result<Wire>;
}

/// Bytes of a fixed-width field, rejecting content of any other length.
pub(crate) fn field_bytes(wire: &Wire, width: usize) -> Result<&[u8]> {
    let bytes = wire.as_bytes()?;
    if bytes.len() != width {
        return Err(CodecError::WidthMismatch {
            length: bytes.len(),
            width,
        });
    }
    Ok(bytes)
}

/// Names the codec a field uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodecKind {
    /// Single-byte padded string.
    #[default]
    String,
    /// Double-byte padded string.
    DoubleByteString,
    /// Raw byte sequence.
    Bytes,
    /// Character text, optionally mapping empty to null.
    Text,
    /// Character text that never decodes to null.
    PlainText,
    /// Character text passed through untouched.
    Passthrough,
    /// Unsigned numeric string.
    Numeric,
    /// Signed numeric string.
    SignedNumeric,
    /// Unsigned packed decimal.
    Packed,
    /// Signed packed decimal.
    SignedPacked,
    /// Unsigned zoned decimal.
    Zoned,
    /// Signed zoned decimal.
    SignedZoned,
}

impl CodecKind {
    /// Parse a codec name such as `"signed-packed"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "string" => CodecKind::String,
            "double-byte-string" => CodecKind::DoubleByteString,
            "bytes" => CodecKind::Bytes,
            "text" => CodecKind::Text,
            "plain-text" => CodecKind::PlainText,
            "passthrough" => CodecKind::Passthrough,
            "numeric" => CodecKind::Numeric,
            "signed-numeric" => CodecKind::SignedNumeric,
            "packed" => CodecKind::Packed,
            "signed-packed" => CodecKind::SignedPacked,
            "zoned" => CodecKind::Zoned,
            "signed-zoned" => CodecKind::SignedZoned,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true for codecs producing exact decimals.
    pub fn is_decimal(&self) -> bool {
        matches!(
            self,
            CodecKind::Numeric
                | CodecKind::SignedNumeric
                | CodecKind::Packed
                | CodecKind::SignedPacked
                | CodecKind::Zoned
                | CodecKind::SignedZoned
        )
    }
}

/// Build the codec named by `spec.codec`.
pub fn build_codec(spec: &FieldSpec, config: &CodecConfig) -> Result<Box<dyn FieldCodec>> {
    let codec: Box<dyn FieldCodec> = match spec.codec {
        CodecKind::String => Box::new(ByteStringCodec::from_spec(spec, config, Density::Single)?),
        CodecKind::DoubleByteString => {
            Box::new(ByteStringCodec::from_spec(spec, config, Density::Double)?)
        }
        CodecKind::Bytes => Box::new(RawCodec::from_spec(spec)?),
        CodecKind::Text => Box::new(TextCodec::nullable_from_spec(spec)?),
        CodecKind::PlainText => Box::new(TextCodec::new(TextMode::Plain, spec.width)),
        CodecKind::Passthrough => Box::new(TextCodec::new(TextMode::Passthrough, spec.width)),
        CodecKind::Numeric => Box::new(NumericStringCodec::unsigned_from_spec(spec, config)?),
        CodecKind::SignedNumeric => {
            Box::new(NumericStringCodec::signed_from_spec(spec, config)?)
        }
        CodecKind::Packed => Box::new(PackedCodec::unsigned_from_spec(spec, config)?),
        CodecKind::SignedPacked => Box::new(PackedCodec::signed_from_spec(spec, config)?),
        CodecKind::Zoned => Box::new(ZonedCodec::unsigned_from_spec(spec, config)?),
        CodecKind::SignedZoned => Box::new(ZonedCodec::signed_from_spec(spec, config)?),
    };
    tracing::debug!(
        "Built {:?} codec for field {} (width {})",
        spec.codec,
        spec.name,
        codec.width()
    );
    Ok(codec)
}
