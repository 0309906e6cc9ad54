//! Raw byte-sequence fields.

use crate::error::CodecError;
use crate::spec::FieldSpec;
use crate::value::{StreamKind, Value, Wire};
use crate::Result;

use super::FieldCodec;

/// Codec that hands field bytes to the application unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCodec {
    width: usize,
}

impl RawCodec {
    /// Create a codec for a field of `width` bytes.
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(CodecError::InvalidWidth { width: 0 });
        }
        Ok(Self { width })
    }

    /// Build from a field specification. Arguments: `[width]`.
    pub fn from_spec(spec: &FieldSpec) -> Result<Self> {
        Self::new(spec.width_arg()?)
    }
}

impl FieldCodec for RawCodec {
    fn width(&self) -> usize {
        self.width
    }

    fn stream(&self) -> StreamKind {
        StreamKind::Bytes
    }

    fn decode(&self, wire: &Wire) -> Result<Value> {
        Ok(Value::Bytes(wire.as_bytes()?.to_vec()))
    }

    fn encode(&self, value: &Value) -> Result<Wire> {
        match value {
            Value::Bytes(bytes) if bytes.len() > self.width => Err(CodecError::FieldOverflow {
                length: bytes.len(),
                width: self.width,
            }),
            Value::Bytes(bytes) => Ok(Wire::Bytes(bytes.clone())),
            other => Err(CodecError::TypeMismatch {
                expected: "bytes",
                found: other.type_name(),
            }),
        }
    }
}
