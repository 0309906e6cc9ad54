//! Sign nibble policy for packed and zoned decimal fields.

use crate::error::CodecError;
use crate::Result;

/// How the rightmost marker nibble of a packed or zoned field is read and
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignPolicy {
    /// A single fixed marker; negative values are rejected.
    Unsigned {
        /// The marker nibble.
        marker: u8,
    },
    /// Separate markers for non-negative and negative values.
    Signed {
        /// Marker for values >= 0.
        positive: u8,
        /// Marker for values < 0.
        negative: u8,
    },
}

impl SignPolicy {
    /// Build a signed policy, rejecting identical markers.
    pub fn signed(positive: u8, negative: u8) -> Result<Self> {
        if positive == negative {
            return Err(CodecError::InvalidArgument {
                position: 3,
                name: "negative",
                expected: "marker different from the positive marker",
                found: format!("0x{:X}", negative),
            });
        }
        Ok(SignPolicy::Signed { positive, negative })
    }

    /// Returns true for [`SignPolicy::Signed`].
    pub fn is_signed(&self) -> bool {
        matches!(self, SignPolicy::Signed { .. })
    }

    /// Marker nibble to write for a value of the given sign.
    pub fn marker_for(&self, negative: bool, value: impl FnOnce() -> String) -> Result<u8> {
        match (self, negative) {
            (SignPolicy::Unsigned { .. }, true) => {
                Err(CodecError::NegativeValue { value: value() })
            }
            (SignPolicy::Unsigned { marker }, false) => Ok(*marker),
            (SignPolicy::Signed { negative: n, .. }, true) => Ok(*n),
            (SignPolicy::Signed { positive, .. }, false) => Ok(*positive),
        }
    }

    /// Interpret a marker nibble read at byte `position`; returns true when
    /// it denotes a negative value.
    pub fn read(&self, marker: u8, position: usize) -> Result<bool> {
        match *self {
            SignPolicy::Unsigned { marker: m } if marker == m => Ok(false),
            SignPolicy::Signed { positive, .. } if marker == positive => Ok(false),
            SignPolicy::Signed { negative, .. } if marker == negative => Ok(true),
            _ => Err(CodecError::InvalidMarker {
                marker,
                position,
                expected: self.describe(),
            }),
        }
    }

    fn describe(&self) -> String {
        match self {
            SignPolicy::Unsigned { marker } => format!("0x{:X}", marker),
            SignPolicy::Signed { positive, negative } => {
                format!("0x{:X} or 0x{:X}", positive, negative)
            }
        }
    }
}
