//! Zoned decimal fields.
//!
//! Zoned decimal stores one digit per byte, with the zone nibble in the high
//! position and the digit in the low position.
//!
//! # Format
//!
//! For a field of `n` bytes:
//! - Each byte holds one digit in its low nibble
//! - Every zone nibble equals the configured zone marker, except on signed
//!   fields where the rightmost zone carries the sign
//! - Capacity = `n` digits
//!
//! Example: +12345 in 5 bytes with zone 3 (ASCII digits)
//! - Binary: 0x31 0x32 0x33 0x34 0x35
//!
//! Example: -12345 in 5 bytes with zone 3, negative marker 7
//! - Binary: 0x31 0x32 0x33 0x34 0x75
//! - The '7' zone in the last byte indicates negative

use rust_decimal::Decimal;

use super::{field_bytes, FieldCodec, SignPolicy};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::normalize;
use crate::spec::FieldSpec;
use crate::value::{NumericInput, StreamKind, Value, Wire};
use crate::Result;

/// Zoned decimal codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedCodec {
    width: usize,
    scale: i32,
    zone: u8,
    sign: SignPolicy,
}

impl ZonedCodec {
    /// Create an unsigned zoned codec; every zone must equal `zone`.
    pub fn unsigned(width: usize, scale: i32, zone: u8) -> Result<Self> {
        Self::new(width, scale, zone, SignPolicy::Unsigned { marker: zone })
    }

    /// Create a signed zoned codec; the rightmost zone carries the sign.
    pub fn signed(width: usize, scale: i32, zone: u8, positive: u8, negative: u8) -> Result<Self> {
        Self::new(width, scale, zone, SignPolicy::signed(positive, negative)?)
    }

    fn new(width: usize, scale: i32, zone: u8, sign: SignPolicy) -> Result<Self> {
        if width == 0 {
            return Err(CodecError::InvalidWidth { width: 0 });
        }
        Ok(Self {
            width,
            scale,
            zone,
            sign,
        })
    }

    /// Build the unsigned codec. Arguments: `[width, scale?, zone?]`.
    pub fn unsigned_from_spec(spec: &FieldSpec, config: &CodecConfig) -> Result<Self> {
        let width = spec.width_arg()?;
        let scale = spec.scale_arg(1)?;
        let zone = spec.marker_arg(2, "zone", config.markers.zoned_zone)?;
        Self::unsigned(width, scale, zone)
    }

    /// Build the signed codec.
    /// Arguments: `[width, scale?, positive?, negative?, zone?]`.
    pub fn signed_from_spec(spec: &FieldSpec, config: &CodecConfig) -> Result<Self> {
        let width = spec.width_arg()?;
        let scale = spec.scale_arg(1)?;
        let positive = spec.marker_arg(2, "positive", config.markers.zoned_positive)?;
        let negative = spec.marker_arg(3, "negative", config.markers.zoned_negative)?;
        let zone = spec.marker_arg(4, "zone", config.markers.zoned_zone)?;
        Self::signed(width, scale, zone, positive, negative)
    }

    /// Number of implied fractional digits.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Zone nibble of non-sign bytes.
    pub fn zone(&self) -> u8 {
        self.zone
    }

    /// Marker policy for the rightmost zone.
    pub fn sign(&self) -> SignPolicy {
        self.sign
    }

    /// Decode zoned bytes to an exact decimal at the field scale.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Decimal> {
        let unscaled = unzone_unscaled(bytes, self.zone, self.sign)?;
        normalize::from_unscaled(unscaled, self.scale)
    }

    /// Encode a numeric input to zoned bytes.
    pub fn encode_input(&self, input: Option<&NumericInput>) -> Result<Vec<u8>> {
        let unscaled = normalize::to_unscaled_integer(input, self.scale)?;
        zone_unscaled(unscaled, self.width, self.zone, self.sign)
    }
}

impl FieldCodec for ZonedCodec {
    fn width(&self) -> usize {
        self.width
    }

    fn stream(&self) -> StreamKind {
        StreamKind::Bytes
    }

    fn decode(&self, wire: &Wire) -> Result<Value> {
        Ok(Value::Decimal(self.decode_bytes(field_bytes(wire, self.width)?)?))
    }

    fn encode(&self, value: &Value) -> Result<Wire> {
        let input = NumericInput::from_value(value)?;
        Ok(Wire::Bytes(self.encode_input(input.as_ref())?))
    }
}

/// Zone an unscaled integer into `width` bytes.
///
/// # Errors
/// Fails when the magnitude needs more than `width` digits, or when a
/// negative value meets an unsigned policy.
pub fn zone_unscaled(unscaled: i64, width: usize, zone: u8, sign: SignPolicy) -> Result<Vec<u8>> {
    let marker = sign.marker_for(unscaled < 0, || unscaled.to_string())?;
    let mut magnitude = unscaled.unsigned_abs();

    let digits = magnitude.checked_ilog10().map_or(1, |log| log as usize + 1);
    if digits > width {
        return Err(CodecError::FieldOverflow {
            length: digits,
            width,
        });
    }

    let mut result = vec![0u8; width];
    for (i, byte) in result.iter_mut().enumerate().rev() {
        let digit = (magnitude % 10) as u8;
        magnitude /= 10;
        let high = if i == width - 1 { marker } else { zone };
        *byte = (high << 4) | digit;
    }
    Ok(result)
}

/// Unzone bytes to a signed unscaled integer.
///
/// # Errors
/// Fails on an empty slice, a digit nibble above 9, a non-sign zone other
/// than `zone`, or a rightmost zone the policy does not accept.
pub fn unzone_unscaled(bytes: &[u8], zone: u8, sign: SignPolicy) -> Result<i128> {
    let Some(&last) = bytes.last() else {
        return Err(CodecError::InvalidNumber {
            value: String::new(),
            expected: "zoned decimal of at least one byte".to_string(),
        });
    };
    let last_pos = bytes.len() - 1;
    let negative = sign.read((last & 0xF0) >> 4, last_pos)?;

    let mut magnitude: i128 = 0;
    for (position, &byte) in bytes.iter().enumerate() {
        let byte_zone = (byte & 0xF0) >> 4;
        if position != last_pos && byte_zone != zone {
            return Err(CodecError::InvalidMarker {
                marker: byte_zone,
                position,
                expected: format!("0x{:X}", zone),
            });
        }
        let digit = byte & 0x0F;
        if digit > 9 {
            return Err(CodecError::InvalidDigit {
                nibble: digit,
                position,
            });
        }
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(i128::from(digit)))
            .ok_or(CodecError::FieldOverflow {
                length: bytes.len(),
                width: 38,
            })?;
    }

    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecKind;
    use crate::spec::Arg;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ebcdic_signed() -> SignPolicy {
        SignPolicy::signed(0x0C, 0x0D).unwrap()
    }

    #[test]
    fn test_zone_positive_ebcdic_style() {
        // 0xF1 0xF2 0xF3 0xF4 0xC5
        assert_eq!(
            zone_unscaled(12345, 5, 0x0F, ebcdic_signed()).unwrap(),
            vec![0xF1, 0xF2, 0xF3, 0xF4, 0xC5]
        );
    }

    #[test]
    fn test_zone_negative() {
        assert_eq!(
            zone_unscaled(-12345, 5, 0x0F, ebcdic_signed()).unwrap(),
            vec![0xF1, 0xF2, 0xF3, 0xF4, 0xD5]
        );
    }

    #[test]
    fn test_zone_unsigned_pads_with_zone() {
        let unsigned = SignPolicy::Unsigned { marker: 0x03 };
        assert_eq!(
            zone_unscaled(42, 5, 0x03, unsigned).unwrap(),
            b"00042".to_vec()
        );
        assert!(matches!(
            zone_unscaled(-42, 5, 0x03, unsigned),
            Err(CodecError::NegativeValue { .. })
        ));
    }

    #[test]
    fn test_zone_capacity() {
        let unsigned = SignPolicy::Unsigned { marker: 0x0F };
        assert!(zone_unscaled(999, 3, 0x0F, unsigned).is_ok());
        assert!(matches!(
            zone_unscaled(1000, 3, 0x0F, unsigned),
            Err(CodecError::FieldOverflow { length: 4, width: 3 })
        ));
    }

    #[test]
    fn test_unzone() {
        assert_eq!(
            unzone_unscaled(&[0xF1, 0xF2, 0xF3, 0xF4, 0xC5], 0x0F, ebcdic_signed()).unwrap(),
            12345
        );
        assert_eq!(
            unzone_unscaled(&[0xF1, 0xF2, 0xF3, 0xF4, 0xD5], 0x0F, ebcdic_signed()).unwrap(),
            -12345
        );
    }

    #[test]
    fn test_unzone_rejects_foreign_zone() {
        // Sign marker in a non-final position.
        assert!(matches!(
            unzone_unscaled(&[0xF1, 0xC2, 0xC3], 0x0F, ebcdic_signed()),
            Err(CodecError::InvalidMarker { marker: 0x0C, position: 1, .. })
        ));
        // Unsigned fields check the rightmost zone too.
        let unsigned = SignPolicy::Unsigned { marker: 0x0F };
        assert!(matches!(
            unzone_unscaled(&[0xF1, 0xC2], 0x0F, unsigned),
            Err(CodecError::InvalidMarker { position: 1, .. })
        ));
        assert!(matches!(
            unzone_unscaled(&[0xFA], 0x0F, unsigned),
            Err(CodecError::InvalidDigit { nibble: 0x0A, .. })
        ));
    }

    #[test]
    fn test_ascii_defaults_roundtrip() {
        let config = CodecConfig::default();
        let spec = FieldSpec::new("QTY", CodecKind::SignedZoned)
            .with_args(vec![Arg::Integer(5), Arg::Integer(2)]);
        let codec = ZonedCodec::signed_from_spec(&spec, &config).unwrap();
        let wire = codec.encode(&Value::Decimal(dec("-123.45"))).unwrap();
        assert_eq!(wire, Wire::Bytes(b"1234u".to_vec()));
        assert_eq!(codec.decode(&wire).unwrap(), Value::Decimal(dec("-123.45")));

        let positive = codec.encode(&Value::Decimal(dec("1.5"))).unwrap();
        assert_eq!(positive, Wire::Bytes(b"00150".to_vec()));
    }

    #[test]
    fn test_unsigned_from_spec() {
        let spec = FieldSpec::new("QTY", CodecKind::Zoned).with_args(vec![
            Arg::Integer(4),
            Arg::Integer(0),
            Arg::from("F"),
        ]);
        let codec = ZonedCodec::unsigned_from_spec(&spec, &CodecConfig::default()).unwrap();
        assert_eq!(codec.zone(), 0x0F);
        assert_eq!(
            codec.encode(&Value::Integer(7)).unwrap(),
            Wire::Bytes(vec![0xF0, 0xF0, 0xF0, 0xF7])
        );
        assert_eq!(
            codec.decode(&Wire::Bytes(vec![0xF0, 0xF0, 0xF1, 0xF7])).unwrap(),
            Value::Decimal(dec("17"))
        );
    }

    #[test]
    fn test_eighteen_digits() {
        let codec = ZonedCodec::unsigned(19, 0, 0x03).unwrap();
        assert!(codec.encode(&Value::from("999999999999999999")).is_ok());
        assert!(matches!(
            codec.encode(&Value::from("9999999999999999999")),
            Err(CodecError::DigitOverflow { .. })
        ));
    }
}
