//! Packed decimal (BCD) fields.
//!
//! Packed decimal stores two decimal digits per byte, with the rightmost
//! nibble holding a sign or zone marker.
//!
//! # Format
//!
//! For a field of `n` bytes:
//! - The rightmost byte holds the least significant digit in its high nibble
//!   and the marker in its low nibble
//! - Every byte to the left holds two more digits, low nibble first, in
//!   increasing significance
//! - Capacity = `2 * n - 1` digits
//!
//! Example: +12345 in a 3-byte field with markers C (positive) / D (negative)
//! - Layout: d1|d2 d3|d4 d5|sign
//! - Binary: 0x12 0x34 0x5C
//!
//! Example: +123456 in a 4-byte field
//! - Layout: 0|d1 d2|d3 d4|d5 d6|sign (leading zero fill)
//! - Binary: 0x01 0x23 0x45 0x6C
//!
//! Marker values are configuration: unsigned fields use one fixed marker,
//! signed fields a positive and a negative marker.

use rust_decimal::Decimal;

use super::{field_bytes, FieldCodec, SignPolicy};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::normalize;
use crate::spec::FieldSpec;
use crate::value::{NumericInput, StreamKind, Value, Wire};
use crate::Result;

/// Packed decimal codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedCodec {
    width: usize,
    scale: i32,
    sign: SignPolicy,
}

impl PackedCodec {
    /// Create a packed decimal codec.
    ///
    /// # Arguments
    /// * `width` - Field width in bytes
    /// * `scale` - Number of implied fractional digits (may be negative)
    /// * `sign` - Marker policy for the rightmost nibble
    pub fn new(width: usize, scale: i32, sign: SignPolicy) -> Result<Self> {
        if width == 0 {
            return Err(CodecError::InvalidWidth { width: 0 });
        }
        Ok(Self { width, scale, sign })
    }

    /// Build the unsigned codec. Arguments: `[width, scale?, marker?]`.
    pub fn unsigned_from_spec(spec: &FieldSpec, config: &CodecConfig) -> Result<Self> {
        let width = spec.width_arg()?;
        let scale = spec.scale_arg(1)?;
        let marker = spec.marker_arg(2, "marker", config.markers.packed_unsigned)?;
        Self::new(width, scale, SignPolicy::Unsigned { marker })
    }

    /// Build the signed codec. Arguments: `[width, scale?, positive?, negative?]`.
    pub fn signed_from_spec(spec: &FieldSpec, config: &CodecConfig) -> Result<Self> {
        let width = spec.width_arg()?;
        let scale = spec.scale_arg(1)?;
        let positive = spec.marker_arg(2, "positive", config.markers.packed_positive)?;
        let negative = spec.marker_arg(3, "negative", config.markers.packed_negative)?;
        Self::new(width, scale, SignPolicy::signed(positive, negative)?)
    }

    /// Number of implied fractional digits.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Marker policy.
    pub fn sign(&self) -> SignPolicy {
        self.sign
    }

    /// Number of digits the field can hold.
    pub fn digit_capacity(&self) -> usize {
        self.width * 2 - 1
    }

    /// Decode packed bytes to an exact decimal at the field scale.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Decimal> {
        normalize::from_unscaled(unpack_unscaled(bytes, self.sign)?, self.scale)
    }

    /// Encode a numeric input to packed bytes.
    pub fn encode_input(&self, input: Option<&NumericInput>) -> Result<Vec<u8>> {
        let unscaled = normalize::to_unscaled_integer(input, self.scale)?;
        pack_unscaled(unscaled, self.width, self.sign)
    }
}

impl FieldCodec for PackedCodec {
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

/// Pack an unscaled integer into `width` bytes.
///
/// # Errors
/// Fails when the magnitude needs more than `2 * width - 1` digits, or when
/// a negative value meets an unsigned policy.
pub fn pack_unscaled(unscaled: i64, width: usize, sign: SignPolicy) -> Result<Vec<u8>> {
    let marker = sign.marker_for(unscaled < 0, || unscaled.to_string())?;
    let mut magnitude = unscaled.unsigned_abs();

    let digits = magnitude.checked_ilog10().map_or(1, |log| log as usize + 1);
    let capacity = width * 2 - 1;
    if digits > capacity {
        return Err(CodecError::FieldOverflow {
            length: digits,
            width: capacity,
        });
    }

    let mut next_digit = || {
        let digit = (magnitude % 10) as u8;
        magnitude /= 10;
        digit
    };

    let mut result = vec![0u8; width];
    // Rightmost byte: least significant digit and the marker.
    result[width - 1] = (next_digit() << 4) | marker;
    for byte in result[..width - 1].iter_mut().rev() {
        let low = next_digit();
        let high = next_digit();
        *byte = (high << 4) | low;
    }
    Ok(result)
}

/// Unpack packed bytes to a signed unscaled integer.
///
/// # Errors
/// Fails on an empty slice, a digit nibble above 9, or a marker the policy
/// does not accept.
pub fn unpack_unscaled(bytes: &[u8], sign: SignPolicy) -> Result<i128> {
    let Some((&last, rest)) = bytes.split_last() else {
        return Err(CodecError::InvalidNumber {
            value: String::new(),
            expected: "packed decimal of at least one byte".to_string(),
        });
    };
    let last_pos = bytes.len() - 1;
    let negative = sign.read(last & 0x0F, last_pos)?;

    let mut magnitude: i128 = 0;
    let mut push = |digit: u8, position: usize| -> Result<()> {
        if digit > 9 {
            return Err(CodecError::InvalidDigit {
                nibble: digit,
                position,
            });
        }
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(i128::from(digit)))
            .ok_or_else(|| CodecError::FieldOverflow {
                length: bytes.len() * 2 - 1,
                width: 38,
            })?;
        Ok(())
    };

    for (position, &byte) in rest.iter().enumerate() {
        push(byte >> 4, position)?;
        push(byte & 0x0F, position)?;
    }
    push(last >> 4, last_pos)?;

    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecKind;
    use crate::spec::Arg;
    use std::str::FromStr;

    const SIGNED: SignPolicy = SignPolicy::Signed {
        positive: 0x0C,
        negative: 0x0D,
    };
    const UNSIGNED: SignPolicy = SignPolicy::Unsigned { marker: 0x0F };

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_pack_positive_integer() {
        // d1|d2 d3|d4 d5|sign = 0x12 0x34 0x5C
        assert_eq!(pack_unscaled(12345, 3, SIGNED).unwrap(), vec![0x12, 0x34, 0x5C]);
    }

    #[test]
    fn test_pack_negative_integer() {
        assert_eq!(pack_unscaled(-12345, 3, SIGNED).unwrap(), vec![0x12, 0x34, 0x5D]);
    }

    #[test]
    fn test_pack_even_digits() {
        // 0|1 2|3 4|5 6|C
        assert_eq!(
            pack_unscaled(123456, 4, SIGNED).unwrap(),
            vec![0x01, 0x23, 0x45, 0x6C]
        );
    }

    #[test]
    fn test_pack_unsigned_marker() {
        assert_eq!(pack_unscaled(12345, 3, UNSIGNED).unwrap(), vec![0x12, 0x34, 0x5F]);
        assert!(matches!(
            pack_unscaled(-1, 3, UNSIGNED),
            Err(CodecError::NegativeValue { .. })
        ));
    }

    #[test]
    fn test_pack_zero_and_single_digit() {
        assert_eq!(pack_unscaled(0, 2, SIGNED).unwrap(), vec![0x00, 0x0C]);
        assert_eq!(pack_unscaled(5, 1, SIGNED).unwrap(), vec![0x5C]);
    }

    #[test]
    fn test_pack_capacity() {
        assert!(pack_unscaled(99999, 3, SIGNED).is_ok());
        assert!(matches!(
            pack_unscaled(100000, 3, SIGNED),
            Err(CodecError::FieldOverflow { length: 6, width: 5 })
        ));
    }

    #[test]
    fn test_unpack_positive_and_negative() {
        assert_eq!(unpack_unscaled(&[0x12, 0x34, 0x5C], SIGNED).unwrap(), 12345);
        assert_eq!(unpack_unscaled(&[0x12, 0x34, 0x5D], SIGNED).unwrap(), -12345);
        assert_eq!(
            unpack_unscaled(&[0x01, 0x23, 0x45, 0x6C], SIGNED).unwrap(),
            123456
        );
    }

    #[test]
    fn test_unpack_rejects_bad_marker() {
        assert!(matches!(
            unpack_unscaled(&[0x12, 0x34, 0x5F], SIGNED),
            Err(CodecError::InvalidMarker { marker: 0x0F, position: 2, .. })
        ));
        assert!(matches!(
            unpack_unscaled(&[0x12, 0x34, 0x5C], UNSIGNED),
            Err(CodecError::InvalidMarker { .. })
        ));
    }

    #[test]
    fn test_unpack_rejects_bad_digit() {
        assert!(matches!(
            unpack_unscaled(&[0x1A, 0x34, 0x5C], SIGNED),
            Err(CodecError::InvalidDigit { nibble: 0x0A, position: 0 })
        ));
        assert!(unpack_unscaled(&[0xF5], SIGNED).is_err());
        assert!(unpack_unscaled(&[], SIGNED).is_err());
    }

    #[test]
    fn test_integer_with_scale_decodes_scaled() {
        // Width 3, scale 2, unsigned: 12345 -> 123.45
        let codec = PackedCodec::new(3, 2, UNSIGNED).unwrap();
        let wire = codec.encode(&Value::Integer(12345)).unwrap();
        assert_eq!(wire, Wire::Bytes(vec![0x12, 0x34, 0x5F]));
        assert_eq!(codec.decode(&wire).unwrap(), Value::Decimal(dec("123.45")));
    }

    #[test]
    fn test_decimal_aligned_to_scale() {
        let codec = PackedCodec::new(4, 2, SIGNED).unwrap();
        let wire = codec.encode(&Value::Decimal(dec("-9.5"))).unwrap();
        assert_eq!(wire, Wire::Bytes(vec![0x00, 0x00, 0x95, 0x0D]));
        assert_eq!(codec.decode(&wire).unwrap(), Value::Decimal(dec("-9.50")));
        assert!(matches!(
            codec.encode(&Value::Decimal(dec("1.234"))),
            Err(CodecError::ScaleOverflow { .. })
        ));
    }

    #[test]
    fn test_scaled_text_must_be_digits() {
        let codec = PackedCodec::new(3, 2, SIGNED).unwrap();
        assert_eq!(
            codec.encode(&Value::from("-12345")).unwrap(),
            Wire::Bytes(vec![0x12, 0x34, 0x5D])
        );
        let err = codec.encode(&Value::from("123.45")).unwrap_err();
        assert!(matches!(err, CodecError::InvalidNumber { .. }));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_null_encodes_zero() {
        let codec = PackedCodec::new(2, 0, SIGNED).unwrap();
        assert_eq!(
            codec.encode(&Value::Null).unwrap(),
            Wire::Bytes(vec![0x00, 0x0C])
        );
    }

    #[test]
    fn test_eighteen_digit_limit() {
        let codec = PackedCodec::new(10, 0, SIGNED).unwrap();
        assert_eq!(codec.digit_capacity(), 19);
        let max = Value::from("999999999999999999");
        let wire = codec.encode(&max).unwrap();
        assert_eq!(
            codec.decode(&wire).unwrap(),
            Value::Decimal(dec("999999999999999999"))
        );
        assert!(matches!(
            codec.encode(&Value::from("1234567890123456789")),
            Err(CodecError::DigitOverflow { .. })
        ));
    }

    #[test]
    fn test_from_spec() {
        let config = CodecConfig::default();
        let spec = FieldSpec::new("AMT", CodecKind::SignedPacked).with_args(vec![
            Arg::Integer(3),
            Arg::Integer(1),
            Arg::from("A"),
            Arg::from("0xB"),
        ]);
        let codec = PackedCodec::signed_from_spec(&spec, &config).unwrap();
        assert_eq!(codec.scale(), 1);
        assert_eq!(
            codec.sign(),
            SignPolicy::Signed {
                positive: 0x0A,
                negative: 0x0B
            }
        );
        assert_eq!(
            codec.encode(&Value::Integer(-12345)).unwrap(),
            Wire::Bytes(vec![0x12, 0x34, 0x5B])
        );

        let spec = FieldSpec::new("AMT", CodecKind::Packed).with_args(vec![Arg::Integer(2)]);
        let codec = PackedCodec::unsigned_from_spec(&spec, &config).unwrap();
        assert_eq!(codec.sign(), SignPolicy::Unsigned { marker: 0x0F });
    }

    #[test]
    fn test_from_spec_rejects_same_markers() {
        let spec = FieldSpec::new("AMT", CodecKind::SignedPacked).with_args(vec![
            Arg::Integer(3),
            Arg::Null,
            Arg::from("C"),
            Arg::from("C"),
        ]);
        assert!(PackedCodec::signed_from_spec(&spec, &CodecConfig::default()).is_err());
    }
}
