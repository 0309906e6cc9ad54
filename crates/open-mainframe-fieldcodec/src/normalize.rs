//! Decimal normalization shared by the numeric codecs.
//!
//! Every decimal codec funnels its input through this module once:
//! [`to_exact_decimal`] turns text, integers or decimals into a
//! [`Decimal`], and [`to_unscaled_integer`] aligns it to the field scale and
//! enforces the 18-digit ceiling used by the integer fast path.
//!
//! Field scales may be negative. A scale of `-2` means the stored digits are
//! hundreds: unscaled `123` at scale `-2` is `12300`.

use rust_decimal::Decimal;

use crate::error::CodecError;
use crate::value::NumericInput;
use crate::Result;

/// Maximum number of significant unscaled digits.
pub const MAX_DIGITS: u32 = 18;

/// Largest field scale, positive or negative, a [`Decimal`] can carry.
pub const MAX_SCALE: u32 = 28;

/// Largest unscaled magnitude accepted by the decimal codecs.
pub const MAX_UNSCALED: i64 = 999_999_999_999_999_999;

const INTEGER_PATTERN: &str = "[+-]?[0-9]+";
const DECIMAL_PATTERN: &str = "[+-]?([0-9]+(\\.[0-9]+)?|\\.[0-9]+)";

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

/// Normalize a numeric input to an exact decimal.
///
/// `None` and empty text yield zero. Decimals pass through unchanged. With a
/// `scale`, text and integers are unscaled digits: `"12345"` at scale 2 is
/// `123.45`, and text that is not an optionally signed digit run is a data
/// error. Without a scale, text is parsed as a decimal literal.
pub fn to_exact_decimal(input: Option<&NumericInput>, scale: Option<i32>) -> Result<Decimal> {
    let zero = || match scale {
        Some(s) => from_unscaled(0, s),
        None => Ok(Decimal::ZERO),
    };
    match input {
        None => zero(),
        Some(NumericInput::Decimal(d)) => Ok(*d),
        Some(NumericInput::Integer(i)) => match scale {
            Some(s) => from_unscaled(i128::from(*i), s),
            None => Ok(Decimal::from(*i)),
        },
        Some(NumericInput::Text(text)) if text.is_empty() => zero(),
        Some(NumericInput::Text(text)) => {
            let unsigned = text.strip_prefix('+').unwrap_or(text);
            match scale {
                Some(s) => {
                    let unscaled = parse_integer(unsigned).ok_or_else(|| {
                        CodecError::InvalidNumber {
                            value: text.clone(),
                            expected: INTEGER_PATTERN.to_string(),
                        }
                    })?;
                    from_unscaled(unscaled, s)
                }
                None => parse_literal(unsigned).ok_or_else(|| CodecError::InvalidNumber {
                    value: text.clone(),
                    expected: DECIMAL_PATTERN.to_string(),
                }),
            }
        }
    }
}

/// Normalize an input and return its unscaled magnitude at `scale`.
///
/// Fails when the value has more fractional digits than `scale` allows, and
/// when the unscaled magnitude exceeds [`MAX_UNSCALED`].
pub fn to_unscaled_integer(input: Option<&NumericInput>, scale: i32) -> Result<i64> {
    let value = to_exact_decimal(input, Some(scale))?;
    let unscaled = unscaled_at(&value, scale)?;
    bounded(unscaled, &value)
}

/// Check that a decimal's own mantissa stays within 18 digits.
pub fn ensure_precision(value: &Decimal) -> Result<()> {
    bounded(value.mantissa(), value).map(|_| ())
}

fn bounded(unscaled: i128, original: &Decimal) -> Result<i64> {
    if unscaled.unsigned_abs() > MAX_UNSCALED as u128 {
        let unscaled_text = unscaled.to_string();
        let original_text = original.to_string();
        let original = (original_text != unscaled_text).then_some(original_text);
        return Err(CodecError::DigitOverflow {
            unscaled: unscaled_text,
            original,
        });
    }
    // Bounded above, so the conversion cannot fail.
    i64::try_from(unscaled).map_err(|_| CodecError::DigitOverflow {
        unscaled: unscaled.to_string(),
        original: None,
    })
}

/// Build the exact decimal `unscaled × 10^-scale`.
pub fn from_unscaled(unscaled: i128, scale: i32) -> Result<Decimal> {
    let overflow = || CodecError::DigitOverflow {
        unscaled: unscaled.to_string(),
        original: None,
    };
    if scale >= 0 {
        Decimal::try_from_i128_with_scale(unscaled, scale.unsigned_abs()).map_err(|_| overflow())
    } else {
        let widened = pow10(scale.unsigned_abs())
            .and_then(|factor| unscaled.checked_mul(factor))
            .ok_or_else(overflow)?;
        Decimal::try_from_i128_with_scale(widened, 0).map_err(|_| overflow())
    }
}

/// Unscaled integer of `value` at `scale`.
///
/// Trailing zeros beyond `scale` are dropped; any other fractional digits
/// that do not fit are a scale error.
pub fn unscaled_at(value: &Decimal, scale: i32) -> Result<i128> {
    let mantissa = value.mantissa();
    let own = i64::from(value.scale());
    let shift = i64::from(scale) - own;
    let overflow = || CodecError::DigitOverflow {
        unscaled: mantissa.to_string(),
        original: Some(value.to_string()),
    };
    if shift >= 0 {
        let exp = u32::try_from(shift).map_err(|_| overflow())?;
        if mantissa == 0 {
            return Ok(0);
        }
        pow10(exp)
            .and_then(|factor| mantissa.checked_mul(factor))
            .ok_or_else(overflow)
    } else {
        let exp = u32::try_from(-shift).unwrap_or(u32::MAX);
        match pow10(exp) {
            Some(factor) if mantissa % factor == 0 => Ok(mantissa / factor),
            None if mantissa == 0 => Ok(0),
            _ => Err(CodecError::ScaleOverflow {
                value: value.to_string(),
                scale,
            }),
        }
    }
}

/// Parse an optionally signed run of ASCII digits.
pub(crate) fn parse_integer(text: &str) -> Option<i128> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i128>().ok()
}

/// Parse a plain decimal literal: `[-]digits[.digits]` or `[-].digits`.
pub(crate) fn parse_literal(text: &str) -> Option<Decimal> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let valid = match frac_part {
        Some(f) => !f.is_empty() && all_digits(f) && all_digits(int_part),
        None => !int_part.is_empty() && all_digits(int_part),
    };
    if !valid {
        return None;
    }
    let canonical = match (int_part.is_empty(), frac_part) {
        (true, Some(f)) => format!("0.{}", f),
        _ => body.to_string(),
    };
    let parsed = Decimal::from_str_exact(&canonical).ok()?;
    Some(if negative { -parsed } else { parsed })
}
