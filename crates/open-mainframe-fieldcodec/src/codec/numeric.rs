//! Fixed-width numeric strings.
//!
//! The field holds decimal digits as text, left-padded to the field width.
//! The unsigned form accepts `pad* digits(.digits)?`; the signed form adds a
//! sign character either at the very front of the field (fixed position) or
//! immediately before the first significant digit (floating position).
//!
//! | Value | Width | Scale | Options | Field |
//! |-------|-------|-------|---------|-------|
//! | 123.45 | 10 | 2 | decimal point | `0000123.45` |
//! | 123.45 | 10 | 2 | | `0000012345` |
//! | -12345 | 10 | 0 | fixed sign | `-000012345` |
//! | -12345 | 10 | 0 | floating sign, pad `' '` | `    -12345` |

use std::fmt;

use regex::Regex;
use rust_decimal::Decimal;

use super::{field_bytes, FieldCodec};
use crate::charset::Charset;
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::normalize;
use crate::spec::FieldSpec;
use crate::value::{NumericInput, StreamKind, Value, Wire};
use crate::Result;

/// Sign characters and placement of a signed numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignFormat {
    /// Character written for non-negative values when required.
    pub plus: char,
    /// Character written for negative values.
    pub minus: char,
    /// Place the sign after the pad fill instead of at offset 0.
    pub floating: bool,
    /// Emit the plus character for non-negative values.
    pub plus_required: bool,
}

impl Default for SignFormat {
    fn default() -> Self {
        Self {
            plus: '+',
            minus: '-',
            floating: false,
            plus_required: false,
        }
    }
}

impl SignFormat {
    /// Split a leading sign off `text`.
    ///
    /// Returns `(negative, had_sign, rest)`, or `None` when a required sign
    /// is missing.
    fn strip<'a>(&self, text: &'a str) -> Option<(bool, bool, &'a str)> {
        if let Some(rest) = text.strip_prefix(self.minus) {
            Some((true, true, rest))
        } else if let Some(rest) = text.strip_prefix(self.plus) {
            Some((false, true, rest))
        } else if self.plus_required {
            None
        } else {
            Some((false, false, text))
        }
    }

    fn prefix(&self, negative: bool) -> Option<char> {
        if negative {
            Some(self.minus)
        } else if self.plus_required {
            Some(self.plus)
        } else {
            None
        }
    }
}

const BODY: &str = r"(?P<body>[0-9]+(?:\.[0-9]+)?)";

/// Validation pattern of a numeric string field.
///
/// Compiled once from the pad and sign characters. The `body` group is what
/// remains after the pad run; with a `'0'` pad an all-zero field leaves a
/// single `0` there.
#[derive(Debug, Clone)]
pub struct NumericPattern {
    regex: Regex,
    sign: Option<SignFormat>,
}

impl NumericPattern {
    /// Pattern `pad* digits(.digits)?`.
    pub fn unsigned(pad: char) -> Result<Self> {
        Self::compile(pad, None)
    }

    /// Pattern with a fixed or floating sign.
    pub fn signed(pad: char, sign: SignFormat) -> Result<Self> {
        Self::compile(pad, Some(sign))
    }

    fn compile(pad: char, sign: Option<SignFormat>) -> Result<Self> {
        let fill = format!("(?:{})*", regex::escape(&pad.to_string()));
        let source = match sign {
            None => format!("^{}{}$", fill, BODY),
            Some(format) => {
                let mut class = format!(
                    "(?P<sign>{}|{})",
                    regex::escape(&format.plus.to_string()),
                    regex::escape(&format.minus.to_string())
                );
                if !format.plus_required {
                    class.push('?');
                }
                if format.floating {
                    format!("^{}{}{}$", fill, class, BODY)
                } else {
                    format!("^{}{}{}$", class, fill, BODY)
                }
            }
        };
        let regex = Regex::new(&source).map_err(|e| CodecError::Config {
            message: format!("numeric pattern {}: {}", source, e),
        })?;
        Ok(Self { regex, sign })
    }

    /// Source of the compiled expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns true when `text` matches the pattern.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Validate `text` and split it into a negative flag and the digit body
    /// with padding removed.
    pub fn parse<'a>(&self, text: &'a str) -> Option<(bool, &'a str)> {
        let captures = self.regex.captures(text)?;
        let negative = match (self.sign, captures.name("sign")) {
            (Some(format), Some(sign)) => sign.as_str().starts_with(format.minus),
            _ => false,
        };
        Some((negative, captures.name("body")?.as_str()))
    }
}

impl fmt::Display for NumericPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric string codec, unsigned or signed.
#[derive(Debug, Clone)]
pub struct NumericStringCodec {
    width: usize,
    scale: i32,
    decimal_point: bool,
    charset: Charset,
    pad: char,
    pattern: NumericPattern,
}

impl NumericStringCodec {
    /// Create a codec. `sign` is `None` for the unsigned form.
    pub fn new(
        width: usize,
        scale: i32,
        decimal_point: bool,
        charset: Charset,
        pad: char,
        sign: Option<SignFormat>,
    ) -> Result<Self> {
        if width == 0 {
            return Err(CodecError::InvalidWidth { width: 0 });
        }
        if matches!(pad, '1'..='9') {
            return Err(CodecError::ForbiddenPadding { padding: pad });
        }
        charset.pad_sequence(pad, 1)?;

        let pattern = match sign {
            None => NumericPattern::unsigned(pad)?,
            Some(sign) => {
                check_sign_char(&charset, sign.plus, 5, "plus")?;
                check_sign_char(&charset, sign.minus, 6, "minus")?;
                if sign.plus == sign.minus {
                    return Err(CodecError::InvalidArgument {
                        position: 6,
                        name: "minus",
                        expected: "character different from the plus character",
                        found: format!("{:?}", sign.minus),
                    });
                }
                NumericPattern::signed(pad, sign)?
            }
        };

        Ok(Self {
            width,
            scale,
            decimal_point,
            charset,
            pad,
            pattern,
        })
    }

    /// Build the unsigned codec. Arguments: `[width, scale?, decimal_point?]`.
    pub fn unsigned_from_spec(spec: &FieldSpec, config: &CodecConfig) -> Result<Self> {
        let width = spec.width_arg()?;
        let scale = spec.scale_arg(1)?;
        let decimal_point = spec.bool_arg(2, "decimal_point", false)?;
        let charset = config.charset_for(spec.encoding.as_deref())?;
        Self::new(width, scale, decimal_point, charset, spec.pad_char('0')?, None)
    }

    /// Build the signed codec. Arguments: `[width, scale?, decimal_point?,
    /// floating_sign?, plus_required?, plus_char?, minus_char?]`.
    pub fn signed_from_spec(spec: &FieldSpec, config: &CodecConfig) -> Result<Self> {
        let width = spec.width_arg()?;
        let scale = spec.scale_arg(1)?;
        let decimal_point = spec.bool_arg(2, "decimal_point", false)?;
        let sign = SignFormat {
            floating: spec.bool_arg(3, "floating_sign", false)?,
            plus_required: spec.bool_arg(4, "plus_required", false)?,
            plus: spec.char_arg(5, "plus", '+')?,
            minus: spec.char_arg(6, "minus", '-')?,
        };
        let charset = config.charset_for(spec.encoding.as_deref())?;
        Self::new(
            width,
            scale,
            decimal_point,
            charset,
            spec.pad_char('0')?,
            Some(sign),
        )
    }

    /// Number of implied fractional digits.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// The validation pattern applied on decode.
    pub fn pattern(&self) -> &NumericPattern {
        &self.pattern
    }

    /// Parse field text into an exact decimal.
    pub fn decode_text(&self, text: &str) -> Result<Decimal> {
        let (negative, body) = self
            .pattern
            .parse(text)
            .ok_or_else(|| CodecError::InvalidNumber {
                value: text.to_string(),
                expected: self.pattern.to_string(),
            })?;

        let parsed = if body.contains('.') {
            normalize::parse_literal(body)
        } else {
            normalize::parse_integer(body)
                .map(|unscaled| normalize::from_unscaled(unscaled, self.scale))
                .transpose()?
        };
        let magnitude = parsed.ok_or_else(|| CodecError::InvalidNumber {
            value: text.to_string(),
            expected: self.pattern.to_string(),
        })?;

        Ok(if negative && !magnitude.is_zero() {
            -magnitude
        } else {
            magnitude
        })
    }

    /// Format a numeric input as padded field text.
    pub fn encode_text(&self, input: Option<&NumericInput>) -> Result<String> {
        let value = normalize::to_exact_decimal(input, Some(self.scale))?;
        let negative = value.is_sign_negative() && !value.is_zero();
        let sign = match self.pattern.sign {
            None if negative => {
                return Err(CodecError::NegativeValue {
                    value: value.to_string(),
                })
            }
            None => None,
            Some(format) => format.prefix(negative).map(|c| (c, format.floating)),
        };

        let digits = self.format_magnitude(value.abs())?;
        let length = digits.len() + usize::from(sign.is_some());
        if length > self.width {
            return Err(CodecError::FieldOverflow {
                length,
                width: self.width,
            });
        }

        let fill = self.width - length;
        let mut text = String::with_capacity(self.width);
        match sign {
            Some((c, false)) => {
                text.push(c);
                text.extend(std::iter::repeat(self.pad).take(fill));
            }
            Some((c, true)) => {
                text.extend(std::iter::repeat(self.pad).take(fill));
                text.push(c);
            }
            None => text.extend(std::iter::repeat(self.pad).take(fill)),
        }
        text.push_str(&digits);
        tracing::trace!("Formatted numeric field {:?}", text);
        Ok(text)
    }

    fn format_magnitude(&self, magnitude: Decimal) -> Result<String> {
        if self.decimal_point && self.scale < 0 {
            return self.format_quotient(magnitude);
        }
        let unscaled =
            normalize::to_unscaled_integer(Some(&NumericInput::Decimal(magnitude)), self.scale)?;
        let digits = unscaled.unsigned_abs().to_string();
        if !self.decimal_point || self.scale == 0 {
            return Ok(digits);
        }

        let scale = self.scale.unsigned_abs() as usize;
        let digits = format!("{:0>width$}", digits, width = scale + 1);
        let (int, frac) = digits.split_at(digits.len() - scale);
        Ok(format!("{}.{}", int, frac))
    }

    /// Negative scale with a decimal point: print `magnitude / 10^-scale`
    /// at the quotient's own scale.
    fn format_quotient(&self, magnitude: Decimal) -> Result<String> {
        let own = magnitude.scale();
        let mut quotient = magnitude;
        quotient
            .set_scale(own + self.scale.unsigned_abs())
            .map_err(|_| CodecError::ScaleOverflow {
                value: magnitude.to_string(),
                scale: self.scale,
            })?;
        let mut quotient = quotient.normalize();
        if quotient.scale() < own {
            quotient.rescale(own);
        }
        normalize::ensure_precision(&quotient)?;
        Ok(quotient.to_string())
    }
}

fn check_sign_char(
    charset: &Charset,
    c: char,
    position: usize,
    name: &'static str,
) -> Result<()> {
    let invalid = || CodecError::InvalidArgument {
        position,
        name,
        expected: "single-byte non-digit character",
        found: format!("{:?}", c),
    };
    if c.is_ascii_digit() || c == '.' {
        return Err(invalid());
    }
    charset.pad_sequence(c, 1).map_err(|_| invalid())?;
    Ok(())
}

impl FieldCodec for NumericStringCodec {
    fn width(&self) -> usize {
        self.width
    }

    fn stream(&self) -> StreamKind {
        StreamKind::Bytes
    }

    fn decode(&self, wire: &Wire) -> Result<Value> {
        let text = self.charset.decode(field_bytes(wire, self.width)?)?;
        Ok(Value::Decimal(self.decode_text(&text)?))
    }

    fn encode(&self, value: &Value) -> Result<Wire> {
        let input = NumericInput::from_value(value)?;
        let text = self.encode_text(input.as_ref())?;
        let bytes = self.charset.encode(&text)?;
        if bytes.len() > self.width {
            return Err(CodecError::FieldOverflow {
                length: bytes.len(),
                width: self.width,
            });
        }
        Ok(Wire::Bytes(bytes))
    }
}
