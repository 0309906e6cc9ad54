//! Decimal-literal validation for character-stream fields.

use regex::Regex;
use rust_decimal::Decimal;

use super::ValueTransform;
use crate::error::CodecError;
use crate::normalize;
use crate::value::Value;
use crate::Result;

const UNSIGNED_PATTERN: &str = r"^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$";
const SIGNED_PATTERN: &str = r"^[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$";

/// Validates decimal text without doing any byte-level work.
///
/// Decoding turns valid text into a [`Decimal`]; encoding hands valid text
/// on unchanged so the original formatting survives.
#[derive(Debug, Clone)]
pub struct NumericText {
    signed: bool,
    regex: Regex,
}

impl NumericText {
    /// Accept only unsigned literals.
    pub fn unsigned() -> Result<Self> {
        Self::compile(false, UNSIGNED_PATTERN)
    }

    /// Accept an optional leading `+` or `-`.
    pub fn signed() -> Result<Self> {
        Self::compile(true, SIGNED_PATTERN)
    }

    fn compile(signed: bool, source: &str) -> Result<Self> {
        let regex = Regex::new(source).map_err(|e| CodecError::Config {
            message: format!("numeric text pattern {}: {}", source, e),
        })?;
        Ok(Self { signed, regex })
    }

    /// Source of the compiled expression.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Parse `text`, or report it against the pattern.
    pub fn parse(&self, text: &str) -> Result<Decimal> {
        let invalid = || CodecError::InvalidNumber {
            value: text.to_string(),
            expected: self.pattern().to_string(),
        };
        if !self.regex.is_match(text) {
            return Err(invalid());
        }
        let literal = text.strip_prefix('+').unwrap_or(text);
        normalize::parse_literal(literal).ok_or_else(invalid)
    }

    fn check_number(&self, value: Decimal) -> Result<()> {
        if !self.signed && value.is_sign_negative() && !value.is_zero() {
            return Err(CodecError::InvalidNumber {
                value: value.to_string(),
                expected: self.pattern().to_string(),
            });
        }
        Ok(())
    }
}

impl ValueTransform for NumericText {
    fn name(&self) -> &'static str {
        if self.signed {
            "signed-numeric-text"
        } else {
            "numeric-text"
        }
    }

    fn decode(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Text(text) if text.is_empty() => Ok(Value::Null),
            Value::Text(text) => Ok(Value::Decimal(self.parse(&text)?)),
            Value::Integer(i) => {
                self.check_number(Decimal::from(i))?;
                Ok(Value::Decimal(Decimal::from(i)))
            }
            Value::Decimal(d) => {
                self.check_number(d)?;
                Ok(Value::Decimal(d))
            }
            Value::Bytes(_) => Err(CodecError::TypeMismatch {
                expected: "text",
                found: value.type_name(),
            }),
        }
    }

    fn encode(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Text(String::new())),
            Value::Text(text) if text.is_empty() => Ok(Value::Text(text)),
            Value::Text(text) => {
                self.parse(&text)?;
                Ok(Value::Text(text))
            }
            Value::Integer(i) => {
                self.check_number(Decimal::from(i))?;
                Ok(Value::Text(i.to_string()))
            }
            Value::Decimal(d) => {
                self.check_number(d)?;
                Ok(Value::Text(d.to_string()))
            }
            Value::Bytes(_) => Err(CodecError::TypeMismatch {
                expected: "number or numeric text",
                found: value.type_name(),
            }),
        }
    }
}
