//! Domain and wire value types exchanged with the record formatter.

use std::fmt;

use rust_decimal::Decimal;

use crate::error::CodecError;
use crate::Result;

/// Application-level value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// No value.
    Null,
    /// Text.
    Text(String),
    /// Whole number handed to an encoder. Decoders never produce it.
    Integer(i64),
    /// Exact decimal number.
    Decimal(Decimal),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Value {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the decimal, if this is a decimal value.
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Stringify a scalar value. Null becomes `None`; bytes are rejected.
    pub fn to_text(&self) -> Result<Option<String>> {
        match self {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            Value::Integer(i) => Ok(Some(i.to_string())),
            Value::Decimal(d) => Ok(Some(d.to_string())),
            Value::Bytes(_) => Err(CodecError::TypeMismatch {
                expected: "text or number",
                found: self.type_name(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

/// How a codec exchanges data with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// The codec reads and writes bytes.
    Bytes,
    /// The codec reads and writes characters.
    Chars,
}

/// Wire representation of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wire {
    /// Byte slice content.
    Bytes(Vec<u8>),
    /// Character slice content.
    Text(String),
    /// Absent content; only produced by passthrough character codecs.
    Null,
}

impl Wire {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Wire::Bytes(_) => "bytes",
            Wire::Text(_) => "text",
            Wire::Null => "null",
        }
    }

    /// Borrow the bytes of a byte-stream wire value.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Wire::Bytes(b) => Ok(b),
            other => Err(CodecError::TypeMismatch {
                expected: "bytes",
                found: other.type_name(),
            }),
        }
    }

    /// Consume a byte-stream wire value.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Wire::Bytes(b) => Ok(b),
            other => Err(CodecError::TypeMismatch {
                expected: "bytes",
                found: other.type_name(),
            }),
        }
    }
}

impl From<&[u8]> for Wire {
    fn from(b: &[u8]) -> Self {
        Wire::Bytes(b.to_vec())
    }
}

impl From<&str> for Wire {
    fn from(s: &str) -> Self {
        Wire::Text(s.to_string())
    }
}

/// Numeric candidate accepted by the decimal codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericInput {
    /// Decimal or integer text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Exact decimal.
    Decimal(Decimal),
}

impl NumericInput {
    /// Narrow a domain value to a numeric input. `Null` maps to `None`.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(NumericInput::Text(s.clone()))),
            Value::Integer(i) => Ok(Some(NumericInput::Integer(*i))),
            Value::Decimal(d) => Ok(Some(NumericInput::Decimal(*d))),
            Value::Bytes(_) => Err(CodecError::TypeMismatch {
                expected: "number or numeric text",
                found: value.type_name(),
            }),
        }
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericInput::Text(s) => write!(f, "{}", s),
            NumericInput::Integer(i) => write!(f, "{}", i),
            NumericInput::Decimal(d) => write!(f, "{}", d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Null.to_text().unwrap(), None);
        assert_eq!(
            Value::Decimal(Decimal::from_str("1.50").unwrap())
                .to_text()
                .unwrap()
                .as_deref(),
            Some("1.50")
        );
        assert!(Value::Bytes(vec![1]).to_text().is_err());
    }

    #[test]
    fn test_numeric_input_from_value() {
        assert_eq!(NumericInput::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            NumericInput::from_value(&Value::Integer(7)).unwrap(),
            Some(NumericInput::Integer(7))
        );
        assert!(NumericInput::from_value(&Value::Bytes(vec![])).is_err());
    }

    #[test]
    fn test_wire_as_bytes() {
        assert_eq!(Wire::from(&b"AB"[..]).as_bytes().unwrap(), b"AB");
        assert!(Wire::from("AB").as_bytes().is_err());
    }
}
