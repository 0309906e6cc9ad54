//! Field specifications consumed by codecs and transforms.
//!
//! A [`FieldSpec`] is produced by the layout loader and handed to
//! [`build_codec`](crate::codec::build_codec) or
//! [`FieldPipeline::from_spec`](crate::pipeline::FieldPipeline::from_spec).
//! Initialization arguments are positional; the typed readers on
//! [`FieldSpec`] turn missing or mistyped arguments into configuration
//! errors.

use serde::Deserialize;

use crate::codec::CodecKind;
use crate::error::CodecError;
use crate::normalize::MAX_SCALE;
use crate::transform::TransformKind;
use crate::Result;

/// A positional initialization argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    /// Integer literal.
    Integer(i64),
    /// Boolean literal.
    Bool(bool),
    /// Text literal.
    Text(String),
    /// Explicit null.
    Null,
}

impl Arg {
    fn describe(&self) -> String {
        match self {
            Arg::Integer(i) => format!("integer {}", i),
            Arg::Bool(b) => format!("boolean {}", b),
            Arg::Text(s) => format!("text {:?}", s),
            Arg::Null => "null".to_string(),
        }
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Integer(i)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

/// A value transform attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransformSpec {
    /// Which transform to build.
    pub kind: TransformKind,
    /// Transform arguments.
    #[serde(default)]
    pub args: Vec<Arg>,
}

impl TransformSpec {
    /// Create a transform specification.
    pub fn new(kind: TransformKind, args: Vec<Arg>) -> Self {
        Self { kind, args }
    }
}

/// Definition of one record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    /// Field name, used in diagnostics.
    pub name: String,
    /// Codec used for the field.
    pub codec: CodecKind,
    /// Informational width for character-stream fields.
    pub width: Option<usize>,
    /// Encoding label; falls back to the configured default.
    pub encoding: Option<String>,
    /// Padding value; must be a single character.
    pub padding: Option<String>,
    /// Positional codec arguments.
    pub args: Vec<Arg>,
    /// Value transforms in declared order.
    pub transforms: Vec<TransformSpec>,
}

impl FieldSpec {
    /// Create a specification for a named field.
    pub fn new(name: impl Into<String>, codec: CodecKind) -> Self {
        Self {
            name: name.into(),
            codec,
            ..Default::default()
        }
    }

    /// Set the positional codec arguments.
    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.args = args;
        self
    }

    /// Set the encoding label.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set the padding value.
    pub fn with_padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    /// Append a value transform.
    pub fn with_transform(mut self, transform: TransformSpec) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Pad character from the padding value, or `default` when unset.
    ///
    /// A padding value that is empty or holds more than one character is a
    /// configuration error. Its encoded byte length is checked by the codec.
    pub fn pad_char(&self, default: char) -> Result<char> {
        let Some(padding) = self.padding.as_deref() else {
            return Ok(default);
        };
        let mut chars = padding.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CodecError::PaddingLength {
                padding: padding.to_string(),
            }),
        }
    }

    fn arg(&self, position: usize) -> Option<&Arg> {
        match self.args.get(position) {
            None | Some(Arg::Null) => None,
            Some(arg) => Some(arg),
        }
    }

    /// Read the field width from argument 0.
    pub fn width_arg(&self) -> Result<usize> {
        match self.arg(0) {
            None => Err(CodecError::MissingArgument {
                position: 0,
                name: "width",
            }),
            Some(Arg::Integer(w)) if *w > 0 => usize::try_from(*w).map_err(|_| {
                CodecError::InvalidWidth { width: *w }
            }),
            Some(Arg::Integer(w)) => Err(CodecError::InvalidWidth { width: *w }),
            Some(other) => Err(CodecError::InvalidArgument {
                position: 0,
                name: "width",
                expected: "positive integer",
                found: other.describe(),
            }),
        }
    }

    /// Read an optional integer argument.
    pub fn int_arg(&self, position: usize, name: &'static str, default: i64) -> Result<i64> {
        match self.arg(position) {
            None => Ok(default),
            Some(Arg::Integer(i)) => Ok(*i),
            Some(other) => Err(CodecError::InvalidArgument {
                position,
                name,
                expected: "integer",
                found: other.describe(),
            }),
        }
    }

    /// Read an optional scale argument, bounded by [`MAX_SCALE`] either way.
    pub fn scale_arg(&self, position: usize) -> Result<i32> {
        let scale = self.int_arg(position, "scale", 0)?;
        i32::try_from(scale)
            .ok()
            .filter(|s| s.unsigned_abs() <= MAX_SCALE)
            .ok_or_else(|| CodecError::InvalidArgument {
                position,
                name: "scale",
                expected: "integer between -28 and 28",
                found: format!("integer {}", scale),
            })
    }

    /// Read an optional boolean argument. Text `"true"`/`"false"` is accepted.
    pub fn bool_arg(&self, position: usize, name: &'static str, default: bool) -> Result<bool> {
        match self.arg(position) {
            None => Ok(default),
            Some(Arg::Bool(b)) => Ok(*b),
            Some(Arg::Text(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Arg::Text(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
            Some(other) => Err(CodecError::InvalidArgument {
                position,
                name,
                expected: "boolean",
                found: other.describe(),
            }),
        }
    }

    /// Read an optional single-character argument.
    pub fn char_arg(&self, position: usize, name: &'static str, default: char) -> Result<char> {
        match self.arg(position) {
            None => Ok(default),
            Some(Arg::Text(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(CodecError::InvalidArgument {
                        position,
                        name,
                        expected: "single character",
                        found: format!("text {:?}", s),
                    }),
                }
            }
            Some(other) => Err(CodecError::InvalidArgument {
                position,
                name,
                expected: "single character",
                found: other.describe(),
            }),
        }
    }

    /// Read an optional nibble marker, given as a hexadecimal literal
    /// (`"C"`, `"0xC"`, `"C0"`) or an integer 0-15.
    pub fn marker_arg(&self, position: usize, name: &'static str, default: u8) -> Result<u8> {
        let invalid = |found: String| CodecError::InvalidArgument {
            position,
            name,
            expected: "hexadecimal nibble 0-F",
            found,
        };
        match self.arg(position) {
            None => Ok(default),
            Some(Arg::Integer(i)) => u8::try_from(*i)
                .ok()
                .and_then(to_nibble)
                .ok_or_else(|| invalid(format!("integer {}", i))),
            Some(Arg::Text(s)) => parse_marker(s).ok_or_else(|| invalid(format!("text {:?}", s))),
            Some(other) => Err(invalid(other.describe())),
        }
    }
}

/// Parse a hexadecimal marker literal into a nibble.
pub fn parse_marker(text: &str) -> Option<u8> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    u8::from_str_radix(digits, 16).ok().and_then(to_nibble)
}

/// Values above 0xF are accepted as a full byte whose low nibble is zero.
fn to_nibble(value: u8) -> Option<u8> {
    if value <= 0x0F {
        Some(value)
    } else if value & 0x0F == 0 {
        Some(value >> 4)
    } else {
        None
    }
}
