//! Transforms that only adjust the field specification.

use super::{arg_text, single_arg, ValueTransform};
use crate::charset::Charset;
use crate::error::CodecError;
use crate::spec::{Arg, FieldSpec};
use crate::value::Value;
use crate::Result;

/// Sets the field's padding value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingSetter {
    padding: String,
}

impl PaddingSetter {
    /// Build from `[padding]`.
    pub fn from_args(args: &[Arg]) -> Result<Self> {
        let padding = arg_text(single_arg("padding", args)?);
        Ok(Self { padding })
    }
}

impl ValueTransform for PaddingSetter {
    fn name(&self) -> &'static str {
        "padding"
    }

    fn decode(&self, _value: Value) -> Result<Value> {
        Err(CodecError::Unsupported {
            transform: "padding",
            operation: "decode",
        })
    }

    fn encode(&self, _value: Value) -> Result<Value> {
        Err(CodecError::Unsupported {
            transform: "padding",
            operation: "encode",
        })
    }

    fn is_configuration_only(&self) -> bool {
        true
    }

    fn configure(&self, field: &mut FieldSpec) {
        field.padding = Some(self.padding.clone());
    }
}

/// Sets the field's encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingSetter {
    label: String,
}

impl EncodingSetter {
    /// Build from `[encoding]`; the label must name a usable encoding.
    pub fn from_args(args: &[Arg]) -> Result<Self> {
        let label = arg_text(single_arg("encoding", args)?);
        Charset::for_label(&label)?;
        Ok(Self { label })
    }
}

impl ValueTransform for EncodingSetter {
    fn name(&self) -> &'static str {
        "encoding"
    }

    fn decode(&self, _value: Value) -> Result<Value> {
        Err(CodecError::Unsupported {
            transform: "encoding",
            operation: "decode",
        })
    }

    fn encode(&self, _value: Value) -> Result<Value> {
        Err(CodecError::Unsupported {
            transform: "encoding",
            operation: "encode",
        })
    }

    fn is_configuration_only(&self) -> bool {
        true
    }

    fn configure(&self, field: &mut FieldSpec) {
        field.encoding = Some(self.label.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecKind;
    use crate::error::ErrorKind;

    #[test]
    fn test_padding_setter() {
        let setter = PaddingSetter::from_args(&[Arg::Integer(0)]).unwrap();
        let mut field = FieldSpec::new("F", CodecKind::Numeric);
        setter.configure(&mut field);
        assert_eq!(field.padding.as_deref(), Some("0"));
        assert!(PaddingSetter::from_args(&[Arg::Null]).is_err());
    }

    #[test]
    fn test_encoding_setter() {
        let setter = EncodingSetter::from_args(&[Arg::from("Shift_JIS")]).unwrap();
        let mut field = FieldSpec::new("F", CodecKind::String);
        setter.configure(&mut field);
        assert_eq!(field.encoding.as_deref(), Some("Shift_JIS"));
        assert!(matches!(
            EncodingSetter::from_args(&[Arg::from("klingon")]),
            Err(CodecError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn test_refuses_conversion() {
        let setter = PaddingSetter::from_args(&[Arg::from(" ")]).unwrap();
        let err = setter.decode(Value::from("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(setter.encode(Value::Null).is_err());

        let setter = EncodingSetter::from_args(&[Arg::from("UTF-8")]).unwrap();
        assert!(matches!(
            setter.encode(Value::Null),
            Err(CodecError::Unsupported { operation: "encode", .. })
        ));
    }
}
