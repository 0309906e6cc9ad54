use super::{single_arg, ValueTransform};
use crate::spec::Arg;
use crate::value::Value;
use crate::Result;

/// Substitutes a configured value for null on encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue {
    default: Value,
}

impl DefaultValue {
    /// Create a transform with the given default.
    pub fn new(default: Value) -> Self {
        Self { default }
    }

    /// Build from `[default]`; exactly one non-null argument.
    pub fn from_args(args: &[Arg]) -> Result<Self> {
        let default = match single_arg("default", args)? {
            Arg::Integer(i) => Value::Integer(*i),
            Arg::Bool(b) => Value::Text(b.to_string()),
            Arg::Text(s) => Value::Text(s.clone()),
            Arg::Null => Value::Null,
        };
        Ok(Self::new(default))
    }

    /// The substituted value.
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl ValueTransform for DefaultValue {
    fn name(&self) -> &'static str {
        "default"
    }

    fn decode(&self, value: Value) -> Result<Value> {
        Ok(value)
    }

    fn encode(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            Ok(self.default.clone())
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_gets_default() {
        let t = DefaultValue::from_args(&[Arg::from("N/A")]).unwrap();
        assert_eq!(t.encode(Value::Null).unwrap(), Value::from("N/A"));
        assert_eq!(t.encode(Value::from("")).unwrap(), Value::from(""));
        assert_eq!(t.encode(Value::from("x")).unwrap(), Value::from("x"));
    }

    #[test]
    fn test_decode_passthrough() {
        let t = DefaultValue::from_args(&[Arg::Integer(0)]).unwrap();
        assert_eq!(t.default_value(), &Value::Integer(0));
        assert_eq!(t.decode(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_argument_rules() {
        assert!(DefaultValue::from_args(&[]).is_err());
        assert!(DefaultValue::from_args(&[Arg::Null]).is_err());
        assert!(DefaultValue::from_args(&[Arg::from("a"), Arg::from("b")]).is_err());
    }
}
