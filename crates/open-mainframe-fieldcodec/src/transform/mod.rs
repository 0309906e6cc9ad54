//! Value transforms.
//!
//! A transform sits between a codec and the application and rewrites the
//! domain value without touching the wire representation. Two transforms
//! (`padding` and `encoding`) only adjust the field specification before its
//! codec is built and refuse to convert values.

mod default;
mod numeric_text;
mod replace;
mod setter;

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

pub use default::DefaultValue;
pub use numeric_text::NumericText;
pub use replace::CharReplacement;
pub use setter::{EncodingSetter, PaddingSetter};

use crate::config::CodecConfig;
use crate::dictionary::{DiagnosticRegistry, ReplacementDictionary};
use crate::error::CodecError;
use crate::spec::{Arg, FieldSpec, TransformSpec};
use crate::value::Value;
use crate::Result;

/// Contract implemented by every value transform.
pub trait ValueTransform: fmt::Debug + Send + Sync {
    /// Transform name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Rewrite a value produced by the codec.
    fn decode(&self, value: Value) -> Result<Value>;

    /// Rewrite a value before it reaches the codec.
    fn encode(&self, value: Value) -> Result<Value>;

    /// Returns true for transforms that only adjust the field specification.
    fn is_configuration_only(&self) -> bool {
        false
    }

    /// Apply this transform's settings to the field specification.
    fn configure(&self, _field: &mut FieldSpec) {}
}

/// Names a value transform in a [`TransformSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    /// Substitute a default for null on encode.
    Default,
    /// Validate unsigned decimal text.
    NumericText,
    /// Validate signed decimal text.
    SignedNumericText,
    /// Substitute characters from a replacement dictionary.
    Replace,
    /// Set the field's padding character.
    Padding,
    /// Set the field's encoding.
    Encoding,
}

impl TransformKind {
    /// Returns true for kinds that only adjust the field specification.
    pub fn is_configuration_only(&self) -> bool {
        matches!(self, TransformKind::Padding | TransformKind::Encoding)
    }
}

/// External collaborators needed by the character-replacement transform.
#[derive(Debug, Clone)]
pub struct TransformServices {
    /// Replacement tables.
    pub dictionary: Arc<dyn ReplacementDictionary>,
    /// Sink for decode-side replacement records.
    pub registry: Arc<DiagnosticRegistry>,
}

impl TransformServices {
    /// Bundle a dictionary and a registry.
    pub fn new(dictionary: Arc<dyn ReplacementDictionary>, registry: Arc<DiagnosticRegistry>) -> Self {
        Self {
            dictionary,
            registry,
        }
    }
}

/// Build the transform named by `spec` for `field`.
pub fn build_transform(
    spec: &TransformSpec,
    field: &FieldSpec,
    config: &CodecConfig,
    services: Option<&TransformServices>,
) -> Result<Box<dyn ValueTransform>> {
    let transform: Box<dyn ValueTransform> = match spec.kind {
        TransformKind::Default => Box::new(DefaultValue::from_args(&spec.args)?),
        TransformKind::NumericText => Box::new(NumericText::unsigned()?),
        TransformKind::SignedNumericText => Box::new(NumericText::signed()?),
        TransformKind::Replace => {
            let services = services.ok_or(CodecError::MissingService {
                service: "replacement dictionary",
            })?;
            Box::new(CharReplacement::from_args(&spec.args, field, config, services)?)
        }
        TransformKind::Padding => Box::new(PaddingSetter::from_args(&spec.args)?),
        TransformKind::Encoding => Box::new(EncodingSetter::from_args(&spec.args)?),
    };
    tracing::debug!(
        "Built {} transform for field {}",
        transform.name(),
        field.name
    );
    Ok(transform)
}

/// The single non-null argument of a transform.
fn single_arg<'a>(transform: &'static str, args: &'a [Arg]) -> Result<&'a Arg> {
    match args {
        [Arg::Null] => Err(CodecError::MissingArgument {
            position: 0,
            name: transform,
        }),
        [arg] => Ok(arg),
        _ => Err(CodecError::ArgumentCount {
            transform,
            expected: 1,
            found: args.len(),
        }),
    }
}

/// Argument rendered as text, the way padding and encoding values are used.
fn arg_text(arg: &Arg) -> String {
    match arg {
        Arg::Integer(i) => i.to_string(),
        Arg::Bool(b) => b.to_string(),
        Arg::Text(s) => s.clone(),
        Arg::Null => String::new(),
    }
}
