use std::sync::Arc;

use super::{single_arg, TransformServices, ValueTransform};
use crate::charset::Charset;
use crate::config::CodecConfig;
use crate::dictionary::{DiagnosticRegistry, ReplacementDictionary, ReplacementRecord};
use crate::error::CodecError;
use crate::spec::{Arg, FieldSpec};
use crate::value::Value;
use crate::Result;

/// Substitutes characters of text values from a named replacement table.
///
/// Decode-side outcomes are logged to the [`DiagnosticRegistry`] under the
/// field name.
#[derive(Debug, Clone)]
pub struct CharReplacement {
    table: String,
    field: String,
    dictionary: Arc<dyn ReplacementDictionary>,
    registry: Arc<DiagnosticRegistry>,
}

impl CharReplacement {
    /// Build from `[table]`, checking that the table exists and targets the
    /// field's encoding.
    pub fn from_args(
        args: &[Arg],
        field: &FieldSpec,
        config: &CodecConfig,
        services: &TransformServices,
    ) -> Result<Self> {
        let table = match single_arg("replace", args)? {
            Arg::Text(name) if !name.is_empty() => name.clone(),
            other => {
                return Err(CodecError::InvalidArgument {
                    position: 0,
                    name: "dictionary",
                    expected: "non-empty dictionary name",
                    found: format!("{:?}", other),
                })
            }
        };

        let dictionary = Arc::clone(&services.dictionary);
        if !dictionary.contains(&table) {
            return Err(CodecError::UnknownDictionary { name: table });
        }

        let field_charset = config.charset_for(field.encoding.as_deref())?;
        let table_encoding = dictionary.encoding_of(&table).unwrap_or_default().to_string();
        let matches = Charset::for_label(&table_encoding)
            .map(|charset| charset == field_charset)
            .unwrap_or(false);
        if !matches {
            return Err(CodecError::EncodingMismatch {
                dictionary: table,
                dictionary_encoding: table_encoding,
                field_encoding: field_charset.name().to_string(),
            });
        }

        Ok(Self {
            table,
            field: field.name.clone(),
            dictionary,
            registry: Arc::clone(&services.registry),
        })
    }

    /// Name of the replacement table.
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl ValueTransform for CharReplacement {
    fn name(&self) -> &'static str {
        "replace"
    }

    fn decode(&self, value: Value) -> Result<Value> {
        let Value::Text(input) = value else {
            return Ok(value);
        };
        let output = self.dictionary.replace(&self.table, &input);
        let replaced = output != input;
        tracing::trace!(
            "Replacement on field {}: {:?} -> {:?}",
            self.field,
            input,
            output
        );
        self.registry.record(
            &self.field,
            ReplacementRecord {
                input,
                output: output.clone(),
                replaced,
            },
        );
        Ok(Value::Text(output))
    }

    fn encode(&self, value: Value) -> Result<Value> {
        let Value::Text(input) = value else {
            return Ok(value);
        };
        let output = self.dictionary.replace(&self.table, &input);
        if output != input {
            tracing::warn!(
                "Field {} text changed by table {}: {:?} -> {:?}",
                self.field,
                self.table,
                input,
                output
            );
        }
        Ok(Value::Text(output))
    }
}
