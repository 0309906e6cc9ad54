//! Codec plus transform composition for one field.
//!
//! Decoding runs the codec first and then each transform in declared order.
//! Encoding runs the transforms in the order chosen by
//! [`PipelineConfig::encode_order`](crate::config::PipelineConfig) and then
//! the codec. Configuration-only transforms are applied to a working copy of
//! the field specification before the codec is built and are not part of the
//! value path.

use crate::codec::{build_codec, FieldCodec};
use crate::config::{CodecConfig, TransformOrder};
use crate::spec::FieldSpec;
use crate::transform::{build_transform, TransformServices, ValueTransform};
use crate::value::{Value, Wire};
use crate::Result;

/// A ready-to-use field converter.
#[derive(Debug)]
pub struct FieldPipeline {
    spec: FieldSpec,
    codec: Box<dyn FieldCodec>,
    transforms: Vec<Box<dyn ValueTransform>>,
    encode_order: TransformOrder,
}

impl FieldPipeline {
    /// Build the codec and transforms for a field.
    ///
    /// Errors carry the field name.
    pub fn from_spec(
        spec: &FieldSpec,
        config: &CodecConfig,
        services: Option<&TransformServices>,
    ) -> Result<Self> {
        Self::build(spec, config, services).map_err(|e| e.in_field(&spec.name))
    }

    fn build(
        spec: &FieldSpec,
        config: &CodecConfig,
        services: Option<&TransformServices>,
    ) -> Result<Self> {
        let mut working = spec.clone();
        for transform_spec in spec.transforms.iter().filter(|t| t.kind.is_configuration_only()) {
            build_transform(transform_spec, spec, config, services)?.configure(&mut working);
        }

        let codec = build_codec(&working, config)?;
        let transforms = working
            .transforms
            .iter()
            .filter(|t| !t.kind.is_configuration_only())
            .map(|t| build_transform(t, &working, config, services))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Field {} ready: {:?} codec, {} value transform(s)",
            working.name,
            working.codec,
            transforms.len()
        );
        Ok(Self {
            spec: working,
            codec,
            transforms,
            encode_order: config.pipeline.encode_order,
        })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The effective specification after configuration-only transforms.
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// The field codec.
    pub fn codec(&self) -> &dyn FieldCodec {
        self.codec.as_ref()
    }

    /// Convert wire content to the application value.
    pub fn decode(&self, wire: &Wire) -> Result<Value> {
        let run = || {
            let value = self.codec.decode(wire)?;
            self.transforms
                .iter()
                .try_fold(value, |value, t| t.decode(value))
        };
        run().map_err(|e| e.in_field(&self.spec.name))
    }

    /// Convert an application value to wire content.
    pub fn encode(&self, value: Value) -> Result<Wire> {
        let run = || {
            let value = match self.encode_order {
                TransformOrder::Reverse => self
                    .transforms
                    .iter()
                    .rev()
                    .try_fold(value, |value, t| t.encode(value))?,
                TransformOrder::Declared => self
                    .transforms
                    .iter()
                    .try_fold(value, |value, t| t.encode(value))?,
            };
            self.codec.encode(&value)
        };
        run().map_err(|e| e.in_field(&self.spec.name))
    }
}
