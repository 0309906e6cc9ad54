//! Field-level codecs for fixed-width flat-file records.
//!
//! This crate converts between the wire content of one record field and an
//! application value: text, raw bytes, or an exact decimal. It reproduces
//! legacy numeric layouts byte for byte and leaves record framing to the
//! caller.
//!
//! # Features
//!
//! - **Byte strings**: padded text in single- or double-byte encodings
//! - **Numeric strings**: zero- or space-filled digits with fixed or floating signs
//! - **Packed Decimal**: two digits per byte, configurable sign nibbles
//! - **Zoned Decimal**: one digit per byte, configurable zone and sign nibbles
//! - **Value transforms**: defaults, numeric-text validation, character replacement
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_fieldcodec::{Arg, CodecConfig, CodecKind, FieldPipeline, FieldSpec, Value, Wire};
//! use rust_decimal::Decimal;
//!
//! let config = CodecConfig::default();
//! let spec = FieldSpec::new("AMOUNT", CodecKind::SignedPacked)
//!     .with_args(vec![Arg::Integer(3), Arg::Integer(2)]);
//! let field = FieldPipeline::from_spec(&spec, &config, None).unwrap();
//!
//! let amount = Value::Decimal(Decimal::new(-12345, 2));
//! let wire = field.encode(amount.clone()).unwrap();
//! assert_eq!(wire, Wire::Bytes(vec![0x12, 0x34, 0x5D]));
//! assert_eq!(field.decode(&wire).unwrap(), amount);
//! ```

pub mod charset;
pub mod codec;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod spec;
pub mod transform;
pub mod value;

// Re-export commonly used types at crate root
pub use charset::Charset;
pub use codec::{
    build_codec, pack_unscaled, unpack_unscaled, unzone_unscaled, zone_unscaled, ByteStringCodec,
    CodecKind, Density, FieldCodec, NumericPattern, NumericStringCodec, PackedCodec, RawCodec,
    SignFormat, SignPolicy, TextCodec, TextMode, ZonedCodec,
};
pub use config::{CodecConfig, MarkerConfig, PipelineConfig, TransformOrder};
pub use dictionary::{
    CharacterDictionary, DiagnosticRegistry, ReplacementDictionary, ReplacementRecord,
    ReplacementTable,
};
pub use error::{CodecError, ErrorKind};
pub use normalize::{to_exact_decimal, to_unscaled_integer};
pub use pipeline::FieldPipeline;
pub use spec::{Arg, FieldSpec, TransformSpec};
pub use transform::{
    build_transform, CharReplacement, DefaultValue, EncodingSetter, NumericText, PaddingSetter,
    TransformKind, TransformServices, ValueTransform,
};
pub use value::{NumericInput, StreamKind, Value, Wire};

/// Result type for field codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
