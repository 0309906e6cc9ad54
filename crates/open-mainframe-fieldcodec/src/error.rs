//! Error types for field codec operations.
//!
//! Every error is either a configuration error (raised while a codec or
//! transform is being built from its field specification) or a data error
//! (raised while a single value is decoded or encoded). Use
//! [`CodecError::kind`] to tell them apart.

use miette::Diagnostic;
use thiserror::Error;

/// Broad classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected at initialization; aborts format setup.
    Configuration,
    /// Detected while converting a single value; scoped to one record.
    Data,
}

/// Errors that can occur while building or running field codecs.
#[derive(Debug, Error, Diagnostic)]
pub enum CodecError {
    /// A required initialization argument was not supplied.
    #[error("Missing argument {position} ({name})")]
    #[diagnostic(code(fieldcodec::missing_argument))]
    MissingArgument {
        /// Zero-based argument position.
        position: usize,
        /// Logical name of the argument.
        name: &'static str,
    },

    /// An initialization argument had the wrong type or an unusable value.
    #[error("Invalid argument {position} ({name}): expected {expected}, found {found}")]
    #[diagnostic(code(fieldcodec::invalid_argument))]
    InvalidArgument {
        /// Zero-based argument position.
        position: usize,
        /// Logical name of the argument.
        name: &'static str,
        /// Description of the accepted values.
        expected: &'static str,
        /// What was supplied.
        found: String,
    },

    /// Width was zero or negative.
    #[error("Field width must be positive, got {width}")]
    #[diagnostic(code(fieldcodec::invalid_width))]
    InvalidWidth {
        /// The rejected width.
        width: i64,
    },

    /// A transform received the wrong number of arguments.
    #[error("{transform} expects exactly {expected} argument(s), got {found}")]
    #[diagnostic(code(fieldcodec::argument_count))]
    ArgumentCount {
        /// Transform name.
        transform: &'static str,
        /// Required count.
        expected: usize,
        /// Supplied count.
        found: usize,
    },

    /// The pad character does not encode to the required number of bytes.
    #[error("Padding {padding:?} encodes to {actual} byte(s) in {encoding}, expected {expected}")]
    #[diagnostic(
        code(fieldcodec::invalid_padding),
        help("Choose a pad character representable in the field encoding")
    )]
    InvalidPadding {
        /// The configured padding value.
        padding: String,
        /// Encoding name.
        encoding: String,
        /// Required byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// The padding value is not a single character.
    #[error("Padding {padding:?} must be exactly one character")]
    #[diagnostic(code(fieldcodec::padding_length))]
    PaddingLength {
        /// The configured padding value.
        padding: String,
    },

    /// The pad character is not allowed for this codec.
    #[error("Padding character {padding:?} is not allowed for numeric fields")]
    #[diagnostic(code(fieldcodec::forbidden_padding), help("Use '0' or a non-digit such as ' '"))]
    ForbiddenPadding {
        /// The rejected pad character.
        padding: char,
    },

    /// A double-byte field was configured with an odd width.
    #[error("Double-byte field width must be even, got {width}")]
    #[diagnostic(code(fieldcodec::odd_width))]
    OddWidth {
        /// The rejected width.
        width: usize,
    },

    /// The encoding label is not recognized.
    #[error("Unknown encoding: {label}")]
    #[diagnostic(code(fieldcodec::unknown_encoding))]
    UnknownEncoding {
        /// The rejected label.
        label: String,
    },

    /// The encoding is recognized but cannot be used for fixed-width output.
    #[error("Encoding {name} cannot be used for fixed-width fields")]
    #[diagnostic(code(fieldcodec::unsupported_encoding))]
    UnsupportedEncoding {
        /// Canonical encoding name.
        name: String,
    },

    /// A replacement dictionary does not exist.
    #[error("Unknown replacement dictionary: {name}")]
    #[diagnostic(code(fieldcodec::unknown_dictionary))]
    UnknownDictionary {
        /// Dictionary name.
        name: String,
    },

    /// A replacement dictionary targets a different encoding than the field.
    #[error("Dictionary {dictionary} is declared for {dictionary_encoding}, field uses {field_encoding}")]
    #[diagnostic(code(fieldcodec::encoding_mismatch))]
    EncodingMismatch {
        /// Dictionary name.
        dictionary: String,
        /// Encoding declared by the dictionary.
        dictionary_encoding: String,
        /// Encoding of the field.
        field_encoding: String,
    },

    /// A collaborator required by a transform was not provided.
    #[error("{service} is required but was not provided")]
    #[diagnostic(code(fieldcodec::missing_service))]
    MissingService {
        /// Name of the missing collaborator.
        service: &'static str,
    },

    /// A configuration-only transform was asked to convert a value.
    #[error("{transform} does not support {operation}")]
    #[diagnostic(code(fieldcodec::unsupported))]
    Unsupported {
        /// Transform name.
        transform: &'static str,
        /// The attempted operation.
        operation: &'static str,
    },

    /// A configuration document could not be read or parsed.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(fieldcodec::config))]
    Config {
        /// Description of the failure.
        message: String,
    },

    /// Text does not match the expected numeric pattern.
    #[error("Invalid numeric value {value:?}, expected {expected}")]
    #[diagnostic(code(fieldcodec::invalid_number))]
    InvalidNumber {
        /// The offending text.
        value: String,
        /// The expected pattern.
        expected: String,
    },

    /// A packed or zoned byte holds a digit nibble above 9.
    #[error("Invalid digit nibble 0x{nibble:X} at byte {position}")]
    #[diagnostic(code(fieldcodec::invalid_digit))]
    InvalidDigit {
        /// The nibble value.
        nibble: u8,
        /// Zero-based byte offset.
        position: usize,
    },

    /// A sign or zone nibble does not match the configured markers.
    #[error("Invalid marker nibble 0x{marker:X} at byte {position}, expected {expected}")]
    #[diagnostic(code(fieldcodec::invalid_marker))]
    InvalidMarker {
        /// The nibble value.
        marker: u8,
        /// Zero-based byte offset.
        position: usize,
        /// Accepted markers.
        expected: String,
    },

    /// The unscaled magnitude exceeds 18 significant digits.
    #[error("{}", digit_overflow_message(.unscaled, .original.as_deref()))]
    #[diagnostic(code(fieldcodec::digit_overflow), help("At most 18 significant digits are supported"))]
    DigitOverflow {
        /// Unscaled representation.
        unscaled: String,
        /// Original representation, when it differs from the unscaled one.
        original: Option<String>,
    },

    /// The value has more fractional digits than the field scale allows.
    #[error("Value {value} does not fit scale {scale}")]
    #[diagnostic(code(fieldcodec::scale_overflow))]
    ScaleOverflow {
        /// The offending value.
        value: String,
        /// The field scale.
        scale: i32,
    },

    /// An unsigned codec was given a negative value.
    #[error("Negative value {value} cannot be stored in an unsigned field")]
    #[diagnostic(code(fieldcodec::negative_value))]
    NegativeValue {
        /// The offending value.
        value: String,
    },

    /// Encoded output does not fit the field.
    #[error("Encoded length {length} exceeds field width {width}")]
    #[diagnostic(code(fieldcodec::field_overflow))]
    FieldOverflow {
        /// Required length (bytes or digits).
        length: usize,
        /// Available width.
        width: usize,
    },

    /// Wire content does not span exactly the field width.
    #[error("Field content is {length} byte(s), expected {width}")]
    #[diagnostic(code(fieldcodec::width_mismatch))]
    WidthMismatch {
        /// Length of the supplied content.
        length: usize,
        /// Field width.
        width: usize,
    },

    /// Padding cannot fill the remaining bytes with whole pad sequences.
    #[error("{remaining} byte(s) left cannot be filled with {pad_len}-byte padding")]
    #[diagnostic(code(fieldcodec::misaligned_padding))]
    MisalignedPadding {
        /// Bytes left to fill.
        remaining: usize,
        /// Length of one pad sequence.
        pad_len: usize,
    },

    /// The value is not of a type the codec accepts.
    #[error("Expected {expected}, found {found}")]
    #[diagnostic(code(fieldcodec::type_mismatch))]
    TypeMismatch {
        /// Accepted type.
        expected: &'static str,
        /// Supplied type.
        found: &'static str,
    },

    /// Text contains characters the encoding cannot represent.
    #[error("Text {text:?} cannot be encoded in {encoding}")]
    #[diagnostic(code(fieldcodec::unmappable))]
    Unmappable {
        /// The offending text.
        text: String,
        /// Encoding name.
        encoding: String,
    },

    /// Bytes are not valid in the field encoding.
    #[error("Malformed {encoding} data in field")]
    #[diagnostic(code(fieldcodec::malformed))]
    Malformed {
        /// Encoding name.
        encoding: String,
    },

    /// An error raised while processing a named field.
    #[error("Field {field}: {source}")]
    #[diagnostic(code(fieldcodec::field))]
    InField {
        /// Field name.
        field: String,
        /// Underlying error.
        #[source]
        source: Box<CodecError>,
    },
}

fn digit_overflow_message(unscaled: &str, original: Option<&str>) -> String {
    match original {
        Some(original) => format!(
            "Unscaled value {} (from {}) exceeds 18 significant digits",
            unscaled, original
        ),
        None => format!("Value {} exceeds 18 significant digits", unscaled),
    }
}

impl CodecError {
    /// Classify the error as configuration- or data-related.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::MissingArgument { .. }
            | CodecError::InvalidArgument { .. }
            | CodecError::InvalidWidth { .. }
            | CodecError::ArgumentCount { .. }
            | CodecError::InvalidPadding { .. }
            | CodecError::PaddingLength { .. }
            | CodecError::ForbiddenPadding { .. }
            | CodecError::OddWidth { .. }
            | CodecError::UnknownEncoding { .. }
            | CodecError::UnsupportedEncoding { .. }
            | CodecError::UnknownDictionary { .. }
            | CodecError::EncodingMismatch { .. }
            | CodecError::MissingService { .. }
            | CodecError::Unsupported { .. }
            | CodecError::Config { .. } => ErrorKind::Configuration,
            CodecError::InField { source, .. } => source.kind(),
            _ => ErrorKind::Data,
        }
    }

    /// Returns true for errors detected while converting a value.
    pub fn is_data_error(&self) -> bool {
        self.kind() == ErrorKind::Data
    }

    /// Attach the field name to this error.
    pub fn in_field(self, field: &str) -> Self {
        match self {
            already @ CodecError::InField { .. } => already,
            other => CodecError::InField {
                field: field.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping field context.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::InField { source, .. } => source.root(),
            other => other,
        }
    }
}
