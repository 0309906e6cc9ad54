//! Padded byte-string fields.
//!
//! The field holds encoded text right-padded to the field width with a pad
//! character. Single-byte fields pad with a 1-byte sequence (default ASCII
//! space); double-byte fields pad with a 2-byte sequence (default the
//! ideographic space U+3000) and must have an even width.
//!
//! Example: `"ABC"` in a 6-byte single-byte field is `41 42 43 20 20 20`.

use crate::charset::Charset;
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::spec::FieldSpec;
use crate::value::{StreamKind, Value, Wire};
use crate::Result;

use super::{field_bytes, FieldCodec};

/// Byte width of one pad sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    /// 1-byte pad character.
    Single,
    /// 2-byte pad character.
    Double,
}

impl Density {
    /// Byte length of one pad sequence.
    pub fn pad_len(self) -> usize {
        match self {
            Density::Single => 1,
            Density::Double => 2,
        }
    }

    /// Pad character used when the field does not configure one.
    pub fn default_pad(self) -> char {
        match self {
            Density::Single => ' ',
            Density::Double => '\u{3000}',
        }
    }
}

/// Codec for padded text in a fixed number of bytes.
#[derive(Debug, Clone)]
pub struct ByteStringCodec {
    width: usize,
    charset: Charset,
    density: Density,
    pad: char,
    pad_bytes: Vec<u8>,
}

impl ByteStringCodec {
    /// Create a codec, validating the pad character against the encoding.
    pub fn new(width: usize, charset: Charset, density: Density, pad: char) -> Result<Self> {
        if width == 0 {
            return Err(CodecError::InvalidWidth { width: 0 });
        }
        if density == Density::Double && width % 2 != 0 {
            return Err(CodecError::OddWidth { width });
        }
        let pad_bytes = charset.pad_sequence(pad, density.pad_len())?;
        Ok(Self {
            width,
            charset,
            density,
            pad,
            pad_bytes,
        })
    }

    /// Build from a field specification. Arguments: `[width]`.
    pub fn from_spec(spec: &FieldSpec, config: &CodecConfig, density: Density) -> Result<Self> {
        let width = spec.width_arg()?;
        let charset = config.charset_for(spec.encoding.as_deref())?;
        Self::new(width, charset, density, spec.pad_char(density.default_pad())?)
    }

    /// The pad character.
    pub fn pad(&self) -> char {
        self.pad
    }

    /// The field encoding.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Decode bytes to text with trailing padding removed.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<String> {
        let text = self.charset.decode(bytes)?;
        Ok(text.trim_end_matches(self.pad).to_string())
    }

    /// Encode text, right-padding to the field width.
    pub fn encode_text(&self, text: &str) -> Result<Vec<u8>> {
        let mut bytes = self.charset.encode(text)?;
        if bytes.len() > self.width {
            return Err(CodecError::FieldOverflow {
                length: bytes.len(),
                width: self.width,
            });
        }
        let remaining = self.width - bytes.len();
        let pad_len = self.density.pad_len();
        if remaining % pad_len != 0 {
            return Err(CodecError::MisalignedPadding { remaining, pad_len });
        }
        bytes.reserve(remaining);
        for _ in 0..remaining / pad_len {
            bytes.extend_from_slice(&self.pad_bytes);
        }
        Ok(bytes)
    }
}

impl FieldCodec for ByteStringCodec {
    fn width(&self) -> usize {
        self.width
    }

    fn stream(&self) -> StreamKind {
        StreamKind::Bytes
    }

    fn decode(&self, wire: &Wire) -> Result<Value> {
        Ok(Value::Text(self.decode_bytes(field_bytes(wire, self.width)?)?))
    }

    fn encode(&self, value: &Value) -> Result<Wire> {
        let text = value.to_text()?.unwrap_or_default();
        Ok(Wire::Bytes(self.encode_text(&text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecKind;
    use crate::spec::Arg;

    fn single(width: usize, pad: char) -> ByteStringCodec {
        ByteStringCodec::new(width, Charset::utf8(), Density::Single, pad).unwrap()
    }

    fn sjis() -> Charset {
        Charset::for_label("Shift_JIS").unwrap()
    }

    #[test]
    fn test_encode_pads_right() {
        let codec = single(6, ' ');
        assert_eq!(codec.encode_text("ABC").unwrap(), b"ABC   ".to_vec());
        assert_eq!(codec.encode_text("").unwrap(), b"      ".to_vec());
    }

    #[test]
    fn test_roundtrip_any_pad() {
        for pad in [' ', '*', '_', '0'] {
            let codec = single(8, pad);
            let wire = codec.encode(&Value::from("ABC")).unwrap();
            assert_eq!(codec.decode(&wire).unwrap(), Value::from("ABC"));
        }
    }

    #[test]
    fn test_decode_keeps_leading_and_inner_spaces() {
        let codec = single(8, ' ');
        assert_eq!(codec.decode_bytes(b" A B    ").unwrap(), " A B");
    }

    #[test]
    fn test_overflow() {
        let codec = single(3, ' ');
        assert!(codec.encode_text("ABC").is_ok());
        assert!(matches!(
            codec.encode_text("ABCD"),
            Err(CodecError::FieldOverflow { length: 4, width: 3 })
        ));
        // Width counts bytes, not characters.
        assert!(codec.encode_text("éé").is_err());
    }

    #[test]
    fn test_encode_numbers_and_null() {
        let codec = single(5, ' ');
        assert_eq!(
            codec.encode(&Value::Integer(42)).unwrap(),
            Wire::Bytes(b"42   ".to_vec())
        );
        assert_eq!(
            codec.encode(&Value::Null).unwrap(),
            Wire::Bytes(b"     ".to_vec())
        );
        assert!(codec.encode(&Value::Bytes(vec![1])).is_err());
    }

    #[test]
    fn test_multibyte_pad_rejected() {
        assert!(matches!(
            ByteStringCodec::new(4, Charset::utf8(), Density::Single, 'é'),
            Err(CodecError::InvalidPadding { .. })
        ));
    }

    #[test]
    fn test_double_byte() {
        let codec = ByteStringCodec::new(6, sjis(), Density::Double, '\u{3000}').unwrap();
        let wire = codec.encode_text("日本").unwrap();
        assert_eq!(wire.len(), 6);
        assert_eq!(&wire[4..], &[0x81, 0x40]);
        assert_eq!(codec.decode_bytes(&wire).unwrap(), "日本");
        // Half-width text leaves an odd remainder.
        assert!(matches!(
            codec.encode_text("A"),
            Err(CodecError::MisalignedPadding { remaining: 5, pad_len: 2 })
        ));
    }

    #[test]
    fn test_double_byte_config_errors() {
        assert!(matches!(
            ByteStringCodec::new(5, sjis(), Density::Double, '\u{3000}'),
            Err(CodecError::OddWidth { width: 5 })
        ));
        assert!(matches!(
            ByteStringCodec::new(4, sjis(), Density::Double, ' '),
            Err(CodecError::InvalidPadding { expected: 2, actual: 1, .. })
        ));
        // The default pad is 3 bytes in UTF-8.
        assert!(ByteStringCodec::new(4, Charset::utf8(), Density::Double, '\u{3000}').is_err());
    }

    #[test]
    fn test_from_spec() {
        let spec = FieldSpec::new("NAME", CodecKind::String)
            .with_padding("#")
            .with_encoding("windows-1252")
            .with_args(vec![Arg::Integer(4)]);
        let codec = ByteStringCodec::from_spec(&spec, &CodecConfig::default(), Density::Single)
            .unwrap();
        assert_eq!(codec.pad(), '#');
        assert_eq!(codec.charset().name(), "windows-1252");
        assert_eq!(codec.encode_text("é").unwrap(), vec![0xE9, b'#', b'#', b'#']);
    }

    #[test]
    fn test_from_spec_rejects_multi_char_padding() {
        for padding in ["AB", ""] {
            let spec = FieldSpec::new("NAME", CodecKind::String)
                .with_padding(padding)
                .with_args(vec![Arg::Integer(4)]);
            let err = ByteStringCodec::from_spec(&spec, &CodecConfig::default(), Density::Single)
                .unwrap_err();
            assert!(matches!(err, CodecError::PaddingLength { .. }));
            assert!(!err.is_data_error());
        }
    }
}
