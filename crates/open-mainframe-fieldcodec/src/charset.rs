//! Character encoding support for byte-stream fields.
//!
//! Wraps an [`encoding_rs::Encoding`] with strict conversions: bytes that are
//! malformed for the encoding and characters it cannot represent are data
//! errors instead of being replaced.

use encoding_rs::Encoding;

use crate::error::CodecError;
use crate::Result;

/// A resolved field encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    /// Resolve an encoding label such as `"UTF-8"`, `"Shift_JIS"` or
    /// `"windows-1252"`.
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding =
            Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                CodecError::UnknownEncoding {
                    label: label.to_string(),
                }
            })?;
        // UTF-16 and the replacement encoding cannot be produced by encode.
        if encoding.output_encoding() != encoding {
            return Err(CodecError::UnsupportedEncoding {
                name: encoding.name().to_string(),
            });
        }
        Ok(Self { encoding })
    }

    /// UTF-8.
    pub fn utf8() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Canonical encoding name.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode bytes to text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| CodecError::Malformed {
                encoding: self.name().to_string(),
            })
    }

    /// Encode text to bytes.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(CodecError::Unmappable {
                text: text.to_string(),
                encoding: self.name().to_string(),
            });
        }
        Ok(bytes.into_owned())
    }

    /// Encode a pad character, requiring an exact byte length.
    pub fn pad_sequence(&self, pad: char, expected: usize) -> Result<Vec<u8>> {
        let mut buf = [0u8; 4];
        let text = pad.encode_utf8(&mut buf);
        let invalid = |actual: usize| CodecError::InvalidPadding {
            padding: text.to_string(),
            encoding: self.name().to_string(),
            expected,
            actual,
        };
        let bytes = self.encode(text).map_err(|_| invalid(0))?;
        if bytes.len() != expected {
            return Err(invalid(bytes.len()));
        }
        Ok(bytes)
    }

    /// Byte length of `text` in this encoding.
    pub fn byte_len(&self, text: &str) -> Result<usize> {
        Ok(self.encode(text)?.len())
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_label() {
        assert_eq!(Charset::for_label("utf-8").unwrap().name(), "UTF-8");
        assert_eq!(Charset::for_label("sjis").unwrap().name(), "Shift_JIS");
        assert!(matches!(
            Charset::for_label("EBCDIC-XYZ"),
            Err(CodecError::UnknownEncoding { .. })
        ));
        assert!(matches!(
            Charset::for_label("UTF-16LE"),
            Err(CodecError::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn test_strict_decode() {
        let utf8 = Charset::utf8();
        assert_eq!(utf8.decode(b"ABC").unwrap(), "ABC");
        assert!(matches!(
            utf8.decode(&[0xFF, 0xFE]),
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn test_strict_encode() {
        let latin = Charset::for_label("windows-1252").unwrap();
        assert_eq!(latin.encode("é").unwrap(), vec![0xE9]);
        assert!(matches!(
            latin.encode("日本"),
            Err(CodecError::Unmappable { .. })
        ));
    }

    #[test]
    fn test_pad_sequence() {
        let sjis = Charset::for_label("Shift_JIS").unwrap();
        assert_eq!(sjis.pad_sequence('\u{3000}', 2).unwrap(), vec![0x81, 0x40]);
        assert_eq!(sjis.pad_sequence(' ', 1).unwrap(), vec![0x20]);

        let utf8 = Charset::utf8();
        assert!(matches!(
            utf8.pad_sequence('\u{3000}', 2),
            Err(CodecError::InvalidPadding { actual: 3, .. })
        ));
        assert!(utf8.pad_sequence('\u{3000}', 1).is_err());
    }
}
