//! Text header encoding resolution and EBCDIC conversion.
//!
//! Text headers are card images whose lines start with `C`, so the first
//! byte of the file is enough to tell EBCDIC (`0xC3`) from ASCII (`0x43`).
//! Byte order plays no part here.

use std::io::{Read, Seek};

use crate::config::Configuration;
use crate::field::read_byte;
use crate::types::{Attribute, Detection, DetectionMode, Provenance, TextEncoding};
use crate::{Result, SegyError};

/// Resolve the text header encoding and store it in `config`.
pub fn resolve_encoding<R: Read + Seek>(
    stream: &mut R,
    config: &mut Configuration,
) -> Result<TextEncoding> {
    let detection = match config.modes().text_header_encoding {
        DetectionMode::Manual => {
            let encoding =
                config
                    .text_header_encoding()
                    .ok_or(SegyError::MissingManualValue {
                        attribute: Attribute::TextHeaderEncoding,
                    })?;
            Detection::new(encoding, Provenance::UserSupplied)
        }
        DetectionMode::Auto => Detection::new(detect_encoding(stream)?, Provenance::AutoDetected),
    };
    config.set_text_header_encoding(detection);
    Ok(detection.value)
}

/// Guess the encoding from the byte at offset 0.
pub fn detect_encoding<R: Read + Seek>(stream: &mut R) -> Result<TextEncoding> {
    let byte = read_byte(stream, 0)?;
    // A byte that does not decode under a candidate simply does not match it.
    if ebcdic_to_char(byte) == Some('C') {
        return Ok(TextEncoding::Ebcdic);
    }
    if ascii_to_char(byte) == Some('C') {
        return Ok(TextEncoding::Ascii);
    }
    Err(SegyError::EncodingDetectionFailed { byte })
}

fn ascii_to_char(byte: u8) -> Option<char> {
    byte.is_ascii().then_some(byte as char)
}

/// Decode one EBCDIC (code page 037) byte.
///
/// Only the printable characters that also exist in ASCII, plus space, are
/// mapped. Control codes and national characters decode to `None`.
pub fn ebcdic_to_char(byte: u8) -> Option<char> {
    let c = match byte {
        0x40 => ' ',
        0x4B => '.',
        0x4C => '<',
        0x4D => '(',
        0x4E => '+',
        0x4F => '|',
        0x50 => '&',
        0x5A => '!',
        0x5B => '$',
        0x5C => '*',
        0x5D => ')',
        0x5E => ';',
        0x60 => '-',
        0x61 => '/',
        0x6B => ',',
        0x6C => '%',
        0x6D => '_',
        0x6E => '>',
        0x6F => '?',
        0x79 => '`',
        0x7A => ':',
        0x7B => '#',
        0x7C => '@',
        0x7D => '\'',
        0x7E => '=',
        0x7F => '"',
        0x81..=0x89 => (b'a' + (byte - 0x81)) as char,
        0x91..=0x99 => (b'j' + (byte - 0x91)) as char,
        0xA1 => '~',
        0xA2..=0xA9 => (b's' + (byte - 0xA2)) as char,
        0xBA => '[',
        0xBB => ']',
        0xB0 => '^',
        0xC0 => '{',
        0xC1..=0xC9 => (b'A' + (byte - 0xC1)) as char,
        0xD0 => '}',
        0xD1..=0xD9 => (b'J' + (byte - 0xD1)) as char,
        0xE0 => '\\',
        0xE2..=0xE9 => (b'S' + (byte - 0xE2)) as char,
        0xF0..=0xF9 => (b'0' + (byte - 0xF0)) as char,
        _ => return None,
    };
    Some(c)
}

/// Encode one character as EBCDIC (code page 037).
pub fn char_to_ebcdic(c: char) -> Option<u8> {
    (0..=u8::MAX).find(|&b| ebcdic_to_char(b) == Some(c))
}

/// Encode `text` under `encoding`, or `None` if a character has no mapping.
pub fn encode_text(text: &str, encoding: TextEncoding) -> Option<Vec<u8>> {
    match encoding {
        TextEncoding::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
        TextEncoding::Ebcdic => text.chars().map(char_to_ebcdic).collect(),
    }
}

/// Decode a text header, replacing unmapped bytes with U+FFFD.
pub fn decode_text(bytes: &[u8], encoding: TextEncoding) -> String {
    let decode = match encoding {
        TextEncoding::Ascii => ascii_to_char,
        TextEncoding::Ebcdic => ebcdic_to_char,
    };
    bytes
        .iter()
        .map(|&b| decode(b).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionModes;
    use std::io::Cursor;

    fn detect_first(byte: u8) -> Result<TextEncoding> {
        let mut data = vec![0x40u8; 3200];
        data[0] = byte;
        detect_encoding(&mut Cursor::new(data))
    }

    #[test]
    fn test_detect_ebcdic() {
        assert_eq!(detect_first(0xC3).unwrap(), TextEncoding::Ebcdic);
    }

    #[test]
    fn test_detect_ascii() {
        assert_eq!(detect_first(0x43).unwrap(), TextEncoding::Ascii);
    }

    #[test]
    fn test_detect_fails() {
        for byte in [0x00, 0xFF, b'A', 0x80] {
            assert!(matches!(
                detect_first(byte),
                Err(SegyError::EncodingDetectionFailed { byte: b }) if b == byte
            ));
        }
    }

    #[test]
    fn test_detect_empty_stream() {
        let err = detect_encoding(&mut Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, SegyError::TruncatedRead { offset: 0, .. }));
    }

    #[test]
    fn test_resolve_records_detected_value() {
        let mut config = Configuration::new();
        let mut cur = Cursor::new(vec![0x43u8]);
        assert_eq!(
            resolve_encoding(&mut cur, &mut config).unwrap(),
            TextEncoding::Ascii
        );
        assert_eq!(config.text_header_encoding(), Some(TextEncoding::Ascii));
        assert_eq!(
            config.provenance(Attribute::TextHeaderEncoding),
            Some(Provenance::AutoDetected)
        );
    }

    #[test]
    fn test_manual_mode() {
        let modes = DetectionModes {
            text_header_encoding: DetectionMode::Manual,
            ..DetectionModes::default()
        };
        // first byte says ASCII but the supplied value wins
        let mut config = Configuration::new()
            .with_modes(modes)
            .with_text_header_encoding(TextEncoding::Ebcdic);
        let mut cur = Cursor::new(vec![0x43u8]);
        assert_eq!(
            resolve_encoding(&mut cur, &mut config).unwrap(),
            TextEncoding::Ebcdic
        );

        let mut config = Configuration::new().with_modes(modes);
        assert!(matches!(
            resolve_encoding(&mut cur, &mut config),
            Err(SegyError::MissingManualValue {
                attribute: Attribute::TextHeaderEncoding
            })
        ));
    }

    #[test]
    fn test_ebcdic_text_conversion() {
        let bytes = encode_text("C 1 CLIENT: ACME", TextEncoding::Ebcdic).unwrap();
        assert_eq!(bytes[0], 0xC3);
        assert_eq!(bytes[1], 0x40);
        assert_eq!(bytes[2], 0xF1);
        assert_eq!(
            decode_text(&bytes, TextEncoding::Ebcdic),
            "C 1 CLIENT: ACME"
        );
        assert_eq!(encode_text("é", TextEncoding::Ebcdic), None);
        assert_eq!(encode_text("é", TextEncoding::Ascii), None);
        assert_eq!(decode_text(&[0xC3, 0x00], TextEncoding::Ebcdic), "C\u{FFFD}");
    }

    #[test]
    fn test_ebcdic_table_is_injective() {
        let mut seen = std::collections::HashSet::new();
        for b in 0..=u8::MAX {
            if let Some(c) = ebcdic_to_char(b) {
                assert!(c.is_ascii());
                assert!(seen.insert(c), "{c:?} mapped twice");
            }
        }
    }
}
