//! Extended text header counting.
//!
//! The binary header carries an indicator: a non-negative count, or `-1`
//! when the number of extended blocks is variable and the last block holds
//! a stop stanza. In the variable case the blocks following the binary
//! header are scanned one by one until the stanza turns up.

use std::io::{Read, Seek};

use crate::config::Configuration;
use crate::encoding::encode_text;
use crate::endian::ResolvedEndian;
use crate::field::{read_block, read_field};
use crate::schema::EXTRA_TEXT_HEADER_NUMBER;
use crate::types::{Attribute, Detection, DetectionMode, Provenance, TextEncoding};
use crate::{Result, SegyError};

/// Indicator value for a variable number of extended headers.
pub const VARIABLE_EXTENDED_HEADERS: i64 = -1;

/// Resolve the number of extended text headers and store it in `config`.
///
/// `encoding` is the resolved text header encoding; the stop marker is
/// matched in that encoding.
pub fn resolve_extended_headers<R: Read + Seek>(
    stream: &mut R,
    config: &mut Configuration,
    endian: ResolvedEndian,
    encoding: TextEncoding,
) -> Result<i64> {
    let detection = match config.modes().text_header_number {
        DetectionMode::Manual => {
            let count = config
                .extra_text_header_number()
                .ok_or(SegyError::MissingManualValue {
                    attribute: Attribute::ExtraTextHeaderNumber,
                })?;
            if count < 0 {
                return Err(SegyError::InvalidManualOverride {
                    attribute: Attribute::ExtraTextHeaderNumber,
                    reason: format!("{count} is negative"),
                });
            }
            Detection::new(count, Provenance::UserSupplied)
        }
        DetectionMode::Auto => Detection::new(
            count_extended_headers(stream, config, endian, encoding)?,
            Provenance::AutoDetected,
        ),
    };
    config.set_extra_text_header_number(detection);
    Ok(detection.value)
}

/// Read the indicator and, if it is variable, scan for the stop marker.
pub fn count_extended_headers<R: Read + Seek>(
    stream: &mut R,
    config: &Configuration,
    endian: ResolvedEndian,
    encoding: TextEncoding,
) -> Result<i64> {
    let (field_type, offset) = config.binary_field(EXTRA_TEXT_HEADER_NUMBER)?;
    let indicator = read_field(stream, field_type, offset, endian.order())
        .map_err(|e| e.in_field(EXTRA_TEXT_HEADER_NUMBER))?;

    match indicator {
        n if n >= 0 => Ok(n),
        VARIABLE_EXTENDED_HEADERS => {
            let marker = stop_marker_bytes(config, encoding)?;
            scan_for_stop_marker(stream, config, &marker).map(i64::from)
        }
        n => Err(SegyError::InvalidExtendedHeaderCount(n)),
    }
}

fn stop_marker_bytes(config: &Configuration, encoding: TextEncoding) -> Result<Vec<u8>> {
    let marker = config
        .stop_marker()
        .ok_or(SegyError::NotImplemented("extended header stop marker"))?;
    match encode_text(marker, encoding) {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(SegyError::InvalidSetting {
            key: "extended_header_stop_marker".into(),
            value: marker.into(),
        }),
    }
}

/// Count text-header-sized blocks after the binary header up to and
/// including the first one containing `marker`.
fn scan_for_stop_marker<R: Read + Seek>(
    stream: &mut R,
    config: &Configuration,
    marker: &[u8],
) -> Result<u32> {
    let layout = config.layout();
    let block_len = layout.text_header_byte as usize;
    if block_len == 0 {
        return Err(SegyError::InvalidSetting {
            key: "text_header_byte".into(),
            value: "0".into(),
        });
    }

    let mut offset = layout.extended_header_start();
    let mut blocks = 0u32;
    loop {
        let block = read_block(stream, offset, block_len)?;
        if block.len() < block_len {
            return Err(SegyError::UnterminatedExtendedHeaders {
                blocks_scanned: blocks,
                offset: offset + block.len() as u64,
            });
        }
        blocks += 1;
        if block.windows(marker.len()).any(|w| w == marker) {
            tracing::debug!(blocks, offset, "found extended header stop marker");
            return Ok(blocks);
        }
        tracing::trace!(block = blocks, offset, "no stop marker in extended header block");
        offset += block_len as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionModes;
    use crate::endian::tests::{CountingReader, resolved};
    use crate::field::write_field;
    use crate::schema::FieldType;
    use crate::types::ByteOrder;
    use std::io::Cursor;

    const MARKER: &str = "((SEG: EndText))";

    fn file(indicator: i64, blocks: &[Option<&str>]) -> Cursor<Vec<u8>> {
        let mut data = vec![0x40u8; 3600];
        for block in blocks {
            let mut text = vec![0x40u8; 3200];
            if let Some(s) = block {
                let bytes = encode_text(s, TextEncoding::Ebcdic).unwrap();
                text[80..80 + bytes.len()].copy_from_slice(&bytes);
            }
            data.extend_from_slice(&text);
        }
        let mut cur = Cursor::new(data);
        write_field(&mut cur, FieldType::Short, 3504, indicator, ByteOrder::Big).unwrap();
        cur
    }

    fn count(cur: &mut Cursor<Vec<u8>>, config: &Configuration) -> Result<i64> {
        count_extended_headers(cur, config, resolved(ByteOrder::Big), TextEncoding::Ebcdic)
    }

    #[test]
    fn test_fixed_count_without_scan() {
        for indicator in [0, 2] {
            // only the header is present; a scan would hit end of stream
            let mut stream = CountingReader {
                inner: file(indicator, &[]),
                reads: 0,
            };
            let config = Configuration::new().with_stop_marker(MARKER);
            let n = count_extended_headers(
                &mut stream,
                &config,
                resolved(ByteOrder::Big),
                TextEncoding::Ebcdic,
            )
            .unwrap();
            assert_eq!(n, indicator);
            // a single two-byte field read
            assert!(stream.reads <= 2);
        }
    }

    #[test]
    fn test_variable_count_scans_to_marker() {
        let mut cur = file(-1, &[None, Some(MARKER), None]);
        let config = Configuration::new().with_stop_marker(MARKER);
        assert_eq!(count(&mut cur, &config).unwrap(), 2);
    }

    #[test]
    fn test_variable_count_unterminated() {
        let mut cur = file(-1, &[None, None]);
        let config = Configuration::new().with_stop_marker(MARKER);
        let err = count(&mut cur, &config).unwrap_err();
        assert!(matches!(
            err,
            SegyError::UnterminatedExtendedHeaders {
                blocks_scanned: 2,
                offset: 10000
            }
        ));
    }

    #[test]
    fn test_marker_in_other_encoding_not_found() {
        let mut cur = file(-1, &[Some(MARKER)]);
        let config = Configuration::new().with_stop_marker(MARKER);
        let err = count_extended_headers(
            &mut cur,
            &config,
            resolved(ByteOrder::Big),
            TextEncoding::Ascii,
        )
        .unwrap_err();
        assert!(matches!(err, SegyError::UnterminatedExtendedHeaders { .. }));
    }

    #[test]
    fn test_variable_count_without_marker_configured() {
        let mut cur = file(-1, &[Some(MARKER)]);
        let err = count(&mut cur, &Configuration::new()).unwrap_err();
        assert!(matches!(err, SegyError::NotImplemented(_)));
    }

    #[test]
    fn test_invalid_indicator() {
        let mut cur = file(-7, &[]);
        let err = count(&mut cur, &Configuration::new()).unwrap_err();
        assert!(matches!(err, SegyError::InvalidExtendedHeaderCount(-7)));
    }

    #[test]
    fn test_manual_count() {
        let modes = DetectionModes {
            text_header_number: DetectionMode::Manual,
            ..DetectionModes::default()
        };
        let mut cur = file(-1, &[]);

        let mut config = Configuration::new()
            .with_modes(modes)
            .with_extra_text_header_number(3);
        let n = resolve_extended_headers(
            &mut cur,
            &mut config,
            resolved(ByteOrder::Big),
            TextEncoding::Ebcdic,
        )
        .unwrap();
        assert_eq!(n, 3);
        assert_eq!(
            config.provenance(Attribute::ExtraTextHeaderNumber),
            Some(Provenance::UserSupplied)
        );

        let mut config = Configuration::new()
            .with_modes(modes)
            .with_extra_text_header_number(-1);
        let err = resolve_extended_headers(
            &mut cur,
            &mut config,
            resolved(ByteOrder::Big),
            TextEncoding::Ebcdic,
        )
        .unwrap_err();
        assert!(matches!(err, SegyError::InvalidManualOverride { .. }));
        assert_eq!(config.provenance(Attribute::ExtraTextHeaderNumber), None);
    }
}
