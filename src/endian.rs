//! Byte order resolution.
//!
//! In auto mode the sample format code is read under both byte orders.
//! Valid codes are small integers, so a correct interpretation lands in a
//! narrow range while the swapped one lands far outside it.

use std::io::{Read, Seek};

use crate::config::Configuration;
use crate::field::read_field;
use crate::schema::SAMPLE_FORMAT_CODE;
use crate::types::{ByteOrder, Detection, DetectionMode, Provenance};
use crate::{Result, SegyError};

/// A byte order produced by [`resolve_endian`].
///
/// Every later field read takes one of these, so nothing else can be
/// decoded before the byte order is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEndian(ByteOrder);

impl ResolvedEndian {
    pub fn order(self) -> ByteOrder {
        self.0
    }
}

/// Resolve the byte order and store it in `config`.
pub fn resolve_endian<R: Read + Seek>(
    stream: &mut R,
    config: &mut Configuration,
) -> Result<ResolvedEndian> {
    let detection = match config.modes().endian {
        DetectionMode::Manual => {
            let endian = config.endian().ok_or(SegyError::MissingEndianConfiguration)?;
            Detection::new(endian, Provenance::UserSupplied)
        }
        DetectionMode::Auto => Detection::new(detect_endian(stream, config)?, Provenance::AutoDetected),
    };
    config.set_endian(detection);
    Ok(ResolvedEndian(detection.value))
}

/// Guess the byte order from the sample format code.
///
/// Little-endian is tried first and accepted for any code in 1..=8.
/// Big-endian is accepted only for the defined codes 1, 2, 3, 4, 5 and 8.
pub fn detect_endian<R: Read + Seek>(stream: &mut R, config: &Configuration) -> Result<ByteOrder> {
    let (field_type, offset) = config.binary_field(SAMPLE_FORMAT_CODE)?;

    let little = read_field(stream, field_type, offset, ByteOrder::Little)
        .map_err(|e| e.in_field(SAMPLE_FORMAT_CODE))?;
    if (1..=8).contains(&little) {
        tracing::debug!(code = little, "sample format code valid as little-endian");
        return Ok(ByteOrder::Little);
    }

    let big = read_field(stream, field_type, offset, ByteOrder::Big)
        .map_err(|e| e.in_field(SAMPLE_FORMAT_CODE))?;
    if matches!(big, 1..=5 | 8) {
        tracing::debug!(code = big, "sample format code valid as big-endian");
        return Ok(ByteOrder::Big);
    }

    Err(SegyError::EndiannessDetectionFailed { little, big })
}
