//! Sample format and trace length resolution.

use std::io::{Read, Seek};

use crate::config::Configuration;
use crate::endian::ResolvedEndian;
use crate::field::read_field;
use crate::schema::{SAMPLE_FORMAT_CODE, SAMPLE_PER_TRACE};
use crate::types::{Attribute, Detection, DetectionMode, Provenance, SampleFormat};
use crate::{Result, SegyError};

/// Sample encoding and count shared by every trace in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceGeometry {
    pub sample_format: SampleFormat,
    pub sample_per_trace: i64,
}

impl TraceGeometry {
    /// Bytes of sample data in one trace.
    pub fn data_byte(&self) -> u64 {
        (self.sample_per_trace as u64).saturating_mul(self.sample_format.byte_width())
    }
}

/// Resolve the sample format and samples per trace and store them in `config`.
pub fn resolve_sample_format<R: Read + Seek>(
    stream: &mut R,
    config: &mut Configuration,
    endian: ResolvedEndian,
) -> Result<TraceGeometry> {
    let modes = *config.modes();

    let sample_per_trace = match modes.sample_per_trace {
        DetectionMode::Manual => Detection::new(
            config.sample_per_trace().ok_or(SegyError::MissingManualValue {
                attribute: Attribute::SamplePerTrace,
            })?,
            Provenance::UserSupplied,
        ),
        DetectionMode::Auto => Detection::new(
            read_binary(stream, config, SAMPLE_PER_TRACE, endian)?,
            Provenance::AutoDetected,
        ),
    };

    let sample_format = match modes.sample_format {
        DetectionMode::Manual => Detection::new(
            config.sample_format().ok_or(SegyError::MissingManualValue {
                attribute: Attribute::SampleFormat,
            })?,
            Provenance::UserSupplied,
        ),
        DetectionMode::Auto => {
            let code = read_binary(stream, config, SAMPLE_FORMAT_CODE, endian)?;
            Detection::new(SampleFormat::from_code(code)?, Provenance::AutoDetected)
        }
    };

    if sample_per_trace.value <= 0 {
        return Err(SegyError::InvalidTraceGeometry {
            sample_per_trace: sample_per_trace.value,
        });
    }

    config.set_sample_format(sample_format);
    config.set_sample_per_trace(sample_per_trace);
    Ok(TraceGeometry {
        sample_format: sample_format.value,
        sample_per_trace: sample_per_trace.value,
    })
}

fn read_binary<R: Read + Seek>(
    stream: &mut R,
    config: &Configuration,
    name: &str,
    endian: ResolvedEndian,
) -> Result<i64> {
    let (field_type, offset) = config.binary_field(name)?;
    read_field(stream, field_type, offset, endian.order()).map_err(|e| e.in_field(name))
}
