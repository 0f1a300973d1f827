//! Header extraction from a prepared configuration.
//!
//! Once byte order, sample geometry and the extended header count are
//! known, every schema field can be read and every trace located.

use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};

use crate::config::Configuration;
use crate::encoding::decode_text;
use crate::field::{read_bytes, read_field};
use crate::schema::{FieldTable, Segment};
use crate::types::{Attribute, ByteOrder};
use crate::{Result, SegyError};

/// Field values keyed by schema name.
pub type HeaderValues = BTreeMap<String, i64>;

/// Where traces live in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLayout {
    /// Absolute offset of the first trace header.
    pub first_trace_offset: u64,
    /// Trace header plus sample data, in bytes.
    pub trace_byte: u64,
}

impl TraceLayout {
    /// Derive the layout from a prepared configuration.
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let (Some(format), Some(spt), Some(extra)) = (
            config.sample_format(),
            config.sample_per_trace(),
            config.extra_text_header_number(),
        ) else {
            return Err(SegyError::NotPrepared);
        };
        let layout = config.layout();
        let first_trace_offset = (extra as u64)
            .checked_mul(layout.text_header_byte)
            .and_then(|n| n.checked_add(layout.extended_header_start()))
            .ok_or_else(|| SegyError::InvalidManualOverride {
                attribute: Attribute::ExtraTextHeaderNumber,
                reason: format!("{extra} extended headers overflow the file offset"),
            })?;
        let trace_byte = (spt as u64)
            .checked_mul(format.byte_width())
            .and_then(|n| n.checked_add(layout.trace_header_byte))
            .ok_or_else(|| SegyError::InvalidManualOverride {
                attribute: Attribute::SamplePerTrace,
                reason: format!("{spt} samples per trace overflow the trace size"),
            })?;
        Ok(Self {
            first_trace_offset,
            trace_byte,
        })
    }

    /// Absolute offset of trace `index`.
    pub fn trace_offset(&self, index: u64) -> Result<u64> {
        index
            .checked_mul(self.trace_byte)
            .and_then(|n| n.checked_add(self.first_trace_offset))
            .ok_or(SegyError::HeaderIndexOutOfRange { index })
    }

    /// Number of complete traces in a stream of `len` bytes.
    pub fn trace_count(&self, len: u64) -> u64 {
        if self.trace_byte == 0 {
            return 0;
        }
        len.saturating_sub(self.first_trace_offset) / self.trace_byte
    }
}

fn prepared_endian(config: &Configuration) -> Result<ByteOrder> {
    if !config.is_prepared() {
        return Err(SegyError::NotPrepared);
    }
    config.endian().ok_or(SegyError::NotPrepared)
}

fn read_table<R: Read + Seek>(
    stream: &mut R,
    table: &FieldTable,
    base: u64,
    endian: ByteOrder,
) -> Result<HeaderValues> {
    let mut values = HeaderValues::new();
    for (name, entry) in table.by_offset() {
        let offset = base.saturating_add(entry.offset);
        let value =
            read_field(stream, entry.field_type, offset, endian).map_err(|e| e.in_field(name))?;
        values.insert(name.to_string(), value);
    }
    Ok(values)
}

/// Read every binary header field in the schema.
pub fn read_binary_header<R: Read + Seek>(
    stream: &mut R,
    config: &Configuration,
) -> Result<HeaderValues> {
    let endian = prepared_endian(config)?;
    read_table(
        stream,
        config.schema().table(Segment::BinaryHeader),
        config.layout().binary_header_start(),
        endian,
    )
}

/// Read every trace header field in the schema for trace `index`.
pub fn read_trace_header<R: Read + Seek>(
    stream: &mut R,
    config: &Configuration,
    index: u64,
) -> Result<HeaderValues> {
    let endian = prepared_endian(config)?;
    let base = TraceLayout::from_config(config)?.trace_offset(index)?;
    read_table(
        stream,
        config.schema().table(Segment::TraceHeader),
        base,
        endian,
    )
}

/// Decode text header `index`: 0 is the leading header, 1.. are the
/// extended headers.
pub fn read_text_header<R: Read + Seek>(
    stream: &mut R,
    config: &Configuration,
    index: u64,
) -> Result<String> {
    let encoding = config.text_header_encoding().ok_or(SegyError::NotPrepared)?;
    let extra = config
        .extra_text_header_number()
        .ok_or(SegyError::NotPrepared)?;
    let layout = config.layout();
    let offset = match index {
        0 => Some(0),
        i if i <= extra as u64 => (i - 1)
            .checked_mul(layout.text_header_byte)
            .and_then(|n| n.checked_add(layout.extended_header_start())),
        _ => None,
    }
    .ok_or(SegyError::HeaderIndexOutOfRange { index })?;
    let bytes = read_bytes(stream, offset, layout.text_header_byte as usize)?;
    Ok(decode_text(&bytes, encoding))
}

/// Number of complete traces in the stream.
pub fn trace_count<R: Read + Seek>(stream: &mut R, config: &Configuration) -> Result<u64> {
    let layout = TraceLayout::from_config(config)?;
    let len = stream
        .seek(SeekFrom::End(0))
        .map_err(|e| SegyError::io(0, e))?;
    Ok(layout.trace_count(len))
}
