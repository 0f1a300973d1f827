//! Resolved preparation state for one SEG-Y file.
//!
//! A [`Configuration`] starts out holding the schema, segment sizes,
//! detection modes and any user-supplied values. Preparation fills in the
//! remaining attributes one by one, recording where each value came from.

use std::collections::BTreeMap;

use crate::schema::{FieldType, Schema, Segment};
use crate::types::{
    Attribute, ByteOrder, Detection, DetectionMode, FormatRevision, Provenance, SampleFormat,
    TextEncoding,
};
use crate::Result;

/// Default text header size in bytes.
pub const TEXT_HEADER_BYTE: u64 = 3200;
/// Default binary header size in bytes.
pub const BINARY_HEADER_BYTE: u64 = 400;
/// Default trace header size in bytes.
pub const TRACE_HEADER_BYTE: u64 = 240;

/// Fixed segment sizes of the file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    pub text_header_byte: u64,
    pub binary_header_byte: u64,
    pub trace_header_byte: u64,
}

impl SegmentLayout {
    /// Absolute offset of the binary header.
    pub fn binary_header_start(&self) -> u64 {
        self.text_header_byte
    }

    /// Absolute offset of the first extended text header block.
    pub fn extended_header_start(&self) -> u64 {
        self.text_header_byte.saturating_add(self.binary_header_byte)
    }
}

impl Default for SegmentLayout {
    fn default() -> Self {
        Self {
            text_header_byte: TEXT_HEADER_BYTE,
            binary_header_byte: BINARY_HEADER_BYTE,
            trace_header_byte: TRACE_HEADER_BYTE,
        }
    }
}

/// Per-attribute detection modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionModes {
    pub endian: DetectionMode,
    pub text_header_encoding: DetectionMode,
    pub text_header_number: DetectionMode,
    pub sample_format: DetectionMode,
    pub sample_per_trace: DetectionMode,
    /// `None` skips format version resolution entirely.
    pub format_version: Option<DetectionMode>,
}

impl DetectionModes {
    pub fn mode(&self, attribute: Attribute) -> Option<DetectionMode> {
        match attribute {
            Attribute::Endian => Some(self.endian),
            Attribute::TextHeaderEncoding => Some(self.text_header_encoding),
            Attribute::ExtraTextHeaderNumber => Some(self.text_header_number),
            Attribute::SampleFormat => Some(self.sample_format),
            Attribute::SamplePerTrace => Some(self.sample_per_trace),
            Attribute::FormatVersion => self.format_version,
        }
    }
}

/// Mutable preparation state.
///
/// Detection modes are fixed at construction. Resolved values are written
/// by the detectors during [`prepare`](crate::prepare::prepare) and can be
/// read back through the getters afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    schema: Schema,
    layout: SegmentLayout,
    modes: DetectionModes,
    stop_marker: Option<String>,

    endian: Option<ByteOrder>,
    text_header_encoding: Option<TextEncoding>,
    sample_format: Option<SampleFormat>,
    sample_per_trace: Option<i64>,
    extra_text_header_number: Option<i64>,
    format_version: Option<FormatRevision>,

    provenance: BTreeMap<Attribute, Provenance>,
    prepared: bool,
}

impl Configuration {
    /// Default schema and layout, every attribute auto-detected.
    pub fn new() -> Self {
        Self {
            schema: Schema::default(),
            layout: SegmentLayout::default(),
            modes: DetectionModes::default(),
            stop_marker: None,
            endian: None,
            text_header_encoding: None,
            sample_format: None,
            sample_per_trace: None,
            extra_text_header_number: None,
            format_version: None,
            provenance: BTreeMap::new(),
            prepared: false,
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_layout(mut self, layout: SegmentLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_modes(mut self, modes: DetectionModes) -> Self {
        self.modes = modes;
        self
    }

    /// Set the stanza that terminates a variable number of extended text headers.
    pub fn with_stop_marker(mut self, marker: impl Into<String>) -> Self {
        self.stop_marker = Some(marker.into());
        self
    }

    /// Supply the byte order used when endian detection is manual.
    pub fn with_endian(mut self, endian: ByteOrder) -> Self {
        self.endian = Some(endian);
        self
    }

    pub fn with_text_header_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_header_encoding = Some(encoding);
        self
    }

    pub fn with_sample_format(mut self, format: SampleFormat) -> Self {
        self.sample_format = Some(format);
        self
    }

    pub fn with_sample_per_trace(mut self, count: i64) -> Self {
        self.sample_per_trace = Some(count);
        self
    }

    pub fn with_extra_text_header_number(mut self, count: i64) -> Self {
        self.extra_text_header_number = Some(count);
        self
    }

    pub fn with_format_version(mut self, version: FormatRevision) -> Self {
        self.format_version = Some(version);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    pub fn modes(&self) -> &DetectionModes {
        &self.modes
    }

    pub fn stop_marker(&self) -> Option<&str> {
        self.stop_marker.as_deref()
    }

    pub fn endian(&self) -> Option<ByteOrder> {
        self.endian
    }

    pub fn text_header_encoding(&self) -> Option<TextEncoding> {
        self.text_header_encoding
    }

    pub fn sample_format(&self) -> Option<SampleFormat> {
        self.sample_format
    }

    pub fn sample_per_trace(&self) -> Option<i64> {
        self.sample_per_trace
    }

    pub fn extra_text_header_number(&self) -> Option<i64> {
        self.extra_text_header_number
    }

    pub fn format_version(&self) -> Option<FormatRevision> {
        self.format_version
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// How `attribute` was resolved, if it has been.
    pub fn provenance(&self, attribute: Attribute) -> Option<Provenance> {
        self.provenance.get(&attribute).copied()
    }

    /// All resolved attributes with their provenance, in attribute order.
    pub fn detections(&self) -> impl Iterator<Item = (Attribute, Provenance)> + '_ {
        self.provenance.iter().map(|(a, p)| (*a, *p))
    }

    /// Absolute byte offset and width of a binary header field.
    pub fn binary_field(&self, name: &str) -> Result<(FieldType, u64)> {
        let entry = self.schema.lookup(Segment::BinaryHeader, name)?;
        let offset = self.layout.binary_header_start().saturating_add(entry.offset);
        Ok((entry.field_type, offset))
    }

    /// Forget every auto-detected value so the configuration can be
    /// prepared against another file. User-supplied values are kept.
    pub fn reset(&mut self) {
        let auto: Vec<Attribute> = self
            .provenance
            .iter()
            .filter(|(_, p)| **p == Provenance::AutoDetected)
            .map(|(a, _)| *a)
            .collect();
        for attribute in auto {
            match attribute {
                Attribute::Endian => self.endian = None,
                Attribute::TextHeaderEncoding => self.text_header_encoding = None,
                Attribute::SampleFormat => self.sample_format = None,
                Attribute::SamplePerTrace => self.sample_per_trace = None,
                Attribute::ExtraTextHeaderNumber => self.extra_text_header_number = None,
                Attribute::FormatVersion => self.format_version = None,
            }
        }
        self.provenance.clear();
        self.prepared = false;
    }

    pub(crate) fn set_endian(&mut self, detection: Detection<ByteOrder>) {
        self.endian = Some(detection.value);
        self.record(Attribute::Endian, detection.provenance);
    }

    pub(crate) fn set_text_header_encoding(&mut self, detection: Detection<TextEncoding>) {
        self.text_header_encoding = Some(detection.value);
        self.record(Attribute::TextHeaderEncoding, detection.provenance);
    }

    pub(crate) fn set_sample_format(&mut self, detection: Detection<SampleFormat>) {
        self.sample_format = Some(detection.value);
        self.record(Attribute::SampleFormat, detection.provenance);
    }

    pub(crate) fn set_sample_per_trace(&mut self, detection: Detection<i64>) {
        self.sample_per_trace = Some(detection.value);
        self.record(Attribute::SamplePerTrace, detection.provenance);
    }

    pub(crate) fn set_extra_text_header_number(&mut self, detection: Detection<i64>) {
        self.extra_text_header_number = Some(detection.value);
        self.record(Attribute::ExtraTextHeaderNumber, detection.provenance);
    }

    pub(crate) fn set_format_version(&mut self, detection: Detection<FormatRevision>) {
        self.format_version = Some(detection.value);
        self.record(Attribute::FormatVersion, detection.provenance);
    }

    pub(crate) fn mark_prepared(&mut self) {
        self.prepared = true;
    }

    fn record(&mut self, attribute: Attribute, provenance: Provenance) {
        tracing::debug!(%attribute, ?provenance, "resolved attribute");
        self.provenance.insert(attribute, provenance);
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
