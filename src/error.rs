//! Error types for SEG-Y header extraction and detection.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Segment;
use crate::types::Attribute;

#[derive(Debug, Error)]
pub enum SegyError {
    #[error("endian detection is manual but no endian was supplied")]
    MissingEndianConfiguration,

    #[error("{attribute} detection is manual but no value was supplied")]
    MissingManualValue { attribute: Attribute },

    #[error("invalid manual value for {attribute}: {reason}")]
    InvalidManualOverride {
        attribute: Attribute,
        reason: String,
    },

    #[error("invalid setting {key}: {value:?}")]
    InvalidSetting { key: String, value: String },

    #[error(
        "cannot detect byte order: sample format code reads {little} little-endian, {big} big-endian"
    )]
    EndiannessDetectionFailed { little: i64, big: i64 },

    #[error("cannot detect text header encoding from first byte {byte:#04X}")]
    EncodingDetectionFailed { byte: u8 },

    #[error(
        "extended text headers not terminated: scanned {blocks_scanned} blocks, end of stream at offset {offset}"
    )]
    UnterminatedExtendedHeaders { blocks_scanned: u32, offset: u64 },

    #[error("invalid extended text header indicator: {0}")]
    InvalidExtendedHeaderCount(i64),

    #[error("unsupported sample format code: {0}")]
    UnsupportedSampleFormat(i64),

    #[error("invalid trace geometry: {sample_per_trace} samples per trace")]
    InvalidTraceGeometry { sample_per_trace: i64 },

    #[error("field {field:?} not found in {segment} schema")]
    SchemaFieldNotFound { segment: Segment, field: String },

    #[error("field {field:?} has unsupported type {type_name:?}")]
    InvalidFieldType { field: String, type_name: String },

    #[error("value {value} does not fit a {bits}-bit field")]
    ValueOutOfRange { value: i64, bits: u32 },

    #[error("truncated read at offset {offset}: expected {expected} bytes, got {actual}")]
    TruncatedRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at offset {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("reading field {field:?}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<SegyError>,
    },

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("configuration has not been prepared")]
    NotPrepared,

    #[error("configuration is already prepared")]
    ConfigurationAlreadyPrepared,

    #[error("header index {index} is out of range")]
    HeaderIndexOutOfRange { index: u64 },

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Broad category of a [`SegyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or contradictory settings.
    Configuration,
    /// The file does not conform to the expected layout.
    Detection,
    /// Schema lookups and field types.
    Schema,
    /// Reading the underlying stream failed.
    Io,
    /// An extension point without an algorithm.
    Unsupported,
}

impl SegyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEndianConfiguration
            | Self::MissingManualValue { .. }
            | Self::InvalidManualOverride { .. }
            | Self::InvalidSetting { .. }
            | Self::HeaderIndexOutOfRange { .. }
            | Self::Settings(_)
            | Self::NotPrepared
            | Self::ConfigurationAlreadyPrepared => ErrorKind::Configuration,
            Self::EndiannessDetectionFailed { .. }
            | Self::EncodingDetectionFailed { .. }
            | Self::UnterminatedExtendedHeaders { .. }
            | Self::InvalidExtendedHeaderCount(_)
            | Self::UnsupportedSampleFormat(_)
            | Self::InvalidTraceGeometry { .. } => ErrorKind::Detection,
            Self::SchemaFieldNotFound { .. }
            | Self::InvalidFieldType { .. }
            | Self::ValueOutOfRange { .. } => ErrorKind::Schema,
            Self::TruncatedRead { .. } | Self::Open { .. } | Self::Io { .. } => ErrorKind::Io,
            Self::Field { source, .. } => source.kind(),
            Self::NotImplemented(_) => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn io(offset: u64, source: std::io::Error) -> Self {
        Self::Io { offset, source }
    }

    pub(crate) fn in_field(self, field: &str) -> Self {
        Self::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Strip any field context and return the underlying error.
    pub fn root(&self) -> &SegyError {
        match self {
            Self::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SegyError>;
