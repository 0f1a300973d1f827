//! Shared types: [`ByteOrder`], [`TextEncoding`], [`SampleFormat`],
//! [`DetectionMode`], and the provenance of resolved values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Result, SegyError};

/// Byte order of the binary and trace header integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little"),
            Self::Big => write!(f, "big"),
        }
    }
}

/// Character encoding of the text headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Ascii,
    Ebcdic,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii => write!(f, "ascii"),
            Self::Ebcdic => write!(f, "ebcdic"),
        }
    }
}

/// Numeric encoding of trace samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    /// 4-byte IBM hexadecimal floating point (code 1).
    #[serde(rename = "ibm")]
    IbmFloat32,
    /// 4-byte two's complement integer (code 2).
    #[serde(rename = "int4")]
    Int32,
    /// 2-byte two's complement integer (code 3).
    #[serde(rename = "int2")]
    Int16,
    /// 4-byte IEEE floating point (code 5).
    #[serde(rename = "ieee_float")]
    IeeeFloat32,
    /// 1-byte two's complement integer (code 8).
    #[serde(rename = "int1")]
    Int8,
}

impl SampleFormat {
    /// Convert a raw sample format code from the binary header.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Self::IbmFloat32),
            2 => Ok(Self::Int32),
            3 => Ok(Self::Int16),
            5 => Ok(Self::IeeeFloat32),
            8 => Ok(Self::Int8),
            _ => Err(SegyError::UnsupportedSampleFormat(code)),
        }
    }

    /// Convert to the raw binary header code.
    pub fn to_code(self) -> i16 {
        match self {
            Self::IbmFloat32 => 1,
            Self::Int32 => 2,
            Self::Int16 => 3,
            Self::IeeeFloat32 => 5,
            Self::Int8 => 8,
        }
    }

    /// Size of one sample in bytes.
    pub fn byte_width(self) -> u64 {
        match self {
            Self::IbmFloat32 | Self::Int32 | Self::IeeeFloat32 => 4,
            Self::Int16 => 2,
            Self::Int8 => 1,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IbmFloat32 => write!(f, "IBM FLOAT32"),
            Self::Int32 => write!(f, "INT32"),
            Self::Int16 => write!(f, "INT16"),
            Self::IeeeFloat32 => write!(f, "IEEE FLOAT32"),
            Self::Int8 => write!(f, "INT8"),
        }
    }
}

/// How an attribute gets its value during preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetectionMode {
    /// Resolve the value heuristically from the file.
    #[default]
    Auto,
    /// Trust the value supplied in the configuration.
    Manual,
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for DetectionMode {
    type Err = SegyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            _ => Err(SegyError::InvalidSetting {
                key: "detection mode".into(),
                value: s.into(),
            }),
        }
    }
}

impl Serialize for DetectionMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DetectionMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // Older settings files store detection flags as booleans.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::Auto),
            Raw::Flag(false) => Ok(Self::Manual),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    AutoDetected,
    UserSupplied,
}

impl From<DetectionMode> for Provenance {
    fn from(mode: DetectionMode) -> Self {
        match mode {
            DetectionMode::Auto => Self::AutoDetected,
            DetectionMode::Manual => Self::UserSupplied,
        }
    }
}

/// A resolved value together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Detection<T> {
    pub fn new(value: T, provenance: Provenance) -> Self {
        Self { value, provenance }
    }
}

/// An attribute resolved during preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Endian,
    SampleFormat,
    SamplePerTrace,
    TextHeaderEncoding,
    ExtraTextHeaderNumber,
    FormatVersion,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Endian => "endian",
            Self::SampleFormat => "sample_format",
            Self::SamplePerTrace => "sample_per_trace",
            Self::TextHeaderEncoding => "text_header_encoding",
            Self::ExtraTextHeaderNumber => "extra_text_header_number",
            Self::FormatVersion => "format_version",
        };
        f.write_str(name)
    }
}

/// SEG-Y format revision as `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormatRevision {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for FormatRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for FormatRevision {
    type Err = SegyError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SegyError::InvalidSetting {
            key: "format_version".into(),
            value: s.into(),
        };
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for FormatRevision {
    type Error = SegyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FormatRevision> for String {
    fn from(rev: FormatRevision) -> Self {
        rev.to_string()
    }
}
