//! Field schema for the binary and trace headers.
//!
//! Every header field is located by a [`SchemaEntry`]: a primitive width and
//! a byte offset relative to the start of its segment. Detectors never
//! hard-code offsets; they look them up here, so a caller can relocate or add
//! fields by overriding the schema before preparation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Result, SegyError};

/// Number of samples per data trace.
pub const SAMPLE_PER_TRACE: &str = "sample_per_trace";
/// Data sample format code.
pub const SAMPLE_FORMAT_CODE: &str = "sample_format_code";
/// Number of extended textual file header records.
pub const EXTRA_TEXT_HEADER_NUMBER: &str = "extra_text_header_number";

/// Primitive width of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 16-bit signed integer (`"short"`).
    Short,
    /// 32-bit signed integer (`"int"`).
    Int,
}

impl FieldType {
    /// Parse a settings type tag; `field` is only used for the error.
    pub fn from_name(field: &str, name: &str) -> Result<Self> {
        match name {
            "short" => Ok(Self::Short),
            "int" => Ok(Self::Int),
            _ => Err(SegyError::InvalidFieldType {
                field: field.into(),
                type_name: name.into(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Int => "int",
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::Short => 16,
            Self::Int => 32,
        }
    }

    pub fn byte_len(self) -> usize {
        (self.bits() / 8) as usize
    }
}

/// Location of one field inside its segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaEntry {
    pub field_type: FieldType,
    /// Byte offset relative to the segment start.
    pub offset: u64,
}

impl SchemaEntry {
    pub const fn short(offset: u64) -> Self {
        Self {
            field_type: FieldType::Short,
            offset,
        }
    }

    pub const fn int(offset: u64) -> Self {
        Self {
            field_type: FieldType::Int,
            offset,
        }
    }
}

/// Header segment a schema table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    BinaryHeader,
    TraceHeader,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryHeader => write!(f, "binary header"),
            Self::TraceHeader => write!(f, "trace header"),
        }
    }
}

/// Ordered mapping from field name to [`SchemaEntry`].
///
/// Serialized in the settings resource form `{"name": ["short", 20]}`. Type
/// tags are validated while deserializing, so an unknown tag is reported
/// when the settings are loaded rather than when the field is first read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable(BTreeMap<String, SchemaEntry>);

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<SchemaEntry> {
        self.0.get(name).copied()
    }

    /// Add a field, replacing any existing entry of the same name.
    pub fn insert(&mut self, name: impl Into<String>, entry: SchemaEntry) -> Option<SchemaEntry> {
        self.0.insert(name.into(), entry)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in ascending offset order (ties broken by name).
    pub fn by_offset(&self) -> impl Iterator<Item = (&str, SchemaEntry)> {
        let mut fields: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        fields.sort_by_key(|(name, entry)| (entry.offset, *name));
        fields.into_iter()
    }
}

impl<S: Into<String>> FromIterator<(S, SchemaEntry)> for FieldTable {
    fn from_iter<I: IntoIterator<Item = (S, SchemaEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for FieldTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|(name, entry)| (name, (entry.field_type.name(), entry.offset))),
        )
    }
}

impl<'de> Deserialize<'de> for FieldTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, (String, u64)>::deserialize(deserializer)?;
        let mut table = BTreeMap::new();
        for (name, (type_name, offset)) in raw {
            let field_type =
                FieldType::from_name(&name, &type_name).map_err(serde::de::Error::custom)?;
            table.insert(name, SchemaEntry { field_type, offset });
        }
        Ok(Self(table))
    }
}

/// Schema registry for both header segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub binary_header: FieldTable,
    pub trace_header: FieldTable,
}

impl Schema {
    /// Look up a field, failing with [`SegyError::SchemaFieldNotFound`].
    pub fn lookup(&self, segment: Segment, name: &str) -> Result<SchemaEntry> {
        self.table(segment)
            .get(name)
            .ok_or_else(|| SegyError::SchemaFieldNotFound {
                segment,
                field: name.into(),
            })
    }

    pub fn table(&self, segment: Segment) -> &FieldTable {
        match segment {
            Segment::BinaryHeader => &self.binary_header,
            Segment::TraceHeader => &self.trace_header,
        }
    }

    /// Add or override a field.
    pub fn insert(&mut self, segment: Segment, name: impl Into<String>, entry: SchemaEntry) {
        let table = match segment {
            Segment::BinaryHeader => &mut self.binary_header,
            Segment::TraceHeader => &mut self.trace_header,
        };
        table.insert(name, entry);
    }

    /// Builder form of [`Schema::insert`].
    pub fn with_field(mut self, segment: Segment, name: impl Into<String>, entry: SchemaEntry) -> Self {
        self.insert(segment, name, entry);
        self
    }
}

impl Default for Schema {
    fn default() -> Self {
        let binary_header = [
            // mandatory
            (SAMPLE_PER_TRACE, SchemaEntry::short(20)),
            (SAMPLE_FORMAT_CODE, SchemaEntry::short(24)),
            (EXTRA_TEXT_HEADER_NUMBER, SchemaEntry::short(304)),
            // descriptive
            ("job_id", SchemaEntry::int(0)),
            ("line_no", SchemaEntry::int(4)),
            ("reel_no", SchemaEntry::int(8)),
            ("trace_per_ensemble", SchemaEntry::short(12)),
            ("auxtrace_per_ensemble", SchemaEntry::short(14)),
            ("sample_interval_us", SchemaEntry::short(16)),
            ("ori_sample_interval_us", SchemaEntry::short(18)),
            ("ori_sample_per_trace", SchemaEntry::short(22)),
            ("ensemble_fold", SchemaEntry::short(26)),
            ("sorting_code", SchemaEntry::short(28)),
        ]
        .into_iter()
        .collect();

        let trace_header = [
            ("trace_seq_no_within_line", SchemaEntry::int(0)),
            ("trace_seq_no_within_file", SchemaEntry::int(4)),
            ("ori_fld_rcd_no", SchemaEntry::int(8)),
            ("trace_no_within_ori_fld_rcd", SchemaEntry::int(12)),
        ]
        .into_iter()
        .collect();

        Self {
            binary_header,
            trace_header,
        }
    }
}
