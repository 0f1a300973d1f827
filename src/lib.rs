//! Pure Rust SEG-Y header extraction and auto-detection.
//!
//! Before any trace in a SEG-Y file can be interpreted, four things must be
//! known: the byte order of the binary header, the encoding of the text
//! headers, the sample format and trace length, and how many extended text
//! headers follow the binary header. This crate resolves all of them
//! directly from the file bytes, driven by a field schema that callers can
//! extend or override.
//!
//! # Preparing an in-memory file
//!
//! ```
//! use std::io::Cursor;
//! use segy_rs::{
//!     ByteOrder, Configuration, FieldType, SampleFormat, TextEncoding, encode_text, prepare,
//!     write_field,
//! };
//!
//! // 3200-byte EBCDIC text header followed by a 400-byte big-endian binary header
//! let mut data = vec![0x40u8; 3600];
//! let text = encode_text("C 1 CLIENT", TextEncoding::Ebcdic).unwrap();
//! data[..text.len()].copy_from_slice(&text);
//! let mut file = Cursor::new(data);
//! write_field(&mut file, FieldType::Short, 3220, 1500, ByteOrder::Big).unwrap();
//! write_field(&mut file, FieldType::Short, 3224, 1, ByteOrder::Big).unwrap();
//! write_field(&mut file, FieldType::Short, 3504, 0, ByteOrder::Big).unwrap();
//!
//! let mut config = Configuration::new();
//! let prepared = prepare(&mut file, &mut config).unwrap();
//!
//! assert_eq!(prepared.endian, ByteOrder::Big);
//! assert_eq!(prepared.text_header_encoding, TextEncoding::Ebcdic);
//! assert_eq!(prepared.geometry.sample_format, SampleFormat::IbmFloat32);
//! assert_eq!(prepared.geometry.sample_per_trace, 1500);
//! assert_eq!(prepared.extra_text_header_number, 0);
//! ```
//!
//! # Trusting supplied values
//!
//! ```
//! use std::io::Cursor;
//! use segy_rs::{ByteOrder, Configuration, DetectionMode, DetectionModes, resolve_endian};
//!
//! let modes = DetectionModes {
//!     endian: DetectionMode::Manual,
//!     ..DetectionModes::default()
//! };
//! let mut config = Configuration::new()
//!     .with_modes(modes)
//!     .with_endian(ByteOrder::Big);
//!
//! // nothing is read from the stream in manual mode
//! let resolved = resolve_endian(&mut Cursor::new(Vec::new()), &mut config).unwrap();
//! assert_eq!(resolved.order(), ByteOrder::Big);
//! ```
//!
//! # Overriding the schema
//!
//! ```
//! use segy_rs::{Schema, SchemaEntry, Segment};
//!
//! let schema = Schema::default()
//!     .with_field(Segment::TraceHeader, "cdp_x", SchemaEntry::int(180))
//!     .with_field(Segment::TraceHeader, "cdp_y", SchemaEntry::int(184));
//! assert_eq!(schema.lookup(Segment::TraceHeader, "cdp_x").unwrap().offset, 180);
//! ```

pub mod config;
pub mod encoding;
pub mod endian;
pub mod error;
pub mod extended;
pub mod field;
pub mod header;
pub mod prepare;
pub mod reader;
pub mod sample_format;
pub mod schema;
pub mod settings;
pub mod types;

pub use config::{Configuration, DetectionModes, SegmentLayout};
pub use error::{ErrorKind, Result, SegyError};
pub use header::{HeaderValues, TraceLayout};
pub use prepare::Prepared;
pub use reader::SegyReader;
pub use sample_format::TraceGeometry;
pub use schema::{FieldTable, FieldType, Schema, SchemaEntry, Segment};
pub use settings::Settings;
pub use types::{
    Attribute, ByteOrder, Detection, DetectionMode, FormatRevision, Provenance, SampleFormat,
    TextEncoding,
};

pub use encoding::{decode_text, encode_text, resolve_encoding};
pub use endian::{ResolvedEndian, resolve_endian};
pub use extended::resolve_extended_headers;
pub use field::{read_field, write_field};
pub use prepare::{prepare, prepare_file};
pub use sample_format::resolve_sample_format;
