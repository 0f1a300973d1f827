//! Compile-time smoke test: verify top-level re-exports work.

use std::io::Cursor;

use segy_rs::{
    Attribute, ByteOrder, Configuration, DetectionMode, DetectionModes, ErrorKind, FieldType,
    FormatRevision, Prepared, Provenance, Result, SampleFormat, Schema, SchemaEntry, Segment,
    SegyError, SegyReader, Settings, TextEncoding, prepare, read_field,
};

#[test]
fn top_level_imports_compile() {
    // Just verify the types are usable from the crate root
    let _: fn(&mut Cursor<Vec<u8>>, &mut Configuration) -> Result<Prepared> = prepare;
    let _: fn(&mut Cursor<Vec<u8>>, FieldType, u64, ByteOrder) -> Result<i64> = read_field;

    let _bo = ByteOrder::Big;
    let _enc = TextEncoding::Ebcdic;
    let _fmt = SampleFormat::IbmFloat32;
    let _mode = DetectionMode::Manual;
    let _modes = DetectionModes::default();
    let _prov = Provenance::AutoDetected;
    let _attr = Attribute::Endian;
    let _rev = FormatRevision { major: 2, minor: 0 };
    let _entry = SchemaEntry::short(24);
    let _schema = Schema::default();
    let _seg = Segment::BinaryHeader;
    let _settings = Settings::default();
    let _reader = SegyReader::new("line.sgy");
    let _kind = ErrorKind::Detection;

    // SegyError is accessible
    let _e: Option<SegyError> = None;
}
