//! Fixed-width integer fields at absolute stream offsets.
//!
//! All reads seek first, so callers must not rely on the stream position
//! after a call.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::schema::FieldType;
use crate::types::ByteOrder;
use crate::{Result, SegyError};

/// Decode one signed integer of `field_type` width at `offset`.
///
/// Fails with [`SegyError::TruncatedRead`] if the stream ends before the
/// whole field is available.
pub fn read_field<R: Read + Seek>(
    stream: &mut R,
    field_type: FieldType,
    offset: u64,
    byte_order: ByteOrder,
) -> Result<i64> {
    let bytes = read_bytes(stream, offset, field_type.byte_len())?;
    Ok(decode_field(&bytes, field_type, byte_order))
}

/// Read the single byte at `offset`.
pub fn read_byte<R: Read + Seek>(stream: &mut R, offset: u64) -> Result<u8> {
    let bytes = read_bytes(stream, offset, 1)?;
    Ok(bytes[0])
}

/// Read exactly `len` bytes at `offset`.
pub fn read_bytes<R: Read + Seek>(stream: &mut R, offset: u64, len: usize) -> Result<Vec<u8>> {
    let bytes = read_block(stream, offset, len)?;
    if bytes.len() < len {
        return Err(SegyError::TruncatedRead {
            offset,
            expected: len,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Read up to `len` bytes at `offset`. A short result means end of stream.
pub fn read_block<R: Read + Seek>(stream: &mut R, offset: u64, len: usize) -> Result<Vec<u8>> {
    stream
        .seek(SeekFrom::Start(offset))
        .map_err(|e| SegyError::io(offset, e))?;
    let mut bytes = Vec::with_capacity(len);
    (&mut *stream)
        .take(len as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| SegyError::io(offset, e))?;
    Ok(bytes)
}

/// Decode a field from a buffer holding exactly its bytes.
fn decode_field(bytes: &[u8], field_type: FieldType, byte_order: ByteOrder) -> i64 {
    match (field_type, byte_order) {
        (FieldType::Short, ByteOrder::Little) => LittleEndian::read_i16(bytes) as i64,
        (FieldType::Short, ByteOrder::Big) => BigEndian::read_i16(bytes) as i64,
        (FieldType::Int, ByteOrder::Little) => LittleEndian::read_i32(bytes) as i64,
        (FieldType::Int, ByteOrder::Big) => BigEndian::read_i32(bytes) as i64,
    }
}

/// Encode `value` as a `field_type` integer.
///
/// Fails with [`SegyError::ValueOutOfRange`] if the value does not fit.
pub fn encode_field(value: i64, field_type: FieldType, byte_order: ByteOrder) -> Result<Vec<u8>> {
    let out_of_range = || SegyError::ValueOutOfRange {
        value,
        bits: field_type.bits(),
    };
    let mut buf = vec![0u8; field_type.byte_len()];
    match field_type {
        FieldType::Short => {
            let v = i16::try_from(value).map_err(|_| out_of_range())?;
            match byte_order {
                ByteOrder::Little => LittleEndian::write_i16(&mut buf, v),
                ByteOrder::Big => BigEndian::write_i16(&mut buf, v),
            }
        }
        FieldType::Int => {
            let v = i32::try_from(value).map_err(|_| out_of_range())?;
            match byte_order {
                ByteOrder::Little => LittleEndian::write_i32(&mut buf, v),
                ByteOrder::Big => BigEndian::write_i32(&mut buf, v),
            }
        }
    }
    Ok(buf)
}

/// Write `value` as a `field_type` integer at `offset`.
pub fn write_field<W: Write + Seek>(
    stream: &mut W,
    field_type: FieldType,
    offset: u64,
    value: i64,
    byte_order: ByteOrder,
) -> Result<()> {
    let bytes = encode_field(value, field_type, byte_order)?;
    stream
        .seek(SeekFrom::Start(offset))
        .map_err(|e| SegyError::io(offset, e))?;
    stream
        .write_all(&bytes)
        .map_err(|e| SegyError::io(offset, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_decode_identity() {
        let cases = [
            (FieldType::Short, 0i64),
            (FieldType::Short, 1),
            (FieldType::Short, -1),
            (FieldType::Short, i16::MIN as i64),
            (FieldType::Short, i16::MAX as i64),
            (FieldType::Int, 1500),
            (FieldType::Int, -123_456_789),
            (FieldType::Int, i32::MIN as i64),
            (FieldType::Int, i32::MAX as i64),
        ];
        for (field_type, value) in cases {
            for order in [ByteOrder::Little, ByteOrder::Big] {
                let bytes = encode_field(value, field_type, order).unwrap();
                assert_eq!(bytes.len(), field_type.byte_len());
                let mut cur = Cursor::new(bytes);
                assert_eq!(
                    read_field(&mut cur, field_type, 0, order).unwrap(),
                    value,
                    "{field_type:?} {order} {value}"
                );
            }
        }
    }

    #[test]
    fn test_read_at_absolute_offset() {
        let mut data = vec![0u8; 16];
        data[10] = 0x00;
        data[11] = 0x05;
        let mut cur = Cursor::new(data);
        assert_eq!(
            read_field(&mut cur, FieldType::Short, 10, ByteOrder::Big).unwrap(),
            5
        );
        assert_eq!(
            read_field(&mut cur, FieldType::Short, 10, ByteOrder::Little).unwrap(),
            0x0500
        );
    }

    #[test]
    fn test_truncated_read() {
        let mut cur = Cursor::new(vec![0u8; 11]);
        let err = read_field(&mut cur, FieldType::Int, 9, ByteOrder::Big).unwrap_err();
        assert!(matches!(
            err,
            SegyError::TruncatedRead {
                offset: 9,
                expected: 4,
                actual: 2
            }
        ));

        let err = read_byte(&mut cur, 100).unwrap_err();
        assert!(matches!(err, SegyError::TruncatedRead { actual: 0, .. }));
    }

    #[test]
    fn test_read_block_short_at_end() {
        let mut cur = Cursor::new(vec![7u8; 10]);
        assert_eq!(read_block(&mut cur, 6, 8).unwrap(), vec![7u8; 4]);
        assert!(read_block(&mut cur, 20, 8).unwrap().is_empty());
    }

    #[test]
    fn test_encode_out_of_range() {
        let err = encode_field(40_000, FieldType::Short, ByteOrder::Big).unwrap_err();
        assert!(matches!(
            err,
            SegyError::ValueOutOfRange {
                value: 40_000,
                bits: 16
            }
        ));
    }

    #[test]
    fn test_write_field_extends_stream() {
        let mut cur = Cursor::new(Vec::new());
        write_field(&mut cur, FieldType::Short, 4, -1, ByteOrder::Little).unwrap();
        assert_eq!(cur.get_ref(), &vec![0, 0, 0, 0, 0xFF, 0xFF]);
    }
}
