//! Wire-format primitives: wire types, tags, and base-128 varints.
//!
//! A tag is `(field_number << 3) | wire_type`, itself encoded as a varint.
//! Varints store 64-bit values seven bits at a time, least-significant group
//! first, with the high bit of each byte marking continuation.

use protowire_buffers::{Reader, Writer};

use crate::error::WireError;

/// Longest legal varint encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Maximum group nesting depth accepted while parsing.
pub const RECURSION_LIMIT: usize = 100;

/// The 3-bit payload-encoding code carried in every tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Base-128 variable-length integer.
    Varint = 0,
    /// Raw little-endian 8-byte payload.
    Fixed64 = 1,
    /// Varint length prefix followed by that many raw bytes.
    LengthDelimited = 2,
    /// Opens a nested group; closed by [`WireType::EndGroup`].
    StartGroup = 3,
    /// Closes the innermost open group with the same field number.
    EndGroup = 4,
    /// Raw little-endian 4-byte payload.
    Fixed32 = 5,
}

impl WireType {
    /// Decodes the low three bits of a tag into a wire type.
    pub fn from_tag(tag: u32) -> Result<WireType, WireError> {
        match tag & 0x7 {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            other => Err(WireError::InvalidWireType(other as u8)),
        }
    }
}

/// Builds the tag for `field_number` and `wire_type`.
#[inline]
pub fn make_tag(field_number: i32, wire_type: WireType) -> u32 {
    ((field_number as u32) << 3) | wire_type as u32
}

/// Extracts the field number from a tag.
#[inline]
pub fn tag_field_number(tag: u32) -> i32 {
    (tag >> 3) as i32
}

/// Reads a base-128 varint as a raw 64-bit value.
///
/// Negative `int64` values on the wire occupy the full ten bytes; the
/// two's-complement bit pattern is returned unchanged (no zig-zag).
pub fn read_varint64(reader: &mut Reader) -> Result<u64, WireError> {
    let mut result: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let byte = reader.try_u8()?;
        result |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(WireError::MalformedVarint)
}

/// Writes a 64-bit value as a base-128 varint.
pub fn write_varint64(writer: &mut Writer, mut value: u64) {
    while value >= 0x80 {
        writer.u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    writer.u8(value as u8);
}

/// Number of bytes [`write_varint64`] emits for `value`.
pub fn varint64_size(value: u64) -> usize {
    if value == 0 {
        1
    } else {
        (64 - value.leading_zeros() as usize).div_ceil(7)
    }
}

/// Writes the tag for `field_number` and `wire_type`.
pub fn write_tag(writer: &mut Writer, field_number: i32, wire_type: WireType) {
    write_varint64(writer, make_tag(field_number, wire_type) as u64);
}

/// Encoded size of any tag carrying `field_number`.
///
/// All six wire types fit in the same low three bits, so the size depends on
/// the field number alone.
pub fn tag_size(field_number: i32) -> usize {
    varint64_size(make_tag(field_number, WireType::Varint) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_single_byte() {
        let mut writer = Writer::new();
        write_varint64(&mut writer, 0);
        write_varint64(&mut writer, 1);
        write_varint64(&mut writer, 127);
        assert_eq!(writer.flush(), vec![0x00, 0x01, 0x7f]);
    }

    #[test]
    fn varint_multi_byte() {
        let mut writer = Writer::new();
        write_varint64(&mut writer, 150);
        assert_eq!(writer.flush(), vec![0x96, 0x01]);
        write_varint64(&mut writer, 300);
        assert_eq!(writer.flush(), vec![0xac, 0x02]);
    }

    #[test]
    fn varint_roundtrip_matrix() {
        let cases: &[u64] = &[
            0,
            1,
            127,
            128,
            150,
            16_383,
            16_384,
            0x7fff_ffff,
            0x8000_0000,
            0x7fff_ffff_ffff_ffff,
            u64::MAX,
        ];
        for &case in cases {
            let mut writer = Writer::new();
            write_varint64(&mut writer, case);
            let data = writer.flush();
            assert_eq!(data.len(), varint64_size(case), "size of {case}");
            let mut reader = Reader::new(&data);
            assert_eq!(read_varint64(&mut reader), Ok(case));
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn varint_negative_as_twos_complement() {
        // -1 as int64 occupies the full ten bytes on the wire.
        let mut writer = Writer::new();
        write_varint64(&mut writer, -1i64 as u64);
        let data = writer.flush();
        assert_eq!(data.len(), 10);
        let mut reader = Reader::new(&data);
        assert_eq!(read_varint64(&mut reader).unwrap() as i64, -1);
    }

    #[test]
    fn varint_truncated() {
        let data = [0x96u8]; // continuation bit set, nothing follows
        let mut reader = Reader::new(&data);
        assert_eq!(read_varint64(&mut reader), Err(WireError::Eof));
    }

    #[test]
    fn varint_too_long() {
        let data = [0x80u8; 11];
        let mut reader = Reader::new(&data);
        assert_eq!(read_varint64(&mut reader), Err(WireError::MalformedVarint));
    }

    #[test]
    fn tag_make_and_split() {
        let tag = make_tag(5, WireType::Fixed32);
        assert_eq!(tag, 0x2d);
        assert_eq!(tag_field_number(tag), 5);
        assert_eq!(WireType::from_tag(tag), Ok(WireType::Fixed32));
    }

    #[test]
    fn tag_invalid_wire_type() {
        assert_eq!(WireType::from_tag(0x0e), Err(WireError::InvalidWireType(6)));
        assert_eq!(WireType::from_tag(0x0f), Err(WireError::InvalidWireType(7)));
    }

    #[test]
    fn tag_size_grows_with_field_number() {
        assert_eq!(tag_size(1), 1);
        assert_eq!(tag_size(15), 1);
        assert_eq!(tag_size(16), 2);
        assert_eq!(tag_size(2047), 2);
        assert_eq!(tag_size(2048), 3);
    }
}
