//! Per-field-number accumulation of unknown wire values.

use bytes::Bytes;
use protowire_buffers::Writer;

use crate::unknown::set::UnknownFields;
use crate::wire::{self, WireType};

/// The empty field value returned for absent field numbers.
pub(crate) static EMPTY_FIELD: UnknownField = UnknownField {
    varint: Vec::new(),
    fixed32: Vec::new(),
    fixed64: Vec::new(),
    length_delimited: Vec::new(),
    group: Vec::new(),
};

/// All wire values recorded for a single unknown field number, partitioned
/// by wire type.
///
/// Insertion order within each list is preserved and reproduced exactly on
/// serialization. Equality compares all five lists element-wise; two values
/// that encode the same number under different wire types are unequal.
///
/// # Example
///
/// ```
/// use protowire::UnknownField;
///
/// let field = UnknownField::builder().add_varint(1).add_varint(2).build();
/// assert_eq!(field.varint(), [1, 2]);
/// assert!(field.fixed32().is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnknownField {
    pub(crate) varint: Vec<i64>,
    pub(crate) fixed32: Vec<u32>,
    pub(crate) fixed64: Vec<u64>,
    pub(crate) length_delimited: Vec<Bytes>,
    pub(crate) group: Vec<UnknownFields>,
}

impl UnknownField {
    /// Creates a new, empty field builder.
    pub fn builder() -> UnknownFieldBuilder {
        UnknownFieldBuilder::default()
    }

    /// Returns `true` when all five value lists are empty.
    pub fn is_empty(&self) -> bool {
        self.varint.is_empty()
            && self.fixed32.is_empty()
            && self.fixed64.is_empty()
            && self.length_delimited.is_empty()
            && self.group.is_empty()
    }

    /// Varint values (wire type 0), in insertion order.
    pub fn varint(&self) -> &[i64] {
        &self.varint
    }

    /// Fixed 32-bit values (wire type 5), in insertion order.
    pub fn fixed32(&self) -> &[u32] {
        &self.fixed32
    }

    /// Fixed 64-bit values (wire type 1), in insertion order.
    pub fn fixed64(&self) -> &[u64] {
        &self.fixed64
    }

    /// Length-delimited byte runs (wire type 2), in insertion order.
    pub fn length_delimited(&self) -> &[Bytes] {
        &self.length_delimited
    }

    /// Nested groups (wire types 3/4), in insertion order.
    pub fn group(&self) -> &[UnknownFields] {
        &self.group
    }

    /// Appends every list of `other` onto this field's corresponding list.
    pub(crate) fn extend(&mut self, other: UnknownField) {
        self.varint.extend(other.varint);
        self.fixed32.extend(other.fixed32);
        self.fixed64.extend(other.fixed64);
        self.length_delimited.extend(other.length_delimited);
        self.group.extend(other.group);
    }

    pub(crate) fn push_varint(&mut self, value: i64) {
        self.varint.push(value);
    }

    pub(crate) fn push_fixed32(&mut self, value: u32) {
        self.fixed32.push(value);
    }

    pub(crate) fn push_fixed64(&mut self, value: u64) {
        self.fixed64.push(value);
    }

    pub(crate) fn push_length_delimited(&mut self, value: Bytes) {
        self.length_delimited.push(value);
    }

    pub(crate) fn push_group(&mut self, value: UnknownFields) {
        self.group.push(value);
    }

    /// Serializes every value of this field under `number`, tagged with the
    /// matching wire type.
    pub fn write_to(&self, number: i32, writer: &mut Writer) {
        for &value in &self.varint {
            wire::write_tag(writer, number, WireType::Varint);
            wire::write_varint64(writer, value as u64);
        }
        for &value in &self.fixed32 {
            wire::write_tag(writer, number, WireType::Fixed32);
            writer.u32_le(value);
        }
        for &value in &self.fixed64 {
            wire::write_tag(writer, number, WireType::Fixed64);
            writer.u64_le(value);
        }
        for value in &self.length_delimited {
            wire::write_tag(writer, number, WireType::LengthDelimited);
            wire::write_varint64(writer, value.len() as u64);
            writer.buf(value);
        }
        for value in &self.group {
            wire::write_tag(writer, number, WireType::StartGroup);
            value.write_to(writer);
            wire::write_tag(writer, number, WireType::EndGroup);
        }
    }

    /// Number of bytes [`write_to`](UnknownField::write_to) emits for this
    /// field under `number`.
    pub fn serialized_size(&self, number: i32) -> usize {
        let tag = wire::tag_size(number);
        let mut size = 0;
        for &value in &self.varint {
            size += tag + wire::varint64_size(value as u64);
        }
        size += self.fixed32.len() * (tag + 4);
        size += self.fixed64.len() * (tag + 8);
        for value in &self.length_delimited {
            size += tag + wire::varint64_size(value.len() as u64) + value.len();
        }
        for value in &self.group {
            size += tag * 2 + value.serialized_size();
        }
        size
    }
}

/// Mutable builder for [`UnknownField`].
///
/// Builders are reusable: [`build`](UnknownFieldBuilder::build) may be called
/// any number of times, and values added after a build never alter the
/// snapshots returned earlier.
#[derive(Clone, Debug, Default)]
pub struct UnknownFieldBuilder {
    result: UnknownField,
}

impl UnknownFieldBuilder {
    /// Appends a varint value (wire type 0).
    pub fn add_varint(&mut self, value: i64) -> &mut Self {
        self.result.varint.push(value);
        self
    }

    /// Appends a fixed 32-bit value (wire type 5).
    pub fn add_fixed32(&mut self, value: u32) -> &mut Self {
        self.result.fixed32.push(value);
        self
    }

    /// Appends a fixed 64-bit value (wire type 1).
    pub fn add_fixed64(&mut self, value: u64) -> &mut Self {
        self.result.fixed64.push(value);
        self
    }

    /// Appends a length-delimited byte run (wire type 2).
    pub fn add_length_delimited(&mut self, value: impl Into<Bytes>) -> &mut Self {
        self.result.length_delimited.push(value.into());
        self
    }

    /// Appends a nested group (wire types 3/4).
    pub fn add_group(&mut self, value: UnknownFields) -> &mut Self {
        self.result.group.push(value);
        self
    }

    /// Returns a snapshot of the values added so far.
    pub fn build(&self) -> UnknownField {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_is_reusable() {
        let mut builder = UnknownField::builder();
        builder.add_fixed32(10);
        let first = builder.build();
        let second = builder.build();
        builder.add_fixed32(11);
        let third = builder.build();

        assert_eq!(first, second);
        assert_ne!(first, third);
        assert_eq!(first.fixed32(), [10]);
        assert_eq!(third.fixed32(), [10, 11]);
    }

    #[test]
    fn empty_field() {
        assert!(UnknownField::default().is_empty());
        assert!(!UnknownField::builder().add_varint(0).build().is_empty());
    }

    #[test]
    fn extend_concatenates_each_list() {
        let mut dest = UnknownField::builder()
            .add_varint(1)
            .add_length_delimited(Bytes::from_static(b"a"))
            .build();
        let src = UnknownField::builder()
            .add_varint(2)
            .add_fixed64(3)
            .add_length_delimited(Bytes::from_static(b"b"))
            .build();
        dest.extend(src);
        assert_eq!(dest.varint(), [1, 2]);
        assert_eq!(dest.fixed64(), [3]);
        assert_eq!(
            dest.length_delimited(),
            [Bytes::from_static(b"a"), Bytes::from_static(b"b")]
        );
    }

    #[test]
    fn serialized_size_matches_output() {
        let field = UnknownField::builder()
            .add_varint(150)
            .add_fixed32(1)
            .add_fixed64(2)
            .add_length_delimited(Bytes::from_static(b"abc"))
            .build();
        let mut writer = Writer::new();
        field.write_to(12, &mut writer);
        assert_eq!(writer.flush().len(), field.serialized_size(12));
    }
}
