//! Ordered field-number → [`UnknownField`] mapping: immutable value and
//! copy-on-write builder.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use protowire_buffers::{Reader, Writer};

use crate::error::WireError;
use crate::unknown::field::{EMPTY_FIELD, UnknownField};
use crate::wire::{self, RECURSION_LIMIT, WireType};

/// An immutable set of unknown fields, keyed by field number.
///
/// A decoder accumulates fields it cannot map to its schema into a set via
/// [`UnknownFieldsBuilder`]; the built value is attached to the message and
/// re-serialized on encode, so unrecognized data survives decode/re-encode
/// cycles byte-for-byte.
///
/// Built values are cheap to clone and safe to share across threads: the
/// underlying map is reference-counted and never mutated after
/// [`build`](UnknownFieldsBuilder::build).
///
/// # Example
///
/// ```
/// use protowire::UnknownFields;
///
/// // Field 1, varint 150.
/// let data = [0x08, 0x96, 0x01];
/// let set = UnknownFields::parse_from(&data).unwrap();
/// assert_eq!(set.get_field(1).varint(), [150]);
/// assert_eq!(set.to_bytes(), data);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnknownFields {
    fields: Arc<BTreeMap<i32, UnknownField>>,
}

impl UnknownFields {
    /// Creates a new, empty builder.
    pub fn builder() -> UnknownFieldsBuilder {
        UnknownFieldsBuilder::default()
    }

    /// Parses a whole byte stream of tag/value pairs into a set.
    pub fn parse_from(data: &[u8]) -> Result<UnknownFields, WireError> {
        let mut builder = UnknownFieldsBuilder::default();
        builder.merge_from_bytes(data)?;
        Ok(builder.build())
    }

    /// Creates a builder pre-seeded with this set's fields.
    ///
    /// The builder shares this set's storage until its first mutation.
    pub fn to_builder(&self) -> UnknownFieldsBuilder {
        UnknownFieldsBuilder {
            fields: Arc::clone(&self.fields),
        }
    }

    /// Returns the values stored under `number`, or an empty field when the
    /// number is absent or non-positive. Never fails; use
    /// [`has_field`](UnknownFields::has_field) to distinguish absence.
    pub fn get_field(&self, number: i32) -> &UnknownField {
        self.fields.get(&number).unwrap_or(&EMPTY_FIELD)
    }

    /// Returns whether `number` has an entry. Non-positive numbers are
    /// simply not present.
    pub fn has_field(&self, number: i32) -> bool {
        self.fields.contains_key(&number)
    }

    /// Read-only view of the mapping, ordered by field number ascending.
    pub fn as_map(&self) -> &BTreeMap<i32, UnknownField> {
        &self.fields
    }

    /// Returns `true` when the set holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serializes every field in ascending field-number order, each field's
    /// values in insertion order.
    pub fn write_to(&self, writer: &mut Writer) {
        for (&number, field) in self.fields.iter() {
            field.write_to(number, writer);
        }
    }

    /// Serializes the set into a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.write_to(&mut writer);
        writer.flush()
    }

    /// Number of bytes [`write_to`](UnknownFields::write_to) emits.
    pub fn serialized_size(&self) -> usize {
        self.fields
            .iter()
            .map(|(&number, field)| field.serialized_size(number))
            .sum()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        for (&number, field) in self.fields.iter() {
            for &value in field.varint() {
                writeln!(f, "{pad}{number}: {value}")?;
            }
            for &value in field.fixed32() {
                writeln!(f, "{pad}{number}: 0x{value:08x}")?;
            }
            for &value in field.fixed64() {
                writeln!(f, "{pad}{number}: 0x{value:016x}")?;
            }
            for value in field.length_delimited() {
                writeln!(f, "{pad}{number}: \"{}\"", escape_bytes(value))?;
            }
            for value in field.group() {
                writeln!(f, "{pad}{number} {{")?;
                value.fmt_indented(f, indent + 1)?;
                writeln!(f, "{pad}}}")?;
            }
        }
        Ok(())
    }
}

/// Text rendering, one line per value in field-number order: varints as
/// decimal, fixed values in hex, byte runs as C-escaped strings, groups as
/// indented blocks.
impl fmt::Display for UnknownFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// C-style escaping for arbitrary bytes; non-printable bytes become octal
/// escapes.
fn escape_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        match b {
            0x07 => out.push_str("\\a"),
            0x08 => out.push_str("\\b"),
            0x0c => out.push_str("\\f"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x0b => out.push_str("\\v"),
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out
}

/// Mutable builder for [`UnknownFields`].
///
/// A builder is a single-writer object; built snapshots and clones share the
/// underlying map and detach lazily on the first mutation after the share
/// (copy-on-write), so neither later builder mutations nor mutations of a
/// clone can alter data already handed out.
///
/// All mutating operations reject non-positive field numbers with
/// [`WireError::InvalidFieldNumber`]; queries treat them as absent.
#[derive(Clone, Debug, Default)]
pub struct UnknownFieldsBuilder {
    fields: Arc<BTreeMap<i32, UnknownField>>,
}

impl UnknownFieldsBuilder {
    fn check_field_number(number: i32) -> Result<(), WireError> {
        if number <= 0 {
            Err(WireError::InvalidFieldNumber(number))
        } else {
            Ok(())
        }
    }

    /// Detaches the map from any built snapshots or clones before mutating.
    fn fields_mut(&mut self) -> &mut BTreeMap<i32, UnknownField> {
        Arc::make_mut(&mut self.fields)
    }

    /// Sets the values stored under `number` to exactly `field`, replacing
    /// any existing entry. An empty `field` removes the entry: empty values
    /// are never stored.
    pub fn add_field(&mut self, number: i32, field: UnknownField) -> Result<&mut Self, WireError> {
        Self::check_field_number(number)?;
        if field.is_empty() {
            if self.fields.contains_key(&number) {
                self.fields_mut().remove(&number);
            }
        } else {
            self.fields_mut().insert(number, field);
        }
        Ok(self)
    }

    /// Merges `field` into the entry for `number`: each of the five value
    /// lists is concatenated onto the existing one, existing values first.
    /// Behaves like [`add_field`](UnknownFieldsBuilder::add_field) when the
    /// number has no entry.
    pub fn merge_field(
        &mut self,
        number: i32,
        field: UnknownField,
    ) -> Result<&mut Self, WireError> {
        Self::check_field_number(number)?;
        if !field.is_empty() {
            match self.fields_mut().get_mut(&number) {
                Some(existing) => existing.extend(field),
                None => {
                    self.fields_mut().insert(number, field);
                }
            }
        }
        Ok(self)
    }

    /// Merges a single varint value into the entry for `number`.
    pub fn merge_varint_field(
        &mut self,
        number: i32,
        value: i64,
    ) -> Result<&mut Self, WireError> {
        Self::check_field_number(number)?;
        self.fields_mut().entry(number).or_default().push_varint(value);
        Ok(self)
    }

    /// Merges a single length-delimited value into the entry for `number`.
    pub fn merge_length_delimited_field(
        &mut self,
        number: i32,
        value: impl Into<Bytes>,
    ) -> Result<&mut Self, WireError> {
        Self::check_field_number(number)?;
        self.fields_mut()
            .entry(number)
            .or_default()
            .push_length_delimited(value.into());
        Ok(self)
    }

    /// Removes the entry for `number`; no-op when absent.
    pub fn clear_field(&mut self, number: i32) -> Result<&mut Self, WireError> {
        Self::check_field_number(number)?;
        if self.fields.contains_key(&number) {
            self.fields_mut().remove(&number);
        }
        Ok(self)
    }

    /// Returns whether `number` has an entry; `false` for non-positive
    /// numbers rather than an error.
    pub fn has_field(&self, number: i32) -> bool {
        self.fields.contains_key(&number)
    }

    /// Removes all entries.
    pub fn clear(&mut self) -> &mut Self {
        self.fields = Arc::default();
        self
    }

    /// Merges every field of `other` into this builder using the
    /// [`merge_field`](UnknownFieldsBuilder::merge_field) rule, in `other`'s
    /// stored field-number order.
    pub fn merge_from(&mut self, other: &UnknownFields) -> &mut Self {
        for (&number, field) in other.as_map() {
            // Field numbers inside a built set are always positive.
            match self.fields_mut().get_mut(&number) {
                Some(existing) => existing.extend(field.clone()),
                None => {
                    self.fields_mut().insert(number, field.clone());
                }
            }
        }
        self
    }

    /// Live read-only view of the mapping, ordered by field number
    /// ascending.
    pub fn as_map(&self) -> &BTreeMap<i32, UnknownField> {
        &self.fields
    }

    /// Returns a snapshot of the fields accumulated so far.
    ///
    /// Idempotent when no mutation happens in between; snapshots are
    /// independent of all later builder mutations.
    pub fn build(&self) -> UnknownFields {
        UnknownFields {
            fields: Arc::clone(&self.fields),
        }
    }

    /// Parses a whole byte stream of tag/value pairs into this builder.
    ///
    /// A top-level end-group tag is malformed: there is no enclosing group
    /// it could terminate.
    pub fn merge_from_bytes(&mut self, data: &[u8]) -> Result<&mut Self, WireError> {
        let mut reader = Reader::new(data);
        self.merge_from_reader(&mut reader)?;
        Ok(self)
    }

    /// Parses tag/value pairs from `reader` until it is exhausted.
    pub fn merge_from_reader(&mut self, reader: &mut Reader) -> Result<(), WireError> {
        while !reader.is_empty() {
            let tag = wire::read_varint64(reader)? as u32;
            if !self.merge_wire_field(tag, reader)? {
                return Err(WireError::UnexpectedEndGroup);
            }
        }
        Ok(())
    }

    /// Consumes one wire value for `tag` from `reader` and merges it into
    /// this builder. This is the hand-off point for a message decoder that
    /// encountered a tag it cannot map to a declared field.
    ///
    /// Returns `Ok(false)` when `tag` is an end-group tag — the termination
    /// signal for an enclosing group, which the caller must pair up — and
    /// `Ok(true)` after any other tag's value has been consumed.
    ///
    /// Repeated occurrences of one field number are coalesced in encounter
    /// order under that number; re-serialization emits them contiguously, so
    /// streams that interleaved a field number with other numbers do not
    /// reproduce byte-for-byte (ascending contiguous streams do).
    pub fn merge_wire_field(&mut self, tag: u32, reader: &mut Reader) -> Result<bool, WireError> {
        self.merge_wire_field_at_depth(tag, reader, 0)
    }

    fn merge_wire_field_at_depth(
        &mut self,
        tag: u32,
        reader: &mut Reader,
        depth: usize,
    ) -> Result<bool, WireError> {
        let wire_type = WireType::from_tag(tag)?;
        if wire_type == WireType::EndGroup {
            return Ok(false);
        }
        let number = wire::tag_field_number(tag);
        if number == 0 {
            return Err(WireError::ZeroFieldNumber);
        }
        match wire_type {
            WireType::Varint => {
                let value = wire::read_varint64(reader)?;
                self.fields_mut()
                    .entry(number)
                    .or_default()
                    .push_varint(value as i64);
            }
            WireType::Fixed64 => {
                let value = reader.try_u64_le()?;
                self.fields_mut().entry(number).or_default().push_fixed64(value);
            }
            WireType::LengthDelimited => {
                let length = wire::read_varint64(reader)?;
                if length > reader.size() as u64 {
                    return Err(WireError::Eof);
                }
                let value = Bytes::copy_from_slice(reader.buf(length as usize));
                self.fields_mut()
                    .entry(number)
                    .or_default()
                    .push_length_delimited(value);
            }
            WireType::StartGroup => {
                if depth >= RECURSION_LIMIT {
                    return Err(WireError::RecursionLimit);
                }
                let group = Self::parse_group(number, reader, depth + 1)?;
                self.fields_mut().entry(number).or_default().push_group(group);
            }
            WireType::EndGroup => unreachable!("handled above"),
            WireType::Fixed32 => {
                let value = reader.try_u32_le()?;
                self.fields_mut().entry(number).or_default().push_fixed32(value);
            }
        }
        Ok(true)
    }

    /// Parses a nested group body until the end-group tag matching `number`.
    fn parse_group(
        number: i32,
        reader: &mut Reader,
        depth: usize,
    ) -> Result<UnknownFields, WireError> {
        let mut group = UnknownFieldsBuilder::default();
        loop {
            if reader.is_empty() {
                return Err(WireError::UnterminatedGroup);
            }
            let tag = wire::read_varint64(reader)? as u32;
            if !group.merge_wire_field_at_depth(tag, reader, depth)? {
                if wire::tag_field_number(tag) != number {
                    return Err(WireError::UnexpectedEndGroup);
                }
                return Ok(group.build());
            }
        }
    }
}
