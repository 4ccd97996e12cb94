//! Unknown-field preservation for the protocol-buffers wire format.
//!
//! When a decoder meets a field number its schema does not declare — or a
//! wire type that does not match the declared field — the raw wire value is
//! recorded in an [`UnknownFields`] container instead of being dropped. The
//! container re-serializes bit-exactly, so unrecognized data survives
//! decode/re-encode cycles and messages stay forward- and
//! backward-compatible across schema versions.
//!
//! # Example
//!
//! ```
//! use protowire::UnknownFields;
//!
//! let mut builder = UnknownFields::builder();
//! builder.merge_varint_field(1, 150).unwrap();
//! let set = builder.build();
//!
//! // Field 1, wire type 0 (varint), value 150.
//! assert_eq!(set.to_bytes(), [0x08, 0x96, 0x01]);
//!
//! let parsed = UnknownFields::parse_from(&[0x08, 0x96, 0x01]).unwrap();
//! assert_eq!(parsed, set);
//! ```

mod error;
pub mod unknown;
pub mod wire;

pub use error::WireError;
pub use unknown::{UnknownField, UnknownFieldBuilder, UnknownFields, UnknownFieldsBuilder};
pub use wire::WireType;
