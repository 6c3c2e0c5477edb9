//! Marshal serialization of code object trees.
//!
//! The writer is the freezer's serializer. The reader exists to inspect
//! serialized blobs; it accepts the writer's output and the reference-flagged
//! variant CPython itself produces.

mod long;
mod reader;
mod writer;


use freezer_core::CodeObject;

pub use reader::{ReadError, WireCode, WireValue, read_code};
pub use writer::Marshal;

/// Encodes a code object tree into a portable binary form.
pub trait Serializer {
    /// Two-byte version marker of the produced format.
    fn format_marker(&self) -> [u8; 2];

    fn serialize(&self, code: &CodeObject) -> Vec<u8>;
}
