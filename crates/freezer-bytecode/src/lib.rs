//! Serialized form of frozen code objects.
//!
//! This crate contains:
//! - Format constants (version marker, marshal type codes)
//! - The marshal writer used as the freezer's serializer, and a reader for
//!   inspecting its output
//! - Wordcode opcodes and the instruction decoder
//! - Human-readable dumps of code object trees and of serialized blobs

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod dump;
mod format;
pub mod marshal;
pub mod opcode;

#[cfg(test)]
mod opcode_tests;

pub use dump::{dump, dump_blob};
pub use format::{FLAG_REF, FORMAT_MARKER, FORMAT_VERSION, TypeCode};
pub use marshal::{Marshal, ReadError, Serializer, WireCode, WireValue, read_code};
pub use opcode::{DecodeError, Instruction, Opcode, decode};
