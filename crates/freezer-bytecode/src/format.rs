//! Marshal format constants.
//!
//! The layout is the CPython 3.8 marshal format (magic number 3413). Frozen
//! blobs carry no file header; the runtime unmarshals them directly, so the
//! version marker is checked once when the freezer starts instead.

/// Format version the writer produces.
pub const FORMAT_VERSION: u16 = 3413;

/// Two-byte format marker: [`FORMAT_VERSION`] in little-endian order.
pub const FORMAT_MARKER: [u8; 2] = FORMAT_VERSION.to_le_bytes();

/// Set on a type code when the value is recorded in the reference table.
pub const FLAG_REF: u8 = 0x80;

/// Marshal type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeCode {
    None = b'N',
    False = b'F',
    True = b'T',
    Ellipsis = b'.',
    Int = b'i',
    Long = b'l',
    BinaryFloat = b'g',
    BinaryComplex = b'y',
    String = b's',
    Interned = b't',
    Ref = b'r',
    Tuple = b'(',
    SmallTuple = b')',
    FrozenSet = b'>',
    Code = b'c',
    Unicode = b'u',
    Ascii = b'a',
    AsciiInterned = b'A',
    ShortAscii = b'z',
    ShortAsciiInterned = b'Z',
}

impl TypeCode {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'N' => Self::None,
            b'F' => Self::False,
            b'T' => Self::True,
            b'.' => Self::Ellipsis,
            b'i' => Self::Int,
            b'l' => Self::Long,
            b'g' => Self::BinaryFloat,
            b'y' => Self::BinaryComplex,
            b's' => Self::String,
            b't' => Self::Interned,
            b'r' => Self::Ref,
            b'(' => Self::Tuple,
            b')' => Self::SmallTuple,
            b'>' => Self::FrozenSet,
            b'c' => Self::Code,
            b'u' => Self::Unicode,
            b'a' => Self::Ascii,
            b'A' => Self::AsciiInterned,
            b'z' => Self::ShortAscii,
            b'Z' => Self::ShortAsciiInterned,
            _ => return None,
        })
    }
}
