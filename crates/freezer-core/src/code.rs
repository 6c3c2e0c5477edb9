//! Typed code objects.
//!
//! A code object's body is one of three variants. Interpreted bodies carry
//! everything the compiler produced; native stubs carry only their slot in
//! the builtin dispatch table; intrinsic bodies wrap another body and carry
//! their slot in the intrinsic dispatch table. No field changes meaning
//! depending on the variant it lives in.

use std::sync::Arc;

use crate::flags::CodeFlags;

/// A compiled module, class or function body.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeObject {
    pub name: String,
    pub argcount: u32,
    pub posonlyargcount: u32,
    pub kwonlyargcount: u32,
    pub nlocals: u32,
    pub varnames: Vec<String>,
    /// Language flags. Bits in [`CodeFlags::DERIVED`] are ignored here and
    /// recomputed from the body by [`CodeObject::wire_flags`].
    pub flags: CodeFlags,
    pub body: CodeBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeBody {
    Interpreted(Interpreted),
    /// Pure delegate to a native function at `index` in the builtin table.
    NativeStub { index: usize },
    /// Body tagged for the intrinsic fast path at `index` in the intrinsic
    /// table (unbiased).
    Intrinsic { index: usize, inner: Box<CodeBody> },
}

/// Everything the compiler produced for a body that runs in the interpreter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Interpreted {
    pub instructions: Vec<u8>,
    pub constants: Vec<Constant>,
    pub names: Vec<String>,
    pub free_vars: Vec<String>,
    pub cell_vars: Vec<String>,
    pub stack_depth: u32,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub filename: String,
    pub first_line: u32,
    pub line_table: Vec<u8>,
}

/// A literal or nested code object in a constants table.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    None,
    Ellipsis,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range, as decimal text with an optional
    /// leading `-` and no leading zeros.
    BigInt(String),
    Float(f64),
    Complex { re: f64, im: f64 },
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Constant>),
    FrozenSet(Vec<Constant>),
    Code(Arc<CodeObject>),
}

impl Constant {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&Arc<CodeObject>> {
        match self {
            Constant::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Constant::None)
    }
}

impl CodeBody {
    /// The interpreted body, looking through an intrinsic wrapper.
    pub fn interpreted(&self) -> Option<&Interpreted> {
        match self {
            CodeBody::Interpreted(body) => Some(body),
            CodeBody::NativeStub { .. } => None,
            CodeBody::Intrinsic { inner, .. } => inner.interpreted(),
        }
    }

    /// Builtin table index, looking through an intrinsic wrapper.
    pub fn builtin_index(&self) -> Option<usize> {
        match self {
            CodeBody::Interpreted(_) => None,
            CodeBody::NativeStub { index } => Some(*index),
            CodeBody::Intrinsic { inner, .. } => inner.builtin_index(),
        }
    }

    pub fn intrinsic_index(&self) -> Option<usize> {
        match self {
            CodeBody::Intrinsic { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl CodeObject {
    pub fn interpreted(&self) -> Option<&Interpreted> {
        self.body.interpreted()
    }

    pub fn is_native_stub(&self) -> bool {
        self.body.builtin_index().is_some()
    }

    pub fn builtin_index(&self) -> Option<usize> {
        self.body.builtin_index()
    }

    pub fn intrinsic_index(&self) -> Option<usize> {
        self.body.intrinsic_index()
    }

    /// Constants of the interpreted body, empty for native stubs.
    pub fn constants(&self) -> &[Constant] {
        match self.interpreted() {
            Some(body) => &body.constants,
            None => &[],
        }
    }

    /// Code objects nested directly in the constants table, in order.
    pub fn children(&self) -> impl Iterator<Item = &Arc<CodeObject>> {
        self.constants().iter().filter_map(Constant::as_code)
    }

    /// Flags as written to the serialized form.
    pub fn wire_flags(&self) -> CodeFlags {
        let mut flags = self.flags.difference(CodeFlags::DERIVED);
        if self.is_native_stub() {
            flags |= CodeFlags::NATIVE_STUB;
        }
        if self.intrinsic_index().is_some() {
            flags |= CodeFlags::METADATA;
        }
        flags
    }

    /// Stack size slot as written to the serialized form.
    ///
    /// Native stubs store their builtin table index in this slot.
    pub fn wire_stack_size(&self) -> u32 {
        match (self.builtin_index(), self.interpreted()) {
            (Some(index), _) => index as u32,
            (None, Some(body)) => body.stack_depth,
            (None, None) => 0,
        }
    }

    /// Constants as written to the serialized form.
    ///
    /// Intrinsic bodies get a one-element metadata tuple prepended that holds
    /// the intrinsic index biased by one; zero means "not intrinsic".
    pub fn wire_constants(&self) -> Vec<Constant> {
        let mut consts = Vec::new();
        if let Some(index) = self.intrinsic_index() {
            consts.push(Constant::Tuple(vec![Constant::Int(index as i64 + 1)]));
        }
        consts.extend(self.constants().iter().cloned());
        consts
    }
}
