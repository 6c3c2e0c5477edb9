//! Code object flag bits.

bitflags::bitflags! {
    /// Flags carried by a code object.
    ///
    /// Only the bits the freezer reads or writes are named; any other
    /// language flag set by the compiler is retained as an unnamed bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CodeFlags: u32 {
        const OPTIMIZED = 0x0001;
        const NEWLOCALS = 0x0002;
        const VARARGS = 0x0004;
        const VARKEYWORDS = 0x0008;
        const NESTED = 0x0010;
        const GENERATOR = 0x0020;
        const NOFREE = 0x0040;
        const COROUTINE = 0x0080;
        const ITERABLE_COROUTINE = 0x0100;
        const ASYNC_GENERATOR = 0x0200;
        /// `from __future__ import annotations` semantics.
        const FUTURE_ANNOTATIONS = 0x0100_0000;
        /// Body is a native stub; the stack size slot holds the builtin index.
        const NATIVE_STUB = 0x0200_0000;
        /// First constant is a metadata tuple.
        const METADATA = 0x0400_0000;

        const _ = !0;
    }
}

impl CodeFlags {
    /// Bits that are derived from the code body and never taken from input.
    pub const DERIVED: CodeFlags = CodeFlags::NATIVE_STUB.union(CodeFlags::METADATA);

    /// Names of the set named flags, in bit order.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}
