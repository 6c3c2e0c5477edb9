use std::sync::Arc;

use freezer_core::{CodeBody, CodeFlags, MODULE_CODE_NAME};

use super::{Rewriter, TableKind};
use crate::Error;
use crate::test_utils::{
    child, class, doc_stub_fn, intrinsic_fn, intrinsic_stub_fn, module, plain_fn, stub_fn,
};

fn builtins(rewriter: &Rewriter) -> Vec<&str> {
    rewriter.tables().builtins().collect()
}

fn intrinsics(rewriter: &Rewriter) -> Vec<&str> {
    rewriter.tables().intrinsics().collect()
}

#[test]
fn module_level_stub() {
    let code = module(vec![stub_fn("f")]);
    let mut rewriter = Rewriter::new();

    let out = rewriter.process(&code, "m").unwrap();

    assert!(!Arc::ptr_eq(&code, &out));
    assert_eq!(builtins(&rewriter), ["FUNC(m, f)"]);
    assert_eq!(child(&out, &["f"]).body, CodeBody::NativeStub { index: 0 });
}

#[test]
fn methods_get_indices_in_order() {
    let code = module(vec![class(
        "C",
        vec![stub_fn("a"), plain_fn("b"), doc_stub_fn("c", "Doc.")],
    )]);
    let mut rewriter = Rewriter::new();

    let out = rewriter.process(&code, "m").unwrap();

    assert_eq!(builtins(&rewriter), ["METH(C, a)", "METH(C, c)"]);
    assert_eq!(child(&out, &["C", "a"]).builtin_index(), Some(0));
    assert_eq!(child(&out, &["C", "c"]).builtin_index(), Some(1));
    assert!(child(&out, &["C", "b"]).interpreted().is_some());
}

#[test]
fn untouched_tree_is_returned_as_is() {
    let code = module(vec![plain_fn("f"), class("C", vec![plain_fn("g")])]);
    let mut rewriter = Rewriter::new();

    let out = rewriter.process(&code, "m").unwrap();

    assert!(Arc::ptr_eq(&code, &out));
    assert_eq!(rewriter.tables().builtin_count(), 0);
    assert_eq!(rewriter.tables().intrinsic_count(), 0);
}

#[test]
fn unchanged_siblings_keep_identity() {
    let code = module(vec![class("A", vec![plain_fn("g")]), stub_fn("f")]);
    let mut rewriter = Rewriter::new();

    let out = rewriter.process(&code, "m").unwrap();

    let before = code.children().next().unwrap();
    let after = out.children().next().unwrap();
    assert!(Arc::ptr_eq(before, after));
}

#[test]
fn stub_keeps_signature() {
    let mut f = stub_fn("f");
    f.argcount = 2;
    f.nlocals = 2;
    f.varnames = vec!["a".to_string(), "b".to_string()];
    let code = module(vec![f]);

    let out = Rewriter::new().process(&code, "m").unwrap();

    let f = child(&out, &["f"]);
    assert_eq!(f.argcount, 2);
    assert_eq!(f.varnames, ["a", "b"]);
    assert_eq!(f.wire_stack_size(), 0);
    assert!(f.wire_flags().contains(CodeFlags::NATIVE_STUB));
    assert!(f.constants().is_empty());
}

#[test]
fn intrinsic_function_keeps_its_body() {
    let code = module(vec![intrinsic_fn("fast")]);
    let mut rewriter = Rewriter::new();

    let out = rewriter.process(&code, "m").unwrap();

    assert_eq!(intrinsics(&rewriter), ["FUNC(m, fast_intrinsic)"]);
    assert!(builtins(&rewriter).is_empty());

    let fast = child(&out, &["fast"]);
    assert_eq!(fast.intrinsic_index(), Some(0));
    assert!(fast.interpreted().is_some());
    assert!(fast.wire_flags().contains(CodeFlags::METADATA));
    assert!(!fast.wire_flags().contains(CodeFlags::NATIVE_STUB));
}

#[test]
fn intrinsic_stub_gets_both_slots() {
    let code = module(vec![
        stub_fn("first"),
        class("C", vec![intrinsic_stub_fn("meth")]),
    ]);
    let mut rewriter = Rewriter::new();

    let out = rewriter.process(&code, "m").unwrap();

    assert_eq!(builtins(&rewriter), ["FUNC(m, first)", "METH(C, meth)"]);
    assert_eq!(intrinsics(&rewriter), ["METH(C, meth_intrinsic)"]);

    let meth = child(&out, &["C", "meth"]);
    assert_eq!(
        meth.body,
        CodeBody::Intrinsic {
            index: 0,
            inner: Box::new(CodeBody::NativeStub { index: 1 }),
        }
    );
    assert_eq!(
        meth.wire_flags() & CodeFlags::DERIVED,
        CodeFlags::NATIVE_STUB | CodeFlags::METADATA
    );
}

#[test]
fn indices_continue_across_modules() {
    let mut rewriter = Rewriter::new();

    rewriter
        .process(&module(vec![stub_fn("a"), stub_fn("b")]), "first")
        .unwrap();
    let out = rewriter
        .process(&module(vec![stub_fn("c")]), "second")
        .unwrap();

    assert_eq!(
        builtins(&rewriter),
        ["FUNC(first, a)", "FUNC(first, b)", "FUNC(second, c)"]
    );
    assert_eq!(child(&out, &["c"]).builtin_index(), Some(2));
}

#[test]
fn dotted_module_identifier() {
    let mut rewriter = Rewriter::new();

    rewriter
        .process(&module(vec![stub_fn("f")]), "importlib._bootstrap")
        .unwrap();

    assert_eq!(builtins(&rewriter), ["FUNC(importlib__bootstrap, f)"]);
}

#[test]
fn same_method_in_two_modules_is_duplicate() {
    let mut rewriter = Rewriter::new();
    rewriter
        .process(&module(vec![class("C", vec![stub_fn("m")])]), "a")
        .unwrap();

    let err = rewriter
        .process(&module(vec![class("C", vec![stub_fn("m")])]), "b")
        .unwrap_err();

    assert!(matches!(
        err,
        Error::DuplicateIdentifier { table: TableKind::Builtin, ref identifier }
            if identifier == "METH(C, m)"
    ));
}

#[test]
fn stub_two_levels_deep_is_unsupported() {
    let method = class("f", vec![stub_fn("g")]);
    let code = module(vec![class("C", vec![method])]);

    let err = Rewriter::new().process(&code, "m").unwrap_err();

    assert!(matches!(
        err,
        Error::UnsupportedNesting { ref module, ref path } if module == "m" && path == "C.f.g"
    ));
}

#[test]
fn nested_module_code_is_malformed() {
    let code = module(vec![class(MODULE_CODE_NAME, vec![])]);

    let err = Rewriter::new().process(&code, "m").unwrap_err();

    assert!(matches!(err, Error::MalformedTree { ref module, .. } if module == "m"));
}

#[test]
fn malformed_stub_aborts() {
    let mut f = stub_fn("f");
    crate::test_utils::interpreted_mut(&mut f).stack_depth = 2;
    let code = module(vec![f]);
    let mut rewriter = Rewriter::new();

    let err = rewriter.process(&code, "m").unwrap_err();

    assert!(matches!(err, Error::MalformedStub { .. }));
    assert_eq!(rewriter.tables().builtin_count(), 0);
}

#[test]
fn rewritten_tree_passes_through() {
    let code = module(vec![stub_fn("f"), intrinsic_fn("g")]);
    let mut rewriter = Rewriter::new();
    let out = rewriter.process(&code, "m").unwrap();

    let again = rewriter.process(&out, "m").unwrap();

    assert!(Arc::ptr_eq(&out, &again));
    assert_eq!(rewriter.tables().builtin_count(), 1);
    assert_eq!(rewriter.tables().intrinsic_count(), 1);
}
