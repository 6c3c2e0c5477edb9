use super::{DispatchTables, TableKind};
use crate::Error;

#[test]
fn indices_follow_append_order() {
    let mut tables = DispatchTables::new();

    assert_eq!(tables.push_builtin("FUNC(m, a)".into()).unwrap(), 0);
    assert_eq!(tables.push_builtin("FUNC(m, b)".into()).unwrap(), 1);
    assert_eq!(tables.push_intrinsic("FUNC(m, a_intrinsic)".into()).unwrap(), 0);
    assert_eq!(tables.push_builtin("METH(C, c)".into()).unwrap(), 2);

    assert_eq!(
        tables.builtins().collect::<Vec<_>>(),
        ["FUNC(m, a)", "FUNC(m, b)", "METH(C, c)"]
    );
    assert_eq!(tables.intrinsics().collect::<Vec<_>>(), ["FUNC(m, a_intrinsic)"]);
    assert_eq!(tables.builtin_count(), 3);
    assert_eq!(tables.intrinsic_count(), 1);
}

#[test]
fn duplicate_is_fatal() {
    let mut tables = DispatchTables::new();
    tables.push_builtin("METH(C, m)".into()).unwrap();

    let err = tables.push_builtin("METH(C, m)".into()).unwrap_err();

    assert!(matches!(
        err,
        Error::DuplicateIdentifier { table: TableKind::Builtin, .. }
    ));
    assert_eq!(err.to_string(), "duplicate builtin identifier `METH(C, m)`");
    assert_eq!(tables.builtin_count(), 1);
}

#[test]
fn tables_are_independent() {
    let mut tables = DispatchTables::new();
    tables.push_builtin("FUNC(m, f)".into()).unwrap();
    assert_eq!(tables.push_intrinsic("FUNC(m, f)".into()).unwrap(), 0);
}
