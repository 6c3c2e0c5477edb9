use indoc::indoc;

use crate::{CodeBody, CodeFlags, Constant, RawInt, parse_code};

#[test]
fn parse_nested_record() {
    let json = indoc! {r#"
        {
            "name": "<module>",
            "stacksize": 2,
            "flags": 16777216,
            "code": [100, 0, 132, 0, 90, 0, 100, 1, 83, 0],
            "consts": [
                {"type": "code", "value": {
                    "name": "f",
                    "argcount": 1,
                    "nlocals": 1,
                    "varnames": ["x"],
                    "stacksize": 1,
                    "flags": 67,
                    "code": [116, 0, 131, 0, 1, 0, 100, 0, 83, 0],
                    "consts": [{"type": "none"}],
                    "names": ["_builtin"],
                    "filename": "m.py",
                    "firstlineno": 1,
                    "lnotab": [0, 1]
                }},
                {"type": "str", "value": "f"},
                {"type": "none"}
            ],
            "names": ["f"],
            "filename": "m.py"
        }
    "#};

    let code = parse_code(json).unwrap();
    assert_eq!(code.name, "<module>");
    assert_eq!(code.flags, CodeFlags::FUTURE_ANNOTATIONS);

    let body = code.interpreted().unwrap();
    assert_eq!(body.stack_depth, 2);
    assert_eq!(body.names, ["f"]);
    assert_eq!(body.constants.len(), 3);
    assert_eq!(body.constants[1], Constant::Str("f".to_string()));

    let child = code.children().next().unwrap();
    assert_eq!(child.name, "f");
    assert_eq!(child.argcount, 1);
    assert_eq!(child.varnames, ["x"]);
    let child_body = child.interpreted().unwrap();
    assert_eq!(child_body.names, ["_builtin"]);
    assert_eq!(child_body.location.filename, "m.py");
    assert_eq!(child_body.location.line_table, [0, 1]);
}

#[test]
fn parse_literal_constants() {
    let json = indoc! {r#"
        {
            "name": "<module>",
            "consts": [
                {"type": "bool", "value": true},
                {"type": "int", "value": -5},
                {"type": "float", "value": 1.5},
                {"type": "complex", "value": [0.0, 2.0]},
                {"type": "bytes", "value": [1, 2]},
                {"type": "ellipsis"},
                {"type": "tuple", "value": [{"type": "str", "value": "a"}]},
                {"type": "frozenset", "value": [{"type": "int", "value": 3}]}
            ]
        }
    "#};

    let code = parse_code(json).unwrap();
    assert_eq!(
        code.constants(),
        [
            Constant::Bool(true),
            Constant::Int(-5),
            Constant::Float(1.5),
            Constant::Complex { re: 0.0, im: 2.0 },
            Constant::Bytes(vec![1, 2]),
            Constant::Ellipsis,
            Constant::Tuple(vec![Constant::Str("a".to_string())]),
            Constant::FrozenSet(vec![Constant::Int(3)]),
        ]
    );
}

#[test]
fn parsed_body_is_interpreted() {
    let code = parse_code(r#"{"name": "f"}"#).unwrap();
    assert!(matches!(code.body, CodeBody::Interpreted(_)));
    assert!(code.constants().is_empty());
}

#[test]
fn unknown_constant_type_is_error() {
    let err = parse_code(r#"{"name": "f", "consts": [{"type": "list", "value": []}]}"#)
        .unwrap_err();
    assert!(err.to_string().starts_with("malformed code record"));
}

#[test]
fn missing_name_is_error() {
    assert!(parse_code(r#"{"code": []}"#).is_err());
}

#[test]
fn parse_folded_wide_int() {
    let code = parse_code(
        r#"{"name": "_unpack_cookie", "consts": [{"type": "int", "value": 18446744073709551616}]}"#,
    )
    .unwrap();
    assert_eq!(
        code.constants(),
        [Constant::BigInt("18446744073709551616".to_string())]
    );
}

#[test]
fn parse_wide_int_from_text() {
    let json = indoc! {r#"
        {
            "name": "<module>",
            "consts": [
                {"type": "int", "value": "-0036893488147419103232"},
                {"type": "int", "value": "42"},
                {"type": "int", "value": 9223372036854775807}
            ]
        }
    "#};

    let code = parse_code(json).unwrap();
    assert_eq!(
        code.constants(),
        [
            Constant::BigInt("-36893488147419103232".to_string()),
            Constant::Int(42),
            Constant::Int(i64::MAX),
        ]
    );
}

#[test]
fn non_integer_int_is_error() {
    for value in ["1.5", r#""12a""#, r#""""#, "true"] {
        let json = format!(r#"{{"name": "f", "consts": [{{"type": "int", "value": {value}}}]}}"#);
        let err = parse_code(&json).unwrap_err();
        assert!(err.to_string().starts_with("malformed code record"), "{value}");
    }
}

#[test]
fn raw_int_parse() {
    assert_eq!(RawInt::parse("-7"), Some(RawInt::Small(-7)));
    assert_eq!(
        RawInt::parse("9223372036854775808"),
        Some(RawInt::Big("9223372036854775808".to_string()))
    );
    assert_eq!(RawInt::parse("-"), None);
    assert_eq!(RawInt::parse("1e20"), None);
}
