use crate::opcode::{DecodeError, Instruction, Opcode, decode};

#[test]
fn decode_simple_stream() {
    let code = [116, 0, 131, 0, 1, 0, 100, 0, 83, 0];
    let ops: Vec<_> = decode(&code)
        .unwrap()
        .into_iter()
        .map(|i| (i.offset, i.opcode, i.arg))
        .collect();
    assert_eq!(
        ops,
        [
            (0, Opcode::LOAD_GLOBAL, 0),
            (2, Opcode::CALL_FUNCTION, 0),
            (4, Opcode::POP_TOP, 0),
            (6, Opcode::LOAD_CONST, 0),
            (8, Opcode::RETURN_VALUE, 0),
        ]
    );
}

#[test]
fn decode_folds_extended_arg() {
    let code = [144, 1, 144, 2, 100, 3, 83, 0];
    let ins = decode(&code).unwrap();
    assert_eq!(
        ins[0],
        Instruction {
            offset: 0,
            opcode: Opcode::LOAD_CONST,
            arg: 0x01_02_03,
        }
    );
    assert_eq!(ins[1].offset, 6);
    assert_eq!(ins.len(), 2);
}

#[test]
fn decode_ignores_arg_byte_without_argument() {
    let ins = decode(&[1, 7]).unwrap();
    assert_eq!(ins[0].arg, 0);
}

#[test]
fn decode_rejects_odd_length() {
    assert_eq!(decode(&[100]), Err(DecodeError::OddLength(1)));
}

#[test]
fn decode_rejects_dangling_extended_arg() {
    assert_eq!(
        decode(&[9, 0, 144, 1]),
        Err(DecodeError::DanglingExtendedArg(2))
    );
}

#[test]
fn decode_rejects_overflowing_argument() {
    let code = [144, 1, 144, 0, 144, 0, 144, 0, 100, 0];
    assert_eq!(decode(&code), Err(DecodeError::ArgOverflow(8)));
}

#[test]
fn opcode_names() {
    assert_eq!(Opcode::LOAD_GLOBAL.to_string(), "LOAD_GLOBAL");
    assert_eq!(Opcode(255).to_string(), "<255>");
    assert!(Opcode::CALL_FUNCTION.has_arg());
    assert!(!Opcode::RETURN_VALUE.has_arg());
}
