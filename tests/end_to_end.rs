//! End-to-end tests for SCRAP IR
//!
//! A front end builds a function, seals it and hands it to a back end that
//! verifies and walks it.

mod common;

use scrap_assembler::assemble;
use scrap_ir::{
    verify, Function, FunctionBuilder, Instruction, Opcode, OperandKind, ValidationError,
    ValidationWarning, VerifyConfig,
};

/// Front end: x = 1 + 1; assert x == 2; return x
fn compile_one_plus_one() -> Function {
    let mut builder = FunctionBuilder::new();
    let one = builder.push_int(1);
    builder.push(Instruction::unary(Opcode::Intk, one));
    builder.push(Instruction::binary(Opcode::Add, 0, 0));
    let two = builder.push_int(2);
    builder.push(Instruction::unary(Opcode::Intk, two));
    builder.push(Instruction::binary(Opcode::Eq, 2, 3));
    builder.push(Instruction::unary(Opcode::Assert, 4));
    builder.push(Instruction::unary(Opcode::Ret, 2));
    builder.seal()
}

/// Back end: resolve every integer constant the stream loads
fn loaded_ints(function: &Function) -> Vec<i32> {
    function
        .text()
        .iter()
        .flat_map(|instr| instr.typed_operands())
        .filter(|(kind, _)| *kind == OperandKind::IntConst)
        .map(|(_, index)| function.intk_table()[index as usize])
        .collect()
}

// ============================================================================
// 1 + 1
// ============================================================================

#[test]
fn test_one_plus_one_builder() {
    common::init_logging();
    let function = compile_one_plus_one();

    assert_eq!(function.len(), 6);
    assert_eq!(function.intk_table(), &[1, 2]);
    for instr in function.text() {
        assert_eq!(instr.operands().len(), instr.opcode().arity().count());
    }

    let result = verify(&function, &VerifyConfig::STRICT);
    assert!(result.is_valid(), "{:?}", result.errors);
    assert_eq!(loaded_ints(&function), vec![1, 2]);
}

#[test]
fn test_one_plus_one_assembler_matches_builder() {
    common::init_logging();
    let source = r#"
        .int 1
        .int 2
        intk 0
        add 0, 0
        intk 1
        eq 2, 3
        assert 4
        ret 2
    "#;
    assert_eq!(assemble(source).unwrap(), compile_one_plus_one());
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_if_else() {
    common::init_logging();
    // if arg0 { return "yes" } else { return "no" }
    let source = r#"
        .args 1
        .str "yes"
        .str "no"
            sarg
            jf 0, @else
            strk 0
            ret 2
        else: jtarg
            strk 1
            ret 5
    "#;
    let function = assemble(source).unwrap();
    let result = verify(&function, &VerifyConfig::STRICT);
    assert!(result.is_valid(), "{:?}", result.errors);
    assert!(!result.has_warnings());
}

#[test]
fn test_for_loop() {
    common::init_logging();
    let source = r#"
        .args 1
            sarg
        head: jfor 0, 0, @exit
            jump @head
        exit: jtarg
            retv
    "#;
    let function = assemble(source).unwrap();
    let result = verify(&function, &VerifyConfig::STRICT);
    assert!(result.is_valid(), "{:?}", result.errors);
    // The exit marker counts as referenced through JFOR
    assert!(!result.has_warnings(), "{:?}", result.warnings);
}

#[test]
fn test_conditional_jump_to_loop_header_rejected() {
    common::init_logging();
    let source = r#"
        .int 1
        top: jloop
            intk 0
            jt 1, @top
            retv
    "#;
    let function = assemble(source).unwrap();
    let result = verify(&function, &VerifyConfig::DEFAULT);
    assert!(matches!(
        result.errors.as_slice(),
        [ValidationError::IllegalTargetKind { at: 2, .. }]
    ));
}

#[test]
fn test_missing_terminator_is_a_warning_by_default() {
    common::init_logging();
    let function = assemble(".int 1\nintk 0").unwrap();

    let result = verify(&function, &VerifyConfig::DEFAULT);
    assert!(result.is_valid());
    assert!(result.warnings.contains(&ValidationWarning::MissingTerminator));

    let result = verify(&function, &VerifyConfig::STRICT);
    assert!(result.errors.contains(&ValidationError::MissingTerminator));
}

#[test]
fn test_bad_pool_reference_caught_by_verifier() {
    common::init_logging();
    // The builder does not check pool indices; the verifier does
    let function = assemble("intk 0\nret 0").unwrap();
    let result = verify(&function, &VerifyConfig::DEFAULT);
    assert!(matches!(
        result.errors.as_slice(),
        [ValidationError::IntConstOutOfRange { at: 0, index: 0, len: 0 }]
    ));
}
