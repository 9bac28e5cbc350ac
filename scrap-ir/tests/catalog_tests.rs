//! Integration tests for the opcode catalog and instruction construction

use scrap_ir::{Arity, Instruction, IrError, Opcode, OperandKind, Role};

// ============================================================================
// Arity
// ============================================================================

#[test]
fn test_every_opcode_has_an_arity() {
    let mut per_arity = [0usize; 4];
    for op in Opcode::ALL {
        per_arity[op.arity().count()] += 1;
    }
    assert_eq!(per_arity.iter().sum::<usize>(), Opcode::COUNT);
    assert_eq!(per_arity, [5, 16, 37, 3]);
}

#[test]
fn test_constructor_matching_arity_succeeds() {
    for op in Opcode::ALL {
        let instr = match op.arity() {
            Arity::Zero => Instruction::nullary(op),
            Arity::One => Instruction::unary(op, 11),
            Arity::Two => Instruction::binary(op, 11, 22),
            Arity::Three => Instruction::ternary(op, 11, 22, 33),
        };
        let expected: Vec<u16> = [11, 22, 33][..op.arity().count()].to_vec();
        assert_eq!(instr.operands(), expected.as_slice(), "{}", op);
    }
}

#[test]
fn test_try_new_rejects_every_other_count() {
    let operands = [1u16, 2, 3, 4];
    for op in Opcode::ALL {
        for count in 0..=4 {
            let result = Instruction::try_new(op, &operands[..count]);
            if count == op.arity().count() {
                assert!(result.is_ok(), "{} with {} operands", op, count);
            } else {
                assert!(
                    matches!(result, Err(IrError::ArityMismatch { found, .. }) if found == count),
                    "{} with {} operands",
                    op,
                    count
                );
            }
        }
    }
}

#[test]
fn test_mismatched_constructors_panic() {
    for op in Opcode::ALL {
        let attempts: [fn(Opcode) -> Instruction; 4] = [
            Instruction::nullary,
            |op| Instruction::unary(op, 0),
            |op| Instruction::binary(op, 0, 0),
            |op| Instruction::ternary(op, 0, 0, 0),
        ];
        for (count, attempt) in attempts.iter().enumerate() {
            let outcome = std::panic::catch_unwind(|| attempt(op));
            assert_eq!(
                outcome.is_ok(),
                count == op.arity().count(),
                "{} constructed with {} operands",
                op,
                count
            );
        }
    }
}

// ============================================================================
// Roles
// ============================================================================

#[test]
fn test_exactly_two_conditional_branches() {
    let count = Opcode::ALL
        .iter()
        .filter(|op| op.is_conditional_branch())
        .count();
    assert_eq!(count, 2);
    assert!(Opcode::Jt.is_conditional_branch());
    assert!(Opcode::Jf.is_conditional_branch());
}

#[test]
fn test_exactly_one_unconditional_branch() {
    let branches: Vec<Opcode> = Opcode::ALL
        .iter()
        .copied()
        .filter(|op| op.is_unconditional_branch())
        .collect();
    assert_eq!(branches, vec![Opcode::Jump]);
}

#[test]
fn test_role_queries_are_exclusive() {
    for op in Opcode::ALL {
        let flags = [
            op.is_conditional_branch(),
            op.is_unconditional_branch(),
            op.is_branch_target(),
            op.produces_result(),
            op.is_mutator(),
            op.is_terminal(),
        ];
        let set = flags.iter().filter(|&&f| f).count();
        if op.role() == Role::Effect {
            assert_eq!(set, 0, "{}", op);
        } else {
            assert_eq!(set, 1, "{}", op);
        }
    }
}

#[test]
fn test_branch_targets() {
    let markers: Vec<Opcode> = Opcode::ALL
        .iter()
        .copied()
        .filter(|op| op.is_branch_target())
        .collect();
    assert_eq!(markers, vec![Opcode::Jtarg, Opcode::Jloop, Opcode::Jfor]);
}

// ============================================================================
// Operand kinds
// ============================================================================

#[test]
fn test_constant_operands_are_pool_indices() {
    assert_eq!(Opcode::Intk.operand_kinds(), &[OperandKind::IntConst]);
    assert_eq!(Opcode::Strk.operand_kinds(), &[OperandKind::StrConst]);
    assert_eq!(Opcode::Typek.operand_kinds(), &[OperandKind::TypeConst]);
    assert_eq!(Opcode::Boolk.operand_kinds(), &[OperandKind::Literal]);
}

#[test]
fn test_branch_operands_are_targets() {
    for op in [Opcode::Jump, Opcode::Jt, Opcode::Jf] {
        let slot = op.branch_target_slot().unwrap();
        assert_eq!(op.operand_kinds()[slot], OperandKind::Target);
    }
}
