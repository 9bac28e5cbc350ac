//! Main assembler logic

use crate::error::{AssemblerError, Result};
use crate::parser::{parse_line, Directive, OperandExpr, ParsedInstruction, Statement};
use scrap_ir::{Function, FunctionBuilder, Instruction, Operand, OperandKind, MAX_ENTRIES};
use std::collections::HashMap;

/// Branch operand waiting for its label to be defined
struct Fixup {
    at: Operand,
    slot: usize,
    label: String,
    line: usize,
}

/// Assemble a listing into a sealed function
pub fn assemble(source: &str) -> Result<Function> {
    let mut builder = FunctionBuilder::new();
    let mut labels: HashMap<String, Operand> = HashMap::new();
    let mut fixups = Vec::new();

    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        let result = assemble_line(&mut builder, &mut labels, &mut fixups, text, line);
        if let Err(e) = result {
            tracing::warn!(line, error = %e, "assembly failed");
            return Err(e);
        }
    }

    for fixup in fixups {
        let target = *labels
            .get(&fixup.label)
            .ok_or_else(|| AssemblerError::UndefinedLabel {
                line: fixup.line,
                label: fixup.label.clone(),
            })?;
        builder
            .patch_operand(fixup.at, fixup.slot, target)
            .map_err(|source| AssemblerError::Ir {
                line: fixup.line,
                source,
            })?;
    }

    tracing::debug!(
        instructions = builder.len(),
        labels = labels.len(),
        "assembled listing"
    );
    Ok(builder.seal())
}

fn assemble_line(
    builder: &mut FunctionBuilder,
    labels: &mut HashMap<String, Operand>,
    fixups: &mut Vec<Fixup>,
    text: &str,
    line: usize,
) -> Result<()> {
    let parsed = parse_line(text, line)?;

    if let Some(label) = parsed.label {
        // A label names the next instruction; it may sit on its own line
        let index = stream_slot(builder, line)?;
        if labels.contains_key(&label) {
            return Err(AssemblerError::DuplicateLabel { line, label });
        }
        labels.insert(label, index);
    }

    match parsed.statement {
        None => {}
        Some(Statement::Directive(directive)) => apply_directive(builder, directive, line)?,
        Some(Statement::Instruction(instr)) => {
            let at = stream_slot(builder, line)?;
            let instr = build_instruction(instr, at, fixups, line)?;
            builder.push(instr);
        }
    }
    Ok(())
}

fn apply_directive(builder: &mut FunctionBuilder, directive: Directive, line: usize) -> Result<()> {
    match directive {
        Directive::Args(count) => {
            builder.set_num_pos_args(count);
        }
        Directive::Upvalues(count) => {
            builder.set_num_upvalues(count);
        }
        Directive::Int(value) => {
            if builder.peek().intk_table().len() >= MAX_ENTRIES {
                return Err(AssemblerError::CapacityExceeded {
                    line,
                    what: "integer pool",
                });
            }
            builder.push_int(value);
        }
        Directive::Str(value) => {
            if builder.peek().strk_table().len() >= MAX_ENTRIES {
                return Err(AssemblerError::CapacityExceeded {
                    line,
                    what: "string pool",
                });
            }
            builder.push_str(value);
        }
    }
    Ok(())
}

/// Index the next instruction would get, if the stream has room for it
fn stream_slot(builder: &FunctionBuilder, line: usize) -> Result<Operand> {
    Operand::try_from(builder.next_index()).map_err(|_| AssemblerError::CapacityExceeded {
        line,
        what: "instruction stream",
    })
}

fn build_instruction(
    parsed: ParsedInstruction,
    at: Operand,
    fixups: &mut Vec<Fixup>,
    line: usize,
) -> Result<Instruction> {
    let opcode = parsed.opcode;
    let kinds = opcode.operand_kinds();
    let mut operands = Vec::with_capacity(parsed.operands.len());

    for (slot, expr) in parsed.operands.into_iter().enumerate() {
        match expr {
            OperandExpr::Number(n) => {
                let value = Operand::try_from(n).map_err(|_| AssemblerError::InvalidOperand {
                    line,
                    message: format!("{} operand {} out of range: {}", opcode, slot, n),
                })?;
                operands.push(value);
            }
            OperandExpr::Label(label) => {
                if kinds.get(slot) != Some(&OperandKind::Target) {
                    return Err(AssemblerError::InvalidOperand {
                        line,
                        message: format!(
                            "{} operand {} is not a branch target: @{}",
                            opcode, slot, label
                        ),
                    });
                }
                fixups.push(Fixup {
                    at,
                    slot,
                    label,
                    line,
                });
                operands.push(0);
            }
        }
    }

    Instruction::try_new(opcode, &operands).map_err(|source| AssemblerError::Ir { line, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrap_ir::Opcode;

    #[test]
    fn test_assemble_simple() {
        let source = r#"
            ; Simple test
            nop
            retv
        "#;

        let function = assemble(source).unwrap();
        assert_eq!(function.len(), 2);
    }

    #[test]
    fn test_forward_and_backward_labels() {
        let source = r#"
            .int 0
            top: jloop
                intk 0
                jt 1, @done
                jump @top
            done: jtarg
                retv
        "#;

        let function = assemble(source).unwrap();
        assert_eq!(function.text()[2], Instruction::binary(Opcode::Jt, 1, 4));
        assert_eq!(function.text()[3], Instruction::unary(Opcode::Jump, 0));
    }

    #[test]
    fn test_label_on_its_own_line() {
        let source = "jump @end\nend:\njtarg\nretv";
        let function = assemble(source).unwrap();
        assert_eq!(function.text()[0].branch_target(), Some(1));
    }

    #[test]
    fn test_label_outside_target_slot() {
        let source = "x: jtarg\nadd @x, 1";
        assert!(matches!(
            assemble(source),
            Err(AssemblerError::InvalidOperand { line: 2, .. })
        ));
    }

    #[test]
    fn test_operand_out_of_range() {
        assert!(matches!(
            assemble("mov 65536"),
            Err(AssemblerError::InvalidOperand { line: 1, .. })
        ));
        assert!(matches!(
            assemble("mov -1"),
            Err(AssemblerError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn test_arity_checked_at_line() {
        let err = assemble("nop\nadd 0").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(matches!(err, AssemblerError::Ir { .. }));
    }
}
