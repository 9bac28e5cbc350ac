//! Instruction formatting to assembly text

use scrap_ir::{Function, Instruction, OperandKind};

/// Format instruction as assembly text, the same text as its `Display`
pub fn format(instr: &Instruction) -> String {
    instr.to_string()
}

/// Describe the constants and targets an instruction refers to, resolved
/// against `function`. Returns `None` when there is nothing to say.
pub fn annotate(instr: &Instruction, function: &Function) -> Option<String> {
    let notes: Vec<String> = instr
        .typed_operands()
        .filter_map(|(kind, operand)| {
            let index = operand as usize;
            match kind {
                OperandKind::IntConst => Some(match function.intk_table().get(index) {
                    Some(value) => value.to_string(),
                    None => format!("int #{} out of range", index),
                }),
                OperandKind::StrConst => Some(match function.strk_table().get(index) {
                    Some(value) => format!("\"{}\"", value.escape_default()),
                    None => format!("str #{} out of range", index),
                }),
                OperandKind::Target => Some(match function.instruction(index) {
                    Some(target) => format!("-> {}", target.opcode()),
                    None => format!("-> #{} out of range", index),
                }),
                OperandKind::Value | OperandKind::TypeConst | OperandKind::Literal => None,
            }
        })
        .collect();

    if notes.is_empty() {
        None
    } else {
        Some(notes.join(", "))
    }
}
