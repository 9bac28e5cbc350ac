//! Main disassembler logic

use crate::decoder::decode;
use crate::error::Result;
use crate::formatter::{annotate, format};
use scrap_ir::Function;
use std::fmt::Write;

/// Column where per-instruction comments start
const COMMENT_COLUMN: usize = 24;

/// Disassemble a function into a listing the assembler accepts again.
///
/// Header counts and both pools are emitted as directives, operands stay
/// numeric, and each instruction carries its stream index in a comment.
pub fn disassemble(function: &Function) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "; SCRAP IR Disassembly")?;
    writeln!(
        output,
        "; {} instructions, {} int constants, {} str constants",
        function.len(),
        function.intk_table().len(),
        function.strk_table().len()
    )?;
    writeln!(output)?;

    writeln!(output, ".args {}", function.num_pos_args())?;
    writeln!(output, ".upvalues {}", function.num_upvalues())?;
    for (index, value) in function.intk_table().iter().enumerate() {
        writeln!(output, ".int {:<18}; #{}", value, index)?;
    }
    for (index, value) in function.strk_table().iter().enumerate() {
        let literal = format!("\"{}\"", value.escape_default());
        writeln!(output, ".str {:<18}; #{}", literal, index)?;
    }
    writeln!(output)?;

    for (index, instr) in function.text().iter().enumerate() {
        let text = format!("    {}", format(instr));
        write!(output, "{:<width$}; {:04}", text, index, width = COMMENT_COLUMN)?;
        if let Some(note) = annotate(instr, function) {
            write!(output, "  {}", note)?;
        }
        writeln!(output)?;
    }

    Ok(output)
}

/// Disassemble a raw encoded instruction stream.
///
/// Words that do not decode are reported inline as comments, so one bad word
/// does not hide the rest of the stream.
pub fn disassemble_words(words: &[u64]) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "; SCRAP IR Disassembly")?;
    writeln!(output, "; {} instructions", words.len())?;
    writeln!(output)?;

    for (index, &word) in words.iter().enumerate() {
        match decode(word) {
            Ok(instr) => {
                let text = format!("    {}", format(&instr));
                writeln!(
                    output,
                    "{:<width$}; {:04}  {:016X}",
                    text,
                    index,
                    word,
                    width = COMMENT_COLUMN
                )?;
            }
            Err(e) => {
                writeln!(output, "; ERROR: {:04}  {:016X}  {}", index, word, e)?;
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrap_ir::{encoding, FunctionBuilder, Instruction, Opcode};

    #[test]
    fn test_disassemble_simple() {
        let mut builder = FunctionBuilder::new();
        builder.push_int(5);
        builder.push(Instruction::unary(Opcode::Intk, 0));
        builder.push(Instruction::unary(Opcode::Ret, 0));
        let asm = disassemble(&builder.seal()).unwrap();

        assert!(asm.contains(".int 5"));
        assert!(asm.contains("    intk 0"));
        assert!(asm.contains("; 0000  5"));
        assert!(asm.contains("    ret 0"));
        assert!(asm.contains("2 instructions, 1 int constants, 0 str constants"));
    }

    #[test]
    fn test_disassemble_escapes_strings() {
        let mut builder = FunctionBuilder::new();
        builder.push_str("say \"hi\"");
        let asm = disassemble(&builder.seal()).unwrap();
        assert!(asm.contains(r#".str "say \"hi\"""#));
    }

    #[test]
    fn test_disassemble_words_reports_bad_words() {
        let words = [
            encoding::encode(&Instruction::nullary(Opcode::Nop)),
            0xFF,
            encoding::encode(&Instruction::nullary(Opcode::Retv)),
        ];
        let asm = disassemble_words(&words).unwrap();

        assert!(asm.contains("    nop"));
        assert!(asm.contains("; ERROR: 0001"));
        assert!(asm.contains("Unknown opcode: 0xFF"));
        assert!(asm.contains("    retv"));
    }
}
