//! Assembly parser
//!
//! Turns one line of a listing into a [`Line`]: an optional label
//! definition followed by at most one directive or instruction.

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use logos::Logos;
use scrap_ir::Opcode;
use std::str::FromStr;

/// Operand as written in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandExpr {
    /// Numeric operand, range-checked when the instruction is built
    Number(i64),
    /// `@label` branch target, resolved after the whole listing is read
    Label(String),
}

/// Function-level declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `.args N`
    Args(u16),
    /// `.upvalues N`
    Upvalues(u16),
    /// `.int N` appends to the integer pool
    Int(i32),
    /// `.str "text"` appends to the string pool
    Str(String),
}

/// Instruction with unresolved operands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInstruction {
    pub opcode: Opcode,
    pub operands: Vec<OperandExpr>,
}

/// Content of a line after its optional label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Directive(Directive),
    Instruction(ParsedInstruction),
}

/// One parsed source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: Option<String>,
    pub statement: Option<Statement>,
}

/// Token with its 1-based column
type Spanned = (Token, usize);

fn tokenize(text: &str, line: usize) -> Result<Vec<Spanned>> {
    let mut lexer = Token::lexer(text);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        let column = lexer.span().start + 1;
        match token {
            Ok(token) => tokens.push((token, column)),
            Err(()) => {
                return Err(AssemblerError::SyntaxError {
                    line,
                    column,
                    message: format!("Unexpected input '{}'", lexer.slice()),
                })
            }
        }
    }
    Ok(tokens)
}

/// Parse one line of a listing. `line` is only used for error reporting.
pub fn parse_line(text: &str, line: usize) -> Result<Line> {
    let tokens = tokenize(text, line)?;
    let mut rest = tokens.as_slice();

    let label = match rest {
        [(Token::Identifier(name), _), (Token::Colon, _), tail @ ..] => {
            rest = tail;
            Some(name.clone())
        }
        _ => None,
    };

    let statement = match rest {
        [] => None,
        [(Token::Directive(name), column), args @ ..] => Some(Statement::Directive(
            parse_directive(name, args, line, *column)?,
        )),
        [(Token::Identifier(mnemonic), _), operands @ ..] => {
            let opcode = Opcode::from_str(mnemonic).map_err(|_| {
                AssemblerError::UnknownInstruction {
                    line,
                    mnemonic: mnemonic.clone(),
                }
            })?;
            Some(Statement::Instruction(ParsedInstruction {
                opcode,
                operands: parse_operands(operands, line)?,
            }))
        }
        [(token, column), ..] => {
            return Err(AssemblerError::SyntaxError {
                line,
                column: *column,
                message: format!("Expected instruction or directive, found {:?}", token),
            })
        }
    };

    Ok(Line { label, statement })
}

/// Parse a standalone instruction such as `jt 3, @done`
pub fn parse_instruction(text: &str) -> Result<ParsedInstruction> {
    match parse_line(text, 1)? {
        Line {
            label: None,
            statement: Some(Statement::Instruction(instr)),
        } => Ok(instr),
        _ => Err(AssemblerError::SyntaxError {
            line: 1,
            column: 1,
            message: "Expected a single instruction".to_string(),
        }),
    }
}

/// Comma-separated operand list
fn parse_operands(tokens: &[Spanned], line: usize) -> Result<Vec<OperandExpr>> {
    let mut operands = Vec::new();
    let mut expect_operand = true;

    for (token, column) in tokens {
        match (token, expect_operand) {
            (Token::Number(n) | Token::Hex(n), true) => operands.push(OperandExpr::Number(*n)),
            (Token::LabelRef(name), true) => operands.push(OperandExpr::Label(name.clone())),
            (Token::Comma, false) => {}
            _ => {
                return Err(AssemblerError::SyntaxError {
                    line,
                    column: *column,
                    message: if expect_operand {
                        format!("Expected operand, found {:?}", token)
                    } else {
                        format!("Expected ',', found {:?}", token)
                    },
                })
            }
        }
        expect_operand = !expect_operand;
    }

    if expect_operand && !operands.is_empty() {
        let column = tokens.last().map_or(1, |(_, c)| *c);
        return Err(AssemblerError::SyntaxError {
            line,
            column,
            message: "Trailing ','".to_string(),
        });
    }
    Ok(operands)
}

fn parse_directive(name: &str, args: &[Spanned], line: usize, column: usize) -> Result<Directive> {
    let invalid = |message: String| AssemblerError::InvalidDirective { line, message };

    match (name, args) {
        ("args" | "upvalues", [(Token::Number(n) | Token::Hex(n), _)]) => {
            let count = u16::try_from(*n)
                .map_err(|_| invalid(format!(".{} count out of range: {}", name, n)))?;
            Ok(if name == "args" {
                Directive::Args(count)
            } else {
                Directive::Upvalues(count)
            })
        }
        ("int", [(Token::Number(n) | Token::Hex(n), _)]) => {
            let value = i32::try_from(*n)
                .map_err(|_| invalid(format!("integer constant out of range: {}", n)))?;
            Ok(Directive::Int(value))
        }
        ("str", [(Token::Str(s), _)]) => Ok(Directive::Str(s.clone())),
        ("args" | "upvalues" | "int" | "str", _) => Err(invalid(format!(
            ".{} expects a single {} argument (column {})",
            name,
            if name == "str" { "string" } else { "numeric" },
            column
        ))),
        _ => Err(invalid(format!("unknown directive .{}", name))),
    }
}
