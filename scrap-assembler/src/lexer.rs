//! # Lexer for SCRAP IR Assembly

use logos::Logos;

/// Tokens of a single listing line
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"[;#][^\n]*")]
pub enum Token {
    /// Identifier (mnemonics, label definitions)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Label reference used as a branch operand
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    LabelRef(String),

    /// Decimal number
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Number(i64),

    /// Hexadecimal number
    #[regex(r"0x[0-9a-fA-F]+", |lex| i64::from_str_radix(&lex.slice()[2..], 16).ok())]
    Hex(i64),

    /// Quoted string literal, escapes already resolved
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let slice = lex.slice();
        unescape(&slice[1..slice.len() - 1])
    })]
    Str(String),

    /// Directive (.args, .upvalues, .int, .str)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    /// Comma
    #[token(",")]
    Comma,

    /// Colon (for labels)
    #[token(":")]
    Colon,
}

/// Resolve backslash escapes in a string literal body.
///
/// Accepts `\n`, `\t`, `\r`, `\0`, `\\`, `\"`, `\'` and `\u{XXXX}`, which
/// covers everything `str::escape_default` produces.
pub fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let resolved = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut hex = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        d => hex.push(d),
                    }
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            _ => return None,
        };
        out.push(resolved);
    }
    Some(out)
}
