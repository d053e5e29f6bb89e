//! Parser for IPPcode24 source words → instruction records.
//!
//! The operand grammar is driven by the per-opcode signature table in
//! `ipp-common`: each position expects a variable, a symbol (variable or
//! typed literal), a label, or a type name.

use crate::error::ParseError;
use crate::lexer::split_line;
use ipp_common::{Arg, DataType, FramePrefix, Instruction, Opcode, Operand};

/// Characters allowed in identifiers (variable local names and labels)
/// besides ASCII alphanumerics.
const IDENT_SPECIALS: &str = "_-$&%*!?";

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || IDENT_SPECIALS.contains(c));
    first_ok && s.chars().all(|c| c.is_ascii_alphanumeric() || IDENT_SPECIALS.contains(c))
}

/// Parse the full source text into instruction records with sequential
/// order values starting at 1.
pub(crate) fn parse_source(text: &str) -> Result<Vec<Instruction>, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, split_line(line)))
        .filter(|(_, words)| !words.is_empty());

    // The first significant line must be the header.
    match lines.next() {
        Some((_, words)) if words.len() == 1 && words[0].eq_ignore_ascii_case(".IPPcode24") => {}
        _ => return Err(ParseError::MissingHeader),
    }

    let mut instructions = Vec::new();
    for (line_num, words) in lines {
        let order = instructions.len() as u32 + 1;
        instructions.push(parse_instruction(&words, line_num, order)?);
    }
    Ok(instructions)
}

fn parse_instruction(
    words: &[&str],
    line: usize,
    order: u32,
) -> Result<Instruction, ParseError> {
    let mnemonic = words[0].to_uppercase();
    let opcode = Opcode::from_mnemonic(&mnemonic).ok_or_else(|| ParseError::UnknownOpcode {
        line,
        token: words[0].to_string(),
    })?;

    let signature = opcode.signature();
    let operands = &words[1..];
    if operands.len() != signature.len() {
        return Err(ParseError::WrongArity {
            line,
            opcode: opcode.mnemonic(),
            expected: signature.len(),
            got: operands.len(),
        });
    }

    let args = signature
        .iter()
        .zip(operands)
        .map(|(shape, word)| parse_operand(*shape, word, opcode, line))
        .collect::<Result<Vec<Arg>, ParseError>>()?;

    Ok(Instruction::new(opcode, order, args))
}

fn parse_operand(
    shape: Operand,
    word: &str,
    opcode: Opcode,
    line: usize,
) -> Result<Arg, ParseError> {
    let bad = || ParseError::BadOperand {
        line,
        opcode: opcode.mnemonic(),
        token: word.to_string(),
    };
    match shape {
        Operand::Var => parse_var(word).ok_or_else(bad),
        Operand::Symb => parse_symb(word, line, opcode),
        Operand::Label => {
            if is_ident(word) {
                Ok(Arg::Label(word.to_string()))
            } else {
                Err(bad())
            }
        }
        Operand::Type => DataType::from_str(word).map(Arg::Type).ok_or_else(bad),
    }
}

fn parse_var(word: &str) -> Option<Arg> {
    let (prefix, name) = word.split_once('@')?;
    let frame = FramePrefix::from_str(prefix)?;
    if is_ident(name) {
        Some(Arg::Var {
            frame,
            name: name.to_string(),
        })
    } else {
        None
    }
}

fn parse_symb(word: &str, line: usize, opcode: Opcode) -> Result<Arg, ParseError> {
    let bad = || ParseError::BadOperand {
        line,
        opcode: opcode.mnemonic(),
        token: word.to_string(),
    };
    if let Some(var) = parse_var(word) {
        return Ok(var);
    }
    let (kind, value) = word.split_once('@').ok_or_else(bad)?;
    match kind {
        "int" => parse_int_literal(value)
            .map(Arg::Int)
            .ok_or(ParseError::BadIntLiteral {
                line,
                token: word.to_string(),
            }),
        "bool" => match value {
            "true" => Ok(Arg::Bool(true)),
            "false" => Ok(Arg::Bool(false)),
            _ => Err(bad()),
        },
        // Escape sequences are stored raw; WRITE decodes them at emission.
        "string" => Ok(Arg::Str(value.to_string())),
        "nil" => {
            if value == "nil" {
                Ok(Arg::Nil)
            } else {
                Err(bad())
            }
        }
        _ => Err(bad()),
    }
}

/// Integer literal: optional sign, then decimal, `0x`/`0X` hex, or
/// `0o`/`0O` octal digits.
fn parse_int_literal(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8).ok()?
    } else {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i64>().ok()?
    };
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}
