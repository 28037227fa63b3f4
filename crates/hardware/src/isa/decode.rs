//! Assembly line decoder.
//!
//! This module turns one line of APEX assembly text into an [`Instruction`]. It handles:
//! 1. **Tokenizing:** Mnemonic, comma-separated operands, `;` comments and blank lines.
//! 2. **Operand Grammar:** `R<n>` / `X` registers and `#<integer>` literals per opcode.
//! 3. **Diagnostics:** Line-numbered [`LoadError`]s for anything that matches no grammar.

use crate::common::error::LoadError;
use crate::common::reg::RegisterName;
use crate::isa::instruction::Instruction;
use crate::isa::opcode::Opcode;

/// Decodes one assembly line.
///
/// # Arguments
///
/// * `text` - The raw line.
/// * `line` - 1-based line number used in diagnostics.
///
/// # Returns
///
/// `Ok(None)` for a blank or comment-only line, the decoded instruction otherwise.
pub fn decode_line(text: &str, line: usize) -> Result<Option<Instruction>, LoadError> {
    let code = text.split(';').next().unwrap_or_default().trim();
    if code.is_empty() {
        return Ok(None);
    }

    let unrecognized = || LoadError::UnrecognizedInstruction {
        line,
        text: code.to_owned(),
    };

    let (mnemonic, rest) = code
        .split_once(char::is_whitespace)
        .map_or((code, ""), |(m, r)| (m, r.trim()));
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(unrecognized)?;

    let operands: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };

    let reg = |token: &str| {
        token
            .parse::<RegisterName>()
            .map_err(|_| LoadError::BadRegister {
                line,
                token: token.to_owned(),
            })
    };
    let lit = |token: &str| parse_literal(token, line);

    let inst = match (opcode, operands.as_slice()) {
        (
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::And | Opcode::Or | Opcode::Xor,
            &[rd, rs1, rs2],
        ) => Instruction::register(opcode, reg(rd)?, reg(rs1)?, reg(rs2)?),
        (Opcode::Movc, &[rd, l]) => Instruction::movc(reg(rd)?, lit(l)?),
        (Opcode::Load, &[rd, rs1, l]) => Instruction::load(reg(rd)?, reg(rs1)?, lit(l)?),
        (Opcode::Store, &[rs1, rs2, l]) => Instruction::store(reg(rs1)?, reg(rs2)?, lit(l)?),
        (Opcode::Bz, &[l]) => Instruction::bz(lit(l)?),
        (Opcode::Bnz, &[l]) => Instruction::bnz(lit(l)?),
        (Opcode::Jump, &[rs1, l]) => Instruction::jump(reg(rs1)?, lit(l)?),
        (Opcode::Bal, &[rs1, l]) => Instruction::bal(reg(rs1)?, lit(l)?),
        (Opcode::Halt, &[]) => Instruction::halt(),
        _ => return Err(unrecognized()),
    };
    Ok(Some(inst))
}

/// Parses `#<integer>`, allowing whitespace after `#` and an optional sign.
fn parse_literal(token: &str, line: usize) -> Result<i32, LoadError> {
    token
        .strip_prefix('#')
        .map(str::trim_start)
        .and_then(|digits| digits.parse::<i32>().ok())
        .ok_or_else(|| LoadError::BadLiteral {
            line,
            token: token.to_owned(),
        })
}
