//! Program Loader.
//!
//! Turns APEX assembly into the instruction list handed to
//! [`Simulator::initialize`](crate::sim::Simulator::initialize). It performs:
//! 1. **Text parsing:** One instruction per line; blank lines and `;` comments are skipped.
//! 2. **File loading:** Reads a program file from disk and parses it.
//!
//! Errors carry the 1-based line number of the first offending line.

use std::fs;
use std::path::Path;

use crate::common::error::LoadError;
use crate::isa::decode::decode_line;
use crate::isa::instruction::Instruction;

/// Parses assembly text into a program.
///
/// # Arguments
///
/// * `text` - Program source, one instruction per line.
///
/// # Returns
///
/// The instructions in program order, or the first line that fails to parse.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, LoadError> {
    let mut program = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(inst) = decode_line(line, idx + 1)? {
            program.push(inst);
        }
    }
    tracing::debug!(instructions = program.len(), "program parsed");
    Ok(program)
}

/// Reads a program file from disk and parses it.
///
/// # Arguments
///
/// * `path` - Path to the assembly file.
pub fn load_program(path: &Path) -> Result<Vec<Instruction>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_program(&text)
}
