//! Assembly files and grammar errors.

use std::io::Write;

use apexsim_core::common::error::LoadError;
use apexsim_core::common::reg::RegisterName::{General as R, Link};
use apexsim_core::isa::instruction::Instruction;
use apexsim_core::isa::opcode::Opcode;
use apexsim_core::sim::loader::{load_program, parse_program};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════

#[test]
fn test_parses_a_complete_program() {
    let program = parse_program(
        "; compute and store
MOVC R1, #6
MOVC R2,#7
MUL R3, R1, R2
EX-OR R4, R3, R1
STORE R3, R0, #8   ; mem[8]
LOAD R5, R0, #8
BAL R6, #12
JUMP X, #0
HALT
",
    )
    .unwrap();

    assert_eq!(
        program,
        vec![
            Instruction::movc(R(1), 6),
            Instruction::movc(R(2), 7),
            Instruction::register(Opcode::Mul, R(3), R(1), R(2)),
            Instruction::register(Opcode::Xor, R(4), R(3), R(1)),
            Instruction::store(R(3), R(0), 8),
            Instruction::load(R(5), R(0), 8),
            Instruction::bal(R(6), 12),
            Instruction::jump(Link, 0),
            Instruction::halt(),
        ]
    );
}

#[test]
fn test_empty_text_is_an_empty_program() {
    assert!(parse_program("\n ; nothing here\n\n").unwrap().is_empty());
}

#[test]
fn test_errors_name_the_line() {
    let err = parse_program("MOVC R1, #1\nMOVC R2, #2\nADD R3, R1, Z9\n").unwrap_err();
    assert!(matches!(err, LoadError::BadRegister { line: 3, ref token } if token == "Z9"));

    let err = parse_program("\n\nMOVC R2, #x\n").unwrap_err();
    assert!(matches!(err, LoadError::BadLiteral { line: 3, .. }));
}

// ══════════════════════════════════════════════════════════
// Files
// ══════════════════════════════════════════════════════════

#[test]
fn test_load_program_reads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "MOVC R0, #5").unwrap();
    writeln!(file, "HALT").unwrap();

    let program = load_program(file.path()).unwrap();
    assert_eq!(program, vec![Instruction::movc(R(0), 5), Instruction::halt()]);
}

#[test]
fn test_load_program_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.asm");
    match load_program(&path) {
        Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
