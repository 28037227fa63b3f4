//! Sequential reference interpreter for branch-free programs.

use apexsim_core::common::RegisterName;
use apexsim_core::isa::{Instruction, Opcode};

/// Architectural state after running a program one instruction at a time.
#[derive(Debug, Default)]
pub struct Reference {
    pub regs: Vec<i32>,
    /// `(address, value)` for every store, in program order.
    pub stores: Vec<(i32, i32)>,
}

/// Runs `program` until HALT or the end, without branches.
pub fn interpret(program: &[Instruction], arch_registers: usize) -> Reference {
    let mut regs = vec![0i32; arch_registers + 1];
    let mut memory = std::collections::HashMap::<i32, i32>::new();
    let mut stores = Vec::new();
    let index = |name: Option<RegisterName>| match name {
        Some(RegisterName::General(n)) => n,
        Some(RegisterName::Link) => arch_registers,
        None => panic!("missing operand"),
    };

    for inst in program {
        let a = |regs: &[i32]| regs[index(inst.rs1)];
        let b = |regs: &[i32]| regs[index(inst.rs2)];
        let value = match inst.opcode {
            Opcode::Add => a(&regs).wrapping_add(b(&regs)),
            Opcode::Sub => a(&regs).wrapping_sub(b(&regs)),
            Opcode::Mul => a(&regs).wrapping_mul(b(&regs)),
            Opcode::And => a(&regs) & b(&regs),
            Opcode::Or => a(&regs) | b(&regs),
            Opcode::Xor => a(&regs) ^ b(&regs),
            Opcode::Movc => inst.literal,
            Opcode::Load => *memory.get(&a(&regs).wrapping_add(inst.literal)).unwrap_or(&0),
            Opcode::Store => {
                let addr = b(&regs).wrapping_add(inst.literal);
                let _ = memory.insert(addr, a(&regs));
                stores.push((addr, a(&regs)));
                continue;
            }
            Opcode::Halt => break,
            op => panic!("{op} is not supported by the reference model"),
        };
        regs[index(inst.rd)] = value;
    }
    Reference { regs, stores }
}
