//! The built-in demonstration boot program.

use harness_core::{AluOp, Instr, Program, Unit};

/// Builds the demonstration boot program.
///
/// It feeds `0x666` and `0x123` through the ALU adder, parks the sum in a
/// register, stores it at address `0x543` through an operand-addressed
/// write, and finally copies that word to address `0x666`.
#[must_use]
pub fn boot_program() -> Program {
    vec![
        Instr::new()
            .src(Unit::AbsImmediate)
            .si(0x666)
            .dst(Unit::Register)
            .di(0),
        Instr::new().src(Unit::Register).si(0).dst(Unit::AluLeft),
        Instr::new()
            .src(Unit::AbsImmediate)
            .si(0x123)
            .dst(Unit::AluRight),
        Instr::new()
            .src(Unit::AbsImmediate)
            .si(AluOp::Add.as_imm())
            .dst(Unit::AluOperator),
        Instr::new().src(Unit::AluResult).dst(Unit::Register).di(1),
        Instr::new()
            .src(Unit::Register)
            .si(1)
            .dst(Unit::MemoryOperand)
            .doperand(0x543),
        Instr::new()
            .src(Unit::MemoryImmediate)
            .si(0x543)
            .dst(Unit::MemoryImmediate)
            .di(0x666),
    ]
    .into()
}
