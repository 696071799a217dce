//! Symbolic listing rendering.
//!
//! One line per transport, written destination first: `R01 := ALU:RESULT`,
//! `*(000543) := R01`, `PUSH #000042`, `JMP #000010`, `NOP`.

use harness_core::{Instr, Program, Unit};

fn imm_hex(value: i16) -> String {
    let wide = i32::from(value);
    if wide < 0 {
        format!("-{:06x}", wide.unsigned_abs())
    } else {
        format!("{wide:06x}")
    }
}

fn render_source(instr: &Instr) -> String {
    let si = instr.si_value();
    match instr.src_unit() {
        Unit::None => "#0".to_string(),
        Unit::StackPushPop => "POP".to_string(),
        Unit::StackIndex => format!("S{}", imm_hex(si)),
        Unit::Register => format!("R{:02x}", si as u16 & 0xF),
        Unit::AluLeft => "ALU:LEFT".to_string(),
        Unit::AluRight => "ALU:RIGHT".to_string(),
        Unit::AluOperator => "ALU:OPERATOR".to_string(),
        Unit::AluResult => "ALU:RESULT".to_string(),
        Unit::MemoryImmediate => format!("*({})", imm_hex(si)),
        Unit::MemoryOperand => format!("*({:08x})", instr.soperand_value().unwrap_or(0)),
        Unit::Pc => "PC".to_string(),
        Unit::AbsImmediate => format!("#{}", imm_hex(si)),
        Unit::AbsOperand => format!("#{:08x}", instr.soperand_value().unwrap_or(0)),
        Unit::RegisterPointer => format!("*(R{:02x})", si as u16 & 0xF),
    }
}

/// Renders one transport as a listing line.
#[must_use]
pub fn render_transport(instr: &Instr) -> String {
    let di = instr.di_value();
    let source = render_source(instr);
    match instr.dst_unit() {
        // Not writable; the transported value is discarded.
        Unit::None | Unit::AluResult | Unit::AbsImmediate | Unit::AbsOperand => "NOP".to_string(),
        Unit::StackPushPop => format!("PUSH {source}"),
        Unit::StackIndex => format!("S{} := {source}", imm_hex(di)),
        Unit::Register => format!("R{:02x} := {source}", di as u16 & 0xF),
        Unit::AluLeft => format!("ALU:LEFT := {source}"),
        Unit::AluRight => format!("ALU:RIGHT := {source}"),
        Unit::AluOperator => format!("ALU:OPERATOR := {source}"),
        Unit::MemoryImmediate => format!("*({}) := {source}", imm_hex(di)),
        Unit::MemoryOperand => format!(
            "*({:08x}) := {source}",
            instr.doperand_value().unwrap_or(0)
        ),
        Unit::Pc => format!("JMP {source}"),
        Unit::RegisterPointer => format!("*(R{:02x}) := {source}", di as u16 & 0xF),
    }
}

/// Renders a whole program, one line per transport with a trailing
/// newline.
#[must_use]
pub fn render_listing(program: &Program) -> String {
    let mut out = String::new();
    for instr in program {
        out.push_str(&render_transport(instr));
        out.push('\n');
    }
    out
}
