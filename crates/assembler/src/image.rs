//! Textual memory-image rendering.
//!
//! An image is whitespace-separated eight-digit lowercase hex words, with
//! four transports per line; each transport contributes its header word
//! followed by any trailing operand words. The instruction store's hex
//! loader accepts the result verbatim.

use harness_core::{EncodeError, Instr, Program};

/// Transports per image line.
pub const TRANSPORTS_PER_LINE: usize = 4;

fn render_transport(instr: &Instr) -> Result<String, EncodeError> {
    let words = instr.assemble()?;
    Ok(words
        .iter()
        .map(|word| format!("{word:08x}"))
        .collect::<Vec<_>>()
        .join(" "))
}

/// Renders a whole program as a memory image, one trailing newline per
/// line.
///
/// # Errors
///
/// The first [`EncodeError`] raised by any transport.
pub fn render_image(program: &Program) -> Result<String, EncodeError> {
    let rendered: Vec<String> = program
        .iter()
        .map(render_transport)
        .collect::<Result<_, _>>()?;

    let mut out = String::new();
    for line in rendered.chunks(TRANSPORTS_PER_LINE) {
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    Ok(out)
}
