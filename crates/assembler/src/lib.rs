//! Program-building and memory-image tooling for the transport-core
//! harness.
//!
//! The library side builds transport programs against the encoder in
//! `harness-core` and renders them two ways: as a textual memory image the
//! instruction store can load, and as a symbolic listing for humans. The
//! `tta-asm` binary wires those together.

/// The built-in demonstration boot program.
pub mod boot;
/// Textual memory-image rendering.
pub mod image;
/// Symbolic listing rendering.
pub mod listing;

#[cfg(test)]
use tempfile as _;
