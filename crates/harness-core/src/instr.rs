//! Staged instruction builder and program encoding.
//!
//! An [`Instr`] is built by chaining field setters and becomes binary words
//! only through [`Instr::assemble`], which validates immediate ranges and
//! operand completeness in one place. A transport that violates the
//! encoding contract never produces words.

use thiserror::Error;

use crate::encoding::{encode_header, imm_in_range, Unit, IMM_MAX, IMM_MIN};

/// Header field an encoding error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportEnd {
    /// The source side of the transport.
    Source,
    /// The destination side of the transport.
    Destination,
}

impl std::fmt::Display for TransportEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Encoding contract violation raised by [`Instr::assemble`].
///
/// These represent programmer error in describing a test program; the
/// encoding operation aborts and there is no recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EncodeError {
    /// Immediate value does not fit the signed 12-bit field.
    #[error("{end} immediate {value} outside [{IMM_MIN}, {IMM_MAX}]")]
    ImmediateOutOfRange {
        /// Which immediate field overflowed.
        end: TransportEnd,
        /// The rejected value.
        value: i16,
    },
    /// Unit requires a trailing operand word that was never supplied.
    #[error("{end} unit {unit:?} requires an operand word")]
    MissingOperand {
        /// Which side of the transport is incomplete.
        end: TransportEnd,
        /// The operand-addressed unit.
        unit: Unit,
    },
    /// Operand word supplied for a unit that does not take one.
    #[error("{end} unit {unit:?} does not take an operand word")]
    UnexpectedOperand {
        /// Which side of the transport carries the stray operand.
        end: TransportEnd,
        /// The self-describing unit.
        unit: Unit,
    },
}

/// One transport instruction under construction.
///
/// Setters record fields without validating; [`Instr::assemble`] is the
/// single validation and finalization point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Instr {
    src_unit: Unit,
    si: i16,
    dst_unit: Unit,
    di: i16,
    soperand: Option<u32>,
    doperand: Option<u32>,
}

impl Instr {
    /// Creates an empty transport (`None` to `None`, a no-op).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source unit selector.
    #[must_use]
    pub const fn src(mut self, unit: Unit) -> Self {
        self.src_unit = unit;
        self
    }

    /// Sets the destination unit selector.
    #[must_use]
    pub const fn dst(mut self, unit: Unit) -> Self {
        self.dst_unit = unit;
        self
    }

    /// Sets the source immediate/displacement.
    #[must_use]
    pub const fn si(mut self, value: i16) -> Self {
        self.si = value;
        self
    }

    /// Sets the destination immediate/displacement.
    #[must_use]
    pub const fn di(mut self, value: i16) -> Self {
        self.di = value;
        self
    }

    /// Sets the trailing source operand word.
    #[must_use]
    pub const fn soperand(mut self, operand: u32) -> Self {
        self.soperand = Some(operand);
        self
    }

    /// Sets the trailing destination operand word.
    #[must_use]
    pub const fn doperand(mut self, operand: u32) -> Self {
        self.doperand = Some(operand);
        self
    }

    /// Source unit selector currently recorded.
    #[must_use]
    pub const fn src_unit(&self) -> Unit {
        self.src_unit
    }

    /// Destination unit selector currently recorded.
    #[must_use]
    pub const fn dst_unit(&self) -> Unit {
        self.dst_unit
    }

    /// Source immediate currently recorded.
    #[must_use]
    pub const fn si_value(&self) -> i16 {
        self.si
    }

    /// Destination immediate currently recorded.
    #[must_use]
    pub const fn di_value(&self) -> i16 {
        self.di
    }

    /// Source operand word, when one has been supplied.
    #[must_use]
    pub const fn soperand_value(&self) -> Option<u32> {
        self.soperand
    }

    /// Destination operand word, when one has been supplied.
    #[must_use]
    pub const fn doperand_value(&self) -> Option<u32> {
        self.doperand
    }

    /// Returns `true` when the source unit takes a trailing operand word.
    #[must_use]
    pub const fn uses_soperand(&self) -> bool {
        self.src_unit.needs_operand()
    }

    /// Returns `true` when the destination unit takes a trailing operand
    /// word.
    #[must_use]
    pub const fn uses_doperand(&self) -> bool {
        self.dst_unit.needs_operand()
    }

    /// Finalizes the transport into binary words: the header, then the
    /// source operand word if the source unit takes one, then the
    /// destination operand word if the destination unit takes one.
    ///
    /// # Errors
    ///
    /// [`EncodeError::ImmediateOutOfRange`] when an immediate exceeds the
    /// signed 12-bit field; [`EncodeError::MissingOperand`] /
    /// [`EncodeError::UnexpectedOperand`] when operand presence does not
    /// equal the unit's operand requirement.
    pub fn assemble(&self) -> Result<Vec<u32>, EncodeError> {
        if !imm_in_range(self.si) {
            return Err(EncodeError::ImmediateOutOfRange {
                end: TransportEnd::Source,
                value: self.si,
            });
        }
        if !imm_in_range(self.di) {
            return Err(EncodeError::ImmediateOutOfRange {
                end: TransportEnd::Destination,
                value: self.di,
            });
        }

        check_operand(
            TransportEnd::Source,
            self.src_unit,
            self.soperand.is_some(),
        )?;
        check_operand(
            TransportEnd::Destination,
            self.dst_unit,
            self.doperand.is_some(),
        )?;

        let mut words = vec![encode_header(self.src_unit, self.si, self.dst_unit, self.di)];
        if let Some(operand) = self.soperand {
            words.push(operand);
        }
        if let Some(operand) = self.doperand {
            words.push(operand);
        }

        Ok(words)
    }

    /// Number of words [`Instr::assemble`] will produce for the recorded
    /// units, ignoring operand completeness.
    #[must_use]
    pub const fn word_count(&self) -> usize {
        1 + self.uses_soperand() as usize + self.uses_doperand() as usize
    }
}

const fn check_operand(end: TransportEnd, unit: Unit, supplied: bool) -> Result<(), EncodeError> {
    match (unit.needs_operand(), supplied) {
        (true, false) => Err(EncodeError::MissingOperand { end, unit }),
        (false, true) => Err(EncodeError::UnexpectedOperand { end, unit }),
        _ => Ok(()),
    }
}

/// An ordered sequence of transports encoded in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instrs: Vec<Instr>,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub const fn new() -> Self {
        Self { instrs: Vec::new() }
    }

    /// Appends a transport.
    pub fn push(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    /// Number of transports in the program.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Returns `true` when the program holds no transports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Iterates over the transports in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instr> {
        self.instrs.iter()
    }

    /// Encodes every transport and concatenates the words in sequence
    /// order. Placement is the caller's concern; the first word belongs at
    /// whatever load address the caller chooses.
    ///
    /// # Errors
    ///
    /// The first [`EncodeError`] raised by any transport.
    pub fn encode(&self) -> Result<Vec<u32>, EncodeError> {
        let mut words = Vec::new();
        for instr in &self.instrs {
            words.extend(instr.assemble()?);
        }
        Ok(words)
    }
}

impl From<Vec<Instr>> for Program {
    fn from(instrs: Vec<Instr>) -> Self {
        Self { instrs }
    }
}

impl FromIterator<Instr> for Program {
    fn from_iter<I: IntoIterator<Item = Instr>>(iter: I) -> Self {
        Self {
            instrs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instr;
    type IntoIter = std::slice::Iter<'a, Instr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
