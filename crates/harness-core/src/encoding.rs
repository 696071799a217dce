//! Instruction-word bit layout and transport-unit identifier tables.
//!
//! The header word packs four fields into 32 bits:
//!
//! ```text
//! [di:12][dst_unit:4][si:12][src_unit:4]
//!  31..20      19..16  15..4       3..0
//! ```
//!
//! Packing and unpacking are explicit shift/mask arithmetic; the bit
//! offsets above are a wire contract independent of any platform layout.

/// Bit position of the source-unit selector.
pub const SRC_UNIT_SHIFT: u32 = 0;
/// Bit position of the source immediate/displacement field.
pub const SI_SHIFT: u32 = 4;
/// Bit position of the destination-unit selector.
pub const DST_UNIT_SHIFT: u32 = 16;
/// Bit position of the destination immediate/displacement field.
pub const DI_SHIFT: u32 = 20;

/// Mask for a 4-bit unit selector field.
pub const UNIT_MASK: u32 = 0xF;
/// Mask for a 12-bit immediate/displacement field.
pub const IMM_MASK: u32 = 0xFFF;

/// Smallest value representable in a signed 12-bit immediate field.
pub const IMM_MIN: i16 = -(1 << 11);
/// Largest value representable in a signed 12-bit immediate field.
pub const IMM_MAX: i16 = (1 << 11) - 1;

/// Transport-unit selectors addressable as the source or destination of a
/// data transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Unit {
    /// No unit; a transport to or from it is a no-op.
    #[default]
    None = 0,
    /// Stack top: push as destination, pop as source.
    StackPushPop = 1,
    /// Stack slot addressed by the immediate field.
    StackIndex = 2,
    /// General register addressed by the immediate field.
    Register = 3,
    /// ALU left input latch.
    AluLeft = 4,
    /// ALU right input latch.
    AluRight = 5,
    /// ALU operator select latch.
    AluOperator = 6,
    /// ALU result port.
    AluResult = 7,
    /// Data memory word addressed by the immediate field.
    MemoryImmediate = 8,
    /// Data memory word addressed by a trailing operand word.
    MemoryOperand = 9,
    /// Program counter; writing it is a jump.
    Pc = 10,
    /// Absolute value carried in the immediate field.
    AbsImmediate = 11,
    /// Absolute value carried in a trailing operand word.
    AbsOperand = 12,
    /// Data memory word addressed through a register.
    RegisterPointer = 13,
}

impl Unit {
    /// Every defined unit selector in identifier order.
    pub const ALL: [Self; 14] = [
        Self::None,
        Self::StackPushPop,
        Self::StackIndex,
        Self::Register,
        Self::AluLeft,
        Self::AluRight,
        Self::AluOperator,
        Self::AluResult,
        Self::MemoryImmediate,
        Self::MemoryOperand,
        Self::Pc,
        Self::AbsImmediate,
        Self::AbsOperand,
        Self::RegisterPointer,
    ];

    /// Converts a 4-bit selector value into a defined unit.
    ///
    /// `None` for the reserved selectors 14 and 15.
    #[must_use]
    pub const fn from_u4(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::StackPushPop),
            2 => Some(Self::StackIndex),
            3 => Some(Self::Register),
            4 => Some(Self::AluLeft),
            5 => Some(Self::AluRight),
            6 => Some(Self::AluOperator),
            7 => Some(Self::AluResult),
            8 => Some(Self::MemoryImmediate),
            9 => Some(Self::MemoryOperand),
            10 => Some(Self::Pc),
            11 => Some(Self::AbsImmediate),
            12 => Some(Self::AbsOperand),
            13 => Some(Self::RegisterPointer),
            _ => None,
        }
    }

    /// Returns the selector value carried in the 4-bit header field.
    #[must_use]
    pub const fn as_u4(self) -> u8 {
        self as u8
    }

    /// Returns `true` when transports through this unit carry a trailing
    /// 32-bit operand word.
    ///
    /// This is a pure function of the selector: exactly the
    /// operand-addressed memory and operand-addressed absolute units
    /// need one, because their effective address/value exceeds the 12-bit
    /// immediate field.
    #[must_use]
    pub const fn needs_operand(self) -> bool {
        matches!(self, Self::MemoryOperand | Self::AbsOperand)
    }
}

/// Operator codes accepted by the ALU operator-select unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
#[allow(missing_docs)]
pub enum AluOp {
    Nop = 0x000,
    Add = 0x001,
    Sub = 0x002,
    Mul = 0x003,
    Div = 0x004,
    Mod = 0x005,
    Eql = 0x006,
    Sl = 0x007,
    Sr = 0x008,
    Sra = 0x009,
    Not = 0x00A,
    And = 0x00B,
    Or = 0x00C,
    Xor = 0x00D,
    Gt = 0x00E,
    Lt = 0x00F,
}

impl AluOp {
    /// Converts an operator-select value into a defined operator.
    ///
    /// `None` for values above `0x00F`.
    #[must_use]
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x000 => Some(Self::Nop),
            0x001 => Some(Self::Add),
            0x002 => Some(Self::Sub),
            0x003 => Some(Self::Mul),
            0x004 => Some(Self::Div),
            0x005 => Some(Self::Mod),
            0x006 => Some(Self::Eql),
            0x007 => Some(Self::Sl),
            0x008 => Some(Self::Sr),
            0x009 => Some(Self::Sra),
            0x00A => Some(Self::Not),
            0x00B => Some(Self::And),
            0x00C => Some(Self::Or),
            0x00D => Some(Self::Xor),
            0x00E => Some(Self::Gt),
            0x00F => Some(Self::Lt),
            _ => None,
        }
    }

    /// Returns the operator-select value routed to the ALU operator unit.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the operator-select value as a signed immediate, suitable
    /// for the `si` field of an operator-select transport.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn as_imm(self) -> i16 {
        self as u16 as i16
    }
}

/// Decoded header-word fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HeaderFields {
    /// Source unit selector.
    pub src_unit: Unit,
    /// Source immediate/displacement, sign-extended from 12 bits.
    pub si: i16,
    /// Destination unit selector.
    pub dst_unit: Unit,
    /// Destination immediate/displacement, sign-extended from 12 bits.
    pub di: i16,
}

/// Returns `true` when `value` fits the signed 12-bit immediate field.
#[must_use]
pub const fn imm_in_range(value: i16) -> bool {
    value >= IMM_MIN && value <= IMM_MAX
}

/// Packs the four header fields into a 32-bit instruction word.
///
/// Immediates are truncated to their 12-bit two's-complement field; the
/// builder in [`crate::instr`] range-checks them before calling this.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn encode_header(src_unit: Unit, si: i16, dst_unit: Unit, di: i16) -> u32 {
    ((src_unit.as_u4() as u32) << SRC_UNIT_SHIFT)
        | ((si as u16 as u32 & IMM_MASK) << SI_SHIFT)
        | ((dst_unit.as_u4() as u32) << DST_UNIT_SHIFT)
        | ((di as u16 as u32 & IMM_MASK) << DI_SHIFT)
}

/// Unpacks a 32-bit instruction word into header fields.
///
/// `None` when either unit selector is a reserved value (14 or 15).
#[must_use]
pub const fn decode_header(word: u32) -> Option<HeaderFields> {
    let src_unit = match Unit::from_u4(((word >> SRC_UNIT_SHIFT) & UNIT_MASK) as u8) {
        Some(unit) => unit,
        None => return None,
    };
    let dst_unit = match Unit::from_u4(((word >> DST_UNIT_SHIFT) & UNIT_MASK) as u8) {
        Some(unit) => unit,
        None => return None,
    };

    Some(HeaderFields {
        src_unit,
        si: sign_extend_12(((word >> SI_SHIFT) & IMM_MASK) as u16),
        dst_unit,
        di: sign_extend_12(((word >> DI_SHIFT) & IMM_MASK) as u16),
    })
}

/// Sign-extends a raw 12-bit field value to `i16`.
#[allow(clippy::cast_possible_wrap)]
const fn sign_extend_12(raw: u16) -> i16 {
    ((raw << 4) as i16) >> 4
}

#[cfg(test)]
mod tests {
    use super::{
        decode_header, encode_header, imm_in_range, AluOp, HeaderFields, Unit, IMM_MAX, IMM_MIN,
    };

    #[test]
    fn header_fields_occupy_contract_bit_positions() {
        let word = encode_header(Unit::Register, 5, Unit::MemoryImmediate, 10);

        assert_eq!(word & 0xF, u32::from(Unit::Register.as_u4()));
        assert_eq!((word >> 4) & 0xFFF, 5);
        assert_eq!((word >> 16) & 0xF, u32::from(Unit::MemoryImmediate.as_u4()));
        assert_eq!((word >> 20) & 0xFFF, 10);
    }

    #[test]
    fn negative_immediates_encode_as_twos_complement_fields() {
        let word = encode_header(Unit::AbsImmediate, -1, Unit::Pc, IMM_MIN);

        assert_eq!((word >> 4) & 0xFFF, 0xFFF);
        assert_eq!((word >> 20) & 0xFFF, 0x800);

        let fields = decode_header(word).expect("defined units must decode");
        assert_eq!(fields.si, -1);
        assert_eq!(fields.di, IMM_MIN);
    }

    #[test]
    fn decode_recovers_fields_at_range_extremes() {
        for unit in Unit::ALL {
            let word = encode_header(unit, IMM_MAX, unit, IMM_MIN);
            assert_eq!(
                decode_header(word),
                Some(HeaderFields {
                    src_unit: unit,
                    si: IMM_MAX,
                    dst_unit: unit,
                    di: IMM_MIN,
                })
            );
        }
    }

    #[test]
    fn reserved_unit_selectors_fail_decode() {
        assert!(decode_header(14).is_none());
        assert!(decode_header(15).is_none());
        assert!(decode_header(14 << 16).is_none());
        assert!(decode_header(15 << 16).is_none());
    }

    #[test]
    fn exactly_two_units_need_a_trailing_operand() {
        let operand_units: Vec<Unit> = Unit::ALL
            .into_iter()
            .filter(|unit| unit.needs_operand())
            .collect();
        assert_eq!(operand_units, [Unit::MemoryOperand, Unit::AbsOperand]);
    }

    #[test]
    fn unit_selector_roundtrip_covers_defined_identifiers() {
        for (value, unit) in Unit::ALL.into_iter().enumerate() {
            let value = u8::try_from(value).expect("selector fits 4 bits");
            assert_eq!(Unit::from_u4(value), Some(unit));
            assert_eq!(unit.as_u4(), value);
        }
        assert_eq!(Unit::from_u4(14), None);
        assert_eq!(Unit::from_u4(15), None);
    }

    #[test]
    fn alu_operator_roundtrip_covers_all_sixteen_codes() {
        for code in 0x000_u16..=0x00F {
            let op = AluOp::from_u16(code).expect("defined operator code");
            assert_eq!(op.as_u16(), code);
            assert_eq!(op.as_imm(), i16::try_from(code).expect("code fits i16"));
        }
        assert_eq!(AluOp::from_u16(0x010), None);
    }

    #[test]
    fn immediate_range_check_matches_signed_12_bit_bounds() {
        assert!(imm_in_range(0));
        assert!(imm_in_range(IMM_MIN));
        assert!(imm_in_range(IMM_MAX));
        assert!(!imm_in_range(IMM_MIN - 1));
        assert!(!imm_in_range(IMM_MAX + 1));
    }
}
