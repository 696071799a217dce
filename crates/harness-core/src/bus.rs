//! Bus transaction snapshots and byte-enable arithmetic.
//!
//! The driver owns all signal state: each cycle it samples a
//! [`BusRequest`] from the device under test, hands it to a peripheral,
//! and carries the returned [`BusResponse`] back. No transaction outlives
//! one evaluation call and no live references are shared.

/// Byte-enable mask committing no bytes.
pub const WSTRB_NONE: u8 = 0b0000;
/// Byte-enable mask committing the full word.
pub const WSTRB_ALL: u8 = 0b1111;

/// Byte lanes in a 32-bit bus word.
pub const BYTE_LANES: u32 = 4;

/// One requested bus transaction, sampled from the device under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BusRequest {
    /// A transaction is requested this cycle.
    pub valid: bool,
    /// Word address of the transaction.
    pub addr: u32,
    /// Intended write value; ignored when `wstrb` is zero.
    pub write_data: u32,
    /// Byte-enable mask: bit *i* commits byte *i* (byte 0 is the
    /// least-significant byte).
    pub wstrb: u8,
}

impl BusRequest {
    /// No transaction this cycle.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            valid: false,
            addr: 0,
            write_data: 0,
            wstrb: WSTRB_NONE,
        }
    }

    /// A read of the word at `addr`.
    #[must_use]
    pub const fn read(addr: u32) -> Self {
        Self {
            valid: true,
            addr,
            write_data: 0,
            wstrb: WSTRB_NONE,
        }
    }

    /// A byte-enabled write of `data` to the word at `addr`.
    #[must_use]
    pub const fn write(addr: u32, data: u32, wstrb: u8) -> Self {
        Self {
            valid: true,
            addr,
            write_data: data,
            wstrb,
        }
    }
}

/// The peripheral's same-cycle answer to a [`BusRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BusResponse {
    /// Completion strobe; mirrors the request's `valid` unconditionally.
    pub ready: bool,
    /// The addressed word, after any byte-enabled write this cycle.
    pub read_data: u32,
}

impl BusResponse {
    /// The answer to an idle request.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            ready: false,
            read_data: 0,
        }
    }
}

/// Merges `write_data` into `current` under a byte-enable mask.
///
/// Bit *i* of `wstrb` replaces byte *i* of the word; cleared bits leave
/// their byte untouched. Pure shift/mask arithmetic, no reliance on the
/// word's memory layout.
#[must_use]
pub const fn apply_strobe(current: u32, write_data: u32, wstrb: u8) -> u32 {
    let mut merged = current;
    let mut lane = 0;
    while lane < BYTE_LANES {
        if (wstrb >> lane) & 1 != 0 {
            let mask = 0xFF << (lane * 8);
            merged = (merged & !mask) | (write_data & mask);
        }
        lane += 1;
    }
    merged
}
