//! Serial receive decoding from a sampled transmit line.

use tracing::warn;

/// Serial decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RxState {
    /// Idle; waiting for a low start bit.
    #[default]
    AwaitStart,
    /// Accumulating the eight data bits, LSB first.
    Receiving,
    /// Waiting for the high stop bit.
    AwaitStop,
}

/// Reconstructs bytes from a serial line sampled once per bit period.
///
/// Framing is one start bit (low), eight data bits LSB first, one stop bit
/// (high). A low stop bit is a framing violation: it is counted, logged,
/// and the decoder resynchronizes to [`RxState::AwaitStart`] instead of
/// stalling.
#[derive(Debug, Clone, Default)]
pub struct UartRx {
    state: RxState,
    shift: u8,
    bit: u8,
    framing_errors: u64,
}

impl UartRx {
    /// Creates an idle decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one sampled line level; returns a byte when a frame
    /// completes.
    pub fn push(&mut self, bit: bool) -> Option<u8> {
        match self.state {
            RxState::AwaitStart => {
                if !bit {
                    self.state = RxState::Receiving;
                }
                None
            }
            RxState::Receiving => {
                self.shift |= u8::from(bit) << self.bit;
                self.bit += 1;
                if self.bit == 8 {
                    self.state = RxState::AwaitStop;
                }
                None
            }
            RxState::AwaitStop => {
                let byte = self.shift;
                self.shift = 0;
                self.bit = 0;
                self.state = RxState::AwaitStart;
                if bit {
                    Some(byte)
                } else {
                    self.framing_errors += 1;
                    warn!(byte, "framing violation: low stop bit, resynchronizing");
                    None
                }
            }
        }
    }

    /// Current decoder state.
    #[must_use]
    pub const fn state(&self) -> RxState {
        self.state
    }

    /// Number of framing violations observed so far.
    #[must_use]
    pub const fn framing_errors(&self) -> u64 {
        self.framing_errors
    }
}

/// Counts bus cycles and fires once per serial bit period.
///
/// Owns the cycle-to-bit-period bookkeeping so the driver loop carries no
/// loose counter state.
#[derive(Debug, Clone)]
pub struct BitPeriod {
    period: u32,
    count: u32,
}

impl BitPeriod {
    /// Creates a counter firing every `period` ticks.
    ///
    /// # Panics
    ///
    /// Panics when `period` is zero.
    #[must_use]
    pub fn new(period: u32) -> Self {
        assert!(period > 0, "bit period must be positive");
        Self { period, count: 0 }
    }

    /// Advances one tick; returns `true` on the last tick of each period.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count == self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }
}
