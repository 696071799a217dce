//! Cycle-stepped test harness core for the transport-triggered soft core.
//!
//! The crate pairs a bit-exact instruction encoder with the bus-level
//! models a simulated processor talks to: clock/reset sequencing,
//! byte-enable-accurate RAM/ROM, and a serial receive decoder, all paced
//! by a [`Testbench`] driver loop around an opaque device under test.

/// Instruction-word bit layout and unit/operator tables.
pub mod encoding;
pub use encoding::{
    decode_header, encode_header, imm_in_range, AluOp, HeaderFields, Unit, DI_SHIFT,
    DST_UNIT_SHIFT, IMM_MASK, IMM_MAX, IMM_MIN, SI_SHIFT, SRC_UNIT_SHIFT, UNIT_MASK,
};

/// Staged instruction builder and program encoding.
pub mod instr;
pub use instr::{EncodeError, Instr, Program, TransportEnd};

/// Simulation-time failure taxonomy.
pub mod fault;
pub use fault::SimFault;

/// Bus transaction snapshots and byte-enable arithmetic.
pub mod bus;
pub use bus::{apply_strobe, BusRequest, BusResponse, BYTE_LANES, WSTRB_ALL, WSTRB_NONE};

/// Clock divisor and reset-hold sequencing.
pub mod clock;
pub use clock::ClockSequencer;

/// Bus-peripheral models.
pub mod peripherals;
pub use peripherals::{BitPeriod, Ram, Rom, RxState, UartRx};

/// Device-under-test signal contract.
pub mod dut;
pub use dut::{ControlLines, Dut};

/// Driver loop and configuration.
pub mod testbench;
pub use testbench::{LoadError, Testbench, TestbenchConfig};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
