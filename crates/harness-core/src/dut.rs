//! Signal-level contract between the harness and the device under test.

use crate::bus::{BusRequest, BusResponse};

/// Clock and reset levels driven into the device every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ControlLines {
    /// Bus clock level.
    pub clk: bool,
    /// Power-on reset level (active high).
    pub reset: bool,
}

/// The opaque device under test.
///
/// The harness owns all signal state and exchanges snapshots: after each
/// [`Dut::eval`] it samples one request per bus port, and before the next
/// evaluation it hands back the peripheral's response. The device exposes
/// an instruction-fetch port, a data port, and a serial transmit line.
pub trait Dut {
    /// Evaluates the device against the given clock/reset levels.
    fn eval(&mut self, lines: ControlLines);

    /// Samples the instruction-port request lines.
    fn instr_request(&self) -> BusRequest;

    /// Drives the instruction-port response lines.
    fn set_instr_response(&mut self, resp: BusResponse);

    /// Samples the data-port request lines.
    fn data_request(&self) -> BusRequest;

    /// Drives the data-port response lines.
    fn set_data_response(&mut self, resp: BusResponse);

    /// Samples the serial transmit line; idle level is high.
    fn tx_line(&self) -> bool {
        true
    }
}
