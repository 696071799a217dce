//! Clock divisor and reset-hold sequencing.

use tracing::info;

/// Paces the notional bus clock and the power-on reset window.
///
/// One [`ClockSequencer::step`] is one unit of simulation time. The clock
/// output inverts every `divisor` steps; a low-to-high inversion is a
/// rising edge, which completes a bus cycle and arms the one-step
/// [`ClockSequencer::bus_active`] flag. Reset starts asserted and is
/// deasserted exactly once, after `reset_cycles * divisor` steps.
#[derive(Debug, Clone)]
pub struct ClockSequencer {
    divisor: u64,
    reset_hold_steps: u64,
    steps: u64,
    cycles: u64,
    clk: bool,
    reset: bool,
    bus_edge: bool,
}

impl ClockSequencer {
    /// Creates a sequencer holding reset for `reset_cycles` bus cycles.
    ///
    /// # Panics
    ///
    /// Panics when `divisor` is zero.
    #[must_use]
    pub fn new(divisor: u32, reset_cycles: u32) -> Self {
        assert!(divisor > 0, "clock divisor must be positive");
        let divisor = u64::from(divisor);
        Self {
            divisor,
            reset_hold_steps: u64::from(reset_cycles) * divisor,
            steps: 0,
            cycles: 0,
            clk: false,
            reset: true,
            bus_edge: false,
        }
    }

    /// Advances simulation time by one step.
    pub fn step(&mut self) {
        if self.steps >= self.reset_hold_steps && self.reset {
            info!(steps = self.steps, "releasing reset");
            self.reset = false;
        }

        self.bus_edge = false;

        if self.steps % self.divisor == 0 {
            if !self.clk {
                self.bus_edge = true;
                self.cycles += 1;
            }
            self.clk = !self.clk;
        }

        self.steps += 1;
    }

    /// Steps taken so far.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Completed bus cycles (rising edges) so far.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns `true` when the most recent step produced a rising edge.
    #[must_use]
    pub const fn bus_active(&self) -> bool {
        self.bus_edge
    }

    /// Returns `true` while power-on reset is still asserted.
    #[must_use]
    pub const fn reset_asserted(&self) -> bool {
        self.reset
    }

    /// Current clock phase.
    #[must_use]
    pub const fn clk(&self) -> bool {
        self.clk
    }
}
