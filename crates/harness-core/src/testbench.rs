//! The driver loop pacing a device under test against the bus peripherals.

use thiserror::Error;

use crate::bus::BusResponse;
use crate::clock::ClockSequencer;
use crate::dut::{ControlLines, Dut};
use crate::fault::SimFault;
use crate::instr::{EncodeError, Program};
use crate::peripherals::{BitPeriod, Ram, Rom, UartRx};

/// Failure while placing a program into the instruction store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The program violated the encoding contract.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The encoded words did not fit the instruction store.
    #[error(transparent)]
    Sim(#[from] SimFault),
}

/// Sizing and pacing parameters for a [`Testbench`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TestbenchConfig {
    /// Steps per clock phase.
    pub clock_divisor: u32,
    /// Bus cycles to hold reset asserted.
    pub reset_cycles: u32,
    /// Instruction store capacity in words.
    pub prg_words: usize,
    /// Data store capacity in words.
    pub ram_words: usize,
    /// Bus-active cycles per serial bit.
    pub baud_period: u32,
}

impl Default for TestbenchConfig {
    fn default() -> Self {
        Self {
            clock_divisor: 1,
            reset_cycles: 1,
            prg_words: 1024,
            ram_words: 1024,
            baud_period: 651,
        }
    }
}

/// Owns the clock/reset sequencer, the bus peripherals, and the serial
/// sink, and paces one device under test through them.
///
/// Within one step the order is fixed: the sequencer advances, the device
/// evaluates, and only when reset is released and the step completed a
/// rising bus edge are the peripherals evaluated and one serial sample
/// (per bit period) taken. Peripherals are never evaluated outside an
/// active bus cycle or under reset.
#[derive(Debug)]
pub struct Testbench<D: Dut> {
    dut: D,
    clock: ClockSequencer,
    prg: Rom,
    ram: Ram,
    rx: UartRx,
    baud: BitPeriod,
    output: Vec<u8>,
}

impl<D: Dut> Testbench<D> {
    /// Creates a testbench with [`TestbenchConfig::default`] parameters.
    #[must_use]
    pub fn new(dut: D) -> Self {
        Self::with_config(dut, &TestbenchConfig::default())
    }

    /// Creates a testbench with explicit parameters.
    ///
    /// # Panics
    ///
    /// Panics when `clock_divisor` or `baud_period` is zero.
    #[must_use]
    pub fn with_config(dut: D, config: &TestbenchConfig) -> Self {
        Self {
            dut,
            clock: ClockSequencer::new(config.clock_divisor, config.reset_cycles),
            prg: Rom::new(config.prg_words),
            ram: Ram::new(config.ram_words),
            rx: UartRx::new(),
            baud: BitPeriod::new(config.baud_period),
            output: Vec::new(),
        }
    }

    /// Advances one simulation step: sequencer, device evaluation, then
    /// gated peripheral evaluation and serial sampling.
    ///
    /// # Errors
    ///
    /// Propagates [`SimFault`] from peripheral evaluation; the step's
    /// device evaluation has already happened and the run may be aborted
    /// or continued at the caller's discretion.
    pub fn step(&mut self) -> Result<(), SimFault> {
        self.clock.step();
        self.dut.eval(ControlLines {
            clk: self.clock.clk(),
            reset: self.clock.reset_asserted(),
        });

        if self.clock.reset_asserted() || !self.clock.bus_active() {
            return Ok(());
        }

        let instr_resp = self.prg.evaluate(&self.dut.instr_request())?;
        self.dut.set_instr_response(instr_resp);

        let data_resp = self.ram.evaluate(&self.dut.data_request())?;
        self.dut.set_data_response(data_resp);

        if self.baud.tick() {
            if let Some(byte) = self.rx.push(self.dut.tx_line()) {
                self.output.push(byte);
            }
        }

        Ok(())
    }

    /// Steps until reset is released.
    ///
    /// # Errors
    ///
    /// Propagates [`SimFault`] from [`Testbench::step`].
    pub fn run_until_reset_released(&mut self) -> Result<(), SimFault> {
        while self.clock.reset_asserted() {
            self.step()?;
        }
        Ok(())
    }

    /// Runs until `cycles` further bus cycles have completed; returns the
    /// number of cycles run.
    ///
    /// # Errors
    ///
    /// Propagates [`SimFault`] from [`Testbench::step`].
    pub fn run_cycles(&mut self, cycles: u64) -> Result<u64, SimFault> {
        let start = self.clock.cycles();
        while self.clock.cycles() - start < cycles {
            self.step()?;
        }
        Ok(self.clock.cycles() - start)
    }

    /// Pre-loads raw words into the instruction store at `addr`.
    ///
    /// # Errors
    ///
    /// [`SimFault::ImageOverflow`] when the words do not fit.
    pub fn load_words(&mut self, words: &[u32], addr: u32) -> Result<(), SimFault> {
        self.prg.load(words, addr)
    }

    /// Encodes a program and pre-loads it at `addr`.
    ///
    /// # Errors
    ///
    /// [`LoadError::Encode`] when the program violates the encoding
    /// contract, [`LoadError::Sim`] when the words do not fit.
    pub fn load_program(&mut self, program: &Program, addr: u32) -> Result<(), LoadError> {
        let words = program.encode()?;
        self.prg.load(&words, addr)?;
        Ok(())
    }

    /// Fills the instruction store from a textual memory image.
    ///
    /// # Errors
    ///
    /// Propagates [`SimFault`] from [`Rom::load_hex_str`].
    pub fn load_image(&mut self, text: &str) -> Result<usize, SimFault> {
        self.prg.load_hex_str(text)
    }

    /// The clock/reset sequencer.
    #[must_use]
    pub const fn clock(&self) -> &ClockSequencer {
        &self.clock
    }

    /// The instruction store.
    #[must_use]
    pub const fn prg(&self) -> &Rom {
        &self.prg
    }

    /// Mutable instruction store, for pre-load before the run.
    pub fn prg_mut(&mut self) -> &mut Rom {
        &mut self.prg
    }

    /// The data store.
    #[must_use]
    pub const fn ram(&self) -> &Ram {
        &self.ram
    }

    /// Mutable data store, for pre-load and inspection.
    pub fn ram_mut(&mut self) -> &mut Ram {
        &mut self.ram
    }

    /// The device under test.
    #[must_use]
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Mutable device under test.
    pub fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    /// The serial receive decoder.
    #[must_use]
    pub const fn uart(&self) -> &UartRx {
        &self.rx
    }

    /// Bytes decoded from the serial line so far, in reception order.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }
}
