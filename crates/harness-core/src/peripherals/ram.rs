//! Read-write memory model with per-byte write enables.

use crate::bus::{apply_strobe, BusRequest, BusResponse};
use crate::fault::SimFault;

/// A flat word-addressed read-write store answering one bus transaction
/// per evaluation call.
///
/// The store is owned exclusively by the model: it changes only through
/// [`Ram::evaluate`] during simulation and through explicit pre-loading
/// before the run starts.
#[derive(Debug, Clone)]
pub struct Ram {
    mem: Vec<u32>,
}

impl Ram {
    /// Creates a zero-filled store of `words` 32-bit words.
    #[must_use]
    pub fn new(words: usize) -> Self {
        Self {
            mem: vec![0; words],
        }
    }

    /// Fills the store with deterministic garbage, emulating the contents
    /// of real memory before initialization.
    pub fn randomize(&mut self, mut seed: u64) {
        for word in &mut self.mem {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            *word = (seed >> 32) as u32;
        }
    }

    /// Answers one bus transaction.
    ///
    /// When the request is valid, any set byte-enable bits commit the
    /// corresponding bytes of `write_data` into the addressed word, then
    /// the (possibly just-written) word is published on `read_data`. The
    /// ready line mirrors the valid line unconditionally.
    ///
    /// # Errors
    ///
    /// [`SimFault::AddressOutOfRange`] when a valid request addresses a
    /// word beyond the store; nothing is written.
    pub fn evaluate(&mut self, req: &BusRequest) -> Result<BusResponse, SimFault> {
        if !req.valid {
            return Ok(BusResponse::idle());
        }

        let index = self.index_of(req.addr)?;
        if req.wstrb != 0 {
            self.mem[index] = apply_strobe(self.mem[index], req.write_data, req.wstrb);
        }

        Ok(BusResponse {
            ready: true,
            read_data: self.mem[index],
        })
    }

    /// Pre-loads `words` starting at word address `addr`.
    ///
    /// # Errors
    ///
    /// [`SimFault::ImageOverflow`] when the data would run past the end of
    /// the store; nothing is written.
    pub fn load(&mut self, words: &[u32], addr: u32) -> Result<(), SimFault> {
        load_into(&mut self.mem, words, addr)
    }

    /// The backing store.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.mem
    }

    /// Mutable access for pre-load and inspection outside simulation.
    pub fn words_mut(&mut self) -> &mut [u32] {
        &mut self.mem
    }

    /// Store capacity in words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mem.len()
    }

    /// Returns `true` for a zero-sized store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    fn index_of(&self, addr: u32) -> Result<usize, SimFault> {
        let index = addr as usize;
        if index < self.mem.len() {
            Ok(index)
        } else {
            Err(SimFault::AddressOutOfRange {
                addr,
                words: self.mem.len(),
            })
        }
    }
}

pub(crate) fn load_into(mem: &mut [u32], words: &[u32], addr: u32) -> Result<(), SimFault> {
    let start = addr as usize;
    let end = start.checked_add(words.len());
    match end {
        Some(end) if end <= mem.len() => {
            mem[start..end].copy_from_slice(words);
            Ok(())
        }
        _ => Err(SimFault::ImageOverflow {
            words: words.len(),
            capacity: mem.len().saturating_sub(start.min(mem.len())),
        }),
    }
}
