//! Read-only memory model with bulk image loading.

use tracing::debug;

use crate::bus::{BusRequest, BusResponse};
use crate::fault::SimFault;
use crate::peripherals::ram::load_into;

/// Number of hexadecimal digits in one memory-image record.
const RECORD_DIGITS: usize = 8;

/// A flat word-addressed read-only store.
///
/// The read path is identical to [`crate::peripherals::Ram`]; there is no
/// write path. The backing store is filled before simulation starts,
/// either word-by-word or from a textual memory image.
#[derive(Debug, Clone)]
pub struct Rom {
    mem: Vec<u32>,
}

impl Rom {
    /// Creates a zero-filled store of `words` 32-bit words.
    #[must_use]
    pub fn new(words: usize) -> Self {
        Self {
            mem: vec![0; words],
        }
    }

    /// Answers one bus read transaction; write strobes are ignored.
    ///
    /// # Errors
    ///
    /// [`SimFault::AddressOutOfRange`] when a valid request addresses a
    /// word beyond the store.
    pub fn evaluate(&self, req: &BusRequest) -> Result<BusResponse, SimFault> {
        if !req.valid {
            return Ok(BusResponse::idle());
        }

        let index = req.addr as usize;
        if index >= self.mem.len() {
            return Err(SimFault::AddressOutOfRange {
                addr: req.addr,
                words: self.mem.len(),
            });
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

    /// Fills the store from a textual memory image, one 8-digit
    /// hexadecimal word per whitespace-separated record, in file order,
    /// starting at address 0. Returns the number of words loaded.
    ///
    /// # Errors
    ///
    /// [`SimFault::MalformedImage`] for a record that is not an 8-digit
    /// hexadecimal word; [`SimFault::ImageOverflow`] when the image holds
    /// more words than the store.
    pub fn load_hex_str(&mut self, text: &str) -> Result<usize, SimFault> {
        let words = parse_hex_image(text)?;
        if words.len() > self.mem.len() {
            return Err(SimFault::ImageOverflow {
                words: words.len(),
                capacity: self.mem.len(),
            });
        }
        self.mem[..words.len()].copy_from_slice(&words);
        debug!(words = words.len(), "loaded memory image");
        Ok(words.len())
    }

    /// The backing store.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.mem
    }

    /// Mutable access for pre-load before simulation starts.
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
}

fn parse_hex_image(text: &str) -> Result<Vec<u32>, SimFault> {
    let mut words = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            if token.len() != RECORD_DIGITS {
                return Err(SimFault::MalformedImage {
                    line: line_index + 1,
                    token: token.to_string(),
                });
            }
            let word =
                u32::from_str_radix(token, 16).map_err(|_| SimFault::MalformedImage {
                    line: line_index + 1,
                    token: token.to_string(),
                })?;
            words.push(word);
        }
    }
    Ok(words)
}
