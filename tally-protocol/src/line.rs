//! Newline-delimited line assembly from a byte stream

use heapless::Vec;

/// Errors reported while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// The line exceeded the buffer and was discarded up to its newline
    Overflow,
}

/// State machine collecting bytes until `\n`
///
/// `\r` is ignored so CRLF senders work. Empty lines produce nothing. A line
/// longer than `N` is dropped whole and reported once its newline arrives.
#[derive(Debug, Clone)]
pub struct LineAssembler<const N: usize> {
    buffer: Vec<u8, N>,
    discarding: bool,
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineAssembler<N> {
    /// Create an empty assembler
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Bytes of the current partial line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a line completes, `Ok(None)` when more
    /// bytes are needed, or `Err` when an overlong line ends.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Vec<u8, N>>, LineError> {
        match byte {
            b'\r' => Ok(None),
            b'\n' => {
                if self.discarding {
                    self.reset();
                    return Err(LineError::Overflow);
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.clone();
                self.buffer.clear();
                Ok(Some(line))
            }
            _ if self.discarding => Ok(None),
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                }
                Ok(None)
            }
        }
    }
}
