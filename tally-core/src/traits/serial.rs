//! Host serial line trait

/// Errors from the serial transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Transmit buffer full
    WouldBlock,
    /// Port closed or failed
    Closed,
}

/// Byte-oriented serial port to the switcher client
pub trait SerialLine {
    /// Read one byte if one is available, never blocking
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue bytes for transmission
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError>;
}
