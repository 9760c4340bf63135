//! Broadcast radio transmit trait

/// Errors from the radio driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// Driver not initialised
    NotReady,
    /// Transmit queue full or send rejected
    SendFailed,
}

/// Best-effort broadcast transmitter
///
/// Reception is not part of this trait. The receive callback pushes raw
/// frames into a [`RadioSink`](crate::link::RadioSink) instead.
pub trait RadioTx {
    /// Broadcast one already whitened frame
    fn broadcast(&mut self, frame: &[u8]) -> Result<(), RadioError>;
}
