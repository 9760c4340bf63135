//! Radio receive queue
//!
//! The radio driver's receive callback runs outside the control loop. It only
//! copies the raw frame into a bounded single-producer/single-consumer queue;
//! the control loop drains it once per logic tick.

use heapless::spsc::{Consumer, Producer, Queue};
use heapless::Vec;
use tally_protocol::{FrameError, FRAME_BUFFER_SIZE, MAX_FRAME_LEN};

use super::LinkError;

/// Frames buffered between the receive callback and the control loop
pub const RADIO_QUEUE_DEPTH: usize = 8;

/// Queue storage size; one slot stays empty in an spsc ring
const QUEUE_SLOTS: usize = RADIO_QUEUE_DEPTH + 1;

/// Whitened frame as received from the air
pub type RawFrame = Vec<u8, MAX_FRAME_LEN>;

/// Storage for received frames
///
/// Lives for the whole program (typically in a `static`) and is split once
/// into its two ends.
pub struct RadioInbox {
    queue: Queue<RawFrame, QUEUE_SLOTS>,
}

impl Default for RadioInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioInbox {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
        }
    }

    /// Split into the callback end and the control loop end
    pub fn split(&mut self) -> (RadioSink<'_>, RadioSource<'_>) {
        let (producer, consumer) = self.queue.split();
        (RadioSink { producer }, RadioSource { consumer })
    }
}

/// Producer end, owned by the radio receive callback
pub struct RadioSink<'q> {
    producer: Producer<'q, RawFrame, QUEUE_SLOTS>,
}

impl RadioSink<'_> {
    /// Queue a received frame
    ///
    /// Frames that would not fit the receive buffer, and frames arriving
    /// while the queue is full, are dropped.
    pub fn push(&mut self, raw: &[u8]) -> Result<(), LinkError> {
        if raw.len() >= FRAME_BUFFER_SIZE {
            return Err(LinkError::Frame(FrameError::Overflow));
        }
        let frame = RawFrame::from_slice(raw).map_err(|_| LinkError::Frame(FrameError::Overflow))?;
        self.producer
            .enqueue(frame)
            .map_err(|_| LinkError::QueueFull)
    }
}

/// Consumer end, owned by the control loop
pub struct RadioSource<'q> {
    consumer: Consumer<'q, RawFrame, QUEUE_SLOTS>,
}

impl RadioSource<'_> {
    /// Take the oldest received frame
    pub fn pop(&mut self) -> Option<RawFrame> {
        self.consumer.dequeue()
    }

    /// Number of frames waiting
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
