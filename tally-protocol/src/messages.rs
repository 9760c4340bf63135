//! Message types for the tally protocol
//!
//! Message types are divided into two categories:
//! - Radio and bridge commands: test alerts, status snapshots, ping/pong
//! - Bridge replies only: `Ok` and `Error`

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_FRAME_LEN, MAX_PAYLOAD_SIZE, MIN_FRAME_LEN};
use crate::status::CameraStatus;

// Message type IDs
pub const MSG_OK: u8 = 0x00;
pub const MSG_TEST: u8 = 0x01;
pub const MSG_STATUS: u8 = 0x02;
pub const MSG_PING: u8 = 0x03;
pub const MSG_PONG: u8 = 0x04;
pub const MSG_ERROR: u8 = 0xFF;

/// Largest status list a single frame carries (one payload byte is the count)
pub const MAX_STATUS_COUNT: usize = MAX_PAYLOAD_SIZE - 1;

/// Test mask addressing every slot
pub const TEST_ALL: u8 = 0xFF;

/// Ordered camera statuses, slot 1 first
pub type StatusList = Vec<CameraStatus, MAX_STATUS_COUNT>;

/// Every message that can appear on the radio or the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Flash and beep every slot whose bit is set (bit 0 = slot 1)
    Test { target_mask: u8 },
    /// Snapshot of the switcher state
    Status { statuses: StatusList },
    /// Liveness request
    Ping,
    /// Liveness response
    Pong,
    /// Bridge acknowledgement
    Ok,
    /// Bridge rejection
    Error,
}

impl Message {
    /// Build a status message from a slice, keeping at most
    /// [`MAX_STATUS_COUNT`] entries
    pub fn status(statuses: &[CameraStatus]) -> Self {
        let take = statuses.len().min(MAX_STATUS_COUNT);
        let mut list = StatusList::new();
        // Cannot fail, the slice is clamped to capacity
        let _ = list.extend_from_slice(&statuses[..take]);
        Message::Status { statuses: list }
    }

    /// Wire type byte
    pub fn msg_type(&self) -> u8 {
        match self {
            Message::Test { .. } => MSG_TEST,
            Message::Status { .. } => MSG_STATUS,
            Message::Ping => MSG_PING,
            Message::Pong => MSG_PONG,
            Message::Ok => MSG_OK,
            Message::Error => MSG_ERROR,
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            Message::Test { target_mask } => Frame::new(MSG_TEST, &[*target_mask]),
            Message::Status { statuses } => {
                // Payload: [count][status...]
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .push(statuses.len() as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                for status in statuses {
                    payload
                        .push(status.to_byte())
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                }
                Frame::new(MSG_STATUS, &payload)
            }
            Message::Ping => Ok(Frame::empty(MSG_PING)),
            Message::Pong => Ok(Frame::empty(MSG_PONG)),
            Message::Ok => Ok(Frame::empty(MSG_OK)),
            Message::Error => Ok(Frame::empty(MSG_ERROR)),
        }
    }

    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let invalid = FrameError::InvalidLength {
            msg_type: frame.msg_type,
        };
        let payload = &frame.payload;

        match frame.msg_type {
            MSG_TEST => match payload.as_slice() {
                [target_mask] => Ok(Message::Test {
                    target_mask: *target_mask,
                }),
                _ => Err(invalid),
            },
            MSG_STATUS => {
                let (&count, entries) = payload.split_first().ok_or(invalid)?;
                if entries.len() != count as usize {
                    return Err(invalid);
                }
                let mut statuses = StatusList::new();
                for &byte in entries {
                    statuses
                        .push(CameraStatus::from_byte(byte))
                        .map_err(|_| invalid)?;
                }
                Ok(Message::Status { statuses })
            }
            MSG_PING | MSG_PONG | MSG_OK | MSG_ERROR => {
                if !payload.is_empty() {
                    return Err(invalid);
                }
                Ok(match frame.msg_type {
                    MSG_PING => Message::Ping,
                    MSG_PONG => Message::Pong,
                    MSG_OK => Message::Ok,
                    _ => Message::Error,
                })
            }
            other => Err(FrameError::UnknownType(other)),
        }
    }

    /// Encode as plain frame bytes
    pub fn encode(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        self.to_frame()?.encode_to_vec()
    }

    /// Encode as whitened radio bytes
    pub fn encode_radio(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        self.to_frame()?.encode_radio()
    }

    /// Decode plain frame bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        Self::from_frame(&Frame::decode(bytes)?)
    }

    /// Decode whitened radio bytes
    pub fn decode_radio(raw: &[u8]) -> Result<Self, FrameError> {
        Self::from_frame(&Frame::decode_radio(raw)?)
    }

    /// Encoded frame length
    pub fn encoded_len(&self) -> usize {
        match self {
            Message::Test { .. } => MIN_FRAME_LEN + 1,
            Message::Status { statuses } => MIN_FRAME_LEN + 1 + statuses.len(),
            _ => MIN_FRAME_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FRAME_BUFFER_SIZE, XOR_KEY};
    use proptest::prelude::*;

    #[test]
    fn test_test_message_bytes() {
        let encoded = Message::Test { target_mask: 0x02 }.encode().unwrap();
        assert_eq!(&encoded[..], &[0x05, 0x01, 0x02, 0xF8, 0x01]);
    }

    #[test]
    fn test_status_message_bytes() {
        let msg = Message::status(&[
            CameraStatus::Standby,
            CameraStatus::Standby,
            CameraStatus::Program,
            CameraStatus::Standby,
        ]);
        let encoded = msg.encode().unwrap();

        assert_eq!(
            &encoded[..],
            &[0x09, 0x02, 0x04, 0x00, 0x00, 0x02, 0x00, 0x96, 0x55]
        );
        assert_eq!(msg.encoded_len(), encoded.len());
    }

    #[test]
    fn test_reply_bytes() {
        assert_eq!(&Message::Ok.encode().unwrap()[..], &[0x04, 0x00, 0xFF, 0x87]);
        assert_eq!(&Message::Pong.encode().unwrap()[..], &[0x04, 0x04, 0xF8, 0x07]);
        assert_eq!(
            &Message::Error.encode().unwrap()[..],
            &[0x04, 0xFF, 0x55, 0x87]
        );
    }

    #[test]
    fn test_test_wrong_length() {
        let frame = Frame::new(MSG_TEST, &[0x01, 0x02]).unwrap();
        assert_eq!(
            Message::from_frame(&frame),
            Err(FrameError::InvalidLength { msg_type: MSG_TEST })
        );
    }

    #[test]
    fn test_status_count_disagrees_with_length() {
        let frame = Frame::new(MSG_STATUS, &[4, 0, 0, 2]).unwrap();
        assert_eq!(
            Message::from_frame(&frame),
            Err(FrameError::InvalidLength {
                msg_type: MSG_STATUS
            })
        );

        let empty = Frame::empty(MSG_STATUS);
        assert!(Message::from_frame(&empty).is_err());
    }

    #[test]
    fn test_ping_with_payload_rejected() {
        let frame = Frame::new(MSG_PING, &[0]).unwrap();
        assert_eq!(
            Message::from_frame(&frame),
            Err(FrameError::InvalidLength { msg_type: MSG_PING })
        );
    }

    #[test]
    fn test_unknown_type() {
        let frame = Frame::empty(0x42);
        assert_eq!(
            Message::from_frame(&frame),
            Err(FrameError::UnknownType(0x42))
        );
    }

    #[test]
    fn test_status_clamped_to_capacity() {
        let many = [CameraStatus::Preview; MAX_STATUS_COUNT + 3];
        let msg = Message::status(&many);
        match &msg {
            Message::Status { statuses } => assert_eq!(statuses.len(), MAX_STATUS_COUNT),
            _ => panic!("expected status"),
        }
        assert!(msg.encoded_len() < FRAME_BUFFER_SIZE);
        assert_eq!(Message::decode(&msg.encode().unwrap()).unwrap(), msg);
    }

    #[test]
    fn test_radio_status_unknown_byte_reads_standby() {
        let frame = Frame::new(MSG_STATUS, &[2, 0x07, 0x01]).unwrap();
        let radio = frame.encode_radio().unwrap();
        assert_eq!(
            Message::decode_radio(&radio).unwrap(),
            Message::status(&[CameraStatus::Standby, CameraStatus::Preview])
        );
    }

    fn any_status() -> impl Strategy<Value = CameraStatus> {
        prop_oneof![
            Just(CameraStatus::Standby),
            Just(CameraStatus::Preview),
            Just(CameraStatus::Program),
        ]
    }

    fn any_message() -> impl Strategy<Value = Message> {
        prop_oneof![
            any::<u8>().prop_map(|target_mask| Message::Test { target_mask }),
            proptest::collection::vec(any_status(), 0..=MAX_STATUS_COUNT)
                .prop_map(|statuses| Message::status(&statuses)),
            Just(Message::Ping),
            Just(Message::Pong),
            Just(Message::Ok),
            Just(Message::Error),
        ]
    }

    proptest! {
        #[test]
        fn prop_radio_roundtrip(msg in any_message()) {
            let radio = msg.encode_radio().unwrap();
            prop_assert_eq!(radio.len(), msg.encoded_len());
            prop_assert_eq!(Message::decode_radio(&radio).unwrap(), msg);
        }

        #[test]
        fn prop_single_bit_flip_detected(
            msg in any_message(),
            byte_seed in any::<usize>(),
            bit in 0u8..8,
        ) {
            let mut radio = msg.encode_radio().unwrap();
            let idx = byte_seed % radio.len();
            radio[idx] ^= 1 << bit;
            prop_assert!(Message::decode_radio(&radio).is_err());
        }

        #[test]
        fn prop_whitening_touches_every_byte(msg in any_message()) {
            let plain = msg.encode().unwrap();
            let radio = msg.encode_radio().unwrap();
            for (p, r) in plain.iter().zip(radio.iter()) {
                prop_assert_eq!(*p ^ XOR_KEY, *r);
            }
        }
    }
}
