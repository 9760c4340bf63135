//! CRC16 used by every tally frame.
//!
//! Non-reflected polynomial 0x8001 with a zero initial value and no final
//! XOR. The check value over `"123456789"` is 0xA829.

use crc::Crc;

const TALLY_CRC: Crc<u16> = Crc::<u16>::new(&crc::Algorithm {
    width: 16,
    poly: 0x8001,
    init: 0x0000,
    refin: false,
    refout: false,
    xorout: 0x0000,
    check: 0xa829,
    residue: 0x0000,
});

/// Compute the frame checksum over `data`
pub fn checksum(data: &[u8]) -> u16 {
    TALLY_CRC.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0xA829);
    }

    #[test]
    fn test_known_frames() {
        assert_eq!(checksum(&[0x05, 0x01, 0x02]), 0x01F8);
        assert_eq!(checksum(&[0x04, 0x03]), 0x87FD);
        assert_eq!(checksum(&[0x04, 0x04]), 0x07F8);
        assert_eq!(checksum(&[0x04, 0x00]), 0x87FF);
        assert_eq!(checksum(&[0x04, 0xFF]), 0x8755);
        assert_eq!(checksum(&[0x09, 0x02, 0x04, 0x00, 0x00, 0x02, 0x00]), 0x5596);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(checksum(&[]), 0x0000);
    }
}
