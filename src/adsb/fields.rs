//! Protocol field helpers: bit packing and downlink format extraction

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Pack a demodulated bit sequence into a hex payload string.
///
/// Only complete nibbles are emitted; a trailing partial nibble is the
/// demodulator overrunning the frame boundary and carries no payload.
pub fn pack_hex(bits: &[u8]) -> String {
    let mut hex = String::with_capacity(bits.len() / 4);

    for nibble in bits.chunks_exact(4) {
        let value = (nibble[0] << 3) | (nibble[1] << 2) | (nibble[2] << 1) | nibble[3];
        hex.push(HEX_DIGITS[value as usize] as char);
    }

    hex
}

/// Downlink format: the first 5 bits of the frame.
pub fn downlink_format(hex: &str) -> Option<u8> {
    let byte = u8::from_str_radix(hex.get(..2)?, 16).ok()?;
    Some(byte >> 3)
}

/// Frame bytes for checksum verification.
pub fn frame_bytes(hex: &str) -> Option<Vec<u8>> {
    hex::decode(hex).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_to_bits(hex: &str) -> Vec<u8> {
        hex::decode(hex)
            .unwrap()
            .iter()
            .flat_map(|byte| (0..8).rev().map(move |k| (byte >> k) & 1))
            .collect()
    }

    #[test]
    fn test_pack_hex_round_trip() {
        let hex = "8D4840D6202CC371C32CE0576098";
        assert_eq!(pack_hex(&hex_to_bits(hex)), hex);
    }

    #[test]
    fn test_pack_hex_drops_partial_nibble() {
        assert_eq!(pack_hex(&[1, 0, 1, 0, 1, 1]), "A");
    }

    #[test]
    fn test_pack_hex_empty() {
        assert_eq!(pack_hex(&[]), "");
    }

    #[test]
    fn test_downlink_format() {
        assert_eq!(downlink_format("8D4840D6202CC371C32CE0576098"), Some(17));
        assert_eq!(downlink_format("20001122AB7542"), Some(4));
        assert_eq!(downlink_format("5D4840D6A0B1C2"), Some(11));
        assert_eq!(downlink_format("X"), None);
        assert_eq!(downlink_format(""), None);
    }

    #[test]
    fn test_frame_bytes() {
        assert_eq!(frame_bytes("8D4840"), Some(vec![0x8D, 0x48, 0x40]));
        assert_eq!(frame_bytes("8D4"), None);
        assert_eq!(frame_bytes("zz"), None);
    }
}
