//! CRC-24 checksum for Mode S frames

/// CRC-24 polynomial used in Mode S (0x1FFF409)
const CRC24_POLY: u32 = 0x1FFF409;

/// Compute the CRC-24 remainder over a whole frame.
///
/// Transmitters fold the checksum into the trailing parity bits, so a
/// clean frame leaves a remainder of 0.
pub fn checksum(frame: &[u8]) -> u32 {
    let mut crc: u32 = 0;

    for &byte in frame {
        crc ^= (byte as u32) << 16;

        for _ in 0..8 {
            if crc & 0x80_0000 != 0 {
                crc = (crc << 1) ^ CRC24_POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc & 0xFF_FFFF
}
