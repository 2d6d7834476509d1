//!# SPI CRC-16
//! CRC used by the `READ_CRC`, `WRITE_CRC` and `WRITE_SAFE` instructions.
//!
//! Polynomial `0x8005`, seed `0xFFFF`, no reflection and no final XOR. The CRC covers the
//! command bytes, the optional length byte and the data bytes.
//!
//! ```
//!# use mcp25xxfd::crc::calculate_crc16;
//! assert_eq!(0xAEE7, calculate_crc16(b"123456789"));
//! ```

const POLYNOMIAL: u16 = 0x8005;

pub(crate) const SEED: u16 = 0xFFFF;

/// Lookup table for a left shifting CRC over [POLYNOMIAL]
pub(crate) const CRC_TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut index = 0;

    while index < 256 {
        let mut crc = (index as u16) << 8;
        let mut bit = 0;

        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }

        table[index] = crc;
        index += 1;
    }

    table
}

/// Calculates the CRC-16 over the given bytes
pub fn calculate_crc16(data: &[u8]) -> u16 {
    update_crc16(SEED, data)
}

/// Continues a running CRC with further bytes
pub(crate) fn update_crc16(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, byte| {
        let index = ((crc >> 8) as u8 ^ byte) as usize;
        (crc << 8) ^ CRC_TABLE[index]
    })
}
