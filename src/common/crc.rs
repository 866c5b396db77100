// src/common/crc.rs

use super::error::Scd30Error;

// Lookup tables for the MODBUS CRC-16 (reflected polynomial 0xA001).
// TABLE_CRC_HI feeds the byte transmitted first, TABLE_CRC_LO the byte transmitted second.
// See "Modbus over serial line" v1.02, section 6.2.2.
const TABLE_CRC_HI: [u8; 256] = [
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40, 0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41,
    0x00, 0xC1, 0x81, 0x40, 0x01, 0xC0, 0x80, 0x41, 0x01, 0xC0, 0x80, 0x41, 0x00, 0xC1, 0x81, 0x40,
];

const TABLE_CRC_LO: [u8; 256] = [
    0x00, 0xC0, 0xC1, 0x01, 0xC3, 0x03, 0x02, 0xC2, 0xC6, 0x06, 0x07, 0xC7, 0x05, 0xC5, 0xC4, 0x04,
    0xCC, 0x0C, 0x0D, 0xCD, 0x0F, 0xCF, 0xCE, 0x0E, 0x0A, 0xCA, 0xCB, 0x0B, 0xC9, 0x09, 0x08, 0xC8,
    0xD8, 0x18, 0x19, 0xD9, 0x1B, 0xDB, 0xDA, 0x1A, 0x1E, 0xDE, 0xDF, 0x1F, 0xDD, 0x1D, 0x1C, 0xDC,
    0x14, 0xD4, 0xD5, 0x15, 0xD7, 0x17, 0x16, 0xD6, 0xD2, 0x12, 0x13, 0xD3, 0x11, 0xD1, 0xD0, 0x10,
    0xF0, 0x30, 0x31, 0xF1, 0x33, 0xF3, 0xF2, 0x32, 0x36, 0xF6, 0xF7, 0x37, 0xF5, 0x35, 0x34, 0xF4,
    0x3C, 0xFC, 0xFD, 0x3D, 0xFF, 0x3F, 0x3E, 0xFE, 0xFA, 0x3A, 0x3B, 0xFB, 0x39, 0xF9, 0xF8, 0x38,
    0x28, 0xE8, 0xE9, 0x29, 0xEB, 0x2B, 0x2A, 0xEA, 0xEE, 0x2E, 0x2F, 0xEF, 0x2D, 0xED, 0xEC, 0x2C,
    0xE4, 0x24, 0x25, 0xE5, 0x27, 0xE7, 0xE6, 0x26, 0x22, 0xE2, 0xE3, 0x23, 0xE1, 0x21, 0x20, 0xE0,
    0xA0, 0x60, 0x61, 0xA1, 0x63, 0xA3, 0xA2, 0x62, 0x66, 0xA6, 0xA7, 0x67, 0xA5, 0x65, 0x64, 0xA4,
    0x6C, 0xAC, 0xAD, 0x6D, 0xAF, 0x6F, 0x6E, 0xAE, 0xAA, 0x6A, 0x6B, 0xAB, 0x69, 0xA9, 0xA8, 0x68,
    0x78, 0xB8, 0xB9, 0x79, 0xBB, 0x7B, 0x7A, 0xBA, 0xBE, 0x7E, 0x7F, 0xBF, 0x7D, 0xBD, 0xBC, 0x7C,
    0xB4, 0x74, 0x75, 0xB5, 0x77, 0xB7, 0xB6, 0x76, 0x72, 0xB2, 0xB3, 0x73, 0xB1, 0x71, 0x70, 0xB0,
    0x50, 0x90, 0x91, 0x51, 0x93, 0x53, 0x52, 0x92, 0x96, 0x56, 0x57, 0x97, 0x55, 0x95, 0x94, 0x54,
    0x9C, 0x5C, 0x5D, 0x9D, 0x5F, 0x9F, 0x9E, 0x5E, 0x5A, 0x9A, 0x9B, 0x5B, 0x99, 0x59, 0x58, 0x98,
    0x88, 0x48, 0x49, 0x89, 0x4B, 0x8B, 0x8A, 0x4A, 0x4E, 0x8E, 0x8F, 0x4F, 0x8D, 0x4D, 0x4C, 0x8C,
    0x44, 0x84, 0x85, 0x45, 0x87, 0x47, 0x46, 0x86, 0x82, 0x42, 0x43, 0x83, 0x41, 0x81, 0x80, 0x40,
];

/// Calculates the CRC-16/MODBUS checksum of `data`.
///
/// Table-driven, with both running bytes seeded to `0xFF`. The returned value is
/// the catalogued CRC-16/MODBUS number (check value `0x4B37` for `"123456789"`),
/// so on the wire it goes out low byte first, see [`encode_crc`].
///
/// # Arguments
///
/// * `data`: The bytes covered by the checksum. For a request frame these are
///   the first six bytes (address, function, register, argument).
///
/// # Returns
///
/// The calculated 16-bit CRC value.
pub fn calculate_crc16(data: &[u8]) -> u16 {
    let mut crc_hi: u8 = 0xFF;
    let mut crc_lo: u8 = 0xFF;

    for byte in data {
        let index = usize::from(crc_hi ^ byte);
        crc_hi = crc_lo ^ TABLE_CRC_HI[index];
        crc_lo = TABLE_CRC_LO[index];
    }

    // crc_hi is the byte sent first, i.e. the low byte of the numeric value
    u16::from_le_bytes([crc_hi, crc_lo])
}

/// Encodes a CRC value into the two bytes (LSB first) that terminate a frame.
#[inline]
pub fn encode_crc(crc_value: u16) -> [u8; 2] {
    crc_value.to_le_bytes()
}

/// Decodes the two trailing CRC bytes (LSB first) of a frame.
///
/// # Panics
///
/// Panics if `crc_bytes` does not have a length of exactly 2.
pub fn decode_crc(crc_bytes: &[u8]) -> u16 {
    assert_eq!(crc_bytes.len(), 2, "Frame CRC must be 2 bytes long");
    u16::from_le_bytes([crc_bytes[0], crc_bytes[1]])
}

/// Verifies the trailing CRC of a received frame.
///
/// # Arguments
///
/// * `frame_with_crc`: The complete frame including its 2-byte CRC.
///
/// # Returns
///
/// * `Ok(())` if the CRC is valid.
/// * `Err(Scd30Error::IncompleteFrame)` if the buffer cannot even hold a CRC.
/// * `Err(Scd30Error::CrcMismatch)` if the CRCs don't match.
pub fn verify_response_crc<E>(frame_with_crc: &[u8]) -> Result<(), Scd30Error<E>>
where
    E: core::fmt::Debug,
{
    if frame_with_crc.len() < 3 {
        return Err(Scd30Error::IncompleteFrame { needed: 3, got: frame_with_crc.len() });
    }
    let data_len = frame_with_crc.len() - 2;
    let calculated = calculate_crc16(&frame_with_crc[..data_len]);
    let received = decode_crc(&frame_with_crc[data_len..]);

    if calculated == received {
        Ok(())
    } else {
        Err(Scd30Error::CrcMismatch { expected: received, calculated })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crc::{Crc, CRC_16_MODBUS};

    const REFERENCE: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct MockIoError;

    // Bit-serial CRC-16/MODBUS, no tables.
    fn crc16_bitwise(data: &[u8]) -> u16 {
        let mut crc: u16 = 0xFFFF;
        for &byte in data {
            crc ^= u16::from(byte);
            for _ in 0..8 {
                if crc & 0x0001 != 0 {
                    crc = (crc >> 1) ^ 0xA001;
                } else {
                    crc >>= 1;
                }
            }
        }
        crc
    }

    #[test]
    fn test_catalogue_check_value() {
        assert_eq!(calculate_crc16(b"123456789"), 0x4B37);
    }

    #[test]
    fn test_empty_input_is_seed() {
        assert_eq!(calculate_crc16(&[]), 0xFFFF);
    }

    #[test]
    fn test_ready_status_request_vector() {
        // Sensirion interface description: 61 03 00 27 00 01 3D A1
        let crc = calculate_crc16(&[0x61, 0x03, 0x00, 0x27, 0x00, 0x01]);
        assert_eq!(encode_crc(crc), [0x3D, 0xA1]);
    }

    #[test]
    fn test_start_measurement_request_vector() {
        // 61 06 00 36 00 00 60 64
        let crc = calculate_crc16(&[0x61, 0x06, 0x00, 0x36, 0x00, 0x00]);
        assert_eq!(encode_crc(crc), [0x60, 0x64]);
    }

    #[test]
    fn test_tables_match_bitwise_for_every_single_byte() {
        for byte in 0..=255u8 {
            assert_eq!(calculate_crc16(&[byte]), crc16_bitwise(&[byte]), "byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_matches_reference_on_pseudo_random_sequences() {
        // Small LCG so the sequences are reproducible
        let mut seed: u32 = 0x1234_5678;
        let mut buffer = [0u8; 64];
        for len in 0..buffer.len() {
            for slot in buffer[..len].iter_mut() {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                *slot = (seed >> 24) as u8;
            }
            let data = &buffer[..len];
            assert_eq!(calculate_crc16(data), REFERENCE.checksum(data), "len {}", len);
            assert_eq!(calculate_crc16(data), crc16_bitwise(data), "len {}", len);
        }
    }

    #[test]
    fn test_encode_decode_binary() {
        assert_eq!(encode_crc(0xA13D), [0x3D, 0xA1]);
        assert_eq!(decode_crc(&[0x3D, 0xA1]), 0xA13D);
    }

    #[test]
    #[should_panic]
    fn test_decode_crc_wrong_length() {
        decode_crc(&[0x01]);
    }

    #[test]
    fn test_verify_response_crc() {
        // Ready-status response, data ready = 1
        let good = [0x61, 0x03, 0x02, 0x00, 0x01, 0xF9, 0x8C];
        assert!(verify_response_crc::<MockIoError>(&good).is_ok());

        let mut bad = good;
        bad[4] = 0x00;
        assert!(matches!(
            verify_response_crc::<MockIoError>(&bad),
            Err(Scd30Error::CrcMismatch { expected: 0x8CF9, .. })
        ));

        assert!(matches!(
            verify_response_crc::<MockIoError>(&[0x61, 0x03]),
            Err(Scd30Error::IncompleteFrame { needed: 3, got: 2 })
        ));
    }
}
