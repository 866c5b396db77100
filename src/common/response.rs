// src/common/response.rs

use super::command::{Command, FunctionCode};
use super::crc::verify_response_crc;
use super::error::Scd30Error;
use super::frame::{Frame, DEVICE_ADDRESS};
use super::types::{co2_from_float, FirmwareVersion, Reading};

/// Address, function code and byte count in front of every read response.
pub const READ_HEADER_LEN: usize = 3;
/// Trailing CRC of every frame.
pub const CRC_LEN: usize = 2;

/// Position of the data-ready flag (low byte of the status word).
pub const READY_FLAG_INDEX: usize = 4;

/// Bytes the measurement decoder needs: header + three 4-byte blocks.
pub const MEASUREMENT_DATA_END: usize = READ_HEADER_LEN + 12;

/// Length of a complete read response for `words` registers.
pub const fn read_response_len(words: u16) -> usize {
    READ_HEADER_LEN + 2 * words as usize + CRC_LEN
}

/// Reports whether a ready-status response signals fresh data.
///
/// True iff byte 4 equals 1. Anything shorter than 5 bytes, including an
/// empty buffer from a silent sensor, is "not ready".
pub fn decode_ready_status(response: &[u8]) -> bool {
    response.get(READY_FLAG_INDEX) == Some(&1)
}

/// Decodes a read-measurement response into a [`Reading`].
///
/// Bytes 3..7 hold CO2, 7..11 temperature and 11..15 humidity, each the
/// big-endian bit pattern of an f32. Header and CRC bytes are not looked at
/// here, see [`check_read_response`].
///
/// # Returns
///
/// * `Ok(Reading)` when at least 15 bytes are present.
/// * `Err(Scd30Error::IncompleteFrame)` otherwise.
pub fn decode_measurement<E>(response: &[u8]) -> Result<Reading, Scd30Error<E>>
where
    E: core::fmt::Debug,
{
    if response.len() < MEASUREMENT_DATA_END {
        return Err(Scd30Error::IncompleteFrame { needed: MEASUREMENT_DATA_END, got: response.len() });
    }

    let block = |offset: usize| -> u32 {
        u32::from_be_bytes([
            response[offset],
            response[offset + 1],
            response[offset + 2],
            response[offset + 3],
        ])
    };

    Ok(Reading {
        co2_ppm: co2_from_float(f32::from_bits(block(3))),
        temperature_c: f32::from_bits(block(7)),
        humidity_percent: f32::from_bits(block(11)),
    })
}

/// Decodes a firmware-version response: major at byte 3, minor at byte 4.
pub fn decode_firmware_version<E>(response: &[u8]) -> Result<FirmwareVersion, Scd30Error<E>>
where
    E: core::fmt::Debug,
{
    match (response.get(3), response.get(4)) {
        (Some(&major), Some(&minor)) => Ok(FirmwareVersion { major, minor }),
        _ => Err(Scd30Error::IncompleteFrame { needed: 5, got: response.len() }),
    }
}

/// Validates the framing of a read-holding-registers response.
///
/// Checks length, device address, function code, byte count and the CRC of
/// the expected frame. Trailing bytes past the expected length are ignored.
/// A silent sensor shows up as `IncompleteFrame` with `got: 0`.
pub fn check_read_response<E>(response: &[u8], command: &Command) -> Result<(), Scd30Error<E>>
where
    E: core::fmt::Debug,
{
    let expected_len = read_response_len(command.word_count());
    if response.len() < expected_len {
        return Err(Scd30Error::IncompleteFrame { needed: expected_len, got: response.len() });
    }
    if response[0] != DEVICE_ADDRESS
        || response[1] != FunctionCode::ReadHoldingRegisters.code()
        || usize::from(response[2]) != 2 * usize::from(command.word_count())
    {
        return Err(Scd30Error::UnexpectedResponse);
    }
    verify_response_crc(&response[..expected_len])
}

/// Checks that a write-single-register response is the echo of `request`.
pub fn check_write_echo<E>(response: &[u8], request: &Frame) -> Result<(), Scd30Error<E>>
where
    E: core::fmt::Debug,
{
    if response.is_empty() {
        Err(Scd30Error::NoResponse)
    } else if response == request.as_slice() {
        Ok(())
    } else {
        Err(Scd30Error::NotAcknowledged)
    }
}
