// src/common/frame.rs

use super::command::FunctionCode;
use super::crc::{calculate_crc16, encode_crc};

/// Fixed Modbus device address of the SCD30.
pub const DEVICE_ADDRESS: u8 = 0x61;

/// Length of every request frame.
pub const REQUEST_FRAME_LEN: usize = 8;

/// A complete request frame: address, function, register (BE), argument (BE), CRC (LE).
pub type Frame = [u8; REQUEST_FRAME_LEN];

/// Parity setting of the serial line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Serial line discipline requested from the transport.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameFormat {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: Parity,
}

impl FrameFormat {
    /// The only format the SCD30 UART supports: 19200 baud, 8 data bits, 1 stop bit, no parity.
    pub const SCD30: FrameFormat = FrameFormat {
        baud_rate: 19_200,
        data_bits: 8,
        stop_bits: 1,
        parity: Parity::None,
    };
}

impl Default for FrameFormat {
    fn default() -> Self {
        FrameFormat::SCD30
    }
}

/// Builds the 8-byte request frame for one command.
///
/// The CRC is computed over the first six bytes and appended low byte first.
pub fn build_frame(function: FunctionCode, register_address: u16, argument: u16) -> Frame {
    let [addr_hi, addr_lo] = register_address.to_be_bytes();
    let [arg_hi, arg_lo] = argument.to_be_bytes();

    let mut frame: Frame = [DEVICE_ADDRESS, function.code(), addr_hi, addr_lo, arg_hi, arg_lo, 0, 0];
    let [crc_lo, crc_hi] = encode_crc(calculate_crc16(&frame[..6]));
    frame[6] = crc_lo;
    frame[7] = crc_hi;
    frame
}
