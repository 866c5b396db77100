// src/test_support.rs

use std::collections::VecDeque;
use std::vec::Vec;

use crate::common::{
    command::{FunctionCode, Register},
    crc::{calculate_crc16, encode_crc},
    frame::{Frame, FrameFormat, DEVICE_ADDRESS, REQUEST_FRAME_LEN},
    hal_traits::{Scd30Serial, Scd30Timer},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FakeCommError;

/// Builds a complete read-holding-registers response carrying `data`.
pub fn read_response(data: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(data.len() + 5);
    frame.push(DEVICE_ADDRESS);
    frame.push(FunctionCode::ReadHoldingRegisters.code());
    frame.push(data.len() as u8);
    frame.extend_from_slice(data);
    let crc = encode_crc(calculate_crc16(&frame));
    frame.extend_from_slice(&crc);
    frame
}

/// Builds the 17-byte measurement response for the given float values.
pub fn measurement_response(co2: f32, temperature: f32, humidity: f32) -> Vec<u8> {
    let mut data = [0u8; 12];
    data[..4].copy_from_slice(&co2.to_be_bytes());
    data[4..8].copy_from_slice(&temperature.to_be_bytes());
    data[8..].copy_from_slice(&humidity.to_be_bytes());
    read_response(&data)
}

/// A simulated SCD30 on the far end of the serial line.
///
/// Every complete 8-byte frame written is recorded and answered the way the
/// sensor would, unless a scripted response is queued or the device is silent.
pub struct FakeScd30 {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub frames: Vec<Frame>,
    pending: Vec<u8>,
    pub config: Option<FrameFormat>,
    pub elapsed_us: u64,
    pub silent: bool,
    pub echo_writes: bool,
    pub data_ready: bool,
    pub measurement: (f32, f32, f32),
    pub firmware: (u8, u8),
    pub scripted: VecDeque<Vec<u8>>,
    pub busy_writes: usize,
    pub fail_writes: bool,
}

impl FakeScd30 {
    pub fn new() -> Self {
        FakeScd30 {
            rx: VecDeque::new(),
            tx: Vec::new(),
            frames: Vec::new(),
            pending: Vec::new(),
            config: None,
            elapsed_us: 0,
            silent: false,
            echo_writes: true,
            data_ready: false,
            measurement: (0.0, 0.0, 0.0),
            firmware: (3, 66),
            scripted: VecDeque::new(),
            busy_writes: 0,
            fail_writes: false,
        }
    }

    /// Queues `response` as the answer to the next frame, replacing the simulated one.
    pub fn script(&mut self, response: &[u8]) {
        self.scripted.push_back(response.to_vec());
    }

    /// Number of frames addressed to `register`.
    pub fn count_frames(&self, register: Register) -> usize {
        let [hi, lo] = register.address().to_be_bytes();
        self.frames.iter().filter(|f| f[2] == hi && f[3] == lo).count()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    fn answer(&mut self, frame: &Frame) {
        if let Some(response) = self.scripted.pop_front() {
            self.rx.extend(response);
            return;
        }
        if self.silent {
            return;
        }
        let register = u16::from_be_bytes([frame[2], frame[3]]);
        match frame[1] {
            6 if self.echo_writes => self.rx.extend(frame.iter().copied()),
            3 if register == Register::DataReadyStatus.address() => {
                self.rx.extend(read_response(&[0x00, u8::from(self.data_ready)]));
            }
            3 if register == Register::ReadMeasurement.address() => {
                let (co2, t, rh) = self.measurement;
                self.rx.extend(measurement_response(co2, t, rh));
                self.data_ready = false;
            }
            3 if register == Register::FirmwareVersion.address() => {
                let (major, minor) = self.firmware;
                self.rx.extend(read_response(&[major, minor]));
            }
            _ => {}
        }
    }
}

impl Scd30Timer for FakeScd30 {
    fn delay_us(&mut self, us: u32) {
        self.elapsed_us += u64::from(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_us += u64::from(ms) * 1000;
    }
}

impl Scd30Serial for FakeScd30 {
    type Error = FakeCommError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.fail_writes {
            return Err(nb::Error::Other(FakeCommError));
        }
        if self.busy_writes > 0 {
            self.busy_writes -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.tx.push(byte);
        self.pending.push(byte);
        if self.pending.len() == REQUEST_FRAME_LEN {
            let mut frame: Frame = [0; REQUEST_FRAME_LEN];
            frame.copy_from_slice(&self.pending);
            self.pending.clear();
            self.frames.push(frame);
            self.answer(&frame);
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }

    fn set_config(&mut self, config: FrameFormat) -> Result<(), Self::Error> {
        self.config = Some(config);
        Ok(())
    }
}
