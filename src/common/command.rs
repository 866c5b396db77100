//! SCD30 Modbus command definitions.
//!
//! See the Sensirion "Interface Description Sensirion SCD30 Sensor Module",
//! section 1.4 "Modbus commands".

use core::fmt;

use super::frame::{build_frame, Frame};

/// Modbus function codes understood by the SCD30.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FunctionCode {
    /// Read one or more 16-bit holding registers (0x03).
    ReadHoldingRegisters,
    /// Write a single 16-bit holding register (0x06).
    WriteSingleHoldingRegister,
}

impl FunctionCode {
    #[inline]
    pub const fn code(&self) -> u8 {
        match self {
            FunctionCode::ReadHoldingRegisters => 3,
            FunctionCode::WriteSingleHoldingRegister => 6,
        }
    }
}

/// Holding registers of the SCD30.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Register {
    /// Trigger continuous measurement, argument is the ambient pressure in mBar (0 = off).
    StartContinuousMeasurement,
    /// Stop continuous measurement.
    StopContinuousMeasurement,
    /// Measurement interval in seconds.
    MeasurementInterval,
    /// Data-ready flag, 1 word.
    DataReadyStatus,
    /// Measurement block: CO2, temperature, humidity as big-endian f32, 6 words.
    ReadMeasurement,
    /// Altitude above sea level in meters.
    AltitudeCompensation,
    /// Forced recalibration reference in ppm.
    ForcedRecalibration,
    /// Automatic self-calibration, 1 = on, 0 = off.
    AutomaticSelfCalibration,
    /// Temperature offset in ticks (1 tick = 0.01 °C).
    TemperatureOffset,
    /// Firmware version, 1 word: major byte, minor byte.
    FirmwareVersion,
}

impl Register {
    /// Register address on the wire.
    pub const fn address(&self) -> u16 {
        match self {
            Register::StartContinuousMeasurement => 0x0036,
            Register::StopContinuousMeasurement => 0x0037,
            Register::MeasurementInterval => 0x0025,
            Register::DataReadyStatus => 0x0027,
            Register::ReadMeasurement => 0x0028,
            Register::AltitudeCompensation => 0x0038,
            Register::ForcedRecalibration => 0x0039,
            Register::AutomaticSelfCalibration => 0x003A,
            Register::TemperatureOffset => 0x003B,
            Register::FirmwareVersion => 0x0020,
        }
    }
}

/// A single request to the sensor.
///
/// For writes `argument` is the register value, for reads it is the number of
/// registers requested.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Command {
    pub function: FunctionCode,
    pub register: Register,
    pub argument: u16,
}

impl Command {
    /// Write-single-holding-register command.
    pub const fn write(register: Register, value: u16) -> Self {
        Command { function: FunctionCode::WriteSingleHoldingRegister, register, argument: value }
    }

    /// Read-holding-registers command for `count` consecutive words.
    pub const fn read(register: Register, count: u16) -> Self {
        Command { function: FunctionCode::ReadHoldingRegisters, register, argument: count }
    }

    /// Number of words a read command asks for (0 for writes).
    pub const fn word_count(&self) -> u16 {
        match self.function {
            FunctionCode::ReadHoldingRegisters => self.argument,
            FunctionCode::WriteSingleHoldingRegister => 0,
        }
    }

    /// Encodes the command into its request frame.
    pub fn to_frame(&self) -> Frame {
        build_frame(self.function, self.register.address(), self.argument)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.function {
            FunctionCode::ReadHoldingRegisters => {
                write!(f, "read {:?} ({:#06x}) x{}", self.register, self.register.address(), self.argument)
            }
            FunctionCode::WriteSingleHoldingRegister => {
                write!(f, "write {:?} ({:#06x}) = {}", self.register, self.register.address(), self.argument)
            }
        }
    }
}
