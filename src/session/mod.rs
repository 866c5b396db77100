// src/session/mod.rs

pub mod config;
mod io_helpers;
mod transaction;

pub use config::{AckPolicy, SessionConfig};

use crate::common::{
    command::{Command, Register},
    error::Scd30Error,
    frame::FrameFormat,
    hal_traits::{Scd30Serial, Scd30Timer},
    response::{decode_firmware_version, decode_measurement, decode_ready_status},
    timing,
    types::{
        celsius_to_fahrenheit, celsius_to_kelvin, temperature_offset_ticks, FirmwareVersion,
        Freshness, MeasurementState, Reading, Sample, ValueRange, AMBIENT_PRESSURE_RANGE,
        FORCED_RECALIBRATION_RANGE, MEASUREMENT_INTERVAL_RANGE,
    },
};

/// Words in the measurement block: CO2, temperature, humidity as f32 each.
const MEASUREMENT_WORDS: u16 = 6;

/// An SCD30 on a serial line, driven with blocking request/response exchanges.
///
/// Keeps the last successful [`Reading`] so the getters can fall back to it
/// when no new data is ready.
#[derive(Debug)]
pub struct Scd30<IF> {
    interface: IF,
    config: SessionConfig,
    state: MeasurementState,
    last_reading: Reading,
    firmware_version: Option<FirmwareVersion>,
}

impl<IF> Scd30<IF>
where
    IF: Scd30Serial + Scd30Timer,
{
    pub fn new(interface: IF) -> Self {
        Self::with_config(interface, SessionConfig::default())
    }

    pub fn with_config(interface: IF, config: SessionConfig) -> Self {
        Scd30 {
            interface,
            config,
            state: MeasurementState::Idle,
            last_reading: Reading::default(),
            firmware_version: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> MeasurementState {
        self.state
    }

    pub fn is_measuring(&self) -> bool {
        self.state == MeasurementState::Measuring
    }

    /// The cached reading, without touching the sensor.
    pub fn latest_reading(&self) -> Reading {
        self.last_reading
    }

    /// Gives back the interface.
    pub fn release(self) -> IF {
        self.interface
    }

    /// Configures the line for 19200 8N1, starts continuous measurement without
    /// pressure compensation and sets the factory 2 s interval.
    pub fn initialize(&mut self) -> Result<(), Scd30Error<IF::Error>> {
        self.interface.set_config(FrameFormat::SCD30).map_err(Scd30Error::Io)?;
        self.start_continuous_measurement(0)?;
        self.set_measurement_interval(timing::DEFAULT_MEASUREMENT_INTERVAL_S)?;
        Ok(())
    }

    /// Starts continuous measurement. `pressure_offset_mbar` of 0 disables
    /// pressure compensation. The setting survives a power cycle on the sensor.
    pub fn start_continuous_measurement(
        &mut self,
        pressure_offset_mbar: u16,
    ) -> Result<(), Scd30Error<IF::Error>> {
        self.write_register(
            Command::write(Register::StartContinuousMeasurement, pressure_offset_mbar),
            Some(MeasurementState::Measuring),
        )
    }

    pub fn stop_continuous_measurement(&mut self) -> Result<(), Scd30Error<IF::Error>> {
        self.write_register(
            Command::write(Register::StopContinuousMeasurement, 1),
            Some(MeasurementState::Idle),
        )
    }

    /// Polls the data-ready flag.
    ///
    /// A silent or truncated answer reads as "not ready".
    pub fn is_data_available(&mut self) -> Result<bool, Scd30Error<IF::Error>> {
        match self.read_registers(Command::read(Register::DataReadyStatus, 1)) {
            Ok(response) => Ok(decode_ready_status(&response)),
            Err(Scd30Error::IncompleteFrame { got, .. }) => {
                log::debug!("ready status: {} bytes, treating as not ready", got);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Reads the measurement block and updates the cached reading.
    ///
    /// On any error the cached reading is left untouched.
    pub fn fetch_measurement(&mut self) -> Result<Reading, Scd30Error<IF::Error>> {
        let response = self.read_registers(Command::read(Register::ReadMeasurement, MEASUREMENT_WORDS))?;
        let reading = decode_measurement::<IF::Error>(&response)?;
        log::debug!("{}", reading);
        self.last_reading = reading;
        Ok(reading)
    }

    /// Fetches a new reading if one is ready. Protocol errors degrade to stale.
    fn refresh(&mut self) -> Result<Freshness, Scd30Error<IF::Error>> {
        let ready = match self.is_data_available() {
            Ok(ready) => ready,
            Err(e) if e.is_protocol_error() => {
                log::warn!("ready poll failed, using cached reading: {}", e);
                return Ok(Freshness::Stale);
            }
            Err(e) => return Err(e),
        };
        if !ready {
            return Ok(Freshness::Stale);
        }

        match self.fetch_measurement() {
            Ok(_) => Ok(Freshness::Fresh),
            Err(e) if e.is_protocol_error() => {
                log::warn!("measurement read failed, using cached reading: {}", e);
                Ok(Freshness::Stale)
            }
            Err(e) => Err(e),
        }
    }

    /// CO2 concentration in ppm.
    pub fn co2(&mut self) -> Result<Sample<u16>, Scd30Error<IF::Error>> {
        let freshness = self.refresh()?;
        Ok(Sample { value: self.last_reading.co2_ppm, freshness })
    }

    /// Temperature in °C.
    pub fn temperature_c(&mut self) -> Result<Sample<f32>, Scd30Error<IF::Error>> {
        let freshness = self.refresh()?;
        Ok(Sample { value: self.last_reading.temperature_c, freshness })
    }

    pub fn temperature_f(&mut self) -> Result<Sample<f32>, Scd30Error<IF::Error>> {
        Ok(self.temperature_c()?.map(celsius_to_fahrenheit))
    }

    pub fn temperature_k(&mut self) -> Result<Sample<f32>, Scd30Error<IF::Error>> {
        Ok(self.temperature_c()?.map(celsius_to_kelvin))
    }

    /// Relative humidity in %.
    pub fn humidity(&mut self) -> Result<Sample<f32>, Scd30Error<IF::Error>> {
        let freshness = self.refresh()?;
        Ok(Sample { value: self.last_reading.humidity_percent, freshness })
    }

    // --- Configuration ---

    fn check_range(value: u16, range: ValueRange) -> Result<(), Scd30Error<IF::Error>> {
        if range.contains(value) {
            Ok(())
        } else {
            log::warn!("rejected {} outside [{}, {}]", value, range.min, range.max);
            Err(Scd30Error::ValueOutOfRange { value, min: range.min, max: range.max })
        }
    }

    /// Sets the reference CO2 concentration for forced recalibration.
    /// Valid range 400 to 2000 ppm; nothing is sent otherwise.
    pub fn set_forced_recalibration_value(&mut self, ppm: u16) -> Result<(), Scd30Error<IF::Error>> {
        Self::check_range(ppm, FORCED_RECALIBRATION_RANGE)?;
        self.write_register(Command::write(Register::ForcedRecalibration, ppm), None)
    }

    /// Sets the measurement interval, 2 to 1800 seconds.
    pub fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), Scd30Error<IF::Error>> {
        Self::check_range(seconds, MEASUREMENT_INTERVAL_RANGE)?;
        self.write_register(Command::write(Register::MeasurementInterval, seconds), None)
    }

    /// Sets ambient pressure compensation, 700 to 1200 mBar.
    ///
    /// Out-of-range values are not rejected: they are sent as 0, which turns
    /// compensation off. Goes through the start-measurement register, so the
    /// sensor is measuring afterwards.
    pub fn set_ambient_pressure(&mut self, mbar: u16) -> Result<(), Scd30Error<IF::Error>> {
        let argument = if AMBIENT_PRESSURE_RANGE.contains(mbar) {
            mbar
        } else {
            log::warn!("ambient pressure {} mBar out of range, disabling compensation", mbar);
            0
        };
        self.start_continuous_measurement(argument)
    }

    /// Sets the temperature offset of the on-board RH/T sensor, in °C.
    pub fn set_temperature_offset(&mut self, offset_c: f32) -> Result<(), Scd30Error<IF::Error>> {
        let ticks = temperature_offset_ticks(offset_c);
        self.write_register(Command::write(Register::TemperatureOffset, ticks), None)
    }

    /// Sets the altitude above sea level in meters.
    pub fn set_altitude_compensation(&mut self, meters: u16) -> Result<(), Scd30Error<IF::Error>> {
        self.write_register(Command::write(Register::AltitudeCompensation, meters), None)
    }

    pub fn enable_automatic_self_calibration(&mut self) -> Result<(), Scd30Error<IF::Error>> {
        self.write_register(Command::write(Register::AutomaticSelfCalibration, 1), None)
    }

    pub fn disable_automatic_self_calibration(&mut self) -> Result<(), Scd30Error<IF::Error>> {
        self.write_register(Command::write(Register::AutomaticSelfCalibration, 0), None)
    }

    /// Reads the firmware version. Cached after the first successful read.
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, Scd30Error<IF::Error>> {
        if let Some(version) = self.firmware_version {
            return Ok(version);
        }
        let response = self.read_registers(Command::read(Register::FirmwareVersion, 1))?;
        let version = decode_firmware_version::<IF::Error>(&response)?;
        log::debug!("firmware {}", version);
        self.firmware_version = Some(version);
        Ok(version)
    }
}
