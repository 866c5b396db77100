// src/common/types.rs

use core::fmt;

// --- Measurement values ---

/// One CO2 / temperature / humidity sample as reported by the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Reading {
    /// CO2 concentration in ppm.
    pub co2_ppm: u16,
    /// Temperature in °C.
    pub temperature_c: f32,
    /// Relative humidity in %.
    pub humidity_percent: f32,
}

impl Reading {
    pub fn temperature_f(&self) -> f32 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    pub fn temperature_k(&self) -> f32 {
        celsius_to_kelvin(self.temperature_c)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ppm CO2, {:.1}°C, {:.1}% RH",
            self.co2_ppm, self.temperature_c, self.humidity_percent
        )
    }
}

#[inline]
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

#[inline]
pub fn celsius_to_kelvin(celsius: f32) -> f32 {
    celsius + 273.15
}

/// Converts the f32 CO2 value from the wire into whole ppm.
///
/// Truncates toward zero. Rust's float-to-int cast saturates, so negative
/// values and NaN become 0 and anything above 65535 becomes 65535.
#[inline]
pub fn co2_from_float(raw: f32) -> u16 {
    raw as u16
}

/// Firmware version, formatted as major.minor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// --- Cached value getters ---

/// Whether a getter's value came from a read that just happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Read from the sensor during this call.
    Fresh,
    /// The cached value; no new data was ready or the refresh failed.
    Stale,
}

/// A value returned by a cached getter, tagged with its freshness.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample<T> {
    pub value: T,
    pub freshness: Freshness,
}

impl<T> Sample<T> {
    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Sample<U> {
        Sample { value: f(self.value), freshness: self.freshness }
    }
}

/// Measurement mode as tracked by the driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MeasurementState {
    #[default]
    Idle,
    Measuring,
}

// --- Argument domains (datasheet section 1.4) ---

/// Inclusive `[min, max]` domain of a setter argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValueRange {
    pub min: u16,
    pub max: u16,
}

impl ValueRange {
    pub const fn contains(&self, value: u16) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const FORCED_RECALIBRATION_RANGE: ValueRange = ValueRange { min: 400, max: 2000 };
pub const MEASUREMENT_INTERVAL_RANGE: ValueRange = ValueRange { min: 2, max: 1800 };
pub const AMBIENT_PRESSURE_RANGE: ValueRange = ValueRange { min: 700, max: 1200 };

/// Converts a temperature offset in °C into register ticks (0.01 °C).
///
/// Truncates toward zero; negative offsets saturate to 0 since the register is unsigned.
#[inline]
pub fn temperature_offset_ticks(offset_c: f32) -> u16 {
    (offset_c * 100.0) as u16
}
