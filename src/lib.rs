// src/lib.rs

#![cfg_attr(not(test), no_std)]

pub mod common;
pub mod session;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use common::{
    FirmwareVersion, FrameFormat, Freshness, MeasurementState, Reading, Sample, Scd30Error,
    Scd30Serial, Scd30Timer,
};
pub use session::{AckPolicy, Scd30, SessionConfig};

#[cfg(feature = "impl-native")]
pub use common::NativeAdapter;
