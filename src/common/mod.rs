// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{Command, FunctionCode, Register};

// From crc.rs
pub use crc::{calculate_crc16, decode_crc, encode_crc, verify_response_crc};

// From error.rs
pub use error::Scd30Error;

// From frame.rs
pub use frame::{build_frame, Frame, FrameFormat, Parity, DEVICE_ADDRESS};

// From hal_traits.rs
pub use hal_traits::{Scd30Serial, Scd30Timer};

// From response.rs
pub use response::{
    check_read_response, check_write_echo, decode_firmware_version, decode_measurement,
    decode_ready_status,
};

// From types.rs
pub use types::{FirmwareVersion, Freshness, MeasurementState, Reading, Sample, ValueRange};

// --- Feature-gated re-exports ---

#[cfg(feature = "impl-native")]
pub use hal_traits::NativeAdapter;
