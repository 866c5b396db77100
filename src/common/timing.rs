// src/common/timing.rs

use core::time::Duration;

// === Command/Response Timing ===

/// Default wait between transmitting a request and draining its response.
/// The sensor needs this long to process a command and queue its answer.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Delay between retries when the transport reports `WouldBlock` on write/flush.
pub const POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Extra allowance on top of the nominal transmit time of a frame.
pub const WRITE_MARGIN: Duration = Duration::from_millis(20);

/// Budget for the transmit buffer to empty after the last byte was queued.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(10);

// === Measurement Interval (datasheet section 1.4.3) ===

/// Factory default interval applied by `initialize`.
pub const DEFAULT_MEASUREMENT_INTERVAL_S: u16 = 2;

// === Byte Timing at 19200 Baud (8N1) ===
// 1 start bit + 8 data bits + 1 stop bit = 10 bits per byte
// Time per bit = 1 / 19200 s = 52.083 us
// Time per byte = 10 / 19200 s = 520.83 us

/// Nominal duration of a single bit at 19200 baud.
pub const BIT_DURATION: Duration = Duration::from_nanos(52_083);
/// Nominal duration of a single byte (10 bits total) at 19200 baud, 8N1.
pub const BYTE_DURATION: Duration = Duration::from_nanos(520_833);
