// src/common/hal_traits.rs

use super::frame::FrameFormat;
use core::fmt::Debug;

/// Abstraction for the delay operations the driver needs (settle delay, write polling).
///
/// With the `impl-native` feature, [`NativeAdapter`] provides this from any
/// `embedded_hal::delay::DelayNs`.
pub trait Scd30Timer {
    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for the sensor's serial line.
///
/// The driver owns no buffering of its own: it writes whole frames byte by
/// byte and, after the settle delay, drains whatever the transport has
/// buffered until `read_byte` reports `WouldBlock`.
pub trait Scd30Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single already-received byte.
    ///
    /// Returns `Ok(byte)` if a byte was buffered, or `Err(nb::Error::WouldBlock)`
    /// if the receive buffer is empty (no bytes available). It must not wait for
    /// new bytes to arrive. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    ///
    /// Returns `Ok(())` if the flush completed, or `Err(nb::Error::WouldBlock)` if
    /// transmission is still in progress.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Applies the serial line discipline (baud rate, data bits, stop bits, parity).
    ///
    /// This operation might be blocking, hence `Result` instead of `nb::Result`.
    fn set_config(&mut self, config: FrameFormat) -> Result<(), Self::Error>;
}

/// Bundles an `embedded-io` UART and an `embedded-hal` delay into one driver interface.
///
/// The UART must already be configured for [`FrameFormat::SCD30`]; `embedded-io`
/// has no way to change the line discipline, so `set_config` only logs.
#[cfg(feature = "impl-native")]
#[derive(Debug)]
pub struct NativeAdapter<S, D> {
    serial: S,
    delay: D,
}

#[cfg(feature = "impl-native")]
impl<S, D> NativeAdapter<S, D> {
    pub fn new(serial: S, delay: D) -> Self {
        NativeAdapter { serial, delay }
    }

    /// Returns the wrapped UART and delay.
    pub fn release(self) -> (S, D) {
        (self.serial, self.delay)
    }
}

#[cfg(feature = "impl-native")]
impl<S, D> Scd30Serial for NativeAdapter<S, D>
where
    S: embedded_io::Read + embedded_io::ReadReady + embedded_io::Write + embedded_io::WriteReady,
{
    type Error = <S as embedded_io::ErrorType>::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if !self.serial.read_ready().map_err(nb::Error::Other)? {
            return Err(nb::Error::WouldBlock);
        }
        let mut byte = [0u8; 1];
        match self.serial.read(&mut byte).map_err(nb::Error::Other)? {
            1 => Ok(byte[0]),
            _ => Err(nb::Error::WouldBlock),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if !self.serial.write_ready().map_err(nb::Error::Other)? {
            return Err(nb::Error::WouldBlock);
        }
        match self.serial.write(&[byte]).map_err(nb::Error::Other)? {
            1 => Ok(()),
            _ => Err(nb::Error::WouldBlock),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.serial.flush().map_err(nb::Error::Other)
    }

    fn set_config(&mut self, config: FrameFormat) -> Result<(), Self::Error> {
        log::debug!("line discipline owned by the HAL UART, expecting {:?}", config);
        Ok(())
    }
}

#[cfg(feature = "impl-native")]
impl<S, D> Scd30Timer for NativeAdapter<S, D>
where
    D: embedded_hal::delay::DelayNs,
{
    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
