// src/session/io_helpers.rs

use super::Scd30; // Access Scd30 definition
use crate::common::{
    error::Scd30Error,
    frame::Frame,
    hal_traits::{Scd30Serial, Scd30Timer},
    timing,
};
use arrayvec::ArrayVec;
use core::time::Duration;
use nb::Result as NbResult;

/// Largest response the SCD30 sends (measurement: 17 bytes), with headroom.
pub const RESPONSE_CAPACITY: usize = 32;

/// Upper bound on bytes consumed by one drain, so a noisy line cannot stall the caller.
pub const MAX_DRAIN_BYTES: usize = 256;

/// Bytes collected from the receive buffer after one request.
pub type ResponseBuffer = ArrayVec<u8, RESPONSE_CAPACITY>;

fn micros(duration: Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}

// Implementation block for I/O related helpers
impl<IF> Scd30<IF>
where
    IF: Scd30Serial + Scd30Timer,
{
    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    ///
    /// Elapsed time is accounted from the poll delays, so no clock is needed.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, Scd30Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let poll_us = micros(timing::POLL_INTERVAL);
        let budget_us = micros(timeout);
        let mut waited_us: u32 = 0;

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if waited_us >= budget_us {
                        return Err(Scd30Error::Timeout);
                    }
                    self.interface.delay_us(poll_us);
                    waited_us = waited_us.saturating_add(poll_us);
                }
                Err(nb::Error::Other(e)) => return Err(Scd30Error::Io(e)),
            }
        }
    }

    /// Sends a complete request frame and flushes it onto the line.
    pub(super) fn send_frame(&mut self, frame: &Frame) -> Result<(), Scd30Error<IF::Error>> {
        log::trace!("tx {:02X?}", frame);

        let write_duration = timing::BYTE_DURATION * frame.len() as u32;
        let write_timeout = write_duration + timing::WRITE_MARGIN;

        for byte in frame {
            self.execute_blocking_io_with_timeout(write_timeout, |iface| iface.write_byte(*byte))?;
        }

        self.execute_blocking_io_with_timeout(timing::FLUSH_TIMEOUT, |iface| iface.flush())?;
        Ok(())
    }

    /// Waits the configured settle delay.
    pub(super) fn settle(&mut self) {
        self.interface.delay_us(micros(self.config.settle_delay));
    }

    /// Reads every currently buffered byte, until the transport reports `WouldBlock`.
    ///
    /// Bytes beyond [`RESPONSE_CAPACITY`] are consumed but dropped.
    pub(super) fn drain_response(&mut self) -> Result<ResponseBuffer, Scd30Error<IF::Error>> {
        let mut response = ResponseBuffer::new();
        let mut dropped = 0usize;

        for _ in 0..MAX_DRAIN_BYTES {
            match self.interface.read_byte() {
                Ok(byte) => {
                    if response.try_push(byte).is_err() {
                        dropped += 1;
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(Scd30Error::Io(e)),
            }
        }

        if dropped > 0 {
            log::warn!("response overflow, dropped {} bytes", dropped);
        }
        log::trace!("rx {:02X?}", response.as_slice());
        Ok(response)
    }

    /// Empties the receive buffer before a new request so stale bytes are not decoded.
    pub(super) fn discard_stale_input(&mut self) -> Result<(), Scd30Error<IF::Error>> {
        let mut discarded = 0usize;
        for _ in 0..MAX_DRAIN_BYTES {
            match self.interface.read_byte() {
                Ok(_) => discarded += 1,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(Scd30Error::Io(e)),
            }
        }
        if discarded > 0 {
            log::debug!("discarded {} stale bytes", discarded);
        }
        Ok(())
    }
}
