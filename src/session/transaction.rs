// src/session/transaction.rs

use super::{config::AckPolicy, io_helpers::ResponseBuffer, Scd30};
use crate::common::{
    command::Command,
    error::Scd30Error,
    hal_traits::{Scd30Serial, Scd30Timer},
    response::{check_read_response, check_write_echo},
    types::MeasurementState,
};

impl<IF> Scd30<IF>
where
    IF: Scd30Serial + Scd30Timer,
{
    /// Sends a write-single-register command and handles its acknowledgement.
    ///
    /// `next_state` is the measurement state the command moves the sensor to,
    /// if any. It is applied on send (`Optimistic`) or on a confirmed echo (`Verified`).
    pub(super) fn write_register(
        &mut self,
        command: Command,
        next_state: Option<MeasurementState>,
    ) -> Result<(), Scd30Error<IF::Error>> {
        log::debug!("{}", command);
        let frame = command.to_frame();

        // 1. Drop leftovers so the echo check sees only this exchange
        self.discard_stale_input()?;

        // 2. Send
        self.send_frame(&frame)?;
        if self.config.ack_policy == AckPolicy::Optimistic {
            if let Some(state) = next_state {
                self.transition(state);
            }
        }

        // 3. Wait and collect the answer
        self.settle();
        let response = self.drain_response()?;

        // 4. Acknowledgement
        match self.config.ack_policy {
            AckPolicy::Optimistic => Ok(()),
            AckPolicy::Verified => {
                check_write_echo::<IF::Error>(&response, &frame).map_err(|e| {
                    log::warn!("{} not acknowledged: {} (rx {:02X?})", command, e, response.as_slice());
                    e
                })?;
                if let Some(state) = next_state {
                    self.transition(state);
                }
                Ok(())
            }
        }
    }

    /// Sends a read-holding-registers command and returns the raw response.
    ///
    /// With `check_response_crc` the framing and CRC are validated first.
    pub(super) fn read_registers(
        &mut self,
        command: Command,
    ) -> Result<ResponseBuffer, Scd30Error<IF::Error>> {
        log::debug!("{}", command);
        let frame = command.to_frame();

        self.discard_stale_input()?;
        self.send_frame(&frame)?;
        self.settle();
        let response = self.drain_response()?;

        if self.config.check_response_crc {
            check_read_response::<IF::Error>(&response, &command)?;
        }
        Ok(response)
    }

    pub(super) fn transition(&mut self, next: MeasurementState) {
        if self.state != next {
            log::debug!("measurement state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}
