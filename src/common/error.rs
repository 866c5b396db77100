// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum Scd30Error<E = ()>
where
    E: core::fmt::Debug, // Needed for the generic Io error
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A byte write or flush did not complete within its budget.
    #[error("Operation timed out")]
    Timeout,

    /// Response was shorter than the decoder requires.
    #[error("Incomplete frame: needed {needed} bytes, got {got}")]
    IncompleteFrame { needed: usize, got: usize },

    /// Nothing was buffered after the settle delay.
    #[error("No response from sensor")]
    NoResponse,

    /// Received CRC does not match calculated CRC.
    #[error("CRC mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { expected: u16, calculated: u16 },

    /// Response carried the wrong device address, function code or byte count.
    #[error("Unexpected response received")]
    UnexpectedResponse,

    /// A write-register response was not the echo of the request.
    #[error("Command not acknowledged")]
    NotAcknowledged,

    /// Setter argument outside the documented range; nothing was sent.
    #[error("Value {value} out of range [{min}, {max}]")]
    ValueOutOfRange { value: u16, min: u16, max: u16 },
}

impl<E: core::fmt::Debug> Scd30Error<E> {
    /// True for decode/verification failures, as opposed to transport failures.
    ///
    /// These are the errors the cached-value getters degrade to a stale sample on.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Scd30Error::IncompleteFrame { .. }
                | Scd30Error::NoResponse
                | Scd30Error::CrcMismatch { .. }
                | Scd30Error::UnexpectedResponse
                | Scd30Error::NotAcknowledged
        )
    }
}

// No `From<E>`: transport errors are wrapped with `map_err(Scd30Error::Io)`.
