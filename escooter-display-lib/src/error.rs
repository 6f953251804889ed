use thiserror::Error;

/// The primary error type for the `escooter-display-lib` library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("Invalid frame length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid start marker: expected 0x02, got {0:#04x}")]
    InvalidStartMarker(u8),

    #[error("Checksum mismatch: computed {computed:#04x}, frame carries {received:#04x}")]
    ChecksumMismatch { computed: u8, received: u8 },

    #[error("Unknown operation mode code: {0}")]
    UnknownMode(u8),

    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}
