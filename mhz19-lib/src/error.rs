use crate::code::{CommandCode, RequestCode};
use thiserror::Error;

/// The primary error type for the `mhz19-lib` library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Mhz19Error {
    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Invalid header byte {0:#04x}")]
    InvalidHeader(u8),

    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Config offset {0:#x} is outside 0x000..=0x3ff")]
    OffsetOutOfRange(u32),

    #[error("{code}: missing argument #{index}")]
    MissingArgument { code: RequestCode, index: usize },

    #[error("{code}: argument #{index} value {value:#x} does not fit in {width} byte(s)")]
    ArgumentOutOfRange {
        code: RequestCode,
        index: usize,
        value: u32,
        width: usize,
    },

    #[error("Raw payload must be {expected} bytes, got {actual}")]
    InvalidRawLength { expected: usize, actual: usize },

    #[error("Unknown command name: {0}")]
    UnknownCommand(String),

    #[error("{0} is not a valid command code")]
    UnrecognizedCode(CommandCode),
}
