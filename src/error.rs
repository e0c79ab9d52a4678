// src/error.rs

use mhz19_lib::Mhz19Error;
use thiserror::Error;

/// Errors raised while turning console input into frames on the wire.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid raw payload: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Invalid data {0}: expected a bool, an unsigned 32-bit integer or a list of them")]
    InvalidData(serde_json::Value),

    #[error("Protocol error: {0}")]
    Protocol(#[from] Mhz19Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}
