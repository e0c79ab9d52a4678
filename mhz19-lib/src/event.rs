use crate::code::CommandCode;
use crate::constants::PAYLOAD_LEN;
use crate::error::Mhz19Error;
use crate::frame::Frame;
use crate::layout::{FieldKind, response_layout};

/// Typed field decoded from a response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    /// Auto-baseline-correction state
    Abc(bool),
    /// Firmware version, 4 ASCII characters
    Version(String),
}

/// A frame received from the sensor that passed header and checksum checks.
///
/// `reading` is set when the code has a known response layout and the payload
/// matched it. Otherwise `parse_error` may explain why; the raw bytes are
/// always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub code: CommandCode,
    pub raw: [u8; PAYLOAD_LEN],
    pub checksum: u8,
    pub reading: Option<Reading>,
    pub parse_error: Option<String>,
}

impl Event {
    pub fn abc(&self) -> Option<bool> {
        match self.reading {
            Some(Reading::Abc(enabled)) => Some(enabled),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match &self.reading {
            Some(Reading::Version(version)) => Some(version),
            _ => None,
        }
    }
}

impl From<&Frame> for Event {
    fn from(frame: &Frame) -> Self {
        let code = frame.code();
        let raw = frame.payload();
        let (reading, parse_error) = match decode_reading(code, &raw) {
            Ok(reading) => (reading, None),
            Err(message) => (None, Some(message)),
        };
        Event {
            code,
            raw,
            checksum: frame.checksum(),
            reading,
            parse_error,
        }
    }
}

fn decode_reading(code: CommandCode, raw: &[u8; PAYLOAD_LEN]) -> Result<Option<Reading>, String> {
    if !code.is_known() {
        return Err(Mhz19Error::UnrecognizedCode(code).to_string());
    }

    let Some(field) = response_layout(code).first() else {
        return Ok(None);
    };
    let bytes = &raw[field.range()];
    let reading = match field.kind {
        FieldKind::Flag { .. } => Reading::Abc(bytes[0] != 0),
        FieldKind::Ascii => {
            if !bytes.is_ascii() {
                return Err(format!("{} is not ASCII: {:02X?}", field.name, bytes));
            }
            let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
            Reading::Version(text.to_string())
        }
        FieldKind::Fixed(_) | FieldKind::UnsignedBe => return Ok(None),
    };
    Ok(Some(reading))
}
