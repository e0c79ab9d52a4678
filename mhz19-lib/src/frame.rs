use crate::code::CommandCode;
use crate::constants::{ARGS_LEN, BODY_LEN, FRAME_LEN, HEADER_BYTE, PAYLOAD_LEN, SENSOR_ADDRESS};
use crate::error::Mhz19Error;
use bytes::Bytes;

/// Two's complement of the byte sum, mod 256.
///
/// Computed over the 7 bytes at offsets 1..8 of a frame. Shared by the
/// encoder and the decoder.
pub fn checksum(body: &[u8]) -> u8 {
    let sum = body.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    (0xFFu8 - sum).wrapping_add(1)
}

/// A single 9-byte frame with a correct header and checksum.
///
/// ```text
/// offset  0      1      2..8            8
///         0xFF   code   raw payload     checksum    (sensor -> host)
///         0xFF   0x01   code + 5 args   checksum    (host -> sensor)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Build a frame from the 7 checksummed bytes, adding header and checksum.
    pub fn new(body: [u8; BODY_LEN]) -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = HEADER_BYTE;
        bytes[1..FRAME_LEN - 1].copy_from_slice(&body);
        bytes[FRAME_LEN - 1] = checksum(&body);
        Frame(bytes)
    }

    /// Host -> sensor frame for a concrete code and its packed argument area.
    pub fn request(code: CommandCode, args: [u8; ARGS_LEN]) -> Self {
        let mut body = [0u8; BODY_LEN];
        body[0] = SENSOR_ADDRESS;
        body[1] = code.into();
        body[2..].copy_from_slice(&args);
        Frame::new(body)
    }

    /// Sensor -> host frame, as the sensor would send it.
    pub fn response(code: CommandCode, raw: [u8; PAYLOAD_LEN]) -> Self {
        let mut body = [0u8; BODY_LEN];
        body[0] = code.into();
        body[1..].copy_from_slice(&raw);
        Frame::new(body)
    }

    /// Validate the first 9 bytes of `bytes` as a frame.
    pub fn parse(bytes: &[u8]) -> Result<Self, Mhz19Error> {
        let window = bytes.get(..FRAME_LEN).ok_or(Mhz19Error::InsufficientData {
            expected: FRAME_LEN,
            actual: bytes.len(),
        })?;
        let mut candidate = [0u8; FRAME_LEN];
        candidate.copy_from_slice(window);

        if candidate[0] != HEADER_BYTE {
            return Err(Mhz19Error::InvalidHeader(candidate[0]));
        }
        let expected = checksum(&candidate[1..FRAME_LEN - 1]);
        let actual = candidate[FRAME_LEN - 1];
        if expected != actual {
            return Err(Mhz19Error::ChecksumMismatch { expected, actual });
        }
        Ok(Frame(candidate))
    }

    /// Byte at offset 1: the code of a response, the sensor address of a request.
    pub fn code_byte(&self) -> u8 {
        self.0[1]
    }

    pub fn code(&self) -> CommandCode {
        CommandCode::from(self.code_byte())
    }

    /// Offsets 2..8.
    pub fn payload(&self) -> [u8; PAYLOAD_LEN] {
        let mut raw = [0u8; PAYLOAD_LEN];
        raw.copy_from_slice(&self.0[2..FRAME_LEN - 1]);
        raw
    }

    pub fn checksum(&self) -> u8 {
        self.0[FRAME_LEN - 1]
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Frame> for [u8; FRAME_LEN] {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

impl From<Frame> for Bytes {
    fn from(frame: Frame) -> Self {
        Bytes::copy_from_slice(&frame.0)
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = Mhz19Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Frame::parse(bytes)
    }
}
