//! Payload layouts per command code.
//!
//! One table drives both directions: the encoder walks the request layout to
//! pack caller arguments into the 5-byte argument area, the decoder walks the
//! response layout to pull typed fields out of the 6-byte raw payload. Bytes
//! not covered by a field are zero on the way out and ignored on the way in.

use crate::code::CommandCode;
use crate::constants::{ABC_ENABLED, MEASURE_INTERVAL_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Constant byte, consumes no argument
    Fixed(u8),
    /// Boolean. Encodes as `set` or 0, decodes as any non-zero byte
    Flag { set: u8 },
    /// Big-endian unsigned integer of the field width
    UnsignedBe,
    /// ASCII text of the field width
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl Field {
    pub(crate) const fn new(name: &'static str, offset: usize, width: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset,
            width,
            kind,
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }

    /// Whether this field takes a caller argument when encoding.
    pub fn takes_argument(&self) -> bool {
        !matches!(self.kind, FieldKind::Fixed(_))
    }
}

const SET_ABC: &[Field] = &[Field::new("enabled", 0, 1, FieldKind::Flag { set: ABC_ENABLED })];

const SET_MEASURE_INTERVAL: &[Field] = &[
    Field::new("marker", 0, 1, FieldKind::Fixed(MEASURE_INTERVAL_MARKER)),
    Field::new("interval", 1, 2, FieldKind::UnsignedBe),
];

const WRITE_CONFIG: &[Field] = &[
    Field::new("offset", 0, 1, FieldKind::UnsignedBe),
    Field::new("value", 1, 4, FieldKind::UnsignedBe),
];

const READ_CONFIG: &[Field] = &[Field::new("offset", 0, 1, FieldKind::UnsignedBe)];

const GET_ABC_RESPONSE: &[Field] = &[Field::new("ABC", 5, 1, FieldKind::Flag { set: 1 })];

const GET_FIRMWARE_VERSION_RESPONSE: &[Field] = &[Field::new("version", 0, 4, FieldKind::Ascii)];

/// Layout of the argument area of a request frame.
pub fn request_layout(code: CommandCode) -> &'static [Field] {
    match code {
        CommandCode::SetAbc => SET_ABC,
        CommandCode::SetMeasureInterval => SET_MEASURE_INTERVAL,
        CommandCode::WriteConfig0x000
        | CommandCode::WriteConfig0x100
        | CommandCode::WriteConfig0x200
        | CommandCode::WriteConfig0x300 => WRITE_CONFIG,
        CommandCode::ReadConfig0x000
        | CommandCode::ReadConfig0x100
        | CommandCode::ReadConfig0x200
        | CommandCode::ReadConfig0x300 => READ_CONFIG,
        _ => &[],
    }
}

/// Layout of the raw payload of a response frame. Empty when the payload has
/// no known meaning.
pub fn response_layout(code: CommandCode) -> &'static [Field] {
    match code {
        CommandCode::GetAbc => GET_ABC_RESPONSE,
        CommandCode::GetFirmwareVersion => GET_FIRMWARE_VERSION_RESPONSE,
        _ => &[],
    }
}

/// Number of caller arguments a request layout consumes.
pub fn argument_count(code: CommandCode) -> usize {
    request_layout(code).iter().filter(|f| f.takes_argument()).count()
}
