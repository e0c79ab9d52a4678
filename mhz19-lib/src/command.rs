use crate::code::{CommandCode, ConfigFamily, RequestCode, resolve_family};
use crate::constants::{ARGS_LEN, CONFIG_OFFSET_MAX};
use crate::error::Mhz19Error;
use crate::frame::Frame;
use crate::layout::{Field, FieldKind, request_layout};
use byteorder::{BigEndian, ByteOrder};
use tracing::trace;

/// Encode a request into a frame.
///
/// A generic config family takes the 10-bit offset as `args[0]` and is
/// resolved to its concrete sub-code before packing. `raw`, when given,
/// replaces the argument area verbatim and must be exactly 5 bytes.
pub fn encode(code: RequestCode, args: &[u32], raw: Option<&[u8]>) -> Result<Frame, Mhz19Error> {
    if let Some(raw) = raw {
        let args: [u8; ARGS_LEN] = raw.try_into().map_err(|_| Mhz19Error::InvalidRawLength {
            expected: ARGS_LEN,
            actual: raw.len(),
        })?;
        let concrete = match code {
            RequestCode::Command(concrete) => concrete,
            RequestCode::Family(family) => family.base(),
        };
        return Ok(Frame::request(concrete, args));
    }

    let (concrete, args) = match code {
        RequestCode::Command(concrete) => (concrete, args.to_vec()),
        RequestCode::Family(family) => {
            let offset = *args.first().ok_or(Mhz19Error::MissingArgument { code, index: 0 })?;
            if offset > u32::from(CONFIG_OFFSET_MAX) {
                return Err(Mhz19Error::OffsetOutOfRange(offset));
            }
            let (concrete, low) = resolve_family(family, offset as u16);
            let mut resolved = args.to_vec();
            resolved[0] = u32::from(low);
            (concrete, resolved)
        }
    };

    let payload = pack_arguments(code, request_layout(concrete), &args)?;
    let frame = Frame::request(concrete, payload);
    trace!(%code, %concrete, frame = ?frame.as_bytes(), "encoded request");
    Ok(frame)
}

pub(crate) fn pack_arguments(
    code: RequestCode,
    fields: &[Field],
    args: &[u32],
) -> Result<[u8; ARGS_LEN], Mhz19Error> {
    let mut payload = [0u8; ARGS_LEN];
    let mut next = 0;
    for field in fields {
        let slot = &mut payload[field.range()];
        if let FieldKind::Fixed(byte) = field.kind {
            slot.fill(byte);
            continue;
        }

        let index = next;
        next += 1;
        let value = *args
            .get(index)
            .ok_or(Mhz19Error::MissingArgument { code, index })?;

        match field.kind {
            FieldKind::Flag { set } => slot[0] = if value != 0 { set } else { 0 },
            FieldKind::UnsignedBe => {
                if field.width < 4 && value >> (field.width * 8) != 0 {
                    return Err(out_of_range(code, index, value, field.width));
                }
                BigEndian::write_uint(slot, u64::from(value), field.width);
            }
            // characters packed high byte first, e.g. 0x30343433 is "0443"
            FieldKind::Ascii => {
                let chars = value.to_be_bytes();
                let (high, low) = chars.split_at(4 - field.width.min(4));
                if high.iter().any(|b| *b != 0) || !low.is_ascii() {
                    return Err(out_of_range(code, index, value, field.width));
                }
                slot[..low.len()].copy_from_slice(low);
            }
            FieldKind::Fixed(_) => {}
        }
    }
    Ok(payload)
}

fn out_of_range(code: RequestCode, index: usize, value: u32, width: usize) -> Mhz19Error {
    Mhz19Error::ArgumentOutOfRange {
        code,
        index,
        value,
        width,
    }
}

/// Typed form of every request the sensor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetAbc(bool),
    GetAbc,
    /// Measurement cycle in seconds
    SetMeasureInterval(u16),
    /// Write a 32-bit value into the config area, `offset` in `0..=0x3FF`
    WriteConfig { offset: u16, value: u32 },
    /// Read from the config area, `offset` in `0..=0x3FF`
    ReadConfig { offset: u16 },
    Reset,
    GetFirmwareVersion,
    /// Any code with a hand-made argument area
    Raw { code: CommandCode, args: [u8; ARGS_LEN] },
}

impl Command {
    pub fn encode(&self) -> Result<Frame, Mhz19Error> {
        match *self {
            Command::SetAbc(enabled) => encode(CommandCode::SetAbc.into(), &[u32::from(enabled)], None),
            Command::GetAbc => encode(CommandCode::GetAbc.into(), &[], None),
            Command::SetMeasureInterval(seconds) => {
                encode(CommandCode::SetMeasureInterval.into(), &[u32::from(seconds)], None)
            }
            Command::WriteConfig { offset, value } => {
                encode(ConfigFamily::Write.into(), &[u32::from(offset), value], None)
            }
            Command::ReadConfig { offset } => encode(ConfigFamily::Read.into(), &[u32::from(offset)], None),
            Command::Reset => encode(CommandCode::Reset.into(), &[], None),
            Command::GetFirmwareVersion => encode(CommandCode::GetFirmwareVersion.into(), &[], None),
            Command::Raw { code, args } => encode(code.into(), &[], Some(&args[..])),
        }
    }
}

impl TryFrom<Command> for Frame {
    type Error = Mhz19Error;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        command.encode()
    }
}
