//! Command codes of the MH-Z19 serial protocol.
//!
//! [`CommandCode`] is the closed set of concrete bytes that appear at the code
//! position of a frame. The config area is addressed through two generic
//! families ([`ConfigFamily`]) that are never sent as-is: bits 8-9 of the
//! 10-bit offset pick one of four concrete sub-codes and only the low byte of
//! the offset travels in the payload.

use crate::constants::{CONFIG_BLOCK_SIZE, CONFIG_OFFSET_MAX};
use crate::error::Mhz19Error;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive, IntoStaticStr)]
#[repr(u8)]
pub enum CommandCode {
    /// bool: auto-baseline-correction on/off
    #[strum(serialize = "SET_ABC")]
    SetAbc = 0x79,
    #[strum(serialize = "GET_ABC")]
    GetAbc = 0x7D,
    /// u16: measurement cycle interval in seconds
    #[strum(serialize = "SET_MEASURE_INTERVAL")]
    SetMeasureInterval = 0x7E,

    // byte (offset), u32 (value): write config area @ block + offset
    #[strum(serialize = "WRITE_CONFIG_0x000")]
    WriteConfig0x000 = 0x80,
    #[strum(serialize = "WRITE_CONFIG_0x100")]
    WriteConfig0x100 = 0x81,
    #[strum(serialize = "WRITE_CONFIG_0x200")]
    WriteConfig0x200 = 0x82,
    #[strum(serialize = "WRITE_CONFIG_0x300")]
    WriteConfig0x300 = 0x83,

    #[strum(serialize = "RESET")]
    Reset = 0x8D,

    // byte (offset): read config area @ block + offset
    #[strum(serialize = "READ_CONFIG_0x000")]
    ReadConfig0x000 = 0x90,
    #[strum(serialize = "READ_CONFIG_0x100")]
    ReadConfig0x100 = 0x91,
    #[strum(serialize = "READ_CONFIG_0x200")]
    ReadConfig0x200 = 0x92,
    #[strum(serialize = "READ_CONFIG_0x300")]
    ReadConfig0x300 = 0x93,

    #[strum(serialize = "GET_FIRMWARE_VERSION")]
    GetFirmwareVersion = 0xA0,

    /// A byte outside the known set, as seen on the wire
    #[num_enum(catch_all)]
    #[strum(serialize = "UNKNOWN")]
    Unknown(u8),
}

impl CommandCode {
    /// Every known code, in wire order.
    pub const ALL: [CommandCode; 13] = [
        CommandCode::SetAbc,
        CommandCode::GetAbc,
        CommandCode::SetMeasureInterval,
        CommandCode::WriteConfig0x000,
        CommandCode::WriteConfig0x100,
        CommandCode::WriteConfig0x200,
        CommandCode::WriteConfig0x300,
        CommandCode::Reset,
        CommandCode::ReadConfig0x000,
        CommandCode::ReadConfig0x100,
        CommandCode::ReadConfig0x200,
        CommandCode::ReadConfig0x300,
        CommandCode::GetFirmwareVersion,
    ];

    pub fn is_known(&self) -> bool {
        !matches!(self, CommandCode::Unknown(_))
    }

    /// Symbolic name, `None` for codes outside the known set.
    pub fn name(&self) -> Option<&'static str> {
        self.is_known().then(|| (*self).into())
    }

    /// The family a concrete config sub-code belongs to, if any.
    pub fn family(&self) -> Option<ConfigFamily> {
        match self {
            CommandCode::WriteConfig0x000
            | CommandCode::WriteConfig0x100
            | CommandCode::WriteConfig0x200
            | CommandCode::WriteConfig0x300 => Some(ConfigFamily::Write),
            CommandCode::ReadConfig0x000
            | CommandCode::ReadConfig0x100
            | CommandCode::ReadConfig0x200
            | CommandCode::ReadConfig0x300 => Some(ConfigFamily::Read),
            _ => None,
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandCode::Unknown(byte) => write!(f, "{:#04x}", byte),
            known => f.write_str(<&'static str>::from(*known)),
        }
    }
}

impl FromStr for CommandCode {
    type Err = Mhz19Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandCode::ALL
            .into_iter()
            .find(|code| code.name() == Some(s))
            .ok_or_else(|| Mhz19Error::UnknownCommand(s.to_string()))
    }
}

/// Generic config-area command groups. Never transmitted themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ConfigFamily {
    #[strum(to_string = "READ_CONFIG")]
    Read,
    #[strum(to_string = "WRITE_CONFIG")]
    Write,
}

impl ConfigFamily {
    /// Sub-code addressing the first 256-byte block.
    pub fn base(&self) -> CommandCode {
        match self {
            ConfigFamily::Read => CommandCode::ReadConfig0x000,
            ConfigFamily::Write => CommandCode::WriteConfig0x000,
        }
    }
}

/// Resolve a generic config family and a 10-bit offset into the concrete
/// sub-code and the offset byte that goes into the payload.
///
/// The offset must be at most [`CONFIG_OFFSET_MAX`]; the encoder rejects
/// anything larger before calling this. Higher bits are ignored here.
pub fn resolve_family(family: ConfigFamily, offset: u16) -> (CommandCode, u8) {
    debug_assert!(offset <= CONFIG_OFFSET_MAX, "config offset {offset:#x} out of range");
    let block = (offset / CONFIG_BLOCK_SIZE) & 0x3;
    let low = (offset & 0xFF) as u8;
    let code = match (family, block) {
        (ConfigFamily::Read, 0) => CommandCode::ReadConfig0x000,
        (ConfigFamily::Read, 1) => CommandCode::ReadConfig0x100,
        (ConfigFamily::Read, 2) => CommandCode::ReadConfig0x200,
        (ConfigFamily::Read, _) => CommandCode::ReadConfig0x300,
        (ConfigFamily::Write, 0) => CommandCode::WriteConfig0x000,
        (ConfigFamily::Write, 1) => CommandCode::WriteConfig0x100,
        (ConfigFamily::Write, 2) => CommandCode::WriteConfig0x200,
        (ConfigFamily::Write, _) => CommandCode::WriteConfig0x300,
    };
    (code, low)
}

/// What a caller names when asking for a frame: either a concrete code or a
/// generic config family that still needs an offset to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestCode {
    Command(CommandCode),
    Family(ConfigFamily),
}

impl From<CommandCode> for RequestCode {
    fn from(code: CommandCode) -> Self {
        RequestCode::Command(code)
    }
}

impl From<ConfigFamily> for RequestCode {
    fn from(family: ConfigFamily) -> Self {
        RequestCode::Family(family)
    }
}

impl fmt::Display for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestCode::Command(code) => fmt::Display::fmt(code, f),
            RequestCode::Family(family) => fmt::Display::fmt(family, f),
        }
    }
}

impl FromStr for RequestCode {
    type Err = Mhz19Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READ_CONFIG" => Ok(RequestCode::Family(ConfigFamily::Read)),
            "WRITE_CONFIG" => Ok(RequestCode::Family(ConfigFamily::Write)),
            name => name.parse::<CommandCode>().map(RequestCode::Command),
        }
    }
}
