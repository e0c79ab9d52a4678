pub mod code;
pub mod command;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod event;
pub mod frame;
pub mod layout;
pub mod transport;


// Re-export the pieces most callers need
pub use code::{CommandCode, ConfigFamily, RequestCode, resolve_family};
pub use command::{Command, encode};
pub use decoder::{EventSink, FrameDecoder};
pub use error::Mhz19Error;
pub use event::{Event, Reading};
pub use frame::{Frame, checksum};
pub use transport::Transport;
