//! Common test utilities and shared imports

// Shared across several test files; not every item is used in each of them
#[allow(unused_imports)]
pub use hex;
#[allow(unused_imports)]
pub use mhz19_lib::code::{CommandCode, ConfigFamily, RequestCode};
#[allow(unused_imports)]
pub use mhz19_lib::command::{Command, encode};
#[allow(unused_imports)]
pub use mhz19_lib::decoder::{EventSink, FrameDecoder};
#[allow(unused_imports)]
pub use mhz19_lib::error::Mhz19Error;
#[allow(unused_imports)]
pub use mhz19_lib::event::{Event, Reading};
#[allow(unused_imports)]
pub use mhz19_lib::frame::{Frame, checksum};

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Vec<u8> {
    hex::decode(hex_data.replace(' ', "")).expect("Failed to decode hex")
}

/// Feed every chunk in order and collect the emitted events
#[allow(dead_code)]
pub fn decode_chunks<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Vec<Event> {
    let mut events = Vec::new();
    let mut decoder = FrameDecoder::new(|event: Event| events.push(event));
    for chunk in chunks {
        decoder.feed(chunk);
    }
    drop(decoder);
    events
}

/// Firmware version response as sent by a sensor running "0443"
#[allow(dead_code)]
pub const FIRMWARE_0443_RESPONSE: &str = "FF A0 30 34 34 33 00 00 95";

/// GET_ABC response reporting auto-baseline-correction enabled
#[allow(dead_code)]
pub const ABC_ON_RESPONSE: &str = "FF 7D 00 00 00 00 00 01 82";
