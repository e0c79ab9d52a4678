use crate::constants::FRAME_LEN;
use crate::error::Mhz19Error;
use crate::event::Event;
use crate::frame::Frame;
use bytes::{Buf, BytesMut};
use tracing::trace;

/// Receiver of decoded events.
///
/// Called once per accepted frame, in arrival order, from inside the
/// [`FrameDecoder::feed`] call that completed it.
pub trait EventSink {
    fn on_event(&mut self, event: Event);

    /// First output error the sink ran into, if any. A sink that reports
    /// one here has stopped delivering events.
    fn take_error(&mut self) -> Option<std::io::Error> {
        None
    }
}

impl<F: FnMut(Event)> EventSink for F {
    fn on_event(&mut self, event: Event) {
        self(event)
    }
}

/// Recovers frames from an unframed byte stream.
///
/// Bytes that do not start a valid frame are dropped one at a time until a
/// header and checksum line up again, so attaching mid-stream or line noise
/// costs a few lost bytes and never a stall.
pub struct FrameDecoder<S> {
    buffer: BytesMut,
    sink: S,
}

impl<S: EventSink> FrameDecoder<S> {
    pub fn new(sink: S) -> Self {
        Self {
            buffer: BytesMut::with_capacity(2 * FRAME_LEN),
            sink,
        }
    }

    /// Append `chunk` and emit an event for every frame that completes.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);

        loop {
            match Frame::parse(&self.buffer) {
                Ok(frame) => {
                    self.buffer.advance(FRAME_LEN);
                    let event = Event::from(&frame);
                    trace!(code = %event.code, raw = ?event.raw, "frame decoded");
                    self.sink.on_event(event);
                }
                Err(Mhz19Error::InsufficientData { .. }) => return,
                Err(reason) => {
                    trace!(byte = self.buffer[0], %reason, "resync: dropping byte");
                    self.buffer.advance(1);
                }
            }
        }
    }

    /// Bytes received but not yet resolved into a frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial frame held in the carry-over buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
