use crate::frame::Frame;
use std::io::{self, Write};

/// Outbound side of the serial link.
pub trait Transport {
    /// Write one whole frame.
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()>;
}

impl<W: Write + ?Sized> Transport for W {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.write_all(frame.as_ref())?;
        self.flush()
    }
}
