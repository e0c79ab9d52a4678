// src/serial.rs

use crate::error::Error;
use mhz19_lib::constants::DEFAULT_BAUD_RATE;
use mhz19_lib::{EventSink, FrameDecoder};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, trace};

/// How long a read may block before the reader checks for shutdown
const READ_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub device: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
}

impl SerialConfig {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: READ_POLL,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

/// Open the sensor UART, 8N1 without flow control.
pub fn open(config: &SerialConfig) -> Result<Box<dyn SerialPort>, Error> {
    info!(device = %config.device, baud = config.baud_rate, "Opening serial port...");
    let port = serialport::new(&config.device, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.read_timeout)
        .open()?;
    info!("Serial port open.");
    Ok(port)
}

/// Read from `port` into `decoder` until `stop` is set.
///
/// Read timeouts only wake the loop to look at `stop`. End of stream means
/// the device went away and is reported as an error, as is a sink that can
/// no longer deliver events.
pub fn pump<R: Read, S: EventSink>(mut port: R, decoder: &mut FrameDecoder<S>, stop: &AtomicBool) -> io::Result<()> {
    let mut buf = [0u8; 64];
    while !stop.load(Ordering::Relaxed) {
        match port.read(&mut buf) {
            Ok(0) => {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "serial link closed"));
            }
            Ok(n) => {
                trace!(bytes = n, data = %hex::encode_upper(&buf[..n]), "Received");
                decoder.feed(&buf[..n]);
                if let Some(e) = decoder.sink_mut().take_error() {
                    return Err(e);
                }
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => continue,
            Err(e) => return Err(e),
        }
    }
    debug!(pending = decoder.buffered(), "Serial reader stopped");
    Ok(())
}
