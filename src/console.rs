//! JSON lines in, JSON lines out.
//!
//! Each stdin line is one request:
//!
//! ```text
//! {"code": "SET_ABC", "data": true}
//! {"code": "WRITE_CONFIG", "data": [517, 3735928559]}
//! {"code": "RESET", "raw": "0000000000"}
//! ```
//!
//! Each decoded frame becomes one stdout line:
//!
//! ```text
//! {"code":"GET_FIRMWARE_VERSION","raw":"303434330000","version":"0443"}
//! ```

use crate::error::Error;
use anyhow::{Context, Result};
use mhz19_lib::{Event, EventSink, Frame, RequestCode, Transport, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub code: String,
    #[serde(default)]
    pub data: Option<Value>,
    /// Hex string replacing the 5-byte argument area
    #[serde(default)]
    pub raw: Option<String>,
}

impl Request {
    pub fn parse(line: &str) -> std::result::Result<Self, Error> {
        Ok(serde_json::from_str(line)?)
    }

    /// `data` flattened into the encoder's argument list.
    pub fn arguments(&self) -> std::result::Result<Vec<u32>, Error> {
        match &self.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| argument(item).ok_or_else(|| Error::InvalidData(item.clone())))
                .collect(),
            Some(value) => argument(value)
                .map(|arg| vec![arg])
                .ok_or_else(|| Error::InvalidData(value.clone())),
        }
    }

    pub fn to_frame(&self) -> std::result::Result<Frame, Error> {
        let code: RequestCode = self.code.parse()?;
        let raw = self.raw.as_deref().map(hex::decode).transpose()?;
        Ok(encode(code, &self.arguments()?, raw.as_deref())?)
    }
}

fn argument(value: &Value) -> Option<u32> {
    match value {
        Value::Bool(flag) => Some(u32::from(*flag)),
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
enum CodeField {
    Name(&'static str),
    Byte(u8),
}

#[derive(Debug, Serialize)]
struct EventLine<'a> {
    code: CodeField,
    raw: String,
    #[serde(rename = "ABC", skip_serializing_if = "Option::is_none")]
    abc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_error: Option<&'a str>,
}

/// One JSON object per event, without the checksum.
pub fn render_event(event: &Event) -> std::result::Result<String, serde_json::Error> {
    let code = match event.code.name() {
        Some(name) => CodeField::Name(name),
        None => CodeField::Byte(event.code.into()),
    };
    serde_json::to_string(&EventLine {
        code,
        raw: hex::encode_upper(event.raw),
        abc: event.abc(),
        version: event.version(),
        parse_error: event.parse_error.as_deref(),
    })
}

/// Event sink writing one line per event and flushing after each, so a
/// reader on the other end of a pipe never sees half a line.
///
/// The first write error stops output and is handed out by
/// [`EventSink::take_error`].
pub struct JsonLines<W> {
    out: W,
    failed: Option<io::Error>,
    broken: bool,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            failed: None,
            broken: false,
        }
    }
}

impl<W: Write> EventSink for JsonLines<W> {
    fn on_event(&mut self, event: Event) {
        if self.broken {
            return;
        }
        if let Some(reason) = &event.parse_error {
            warn!(code = %event.code, %reason, "response payload not understood");
        }
        let line = match render_event(&event) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to render event {:?}: {}", event, e);
                return;
            }
        };
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            error!("Failed to write event: {}", e);
            self.broken = true;
            self.failed = Some(e);
        }
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.failed.take()
    }
}

/// Send one frame per request line until `input` ends, waiting `throttle`
/// after each. Blank lines are skipped and a malformed request aborts.
/// Returns when the last command went out, if any did.
pub async fn forward_requests<R, T>(input: R, mut port: T, throttle: Duration) -> Result<Option<Instant>>
where
    R: AsyncBufRead + Unpin,
    T: Transport + Send + 'static,
{
    let mut lines = input.lines();
    let mut last_command = None;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let request = Request::parse(&line).with_context(|| format!("Bad request: {}", line))?;
        let frame = request
            .to_frame()
            .with_context(|| format!("Cannot encode request: {}", line))?;

        debug!(code = %request.code, frame = %hex::encode_upper(frame.as_bytes()), "Sending command");
        let (returned, written) = tokio::task::spawn_blocking(move || {
            let written = port.write_frame(&frame);
            (port, written)
        })
        .await
        .context("Serial writer panicked")?;
        port = returned;
        written.context("Failed to write to serial port")?;
        last_command = Some(Instant::now());

        sleep(throttle).await;
    }

    info!("End of input.");
    Ok(last_command)
}
