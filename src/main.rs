use anyhow::{Context, Result, bail};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::BufReader;
use tokio::{signal, time::sleep};
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mhz19_lib::constants::DEFAULT_BAUD_RATE;
use mhz19_lib::FrameDecoder;

mod console;
mod error;
mod serial;

use console::{JsonLines, forward_requests};
use serial::SerialConfig;

/// Talk to an MH-Z19 CO2 sensor: JSON requests on stdin, decoded responses on stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serial device the sensor is attached to (e.g. /dev/ttyUSB0).
    #[arg(required_unless_present = "list_ports")]
    device: Option<String>,
    /// List available serial ports and exit.
    #[arg(long)]
    list_ports: bool,
    /// Line speed of the sensor UART.
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,
    /// Minimum delay between two commands, in milliseconds.
    #[arg(long, default_value_t = 50)]
    throttle_ms: u64,
    /// How long to keep listening after the last command before exiting, in milliseconds.
    #[arg(long, default_value_t = 200)]
    linger_ms: u64,
    /// Optional path to a file to write logs to, in addition to stderr.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn setup_logging(log_file_path: Option<PathBuf>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    // stdout carries the event stream, logs go to stderr
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file = File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = setup_logging(cli.log_file.clone(), &cli.verbose)?;

    if cli.list_ports {
        return list_ports();
    }

    tokio::select! {
        res = run(cli) => {
            if let Err(e) = res {
                error!("Console failed: {:?}", e);
                drop(guard);
                process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down.");
            // a pending stdin read would hold up runtime shutdown
            drop(guard);
            process::exit(0);
        }
    }
    Ok(())
}

fn list_ports() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to list serial ports")?;
    if ports.is_empty() {
        info!("No serial ports found.");
    }
    for port in ports {
        println!("{}\t{:?}", port.port_name, port.port_type);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let device = cli.device.context("No serial device given")?;
    let config = SerialConfig::new(device).with_baud_rate(cli.baud_rate);
    let port = serial::open(&config).with_context(|| format!("Failed to open {}", config.device))?;
    let reader_port = port.try_clone().context("Failed to clone serial port handle")?;

    let stop = Arc::new(AtomicBool::new(false));
    let reader_stop = Arc::clone(&stop);
    let mut reader = tokio::task::spawn_blocking(move || {
        let mut decoder = FrameDecoder::new(JsonLines::new(std::io::stdout()));
        serial::pump(reader_port, &mut decoder, &reader_stop)
    });

    let throttle = Duration::from_millis(cli.throttle_ms);
    let last_command = tokio::select! {
        res = forward_requests(BufReader::new(tokio::io::stdin()), port, throttle) => res?,
        res = &mut reader => {
            res.context("Serial reader panicked")?.context("Serial read failed")?;
            bail!("Serial reader stopped unexpectedly");
        }
    };

    // give the sensor a chance to answer the last command
    if let Some(sent_at) = last_command {
        let linger = Duration::from_millis(cli.linger_ms);
        let remaining = linger.saturating_sub(sent_at.elapsed());
        debug!(?remaining, "Waiting for trailing responses");
        sleep(remaining).await;
    }

    stop.store(true, Ordering::Relaxed);
    reader
        .await
        .context("Serial reader panicked")?
        .context("Serial read failed")?;
    Ok(())
}
