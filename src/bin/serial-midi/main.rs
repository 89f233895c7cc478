//! serial-midi - forward Note On/Off bytes from a serial port to MIDI
//!
//! Run with: cargo run -- --port /dev/ttyUSB0
//! Add `--monitor` for the terminal traffic view, `--list` to see ports.

mod app;
mod ui;

use std::time::Duration;

use clap::Parser;
use serial_midi::{
    config::{DEFAULT_CHUNK_SIZE, DEFAULT_CLIENT_NAME, DEFAULT_VIRTUAL_PORT, MIDI_BAUD},
    BridgeConfig, OutputTarget,
};

use app::App;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Serial device to read from
    #[arg(short, long, required_unless_present = "list")]
    port: Option<String>,

    /// Serial baud rate (31250 for DIN MIDI)
    #[arg(short, long, default_value_t = MIDI_BAUD)]
    baud: u32,

    /// Serial read timeout in milliseconds
    #[arg(long, default_value_t = 100)]
    timeout_ms: u64,

    /// Create a virtual MIDI output port with this name
    #[arg(long = "virtual", value_name = "NAME", conflicts_with = "output")]
    virtual_port: Option<String>,

    /// Send to an existing MIDI output port whose name contains NAME
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Maximum bytes per serial read
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// MIDI client name shown to other applications
    #[arg(long, default_value = DEFAULT_CLIENT_NAME)]
    client_name: String,

    /// Show live traffic in a terminal UI instead of logging
    #[arg(short, long)]
    monitor: bool,

    /// List serial and MIDI output ports, then exit
    #[arg(short, long)]
    list: bool,
}

impl Args {
    fn output_target(&self) -> OutputTarget {
        match (&self.output, &self.virtual_port) {
            (Some(name), _) => OutputTarget::Named(name.clone()),
            (None, Some(name)) => OutputTarget::Virtual(name.clone()),
            (None, None) => OutputTarget::Virtual(DEFAULT_VIRTUAL_PORT.to_string()),
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if !args.monitor {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if args.list {
        return app::list_ports(&args.client_name);
    }

    let port = args.port.clone().unwrap_or_default();
    let config = BridgeConfig::new(port)
        .baud(args.baud)
        .read_timeout(Duration::from_millis(args.timeout_ms))
        .output(args.output_target())
        .client_name(args.client_name.clone())
        .chunk_size(args.chunk_size);

    App::new(config).monitor(args.monitor).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_virtual_port() {
        let args = Args::parse_from(["serial-midi", "--port", "/dev/ttyUSB0"]);
        assert_eq!(
            args.output_target(),
            OutputTarget::Virtual(DEFAULT_VIRTUAL_PORT.to_string())
        );
        assert_eq!(args.baud, 31_250);
    }

    #[test]
    fn test_named_output() {
        let args = Args::parse_from(["serial-midi", "-p", "COM3", "--output", "FPGA Midi Bus"]);
        assert_eq!(
            args.output_target(),
            OutputTarget::Named("FPGA Midi Bus".to_string())
        );
    }

    #[test]
    fn test_port_required_unless_listing() {
        assert!(Args::try_parse_from(["serial-midi"]).is_err());
        assert!(Args::try_parse_from(["serial-midi", "--list"]).is_ok());
    }

    #[test]
    fn test_virtual_conflicts_with_output() {
        let result = Args::try_parse_from([
            "serial-midi",
            "-p",
            "/dev/ttyUSB0",
            "--virtual",
            "a",
            "--output",
            "b",
        ]);
        assert!(result.is_err());
    }
}
