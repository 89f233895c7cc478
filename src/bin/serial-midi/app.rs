//! App - opens the serial port and MIDI output, then runs the bridge

use color_eyre::eyre::{eyre, Report, Result as EyreResult, WrapErr};
use rtrb::RingBuffer;

use serial_midi::{
    bridge::{MonitorRecord, NullMonitor},
    io::{list_output_ports, list_serial_ports, MidirSink, SerialSource},
    Bridge, BridgeConfig, ShutdownToken,
};

use super::ui::{SessionInfo, UiApp};

/// Monitor records buffered between the bridge and the UI thread
const MONITOR_RING_SIZE: usize = 4096;

/// Main application builder
pub struct App {
    config: BridgeConfig,
    monitor: bool,
}

impl App {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            monitor: false,
        }
    }

    /// Show the terminal monitor instead of logging traffic
    pub fn monitor(mut self, enabled: bool) -> Self {
        self.monitor = enabled;
        self
    }

    /// Run until Ctrl+C (or `q` in the monitor), or until the serial port fails
    pub fn run(self) -> EyreResult<()> {
        let shutdown = ShutdownToken::new();
        {
            let shutdown = shutdown.clone();
            ctrlc::set_handler(move || shutdown.cancel())
                .wrap_err("failed to install Ctrl+C handler")?;
        }

        let config = &self.config;
        let source = SerialSource::open(&config.port, config.baud, config.read_timeout)
            .wrap_err("Error opening or reading from serial port")?;
        let sink = match MidirSink::open(&config.client_name, &config.output) {
            Ok(sink) => sink,
            Err(err) => {
                source.close();
                return Err(Report::new(err).wrap_err("failed to open MIDI output"));
            }
        };

        let session = SessionInfo {
            serial_port: config.port.clone(),
            baud: config.baud,
            output_port: sink.port_name().to_string(),
        };

        let mut bridge = Bridge::with_chunk_size(source, sink, config.chunk_size);
        let result = if self.monitor {
            run_with_monitor(&mut bridge, &shutdown, session)
        } else {
            println!(
                "Bridging {} → {}... Press Ctrl+C to stop",
                session.serial_port, session.output_port
            );
            bridge
                .run(&shutdown, &mut NullMonitor)
                .map(|_| ())
                .wrap_err("bridge stopped")
        };

        if stopped_by_user(&result) {
            println!("\nExiting.");
        }
        let (source, sink) = bridge.into_parts();
        source.close();
        println!("Serial port closed.");
        sink.close();
        result
    }
}

/// The bridge only returns `Ok` once the shutdown token was cancelled by
/// Ctrl+C or the monitor's quit key; any failure comes back as `Err`, even
/// though the monitor path cancels the token afterwards to stop the UI.
fn stopped_by_user(result: &EyreResult<()>) -> bool {
    result.is_ok()
}

/// Bridge on this thread, terminal UI on a second one.
///
/// The MIDI connection stays on the thread that opened it; only the ring
/// consumer and the shutdown token cross over.
fn run_with_monitor(
    bridge: &mut Bridge<SerialSource, MidirSink>,
    shutdown: &ShutdownToken,
    session: SessionInfo,
) -> EyreResult<()> {
    let (mut records_tx, records_rx) = RingBuffer::<MonitorRecord>::new(MONITOR_RING_SIZE);

    let ui_shutdown = shutdown.clone();
    let ui = std::thread::spawn(move || -> EyreResult<()> {
        let mut terminal = ratatui::init();
        let result = UiApp::new(records_rx, session, ui_shutdown.clone()).run(&mut terminal);
        ratatui::restore();
        // The bridge must stop whether the user quit or drawing failed
        ui_shutdown.cancel();
        result
    });

    let bridge_result = bridge.run(shutdown, &mut records_tx);
    // Let the UI exit if the bridge stopped on its own
    shutdown.cancel();

    let ui_result = ui
        .join()
        .map_err(|_| eyre!("monitor thread panicked"))?;
    bridge_result.wrap_err("bridge stopped")?;
    ui_result
}

/// Print the serial ports and MIDI output ports that can be used
pub fn list_ports(client_name: &str) -> EyreResult<()> {
    println!("Available serial ports:");
    for port in list_serial_ports().wrap_err("failed to list serial ports")? {
        println!("  {}", port);
    }

    println!("Available MIDI output ports:");
    for port in list_output_ports(client_name).wrap_err("failed to list MIDI output ports")? {
        println!("  {}", port);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_midi::BridgeError;
    use std::io;

    #[test]
    fn test_read_failure_is_not_a_user_stop() {
        let result: EyreResult<()> =
            Err(BridgeError::SerialRead(io::Error::from(io::ErrorKind::BrokenPipe)))
                .wrap_err("bridge stopped");
        assert!(!stopped_by_user(&result));
    }

    #[test]
    fn test_cancelled_bridge_is_a_user_stop() {
        assert!(stopped_by_user(&Ok(())));
    }
}
