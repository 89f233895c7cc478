use log::info;
use midir::{MidiOutput, MidiOutputConnection};

use crate::config::OutputTarget;
use crate::error::BridgeError;
use crate::io::midi::MidiEvent;

/// Destination for decoded events. Sends are fire-and-forget.
pub trait MidiSink {
    fn send(&mut self, event: &MidiEvent) -> Result<(), BridgeError>;
}

/// MIDI output port opened through `midir`
pub struct MidirSink {
    connection: MidiOutputConnection,
    port_name: String,
}

impl MidirSink {
    pub fn open(client_name: &str, target: &OutputTarget) -> Result<Self, BridgeError> {
        let midi_out = MidiOutput::new(client_name)?;
        let (connection, port_name) = match target {
            OutputTarget::Virtual(name) => (create_virtual(midi_out, name)?, name.clone()),
            OutputTarget::Named(wanted) => {
                let ports = midi_out.ports();
                let (port, port_name) = ports
                    .iter()
                    .find_map(|p| {
                        let name = midi_out.port_name(p).ok()?;
                        name.contains(wanted.as_str()).then(|| (p.clone(), name))
                    })
                    .ok_or_else(|| BridgeError::PortNotFound(wanted.clone()))?;
                let connection = midi_out
                    .connect(&port, client_name)
                    .map_err(|e| BridgeError::MidiConnect {
                        port: port_name.clone(),
                        reason: e.to_string(),
                    })?;
                (connection, port_name)
            }
        };

        info!("MIDI output connected to: {}", port_name);
        Ok(Self {
            connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn close(self) {
        self.connection.close();
        info!("MIDI output {} closed.", self.port_name);
    }
}

impl MidiSink for MidirSink {
    fn send(&mut self, event: &MidiEvent) -> Result<(), BridgeError> {
        self.connection.send(&event.to_bytes())?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_virtual(midi_out: MidiOutput, name: &str) -> Result<MidiOutputConnection, BridgeError> {
    use midir::os::unix::VirtualOutput;

    midi_out
        .create_virtual(name)
        .map_err(|e| BridgeError::MidiConnect {
            port: name.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(not(unix))]
fn create_virtual(_midi_out: MidiOutput, name: &str) -> Result<MidiOutputConnection, BridgeError> {
    Err(BridgeError::VirtualUnsupported(name.to_string()))
}

/// Names of the MIDI output ports visible to `client_name`
pub fn list_output_ports(client_name: &str) -> Result<Vec<String>, BridgeError> {
    let midi_out = MidiOutput::new(client_name)?;
    Ok(midi_out
        .ports()
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect())
}
