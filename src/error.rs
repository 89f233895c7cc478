use std::io;

/// Failures of the serial transport or the MIDI output
#[derive(Debug)]
pub enum BridgeError {
    /// The serial device could not be opened
    SerialOpen {
        path: String,
        source: serialport::Error,
    },
    /// A read on an open serial device failed (timeouts are not errors)
    SerialRead(io::Error),
    /// Serial ports could not be enumerated
    SerialList(serialport::Error),
    /// The MIDI client could not be created
    MidiInit(midir::InitError),
    /// Connecting to, or creating, the output port failed
    MidiConnect { port: String, reason: String },
    /// No existing output port matched the requested name
    PortNotFound(String),
    /// Virtual ports are only available on ALSA/CoreMIDI/JACK hosts
    VirtualUnsupported(String),
    /// The output port rejected a message
    Send(midir::SendError),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::SerialOpen { path, source } => {
                write!(f, "Error opening serial port {}: {}", path, source)
            }
            BridgeError::SerialRead(err) => {
                write!(f, "Error reading from serial port: {}", err)
            }
            BridgeError::SerialList(err) => {
                write!(f, "Could not enumerate serial ports: {}", err)
            }
            BridgeError::MidiInit(err) => {
                write!(f, "Could not create MIDI output client: {}", err)
            }
            BridgeError::MidiConnect { port, reason } => {
                write!(f, "Could not open MIDI output port '{}': {}", port, reason)
            }
            BridgeError::PortNotFound(name) => {
                write!(f, "No MIDI output port matching '{}'", name)
            }
            BridgeError::VirtualUnsupported(name) => {
                write!(
                    f,
                    "Cannot create virtual port '{}' on this platform (use --output to pick an existing port)",
                    name
                )
            }
            BridgeError::Send(err) => write!(f, "Failed to send MIDI: {}", err),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::SerialOpen { source, .. } => Some(source),
            BridgeError::SerialRead(err) => Some(err),
            BridgeError::SerialList(err) => Some(err),
            BridgeError::MidiInit(err) => Some(err),
            BridgeError::Send(err) => Some(err),
            BridgeError::MidiConnect { .. }
            | BridgeError::PortNotFound(_)
            | BridgeError::VirtualUnsupported(_) => None,
        }
    }
}

impl From<midir::SendError> for BridgeError {
    fn from(err: midir::SendError) -> Self {
        BridgeError::Send(err)
    }
}

impl From<midir::InitError> for BridgeError {
    fn from(err: midir::InitError) -> Self {
        BridgeError::MidiInit(err)
    }
}
