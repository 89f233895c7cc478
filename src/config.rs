//! Bridge configuration, filled in by the CLI or built directly

use std::time::Duration;

/// Classic MIDI DIN baud rate
pub const MIDI_BAUD: u32 = 31_250;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_CLIENT_NAME: &str = "serial-midi";
pub const DEFAULT_VIRTUAL_PORT: &str = "Serial MIDI Bridge";
/// Upper bound on bytes pulled from the serial port per read
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Where decoded events are sent
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputTarget {
    /// Create a new port other applications can connect to
    Virtual(String),
    /// Connect to the first existing port whose name contains this text
    Named(String),
}

impl OutputTarget {
    pub fn name(&self) -> &str {
        match self {
            OutputTarget::Virtual(name) | OutputTarget::Named(name) => name,
        }
    }
}

impl Default for OutputTarget {
    fn default() -> Self {
        OutputTarget::Virtual(DEFAULT_VIRTUAL_PORT.to_string())
    }
}

/// Serial and MIDI settings for one bridge session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeConfig {
    /// Serial device path, e.g. `/dev/ttyUSB0`
    pub port: String,
    pub baud: u32,
    /// Read timeout; also bounds how long shutdown can take
    pub read_timeout: Duration,
    pub output: OutputTarget,
    pub client_name: String,
    pub chunk_size: usize,
}

impl BridgeConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud: MIDI_BAUD,
            read_timeout: DEFAULT_READ_TIMEOUT,
            output: OutputTarget::default(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    pub fn baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Set the read chunk size (at least one byte)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::new("/dev/ttyUSB0");
        assert_eq!(config.baud, 31_250);
        assert_eq!(config.read_timeout, Duration::from_millis(100));
        assert_eq!(
            config.output,
            OutputTarget::Virtual("Serial MIDI Bridge".to_string())
        );
    }

    #[test]
    fn test_builder_overrides() {
        let config = BridgeConfig::new("/dev/ttyUSB0")
            .baud(115_200)
            .output(OutputTarget::Named("IAC".to_string()))
            .chunk_size(0);
        assert_eq!(config.baud, 115_200);
        assert_eq!(config.output.name(), "IAC");
        assert_eq!(config.chunk_size, 1);
    }
}
