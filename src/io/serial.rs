use std::io::{self, Read};
use std::time::Duration;

use log::{debug, info};
use serialport::SerialPort;

use crate::error::BridgeError;

/// Anything the bridge can pull raw bytes from
pub trait ByteSource {
    /// Read whatever is available into `buf`.
    ///
    /// Blocks for at most the source's timeout and returns `Ok(0)` when
    /// nothing arrived in that window.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, BridgeError>;
}

/// A serial device opened through `serialport`
pub struct SerialSource {
    path: String,
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    pub fn open(path: &str, baud: u32, timeout: Duration) -> Result<Self, BridgeError> {
        let port = serialport::new(path, baud)
            .timeout(timeout)
            .open()
            .map_err(|source| BridgeError::SerialOpen {
                path: path.to_string(),
                source,
            })?;
        info!("Listening on {} at {} baud...", path, baud);
        Ok(Self {
            path: path.to_string(),
            port,
        })
    }

    /// Release the device handle
    pub fn close(self) {
        drop(self.port);
        debug!("Serial port {} closed.", self.path);
    }
}

impl ByteSource for SerialSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, BridgeError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(err) if is_idle(&err) => Ok(0),
            Err(err) => Err(BridgeError::SerialRead(err)),
        }
    }
}

fn is_idle(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Device paths of the serial ports currently present
pub fn list_serial_ports() -> Result<Vec<String>, BridgeError> {
    let ports = serialport::available_ports().map_err(BridgeError::SerialList)?;
    Ok(ports.into_iter().map(|info| info.port_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_count_as_idle() {
        assert!(is_idle(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(is_idle(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(!is_idle(&io::Error::from(io::ErrorKind::BrokenPipe)));
    }

    #[test]
    fn test_open_missing_device_reports_path() {
        let path = "/dev/does-not-exist-serial-midi";
        let result = SerialSource::open(path, 31_250, Duration::from_millis(10));
        match result {
            Err(BridgeError::SerialOpen { path, .. }) => {
                assert_eq!(path, "/dev/does-not-exist-serial-midi")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("opening a missing device should fail"),
        }
    }
}
