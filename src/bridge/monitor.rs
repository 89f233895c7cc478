#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::decoder::GROUP_LEN;
use crate::io::midi::MidiEvent;

/// Something that happened on the bridge, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorRecord {
    /// A non-empty chunk as read from the serial port
    Received(Vec<u8>),
    /// An event that was handed to the output port
    Sent(MidiEvent),
    /// A group dropped because of its status byte
    Discarded([u8; GROUP_LEN]),
}

/// Observer of bridge traffic. Must not block the bridge loop.
pub trait Monitor {
    fn record(&mut self, record: MonitorRecord);
}

/// Ignores everything (headless mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMonitor;

impl Monitor for NullMonitor {
    fn record(&mut self, _record: MonitorRecord) {}
}

impl Monitor for Vec<MonitorRecord> {
    fn record(&mut self, record: MonitorRecord) {
        self.push(record);
    }
}

// A full ring drops the record rather than stalling the serial reader
#[cfg(feature = "rtrb")]
impl Monitor for Producer<MonitorRecord> {
    fn record(&mut self, record: MonitorRecord) {
        let _ = self.push(record);
    }
}
