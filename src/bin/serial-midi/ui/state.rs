//! Display state for the monitor
//!
//! Session details are fixed at startup; traffic counters and the recent
//! history are folded from the bridge's monitor records.

use std::collections::VecDeque;

use serial_midi::bridge::MonitorRecord;

/// Lines of traffic history kept for display
pub const HISTORY_LEN: usize = 256;

/// Static information about the running session
#[derive(Clone, Debug)]
pub struct SessionInfo {
    /// Serial device path
    pub serial_port: String,
    pub baud: u32,
    /// Name of the MIDI output port in use
    pub output_port: String,
}

/// Counters and recent records, updated from the ring buffer
#[derive(Debug, Default)]
pub struct Traffic {
    pub bytes: u64,
    pub sent: u64,
    pub discarded: u64,
    /// Most recent record last
    pub history: VecDeque<MonitorRecord>,
}

impl Traffic {
    pub fn push(&mut self, record: MonitorRecord) {
        match &record {
            MonitorRecord::Received(bytes) => self.bytes += bytes.len() as u64,
            MonitorRecord::Sent(_) => self.sent += 1,
            MonitorRecord::Discarded(_) => self.discarded += 1,
        }

        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }
}
