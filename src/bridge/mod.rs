//! The poll → decode → forward loop.
//!
//! One iteration reads a single chunk from the [`ByteSource`] (waiting at most
//! the source's timeout), feeds it to the [`Decoder`], and sends every
//! completed event to the [`MidiSink`] in stream order. The loop stops when
//! the [`ShutdownToken`] is cancelled or any read/send fails; there is no
//! retry.

pub mod monitor;

use log::{debug, info};

use crate::config::DEFAULT_CHUNK_SIZE;
use crate::decoder::{DecodeOutcome, Decoder};
use crate::error::BridgeError;
use crate::io::{ByteSource, MidiSink};
use crate::shutdown::ShutdownToken;

pub use monitor::{Monitor, MonitorRecord, NullMonitor};

/// Running totals for one bridge session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStats {
    /// Reads that returned at least one byte
    pub chunks: u64,
    pub bytes: u64,
    pub events: u64,
    pub discarded: u64,
}

pub struct Bridge<S, K> {
    source: S,
    sink: K,
    decoder: Decoder,
    read_buf: Vec<u8>,
    outcomes: Vec<DecodeOutcome>,
    stats: BridgeStats,
}

impl<S: ByteSource, K: MidiSink> Bridge<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Self::with_chunk_size(source, sink, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(source: S, sink: K, chunk_size: usize) -> Self {
        Self {
            source,
            sink,
            decoder: Decoder::new(),
            read_buf: vec![0; chunk_size.max(1)],
            outcomes: Vec::new(),
            stats: BridgeStats::default(),
        }
    }

    /// Run until `shutdown` is cancelled or the transport fails
    pub fn run<M: Monitor>(
        &mut self,
        shutdown: &ShutdownToken,
        monitor: &mut M,
    ) -> Result<BridgeStats, BridgeError> {
        while !shutdown.is_cancelled() {
            self.step(monitor)?;
        }
        info!(
            "Bridge stopped: {} bytes, {} events sent, {} groups discarded",
            self.stats.bytes, self.stats.events, self.stats.discarded
        );
        Ok(self.stats)
    }

    /// One read/decode/send iteration. Returns the number of events sent.
    pub fn step<M: Monitor>(&mut self, monitor: &mut M) -> Result<usize, BridgeError> {
        let n = self.source.read_chunk(&mut self.read_buf)?;
        if n == 0 {
            return Ok(0);
        }

        let chunk = &self.read_buf[..n];
        debug!("Raw data received: {:02X?}", chunk);
        monitor.record(MonitorRecord::Received(chunk.to_vec()));
        self.stats.chunks += 1;
        self.stats.bytes += n as u64;

        self.decoder
            .ingest_with(chunk, |outcome| self.outcomes.push(outcome));
        if !self.decoder.pending().is_empty() {
            let pending = self.decoder.pending();
            debug!("Buffer length: {} Contents: {:02X?}", pending.len(), pending);
        }

        let mut sent = 0;
        for outcome in self.outcomes.drain(..) {
            match outcome {
                DecodeOutcome::Event(event) => {
                    self.sink.send(&event)?;
                    info!("Sent MIDI {}", event);
                    monitor.record(MonitorRecord::Sent(event));
                    self.stats.events += 1;
                    sent += 1;
                }
                DecodeOutcome::Discarded(group) => {
                    monitor.record(MonitorRecord::Discarded(group));
                    self.stats.discarded += 1;
                }
            }
        }
        Ok(sent)
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Hand back the transport ends so the caller can close them
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }
}
