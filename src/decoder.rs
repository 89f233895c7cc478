/*
Serial Byte Stream Decoder
==========================

The serial line carries bare MIDI channel messages with no framing: every
message is exactly three bytes, status first.

    status    note      velocity
    1001 cccc 0nnn nnnn 0vvv vvvv   Note On,  channel c
    1000 cccc 0nnn nnnn 0vvv vvvv   Note Off, channel c

Bytes arrive in arbitrary chunks, so the decoder keeps a rolling buffer and
only looks at it three bytes at a time. After every call the buffer holds
at most two bytes: the start of a message whose tail has not arrived yet.

Classification of one group:
- high nibble 0x90, velocity > 0  -> NoteOn
- high nibble 0x90, velocity == 0 -> NoteOff (zero-velocity convention)
- high nibble 0x80                -> NoteOff, velocity kept as received
- anything else                   -> the whole group is discarded

Note and velocity are 7-bit values. A group whose note or velocity byte
has the top bit set is discarded too: forwarding it would put a status
byte in a data slot.

Discard policy:
----------------
There is no resynchronization. A group whose first byte is not a Note
On/Off status is dropped as a unit, logged at `warn`, and counted. If the
stream ever starts mid-message every later group is shifted and keeps
being dropped (or misread) until the misalignment happens to cancel out.
Callers that care can watch `discarded()` or use `ingest_with` to see each
dropped group.
*/

use log::warn;

use crate::io::midi::{MidiEvent, NoteKind, NOTE_OFF, NOTE_ON};

/// Bytes per message on the serial line
pub const GROUP_LEN: usize = 3;
/// Largest value a MIDI data byte can carry
pub const DATA_MAX: u8 = 0x7F;

/// Result of classifying one complete 3-byte group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    Event(MidiEvent),
    Discarded([u8; GROUP_LEN]),
}

/// Classify a single `[status, note, velocity]` group.
///
/// Returns `None` when the status byte is neither a Note On nor a Note Off,
/// or when either data byte is above 0x7F.
pub fn decode_group(group: [u8; GROUP_LEN]) -> Option<MidiEvent> {
    let [status, note, velocity] = group;
    if note > DATA_MAX || velocity > DATA_MAX {
        return None;
    }
    let kind = match status & 0xF0 {
        NOTE_ON if velocity == 0 => NoteKind::NoteOff,
        NOTE_ON => NoteKind::NoteOn,
        NOTE_OFF => NoteKind::NoteOff,
        _ => return None,
    };

    Some(MidiEvent {
        kind,
        channel: status & 0x0F,
        note,
        velocity,
    })
}

/// Rolling accumulator turning serial chunks into note events.
///
/// One decoder per byte stream; create a fresh one when the port is reopened.
#[derive(Debug, Default, Clone)]
pub struct Decoder {
    buffer: Vec<u8>,
    discarded: u64,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
            discarded: 0,
        }
    }

    /// Append `chunk` and return every event completed by it, in stream order
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<MidiEvent> {
        let mut events = Vec::with_capacity((self.buffer.len() + chunk.len()) / GROUP_LEN);
        self.ingest_with(chunk, |outcome| {
            if let DecodeOutcome::Event(event) = outcome {
                events.push(event);
            }
        });
        events
    }

    /// Append `chunk` and report every complete group, including discarded ones
    pub fn ingest_with<F>(&mut self, chunk: &[u8], mut on_group: F)
    where
        F: FnMut(DecodeOutcome),
    {
        self.buffer.extend_from_slice(chunk);

        let complete = self.buffer.len() - self.buffer.len() % GROUP_LEN;
        for group in self.buffer[..complete].chunks_exact(GROUP_LEN) {
            let group = [group[0], group[1], group[2]];
            match decode_group(group) {
                Some(event) => on_group(DecodeOutcome::Event(event)),
                None => {
                    self.discarded += 1;
                    warn!("Discarding unrecognized group: {:02X?}", group);
                    on_group(DecodeOutcome::Discarded(group));
                }
            }
        }
        self.buffer.drain(..complete);
    }

    /// Bytes waiting for the rest of their message (0-2 of them)
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of groups dropped since this decoder was created
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Forget any partial message; the discard counter is kept
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_channel_zero() {
        let mut decoder = Decoder::new();
        let events = decoder.ingest(&[0x90, 60, 100]);
        assert_eq!(events, vec![MidiEvent::note_on(0, 60, 100)]);
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_zero_velocity_note_on_is_note_off() {
        let mut decoder = Decoder::new();
        let events = decoder.ingest(&[0x90, 64, 0x00]);
        assert_eq!(events, vec![MidiEvent::note_off(0, 64, 0)]);
    }

    #[test]
    fn test_note_off_regardless_of_velocity() {
        let mut decoder = Decoder::new();
        for velocity in [0u8, 1, 64, 127] {
            let events = decoder.ingest(&[0x80, 72, velocity]);
            assert_eq!(events, vec![MidiEvent::note_off(0, 72, velocity)]);
        }
    }

    #[test]
    fn test_channel_from_low_nibble() {
        let mut decoder = Decoder::new();
        let events = decoder.ingest(&[0x9F, 1, 2, 0x8A, 3, 4]);
        assert_eq!(
            events,
            vec![MidiEvent::note_on(15, 1, 2), MidiEvent::note_off(10, 3, 4)]
        );
    }

    #[test]
    fn test_unrecognized_status_discarded() {
        let mut decoder = Decoder::new();
        let events = decoder.ingest(&[0xA0, 60, 100]);
        assert!(events.is_empty());
        assert_eq!(decoder.discarded(), 1);
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_discard_does_not_stop_following_groups() {
        let mut decoder = Decoder::new();
        let events = decoder.ingest(&[0xB0, 7, 100, 0x90, 60, 1]);
        assert_eq!(events, vec![MidiEvent::note_on(0, 60, 1)]);
        assert_eq!(decoder.discarded(), 1);
    }

    #[test]
    fn test_partial_message_waits_for_tail() {
        let mut decoder = Decoder::new();
        assert!(decoder.ingest(&[0x90]).is_empty());
        assert_eq!(decoder.pending(), &[0x90]);
        assert!(decoder.ingest(&[60]).is_empty());
        assert_eq!(decoder.pending(), &[0x90, 60]);

        let events = decoder.ingest(&[100, 0x80]);
        assert_eq!(events, vec![MidiEvent::note_on(0, 60, 100)]);
        assert_eq!(decoder.pending(), &[0x80]);
    }

    #[test]
    fn test_empty_chunk_is_noop() {
        let mut decoder = Decoder::new();
        decoder.ingest(&[0x90, 60]);
        assert!(decoder.ingest(&[]).is_empty());
        assert_eq!(decoder.pending(), &[0x90, 60]);
    }

    #[test]
    fn test_buffer_never_exceeds_two_bytes() {
        let mut decoder = Decoder::new();
        let stream: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        for chunk_len in 1..=11 {
            for chunk in stream.chunks(chunk_len) {
                decoder.ingest(chunk);
                assert!(decoder.pending().len() <= 2);
            }
        }
    }

    #[test]
    fn test_chunking_does_not_change_events() {
        let stream = [
            0x90, 60, 100, 0x90, 60, 0, 0xA0, 1, 2, 0x85, 10, 20, 0x9C, 127, 127, 0x90,
        ];

        let all_at_once = Decoder::new().ingest(&stream);

        let mut byte_at_a_time = Vec::new();
        let mut decoder = Decoder::new();
        for byte in stream {
            byte_at_a_time.extend(decoder.ingest(&[byte]));
        }

        assert_eq!(all_at_once, byte_at_a_time);
        assert_eq!(all_at_once.len(), 4);
        assert_eq!(decoder.pending(), &[0x90]);
    }

    #[test]
    fn test_ingest_with_reports_discards_in_order() {
        let mut decoder = Decoder::new();
        let mut outcomes = Vec::new();
        decoder.ingest_with(&[0xF0, 1, 2, 0x91, 3, 4], |o| outcomes.push(o));
        assert_eq!(
            outcomes,
            vec![
                DecodeOutcome::Discarded([0xF0, 1, 2]),
                DecodeOutcome::Event(MidiEvent::note_on(1, 3, 4)),
            ]
        );
    }

    #[test]
    fn test_misaligned_stream_is_not_resynchronized() {
        // Stream starts on the note byte of a message
        let mut decoder = Decoder::new();
        let events = decoder.ingest(&[60, 100, 0x90, 61, 100, 0x80]);
        assert!(events.is_empty());
        assert_eq!(decoder.discarded(), 2);
    }

    #[test]
    fn test_reset_clears_partial_message() {
        let mut decoder = Decoder::new();
        decoder.ingest(&[0x90, 60]);
        decoder.reset();
        assert!(decoder.pending().is_empty());
        assert_eq!(decoder.ingest(&[0x80, 60, 0]), vec![MidiEvent::note_off(0, 60, 0)]);
    }

    #[test]
    fn test_status_byte_in_data_slot_discarded() {
        let mut decoder = Decoder::new();
        let events = decoder.ingest(&[0x90, 0x90, 0x40]);
        assert!(events.is_empty());
        assert_eq!(decoder.discarded(), 1);

        let mut outcomes = Vec::new();
        decoder.ingest_with(&[0x80, 60, 0xFF], |o| outcomes.push(o));
        assert_eq!(outcomes, vec![DecodeOutcome::Discarded([0x80, 60, 0xFF])]);
        assert_eq!(decoder.discarded(), 2);
    }

    #[test]
    fn test_data_bytes_up_to_127_accepted() {
        assert_eq!(
            decode_group([0x90, 0x7F, 0x7F]),
            Some(MidiEvent::note_on(0, 127, 127))
        );
    }

    #[test]
    fn test_decode_group_rejects_system_messages() {
        assert_eq!(decode_group([0xF8, 0, 0]), None);
        assert_eq!(decode_group([0x3C, 0x64, 0x90]), None);
    }
}
