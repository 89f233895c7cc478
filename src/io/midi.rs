use std::fmt;

/// Status nibble of the Note On message family.
pub const NOTE_ON: u8 = 0x90;
/// Status nibble of the Note Off message family.
pub const NOTE_OFF: u8 = 0x80;

/// Which half of a key press a [`MidiEvent`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    NoteOn,
    NoteOff,
}

impl NoteKind {
    /// High nibble used when the event goes back out on the wire
    pub const fn status_nibble(self) -> u8 {
        match self {
            NoteKind::NoteOn => NOTE_ON,
            NoteKind::NoteOff => NOTE_OFF,
        }
    }

    /// Lowercase message name, as printed in logs and the monitor
    pub const fn name(self) -> &'static str {
        match self {
            NoteKind::NoteOn => "note_on",
            NoteKind::NoteOff => "note_off",
        }
    }
}

/// A decoded Note On / Note Off message.
///
/// `channel` is 0-15, `note` and `velocity` are 0-127. The decoder never
/// builds an event outside those ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiEvent {
    pub kind: NoteKind,
    pub channel: u8,
    pub note: u8,
    pub velocity: u8,
}

impl MidiEvent {
    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteKind::NoteOn,
            channel,
            note,
            velocity,
        }
    }

    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteKind::NoteOff,
            channel,
            note,
            velocity,
        }
    }

    /// Encode as the three bytes sent to the output port.
    ///
    /// The effective kind decides the status byte, so a zero-velocity Note On
    /// that was decoded as a Note Off leaves as `0x8n`.
    pub const fn to_bytes(&self) -> [u8; 3] {
        [
            self.kind.status_nibble() | (self.channel & 0x0F),
            self.note,
            self.velocity,
        ]
    }
}

impl fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} channel={} note={} velocity={}",
            self.kind.name(),
            self.channel,
            self.note,
            self.velocity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_encodes_channel_into_status() {
        let event = MidiEvent::note_on(9, 36, 127);
        assert_eq!(event.to_bytes(), [0x99, 36, 127]);
    }

    #[test]
    fn test_note_off_keeps_release_velocity() {
        let event = MidiEvent::note_off(0, 60, 64);
        assert_eq!(event.to_bytes(), [0x80, 60, 64]);
    }

    #[test]
    fn test_zero_velocity_note_off_leaves_as_0x80() {
        // decoded from [0x93, 60, 0]
        let event = MidiEvent::note_off(3, 60, 0);
        assert_eq!(event.to_bytes(), [0x83, 60, 0]);
    }

    #[test]
    fn test_display_matches_log_format() {
        let event = MidiEvent::note_on(0, 60, 100);
        assert_eq!(event.to_string(), "note_on channel=0 note=60 velocity=100");
    }
}
