// Purpose - external interfaces: serial in, MIDI out

pub mod midi;
pub mod output;
pub mod serial;

pub use midi::{MidiEvent, NoteKind};
pub use output::{list_output_ports, MidiSink, MidirSink};
pub use serial::{list_serial_ports, ByteSource, SerialSource};
