pub mod bridge; // Read -> decode -> send loop
pub mod config;
pub mod decoder; // Serial bytes to Note On/Off events
pub mod error;
pub mod io;
pub mod shutdown;

pub use bridge::{Bridge, BridgeStats};
pub use config::{BridgeConfig, OutputTarget};
pub use decoder::Decoder;
pub use error::BridgeError;
pub use io::midi::{MidiEvent, NoteKind};
pub use shutdown::ShutdownToken;
