mod recording;
mod serial;
mod session;
mod transport;

pub use self::recording::RecordingTransport;
pub use self::serial::{DEFAULT_BAUD_RATE, SerialConfig, SerialTransport};
pub use self::session::{INTER_FRAME_DELAY, SendOutcome, SendReceipt, SignSession};
pub use self::transport::{Transport, TransportError};
