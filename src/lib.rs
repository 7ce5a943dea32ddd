mod app;
mod cli;
mod error;
mod handlers;
mod hw;
mod media;
mod protocol;
mod telemetry;
mod terminal;
mod utils;

pub use app::{run, run_with_clients};
pub use cli::{
    Args, ClockArgs, Command, ImageArgs, Link, LogLevel, OutputFormat, SessionSettings,
    SetVariableArgs, StaticTextArgs, TextArgs, WindowsArgs,
};
pub use error::ProtocolError;
pub use handlers::{
    AsciiText, Clock, ClockContent, ClockFontSize, ClockFormat, DecodedPacket, Division,
    FontSize, FormattedText, FrameCodec, FrameCodecError, Image, MAX_BATCH_LEN, MAX_PAYLOAD_LEN,
    PacketHeader, PacketQueue, PacketQueueError, PacketSequence, QueueError, Rgb, ScrollingText,
    SetVariable, SignCommand, StaticText, UnitId, ValidationError, Window, WindowIndex,
    format_text,
};
pub use hw::{
    DEFAULT_BAUD_RATE, INTER_FRAME_DELAY, RecordingTransport, SendOutcome, SendReceipt,
    SerialConfig, SerialTransport, SignSession, Transport, TransportError,
};
pub use media::{GifImage, GifImageError};
pub use protocol::{Alignment, Calendar, Colour, CommandCode, Effect, ImageFormat, SaveMode};
pub use terminal::{SystemTerminalClient, TerminalClient};
