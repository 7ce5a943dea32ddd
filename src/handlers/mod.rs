mod clock;
mod command;
mod control;
mod fields;
mod frame_codec;
mod image;
mod layout;
mod packet_queue;
mod text;

pub use self::clock::{Clock, ClockContent, ClockFormat};
pub use self::command::SignCommand;
pub use self::control::SetVariable;
pub use self::fields::{
    AsciiText, ClockFontSize, FontSize, Rgb, UnitId, ValidationError, WindowIndex,
};
pub use self::frame_codec::{
    DecodedPacket, FrameCodec, FrameCodecError, MAX_PAYLOAD_LEN, PacketHeader, PacketSequence,
};
pub use self::image::Image;
pub use self::layout::{Division, Window};
pub use self::packet_queue::{MAX_BATCH_LEN, PacketQueue, PacketQueueError, QueueError};
pub use self::text::{FormattedText, ScrollingText, StaticText, format_text};
