use derive_more::From;
use thiserror::Error;

use crate::handlers::{FrameCodecError, PacketQueueError, QueueError, ValidationError};
use crate::hw::TransportError;
use crate::media::GifImageError;

/// Errors returned by telemetry initialisation.
#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Errors raised while turning parsed arguments into a run configuration.
#[derive(Debug, Error)]
pub(crate) enum CliConfigError {
    #[error("no serial port given; pass --port, set CPOWER_PORT or use --fake")]
    MissingPort,
}

/// Top-level protocol errors wrapping module-specific error types.
#[derive(Debug, Error, From)]
pub enum ProtocolError {
    #[error(transparent)]
    #[from(ValidationError, Box<ValidationError>)]
    Validation(Box<ValidationError>),
    #[error(transparent)]
    #[from(FrameCodecError, Box<FrameCodecError>)]
    FrameCodec(Box<FrameCodecError>),
    #[error(transparent)]
    #[from(QueueError, Box<QueueError>)]
    Queue(Box<QueueError>),
    #[error(transparent)]
    #[from(TransportError, Box<TransportError>)]
    Transport(Box<TransportError>),
    #[error(transparent)]
    #[from(GifImageError, Box<GifImageError>)]
    Media(Box<GifImageError>),
}

impl From<PacketQueueError> for ProtocolError {
    fn from(error: PacketQueueError) -> Self {
        match error {
            PacketQueueError::Queue(error) => error.into(),
            PacketQueueError::Frame(error) => error.into(),
        }
    }
}
