use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a byte transport. Sessions propagate them unchanged.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open serial port `{port}`")]
    Open {
        port: String,
        source: tokio_serial::Error,
    },
    #[error("transport I/O failed")]
    Io(#[from] std::io::Error),
}

/// Sink for finished wire frames.
///
/// Implementations write bytes as given; framing and pacing belong to
/// [`SignSession`](crate::SignSession).
#[async_trait]
pub trait Transport: Send {
    /// Writes one complete frame.
    async fn write(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Pushes buffered bytes onto the link.
    async fn flush(&mut self) -> Result<(), TransportError>;
}

#[async_trait]
impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    async fn write(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        (**self).write(frame).await
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        (**self).flush().await
    }
}
