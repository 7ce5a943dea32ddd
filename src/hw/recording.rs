use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::transport::{Transport, TransportError};

/// In-memory transport that records every flushed frame.
///
/// Clones share the same recording, so a test can keep one handle while the
/// session owns another.
///
/// ```
/// use cpower::{RecordingTransport, SignCommand, SignSession};
///
/// # async fn demo() -> Result<(), cpower::ProtocolError> {
/// let transport = RecordingTransport::default();
/// let mut session = SignSession::new(transport.clone());
/// session.send(&SignCommand::Exit).await?;
/// assert_eq!(1, transport.frames().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    frames: Vec<Vec<u8>>,
    pending: Vec<u8>,
    fail_after: Option<usize>,
    writes: usize,
}

impl RecordingTransport {
    /// Creates a transport whose writes start failing once `writes` frames
    /// have been accepted.
    #[must_use]
    pub fn failing_after(writes: usize) -> Self {
        let transport = Self::default();
        transport.lock().fail_after = Some(writes);
        transport
    }

    /// Returns every frame flushed so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock().frames.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn write(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let mut state = self.lock();
        if state.fail_after.is_some_and(|limit| state.writes >= limit) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "recording transport closed").into());
        }
        state.writes += 1;
        state.pending.extend_from_slice(frame);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        let mut state = self.lock();
        if !state.pending.is_empty() {
            let frame = std::mem::take(&mut state.pending);
            state.frames.push(frame);
        }
        Ok(())
    }
}
