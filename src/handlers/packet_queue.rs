use thiserror::Error;

use super::{FrameCodecError, frame_codec::MAX_PAYLOAD_LEN};

/// Largest batch whose last index still fits the one-byte total field.
pub const MAX_BATCH_LEN: usize = u8::MAX as usize + 1;

/// Errors returned by batch bookkeeping.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum QueueError {
    /// A batch operation was used before `begin`.
    #[error("queueing has not been started")]
    NotQueueing,
    /// The batch already holds the maximum number of packets.
    #[error("batch already holds {max} packets")]
    BatchFull { max: usize },
}

/// Pending payloads for one multi-packet transmission.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PacketQueue {
    enabled: bool,
    pending: Vec<Vec<u8>>,
}

impl PacketQueue {
    /// Starts a fresh batch, discarding anything pending.
    pub fn begin(&mut self) {
        self.enabled = true;
        self.pending.clear();
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Appends an unescaped payload to the batch.
    ///
    /// # Errors
    ///
    /// Returns an error when queueing is off, the payload cannot be framed, or
    /// the batch is full. Nothing is appended on error.
    pub fn enqueue(&mut self, payload: Vec<u8>) -> Result<(), PacketQueueError> {
        if !self.enabled {
            return Err(QueueError::NotQueueing.into());
        }
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameCodecError::PayloadTooLarge {
                payload_len: payload.len(),
                max_payload_len: MAX_PAYLOAD_LEN,
            }
            .into());
        }
        if self.pending.len() >= MAX_BATCH_LEN {
            return Err(QueueError::BatchFull { max: MAX_BATCH_LEN }.into());
        }
        self.pending.push(payload);
        Ok(())
    }

    /// Hands over the batch and leaves the queue empty but enabled.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotQueueing`] when queueing is off; pending
    /// payloads are left untouched.
    ///
    /// ```
    /// use cpower::PacketQueue;
    ///
    /// let mut queue = PacketQueue::default();
    /// assert!(queue.take_batch().is_err());
    ///
    /// queue.begin();
    /// queue.enqueue(vec![0x06])?;
    /// assert_eq!(vec![vec![0x06]], queue.take_batch()?);
    /// assert_eq!(0, queue.pending_len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn take_batch(&mut self) -> Result<Vec<Vec<u8>>, QueueError> {
        if !self.enabled {
            return Err(QueueError::NotQueueing);
        }
        Ok(std::mem::take(&mut self.pending))
    }
}

/// Errors returned by [`PacketQueue::enqueue`].
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum PacketQueueError {
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Frame(#[from] FrameCodecError),
}
