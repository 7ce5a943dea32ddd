use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, instrument, trace};

use super::transport::{Transport, TransportError};
use crate::error::ProtocolError;
use crate::handlers::{
    FrameCodec, MAX_BATCH_LEN, PacketQueue, PacketSequence, QueueError, SignCommand, UnitId,
};
use crate::utils::format_hex;

/// Pause after every frame. Controllers drop frames that arrive sooner.
pub const INTER_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Frames and bytes handed to the transport by one operation.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SendReceipt {
    frames_written: usize,
    bytes_written: usize,
}

impl SendReceipt {
    /// Creates a send receipt.
    ///
    /// ```
    /// use cpower::SendReceipt;
    ///
    /// let receipt = SendReceipt::new(2, 30);
    /// assert_eq!(2, receipt.frames_written());
    /// assert_eq!(30, receipt.bytes_written());
    /// ```
    #[must_use]
    pub fn new(frames_written: usize, bytes_written: usize) -> Self {
        Self {
            frames_written,
            bytes_written,
        }
    }

    #[must_use]
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Escaped bytes written, delimiters included.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    fn record(&mut self, frame: &[u8]) {
        self.frames_written += 1;
        self.bytes_written += frame.len();
    }
}

/// What happened to a command handed to [`SignSession::send`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SendOutcome {
    /// Written straight away as a single packet.
    Transmitted(SendReceipt),
    /// Held in the open batch at `position` until the next flush.
    Queued { position: usize },
}

/// Exclusive connection to one sign controller link.
///
/// Every frame is written, flushed and followed by [`INTER_FRAME_DELAY`]
/// before the next one starts.
#[derive(Debug)]
pub struct SignSession<T> {
    transport: T,
    queue: PacketQueue,
    unit_id: UnitId,
    confirmation: bool,
}

impl<T> SignSession<T>
where
    T: Transport,
{
    /// Creates a session that broadcasts without confirmation.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            queue: PacketQueue::default(),
            unit_id: UnitId::BROADCAST,
            confirmation: false,
        }
    }

    /// Sets the unit addressed by directly sent packets.
    #[must_use]
    pub fn with_unit_id(mut self, unit_id: UnitId) -> Self {
        self.unit_id = unit_id;
        self
    }

    /// Sets the confirmation flag of directly sent packets.
    #[must_use]
    pub fn with_confirmation(mut self, confirmation: bool) -> Self {
        self.confirmation = confirmation;
        self
    }

    #[must_use]
    pub fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    #[must_use]
    pub fn confirmation(&self) -> bool {
        self.confirmation
    }

    #[must_use]
    pub fn is_queueing(&self) -> bool {
        self.queue.is_enabled()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.queue.pending_len()
    }

    /// Starts batching. Later sends are held until [`Self::flush_queue`].
    pub fn begin_queue(&mut self) {
        debug!("starting packet batch");
        self.queue.begin();
    }

    /// Sends or queues one command.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is too large, the batch is full, or
    /// the transport fails. Nothing is written when framing fails.
    #[instrument(skip(self, command), level = "debug", fields(opcode = %command.opcode()))]
    pub async fn send(&mut self, command: &SignCommand) -> Result<SendOutcome, ProtocolError> {
        self.send_payload(command.encode()).await
    }

    /// Sends or queues an already encoded payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is too large, the batch is full, or
    /// the transport fails.
    pub async fn send_payload(&mut self, payload: Vec<u8>) -> Result<SendOutcome, ProtocolError> {
        if self.queue.is_enabled() {
            self.queue.enqueue(payload)?;
            let position = self.queue.pending_len() - 1;
            trace!(position, "payload queued");
            return Ok(SendOutcome::Queued { position });
        }

        let frame = FrameCodec::encode_frame(
            self.unit_id,
            self.confirmation,
            PacketSequence::SINGLE,
            &payload,
        )?;
        let mut receipt = SendReceipt::default();
        self.transmit(&frame).await?;
        receipt.record(&frame);
        Ok(SendOutcome::Transmitted(receipt))
    }

    /// Transmits the open batch as consecutively numbered packets.
    ///
    /// The batch is taken before the first write, so the queue is empty
    /// whatever the outcome. An empty batch writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotQueueing`] when no batch was started, or the
    /// first transport error, which abandons the remaining packets.
    #[instrument(skip_all, level = "debug", fields(%unit_id, confirmation))]
    pub async fn flush_queue(
        &mut self,
        unit_id: UnitId,
        confirmation: bool,
    ) -> Result<SendReceipt, ProtocolError> {
        let batch = self.queue.take_batch()?;
        let Some(last_index) = batch.len().checked_sub(1) else {
            debug!("batch is empty");
            return Ok(SendReceipt::default());
        };
        let total_minus_one = packet_number(last_index)?;

        let frames = batch
            .iter()
            .enumerate()
            .map(|(index, payload)| {
                let sequence = PacketSequence::new(packet_number(index)?, total_minus_one);
                Ok(FrameCodec::encode_frame(
                    unit_id,
                    confirmation,
                    sequence,
                    payload,
                )?)
            })
            .collect::<Result<Vec<_>, ProtocolError>>()?;

        debug!(packets = frames.len(), "flushing packet batch");
        let mut receipt = SendReceipt::default();
        for frame in &frames {
            self.transmit(frame).await?;
            receipt.record(frame);
        }
        Ok(receipt)
    }

    /// Releases the transport.
    #[must_use]
    pub fn into_transport(self) -> T {
        self.transport
    }

    #[instrument(skip(self, frame), level = "trace", fields(frame_len = frame.len()))]
    async fn transmit(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        trace!(frame = %format_hex(frame), "writing frame");
        self.transport.write(frame).await?;
        self.transport.flush().await?;
        sleep(INTER_FRAME_DELAY).await;
        Ok(())
    }
}

fn packet_number(index: usize) -> Result<u8, QueueError> {
    u8::try_from(index).map_err(|_overflow| QueueError::BatchFull { max: MAX_BATCH_LEN })
}
