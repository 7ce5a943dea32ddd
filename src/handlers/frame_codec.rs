use thiserror::Error;

use super::UnitId;

const START_BYTE: u8 = 0xA5;
const END_BYTE: u8 = 0xAE;
const ESCAPE_BYTE: u8 = 0xAA;
const ESCAPED_START: u8 = 0x05;
const ESCAPED_END: u8 = 0x0E;
const ESCAPED_ESCAPE: u8 = 0x0A;

const PACKET_TYPE: u8 = 0x68;
const CARD_TYPE: u8 = 0x32;
const PROTOCOL_CODE: u8 = 0x7B;

const HEADER_LEN: usize = 9;
const CHECKSUM_LEN: usize = 2;
/// Largest payload one packet can carry.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Errors returned by packet framing and frame inspection.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FrameCodecError {
    /// The payload does not fit in the 16-bit length field. Fragmentation is not supported.
    #[error("payload is too large: {payload_len} bytes exceeds max {max_payload_len}")]
    PayloadTooLarge {
        payload_len: usize,
        max_payload_len: usize,
    },
    /// The frame does not start with `0xA5` or end with `0xAE`.
    #[error("frame is not delimited by 0xA5 .. 0xAE")]
    MissingDelimiter,
    /// A raw delimiter byte appeared inside the escaped region.
    #[error("unescaped delimiter 0x{value:02X} at offset {offset}")]
    StrayDelimiter { offset: usize, value: u8 },
    /// The escaped region ends with a lone `0xAA`.
    #[error("escaped region ends with a dangling 0xAA")]
    DanglingEscape,
    /// `0xAA` was followed by a byte that is not a known escape code.
    #[error("unknown escape sequence 0xAA 0x{value:02X}")]
    InvalidEscape { value: u8 },
    /// The unescaped body is shorter than a header and checksum.
    #[error("packet body is too short: expected at least {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
    /// A fixed header byte has the wrong value.
    #[error("unexpected header byte at offset {offset}: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedHeader { offset: usize, expected: u8, actual: u8 },
    /// The declared payload length does not match the bytes present.
    #[error("payload length mismatch: declared {declared} bytes but packet has {actual} bytes")]
    LengthMismatch { declared: usize, actual: usize },
    /// The trailing checksum does not match the body.
    #[error("checksum mismatch: computed 0x{computed:04X}, frame carries 0x{carried:04X}")]
    ChecksumMismatch { computed: u16, carried: u16 },
}

/// Position of one packet inside a transmission group.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct PacketSequence {
    index: u8,
    total_minus_one: u8,
}

impl PacketSequence {
    /// Sequence fields for a packet sent on its own.
    pub const SINGLE: Self = Self {
        index: 0,
        total_minus_one: 0,
    };

    /// Creates sequence fields from raw header values.
    #[must_use]
    pub const fn new(index: u8, total_minus_one: u8) -> Self {
        Self {
            index,
            total_minus_one,
        }
    }

    /// Zero-based packet index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.index
    }

    /// Group size minus one, identical for every packet in the group.
    #[must_use]
    pub const fn total_minus_one(self) -> u8 {
        self.total_minus_one
    }
}

/// Addressing and sequencing fields of a packet header.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PacketHeader {
    unit_id: UnitId,
    confirmation: bool,
    payload_len: u16,
    sequence: PacketSequence,
}

impl PacketHeader {
    /// Creates header fields for a payload of `payload_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when `payload_len` exceeds 65535.
    ///
    /// ```
    /// use cpower::{FrameCodec, PacketHeader, PacketSequence, UnitId};
    ///
    /// let header = PacketHeader::new(UnitId::BROADCAST, false, 1, PacketSequence::SINGLE)?;
    /// assert_eq!(
    ///     [0x68, 0x32, 0xFF, 0x7B, 0x00, 0x01, 0x00, 0x00, 0x00],
    ///     FrameCodec::encode_header(header)
    /// );
    /// # Ok::<(), cpower::FrameCodecError>(())
    /// ```
    pub fn new(
        unit_id: UnitId,
        confirmation: bool,
        payload_len: usize,
        sequence: PacketSequence,
    ) -> Result<Self, FrameCodecError> {
        let payload_len =
            u16::try_from(payload_len).map_err(|_overflow| FrameCodecError::PayloadTooLarge {
                payload_len,
                max_payload_len: MAX_PAYLOAD_LEN,
            })?;

        Ok(Self {
            unit_id,
            confirmation,
            payload_len,
            sequence,
        })
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
    pub fn payload_len(&self) -> u16 {
        self.payload_len
    }

    #[must_use]
    pub fn sequence(&self) -> PacketSequence {
        self.sequence
    }
}

/// Packet recovered from one of this crate's own frames.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DecodedPacket {
    header: PacketHeader,
    payload: Vec<u8>,
}

impl DecodedPacket {
    /// Returns the decoded header fields.
    #[must_use]
    pub fn header(&self) -> PacketHeader {
        self.header
    }

    /// Returns the unescaped command payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Builds and inspects C-Power serial frames.
pub struct FrameCodec;

impl FrameCodec {
    /// Encodes the 9-byte little-endian packet header.
    #[must_use]
    pub fn encode_header(header: PacketHeader) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0] = PACKET_TYPE;
        bytes[1] = CARD_TYPE;
        bytes[2] = header.unit_id.value();
        bytes[3] = PROTOCOL_CODE;
        bytes[4] = u8::from(header.confirmation);
        bytes[5..7].copy_from_slice(&header.payload_len.to_le_bytes());
        bytes[7] = header.sequence.index;
        bytes[8] = header.sequence.total_minus_one;
        bytes
    }

    /// Sums every byte of `body`, truncated to 16 bits.
    ///
    /// ```
    /// use cpower::FrameCodec;
    ///
    /// assert_eq!(0x0000, FrameCodec::checksum(&[]));
    /// assert_eq!(0x0199, FrameCodec::checksum(&[0x68, 0x32, 0xFF]));
    /// ```
    #[must_use]
    pub fn checksum(body: &[u8]) -> u16 {
        body.iter()
            .fold(0u16, |sum, byte| sum.wrapping_add(u16::from(*byte)))
    }

    /// Byte-stuffs the reserved values `0xAA`, `0xAE` and `0xA5`.
    ///
    /// ```
    /// use cpower::FrameCodec;
    ///
    /// assert_eq!(
    ///     vec![0x01, 0xAA, 0x0A, 0xAA, 0x0E, 0xAA, 0x05],
    ///     FrameCodec::escape(&[0x01, 0xAA, 0xAE, 0xA5])
    /// );
    /// ```
    #[must_use]
    pub fn escape(bytes: &[u8]) -> Vec<u8> {
        let mut escaped = Vec::with_capacity(bytes.len() + bytes.len() / 8);
        for &byte in bytes {
            match byte {
                ESCAPE_BYTE => escaped.extend_from_slice(&[ESCAPE_BYTE, ESCAPED_ESCAPE]),
                END_BYTE => escaped.extend_from_slice(&[ESCAPE_BYTE, ESCAPED_END]),
                START_BYTE => escaped.extend_from_slice(&[ESCAPE_BYTE, ESCAPED_START]),
                other => escaped.push(other),
            }
        }
        escaped
    }

    /// Reverses [`FrameCodec::escape`].
    ///
    /// # Errors
    ///
    /// Returns an error when `0xAA` is the final byte or is followed by an
    /// unknown escape code.
    pub fn unescape(bytes: &[u8]) -> Result<Vec<u8>, FrameCodecError> {
        let mut unescaped = Vec::with_capacity(bytes.len());
        let mut iter = bytes.iter().copied();
        while let Some(byte) = iter.next() {
            if byte != ESCAPE_BYTE {
                unescaped.push(byte);
                continue;
            }
            let restored = match iter.next() {
                Some(ESCAPED_ESCAPE) => ESCAPE_BYTE,
                Some(ESCAPED_END) => END_BYTE,
                Some(ESCAPED_START) => START_BYTE,
                Some(value) => return Err(FrameCodecError::InvalidEscape { value }),
                None => return Err(FrameCodecError::DanglingEscape),
            };
            unescaped.push(restored);
        }
        Ok(unescaped)
    }

    /// Wraps `payload` into a complete delimited frame.
    ///
    /// The checksum covers the unescaped header and payload; escaping is applied
    /// last, to header, payload and checksum together.
    ///
    /// # Errors
    ///
    /// Returns an error when `payload` is longer than 65535 bytes.
    ///
    /// ```
    /// use cpower::{FrameCodec, PacketSequence, UnitId};
    ///
    /// let frame = FrameCodec::encode_frame(UnitId::BROADCAST, false, PacketSequence::SINGLE, &[0x06])?;
    /// assert_eq!(
    ///     vec![0xA5, 0x68, 0x32, 0xFF, 0x7B, 0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x1B, 0x02, 0xAE],
    ///     frame
    /// );
    /// # Ok::<(), cpower::FrameCodecError>(())
    /// ```
    pub fn encode_frame(
        unit_id: UnitId,
        confirmation: bool,
        sequence: PacketSequence,
        payload: &[u8],
    ) -> Result<Vec<u8>, FrameCodecError> {
        let header = PacketHeader::new(unit_id, confirmation, payload.len(), sequence)?;

        let mut body = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
        body.extend_from_slice(&Self::encode_header(header));
        body.extend_from_slice(payload);
        let checksum = Self::checksum(&body);
        body.extend_from_slice(&checksum.to_le_bytes());

        let escaped = Self::escape(&body);
        let mut frame = Vec::with_capacity(escaped.len() + 2);
        frame.push(START_BYTE);
        frame.extend_from_slice(&escaped);
        frame.push(END_BYTE);
        Ok(frame)
    }

    /// Parses a frame produced by [`FrameCodec::encode_frame`].
    ///
    /// Used to inspect outgoing traffic; controllers never answer on this link.
    ///
    /// # Errors
    ///
    /// Returns an error when delimiters, escaping, fixed header bytes, the
    /// declared length or the checksum are inconsistent.
    pub fn decode_frame(frame: &[u8]) -> Result<DecodedPacket, FrameCodecError> {
        let inner = match frame {
            [START_BYTE, inner @ .., END_BYTE] => inner,
            _ => return Err(FrameCodecError::MissingDelimiter),
        };
        if let Some(offset) = inner
            .iter()
            .position(|byte| matches!(*byte, START_BYTE | END_BYTE))
        {
            return Err(FrameCodecError::StrayDelimiter {
                offset: offset + 1,
                value: inner[offset],
            });
        }

        let body = Self::unescape(inner)?;
        let min = HEADER_LEN + CHECKSUM_LEN;
        if body.len() < min {
            return Err(FrameCodecError::TooShort {
                min,
                actual: body.len(),
            });
        }

        for (offset, expected) in [(0, PACKET_TYPE), (1, CARD_TYPE), (3, PROTOCOL_CODE)] {
            if body[offset] != expected {
                return Err(FrameCodecError::UnexpectedHeader {
                    offset,
                    expected,
                    actual: body[offset],
                });
            }
        }

        let (packet, checksum_bytes) = body.split_at(body.len() - CHECKSUM_LEN);
        let carried = u16::from_le_bytes([checksum_bytes[0], checksum_bytes[1]]);
        let computed = Self::checksum(packet);
        if carried != computed {
            return Err(FrameCodecError::ChecksumMismatch { computed, carried });
        }

        let declared = usize::from(u16::from_le_bytes([packet[5], packet[6]]));
        let payload = &packet[HEADER_LEN..];
        if declared != payload.len() {
            return Err(FrameCodecError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        let header = PacketHeader::new(
            UnitId::new(packet[2]),
            packet[4] != 0,
            payload.len(),
            PacketSequence::new(packet[7], packet[8]),
        )?;
        Ok(DecodedPacket {
            header,
            payload: payload.to_vec(),
        })
    }
}
