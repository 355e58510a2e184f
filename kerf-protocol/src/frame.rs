//! Frame encoding and decoding for the host link.
//!
//! Frame format:
//! - START (1 byte): 0xC5 synchronization byte
//! - LENGTH (1 byte): payload length (0-64)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-64 bytes): type-specific data
//! - CRC (1 byte): CRC-8 (poly 0x07, init 0x00) over LENGTH, TYPE and PAYLOAD

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xC5;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// Maximum complete frame size (START + LENGTH + TYPE + MAX_PAYLOAD + CRC)
pub const MAX_FRAME_SIZE: usize = 1 + 1 + 1 + MAX_PAYLOAD_SIZE + 1;

const CRC8_POLY: u8 = 0x07;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// CRC mismatch
    InvalidCrc,
    /// Unknown message type or malformed payload
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Fold one byte into a running CRC-8
fn crc8_update(crc: u8, byte: u8) -> u8 {
    let mut crc = crc ^ byte;
    for _ in 0..8 {
        crc = if crc & 0x80 != 0 {
            (crc << 1) ^ CRC8_POLY
        } else {
            crc << 1
        };
    }
    crc
}

/// CRC-8 of a byte sequence
pub fn crc8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |crc, &byte| crc8_update(crc, byte))
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// CRC over the frame header and payload
    fn crc(&self) -> u8 {
        let header = crc8_update(crc8_update(0, self.payload.len() as u8), self.msg_type);
        self.payload
            .iter()
            .fold(header, |crc, &byte| crc8_update(crc, byte))
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        4 + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        let out = buffer
            .get_mut(..frame_len)
            .ok_or(FrameError::BufferTooSmall)?;

        let (header, rest) = out.split_at_mut(3);
        header.copy_from_slice(&[FRAME_START, self.payload.len() as u8, self.msg_type]);
        let (payload, crc) = rest.split_at_mut(self.payload.len());
        payload.copy_from_slice(&self.payload);
        crc[0] = self.crc();

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Parser progress; the running CRC travels with the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    Length,
    Type { len: u8, crc: u8 },
    Payload { len: u8, msg_type: u8, crc: u8 },
    Crc { msg_type: u8, crc: u8 },
}

/// Byte-at-a-time frame parser
///
/// Bytes outside a frame are skipped until the next START byte, so the
/// parser resynchronizes after line noise or a dropped frame.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Start,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::Start;
        self.payload.clear();
    }

    /// Check if a frame is partially received
    pub fn in_frame(&self) -> bool {
        self.state != ParseState::Start
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on a bad frame (the
    /// parser is then back to hunting for START).
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.state = match self.state {
            ParseState::Start => {
                if byte == FRAME_START {
                    self.payload.clear();
                    ParseState::Length
                } else {
                    ParseState::Start
                }
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                ParseState::Type {
                    len: byte,
                    crc: crc8_update(0, byte),
                }
            }
            ParseState::Type { len, crc } => {
                let crc = crc8_update(crc, byte);
                if len == 0 {
                    ParseState::Crc { msg_type: byte, crc }
                } else {
                    ParseState::Payload {
                        len,
                        msg_type: byte,
                        crc,
                    }
                }
            }
            ParseState::Payload { len, msg_type, crc } => {
                // Length was bounded by MAX_PAYLOAD_SIZE above
                let _ = self.payload.push(byte);
                let crc = crc8_update(crc, byte);
                if self.payload.len() == len as usize {
                    ParseState::Crc { msg_type, crc }
                } else {
                    ParseState::Payload { len, msg_type, crc }
                }
            }
            ParseState::Crc { msg_type, crc } => {
                let payload = core::mem::take(&mut self.payload);
                self.state = ParseState::Start;
                if byte != crc {
                    return Err(FrameError::InvalidCrc);
                }
                return Ok(Some(Frame { msg_type, payload }));
            }
        };
        Ok(None)
    }

    /// Feed bytes until a frame completes or fails
    ///
    /// Returns the number of bytes consumed with the result, so the caller
    /// can continue with the remainder.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<Frame>, FrameError>) {
        for (index, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => continue,
                result => return (index + 1, result),
            }
        }
        (bytes.len(), Ok(None))
    }
}
