//! Message types for the host link
//!
//! Message types are divided into two categories:
//! - Host → Controller: power commands, move blocks, status/heartbeat requests
//! - Controller → Host: status reports, ACK/NAK, heartbeat responses
//!
//! Multi-byte fields are little-endian. Power values are `f32` in the
//! cutter's configured unit.

use crate::frame::{Frame, FrameError};

// Message type IDs: Host → Controller
pub const MSG_POWER_ON: u8 = 0x01;
pub const MSG_POWER_OFF: u8 = 0x02;
pub const MSG_MOVE: u8 = 0x03;
pub const MSG_STATUS_REQUEST: u8 = 0x04;
pub const MSG_PING: u8 = 0x05;

// Message type IDs: Controller → Host
pub const MSG_STATUS: u8 = 0x20;
pub const MSG_ACK: u8 = 0x21;
pub const MSG_NAK: u8 = 0x22;
pub const MSG_PONG: u8 = 0x23;

// Power-on flag bits
const FLAG_REVERSE: u8 = 1 << 0;
const FLAG_INLINE: u8 = 1 << 1;
const FLAG_HAS_POWER: u8 = 1 << 2;

// Power-off flag bits
const FLAG_INLINE_CLEAR: u8 = 1 << 0;

// Status flag bits
const STATUS_ENABLED: u8 = 1 << 0;
const STATUS_REVERSE: u8 = 1 << 1;

fn read_f32(bytes: &[u8], at: usize) -> Result<f32, FrameError> {
    let raw = bytes.get(at..at + 4).ok_or(FrameError::InvalidFrame)?;
    Ok(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, FrameError> {
    let raw = bytes.get(at..at + 4).ok_or(FrameError::InvalidFrame)?;
    Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn read_u8(bytes: &[u8], at: usize) -> Result<u8, FrameError> {
    bytes.get(at).copied().ok_or(FrameError::InvalidFrame)
}

/// Messages from the host
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// Power on (M3, or M4 with `reverse`)
    PowerOn {
        reverse: bool,
        inline: bool,
        power: Option<f32>,
    },
    /// Power off (M5)
    PowerOff { inline_clear: bool },
    /// Queue a linear move
    Move { feedrate: f32, duration_us: u32 },
    /// Request a status report
    StatusRequest,
    /// Heartbeat request
    Ping,
}

impl HostMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_POWER_ON => {
                // Payload: [flags][power f32, present if FLAG_HAS_POWER]
                let flags = read_u8(payload, 0)?;
                let power = if flags & FLAG_HAS_POWER != 0 {
                    Some(read_f32(payload, 1)?)
                } else {
                    None
                };
                Ok(HostMessage::PowerOn {
                    reverse: flags & FLAG_REVERSE != 0,
                    inline: flags & FLAG_INLINE != 0,
                    power,
                })
            }
            MSG_POWER_OFF => {
                let flags = read_u8(payload, 0)?;
                Ok(HostMessage::PowerOff {
                    inline_clear: flags & FLAG_INLINE_CLEAR != 0,
                })
            }
            MSG_MOVE => Ok(HostMessage::Move {
                feedrate: read_f32(payload, 0)?,
                duration_us: read_u32(payload, 4)?,
            }),
            MSG_STATUS_REQUEST => Ok(HostMessage::StatusRequest),
            MSG_PING => Ok(HostMessage::Ping),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame (host side and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match *self {
            HostMessage::PowerOn {
                reverse,
                inline,
                power,
            } => {
                let mut flags = 0;
                if reverse {
                    flags |= FLAG_REVERSE;
                }
                if inline {
                    flags |= FLAG_INLINE;
                }
                match power {
                    Some(power) => {
                        let p = power.to_le_bytes();
                        Frame::new(MSG_POWER_ON, &[flags | FLAG_HAS_POWER, p[0], p[1], p[2], p[3]])
                    }
                    None => Frame::new(MSG_POWER_ON, &[flags]),
                }
            }
            HostMessage::PowerOff { inline_clear } => {
                let flags = if inline_clear { FLAG_INLINE_CLEAR } else { 0 };
                Frame::new(MSG_POWER_OFF, &[flags])
            }
            HostMessage::Move {
                feedrate,
                duration_us,
            } => {
                let f = feedrate.to_le_bytes();
                let d = duration_us.to_le_bytes();
                Frame::new(MSG_MOVE, &[f[0], f[1], f[2], f[3], d[0], d[1], d[2], d[3]])
            }
            HostMessage::StatusRequest => Ok(Frame::empty(MSG_STATUS_REQUEST)),
            HostMessage::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }
}

/// Cutter status as reported to the host
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    /// Mode code (0 standard, 1 continuous, 2 dynamic)
    pub mode: u8,
    pub enabled: bool,
    pub reverse: bool,
    /// Display power in host units
    pub menu_power: f32,
    /// Latched hardware power
    pub hw_power: u8,
}

/// Messages from the controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerMessage {
    Status(StatusReport),
    /// Frame of the given type was accepted
    Ack { msg_type: u8 },
    /// Frame of the given type was rejected
    Nak { msg_type: u8 },
    /// Heartbeat response
    Pong,
}

impl ControllerMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match *self {
            ControllerMessage::Status(status) => {
                // Payload: [mode][flags][menu_power f32][hw_power]
                let mut flags = 0;
                if status.enabled {
                    flags |= STATUS_ENABLED;
                }
                if status.reverse {
                    flags |= STATUS_REVERSE;
                }
                let p = status.menu_power.to_le_bytes();
                Frame::new(
                    MSG_STATUS,
                    &[status.mode, flags, p[0], p[1], p[2], p[3], status.hw_power],
                )
            }
            ControllerMessage::Ack { msg_type } => Frame::new(MSG_ACK, &[msg_type]),
            ControllerMessage::Nak { msg_type } => Frame::new(MSG_NAK, &[msg_type]),
            ControllerMessage::Pong => Ok(Frame::empty(MSG_PONG)),
        }
    }

    /// Parse a message from a frame (host side and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_STATUS => {
                let flags = read_u8(payload, 1)?;
                Ok(ControllerMessage::Status(StatusReport {
                    mode: read_u8(payload, 0)?,
                    enabled: flags & STATUS_ENABLED != 0,
                    reverse: flags & STATUS_REVERSE != 0,
                    menu_power: read_f32(payload, 2)?,
                    hw_power: read_u8(payload, 6)?,
                }))
            }
            MSG_ACK => Ok(ControllerMessage::Ack {
                msg_type: read_u8(payload, 0)?,
            }),
            MSG_NAK => Ok(ControllerMessage::Nak {
                msg_type: read_u8(payload, 0)?,
            }),
            MSG_PONG => Ok(ControllerMessage::Pong),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_with_power() {
        let msg = HostMessage::PowerOn {
            reverse: true,
            inline: true,
            power: Some(12.5),
        };
        let frame = msg.to_frame().unwrap();

        assert_eq!(frame.msg_type, MSG_POWER_ON);
        assert_eq!(frame.payload[0], FLAG_REVERSE | FLAG_INLINE | FLAG_HAS_POWER);
        assert_eq!(&frame.payload[1..5], &12.5f32.to_le_bytes());
        assert_eq!(HostMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_power_on_without_power() {
        let frame = Frame::new(MSG_POWER_ON, &[0]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame).unwrap(),
            HostMessage::PowerOn {
                reverse: false,
                inline: false,
                power: None,
            }
        );
    }

    #[test]
    fn test_power_on_truncated_power() {
        // Power flag set but no value
        let frame = Frame::new(MSG_POWER_ON, &[FLAG_HAS_POWER, 0, 0]).unwrap();
        assert_eq!(HostMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_power_off() {
        let frame = Frame::new(MSG_POWER_OFF, &[FLAG_INLINE_CLEAR]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame).unwrap(),
            HostMessage::PowerOff { inline_clear: true }
        );
        assert_eq!(
            HostMessage::from_frame(&Frame::empty(MSG_POWER_OFF)),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_move() {
        let msg = HostMessage::Move {
            feedrate: 3000.0,
            duration_us: 250_000,
        };
        let frame = msg.to_frame().unwrap();
        assert_eq!(frame.payload.len(), 8);
        assert_eq!(HostMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_unknown_host_message() {
        let frame = Frame::empty(0x7F);
        assert_eq!(HostMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_status_report() {
        let msg = ControllerMessage::Status(StatusReport {
            mode: 2,
            enabled: true,
            reverse: false,
            menu_power: 80.0,
            hw_power: 204,
        });
        let frame = msg.to_frame().unwrap();

        assert_eq!(frame.msg_type, MSG_STATUS);
        assert_eq!(frame.payload[0], 2);
        assert_eq!(frame.payload[1], STATUS_ENABLED);
        assert_eq!(frame.payload[6], 204);
        assert_eq!(ControllerMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_ack_nak() {
        let frame = ControllerMessage::Nak { msg_type: MSG_MOVE }.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_NAK);
        assert_eq!(frame.payload.as_slice(), &[MSG_MOVE]);

        let frame = ControllerMessage::Ack { msg_type: MSG_PING }.to_frame().unwrap();
        assert_eq!(
            ControllerMessage::from_frame(&frame).unwrap(),
            ControllerMessage::Ack { msg_type: MSG_PING }
        );
    }
}
