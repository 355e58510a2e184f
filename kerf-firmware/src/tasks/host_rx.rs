//! Host UART receive task
//!
//! Receives frames from the host and forwards decoded messages to the
//! cutter task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use kerf_protocol::{ControllerMessage, FrameParser, HostMessage};

use crate::channels::{HOST_COMMANDS, REPLIES};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Host RX task - receives and parses frames from the host
#[embassy_executor::task]
pub async fn host_rx_task(mut rx: BufferedUartRx) {
    info!("Host RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match HostMessage::from_frame(&frame) {
                            Ok(msg) => {
                                debug!("Host message: {:?}", msg);
                                // Commands are never dropped: the host waits for
                                // an ACK before sending more
                                HOST_COMMANDS.send(msg).await;
                            }
                            Err(e) => {
                                warn!("Failed to parse host message 0x{:02x}: {:?}", frame.msg_type, e);
                                reply(ControllerMessage::Nak {
                                    msg_type: frame.msg_type,
                                });
                            }
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

fn reply(msg: ControllerMessage) {
    if REPLIES.try_send(msg).is_err() {
        warn!("Reply channel full, dropping NAK");
    }
}
