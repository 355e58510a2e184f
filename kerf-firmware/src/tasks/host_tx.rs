//! Host UART transmit task
//!
//! Encodes replies from the other tasks and writes them to the host.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use kerf_protocol::ControllerMessage;

use crate::channels::REPLIES;

/// Host TX task - sends replies to the host
#[embassy_executor::task]
pub async fn host_tx_task(mut tx: BufferedUartTx) {
    info!("Host TX task started");

    loop {
        let msg = REPLIES.receive().await;
        send(&mut tx, &msg).await;
    }
}

async fn send(tx: &mut BufferedUartTx, msg: &ControllerMessage) {
    let frame = match msg.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to encode reply: {:?}", e);
            return;
        }
    };

    let mut buf = [0u8; 80];
    match frame.encode(&mut buf) {
        Ok(len) => {
            if let Err(e) = tx.write_all(&buf[..len]).await {
                warn!("Failed to send reply: {:?}", e);
            } else {
                trace!("TX: {} bytes", len);
            }
        }
        Err(e) => warn!("Failed to frame reply: {:?}", e),
    }
}
