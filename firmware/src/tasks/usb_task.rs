/*
* USB Task
*   CDC 0 : serial protocol, RX_QUEUE <- host, TX_QUEUE -> host
*   CDC 1 : log output
*/

use super::*;

#[embassy_executor::task]
pub async fn usb_device_task(mut usb: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    usb.run().await;
}

#[embassy_executor::task]
pub async fn usb_rx_task(mut receiver: Receiver<'static, Driver<'static, USB>>) {
    let mut rx_buf = [0u8; USB_PACKET_SIZE];

    loop {
        receiver.wait_connection().await;
        log::info!("Serial connected");

        loop {
            match receiver.read_packet(&mut rx_buf).await {
                Ok(len) => {
                    RX_QUEUE.push_slice(&rx_buf[..len]);
                }
                Err(_) => break,
            }
        }

        log::info!("Serial disconnected");
    }
}

#[embassy_executor::task]
pub async fn usb_tx_task(mut sender: Sender<'static, Driver<'static, USB>>) {
    let mut tx_buf = [0u8; USB_TX_CHUNK_SIZE];
    let mut ticker = Ticker::every(Duration::from_micros(USB_TX_POLL_US));

    loop {
        sender.wait_connection().await;

        loop {
            let len = TX_QUEUE.pop_into(&mut tx_buf);
            if len == 0 {
                ticker.next().await;
                continue;
            }

            if sender.write_packet(&tx_buf[..len]).await.is_err() {
                break;
            }
        }
    }
}

#[embassy_executor::task]
pub async fn usb_logger_task(class: CdcAcmClass<'static, Driver<'static, USB>>) {
    embassy_usb_logger::with_class!(LOG_BUFFER_SIZE, log::LevelFilter::Info, class).await;
}
