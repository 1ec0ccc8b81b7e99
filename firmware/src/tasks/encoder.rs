/*
    Encoder Task
        PIO quadrature decoder, every step lands in ENCODER_COUNTER
*/

use super::*;

#[embassy_executor::task]
pub async fn encoder_task(mut encoder: PioEncoder<'static, PIO0, 0>) {
    loop {
        match encoder.read().await {
            Direction::Clockwise => ENCODER_COUNTER.increment(),
            Direction::CounterClockwise => ENCODER_COUNTER.decrement(),
        }
    }
}
