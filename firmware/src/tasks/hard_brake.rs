/*
    Hard Brake Timer
        A new signal restarts the timeout, on expiry HardBrake -> Brake
*/

use super::*;

#[embassy_executor::task]
pub async fn hard_brake_timer_task() {
    loop {
        let mut timeout_ms = HARD_BRAKE_SIGNAL.wait().await;

        loop {
            match select(Timer::after_millis(timeout_ms as u64), HARD_BRAKE_SIGNAL.wait()).await {
                Either::First(_) => break,
                Either::Second(restart_ms) => timeout_ms = restart_ms,
            }
        }

        if MODE.expire_hard_brake() {
            log::info!("Hard brake expired");
        }
    }
}
