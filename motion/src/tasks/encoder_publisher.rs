/*
    Encoder Publisher
        @ENPB:[SPEED_RPS];;\r\n while active
*/

use super::*;

/* --------------------------- Code -------------------------- */
pub struct EncoderPublisher<'a, const TX: usize> {
    timer: TaskTimer,
    sensor: &'a dyn RotarySpeedSensor,
    tx: &'a SerialQueue<TX>,
    is_active: bool,
}

impl<'a, const TX: usize> EncoderPublisher<'a, TX> {
    pub fn new(period_us: u32, sensor: &'a dyn RotarySpeedSensor, tx: &'a SerialQueue<TX>) -> Self {
        Self {
            timer: TaskTimer::new(period_ticks(period_us)),
            sensor,
            tx,
            is_active: false,
        }
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// `0` or `1`
    pub fn serial_callback(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(is_active), true) = (reader.read::<bool>(), reader.is_done()) else {
            let _ = response.push_str(RESP_SYNTAX_ERROR);
            return;
        };

        self.set_active(is_active);
        let _ = response.push_str(RESP_ACK);
    }
}

impl<'a, const TX: usize> PeriodicTask for EncoderPublisher<'a, TX> {
    fn timer(&mut self) -> &mut TaskTimer {
        &mut self.timer
    }

    fn run(&mut self) {
        if !self.is_active {
            return;
        }

        Frame::new(KEY_ENCODER_PUBLISH)
            .push(self.sensor.speed_rps())
            .push(";;")
            .send(self.tx);
    }
}

/* --------------------------- Test -------------------------- */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_only_while_active() {
        let counter = AtomicCounter::new();
        let encoder = RefCell::new(EncoderTask::new(10_000, &counter, 2048, PassThrough));
        let tx: SerialQueue<64> = SerialQueue::new();
        let mut publisher = EncoderPublisher::new(ENCODER_PUBLISHER_PERIOD_US, &encoder, &tx);

        publisher.run();
        assert!(tx.is_empty());

        let mut response = Response::new();
        publisher.serial_callback("1", &mut response);
        assert_eq!(response.as_str(), RESP_ACK);

        counter.add(20);
        encoder.borrow_mut().run();
        publisher.run();

        let mut out = [0u8; 64];
        let len = tx.pop_into(&mut out);
        assert_eq!(&out[..len], b"@ENPB:0.98;;\r\n");

        let mut response = Response::new();
        publisher.serial_callback("x", &mut response);
        assert_eq!(response.as_str(), RESP_SYNTAX_ERROR);
        assert!(publisher.is_active());
    }
}
