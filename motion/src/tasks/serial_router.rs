/*
* Serial Router
    Input Command Pattern
        #[KEY]:[PAYLOAD];;\r\n
    Output Pattern
        @[KEY]:[RESPONSE]\r\n

    One received byte is consumed per pass. Bytes outside of a '#' frame are ignored.
    Frames with an unknown key get no answer.
*/

use super::*;

pub type SerialHandler<'a> = &'a dyn Fn(&str, &mut Response);

/* --------------------------- Code -------------------------- */
pub struct SerialRouter<'a, const RX: usize, const TX: usize> {
    timer: TaskTimer,
    rx: &'a SerialQueue<RX>,
    tx: &'a SerialQueue<TX>,
    subscribers: FnvIndexMap<&'a str, SerialHandler<'a>, MAX_SUBSCRIBERS>,
    parse_buffer: [u8; PARSE_BUFFER_SIZE],
    cursor: usize,
    is_truncated: bool,
    truncated_frames: u32,
}

impl<'a, const RX: usize, const TX: usize> SerialRouter<'a, RX, TX> {
    pub fn new(rx: &'a SerialQueue<RX>, tx: &'a SerialQueue<TX>) -> Self {
        Self {
            timer: TaskTimer::new(period_ticks(SERIAL_ROUTER_PERIOD_US)),
            rx,
            tx,
            subscribers: FnvIndexMap::new(),
            parse_buffer: [0u8; PARSE_BUFFER_SIZE],
            cursor: 0,
            is_truncated: false,
            truncated_frames: 0,
        }
    }

    pub fn subscribe(&mut self, key: &'a str, handler: SerialHandler<'a>) -> Result<(), ConfigError> {
        if key.is_empty() || key.len() > KEY_SIZE || key.contains(':') {
            return Err(ConfigError::InvalidKey);
        }

        if self.subscribers.contains_key(key) {
            return Err(ConfigError::DuplicateKey);
        }

        self.subscribers
            .insert(key, handler)
            .map(|_| ())
            .map_err(|_| ConfigError::RegistryFull)
    }

    /// Frames that overflowed the parse buffer and were dropped.
    pub fn truncated_frames(&self) -> u32 {
        return self.truncated_frames;
    }

    fn store(&mut self, byte: u8) {
        if self.cursor < PARSE_BUFFER_SIZE {
            self.parse_buffer[self.cursor] = byte;
            self.cursor += 1;
            return;
        }

        if !self.is_truncated {
            self.is_truncated = true;
            self.truncated_frames += 1;
            log::warn!("Serial frame longer than {} bytes dropped", PARSE_BUFFER_SIZE);
        }
    }

    fn has_terminator(&self) -> bool {
        self.cursor >= 3 && &self.parse_buffer[self.cursor - 3..self.cursor] == b";;\r"
    }

    fn handle_frame(&self) {
        // Between '#' and ";;\r"
        let Ok(frame) = core::str::from_utf8(&self.parse_buffer[1..self.cursor - 3]) else {
            log::debug!("Non UTF-8 serial frame ignored");
            return;
        };

        let Some((key, payload)) = frame.split_once(':') else {
            log::debug!("Serial frame without key ignored");
            return;
        };

        let Some(handler) = self.subscribers.get(key) else {
            log::debug!("No subscriber for key {}", key);
            return;
        };

        let mut response = Response::new();
        handler(payload, &mut response);
        if response.is_empty() {
            let _ = response.push_str(RESP_NO_RESPONSE);
        }

        Frame::new(key)
            .push(response.as_str())
            .send(self.tx);
    }
}

impl<'a, const RX: usize, const TX: usize> PeriodicTask for SerialRouter<'a, RX, TX> {
    fn timer(&mut self) -> &mut TaskTimer {
        &mut self.timer
    }

    fn run(&mut self) {
        let Some(byte) = self.rx.pop() else { return; };

        if byte == b'#' {
            self.cursor = 0;
            self.is_truncated = false;
            self.store(byte);
            return;
        }

        // Outside of a frame
        if self.cursor == 0 {
            return;
        }

        // A newline always closes the frame, only a ";;\r\n" ending is handled
        if byte == b'\n' {
            if !self.is_truncated && self.has_terminator() {
                self.handle_frame();
            }
            self.cursor = 0;
            return;
        }

        self.store(byte);
    }
}

/* --------------------------- Test -------------------------- */
#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    fn pump<const RX: usize, const TX: usize>(router: &mut SerialRouter<'_, RX, TX>) {
        while router.rx.len() > 0 {
            router.dispatch();
        }
    }

    fn drain<const N: usize>(tx: &SerialQueue<N>) -> std::string::String {
        let mut out = [0u8; N];
        let len = tx.pop_into(&mut out);
        std::string::String::from_utf8(out[..len].to_vec()).unwrap()
    }

    #[test]
    fn frames_request_into_response() {
        let rx: SerialQueue<64> = SerialQueue::new();
        let tx: SerialQueue<64> = SerialQueue::new();
        let seen = RefCell::new(std::string::String::new());
        let handler = |payload: &str, response: &mut Response| {
            seen.borrow_mut().push_str(payload);
            let _ = response.push_str(RESP_ACK);
        };

        let mut router = SerialRouter::new(&rx, &tx);
        router.subscribe("MCTL", &handler).unwrap();

        rx.push_slice(b"#MCTL:10.0;5.0;;\r\n");
        pump(&mut router);

        assert_eq!(drain(&tx), "@MCTL:ack;;\r\n");
        assert_eq!(*seen.borrow(), "10.0;5.0");
    }

    #[test]
    fn garbage_never_reaches_handler() {
        let rx: SerialQueue<128> = SerialQueue::new();
        let tx: SerialQueue<64> = SerialQueue::new();
        let calls = Cell::new(0);
        let handler = |_: &str, response: &mut Response| {
            calls.set(calls.get() + 1);
            let _ = response.push_str(RESP_ACK);
        };

        let mut router = SerialRouter::new(&rx, &tx);
        router.subscribe("MCTL", &handler).unwrap();

        rx.push_slice(b"#MCTL:10.0;5.0\r\n");
        rx.push_slice(b"#MCTL:10.0;5.0;\r\n");
        rx.push_slice(b"MCTL:1.0;2.0;;\r\n");
        rx.push_slice(b"#MCTL:1.0;2.0;;\n");
        pump(&mut router);

        assert_eq!(calls.get(), 0);
        assert!(tx.is_empty());
    }

    #[test]
    fn unknown_key_gets_no_answer_and_silent_handler_gets_default() {
        let rx: SerialQueue<64> = SerialQueue::new();
        let tx: SerialQueue<64> = SerialQueue::new();
        let handler = |_: &str, _: &mut Response| {};

        let mut router = SerialRouter::new(&rx, &tx);
        router.subscribe("NOOP", &handler).unwrap();

        rx.push_slice(b"#XYZ:1;;\r\n#NOOP:;;\r\n");
        pump(&mut router);

        assert_eq!(drain(&tx), "@NOOP:no response given\r\n");
    }

    #[test]
    fn restart_marker_discards_partial_frame() {
        let rx: SerialQueue<64> = SerialQueue::new();
        let tx: SerialQueue<64> = SerialQueue::new();
        let handler = |payload: &str, response: &mut Response| {
            let _ = response.push_str(payload);
            let _ = response.push_str(";;");
        };

        let mut router = SerialRouter::new(&rx, &tx);
        router.subscribe("BRAK", &handler).unwrap();

        rx.push_slice(b"#BRA#BRAK:3.0;;\r\n");
        pump(&mut router);

        assert_eq!(drain(&tx), "@BRAK:3.0;;\r\n");
    }

    #[test]
    fn oversized_frame_is_dropped() {
        let rx: SerialQueue<512> = SerialQueue::new();
        let tx: SerialQueue<64> = SerialQueue::new();
        let handler = |_: &str, response: &mut Response| {
            let _ = response.push_str(RESP_ACK);
        };

        let mut router = SerialRouter::new(&rx, &tx);
        router.subscribe("MCTL", &handler).unwrap();

        rx.push(b'#');
        rx.push_slice(b"MCTL:");
        for _ in 0..PARSE_BUFFER_SIZE {
            rx.push(b'1');
        }
        rx.push_slice(b";;\r\n");
        pump(&mut router);

        assert!(tx.is_empty());
        assert_eq!(router.truncated_frames(), 1);

        rx.push_slice(b"#MCTL:1;1;;\r\n");
        pump(&mut router);
        assert_eq!(drain(&tx), "@MCTL:ack;;\r\n");
    }

    #[test]
    fn subscribe_validates_keys() {
        let rx: SerialQueue<8> = SerialQueue::new();
        let tx: SerialQueue<8> = SerialQueue::new();
        let handler = |_: &str, _: &mut Response| {};

        let mut router = SerialRouter::new(&rx, &tx);
        assert_eq!(router.subscribe("", &handler), Err(ConfigError::InvalidKey));
        assert_eq!(router.subscribe("TOOLONG", &handler), Err(ConfigError::InvalidKey));
        assert!(router.subscribe("PIDA", &handler).is_ok());
        assert_eq!(router.subscribe("PIDA", &handler), Err(ConfigError::DuplicateKey));
    }
}
