/*
* Serial Resources
    Input Command Pattern
        #[KEY]:[PAYLOAD];;\r\n
    Output Pattern
        @[KEY]:[RESPONSE]\r\n
    Payload Pattern
        [FIELD];[FIELD];...
*/

use super::*;

pub type Response = String<RESPONSE_SIZE>;

/* --------------------------- Serial Queue -------------------------- */
/// Byte queue shared between the receive/transmit side and the scheduled tasks.
/// Every access runs inside a critical section.
pub struct SerialQueue<const N: usize> {
    queue: Mutex<CriticalSectionRawMutex, RefCell<RingBuffer<u8, N>>>,
    dropped: AtomicU32,
}

impl<const N: usize> SerialQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(RingBuffer::filled_with(0))),
            dropped: AtomicU32::new(0),
        }
    }

    pub fn push(&self, byte: u8) -> bool {
        let accepted = self.queue.lock(|queue| queue.borrow_mut().push(byte));
        if !accepted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }

        return accepted;
    }

    /// Drains `bytes` into the queue until it is full, the rest is dropped.
    pub fn push_slice(&self, bytes: &[u8]) -> usize {
        let accepted = self.queue.lock(|queue| queue.borrow_mut().push_slice(bytes));
        let lost = bytes.len() - accepted;

        if lost > 0 {
            self.dropped.fetch_add(lost as u32, Ordering::Relaxed);
            log::warn!("Serial queue full, dropped {} bytes", lost);
        }

        return accepted;
    }

    pub fn pop(&self) -> Option<u8> {
        return self.queue.lock(|queue| queue.borrow_mut().pop());
    }

    /// Pops into `out` until it is full or the queue is empty.
    pub fn pop_into(&self, out: &mut [u8]) -> usize {
        return self.queue.lock(|queue| {
            let mut queue = queue.borrow_mut();
            let mut len = 0;
            while len < out.len() {
                let Some(byte) = queue.pop() else { break; };
                out[len] = byte;
                len += 1;
            }
            len
        });
    }

    pub fn is_empty(&self) -> bool {
        return self.queue.lock(|queue| queue.borrow().is_empty());
    }

    pub fn len(&self) -> usize {
        return self.queue.lock(|queue| queue.borrow().len());
    }

    pub fn clear(&self) {
        self.queue.lock(|queue| queue.borrow_mut().clear());
    }

    pub fn dropped(&self) -> u32 {
        return self.dropped.load(Ordering::Relaxed);
    }
}

/* --------------------------- Frame -------------------------- */
/// Outgoing `@KEY:...\r\n` message.
pub struct Frame {
    pub data: String<RESPONSE_SIZE>,
}

impl Frame {
    pub fn new(key: &str) -> Self {
        let mut frame = Self { data: String::new() };
        frame.push('@').push(key).push(':');
        frame
    }

    pub fn push<T: ToFrame>(&mut self, value: T) -> &mut Self {
        value.push_to_frame(self);
        self
    }

    /// Closes the frame and queues it whole, a frame that does not fit is dropped.
    pub fn send<const N: usize>(&mut self, tx: &SerialQueue<N>) -> bool {
        self.push("\r\n");
        let bytes = self.data.as_bytes();

        let sent = tx.queue.lock(|queue| {
            let mut queue = queue.borrow_mut();
            if queue.capacity() - queue.len() < bytes.len() {
                return false;
            }
            queue.push_slice(bytes);
            true
        });

        if !sent {
            tx.dropped.fetch_add(bytes.len() as u32, Ordering::Relaxed);
            log::warn!("Tx queue full, dropped frame {}", self.data.as_str());
        }

        return sent;
    }

    pub fn as_str(&self) -> &str {
        self.data.as_str()
    }
}

/* --------------------------- Frame Push Trait -------------------------- */
pub trait ToFrame {
    fn push_to_frame(self, frame: &mut Frame);
}

impl ToFrame for char {
    fn push_to_frame(self, frame: &mut Frame) {
        let _ = frame.data.push(self);
    }
}

impl ToFrame for &str {
    fn push_to_frame(self, frame: &mut Frame) {
        let _ = frame.data.push_str(self);
    }
}

impl ToFrame for i32 {
    fn push_to_frame(self, frame: &mut Frame) {
        let _ = write!(frame.data, "{}", self);
    }
}

impl ToFrame for f32 {
    fn push_to_frame(self, frame: &mut Frame) {
        let _ = write!(frame.data, "{:.2}", self);
    }
}

/* --------------------------- Payload Reader -------------------------- */
/// Cursor over the `;` separated fields of a request payload.
pub struct PayloadReader<'a> {
    fields: core::str::Split<'a, char>,
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a str) -> Self {
        Self {
            fields: payload.split(';'),
        }
    }

    pub fn read<T: FromPayload>(&mut self) -> Option<T> {
        let field = self.fields.next()?;
        T::from_payload(field.trim())
    }

    pub fn read_f32(&mut self) -> Option<f32> {
        let val: f32 = self.read()?;
        if val.is_finite() {
            Some(val)
        } else {
            None
        }
    }

    /// True when only empty fields remain, so `1.0;2.0;;` reads like `1.0;2.0`.
    pub fn is_done(&mut self) -> bool {
        self.fields.all(|field| field.trim().is_empty())
    }
}

/* --------------------------- Payload Read Trait -------------------------- */
pub trait FromPayload: Sized {
    fn from_payload(field: &str) -> Option<Self>;
}

impl FromPayload for f32 {
    fn from_payload(field: &str) -> Option<Self> {
        field.parse().ok()
    }
}

impl FromPayload for i32 {
    fn from_payload(field: &str) -> Option<Self> {
        field.parse().ok()
    }
}

impl FromPayload for bool {
    fn from_payload(field: &str) -> Option<Self> {
        let val: i32 = field.parse().ok()?;
        Some(val >= 1)
    }
}

/* --------------------------- Test -------------------------- */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_parses_fields_in_order() {
        let mut reader = PayloadReader::new("10.0;-5.5;;");
        assert_eq!(reader.read_f32(), Some(10.0));
        assert_eq!(reader.read_f32(), Some(-5.5));
        assert!(reader.is_done());
    }

    #[test]
    fn reader_rejects_garbage_and_missing_fields() {
        let mut reader = PayloadReader::new("abc;1");
        assert_eq!(reader.read_f32(), None);

        let mut reader = PayloadReader::new("1.0");
        assert_eq!(reader.read_f32(), Some(1.0));
        assert_eq!(reader.read_f32(), None);

        let mut reader = PayloadReader::new("inf");
        assert_eq!(reader.read_f32(), None);
    }

    #[test]
    fn reader_flags_trailing_data() {
        let mut reader = PayloadReader::new("1;2;3");
        assert_eq!(reader.read::<i32>(), Some(1));
        assert!(!reader.is_done());
    }

    #[test]
    fn frame_formats_key_and_value() {
        let tx: SerialQueue<64> = SerialQueue::new();
        let mut frame = Frame::new("ENPB");
        frame.push(1.2345f32).push(";;");
        assert!(frame.send(&tx));

        let mut out = [0u8; 64];
        let len = tx.pop_into(&mut out);
        assert_eq!(&out[..len], b"@ENPB:1.23;;\r\n");
    }

    #[test]
    fn queue_counts_dropped_bytes() {
        let queue: SerialQueue<4> = SerialQueue::new();
        assert_eq!(queue.push_slice(b"#MCTL"), 4);
        assert!(!queue.push(b'x'));
        assert_eq!(queue.dropped(), 2);
        assert_eq!(queue.pop(), Some(b'#'));
        assert_eq!(queue.len(), 3);
    }
}
