/*
    Fixed Size Ring Buffer
*/

/* --------------------------- Code -------------------------- */
pub struct RingBuffer<T: Copy + Default, const N: usize> {
    buffer: [T; N],
    start: usize,
    end: usize,
    size: usize,
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        Self::filled_with(T::default())
    }

    /// Const constructor for statics, `init` only pads the unused slots.
    pub const fn filled_with(init: T) -> Self {
        Self {
            buffer: [init; N],
            start: 0,
            end: 0,
            size: 0,
        }
    }

    /// Stores `item` behind the newest one. A full buffer keeps its contents and rejects the item.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }

        self.buffer[self.end] = item;
        self.end = (self.end + 1) % N;
        self.size += 1;

        return true;
    }

    /// Pushes element by element, returns how many were accepted.
    pub fn push_slice(&mut self, items: &[T]) -> usize {
        let mut accepted = 0;
        for item in items {
            if !self.push(*item) {
                break;
            }
            accepted += 1;
        }

        return accepted;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self.buffer[self.start];
        self.start = (self.start + 1) % N;
        self.size -= 1;

        return Some(item);
    }

    pub fn peek(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        return Some(self.buffer[self.start]);
    }

    pub fn is_full(&self) -> bool {
        return self.size == N;
    }

    pub fn is_empty(&self) -> bool {
        return self.size == 0;
    }

    pub fn len(&self) -> usize {
        return self.size;
    }

    pub fn capacity(&self) -> usize {
        return N;
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
        self.size = 0;
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/* --------------------------- Test -------------------------- */
