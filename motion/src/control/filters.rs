/*
    Signal Filters
*/

/* --------------------------- Filter Trait -------------------------- */
pub trait Filter {
    fn apply(&mut self, sample: f32) -> f32;
    fn clear(&mut self);
}

/* --------------------------- Pass Through -------------------------- */
pub struct PassThrough;

impl Filter for PassThrough {
    fn apply(&mut self, sample: f32) -> f32 {
        sample
    }

    fn clear(&mut self) {}
}

/* --------------------------- IIR -------------------------- */
/// y[k] = sum(b[i] * u[k-i]) - sum(a[j] * y[k-1-j])
pub struct IirFilter<const NA: usize, const NB: usize> {
    a: [f32; NA],
    b: [f32; NB],
    inputs: [f32; NB],
    outputs: [f32; NA],
}

impl<const NA: usize, const NB: usize> IirFilter<NA, NB> {
    pub fn new(a: [f32; NA], b: [f32; NB]) -> Self {
        Self {
            a,
            b,
            inputs: [0.0; NB],
            outputs: [0.0; NA],
        }
    }
}

impl<const NA: usize, const NB: usize> Filter for IirFilter<NA, NB> {
    fn apply(&mut self, sample: f32) -> f32 {
        shift_in(&mut self.inputs, sample);

        let output = dot(&self.b, &self.inputs) - dot(&self.a, &self.outputs);
        shift_in(&mut self.outputs, output);

        return output;
    }

    fn clear(&mut self) {
        self.inputs = [0.0; NB];
        self.outputs = [0.0; NA];
    }
}

/* --------------------------- FIR -------------------------- */
pub struct FirFilter<const NB: usize> {
    b: [f32; NB],
    inputs: [f32; NB],
}

impl<const NB: usize> FirFilter<NB> {
    pub fn new(b: [f32; NB]) -> Self {
        Self {
            b,
            inputs: [0.0; NB],
        }
    }
}

impl<const NB: usize> Filter for FirFilter<NB> {
    fn apply(&mut self, sample: f32) -> f32 {
        shift_in(&mut self.inputs, sample);
        return dot(&self.b, &self.inputs);
    }

    fn clear(&mut self) {
        self.inputs = [0.0; NB];
    }
}

/* --------------------------- Mean -------------------------- */
/// Average of the last N samples. An empty window does not build:
///
/// ```compile_fail
/// let _ = rover_motion::control::MeanFilter::<0>::new();
/// ```
pub struct MeanFilter<const N: usize> {
    buffer: [f32; N],
    index: usize,
    is_filled: bool,
    sum: f32,
}

impl<const N: usize> MeanFilter<N> {
    const NON_EMPTY_WINDOW: () = assert!(N > 0, "MeanFilter window must not be empty");

    pub fn new() -> Self {
        let () = Self::NON_EMPTY_WINDOW;

        Self {
            buffer: [0.0; N],
            index: 0,
            is_filled: false,
            sum: 0.0,
        }
    }

    pub fn update(&mut self, value: f32) -> f32 {
        if self.is_filled {
            self.sum -= self.buffer[self.index];
        }

        self.buffer[self.index] = value;
        self.sum += value;

        self.index = (self.index + 1) % N;

        if !self.is_filled && self.index == 0 {
            self.is_filled = true;
        }

        if self.is_filled {
            self.sum / N as f32
        } else {
            self.sum / self.index as f32
        }
    }
}

impl<const N: usize> Filter for MeanFilter<N> {
    fn apply(&mut self, sample: f32) -> f32 {
        self.update(sample)
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}

/* --------------------------- Median -------------------------- */
/// Keeps the last N samples twice: in arrival order and sorted.
///
/// ```compile_fail
/// let _ = rover_motion::control::MedianFilter::<0>::new();
/// ```
pub struct MedianFilter<const N: usize> {
    window: [f32; N],
    sorted: [f32; N],
    index: usize,
    count: usize,
}

impl<const N: usize> MedianFilter<N> {
    const NON_EMPTY_WINDOW: () = assert!(N > 0, "MedianFilter window must not be empty");

    pub fn new() -> Self {
        let () = Self::NON_EMPTY_WINDOW;

        Self {
            window: [0.0; N],
            sorted: [0.0; N],
            index: 0,
            count: 0,
        }
    }

    pub fn add_new_value(&mut self, value: f32) {
        if self.count == N {
            let oldest = self.window[self.index];
            self.remove_sorted(oldest);
        }

        let position = self.sorted[..self.count]
            .iter()
            .position(|item| *item > value)
            .unwrap_or(self.count);

        self.sorted.copy_within(position..self.count, position + 1);
        self.sorted[position] = value;
        self.count += 1;

        self.window[self.index] = value;
        self.index = (self.index + 1) % N;
    }

    /// Upper middle element for an even number of samples.
    pub fn median(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }

        return self.sorted[self.count / 2];
    }

    fn remove_sorted(&mut self, value: f32) {
        let position = self.sorted[..self.count]
            .iter()
            .position(|item| item.to_bits() == value.to_bits())
            .unwrap_or(self.count - 1);

        self.sorted.copy_within(position + 1..self.count, position);
        self.count -= 1;
    }
}

impl<const N: usize> Filter for MedianFilter<N> {
    fn apply(&mut self, sample: f32) -> f32 {
        self.add_new_value(sample);
        self.median()
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}

/* --------------------------- Helpers -------------------------- */
// Newest sample at index 0
fn shift_in<const N: usize>(history: &mut [f32; N], sample: f32) {
    if N == 0 {
        return;
    }

    history.copy_within(0..N - 1, 1);
    history[0] = sample;
}

fn dot(coefficients: &[f32], history: &[f32]) -> f32 {
    coefficients
        .iter()
        .zip(history.iter())
        .map(|(c, x)| c * x)
        .sum()
}

/* --------------------------- Test -------------------------- */
