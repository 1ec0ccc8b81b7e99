/*
    Encoder Resources
*/

use super::*;

/* --------------------------- Quadrature Counter -------------------------- */
/// Hardware pulse counter, read and reset by exactly one encoder task.
pub trait QuadratureCounter {
    /// Signed impulses since the last reset.
    fn count(&self) -> i32;
    fn reset(&self);

    /// Reads and resets in one go.
    fn take(&self) -> i32 {
        let count = self.count();
        self.reset();
        count
    }
}

/// Counter fed from a pulse handler or a PIO read loop.
pub struct AtomicCounter {
    count: AtomicI32,
}

impl AtomicCounter {
    pub const fn new() -> Self {
        Self {
            count: AtomicI32::new(0),
        }
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement(&self) {
        self.count.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn add(&self, delta: i32) {
        self.count.fetch_add(delta, Ordering::Relaxed);
    }
}

impl QuadratureCounter for AtomicCounter {
    fn count(&self) -> i32 {
        return self.count.load(Ordering::Relaxed);
    }

    fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    fn take(&self) -> i32 {
        return self.count.swap(0, Ordering::Relaxed);
    }
}

/* --------------------------- Rotary Speed Sensor -------------------------- */
pub trait RotarySpeedSensor {
    /// Impulses measured over the last period.
    fn count(&self) -> i32;
    /// Rotation per second.
    fn speed_rps(&self) -> f32;
    /// True when the sensor only reports magnitude.
    fn is_abs(&self) -> bool;

    /// Zeroes the traveled impulses and starts accumulating.
    fn start_distance(&self);
    /// Zeroes the traveled impulses and stops accumulating.
    fn stop_distance(&self);
    /// Signed impulses since `start_distance`.
    fn traveled_impulses(&self) -> i32;
}

impl<S: RotarySpeedSensor + ?Sized> RotarySpeedSensor for RefCell<S> {
    fn count(&self) -> i32 {
        self.borrow().count()
    }

    fn speed_rps(&self) -> f32 {
        self.borrow().speed_rps()
    }

    fn is_abs(&self) -> bool {
        self.borrow().is_abs()
    }

    fn start_distance(&self) {
        self.borrow().start_distance()
    }

    fn stop_distance(&self) {
        self.borrow().stop_distance()
    }

    fn traveled_impulses(&self) -> i32 {
        self.borrow().traveled_impulses()
    }
}
