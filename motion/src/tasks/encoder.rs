/*
    Encoder Task
        Every period: take the counter, speed = count / resolution / period
        While a distance is measured the raw counts also add up into `traveled`
*/

use super::*;

/* --------------------------- Code -------------------------- */
pub struct EncoderTask<'a, F: Filter> {
    timer: TaskTimer,
    counter: &'a dyn QuadratureCounter,
    filter: F,
    resolution: f32,
    period_s: f32,
    count: i32,
    filtered_count: f32,
    traveled: Cell<i32>,
    is_measuring: Cell<bool>,
}

impl<'a, F: Filter> EncoderTask<'a, F> {
    pub fn new(period_us: u32, counter: &'a dyn QuadratureCounter, resolution: u32, filter: F) -> Self {
        Self {
            timer: TaskTimer::new(period_ticks(period_us)),
            counter,
            filter,
            resolution: resolution as f32,
            period_s: period_seconds(period_us),
            count: 0,
            filtered_count: 0.0,
            traveled: Cell::new(0),
            is_measuring: Cell::new(false),
        }
    }

    pub fn filtered_count(&self) -> f32 {
        return self.filtered_count;
    }

    pub fn non_filtered_count(&self) -> i32 {
        return self.count;
    }

    pub fn non_filtered_speed_rps(&self) -> f32 {
        return self.count as f32 / self.resolution / self.period_s;
    }
}

impl<'a, F: Filter> PeriodicTask for EncoderTask<'a, F> {
    fn timer(&mut self) -> &mut TaskTimer {
        &mut self.timer
    }

    fn run(&mut self) {
        self.count = self.counter.take();
        self.filtered_count = self.filter.apply(self.count as f32);

        if self.is_measuring.get() {
            self.traveled.set(self.traveled.get().saturating_add(self.count));
        }
    }
}

impl<'a, F: Filter> RotarySpeedSensor for EncoderTask<'a, F> {
    fn count(&self) -> i32 {
        return roundf(self.filtered_count) as i32;
    }

    fn speed_rps(&self) -> f32 {
        return self.filtered_count / self.resolution / self.period_s;
    }

    fn is_abs(&self) -> bool {
        false
    }

    fn start_distance(&self) {
        self.traveled.set(0);
        self.is_measuring.set(true);
    }

    fn stop_distance(&self) {
        self.traveled.set(0);
        self.is_measuring.set(false);
    }

    fn traveled_impulses(&self) -> i32 {
        return self.traveled.get();
    }
}

/* --------------------------- Test -------------------------- */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_from_impulses_per_period() {
        let counter = AtomicCounter::new();
        let mut encoder = EncoderTask::new(10_000, &counter, 2048, PassThrough);

        counter.add(20);
        encoder.run();

        let expected = 20.0 / 2048.0 / 0.010;
        assert!((encoder.speed_rps() - expected).abs() < 1e-4);
        assert!((encoder.speed_rps() - 0.9766).abs() < 1e-3);
        assert_eq!(encoder.count(), 20);
        assert_eq!(counter.count(), 0);
        assert!(!encoder.is_abs());
    }

    #[test]
    fn filtered_and_raw_readings_differ() {
        let counter = AtomicCounter::new();
        let filter = IirFilter::new(ENCODER_IIR_A, ENCODER_IIR_B);
        let mut encoder = EncoderTask::new(ENCODER_PERIOD_US, &counter, ENCODER_RESOLUTION, filter);

        counter.add(-90);
        encoder.run();

        assert_eq!(encoder.non_filtered_count(), -90);
        assert!((encoder.non_filtered_speed_rps() + 90.0 / 2048.0 / 0.001).abs() < 1e-3);
        assert!((encoder.filtered_count() + 10.0).abs() < 1e-3);
        assert_eq!(encoder.count(), -10);
    }

    #[test]
    fn accumulates_raw_impulses_while_measuring() {
        let counter = AtomicCounter::new();
        let filter = IirFilter::new(ENCODER_IIR_A, ENCODER_IIR_B);
        let mut encoder = EncoderTask::new(ENCODER_PERIOD_US, &counter, ENCODER_RESOLUTION, filter);

        counter.add(40);
        encoder.run();
        assert_eq!(encoder.traveled_impulses(), 0);

        encoder.start_distance();
        for delta in [30, 25, -5] {
            counter.add(delta);
            encoder.run();
        }
        assert_eq!(encoder.traveled_impulses(), 50);

        encoder.stop_distance();
        counter.add(10);
        encoder.run();
        assert_eq!(encoder.traveled_impulses(), 0);

        encoder.start_distance();
        assert_eq!(encoder.traveled_impulses(), 0);
        counter.add(-12);
        encoder.run();
        assert_eq!(encoder.traveled_impulses(), -12);
    }

    #[test]
    fn runs_only_when_period_elapsed() {
        let counter = AtomicCounter::new();
        let mut encoder = EncoderTask::new(1_000, &counter, 2048, PassThrough);
        counter.add(5);

        for _ in 0..9 {
            encoder.tick();
            assert!(!encoder.dispatch());
        }
        encoder.tick();
        assert!(encoder.dispatch());
        assert_eq!(encoder.non_filtered_count(), 5);
    }
}
