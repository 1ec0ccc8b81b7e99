/*
* Periodic Task
*   tick()      -> base timer rate, sets the trigger once the period elapsed
*   dispatch()  -> scheduler pass, runs the body if triggered
*/

/* --------------------------- Task Timer -------------------------- */
pub struct TaskTimer {
    period: u32,
    ticks: u32,
    triggered: bool,
}

impl TaskTimer {
    /// A zero period makes the task ready on every scheduler pass.
    pub const fn new(period_ticks: u32) -> Self {
        Self {
            period: period_ticks,
            ticks: 0,
            triggered: false,
        }
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks >= self.period {
            self.ticks = 0;
            self.triggered = true;
        }
    }

    pub fn take_trigger(&mut self) -> bool {
        if self.period == 0 {
            return true;
        }

        let triggered = self.triggered;
        self.triggered = false;
        return triggered;
    }

    pub fn set_period(&mut self, period_ticks: u32) {
        self.period = period_ticks;
        self.ticks = 0;
    }

    pub fn period(&self) -> u32 {
        return self.period;
    }
}

/* --------------------------- Periodic Task Trait -------------------------- */
pub trait PeriodicTask {
    fn timer(&mut self) -> &mut TaskTimer;
    fn run(&mut self);

    fn tick(&mut self) {
        self.timer().tick();
    }

    /// Runs the body once if the trigger is set, returns whether it ran.
    fn dispatch(&mut self) -> bool {
        if !self.timer().take_trigger() {
            return false;
        }

        self.run();
        return true;
    }
}

/* --------------------------- Test -------------------------- */
#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        timer: TaskTimer,
        runs: u32,
    }

    impl PeriodicTask for Counter {
        fn timer(&mut self) -> &mut TaskTimer {
            &mut self.timer
        }

        fn run(&mut self) {
            self.runs += 1;
        }
    }

    #[test]
    fn runs_once_per_period() {
        let mut task = Counter { timer: TaskTimer::new(3), runs: 0 };

        for _ in 0..2 {
            task.tick();
            assert!(!task.dispatch());
        }
        task.tick();
        assert!(task.dispatch());
        assert!(!task.dispatch());

        for _ in 0..9 {
            task.tick();
        }
        // Missed triggers collapse into one run
        assert!(task.dispatch());
        assert!(!task.dispatch());
        assert_eq!(task.runs, 2);
    }

    #[test]
    fn set_period_restarts_tick_count() {
        let mut task = Counter { timer: TaskTimer::new(5), runs: 0 };
        for _ in 0..4 {
            task.tick();
        }

        task.timer().set_period(2);
        assert_eq!(task.timer().period(), 2);

        // The four ticks taken under the old period are dropped
        task.tick();
        assert!(!task.dispatch());
        task.tick();
        assert!(task.dispatch());
        assert_eq!(task.runs, 1);
    }

    #[test]
    fn zero_period_runs_every_pass() {
        let mut task = Counter { timer: TaskTimer::new(0), runs: 0 };
        assert!(task.dispatch());
        assert!(task.dispatch());
        assert_eq!(task.runs, 2);
    }
}
