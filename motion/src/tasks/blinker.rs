/*
* Blinker Task
*/

use super::*;

pub struct Blinker<P: StatefulOutputPin> {
    timer: TaskTimer,
    led: P,
}

impl<P: StatefulOutputPin> Blinker<P> {
    pub fn new(period_us: u32, led: P) -> Self {
        Self {
            timer: TaskTimer::new(period_ticks(period_us)),
            led,
        }
    }

    pub fn led(&self) -> &P {
        &self.led
    }
}

impl<P: StatefulOutputPin> PeriodicTask for Blinker<P> {
    fn timer(&mut self) -> &mut TaskTimer {
        &mut self.timer
    }

    fn run(&mut self) {
        let _ = self.led.toggle();
    }
}

/* --------------------------- Test -------------------------- */
#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal_1::digital::ErrorType;
    use embedded_hal_1::digital::OutputPin;

    struct FakeLed {
        is_high: bool,
    }

    impl ErrorType for FakeLed {
        type Error = Infallible;
    }

    impl OutputPin for FakeLed {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.is_high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.is_high = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for FakeLed {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.is_high)
        }

        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.is_high)
        }
    }

    #[test]
    fn toggles_once_per_period() {
        let mut blinker = Blinker::new(BLINKER_PERIOD_US, FakeLed { is_high: false });
        let ticks = period_ticks(BLINKER_PERIOD_US);

        for _ in 0..ticks {
            blinker.tick();
            blinker.dispatch();
        }
        assert!(blinker.led().is_high);

        for _ in 0..ticks {
            blinker.tick();
            blinker.dispatch();
        }
        assert!(!blinker.led().is_high);
    }
}
