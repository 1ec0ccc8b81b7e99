/*
    SISO Motor Controller
        Encoder -> PID -> Converter -> Clamp

    Safety
    - Measured speed above the ceiling aborts the step (Overspeed)
    - Reference and measured speed inside their deadbands give a zero output (Idle)
    - Repeated saturation while the encoder reads zero means a dead encoder (EncoderFault)

    Distance
    - set_distance starts the sensor's impulse accumulator, done once it reaches the target
*/

use super::*;

/* --------------------------- Control Status -------------------------- */
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i8)]
pub enum ControlStatus {
    Nominal = 1,
    Idle = 2,
    Overspeed = -1,
    EncoderFault = -2,
}

impl ControlStatus {
    pub fn is_fault(self) -> bool {
        (self as i8) < 0
    }
}

impl TryFrom<i8> for ControlStatus {
    type Error = ();

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(ControlStatus::Nominal),
            2 => Ok(ControlStatus::Idle),
            -1 => Ok(ControlStatus::Overspeed),
            -2 => Ok(ControlStatus::EncoderFault),
            _ => Err(()),
        }
    }
}

/* --------------------------- Limits -------------------------- */
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MotorControllerLimits {
    pub control_inf: f32,
    pub control_sup: f32,
    pub reference_inf: f32,
    pub reference_sup: f32,
    pub reference_deadband: f32,
    pub measured_deadband: f32,
    pub measured_ceiling: f32,
    pub max_saturations: u32,
    /// Distance target bounds in impulses.
    pub distance_inf: f32,
    pub distance_sup: f32,
}

/* --------------------------- Code -------------------------- */
pub struct MotorController<'a> {
    sensor: &'a dyn RotarySpeedSensor,
    pid: PidController,
    converter: Option<&'a dyn Converter>,
    limits: MotorControllerLimits,
    reference: f32,
    output: f32,
    error: f32,
    saturations: u32,
    distance: Option<f32>,
}

impl<'a> MotorController<'a> {
    pub fn new(
        sensor: &'a dyn RotarySpeedSensor,
        pid: PidController,
        converter: Option<&'a dyn Converter>,
        limits: MotorControllerLimits,
    ) -> Self {
        Self {
            sensor,
            pid,
            converter,
            limits,
            reference: 0.0,
            output: 0.0,
            error: 0.0,
            saturations: 0,
            distance: None,
        }
    }

    pub fn control(&mut self) -> ControlStatus {
        let measured = self.sensor.speed_rps();
        let is_abs = self.sensor.is_abs();

        if fabsf(measured) > self.limits.measured_ceiling {
            self.reference = 0.0;
            self.output = 0.0;
            self.error = 0.0;
            log::warn!("Measured speed {} rps above ceiling", measured);
            return ControlStatus::Overspeed;
        }

        if fabsf(self.reference) < self.limits.reference_deadband
            && fabsf(measured) < self.limits.measured_deadband
        {
            self.output = 0.0;
            self.error = 0.0;
            return ControlStatus::Idle;
        }

        let reference = if is_abs { fabsf(self.reference) } else { self.reference };
        let error = reference - measured;

        let raw = self.pid.compute(error);
        let candidate = match self.converter {
            Some(converter) => converter.convert(raw),
            None => raw,
        };

        let (output, saturated) = self.limit_output(candidate);
        if saturated {
            self.saturations += 1;
        } else {
            self.saturations = 0;
        }

        if self.saturations >= self.limits.max_saturations && measured == 0.0 {
            self.pid.reset();
            self.reference = 0.0;
            self.output = 0.0;
            self.error = 0.0;
            self.saturations = 0;
            log::warn!("Output saturated while the encoder reads zero");
            return ControlStatus::EncoderFault;
        }

        self.error = error;
        self.output = if is_abs && self.reference < 0.0 { -output } else { output };

        return ControlStatus::Nominal;
    }

    fn limit_output(&self, sig: f32) -> (f32, bool) {
        if sig > self.limits.control_sup {
            return (self.limits.control_sup, true);
        }

        if sig < self.limits.control_inf {
            return (self.limits.control_inf, true);
        }

        return (sig, false);
    }

    pub fn in_range(&self, reference: f32) -> bool {
        self.limits.reference_inf <= reference && reference <= self.limits.reference_sup
    }

    pub fn set_reference(&mut self, reference: f32) {
        self.reference = reference;
    }

    pub fn reference(&self) -> f32 {
        self.reference
    }

    /// Last committed control signal.
    pub fn output(&self) -> f32 {
        self.output
    }

    pub fn error(&self) -> f32 {
        self.error
    }

    pub fn saturation_count(&self) -> u32 {
        self.saturations
    }

    pub fn clear(&mut self) {
        self.pid.reset();
        self.output = 0.0;
        self.error = 0.0;
        self.saturations = 0;
    }

    pub fn distance_in_range(&self, impulses: f32) -> bool {
        self.limits.distance_inf <= impulses && impulses <= self.limits.distance_sup
    }

    /// Target in signed impulses, restarts the sensor accumulator.
    pub fn set_distance(&mut self, impulses: f32) {
        self.distance = Some(impulses);
        self.sensor.start_distance();
    }

    pub fn clear_distance(&mut self) {
        if self.distance.take().is_some() {
            self.sensor.stop_distance();
        }
    }

    pub fn distance(&self) -> Option<f32> {
        self.distance
    }

    /// A zero target is done at once. False when no target is set.
    pub fn distance_done(&self) -> bool {
        let Some(target) = self.distance else {
            return false;
        };

        let traveled = self.sensor.traveled_impulses() as f32;
        if target > 0.0 && target >= traveled {
            return false;
        }

        if target < 0.0 && target <= traveled {
            return false;
        }

        return true;
    }

    pub fn tune(&mut self, config: PidConfig) -> Result<(), ConfigError> {
        self.pid.update_pid_param(config)?;
        self.saturations = 0;
        Ok(())
    }

    pub fn pid_config(&self) -> PidConfig {
        self.pid.config()
    }
}

/* --------------------------- Test -------------------------- */
