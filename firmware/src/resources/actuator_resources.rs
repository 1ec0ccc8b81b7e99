/*
    Actuator Resources
        HBridgeDrive   -> CW/CCW PWM pair, both high is a short brake
        ServoSteering  -> 50 Hz servo pulse
        SignalTimer    -> hard brake timeout through HARD_BRAKE_SIGNAL
*/

use super::*;

pub fn pwm_config(divider: u8, top: u16) -> embassy_rp::pwm::Config {
    let mut config = embassy_rp::pwm::Config::default();
    config.divider = divider.into();
    config.top = top;
    return config;
}

fn magnitude(value: f32) -> f32 {
    if value < 0.0 { -value } else { value }
}

/* --------------------------- Drive -------------------------- */
pub struct HBridgeDrive<'d> {
    pwm_cw: PwmOutput<'d>,
    pwm_ccw: PwmOutput<'d>,
    is_forward: bool,
}

impl<'d> HBridgeDrive<'d> {
    pub fn new(pwm_cw: PwmOutput<'d>, pwm_ccw: PwmOutput<'d>) -> Self {
        let mut drive = Self {
            pwm_cw,
            pwm_ccw,
            is_forward: true,
        };

        drive.brake();
        return drive;
    }

    fn write(&mut self, duty_percent: f32, is_forward: bool) {
        let fraction = magnitude(duty_percent).min(100.0) / 100.0;
        let ticks = (fraction * self.pwm_cw.max_duty_cycle() as f32) as u16;
        self.is_forward = is_forward;

        if is_forward {
            let _ = self.pwm_ccw.set_duty_cycle_fully_off();
            let _ = self.pwm_cw.set_duty_cycle(ticks);
        }
        else {
            let _ = self.pwm_cw.set_duty_cycle_fully_off();
            let _ = self.pwm_ccw.set_duty_cycle(ticks);
        }
    }
}

impl<'d> DriveCommand for HBridgeDrive<'d> {
    fn set_reference(&mut self, duty: f32) {
        self.write(duty, duty >= 0.0);
    }

    fn brake(&mut self) {
        let _ = self.pwm_cw.set_duty_cycle_fully_on();
        let _ = self.pwm_ccw.set_duty_cycle_fully_on();
    }

    fn inverse_direction(&mut self, duty: f32) {
        let is_forward = !self.is_forward;
        self.write(duty, is_forward);
    }

    fn in_range(&self, duty: f32) -> bool {
        -DRIVE_DUTY_LIMIT_PERCENT <= duty && duty <= DRIVE_DUTY_LIMIT_PERCENT
    }
}

/* --------------------------- Steering -------------------------- */
pub struct ServoSteering<'d> {
    pwm: PwmOutput<'d>,
}

impl<'d> ServoSteering<'d> {
    pub fn new(pwm: PwmOutput<'d>) -> Self {
        let mut servo = Self { pwm };
        servo.set_angle(0.0);
        return servo;
    }
}

impl<'d> SteeringCommand for ServoSteering<'d> {
    fn set_angle(&mut self, angle: f32) {
        let angle = angle.clamp(-STEERING_LIMIT_DEG, STEERING_LIMIT_DEG);
        let duty = SERVO_DUTY_PER_DEG * angle + SERVO_DUTY_CENTER;
        let ticks = (duty * self.pwm.max_duty_cycle() as f32) as u16;
        let _ = self.pwm.set_duty_cycle(ticks);
    }

    fn in_range(&self, angle: f32) -> bool {
        -STEERING_LIMIT_DEG <= angle && angle <= STEERING_LIMIT_DEG
    }
}

/* --------------------------- Hard Brake Timer -------------------------- */
pub struct SignalTimer;

impl OneShotTimer for SignalTimer {
    fn start(&mut self, timeout_ms: u32) {
        HARD_BRAKE_SIGNAL.signal(timeout_ms);
    }
}
