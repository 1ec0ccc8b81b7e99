/*
* Test Doubles
*/

#![allow(dead_code)]

use std::cell::Cell;

use rover_motion::resources::*;

/* --------------------------- Actuators -------------------------- */
#[derive(Default)]
pub struct RecordingSteering {
    pub angle: f32,
    pub calls: u32,
}

impl SteeringCommand for RecordingSteering {
    fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.calls += 1;
    }

    fn in_range(&self, angle: f32) -> bool {
        angle.abs() <= STEERING_LIMIT_DEG
    }
}

#[derive(Default)]
pub struct RecordingDrive {
    pub duty: f32,
    pub is_braked: bool,
    pub inverse_pulse: Option<f32>,
}

impl DriveCommand for RecordingDrive {
    fn set_reference(&mut self, duty: f32) {
        self.duty = duty;
        self.is_braked = false;
    }

    fn brake(&mut self) {
        self.duty = 0.0;
        self.is_braked = true;
    }

    fn inverse_direction(&mut self, duty: f32) {
        self.inverse_pulse = Some(duty);
        self.is_braked = false;
    }

    fn in_range(&self, duty: f32) -> bool {
        duty.abs() <= DRIVE_DUTY_LIMIT_PERCENT
    }
}

/* --------------------------- Timer -------------------------- */
pub struct ManualTimer<'a> {
    pub armed_ms: &'a Cell<Option<u32>>,
}

impl<'a> OneShotTimer for ManualTimer<'a> {
    fn start(&mut self, timeout_ms: u32) {
        self.armed_ms.set(Some(timeout_ms));
    }
}

/* --------------------------- Sensor -------------------------- */
pub struct FakeSensor {
    pub speed: Cell<f32>,
    pub traveled: Cell<i32>,
    pub is_measuring: Cell<bool>,
}

impl FakeSensor {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: Cell::new(speed),
            traveled: Cell::new(0),
            is_measuring: Cell::new(false),
        }
    }
}

impl RotarySpeedSensor for FakeSensor {
    fn count(&self) -> i32 {
        0
    }

    fn speed_rps(&self) -> f32 {
        self.speed.get()
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
        self.traveled.get()
    }
}

/* --------------------------- Serial -------------------------- */
pub fn drain<const N: usize>(tx: &SerialQueue<N>) -> String {
    let mut out = Vec::new();
    while let Some(byte) = tx.pop() {
        out.push(byte);
    }
    String::from_utf8(out).unwrap()
}

pub fn response_of(callback: impl FnOnce(&mut Response)) -> String {
    let mut response = Response::new();
    callback(&mut response);
    response.as_str().to_string()
}
