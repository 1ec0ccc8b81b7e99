/*
*  Default Firmware Config
*
*  Drive Train Properties
*  - Quadrature encoder resolution = 2048 impulses per rotation
*  - Linear to angular speed = 150 rotation per meter
*/

use crate::control::PidConfig;
use crate::control::MotorControllerLimits;

/* --------------------------- Scheduler Config -------------------------- */
pub const BASE_TICK_US: u32 = 100;
pub const MAX_TASKS: usize = 8;

pub const SERIAL_ROUTER_PERIOD_US: u32 = 0; // Every scheduler pass
pub const ENCODER_PERIOD_US: u32 = 1_000;
pub const CONTROL_PERIOD_US: u32 = 1_000;
pub const ENCODER_PUBLISHER_PERIOD_US: u32 = 10_000;
pub const BLINKER_PERIOD_US: u32 = 500_000;
pub const HARD_BRAKE_TIMEOUT_MS: u32 = 40;

pub const fn period_ticks(period_us: u32) -> u32 {
    period_us / BASE_TICK_US
}

pub const fn period_seconds(period_us: u32) -> f32 {
    period_us as f32 / 1_000_000.0
}

/* --------------------------- Encoder Config -------------------------- */
pub const ENCODER_RESOLUTION: u32 = 2048;
pub const ENCODER_IIR_A: [f32; 1] = [-0.777_777_8];
pub const ENCODER_IIR_B: [f32; 2] = [0.111_111_11, 0.111_111_11];

/* --------------------------- Motor PID Config -------------------------- */
pub const DEFAULT_PID_SPEED_CONFIG: PidConfig = PidConfig {
    kp: 0.115,
    ki: 0.81,
    kd: 0.000_222,
    tf: 0.04,
};

pub const DEFAULT_CONTROLLER_LIMITS: MotorControllerLimits = MotorControllerLimits {
    control_inf: -0.5,
    control_sup: 0.5,
    reference_inf: -225.0,
    reference_sup: 225.0,
    reference_deadband: 10.0,
    measured_deadband: 30.0,
    measured_ceiling: 300.0,
    max_saturations: 10,
    distance_inf: -METER_TO_IMPULSES,
    distance_sup: METER_TO_IMPULSES,
};

/* --------------------------- Volt to PWM Spline -------------------------- */
pub const VOLT_TO_PWM_BREAKS: [f32; 2] = [-0.22166, 0.22166];
pub const VOLT_TO_PWM_SEGMENTS: [[f32; 2]; 3] = [
    [0.104_156_81, -0.089_527_61],
    [0.50805, 0.0],
    [0.104_156_81, 0.089_527_61],
];

/* --------------------------- Actuator Config -------------------------- */
pub const MPS_TO_RPS: f32 = 150.0;
pub const METER_TO_IMPULSES: f32 = 310_299.0;
pub const CONTROL_TO_DUTY_PERCENT: f32 = 100.0;
pub const DRIVE_DUTY_LIMIT_PERCENT: f32 = 75.0;
pub const STEERING_LIMIT_DEG: f32 = 23.0;

/* --------------------------- Serial Communication -------------------------- */
pub const RX_BUFFER_SIZE: usize = 256;
pub const TX_BUFFER_SIZE: usize = 256;
pub const PARSE_BUFFER_SIZE: usize = 256;
pub const RESPONSE_SIZE: usize = 128;
pub const KEY_SIZE: usize = 4;
pub const MAX_SUBSCRIBERS: usize = 16; // Must be 2^n

/* --------------------------- Serial Keys -------------------------- */
pub const KEY_MOVE: &str = "MCTL";
pub const KEY_BRAKE: &str = "BRAK";
pub const KEY_HARD_BRAKE: &str = "HBRA";
pub const KEY_PID_ACTIVATE: &str = "PIDA";
pub const KEY_PID_TUNE: &str = "PIDS";
pub const KEY_STEER: &str = "STER";
pub const KEY_TIMED_MOVE: &str = "VCD";
pub const KEY_ENCODER_PUBLISH: &str = "ENPB";
pub const KEY_MOVE_DISTANCE: &str = "DIST";

/* --------------------------- Serial Responses -------------------------- */
pub const RESP_ACK: &str = "ack;;";
pub const RESP_SYNTAX_ERROR: &str = "syntax error;;";
pub const RESP_NO_RESPONSE: &str = "no response given";
pub const RESP_SPEED_TOO_HIGH: &str = "The speed command is too high;;";
pub const RESP_REFERENCE_TOO_HIGH: &str = "The speed reference is too high;;";
pub const RESP_ANGLE_TOO_HIGH: &str = "The steering angle command is too high;;";
pub const RESP_NO_CONTROLLER: &str = "Control object wasn't instantiated. Cannot activate pid controller;;";
pub const RESP_OVERSPEED: &str = "Too high speed and the encoder working;;";
pub const RESP_ENCODER_FAULT: &str = "Encoder error;;";
pub const RESP_PID_NOT_ACTIVE: &str = "PID not activated;;";
pub const RESP_DISTANCE_TOO_HIGH: &str = "The distance is too high;;";
pub const RESP_DISTANCE_DONE: &str = "The distance is done;;";

/* --------------------------- Config Error -------------------------- */
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConfigError {
    ZeroLeadingCoefficient = 1,
    NonPositiveTimeConstant = 2,
    NonPositiveSamplePeriod = 3,
    SegmentCountMismatch = 4,
    UnsortedBreakpoints = 5,
    SchedulerFull = 6,
    DuplicateKey = 7,
    InvalidKey = 8,
    RegistryFull = 9,
}
