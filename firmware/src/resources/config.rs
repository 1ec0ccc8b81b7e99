/*
*  Board Config (RP2040, 125 MHz system clock)
*
*  Drive  : H-bridge, PWM 5 kHz on both inputs
*  Servo  : PWM 50 Hz, duty = 0.0009505 * angle + 0.07525
*/

/* --------------------------- Drive PWM -------------------------- */
pub const DRIVE_PWM_DIVIDER: u8 = 1;
pub const DRIVE_PWM_TOP: u16 = 24_999; // 125_000_000 / 5_000 - 1

/* --------------------------- Servo PWM -------------------------- */
pub const SERVO_PWM_DIVIDER: u8 = 64;
pub const SERVO_PWM_TOP: u16 = 39_061; // 125_000_000 / 64 / 50 - 1
pub const SERVO_DUTY_PER_DEG: f32 = 0.000_950_5;
pub const SERVO_DUTY_CENTER: f32 = 0.075_25;

/* --------------------------- Scheduler -------------------------- */
// Serial router consumes one byte per pass
pub const SCHEDULER_PASSES_PER_TICK: usize = 4;

/* --------------------------- USB -------------------------- */
pub const USB_PACKET_SIZE: usize = 64;
// Short packets end the transfer without a ZLP
pub const USB_TX_CHUNK_SIZE: usize = USB_PACKET_SIZE - 1;
pub const USB_TX_POLL_US: u64 = 500;
pub const LOG_BUFFER_SIZE: usize = 1024;
