/*
* Control Hub
*/

/* --------------------------- Library -------------------------- */
use libm::fabsf;

use crate::resources::ConfigError;
use crate::resources::RotarySpeedSensor;

/* --------------------------- Declare Modules -------------------------- */
pub mod filters;
pub mod transfer_function;
pub mod pid_control;
pub mod converter;
pub mod motor_controller;

pub use filters::*;
pub use transfer_function::*;
pub use pid_control::*;
pub use converter::*;
pub use motor_controller::*;
