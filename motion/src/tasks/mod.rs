/*
* Tasks Hub
*/

/* --------------------------- Library -------------------------- */
use core::cell::Cell;
use core::cell::RefCell;
use heapless::Vec;
use heapless::FnvIndexMap;
use libm::ceilf;
use libm::fabsf;
use libm::roundf;
use embedded_hal_1::digital::StatefulOutputPin;

// Resources
use crate::resources::*;

// Control
use crate::control::*;

/* --------------------------- Declare Modules -------------------------- */
pub mod task;
pub mod scheduler;
pub mod encoder;
pub mod serial_router;
pub mod robot_state_machine;
pub mod encoder_publisher;
pub mod blinker;

pub use task::*;
pub use scheduler::*;
pub use encoder::*;
pub use serial_router::*;
pub use robot_state_machine::*;
pub use encoder_publisher::*;
pub use blinker::*;
