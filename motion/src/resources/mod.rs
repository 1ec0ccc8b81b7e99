/* 
* Resources Hub
*/

/* --------------------------- Library -------------------------- */
use core::cell::RefCell;
use core::fmt::Write;
use core::sync::atomic::Ordering;
use portable_atomic::AtomicI32;
use portable_atomic::AtomicU32;
use portable_atomic::AtomicU8;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::String;

/* --------------------------- Declare Modules -------------------------- */
pub mod config;
pub mod ring_buffer;
pub mod serial_resources;
pub mod encoder_resources;
pub mod actuator_resources;
pub mod state_resources;

pub use config::*;
pub use ring_buffer::*;
pub use serial_resources::*;
pub use encoder_resources::*;
pub use actuator_resources::*;
pub use state_resources::*;
