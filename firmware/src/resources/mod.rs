/*
* Resources Hub
*/

/* --------------------------- Library -------------------------- */
use defmt_rtt as _;
use panic_probe as _;
use assign_resources::assign_resources;
use static_cell::StaticCell;

use embassy_rp::bind_interrupts;
use embassy_rp::peripherals;
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_rp::usb::InterruptHandler as UsbInterruptHandler;
use embassy_rp::pwm::PwmOutput;
use embassy_sync::signal::Signal;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_usb::class::cdc_acm::State;
use embedded_hal_1::pwm::SetDutyCycle;

// Motion
use rover_motion::resources::*;

/* --------------------------- Declare Modules -------------------------- */
pub mod gpio_list;
pub mod config;
pub mod global_resources;
pub mod actuator_resources;

pub use gpio_list::*;
pub use config::*;
pub use global_resources::*;
pub use actuator_resources::*;
