/*
* Tasks Hub
*/

/* --------------------------- Library -------------------------- */
use core::cell::RefCell;
use defmt_rtt as _;
use panic_probe as _;
use embassy_time::Ticker;
use embassy_time::Timer;
use embassy_time::Duration;
use embassy_futures::select::select;
use embassy_futures::select::Either;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::USB;
use embassy_rp::peripherals::PIO0;
use embassy_rp::usb::Driver;
use embassy_rp::pio_programs::rotary_encoder::Direction;
use embassy_rp::pio_programs::rotary_encoder::PioEncoder;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::class::cdc_acm::Receiver;
use embassy_usb::class::cdc_acm::Sender;

// Resources
use crate::resources::*;

// Motion
use rover_motion::resources::*;
use rover_motion::control::*;
use rover_motion::tasks::*;

/* --------------------------- Declare Modules -------------------------- */
pub mod usb_task;
pub mod encoder;
pub mod hard_brake;
pub mod control;
