//! Closed-loop motion control core
//!
//! Encoder sampling, signal filtering, PID regulation and actuator commands for a small
//! robotic vehicle, coordinated by a cooperative periodic scheduler and driven over a
//! `#KEY:PAYLOAD;;\r\n` serial protocol.

#![cfg_attr(not(test), no_std)]

// Mod
pub mod control;
pub mod resources;
pub mod tasks;
