/*
    Robot State Resources
*/

use super::*;

/* --------------------------- Robot Mode -------------------------- */
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RobotMode {
    Idle = 0,
    Drive = 1,
    Brake = 2,
    HardBrake = 3,
}

impl TryFrom<u8> for RobotMode {
    type Error = ();

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(RobotMode::Idle),
            1 => Ok(RobotMode::Drive),
            2 => Ok(RobotMode::Brake),
            3 => Ok(RobotMode::HardBrake),
            _ => Err(()),
        }
    }
}

/* --------------------------- Mode Flag -------------------------- */
/// Current robot mode, shared with the hard brake timeout.
pub struct ModeFlag {
    mode: AtomicU8,
}

impl ModeFlag {
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(RobotMode::Idle as u8),
        }
    }

    pub fn set(&self, mode: RobotMode) {
        self.mode.store(mode as u8, Ordering::Relaxed);
    }

    pub fn get(&self) -> RobotMode {
        RobotMode::try_from(self.mode.load(Ordering::Relaxed)).unwrap_or(RobotMode::Idle)
    }

    /// Timeout callback of the hard brake pulse. Only leaves `HardBrake`, a newer command is kept.
    pub fn expire_hard_brake(&self) -> bool {
        self.mode
            .compare_exchange(
                RobotMode::HardBrake as u8,
                RobotMode::Brake as u8,
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_ok()
    }
}

/* --------------------------- One Shot Timer -------------------------- */
/// Timer that calls `ModeFlag::expire_hard_brake` once `timeout_ms` elapsed.
pub trait OneShotTimer {
    fn start(&mut self, timeout_ms: u32);
}

/* --------------------------- Test -------------------------- */
