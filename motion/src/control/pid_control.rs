/*
    PID Control

    C(s) = Kp + Ki/s + Kd*s/(Tf*s + 1), discretized with forward Euler s = (z - 1)/dt
*/

use super::*;

/* --------------------------- PID Config -------------------------- */
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PidConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub tf: f32,
}

/* --------------------------- Code -------------------------- */
pub struct PidController {
    transfer_function: DiscreteTransferFunction<3, 3>,
    config: PidConfig,
    dt: f32,
}

impl PidController {
    pub fn new(config: PidConfig, dt: f32) -> Result<Self, ConfigError> {
        let (num, den) = Self::coefficients(config, dt)?;

        Ok(Self {
            transfer_function: DiscreteTransferFunction::new(num, den)?,
            config,
            dt,
        })
    }

    pub fn coefficients(config: PidConfig, dt: f32) -> Result<([f32; 3], [f32; 3]), ConfigError> {
        if !(config.tf > 0.0) {
            return Err(ConfigError::NonPositiveTimeConstant);
        }
        if !(dt > 0.0) {
            return Err(ConfigError::NonPositiveSamplePeriod);
        }

        let PidConfig { kp, ki, kd, tf } = config;
        let a = dt / tf - 1.0;

        let num = [
            kp + kd / tf,
            kp * (a - 1.0) + ki * dt - 2.0 * kd / tf,
            -kp * a + ki * dt * a + kd / tf,
        ];
        let den = [1.0, a - 1.0, -a];

        Ok((num, den))
    }

    /// Loads new gains and drops the history.
    pub fn update_pid_param(&mut self, config: PidConfig) -> Result<(), ConfigError> {
        let (num, den) = Self::coefficients(config, self.dt)?;

        self.transfer_function.set_coefficients(num, den)?;
        self.transfer_function.clear();
        self.config = config;

        log::info!("PID gains kp={} ki={} kd={} tf={}", config.kp, config.ki, config.kd, config.tf);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.transfer_function.clear();
    }

    pub fn compute(&mut self, error: f32) -> f32 {
        self.transfer_function.evaluate(error)
    }

    pub fn config(&self) -> PidConfig {
        self.config
    }
}

/* --------------------------- Test -------------------------- */
