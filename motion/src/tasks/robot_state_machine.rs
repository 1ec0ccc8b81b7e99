/*
* Robot State Machine
*   Idle       -> nothing is commanded
*   Drive      -> steering + speed, open loop duty or closed loop through the motor controller
*                 a distance move brakes by itself once the encoder covered the distance
*   Brake      -> steering + brake, controller cleared
*   HardBrake  -> inverse drive pulse, the one shot timer moves it to Brake
*
*   Speed unit
*   - PID active   : meter per second
*   - PID inactive : duty cycle in percent
*/

use super::*;

pub fn mps_to_rps(speed_mps: f32) -> f32 {
    speed_mps * MPS_TO_RPS
}

pub fn meters_to_impulses(distance_m: f32) -> f32 {
    distance_m * METER_TO_IMPULSES
}

/* --------------------------- Command Error -------------------------- */
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandError {
    Syntax = 1,
    SpeedTooHigh = 2,
    ReferenceTooHigh = 3,
    AngleTooHigh = 4,
    NoController = 5,
    NotAccepted = 6,
    PidNotActive = 7,
    DistanceTooHigh = 8,
}

impl CommandError {
    pub fn as_response(self) -> &'static str {
        match self {
            CommandError::Syntax => RESP_SYNTAX_ERROR,
            CommandError::SpeedTooHigh => RESP_SPEED_TOO_HIGH,
            CommandError::ReferenceTooHigh => RESP_REFERENCE_TOO_HIGH,
            CommandError::AngleTooHigh => RESP_ANGLE_TOO_HIGH,
            CommandError::NoController => RESP_NO_CONTROLLER,
            CommandError::NotAccepted => RESP_SYNTAX_ERROR,
            CommandError::PidNotActive => RESP_PID_NOT_ACTIVE,
            CommandError::DistanceTooHigh => RESP_DISTANCE_TOO_HIGH,
        }
    }
}

fn respond(response: &mut Response, result: Result<(), CommandError>) {
    let text = match result {
        Ok(()) => RESP_ACK,
        Err(error) => error.as_response(),
    };
    let _ = response.push_str(text);
}

/* --------------------------- Code -------------------------- */
pub struct RobotStateMachine<'a, S, D, T, const TX: usize>
where
    S: SteeringCommand,
    D: DriveCommand,
    T: OneShotTimer,
{
    timer: TaskTimer,
    period_s: f32,
    steering: S,
    drive: D,
    hard_brake_timer: T,
    controller: Option<MotorController<'a>>,
    mode: &'a ModeFlag,
    tx: &'a SerialQueue<TX>,
    speed: f32,
    angle: f32,
    is_pid_active: bool,
    drive_periods_left: Option<u32>,
}

impl<'a, S, D, T, const TX: usize> RobotStateMachine<'a, S, D, T, TX>
where
    S: SteeringCommand,
    D: DriveCommand,
    T: OneShotTimer,
{
    pub fn new(
        period_us: u32,
        steering: S,
        drive: D,
        hard_brake_timer: T,
        controller: Option<MotorController<'a>>,
        mode: &'a ModeFlag,
        tx: &'a SerialQueue<TX>,
    ) -> Self {
        mode.set(RobotMode::Idle);

        Self {
            timer: TaskTimer::new(period_ticks(period_us)),
            period_s: period_seconds(period_us),
            steering,
            drive,
            hard_brake_timer,
            controller,
            mode,
            tx,
            speed: 0.0,
            angle: 0.0,
            is_pid_active: false,
            drive_periods_left: None,
        }
    }

    /* --------------------------- Commands -------------------------- */
    fn check_move(&self, speed: f32, angle: f32) -> Result<(), CommandError> {
        if !self.steering.in_range(angle) {
            return Err(CommandError::AngleTooHigh);
        }

        if !self.is_pid_active {
            if !self.drive.in_range(speed) {
                return Err(CommandError::SpeedTooHigh);
            }
            return Ok(());
        }

        let Some(controller) = self.controller.as_ref() else {
            return Err(CommandError::NoController);
        };

        if !controller.in_range(mps_to_rps(speed)) {
            return Err(CommandError::ReferenceTooHigh);
        }

        Ok(())
    }

    pub fn move_command(&mut self, speed: f32, angle: f32) -> Result<(), CommandError> {
        self.check_move(speed, angle)?;

        self.cancel_distance();
        self.speed = speed;
        self.angle = angle;
        self.drive_periods_left = None;
        self.set_mode(RobotMode::Drive);
        Ok(())
    }

    /// Drives for `duration_s` and brakes afterwards.
    pub fn timed_move_command(&mut self, speed: f32, duration_s: f32, angle: f32) -> Result<(), CommandError> {
        if !(duration_s > 0.0) {
            return Err(CommandError::Syntax);
        }
        self.check_move(speed, angle)?;

        self.cancel_distance();
        self.speed = speed;
        self.angle = angle;
        self.drive_periods_left = Some(ceilf(duration_s / self.period_s) as u32);
        self.set_mode(RobotMode::Drive);
        Ok(())
    }

    /// Closed loop move at `speed` that brakes after `distance_m`. The distance takes the sign of the speed.
    pub fn move_distance_command(&mut self, distance_m: f32, speed: f32) -> Result<(), CommandError> {
        let Some(controller) = self.controller.as_mut() else {
            return Err(CommandError::NoController);
        };
        if !self.is_pid_active {
            return Err(CommandError::PidNotActive);
        }
        if !controller.in_range(mps_to_rps(speed)) {
            return Err(CommandError::ReferenceTooHigh);
        }

        let impulses = meters_to_impulses(distance_m);
        if !controller.distance_in_range(impulses) {
            return Err(CommandError::DistanceTooHigh);
        }

        let impulses = if speed < 0.0 { -fabsf(impulses) } else { fabsf(impulses) };
        controller.set_distance(impulses);

        self.speed = speed;
        self.drive_periods_left = None;
        self.set_mode(RobotMode::Drive);
        log::info!("Distance move of {} impulses", impulses);
        Ok(())
    }

    pub fn steer_command(&mut self, angle: f32) -> Result<(), CommandError> {
        if !self.steering.in_range(angle) {
            return Err(CommandError::AngleTooHigh);
        }

        self.angle = angle;
        self.steering.set_angle(angle);
        Ok(())
    }

    pub fn brake_command(&mut self, angle: f32) -> Result<(), CommandError> {
        if !self.steering.in_range(angle) {
            return Err(CommandError::AngleTooHigh);
        }

        self.cancel_distance();
        self.speed = 0.0;
        self.angle = angle;
        self.drive_periods_left = None;
        if let Some(controller) = self.controller.as_mut() {
            controller.set_reference(0.0);
        }
        self.set_mode(RobotMode::Brake);
        Ok(())
    }

    pub fn hard_brake_command(&mut self, pulse: f32, angle: f32) -> Result<(), CommandError> {
        if !matches!(self.mode.get(), RobotMode::Drive | RobotMode::Brake) {
            return Err(CommandError::NotAccepted);
        }
        if !self.steering.in_range(angle) {
            return Err(CommandError::AngleTooHigh);
        }
        if !self.drive.in_range(pulse) {
            return Err(CommandError::SpeedTooHigh);
        }

        self.cancel_distance();
        self.speed = 0.0;
        self.angle = angle;
        self.drive_periods_left = None;
        self.steering.set_angle(angle);
        self.drive.inverse_direction(pulse);
        self.set_mode(RobotMode::HardBrake);
        self.hard_brake_timer.start(HARD_BRAKE_TIMEOUT_MS);
        Ok(())
    }

    pub fn set_pid_active(&mut self, is_active: bool) -> Result<(), CommandError> {
        let Some(controller) = self.controller.as_mut() else {
            return Err(CommandError::NoController);
        };

        controller.set_reference(0.0);
        controller.clear();
        controller.clear_distance();
        self.speed = 0.0;
        self.drive_periods_left = None;
        self.is_pid_active = is_active;
        self.drive.brake();
        self.set_mode(RobotMode::Brake);

        log::info!("PID control {}", if is_active { "enabled" } else { "disabled" });
        Ok(())
    }

    pub fn tune_pid(&mut self, config: PidConfig) -> Result<(), CommandError> {
        let Some(controller) = self.controller.as_mut() else {
            return Err(CommandError::NoController);
        };

        controller.tune(config).map_err(|_| CommandError::Syntax)
    }

    /* --------------------------- Serial Callbacks -------------------------- */
    /// `speed;angle`
    pub fn serial_callback_move(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(speed), Some(angle), true) = (reader.read_f32(), reader.read_f32(), reader.is_done()) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.move_command(speed, angle));
    }

    /// `speed;duration_s;angle`
    pub fn serial_callback_timed_move(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(speed), Some(duration_s), Some(angle), true) = (
            reader.read_f32(), reader.read_f32(), reader.read_f32(), reader.is_done()
        ) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.timed_move_command(speed, duration_s, angle));
    }

    /// `distance;speed`
    pub fn serial_callback_move_distance(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(distance_m), Some(speed), true) = (reader.read_f32(), reader.read_f32(), reader.is_done()) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.move_distance_command(distance_m, speed));
    }

    /// `angle`
    pub fn serial_callback_steer(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(angle), true) = (reader.read_f32(), reader.is_done()) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.steer_command(angle));
    }

    /// `angle`
    pub fn serial_callback_brake(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(angle), true) = (reader.read_f32(), reader.is_done()) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.brake_command(angle));
    }

    /// `pulse;angle`
    pub fn serial_callback_hard_brake(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(pulse), Some(angle), true) = (reader.read_f32(), reader.read_f32(), reader.is_done()) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.hard_brake_command(pulse, angle));
    }

    /// `0` or `1`
    pub fn serial_callback_pid_activate(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(is_active), true) = (reader.read::<bool>(), reader.is_done()) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.set_pid_active(is_active));
    }

    /// `kp;ki;kd;tf`
    pub fn serial_callback_pid_tune(&mut self, payload: &str, response: &mut Response) {
        let mut reader = PayloadReader::new(payload);
        let (Some(kp), Some(ki), Some(kd), Some(tf), true) = (
            reader.read_f32(), reader.read_f32(), reader.read_f32(), reader.read_f32(), reader.is_done()
        ) else {
            return respond(response, Err(CommandError::Syntax));
        };

        respond(response, self.tune_pid(PidConfig { kp, ki, kd, tf }));
    }

    /* --------------------------- State -------------------------- */
    fn set_mode(&mut self, mode: RobotMode) {
        if self.mode.get() != mode {
            log::info!("Robot mode {:?} -> {:?}", self.mode.get(), mode);
        }
        self.mode.set(mode);
    }

    pub fn mode(&self) -> RobotMode {
        self.mode.get()
    }

    pub fn is_pid_active(&self) -> bool {
        self.is_pid_active
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn controller(&self) -> Option<&MotorController<'a>> {
        self.controller.as_ref()
    }

    pub fn steering(&self) -> &S {
        &self.steering
    }

    pub fn drive(&self) -> &D {
        &self.drive
    }

    fn cancel_distance(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.clear_distance();
        }
    }

    fn report_fault(&self, status: ControlStatus) {
        let reason = match status {
            ControlStatus::Overspeed => RESP_OVERSPEED,
            _ => RESP_ENCODER_FAULT,
        };

        log::warn!("Control fault {:?}, braking", status);
        Frame::new(KEY_PID_ACTIVATE).push(reason).send(self.tx);
    }

    fn run_drive(&mut self) {
        if let Some(left) = self.drive_periods_left {
            if left == 0 {
                self.drive_periods_left = None;
                self.speed = 0.0;
                self.set_mode(RobotMode::Brake);
                self.run_brake();
                return;
            }
            self.drive_periods_left = Some(left - 1);
        }

        self.steering.set_angle(self.angle);

        let controller = match self.controller.as_mut() {
            Some(controller) if self.is_pid_active => controller,
            _ => {
                self.drive.set_reference(self.speed);
                return;
            }
        };

        controller.set_reference(mps_to_rps(self.speed));
        let status = controller.control();

        if status.is_fault() {
            controller.clear();
            controller.clear_distance();
            self.drive.brake();
            self.speed = 0.0;
            self.set_mode(RobotMode::Brake);
            self.report_fault(status);
            return;
        }

        if controller.distance_done() {
            controller.clear_distance();
            controller.clear();
            self.drive.brake();
            self.speed = 0.0;
            self.set_mode(RobotMode::Brake);
            Frame::new(KEY_MOVE_DISTANCE).push(RESP_DISTANCE_DONE).send(self.tx);
            return;
        }

        self.drive.set_reference(controller.output() * CONTROL_TO_DUTY_PERCENT);
    }

    fn run_brake(&mut self) {
        self.steering.set_angle(self.angle);
        self.drive.brake();
        if let Some(controller) = self.controller.as_mut() {
            controller.clear();
        }
    }
}

impl<'a, S, D, T, const TX: usize> PeriodicTask for RobotStateMachine<'a, S, D, T, TX>
where
    S: SteeringCommand,
    D: DriveCommand,
    T: OneShotTimer,
{
    fn timer(&mut self) -> &mut TaskTimer {
        &mut self.timer
    }

    fn run(&mut self) {
        match self.mode.get() {
            RobotMode::Drive => self.run_drive(),
            RobotMode::Brake => self.run_brake(),
            RobotMode::Idle | RobotMode::HardBrake => {},
        }
    }
}
