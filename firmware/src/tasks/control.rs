/*
* Control Task
*   Owns every periodic task and runs the cooperative scheduler on a base tick Ticker.
*
*   Registration order
*   1. Serial router
*   2. Encoder
*   3. Robot state machine
*   4. Encoder publisher
*   5. Blinker
*/

use super::*;

type Robot<'a> = RobotStateMachine<'a, ServoSteering<'static>, HBridgeDrive<'static>, SignalTimer, TX_BUFFER_SIZE>;

#[embassy_executor::task]
pub async fn control_task(drive: HBridgeDrive<'static>, steering: ServoSteering<'static>, led: Output<'static>) {
    let encoder = RefCell::new(EncoderTask::new(
        ENCODER_PERIOD_US,
        &ENCODER_COUNTER,
        ENCODER_RESOLUTION,
        IirFilter::new(ENCODER_IIR_A, ENCODER_IIR_B),
    ));

    let converter = match SplineConverter::new(VOLT_TO_PWM_BREAKS, VOLT_TO_PWM_SEGMENTS) {
        Ok(converter) => converter,
        Err(e) => {
            defmt::error!("Invalid volt to PWM spline: {}", e);
            return;
        }
    };

    let pid = match PidController::new(DEFAULT_PID_SPEED_CONFIG, period_seconds(CONTROL_PERIOD_US)) {
        Ok(pid) => pid,
        Err(e) => {
            defmt::error!("Invalid PID config: {}", e);
            return;
        }
    };

    let controller = MotorController::new(&encoder, pid, Some(&converter), DEFAULT_CONTROLLER_LIMITS);

    let robot: RefCell<Robot> = RefCell::new(RobotStateMachine::new(
        CONTROL_PERIOD_US,
        steering,
        drive,
        SignalTimer,
        Some(controller),
        &MODE,
        &TX_QUEUE,
    ));
    let publisher = RefCell::new(EncoderPublisher::new(ENCODER_PUBLISHER_PERIOD_US, &encoder, &TX_QUEUE));
    let blinker = RefCell::new(Blinker::new(BLINKER_PERIOD_US, led));

    /* --------------------------- Serial Handlers -------------------------- */
    let move_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_move(payload, response);
    let brake_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_brake(payload, response);
    let hard_brake_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_hard_brake(payload, response);
    let pid_activate_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_pid_activate(payload, response);
    let pid_tune_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_pid_tune(payload, response);
    let steer_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_steer(payload, response);
    let timed_move_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_timed_move(payload, response);
    let distance_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_move_distance(payload, response);
    let publisher_handler = |payload: &str, response: &mut Response| publisher.borrow_mut().serial_callback(payload, response);

    let mut router = SerialRouter::new(&RX_QUEUE, &TX_QUEUE);
    let subscriptions: [(&str, SerialHandler); 9] = [
        (KEY_MOVE, &move_handler),
        (KEY_BRAKE, &brake_handler),
        (KEY_HARD_BRAKE, &hard_brake_handler),
        (KEY_PID_ACTIVATE, &pid_activate_handler),
        (KEY_PID_TUNE, &pid_tune_handler),
        (KEY_STEER, &steer_handler),
        (KEY_TIMED_MOVE, &timed_move_handler),
        (KEY_MOVE_DISTANCE, &distance_handler),
        (KEY_ENCODER_PUBLISH, &publisher_handler),
    ];

    for (key, handler) in subscriptions {
        if let Err(e) = router.subscribe(key, handler) {
            defmt::error!("Serial key {} rejected: {}", key, e);
            return;
        }
    }
    let router = RefCell::new(router);

    /* --------------------------- Scheduler -------------------------- */
    let mut scheduler: Scheduler<MAX_TASKS> = Scheduler::new(BASE_TICK_US);
    let tasks: [&RefCell<dyn PeriodicTask + '_>; 5] = [&router, &encoder, &robot, &publisher, &blinker];

    for task in tasks {
        if let Err(e) = scheduler.register(task) {
            defmt::error!("Task registration failed: {}", e);
            return;
        }
    }

    log::info!("Control loop started, {} tasks every {} us", scheduler.len(), scheduler.base_tick_us());

    let mut ticker = Ticker::every(Duration::from_micros(scheduler.base_tick_us() as u64));
    loop {
        ticker.next().await;
        scheduler.tick();

        for _ in 0..SCHEDULER_PASSES_PER_TICK {
            scheduler.dispatch();
        }
    }
}
