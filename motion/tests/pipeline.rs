mod common;

use std::cell::{Cell, RefCell};

use common::*;
use rover_motion::control::*;
use rover_motion::resources::*;
use rover_motion::tasks::*;

// 20 impulses per base tick, 200 per control period
const IMPULSES_PER_TICK: i32 = 20;
const PLANT_SPEED_RPS: f32 = 200.0 / 2048.0 / 0.001;

#[test]
fn serial_commands_drive_the_closed_loop() {
    let rx: SerialQueue<RX_BUFFER_SIZE> = SerialQueue::new();
    let tx: SerialQueue<TX_BUFFER_SIZE> = SerialQueue::new();
    let mode = ModeFlag::new();
    let armed = Cell::new(None);
    let counter = AtomicCounter::new();

    let encoder = RefCell::new(EncoderTask::new(
        ENCODER_PERIOD_US,
        &counter,
        ENCODER_RESOLUTION,
        IirFilter::new(ENCODER_IIR_A, ENCODER_IIR_B),
    ));
    let converter = SplineConverter::new(VOLT_TO_PWM_BREAKS, VOLT_TO_PWM_SEGMENTS).unwrap();
    let pid = PidController::new(DEFAULT_PID_SPEED_CONFIG, period_seconds(CONTROL_PERIOD_US)).unwrap();
    let controller = MotorController::new(&encoder, pid, Some(&converter), DEFAULT_CONTROLLER_LIMITS);

    let robot = RefCell::new(RobotStateMachine::new(
        CONTROL_PERIOD_US,
        RecordingSteering::default(),
        RecordingDrive::default(),
        ManualTimer { armed_ms: &armed },
        Some(controller),
        &mode,
        &tx,
    ));
    let publisher = RefCell::new(EncoderPublisher::new(ENCODER_PUBLISHER_PERIOD_US, &encoder, &tx));

    let move_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_move(payload, response);
    let hard_brake_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_hard_brake(payload, response);
    let pid_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_pid_activate(payload, response);
    let publish_handler = |payload: &str, response: &mut Response| publisher.borrow_mut().serial_callback(payload, response);

    let mut router = SerialRouter::new(&rx, &tx);
    router.subscribe(KEY_MOVE, &move_handler).unwrap();
    router.subscribe(KEY_HARD_BRAKE, &hard_brake_handler).unwrap();
    router.subscribe(KEY_PID_ACTIVATE, &pid_handler).unwrap();
    router.subscribe(KEY_ENCODER_PUBLISH, &publish_handler).unwrap();
    let router = RefCell::new(router);

    let mut scheduler: Scheduler<MAX_TASKS> = Scheduler::new(BASE_TICK_US);
    scheduler.register(&router).unwrap();
    scheduler.register(&encoder).unwrap();
    scheduler.register(&robot).unwrap();
    scheduler.register(&publisher).unwrap();

    let mut output = String::new();
    let run_ms = |ms: u32, output: &mut String| {
        for _ in 0..ms * (1_000 / BASE_TICK_US) {
            counter.add(IMPULSES_PER_TICK);
            scheduler.tick();
            for _ in 0..8 {
                scheduler.dispatch();
            }
            output.push_str(&drain(&tx));
        }
    };

    rx.push_slice(b"#PIDA:1;;\r\n#ENPB:1;;\r\n");
    run_ms(5, &mut output);
    assert!(output.contains("@PIDA:ack;;\r\n"));
    assert!(output.contains("@ENPB:ack;;\r\n"));
    assert_eq!(mode.get(), RobotMode::Brake);

    // 0.2 m/s is a 30 rps reference, the wheel already spins faster
    rx.push_slice(b"#MCTL:0.2;5.0;;\r\n");
    run_ms(50, &mut output);
    assert!(output.contains("@MCTL:ack;;\r\n"));
    assert!(output.ends_with(&format!("@ENPB:{:.2};;\r\n", PLANT_SPEED_RPS)));
    assert_eq!(mode.get(), RobotMode::Drive);

    {
        let robot = robot.borrow();
        assert!((robot.controller().unwrap().reference() - 30.0).abs() < 1e-4);
        assert!((robot.drive().duty + 50.0).abs() < 1e-3);
        assert_eq!(robot.steering().angle, 5.0);
    }
    assert!((encoder.borrow().speed_rps() - PLANT_SPEED_RPS).abs() < 1e-2);

    rx.push_slice(b"#HBRA:30.0;0.0;;\r\n");
    run_ms(2, &mut output);
    assert!(output.contains("@HBRA:ack;;\r\n"));
    assert_eq!(mode.get(), RobotMode::HardBrake);
    assert_eq!(armed.get(), Some(HARD_BRAKE_TIMEOUT_MS));
    assert_eq!(robot.borrow().drive().inverse_pulse, Some(30.0));

    assert!(mode.expire_hard_brake());
    run_ms(2, &mut output);
    assert_eq!(mode.get(), RobotMode::Brake);
    assert!(robot.borrow().drive().is_braked);

    assert_eq!(router.borrow().truncated_frames(), 0);
    assert_eq!(tx.dropped(), 0);
}

#[test]
fn malformed_payload_is_answered_with_syntax_error() {
    let rx: SerialQueue<RX_BUFFER_SIZE> = SerialQueue::new();
    let tx: SerialQueue<TX_BUFFER_SIZE> = SerialQueue::new();
    let mode = ModeFlag::new();
    let armed = Cell::new(None);

    let robot = RefCell::new(RobotStateMachine::new(
        CONTROL_PERIOD_US,
        RecordingSteering::default(),
        RecordingDrive::default(),
        ManualTimer { armed_ms: &armed },
        None,
        &mode,
        &tx,
    ));
    let move_handler = |payload: &str, response: &mut Response| robot.borrow_mut().serial_callback_move(payload, response);

    let mut router = SerialRouter::new(&rx, &tx);
    router.subscribe(KEY_MOVE, &move_handler).unwrap();

    rx.push_slice(b"#MCTL:ten;5.0;;\r\n#MCTL:10.0;5.0;;\r\n");
    while !rx.is_empty() {
        router.dispatch();
    }

    assert_eq!(drain(&tx), "@MCTL:syntax error;;\r\n@MCTL:ack;;\r\n");
    assert_eq!(mode.get(), RobotMode::Drive);
}
