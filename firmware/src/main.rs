//! Rover Motion Firmware (RP2040)
//!
//! USB CDC 0 carries the `#KEY:PAYLOAD;;\r\n` command protocol, USB CDC 1 the log output.
//! The PIO quadrature decoder counts encoder steps, the control task runs the
//! cooperative scheduler that owns the encoder, the robot state machine and the serial router.

#![no_std]
#![no_main]

// Mod
mod tasks;
mod resources;

// Resources
use crate::resources::Irqs;
use crate::resources::AssignedResources;
use crate::resources::DriveResources;
use crate::resources::SteeringResources;
use crate::resources::EncoderResources;
use crate::resources::StatusResources;
use crate::resources::UsbResources;
use crate::resources::HBridgeDrive;
use crate::resources::ServoSteering;
use crate::resources::pwm_config;
use crate::resources::SERIAL_STATE;
use crate::resources::LOGGER_STATE;
use crate::resources::CONFIG_DESC;
use crate::resources::BOS_DESC;
use crate::resources::CONTROL_BUF;
use crate::resources::USB_PACKET_SIZE;
use crate::resources::DRIVE_PWM_DIVIDER;
use crate::resources::DRIVE_PWM_TOP;
use crate::resources::SERVO_PWM_DIVIDER;
use crate::resources::SERVO_PWM_TOP;

// Tasks
use crate::tasks::usb_task::usb_device_task;
use crate::tasks::usb_task::usb_rx_task;
use crate::tasks::usb_task::usb_tx_task;
use crate::tasks::usb_task::usb_logger_task;
use crate::tasks::encoder::encoder_task;
use crate::tasks::hard_brake::hard_brake_timer_task;
use crate::tasks::control::control_task;

// Library
use defmt_rtt as _;
use panic_probe as _;

use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::class::cdc_acm::State;
use embassy_rp::usb::Driver;
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::rotary_encoder::PioEncoder;
use embassy_rp::pio_programs::rotary_encoder::PioEncoderProgram;
use embassy_rp::pwm::Pwm;
use embassy_rp::gpio::Level;
use embassy_rp::gpio::Output;
use embassy_executor::Spawner;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let ph = embassy_rp::init(Default::default());
    let p = split_resources!(ph);
    let usb_driver = Driver::new(p.usb.USB, Irqs);

    let config = {
        let mut config = embassy_usb::Config::new(0xc0de, 0xcafe);
        config.manufacturer = Some("Rover");
        config.product = Some("Rover motion controller");
        config.serial_number = Some("12345678");
        config.max_power = 100;
        config.max_packet_size_0 = 64;
        config
    };

    let mut builder = embassy_usb::Builder::new(
        usb_driver,
        config,
        CONFIG_DESC.init([0; 256]),
        BOS_DESC.init([0; 256]),
        &mut [],
        CONTROL_BUF.init([0; 64]),
    );

    let serial_class = CdcAcmClass::new(&mut builder, SERIAL_STATE.init(State::new()), USB_PACKET_SIZE as u16);
    let logger_class = CdcAcmClass::new(&mut builder, LOGGER_STATE.init(State::new()), USB_PACKET_SIZE as u16);
    let (serial_sender, serial_receiver) = serial_class.split();
    let usb_dev = builder.build();

    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.encoder.PIO, Irqs);

    let enc_prg = PioEncoderProgram::new(&mut common);
    let encoder = PioEncoder::new(
        &mut common,
        sm0,
        p.encoder.PIN_A,
        p.encoder.PIN_B,
        &enc_prg,
    );

    let drive_pwm = Pwm::new_output_ab(
        p.drive.SLICE,
        p.drive.PWM_CW_PIN,
        p.drive.PWM_CCW_PIN,
        pwm_config(DRIVE_PWM_DIVIDER, DRIVE_PWM_TOP),
    );
    let (Some(pwm_cw), Some(pwm_ccw)) = drive_pwm.split() else {
        defmt::panic!("Drive PWM channels unavailable");
    };

    let servo_pwm = Pwm::new_output_a(
        p.steering.SLICE,
        p.steering.SERVO_PIN,
        pwm_config(SERVO_PWM_DIVIDER, SERVO_PWM_TOP),
    );
    let (Some(pwm_servo), _) = servo_pwm.split() else {
        defmt::panic!("Servo PWM channel unavailable");
    };

    let drive = HBridgeDrive::new(pwm_cw, pwm_ccw);
    let steering = ServoSteering::new(pwm_servo);
    let led = Output::new(p.status.LED_PIN, Level::Low);

    defmt::info!("Rover firmware started");

    spawner.must_spawn(usb_device_task(usb_dev));
    spawner.must_spawn(usb_rx_task(serial_receiver));
    spawner.must_spawn(usb_tx_task(serial_sender));
    spawner.must_spawn(usb_logger_task(logger_class));
    spawner.must_spawn(encoder_task(encoder));
    spawner.must_spawn(hard_brake_timer_task());
    spawner.must_spawn(control_task(drive, steering, led));
}
