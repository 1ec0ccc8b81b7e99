/*
    Resource Allocation Module
*/

use super::*;

assign_resources! {
    drive: DriveResources {
        SLICE: PWM_SLICE7,
        PWM_CW_PIN: PIN_14,
        PWM_CCW_PIN: PIN_15,
    },

    steering: SteeringResources {
        SLICE: PWM_SLICE4,
        SERVO_PIN: PIN_8,
    },

    encoder: EncoderResources {
        PIO: PIO0,
        PIN_A: PIN_6,
        PIN_B: PIN_7,
    },

    status: StatusResources {
        LED_PIN: PIN_25,
    },

    usb: UsbResources {
        USB: USB,
    },
}

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<peripherals::PIO0>;
    USBCTRL_IRQ => UsbInterruptHandler<peripherals::USB>;
});
