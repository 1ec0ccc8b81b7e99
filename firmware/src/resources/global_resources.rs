/*
* Global Resources
*/

use super::*;

/* --------------------------- Serial Queues -------------------------- */
pub static RX_QUEUE: SerialQueue<RX_BUFFER_SIZE> = SerialQueue::new();
pub static TX_QUEUE: SerialQueue<TX_BUFFER_SIZE> = SerialQueue::new();

/* --------------------------- Shared State -------------------------- */
pub static MODE: ModeFlag = ModeFlag::new();
pub static ENCODER_COUNTER: AtomicCounter = AtomicCounter::new();

/// Timeout in ms, every signal restarts the hard brake timer.
pub static HARD_BRAKE_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/* --------------------------- USB Builder -------------------------- */
pub static SERIAL_STATE: StaticCell<State> = StaticCell::new();
pub static LOGGER_STATE: StaticCell<State> = StaticCell::new();
pub static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
pub static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
pub static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
