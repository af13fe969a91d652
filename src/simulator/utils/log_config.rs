/// Per-category trace switches
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLE_CYCLE_LOG: AtomicBool = AtomicBool::new(true);
static ENABLE_MESSAGE_LOG: AtomicBool = AtomicBool::new(true);

/// Per-cycle phase/peer trace of the testbench
pub fn set_cycle_log(enabled: bool) {
  ENABLE_CYCLE_LOG.store(enabled, Ordering::Relaxed);
}

/// DEVS message trace of the simulator loop
pub fn set_message_log(enabled: bool) {
  ENABLE_MESSAGE_LOG.store(enabled, Ordering::Relaxed);
}

pub fn is_cycle_log_enabled() -> bool {
  ENABLE_CYCLE_LOG.load(Ordering::Relaxed)
}

pub fn is_message_log_enabled() -> bool {
  ENABLE_MESSAGE_LOG.load(Ordering::Relaxed)
}
