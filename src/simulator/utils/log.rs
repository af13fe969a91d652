/// Global logging configuration
use env_logger::Env;
use log::LevelFilter;
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLE_LOG: AtomicBool = AtomicBool::new(true);

/// Install the env_logger backend. `RUST_LOG` wins, default is `info`.
/// Calling it again is harmless, tests do that freely.
pub fn init_log() {
  let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
    .format_timestamp(None)
    .format_target(false)
    .try_init();
}

/// Set logging enabled
pub fn set_log(enabled: bool) {
  ENABLE_LOG.store(enabled, Ordering::Relaxed);
  if !enabled {
    log::set_max_level(LevelFilter::Warn);
  }
}

/// Check if logging is enabled, default is true
pub fn is_log_enabled() -> bool {
  ENABLE_LOG.load(Ordering::Relaxed)
}

/// Print a log message with blue [Log] prefix
#[macro_export]
macro_rules! log_info {
  ($($arg:tt)*) => {
    if $crate::simulator::utils::log::is_log_enabled() {
      println!("\x1b[34m[Log]\x1b[0m {}", format!($($arg)*));
    }
  };
}
