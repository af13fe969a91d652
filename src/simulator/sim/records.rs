/// Push a `ModelRecord` stamped with the current simulation time.
///
/// The subject is either one expression or a format string with arguments:
/// ```ignore
/// model_record!(self, services, "start_txn", "idle");
/// model_record!(self, services, "finish_txn", "{:?} cycles={}", outcome, cycles);
/// ```
#[macro_export]
macro_rules! model_record {
  ($self:expr, $services:expr, $action:expr, $subject:expr) => {
    $self.records.push(sim::models::ModelRecord {
      time: $services.global_time(),
      action: $action.to_string(),
      subject: $subject.to_string(),
    });
  };
  ($self:expr, $services:expr, $action:expr, $fmt:literal, $($arg:tt)+) => {
    $crate::model_record!($self, $services, $action, format!($fmt, $($arg)+))
  };
}
