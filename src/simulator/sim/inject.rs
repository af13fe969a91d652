use sim::simulator::{Message, Simulation};
use std::io;

use crate::arch::axi2apb::main::{BRIDGE_MODEL, TXN_REQ_PORT};
use crate::testbench::Transaction;

/// Queue a raw message for `target_model` at the current simulation time.
/// Source and ports default to `host`/`default`.
pub fn inject_message(
  simulation: &mut Simulation,
  target_model: &str,
  source_id: Option<&str>,
  source_port: Option<&str>,
  target_port: Option<&str>,
  content: &str,
) {
  let msg = Message::new(
    source_id.unwrap_or("host").to_string(),
    source_port.unwrap_or("default").to_string(),
    target_model.to_string(),
    target_port.unwrap_or("default").to_string(),
    simulation.get_global_time(),
    content.to_string(),
  );
  simulation.inject_input(msg);
}

/// Validate a transaction and hand it to the bridge's request port as JSON.
pub fn inject_transaction(simulation: &mut Simulation, txn: &Transaction) -> io::Result<()> {
  txn.validate()?;
  let content = serde_json::to_string(txn)
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("encode transaction failed: {}", e)))?;
  inject_message(simulation, BRIDGE_MODEL, Some("host"), Some("txn"), Some(TXN_REQ_PORT), &content);
  Ok(())
}
