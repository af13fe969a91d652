use log::info;
use serde_json;
use sim::models::model_trait::DevsModel;
use sim::simulator::Simulation;
use std::fs::File;
use std::io::{self, BufWriter, Result, Write};

use crate::simulator::utils::log_config::is_message_log_enabled;

/// A message seen on a connector during a step.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedMessage {
  pub time: f64,
  pub source: String,
  pub source_port: String,
  pub target: String,
  pub target_port: String,
  pub content: String,
}

/// True once no model has an internal event scheduled.
pub fn all_passive(simulation: &mut Simulation) -> bool {
  simulation
    .models()
    .iter()
    .all(|model| model.until_next_event() == f64::INFINITY)
}

/// Advance the simulation by one time step: deliver pending messages, then run
/// internal events until global time moves. Returns every message observed.
pub fn model_step(
  simulation: &mut Simulation,
  trace_writer: &mut Option<BufWriter<File>>,
) -> Result<Vec<ObservedMessage>> {
  let mut observed = Vec::new();

  // First, drain all pending messages
  let mut messages_to_process = simulation.get_messages();

  while !messages_to_process.is_empty() {
    for msg in messages_to_process.iter() {
      let seen = ObservedMessage {
        time: msg.time(),
        source: msg.source_id().to_string(),
        source_port: msg.source_port().to_string(),
        target: msg.target_id().to_string(),
        target_port: msg.target_port().to_string(),
        content: msg.content().to_string(),
      };
      if is_message_log_enabled() {
        info!(
          "[MSG] t={:.1} {}:{} -> {}:{} | {}",
          seen.time, seen.source, seen.source_port, seen.target, seen.target_port, seen.content
        );
      }
      observed.push(seen);
    }

    // Write to trace file if enabled
    if let Some(writer) = trace_writer {
      for msg in messages_to_process.iter() {
        let trace_entry = serde_json::json!({
          "time": msg.time(),
          "source": msg.source_id(),
          "source_port": msg.source_port(),
          "target": msg.target_id(),
          "target_port": msg.target_port(),
          "content": msg.content()
        });
        writeln!(writer, "{}", trace_entry)?;
      }
      writer.flush()?;
    }

    let time0 = simulation.get_global_time();
    simulation
      .step()
      .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Simulation error: {:?}", e)))?;
    if simulation.get_global_time() > time0 {
      return Ok(observed);
    }

    messages_to_process = simulation.get_messages();
  }

  // Now process internal events until all models are idle or time advances
  loop {
    if all_passive(simulation) {
      break;
    }

    let time0 = simulation.get_global_time();
    simulation
      .step()
      .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Simulation error: {:?}", e)))?;
    if simulation.get_global_time() > time0 {
      break;
    }
  }

  Ok(observed)
}
