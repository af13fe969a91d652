use sim::models::model_trait::{DevsModel, Reportable, ReportableModel, SerializableModel};
use sim::models::{ModelMessage, ModelRecord};
use sim::simulator::Services;
use sim::utils::errors::SimulationError;
use std::f64::INFINITY;

use crate::model_record;
use crate::testbench::TransactionReport;

/// Passive sink recording every transaction report it is sent.
#[derive(Clone)]
pub struct Monitor {
  report_port: String,
  observed: usize,
  records: Vec<ModelRecord>,
}

impl Monitor {
  pub fn new(report_port: String) -> Self {
    Self {
      report_port,
      observed: 0,
      records: Vec::new(),
    }
  }
}

impl DevsModel for Monitor {
  fn events_ext(&mut self, incoming_message: &ModelMessage, services: &mut Services) -> Result<(), SimulationError> {
    if incoming_message.port_name != self.report_port {
      return Ok(());
    }
    let report: TransactionReport =
      serde_json::from_str(&incoming_message.content).map_err(|_| SimulationError::InvalidModelState)?;
    self.observed += 1;
    model_record!(
      self,
      services,
      "observe",
      "{:?} {:?} beats={} peer={:?}",
      report.direction,
      report.outcome,
      report.read_beats.len(),
      report.peer_addrs()
    );
    Ok(())
  }

  fn events_int(&mut self, _services: &mut Services) -> Result<Vec<ModelMessage>, SimulationError> {
    Ok(Vec::new())
  }

  fn time_advance(&mut self, _time_delta: f64) {}

  fn until_next_event(&self) -> f64 {
    INFINITY
  }
}

impl Reportable for Monitor {
  fn status(&self) -> String {
    format!("observed={}", self.observed)
  }

  fn records(&self) -> &Vec<ModelRecord> {
    &self.records
  }
}

impl ReportableModel for Monitor {}

impl SerializableModel for Monitor {
  fn get_type(&self) -> &'static str {
    "Monitor"
  }
}
