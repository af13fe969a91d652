use sim::models::model_trait::{DevsModel, Reportable, ReportableModel, SerializableModel};
use sim::models::{ModelMessage, ModelRecord};
use sim::simulator::Services;
use sim::utils::errors::SimulationError;
use std::collections::VecDeque;
use std::f64::INFINITY;

use crate::model_record;
use crate::testbench::{BenchSettings, Testbench, Transaction};

/// Clock period in simulation time units.
pub const CLOCK_PERIOD: f64 = 1.0;

/// The bridge plus its cycle harness as one DEVS atomic model. Each internal
/// event is one clock edge; transactions queue up while the bridge is busy.
#[derive(Clone)]
pub struct BridgeModel {
  txn_req_port: String,
  txn_resp_port: String,

  bench: Testbench,
  pending: VecDeque<Transaction>,
  completed: u64,

  until_next_event: f64,
  records: Vec<ModelRecord>,
}

impl BridgeModel {
  pub fn new(txn_req_port: String, txn_resp_port: String, settings: BenchSettings) -> Self {
    Self::with_bench(txn_req_port, txn_resp_port, Testbench::new(settings))
  }

  pub fn with_bench(txn_req_port: String, txn_resp_port: String, bench: Testbench) -> Self {
    Self {
      txn_req_port,
      txn_resp_port,
      bench,
      pending: VecDeque::new(),
      completed: 0,
      until_next_event: INFINITY,
      records: Vec::new(),
    }
  }

  fn has_work(&self) -> bool {
    self.bench.is_busy() || !self.pending.is_empty()
  }
}

impl DevsModel for BridgeModel {
  fn events_ext(&mut self, incoming_message: &ModelMessage, services: &mut Services) -> Result<(), SimulationError> {
    if incoming_message.port_name != self.txn_req_port {
      return Ok(());
    }

    let txn: Transaction =
      serde_json::from_str(&incoming_message.content).map_err(|_| SimulationError::InvalidModelState)?;
    model_record!(
      self,
      services,
      "receive_txn",
      "{:?} addr={} len={} burst={}",
      txn.direction(),
      txn.addr(),
      txn.len(),
      txn.burst()
    );
    self.pending.push_back(txn);

    // wake up on the next clock edge
    if self.until_next_event == INFINITY {
      self.until_next_event = CLOCK_PERIOD;
    }
    Ok(())
  }

  fn events_int(&mut self, services: &mut Services) -> Result<Vec<ModelMessage>, SimulationError> {
    let mut messages = Vec::new();

    if !self.bench.is_busy() {
      if let Some(txn) = self.pending.pop_front() {
        model_record!(self, services, "start_txn", "{:?} addr={}", txn.direction(), txn.addr());
        self.bench.start(txn);
      }
    }

    if let Some(report) = self.bench.cycle() {
      self.completed += 1;
      model_record!(
        self,
        services,
        "finish_txn",
        "{:?} {:?} cycles={}",
        report.direction,
        report.outcome,
        report.cycles
      );
      messages.push(ModelMessage {
        content: serde_json::to_string(&report).map_err(|_| SimulationError::InvalidModelState)?,
        port_name: self.txn_resp_port.clone(),
      });
    }

    self.until_next_event = if self.has_work() { CLOCK_PERIOD } else { INFINITY };
    Ok(messages)
  }

  fn time_advance(&mut self, time_delta: f64) {
    self.until_next_event -= time_delta;
  }

  fn until_next_event(&self) -> f64 {
    self.until_next_event
  }
}

impl Reportable for BridgeModel {
  fn status(&self) -> String {
    let stats = self.bench.bridge().stats();
    format!(
      "phase={} pending={} completed={} reads={} writes={} abandoned={} cycles={}",
      self.bench.bridge().phase(),
      self.pending.len(),
      self.completed,
      stats.reads,
      stats.writes,
      stats.abandoned,
      stats.cycles
    )
  }

  fn records(&self) -> &Vec<ModelRecord> {
    &self.records
  }
}

impl ReportableModel for BridgeModel {}

impl SerializableModel for BridgeModel {
  fn get_type(&self) -> &'static str {
    "BridgeModel"
  }
}
