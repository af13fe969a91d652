use sim::models::Model;
use sim::simulator::{Connector, Simulation};

use super::bridge_model::BridgeModel;
use super::monitor::Monitor;
use crate::testbench::BenchSettings;

pub const BRIDGE_MODEL: &str = "bridge";
pub const MONITOR_MODEL: &str = "monitor";
pub const TXN_REQ_PORT: &str = "txn_req";
pub const TXN_RESP_PORT: &str = "txn_resp";

pub fn create_simulation(settings: BenchSettings) -> Simulation {
  let models = vec![
    Model::new(
      String::from(BRIDGE_MODEL),
      Box::new(BridgeModel::new(
        String::from(TXN_REQ_PORT),
        String::from(TXN_RESP_PORT),
        settings,
      )),
    ),
    Model::new(
      String::from(MONITOR_MODEL),
      Box::new(Monitor::new(String::from("report"))),
    ),
  ];

  let connectors = vec![
    // bridge -> monitor: finished transaction reports
    Connector::new(
      String::from("bridge_monitor"),
      String::from(BRIDGE_MODEL),
      String::from(MONITOR_MODEL),
      String::from(TXN_RESP_PORT),
      String::from("report"),
    ),
  ];

  Simulation::post(models, connectors)
}
