use axi2apb::arch::axi2apb::main::{BRIDGE_MODEL, TXN_REQ_PORT};
use axi2apb::arch::create_simulation;
use axi2apb::bridge::BurstMode;
use axi2apb::simulator::config::{load_and_merge_configs, CliOverrides};
use axi2apb::simulator::sim::inject::inject_message;
use axi2apb::simulator::sim::mode::{SimConfig, StepMode};
use axi2apb::simulator::sim::model::{all_passive, model_step};
use axi2apb::simulator::utils::log::init_log;
use axi2apb::simulator::Simulator;
use axi2apb::testbench::{parse_workload, BenchSettings, Direction, Outcome, Transaction, TransactionReport};
use std::fs;
use std::path::PathBuf;

fn quiet_config() -> SimConfig {
  SimConfig {
    quiet: true,
    step_mode: StepMode::Continuous,
    trace_file: None,
  }
}

fn manifest_dir() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_reports_arrive_in_order() {
  init_log();
  let workload = vec![
    Transaction::write(24, BurstMode::Incr, vec![1, 2, 3, 4]),
    Transaction::read(24, 3, BurstMode::Incr),
    Transaction::read(3, 0, BurstMode::Fixed).withdrawn_after(1),
  ];
  let mut simulator = Simulator::new(quiet_config(), BenchSettings::default(), workload).unwrap();
  simulator.run().unwrap();

  let reports = simulator.reports();
  assert_eq!(reports.len(), 3);
  assert_eq!(reports[0].direction, Direction::Write);
  assert_eq!(reports[0].outcome, Outcome::Completed);
  assert_eq!(reports[0].peer_addrs(), vec![24, 25, 26, 27]);
  assert_eq!(reports[1].read_data(), vec![1, 2, 3, 4]);
  assert_eq!(reports[2].outcome, Outcome::Withdrawn);

  let summary = simulator.summary();
  assert_eq!(summary.completed, 2);
  assert_eq!(summary.withdrawn, 1);
  assert_eq!(summary.buffer_overruns, 0);
  assert!(simulator.is_finished());
}

#[test]
fn test_invalid_transaction_is_rejected() {
  let workload = vec![Transaction::read(40, 0, BurstMode::Fixed)];
  assert!(Simulator::new(quiet_config(), BenchSettings::default(), workload).is_err());
}

#[test]
fn test_demo_workload_from_config() {
  init_log();
  let cli = CliOverrides {
    quiet: true,
    ..Default::default()
  };
  let app_config = load_and_merge_configs(None, &manifest_dir(), &cli).unwrap();
  let expected = parse_workload(&fs::read_to_string(&app_config.simulation.workload).unwrap()).unwrap();

  let mut simulator = Simulator::from_app_config(&app_config).unwrap();
  simulator.run().unwrap();

  assert_eq!(simulator.reports().len(), expected.len());
  assert!(simulator
    .reports()
    .iter()
    .all(|report| report.outcome == Outcome::Completed));
  // the fixed-mode write at the end of the demo drains below the buffer
  assert_eq!(simulator.summary().buffer_overruns, 1);
}

#[test]
fn test_trace_file_records_messages() {
  let path = std::env::temp_dir().join(format!("axi2apb-trace-{}.jsonl", std::process::id()));
  let config = SimConfig {
    trace_file: Some(path.to_string_lossy().to_string()),
    ..quiet_config()
  };
  let workload = vec![
    Transaction::read(8, 1, BurstMode::Incr),
    Transaction::write(0, BurstMode::Incr, vec![7]),
  ];
  let mut simulator = Simulator::new(config, BenchSettings::default(), workload).unwrap();
  simulator.run().unwrap();
  drop(simulator);

  let content = fs::read_to_string(&path).unwrap();
  let _ = fs::remove_file(&path);
  let entries: Vec<serde_json::Value> = content
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();

  // two requests in, two reports out
  assert_eq!(entries.len(), 4);
  assert_eq!(entries[0]["target"], "bridge");
  assert_eq!(entries[0]["target_port"], "txn_req");
  assert_eq!(entries[3]["source"], "bridge");
  assert_eq!(entries[3]["target"], "monitor");
}

#[test]
fn test_bridge_model_clocks_one_cycle_per_time_unit() {
  let mut simulation = create_simulation(BenchSettings::default());
  let txn = serde_json::to_string(&Transaction::read(3, 0, BurstMode::Fixed)).unwrap();
  inject_message(&mut simulation, BRIDGE_MODEL, None, None, Some(TXN_REQ_PORT), &txn);

  let mut trace = None;
  let mut reports = Vec::new();
  for _ in 0..64 {
    for msg in model_step(&mut simulation, &mut trace).unwrap() {
      if msg.target == "monitor" {
        reports.push((msg.time, serde_json::from_str::<TransactionReport>(&msg.content).unwrap()));
      }
    }
    if simulation.get_messages().is_empty() && all_passive(&mut simulation) {
      break;
    }
  }

  assert_eq!(reports.len(), 1);
  let (time, report) = &reports[0];
  assert_eq!(report.cycles, 6);
  assert_eq!(*time, report.cycles as f64);
}
