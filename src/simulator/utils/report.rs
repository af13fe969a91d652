use sim::models::{Model, Reportable};
use sim::simulator::Simulation;

use crate::testbench::{Outcome, TransactionReport};

pub fn print_simulation_records(simulation: &mut Simulation) {
  println!("\n--- Simulation Records ---");

  for model in simulation.models().iter() {
    print_model_records(model, 0);
  }

  println!("--- End Records ---\n");
}

fn print_model_records(model: &Model, indent: usize) {
  let records = model.records();
  let indent_str = "  ".repeat(indent);

  if !records.is_empty() {
    println!("\n{}[{}] {}", indent_str, model.id(), model.status());
    for record in records {
      println!("{}  Time {:.1}: {} {}", indent_str, record.time, record.action, record.subject);
    }
  }
}

/// Totals over a batch of transaction reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
  pub completed: usize,
  pub withdrawn: usize,
  pub peer_not_ready: usize,
  pub timed_out: usize,
  pub cycles: u64,
  pub buffer_overruns: u32,
}

impl Summary {
  pub fn from_reports(reports: &[TransactionReport]) -> Self {
    let mut summary = Summary::default();
    for report in reports {
      match report.outcome {
        Outcome::Completed => summary.completed += 1,
        Outcome::Withdrawn => summary.withdrawn += 1,
        Outcome::PeerNotReady => summary.peer_not_ready += 1,
        Outcome::TimedOut => summary.timed_out += 1,
      }
      summary.cycles += report.cycles;
      summary.buffer_overruns += report.buffer_overruns;
    }
    summary
  }
}

pub fn print_summary(reports: &[TransactionReport]) {
  println!("--- Transactions ---");
  for (idx, report) in reports.iter().enumerate() {
    println!(
      "#{:<3} {:?} {:?} cycles={} beats={} peer={:?} overruns={}",
      idx,
      report.direction,
      report.outcome,
      report.cycles,
      report.read_beats.len(),
      report.peer_addrs(),
      report.buffer_overruns
    );
  }
  let summary = Summary::from_reports(reports);
  println!(
    "completed={} withdrawn={} peer_not_ready={} timed_out={} cycles={} overruns={}",
    summary.completed,
    summary.withdrawn,
    summary.peer_not_ready,
    summary.timed_out,
    summary.cycles,
    summary.buffer_overruns
  );
}
