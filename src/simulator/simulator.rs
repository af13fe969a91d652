use log::{info, warn};
use sim::simulator::Simulation;
use std::fs::File;
use std::io::{BufWriter, Result};
use std::path::Path;

use super::config::AppConfig;
use super::sim::inject::inject_transaction;
use super::sim::mode::{SimConfig, StepMode};
use super::sim::model::{all_passive, model_step};
use super::sim::shell::{Command, Shell};
use super::utils::log::set_log;
use super::utils::log_config::{set_cycle_log, set_message_log};
use super::utils::report::{print_simulation_records, print_summary, Summary};
use crate::arch::axi2apb::main::MONITOR_MODEL;
use crate::arch::create_simulation;
use crate::log_info;
use crate::testbench::{load_workload, BenchSettings, Transaction, TransactionReport};

pub struct Simulator {
  config: SimConfig,
  simulation: Simulation,
  trace_writer: Option<BufWriter<File>>,
  injected: usize,
  reports: Vec<TransactionReport>,
}

impl Simulator {
  pub fn new(config: SimConfig, settings: BenchSettings, workload: Vec<Transaction>) -> Result<Self> {
    let trace_writer = match &config.trace_file {
      Some(path) if !path.is_empty() => Some(BufWriter::new(File::create(path)?)),
      _ => None,
    };

    let mut simulation = create_simulation(settings);
    for txn in workload.iter() {
      inject_transaction(&mut simulation, txn)?;
    }

    Ok(Self {
      config,
      simulation,
      trace_writer,
      injected: workload.len(),
      reports: Vec::new(),
    })
  }

  pub fn from_app_config(app_config: &AppConfig) -> Result<Self> {
    let step_mode = if app_config.simulation.step_mode {
      StepMode::Step
    } else {
      StepMode::Continuous
    };
    let trace_file = if app_config.simulation.trace_file.is_empty() {
      None
    } else {
      Some(app_config.simulation.trace_file.clone())
    };
    let config = SimConfig {
      quiet: app_config.simulation.quiet,
      step_mode,
      trace_file,
    };

    let settings = app_config.bridge.bench_settings();
    let workload = load_workload(Path::new(&app_config.simulation.workload))?;
    Self::new(config, settings, workload)
  }

  pub fn run(&mut self) -> Result<()> {
    if self.config.quiet {
      set_log(false);
      set_cycle_log(false);
      set_message_log(false);
    }
    log_info!("{} transaction(s) queued", self.injected);

    match self.config.step_mode {
      StepMode::Continuous => self.run_continuous()?,
      StepMode::Step => self.run_step_mode()?,
    }

    if !self.config.quiet {
      print_simulation_records(&mut self.simulation);
    }
    Ok(())
  }

  fn run_step_mode(&mut self) -> Result<()> {
    log_info!("Step mode - Enter to step, 'si N' to step N times, 'p' to print, 'c' to continue, 'q' to quit");
    let mut shell = Shell::new()?;
    while !self.is_finished() {
      match shell.read_command()? {
        Command::Step(n) => {
          for _ in 0..n {
            if self.is_finished() {
              break;
            }
            self.step()?;
          }
        },
        Command::Print => print_simulation_records(&mut self.simulation),
        Command::Continue => return self.run_continuous(),
        Command::Quit => break,
      }
    }
    Ok(())
  }

  fn run_continuous(&mut self) -> Result<()> {
    log_info!("Continuous mode");
    while !self.is_finished() {
      self.step()?;
    }
    Ok(())
  }

  /// True once nothing is in flight and no model has an event scheduled.
  pub fn is_finished(&mut self) -> bool {
    self.simulation.get_messages().is_empty() && all_passive(&mut self.simulation)
  }

  /// One simulation time step. Returns the reports completed during it.
  pub fn step(&mut self) -> Result<Vec<TransactionReport>> {
    let observed = model_step(&mut self.simulation, &mut self.trace_writer)?;

    let mut finished = Vec::new();
    for msg in observed.iter().filter(|msg| msg.target == MONITOR_MODEL) {
      match serde_json::from_str::<TransactionReport>(&msg.content) {
        Ok(report) => {
          info!(
            "t={:.1} {:?} {:?} after {} cycles",
            msg.time, report.direction, report.outcome, report.cycles
          );
          finished.push(report);
        },
        Err(e) => warn!("undecodable report from {}: {}", msg.source, e),
      }
    }

    self.reports.extend(finished.iter().cloned());
    Ok(finished)
  }

  pub fn reports(&self) -> &[TransactionReport] {
    &self.reports
  }

  pub fn summary(&self) -> Summary {
    Summary::from_reports(&self.reports)
  }

  pub fn print_summary(&self) {
    print_summary(&self.reports);
  }

  pub fn simulation_mut(&mut self) -> &mut Simulation {
    &mut self.simulation
  }
}
