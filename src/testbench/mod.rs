// Cycle-level harness: drives one bridge with a burst-side master and a peer responder

pub mod master;
pub mod peer;
pub mod transaction;

use log::{debug, warn};

pub use master::{AxiMaster, ConsumerReady};
pub use peer::PeerResponder;
pub use transaction::{
  load_workload, parse_workload, Direction, Outcome, PeerAccess, ReadBeat, Transaction, TransactionReport,
};

use crate::bridge::{Axi2Apb, BridgeInputs, Exit, Phase};
use crate::simulator::utils::log_config::is_cycle_log_enabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchSettings {
  pub peer_wait_states: u32,
  pub write_peer_stall: bool,
  pub max_cycles: u64,
  pub consumer_ready: ConsumerReady,
}

impl Default for BenchSettings {
  fn default() -> Self {
    Self {
      peer_wait_states: 0,
      write_peer_stall: false,
      max_cycles: 256,
      consumer_ready: ConsumerReady::Always,
    }
  }
}

#[derive(Clone)]
struct Active {
  master: AxiMaster,
  cycles: u64,
  first_access: usize,
  overruns_before: u32,
}

#[derive(Clone)]
pub struct Testbench {
  bridge: Axi2Apb,
  peer: PeerResponder,
  settings: BenchSettings,
  active: Option<Active>,
}

impl Testbench {
  pub fn new(settings: BenchSettings) -> Self {
    Self::with_peer(
      settings,
      PeerResponder::new(settings.peer_wait_states, settings.write_peer_stall),
    )
  }

  pub fn with_peer(settings: BenchSettings, peer: PeerResponder) -> Self {
    Self {
      bridge: Axi2Apb::new(),
      peer,
      settings,
      active: None,
    }
  }

  pub fn bridge(&self) -> &Axi2Apb {
    &self.bridge
  }

  pub fn peer(&self) -> &PeerResponder {
    &self.peer
  }

  pub fn peer_mut(&mut self) -> &mut PeerResponder {
    &mut self.peer
  }

  pub fn is_busy(&self) -> bool {
    self.active.is_some()
  }

  /// Begin driving a transaction. Any transaction still in flight is dropped.
  pub fn start(&mut self, txn: Transaction) {
    if self.active.is_some() {
      warn!("starting a new transaction while one is in flight");
    }
    self.active = Some(Active {
      master: AxiMaster::new(txn, self.settings.consumer_ready),
      cycles: 0,
      first_access: self.peer.accesses().len(),
      overruns_before: self.bridge.buffer().overruns(),
    });
  }

  /// Advance one clock cycle. Returns the report once the transaction is over.
  pub fn cycle(&mut self) -> Option<TransactionReport> {
    let active = self.active.as_mut()?;

    let registered = self.bridge.outputs();
    let mut inputs = BridgeInputs::default();
    active.master.drive(active.cycles, &mut inputs);
    self.peer.drive(&registered, &mut inputs);

    let phase = self.bridge.phase();
    let out = self.bridge.tick(&inputs);
    active.master.observe(&out, &inputs);
    self.peer.observe(&out, &inputs);
    active.cycles += 1;

    if is_cycle_log_enabled() {
      debug!(
        "cycle {:>4} {:<20} -> {:<20} psel={:?} paddr={} pready={}",
        active.cycles,
        phase,
        self.bridge.phase(),
        out.psel,
        out.paddr,
        inputs.pready
      );
    }

    let outcome = match self.bridge.last_exit() {
      Some(Exit::Completed) => Some(Outcome::Completed),
      Some(Exit::Abandoned(cause)) => Some(Outcome::from(cause)),
      None if active.master.withdrawn() && self.bridge.phase() == Phase::Idle => Some(Outcome::Withdrawn),
      None if active.cycles >= self.settings.max_cycles => Some(Outcome::TimedOut),
      None => None,
    }?;

    let active = self.active.take()?;
    Some(self.finish(active, outcome))
  }

  fn finish(&mut self, active: Active, outcome: Outcome) -> TransactionReport {
    if outcome == Outcome::TimedOut {
      warn!(
        "transaction timed out after {} cycles in {}, resetting bridge",
        active.cycles,
        self.bridge.phase()
      );
      self.bridge.tick(&BridgeInputs {
        reset: true,
        ..Default::default()
      });
    }

    TransactionReport {
      direction: active.master.transaction().direction(),
      outcome,
      read_beats: active.master.read_beats().to_vec(),
      write_acked: active.master.write_acked(),
      peer_accesses: self.peer.accesses()[active.first_access..].to_vec(),
      cycles: active.cycles,
      buffer_overruns: self.bridge.buffer().overruns() - active.overruns_before,
    }
  }

  /// Drive a transaction to completion (or timeout).
  pub fn run(&mut self, txn: Transaction) -> TransactionReport {
    self.start(txn);
    loop {
      if let Some(report) = self.cycle() {
        return report;
      }
    }
  }
}
