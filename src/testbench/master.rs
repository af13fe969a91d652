use serde::{Deserialize, Serialize};

use super::transaction::{ReadBeat, Transaction};
use crate::bridge::{BridgeInputs, BridgeOutputs};

/// How the master paces its consumer-ready line for read data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerReady {
  #[default]
  Always,
  EveryOther,
}

impl ConsumerReady {
  fn ready(self, cycle: u64) -> bool {
    match self {
      ConsumerReady::Always => true,
      ConsumerReady::EveryOther => cycle % 2 == 0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddrState {
  Presenting,
  Accepted,
  Withdrawn,
}

/// Burst-side driver for a single transaction.
#[derive(Debug, Clone)]
pub struct AxiMaster {
  txn: Transaction,
  policy: ConsumerReady,
  addr: AddrState,
  presented: u32,
  next_beat: usize,
  read_beats: Vec<ReadBeat>,
  write_acked: bool,
}

impl AxiMaster {
  pub fn new(txn: Transaction, policy: ConsumerReady) -> Self {
    Self {
      txn,
      policy,
      addr: AddrState::Presenting,
      presented: 0,
      next_beat: 0,
      read_beats: Vec::new(),
      write_acked: false,
    }
  }

  pub fn transaction(&self) -> &Transaction {
    &self.txn
  }

  pub fn withdrawn(&self) -> bool {
    self.addr == AddrState::Withdrawn
  }

  pub fn read_beats(&self) -> &[ReadBeat] {
    &self.read_beats
  }

  pub fn write_acked(&self) -> bool {
    self.write_acked
  }

  /// Fill in the burst-side inputs for this cycle.
  pub fn drive(&mut self, cycle: u64, inputs: &mut BridgeInputs) {
    if self.addr == AddrState::Presenting {
      if let Some(limit) = self.txn.withdraw_after() {
        if self.presented >= limit {
          self.addr = AddrState::Withdrawn;
        }
      }
    }

    let presenting = self.addr == AddrState::Presenting;
    if presenting {
      self.presented += 1;
    }

    match &self.txn {
      Transaction::Read { addr, len, burst, .. } => {
        inputs.arvalid = presenting;
        inputs.araddr = *addr;
        inputs.arlen = *len;
        inputs.arburst = burst.bits();
        inputs.rready = self.policy.ready(cycle);
      },
      Transaction::Write {
        addr, len, burst, data, ..
      } => {
        inputs.awvalid = presenting;
        inputs.awaddr = *addr;
        inputs.awlen = *len;
        inputs.awburst = burst.bits();
        if let Some(&word) = data.get(self.next_beat) {
          inputs.wvalid = true;
          inputs.wdata = word;
          inputs.wlast = self.next_beat + 1 == data.len();
        }
        inputs.bready = true;
      },
    }
  }

  /// Sample what the bridge drove during the cycle.
  pub fn observe(&mut self, out: &BridgeOutputs, inputs: &BridgeInputs) {
    if self.addr == AddrState::Presenting && (out.arready || out.awready) {
      self.addr = AddrState::Accepted;
    }
    if out.wready && inputs.wvalid {
      self.next_beat += 1;
    }
    if out.rvalid {
      self.read_beats.push(ReadBeat {
        data: out.rdata,
        last: out.rlast,
      });
    }
    if out.bvalid && inputs.bready {
      self.write_acked = true;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bridge::BurstMode;

  #[test]
  fn test_withdraw_drops_valid() {
    let mut master = AxiMaster::new(
      Transaction::read(1, 0, BurstMode::Fixed).withdrawn_after(2),
      ConsumerReady::Always,
    );
    let mut seen = Vec::new();
    for cycle in 0..4 {
      let mut inputs = BridgeInputs::default();
      master.drive(cycle, &mut inputs);
      seen.push(inputs.arvalid);
    }
    assert_eq!(seen, vec![true, true, false, false]);
    assert!(master.withdrawn());
  }

  #[test]
  fn test_write_beats_advance_on_wready() {
    let mut master = AxiMaster::new(
      Transaction::write(0, BurstMode::Incr, vec![5, 6]),
      ConsumerReady::Always,
    );
    let mut inputs = BridgeInputs::default();
    master.drive(0, &mut inputs);
    assert_eq!((inputs.wdata, inputs.wlast), (5, false));

    master.observe(
      &BridgeOutputs {
        wready: true,
        ..Default::default()
      },
      &inputs,
    );
    let mut inputs = BridgeInputs::default();
    master.drive(1, &mut inputs);
    assert_eq!((inputs.wdata, inputs.wlast), (6, true));
  }

  #[test]
  fn test_consumer_ready_policy() {
    let policy: ConsumerReady = serde_json::from_str("\"every_other\"").unwrap();
    assert_eq!(policy, ConsumerReady::EveryOther);
    assert!(ConsumerReady::EveryOther.ready(0));
    assert!(!ConsumerReady::EveryOther.ready(1));
  }
}
