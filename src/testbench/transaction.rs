use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::bridge::signals::{ADDR_MASK, LEN_MASK};
use crate::bridge::{AbandonCause, BurstMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  Read,
  Write,
}

/// One burst request as a master would issue it. `len` is the zero-based
/// length field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transaction {
  Read {
    addr: u8,
    len: u8,
    #[serde(default)]
    burst: BurstMode,
    /// Drop the address request after this many cycles if still unaccepted.
    #[serde(default)]
    withdraw_after: Option<u32>,
  },
  Write {
    addr: u8,
    len: u8,
    #[serde(default)]
    burst: BurstMode,
    data: Vec<u32>,
    #[serde(default)]
    withdraw_after: Option<u32>,
  },
}

impl Transaction {
  pub fn read(addr: u8, len: u8, burst: BurstMode) -> Self {
    Transaction::Read {
      addr,
      len,
      burst,
      withdraw_after: None,
    }
  }

  pub fn write(addr: u8, burst: BurstMode, data: Vec<u32>) -> Self {
    let len = data.len().saturating_sub(1) as u8;
    Transaction::Write {
      addr,
      len,
      burst,
      data,
      withdraw_after: None,
    }
  }

  pub fn withdrawn_after(mut self, cycles: u32) -> Self {
    match &mut self {
      Transaction::Read { withdraw_after, .. } | Transaction::Write { withdraw_after, .. } => {
        *withdraw_after = Some(cycles)
      },
    }
    self
  }

  pub fn direction(&self) -> Direction {
    match self {
      Transaction::Read { .. } => Direction::Read,
      Transaction::Write { .. } => Direction::Write,
    }
  }

  pub fn addr(&self) -> u8 {
    match self {
      Transaction::Read { addr, .. } | Transaction::Write { addr, .. } => *addr,
    }
  }

  pub fn len(&self) -> u8 {
    match self {
      Transaction::Read { len, .. } | Transaction::Write { len, .. } => *len,
    }
  }

  pub fn burst(&self) -> BurstMode {
    match self {
      Transaction::Read { burst, .. } | Transaction::Write { burst, .. } => *burst,
    }
  }

  pub fn withdraw_after(&self) -> Option<u32> {
    match self {
      Transaction::Read { withdraw_after, .. } | Transaction::Write { withdraw_after, .. } => *withdraw_after,
    }
  }

  /// Write payload; empty for reads.
  pub fn data(&self) -> &[u32] {
    match self {
      Transaction::Read { .. } => &[],
      Transaction::Write { data, .. } => data,
    }
  }

  pub fn beats(&self) -> usize {
    self.len() as usize + 1
  }

  pub fn validate(&self) -> io::Result<()> {
    if self.addr() > ADDR_MASK {
      return Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("address {} outside 0..={}", self.addr(), ADDR_MASK),
      ));
    }
    if self.len() > LEN_MASK {
      return Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("length field {} outside 0..={}", self.len(), LEN_MASK),
      ));
    }
    if let Transaction::Write { data, .. } = self {
      if data.len() != self.beats() {
        return Err(io::Error::new(
          io::ErrorKind::InvalidData,
          format!("write carries {} words but length field asks for {}", data.len(), self.beats()),
        ));
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Completed,
  Withdrawn,
  PeerNotReady,
  TimedOut,
}

impl From<AbandonCause> for Outcome {
  fn from(cause: AbandonCause) -> Self {
    match cause {
      AbandonCause::Withdrawn => Outcome::Withdrawn,
      AbandonCause::PeerNotReady => Outcome::PeerNotReady,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadBeat {
  pub data: u32,
  pub last: bool,
}

/// One completed access on the peer bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerAccess {
  /// 1-based region number.
  pub region: u8,
  pub offset: u8,
  pub write: bool,
  pub data: u32,
}

impl PeerAccess {
  /// Flat address the access landed on.
  pub fn addr(&self) -> u8 {
    // regions are numbered from 1; a report carrying 0 clamps to the first
    let base = self.region.saturating_sub(1).wrapping_mul(crate::bridge::signals::REGION_SIZE);
    base.wrapping_add(self.offset) & ADDR_MASK
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReport {
  pub direction: Direction,
  pub outcome: Outcome,
  pub read_beats: Vec<ReadBeat>,
  pub write_acked: bool,
  pub peer_accesses: Vec<PeerAccess>,
  pub cycles: u64,
  pub buffer_overruns: u32,
}

impl TransactionReport {
  pub fn read_data(&self) -> Vec<u32> {
    self.read_beats.iter().map(|beat| beat.data).collect()
  }

  pub fn peer_addrs(&self) -> Vec<u8> {
    self.peer_accesses.iter().map(|access| access.addr()).collect()
  }
}

#[derive(Debug, Default, Deserialize)]
struct WorkloadToml {
  #[serde(default, rename = "transaction")]
  transactions: Vec<Transaction>,
}

pub fn parse_workload(content: &str) -> io::Result<Vec<Transaction>> {
  let raw: WorkloadToml = toml::from_str(content)
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("parse workload failed: {}", e)))?;
  for txn in raw.transactions.iter() {
    txn.validate()?;
  }
  Ok(raw.transactions)
}

/// Load a `[[transaction]]` script.
pub fn load_workload(path: &Path) -> io::Result<Vec<Transaction>> {
  let content = fs::read_to_string(path)
    .map_err(|e| io::Error::new(e.kind(), format!("cannot read workload {:?}: {}", path, e)))?;
  parse_workload(&content)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_peer_access_addr_from_decoded_report() {
    let access: PeerAccess = serde_json::from_str(r#"{"region":3,"offset":5,"write":false,"data":0}"#).unwrap();
    assert_eq!(access.addr(), 21);

    let zero: PeerAccess = serde_json::from_str(r#"{"region":0,"offset":6,"write":true,"data":1}"#).unwrap();
    assert_eq!(zero.addr(), 6);
    let huge = PeerAccess { region: 255, ..zero };
    assert!(huge.addr() <= ADDR_MASK);
  }

  #[test]
  fn test_parse_workload() {
    let txns = parse_workload(
      r#"
        [[transaction]]
        kind = "read"
        addr = 3
        len = 0

        [[transaction]]
        kind = "write"
        addr = 24
        len = 1
        burst = "incr"
        data = [1, 2]
        withdraw_after = 4
      "#,
    )
    .unwrap();
    assert_eq!(txns[0], Transaction::read(3, 0, BurstMode::Fixed));
    assert_eq!(
      txns[1],
      Transaction::write(24, BurstMode::Incr, vec![1, 2]).withdrawn_after(4)
    );
  }

  #[test]
  fn test_validate_rejects_bad_fields() {
    assert!(Transaction::read(32, 0, BurstMode::Fixed).validate().is_err());
    assert!(Transaction::read(0, 16, BurstMode::Fixed).validate().is_err());
    let short = Transaction::Write {
      addr: 0,
      len: 3,
      burst: BurstMode::Incr,
      data: vec![1],
      withdraw_after: None,
    };
    assert!(short.validate().is_err());
    assert!(parse_workload("[[transaction]]\nkind = \"erase\"\naddr = 1\nlen = 0\n").is_err());
  }
}
