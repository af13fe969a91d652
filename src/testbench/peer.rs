use super::transaction::PeerAccess;
use crate::bridge::signals::{ADDR_MASK, REGION_SIZE};
use crate::bridge::{BridgeInputs, BridgeOutputs};

pub const PEER_WORDS: usize = (ADDR_MASK as usize) + 1;

/// Stand-in for the peripheral blocks: a flat word store that answers every
/// enabled access, optionally after a number of wait states.
#[derive(Debug, Clone)]
pub struct PeerResponder {
  memory: [u32; PEER_WORDS],
  wait_states: u32,
  stall_writes: bool,
  waited: u32,
  accesses: Vec<PeerAccess>,
}

impl PeerResponder {
  pub fn new(wait_states: u32, stall_writes: bool) -> Self {
    Self {
      memory: [0; PEER_WORDS],
      wait_states,
      stall_writes,
      waited: 0,
      accesses: Vec::new(),
    }
  }

  /// Seed every location with a recognisable pattern.
  pub fn with_pattern(mut self, f: impl Fn(u8) -> u32) -> Self {
    for (addr, word) in self.memory.iter_mut().enumerate() {
      *word = f(addr as u8);
    }
    self
  }

  pub fn preload(&mut self, addr: u8, word: u32) {
    self.memory[(addr & ADDR_MASK) as usize] = word;
  }

  pub fn word(&self, addr: u8) -> u32 {
    self.memory[(addr & ADDR_MASK) as usize]
  }

  pub fn accesses(&self) -> &[PeerAccess] {
    &self.accesses
  }

  fn flat_addr(out: &BridgeOutputs) -> Option<u8> {
    out
      .selected_region()
      .map(|region| region.base().wrapping_add(out.paddr) & ADDR_MASK)
  }

  /// Drive `pready`/`prdata` from the bridge's registered outputs.
  pub fn drive(&mut self, out: &BridgeOutputs, inputs: &mut BridgeInputs) {
    inputs.pready = false;
    let Some(addr) = Self::flat_addr(out) else {
      return;
    };
    if !out.samples_pready() {
      return;
    }
    let stalls = !out.pwrite || self.stall_writes;
    if stalls && self.waited < self.wait_states {
      self.waited += 1;
      return;
    }
    inputs.pready = true;
    if !out.pwrite {
      inputs.prdata = self.word(addr);
    }
  }

  /// Commit whatever completed during the cycle.
  pub fn observe(&mut self, out: &BridgeOutputs, inputs: &BridgeInputs) {
    if !out.peer_access(inputs.pready) {
      return;
    }
    let (Some(region), Some(addr)) = (out.selected_region(), Self::flat_addr(out)) else {
      return;
    };
    let data = if out.pwrite {
      self.memory[addr as usize] = out.pwdata;
      out.pwdata
    } else {
      inputs.prdata
    };
    self.accesses.push(PeerAccess {
      region: region.number(),
      offset: out.paddr,
      write: out.pwrite,
      data,
    });
    self.waited = 0;
  }
}

impl Default for PeerResponder {
  fn default() -> Self {
    Self::new(0, false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // the beat on which the bridge samples `pready`
  fn access(region: usize, paddr: u8, write: bool) -> BridgeOutputs {
    let mut out = BridgeOutputs {
      paddr,
      pwrite: write,
      penable: write,
      pwdata: 0x55,
      ..Default::default()
    };
    out.psel[region] = true;
    out
  }

  #[test]
  fn test_wait_states_then_ready() {
    let mut peer = PeerResponder::new(2, false).with_pattern(|a| a as u32 * 10);
    let out = access(1, 3, false);
    let mut readies = Vec::new();
    for _ in 0..3 {
      let mut inputs = BridgeInputs::default();
      peer.drive(&out, &mut inputs);
      readies.push(inputs.pready);
      if inputs.pready {
        assert_eq!(inputs.prdata, (REGION_SIZE as u32 + 3) * 10);
        peer.observe(&out, &inputs);
      }
    }
    assert_eq!(readies, vec![false, false, true]);
    assert_eq!(peer.accesses().len(), 1);
    assert_eq!(peer.accesses()[0].addr(), 11);
  }

  #[test]
  fn test_write_ignores_wait_states_unless_asked() {
    let mut peer = PeerResponder::new(3, false);
    let out = access(3, 2, true);
    let mut inputs = BridgeInputs::default();
    peer.drive(&out, &mut inputs);
    assert!(inputs.pready);
    peer.observe(&out, &inputs);
    assert_eq!(peer.word(26), 0x55);

    let mut stalling = PeerResponder::new(3, true);
    let mut inputs = BridgeInputs::default();
    stalling.drive(&out, &mut inputs);
    assert!(!inputs.pready);
  }

  #[test]
  fn test_unsampled_beats_get_no_ready() {
    let mut peer = PeerResponder::default();
    let mut read_access = access(0, 0, false);
    read_access.penable = true;
    let mut write_setup = access(0, 0, true);
    write_setup.penable = false;
    for out in [read_access, write_setup] {
      let mut inputs = BridgeInputs::default();
      peer.drive(&out, &mut inputs);
      assert!(!inputs.pready);
      peer.observe(&out, &inputs);
    }
    assert!(peer.accesses().is_empty());
  }

  #[test]
  fn test_read_answered_in_setup_beat() {
    let mut peer = PeerResponder::default().with_pattern(|a| a as u32 + 100);
    let out = access(2, 5, false);
    assert!(!out.penable);
    let mut inputs = BridgeInputs::default();
    peer.drive(&out, &mut inputs);
    assert!(inputs.pready);
    assert_eq!(inputs.prdata, 121);
    peer.observe(&out, &inputs);
    assert_eq!(peer.accesses()[0].addr(), 21);
  }
}
