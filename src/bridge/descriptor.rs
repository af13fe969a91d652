use super::signals::{BurstMode, Region, ADDR_MASK, LEN_MASK, OFFSET_MASK, REGION_SIZE};

/// Per-transaction state, latched when a request leaves its setup phase and
/// overwritten by the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferDescriptor {
  pub start_addr: u8,
  pub burst: BurstMode,
  /// Beats still to move on the burst side.
  pub burst_remaining: u8,
  /// Beats still to move on the peer side.
  pub peer_remaining: u8,
  /// Region-local peripheral offset of the current beat.
  pub offset: u8,
  pub final_beat: bool,
}

impl TransferDescriptor {
  /// Read path bookkeeping: the peer count keeps the raw length field while
  /// the burst count is one larger.
  pub fn latch_read(addr: u8, len: u8, burst: BurstMode) -> Self {
    let len = len & LEN_MASK;
    Self::latch(addr, burst, len + 1, len)
  }

  pub fn latch_write(addr: u8, len: u8, burst: BurstMode) -> Self {
    let len = len & LEN_MASK;
    Self::latch(addr, burst, len + 1, len + 1)
  }

  fn latch(addr: u8, burst: BurstMode, burst_remaining: u8, peer_remaining: u8) -> Self {
    let start_addr = addr & ADDR_MASK;
    Self {
      start_addr,
      burst,
      burst_remaining,
      peer_remaining,
      offset: start_addr % REGION_SIZE,
      final_beat: false,
    }
  }

  pub fn region(&self) -> Region {
    Region::from_addr(self.start_addr)
  }

  /// Advance the offset the way the burst mode asks for.
  pub fn step_offset(&mut self) {
    if self.burst == BurstMode::Incr {
      self.bump_offset();
    }
  }

  /// Unconditional +1 within the offset register width.
  pub fn bump_offset(&mut self) {
    self.offset = self.offset.wrapping_add(1) & OFFSET_MASK;
  }
}
