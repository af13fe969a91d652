/// Signal bundles on both sides of the bridge
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the burst-side address fields.
pub const ADDR_BITS: u32 = 5;
pub const ADDR_MASK: u8 = (1 << ADDR_BITS) - 1;

/// Zero-based burst length field (N beats encoded as N-1).
pub const LEN_MASK: u8 = 0x0f;

/// Locations per peripheral region.
pub const REGION_SIZE: u8 = 8;
pub const NUM_REGIONS: usize = 4;

/// Region-local offset register. It shares the address width, so an
/// incrementing burst runs past the end of its region instead of wrapping.
pub const OFFSET_MASK: u8 = ADDR_MASK;

/// Response code, the bridge never reports anything but OKAY.
pub const RESP_OKAY: u8 = 0b00;

const BURST_FIXED: u8 = 0b00;
const BURST_INCR: u8 = 0b01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstMode {
  #[default]
  Fixed,
  Incr,
}

impl BurstMode {
  /// Decode a 2-bit burst field. Only INCR advances the offset; WRAP and the
  /// reserved encoding behave like FIXED.
  pub fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      BURST_INCR => BurstMode::Incr,
      _ => BurstMode::Fixed,
    }
  }

  pub fn bits(self) -> u8 {
    match self {
      BurstMode::Fixed => BURST_FIXED,
      BurstMode::Incr => BURST_INCR,
    }
  }
}

impl fmt::Display for BurstMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BurstMode::Fixed => write!(f, "fixed"),
      BurstMode::Incr => write!(f, "incr"),
    }
  }
}

/// One of the four contiguous peripheral windows, 0-based internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region(u8);

impl Region {
  pub fn from_addr(addr: u8) -> Self {
    Region((addr & ADDR_MASK) / REGION_SIZE)
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }

  /// 1-based region number, the way the select lines are named.
  pub fn number(self) -> u8 {
    self.0 + 1
  }

  pub fn base(self) -> u8 {
    self.0 * REGION_SIZE
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "region{}", self.number())
  }
}

/// Everything the controller samples on a clock edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeInputs {
  pub reset: bool,

  // read address channel
  pub arvalid: bool,
  pub araddr: u8,
  pub arlen: u8,
  pub arburst: u8,

  // write address channel
  pub awvalid: bool,
  pub awaddr: u8,
  pub awlen: u8,
  pub awburst: u8,

  // write data channel
  pub wdata: u32,
  pub wlast: bool,
  pub wvalid: bool,

  // consumer ready for read data and the write response
  pub rready: bool,
  pub bready: bool,

  // peer side
  pub pready: bool,
  pub prdata: u32,
}

/// Everything the controller drives for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeOutputs {
  pub arready: bool,
  pub awready: bool,
  pub wready: bool,

  pub rdata: u32,
  pub rresp: u8,
  pub rvalid: bool,
  pub rlast: bool,

  pub bvalid: bool,
  pub bresp: u8,

  /// Region-local offset.
  pub paddr: u8,
  pub psel: [bool; NUM_REGIONS],
  pub pwrite: bool,
  pub penable: bool,
  pub pwdata: u32,
}

impl BridgeOutputs {
  pub fn selected_region(&self) -> Option<Region> {
    self.psel.iter().position(|&sel| sel).map(|idx| Region(idx as u8))
  }

  pub fn selected_count(&self) -> usize {
    self.psel.iter().filter(|&&sel| sel).count()
  }

  /// True when any peer-facing control line is high.
  pub fn peer_active(&self) -> bool {
    self.selected_count() > 0 || self.penable || self.pwrite
  }

  /// Whether the bridge samples `pready` this cycle: a read's setup beat
  /// (select without enable) or a write's access beat (select with enable).
  pub fn samples_pready(&self) -> bool {
    self.selected_count() > 0 && self.penable == self.pwrite
  }

  /// A peer access completes in this cycle when the bridge samples `pready`
  /// and finds it high.
  pub fn peer_access(&self, pready: bool) -> bool {
    self.samples_pready() && pready
  }
}
