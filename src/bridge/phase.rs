use std::fmt;

/// Controller phase. Exactly one is current on any cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
  #[default]
  Idle,
  ReadSetupMaster,
  ReadSetupSlave,
  ReadAccessSlave,
  ReadPreAccessMaster,
  ReadAccessMaster,
  WriteSetupMaster,
  WritePreAccessMaster,
  WriteAccessMaster,
  WriteTerminate,
  WriteSetupSlave,
  WriteAccessSlave,
}

impl Phase {
  pub const ALL: [Phase; 12] = [
    Phase::Idle,
    Phase::ReadSetupMaster,
    Phase::ReadSetupSlave,
    Phase::ReadAccessSlave,
    Phase::ReadPreAccessMaster,
    Phase::ReadAccessMaster,
    Phase::WriteSetupMaster,
    Phase::WritePreAccessMaster,
    Phase::WriteAccessMaster,
    Phase::WriteTerminate,
    Phase::WriteSetupSlave,
    Phase::WriteAccessSlave,
  ];

  pub fn is_read(self) -> bool {
    matches!(
      self,
      Phase::ReadSetupMaster
        | Phase::ReadSetupSlave
        | Phase::ReadAccessSlave
        | Phase::ReadPreAccessMaster
        | Phase::ReadAccessMaster
    )
  }

  pub fn is_write(self) -> bool {
    !self.is_read() && self != Phase::Idle
  }

  /// Phases in which the peer bus carries a live access.
  pub fn drives_peer(self) -> bool {
    matches!(
      self,
      Phase::ReadSetupSlave | Phase::ReadAccessSlave | Phase::WriteSetupSlave | Phase::WriteAccessSlave
    )
  }

  /// Access phases of the peer bus: select plus enable.
  pub fn peer_enable(self) -> bool {
    matches!(self, Phase::ReadAccessSlave | Phase::WriteAccessSlave)
  }

  /// Phases whose transition depends on `pready`. Reads capture `prdata` on
  /// the setup beat, writes complete on the access beat.
  pub fn samples_pready(self) -> bool {
    matches!(self, Phase::ReadSetupSlave | Phase::WriteAccessSlave)
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

/// Pending request tag carried alongside the phase (2 bits in hardware).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestKind {
  #[default]
  None,
  ReadPending,
  WritePending,
}
