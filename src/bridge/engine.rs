/// Transition and datapath engine: one call per clock edge.
use log::debug;

use super::buffer::BeatBuffer;
use super::descriptor::TransferDescriptor;
use super::phase::{Phase, RequestKind};
use super::signals::{BridgeInputs, BurstMode, Region};

/// Registered state the engine mutates besides the phase.
#[derive(Debug, Clone, Default)]
pub struct Datapath {
  pub descriptor: TransferDescriptor,
  pub buffer: BeatBuffer,
  pub kind: RequestKind,
  /// Last word streamed out on the burst side.
  pub rdata: u32,
  /// Last word sent to the peer.
  pub pwdata: u32,
}

/// A data word crossing one of the two buses during the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatEvent {
  PeerRead { region: Region, offset: u8, word: u32 },
  PeerWrite { region: Region, offset: u8, word: u32 },
  BurstRead { word: u32, last: bool },
  BurstWrite { word: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonCause {
  /// Address request dropped before it was latched.
  Withdrawn,
  /// Peer not ready while draining a write.
  PeerNotReady,
}

/// Why a transaction left the machine on this edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
  Completed,
  Abandoned(AbandonCause),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
  pub next: Phase,
  pub event: Option<BeatEvent>,
  pub exit: Option<Exit>,
}

impl Step {
  fn to(next: Phase) -> Self {
    Self { next, event: None, exit: None }
  }

  fn abandon(cause: AbandonCause) -> Self {
    Self {
      next: Phase::Idle,
      event: None,
      exit: Some(Exit::Abandoned(cause)),
    }
  }

  fn completed(mut self) -> Self {
    self.exit = Some(Exit::Completed);
    self
  }

  fn with_event(mut self, event: BeatEvent) -> Self {
    self.event = Some(event);
    self
  }
}

/// Compute the next phase and apply this edge's datapath updates.
pub fn advance(phase: Phase, dp: &mut Datapath, inputs: &BridgeInputs) -> Step {
  match phase {
    Phase::Idle => {
      dp.buffer.reset_cursor();
      dp.descriptor.final_beat = false;
      dp.kind = RequestKind::None;
      if inputs.arvalid {
        dp.kind = RequestKind::ReadPending;
        Step::to(Phase::ReadSetupMaster)
      } else if inputs.awvalid {
        Step::to(Phase::WriteSetupMaster)
      } else {
        Step::to(Phase::Idle)
      }
    },

    // ---------------- read path ----------------
    Phase::ReadSetupMaster => {
      if inputs.arvalid {
        dp.descriptor =
          TransferDescriptor::latch_read(inputs.araddr, inputs.arlen, BurstMode::from_bits(inputs.arburst));
        debug!(
          "latch read: addr={} len={} burst={}",
          dp.descriptor.start_addr, inputs.arlen, dp.descriptor.burst
        );
        Step::to(Phase::ReadSetupSlave)
      } else {
        Step::abandon(AbandonCause::Withdrawn)
      }
    },
    Phase::ReadSetupSlave => {
      if inputs.pready {
        dp.buffer.capture(inputs.prdata);
        Step::to(Phase::ReadAccessSlave).with_event(BeatEvent::PeerRead {
          region: dp.descriptor.region(),
          offset: dp.descriptor.offset,
          word: inputs.prdata,
        })
      } else {
        Step::to(Phase::ReadSetupSlave)
      }
    },
    Phase::ReadAccessSlave => {
      if dp.descriptor.peer_remaining > 0 {
        dp.descriptor.step_offset();
        dp.descriptor.peer_remaining -= 1;
        dp.buffer.advance();
        Step::to(Phase::ReadSetupSlave)
      } else {
        Step::to(Phase::ReadPreAccessMaster)
      }
    },
    Phase::ReadPreAccessMaster => {
      if inputs.rready {
        Step::to(Phase::ReadAccessMaster)
      } else {
        Step::to(Phase::ReadPreAccessMaster)
      }
    },
    Phase::ReadAccessMaster => {
      if dp.descriptor.burst_remaining == 0 {
        return Step::to(Phase::Idle).completed();
      }
      let word = dp.buffer.replay();
      dp.rdata = word;
      dp.buffer.retreat();
      dp.descriptor.burst_remaining -= 1;
      let last = dp.descriptor.burst_remaining == 0;
      let event = BeatEvent::BurstRead { word, last };
      if last {
        // last beat goes straight back to Idle without another rready wait
        dp.descriptor.final_beat = true;
        Step::to(Phase::Idle).completed().with_event(event)
      } else {
        Step::to(Phase::ReadPreAccessMaster).with_event(event)
      }
    },

    // ---------------- write path ----------------
    Phase::WriteSetupMaster => {
      if inputs.awvalid {
        dp.descriptor =
          TransferDescriptor::latch_write(inputs.awaddr, inputs.awlen, BurstMode::from_bits(inputs.awburst));
        debug!(
          "latch write: addr={} len={} burst={}",
          dp.descriptor.start_addr, inputs.awlen, dp.descriptor.burst
        );
        Step::to(Phase::WritePreAccessMaster)
      } else {
        Step::abandon(AbandonCause::Withdrawn)
      }
    },
    Phase::WritePreAccessMaster => {
      if inputs.wvalid {
        Step::to(Phase::WriteAccessMaster)
      } else {
        Step::to(Phase::WritePreAccessMaster)
      }
    },
    Phase::WriteAccessMaster => {
      if dp.descriptor.burst_remaining == 0 {
        return Step::to(Phase::WriteTerminate);
      }
      dp.buffer.capture(inputs.wdata);
      if dp.descriptor.burst == BurstMode::Incr {
        dp.buffer.advance();
      }
      dp.descriptor.burst_remaining -= 1;
      let event = BeatEvent::BurstWrite { word: inputs.wdata };
      if inputs.wlast {
        Step::to(Phase::WriteTerminate).with_event(event)
      } else {
        Step::to(Phase::WritePreAccessMaster).with_event(event)
      }
    },
    Phase::WriteTerminate => {
      if inputs.bready {
        dp.kind = RequestKind::WritePending;
        Step::to(Phase::WriteSetupSlave)
      } else {
        Step::to(Phase::WriteTerminate)
      }
    },
    Phase::WriteSetupSlave => Step::to(Phase::WriteAccessSlave),
    Phase::WriteAccessSlave => {
      if !inputs.pready {
        // unlike the read path this does not hold for the peer
        return Step::abandon(AbandonCause::PeerNotReady);
      }
      if dp.descriptor.peer_remaining == 0 {
        return Step::to(Phase::Idle).completed();
      }
      let region = dp.descriptor.region();
      let offset = dp.descriptor.offset;
      dp.buffer.retreat();
      let word = dp.buffer.replay();
      dp.pwdata = word;
      dp.descriptor.bump_offset();
      dp.descriptor.peer_remaining -= 1;
      let event = BeatEvent::PeerWrite { region, offset, word };
      if dp.descriptor.peer_remaining == 0 {
        Step::to(Phase::Idle).completed().with_event(event)
      } else {
        Step::to(Phase::WriteSetupSlave).with_event(event)
      }
    },
  }
}
