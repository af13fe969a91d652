// AXI-to-APB bridge controller: state register, datapath engine, beat buffer, output decoder

pub mod buffer;
pub mod decode;
pub mod descriptor;
pub mod engine;
pub mod phase;
pub mod signals;

use log::{debug, trace};

pub use buffer::{BeatBuffer, BEAT_BUFFER_DEPTH};
pub use decode::DecodeView;
pub use descriptor::TransferDescriptor;
pub use engine::{AbandonCause, BeatEvent, Exit};
pub use phase::{Phase, RequestKind};
pub use signals::{BridgeInputs, BridgeOutputs, BurstMode, Region};

use engine::Datapath;

/// Running counters over the lifetime of one controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
  pub cycles: u64,
  pub reads: u64,
  pub writes: u64,
  pub abandoned: u64,
  pub peer_beats: u64,
  pub burst_beats: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Axi2Apb {
  phase: Phase,
  datapath: Datapath,
  last_event: Option<BeatEvent>,
  last_exit: Option<Exit>,
  stats: BridgeStats,
}

impl Axi2Apb {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn descriptor(&self) -> &TransferDescriptor {
    &self.datapath.descriptor
  }

  pub fn request_kind(&self) -> RequestKind {
    self.datapath.kind
  }

  pub fn buffer(&self) -> &BeatBuffer {
    &self.datapath.buffer
  }

  pub fn stats(&self) -> BridgeStats {
    self.stats
  }

  /// Data word crossing a bus on the most recent edge, if any.
  pub fn last_event(&self) -> Option<BeatEvent> {
    self.last_event
  }

  /// Set on the edge that returned a transaction to Idle.
  pub fn last_exit(&self) -> Option<Exit> {
    self.last_exit
  }

  /// Force the machine back to Idle. The buffer contents survive, like a
  /// memory array would.
  pub fn reset(&mut self) {
    self.phase = Phase::Idle;
    self.datapath.descriptor = TransferDescriptor::default();
    self.datapath.kind = RequestKind::None;
    self.datapath.buffer.reset_cursor();
    self.last_event = None;
    self.last_exit = None;
  }

  /// Registered view of the outputs, what the peers see before the next edge.
  pub fn outputs(&self) -> BridgeOutputs {
    decode::decode(&self.view())
  }

  fn view(&self) -> DecodeView {
    DecodeView {
      phase: self.phase,
      descriptor: self.datapath.descriptor,
      kind: self.datapath.kind,
      final_beat: self.datapath.descriptor.final_beat,
      rdata: self.datapath.rdata,
      pwdata: self.datapath.pwdata,
    }
  }

  /// Run one clock edge.
  ///
  /// The returned bundle describes the cycle that just ended: handshake and
  /// address lines are decoded from the phase the cycle started in, while the
  /// data words and the final-beat flag carry what the datapath produced on
  /// this edge.
  pub fn tick(&mut self, inputs: &BridgeInputs) -> BridgeOutputs {
    self.stats.cycles += 1;
    if inputs.reset {
      self.reset();
      return self.outputs();
    }

    let before = self.view();
    let step = engine::advance(self.phase, &mut self.datapath, inputs);

    if step.next != self.phase {
      trace!("phase {} -> {}", self.phase, step.next);
    }
    if let Some(event) = step.event {
      debug!("beat {:?}", event);
      match event {
        BeatEvent::PeerRead { .. } | BeatEvent::PeerWrite { .. } => self.stats.peer_beats += 1,
        BeatEvent::BurstRead { .. } | BeatEvent::BurstWrite { .. } => self.stats.burst_beats += 1,
      }
    }
    match step.exit {
      Some(Exit::Completed) if self.phase.is_read() => self.stats.reads += 1,
      Some(Exit::Completed) => self.stats.writes += 1,
      Some(Exit::Abandoned(cause)) => {
        debug!("transaction abandoned in {}: {:?}", self.phase, cause);
        self.stats.abandoned += 1;
      },
      None => {},
    }

    self.phase = step.next;
    self.last_event = step.event;
    self.last_exit = step.exit;

    decode::decode(&DecodeView {
      final_beat: self.datapath.descriptor.final_beat,
      rdata: self.datapath.rdata,
      pwdata: self.datapath.pwdata,
      ..before
    })
  }
}
