/// Output decoder: every outward signal as a pure function of registered state
use super::descriptor::TransferDescriptor;
use super::phase::{Phase, RequestKind};
use super::signals::{BridgeOutputs, NUM_REGIONS, RESP_OKAY};

/// The registered values the decoder reads.
#[derive(Debug, Clone, Copy)]
pub struct DecodeView {
  pub phase: Phase,
  pub descriptor: TransferDescriptor,
  pub kind: RequestKind,
  pub final_beat: bool,
  pub rdata: u32,
  pub pwdata: u32,
}

pub fn decode(view: &DecodeView) -> BridgeOutputs {
  let phase = view.phase;
  let peer = phase.drives_peer();

  let mut psel = [false; NUM_REGIONS];
  if peer {
    psel[view.descriptor.region().index()] = true;
  }

  BridgeOutputs {
    arready: phase == Phase::ReadSetupMaster,
    awready: phase == Phase::WriteSetupMaster,
    wready: phase == Phase::WriteAccessMaster && view.descriptor.burst_remaining > 0,

    rdata: view.rdata,
    rresp: RESP_OKAY,
    rvalid: phase == Phase::ReadAccessMaster,
    rlast: phase == Phase::ReadAccessMaster && view.final_beat,

    bvalid: phase == Phase::WriteTerminate,
    bresp: RESP_OKAY,

    paddr: if peer { view.descriptor.offset } else { 0 },
    psel,
    pwrite: peer && view.kind == RequestKind::WritePending,
    penable: phase.peer_enable(),
    pwdata: view.pwdata,
  }
}
