pub mod arch;
pub mod bridge;
pub mod simulator;
pub mod testbench;

pub use bridge::{Axi2Apb, BridgeInputs, BridgeOutputs};
pub use simulator::sim::mode::SimConfig;
pub use simulator::utils::log::init_log;
