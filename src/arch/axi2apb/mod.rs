pub mod bridge_model;
pub mod main;
pub mod monitor;

pub use main::create_simulation;
