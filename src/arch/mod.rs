pub mod axi2apb;

pub use axi2apb::create_simulation;
