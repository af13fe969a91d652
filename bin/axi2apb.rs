use axi2apb::simulator::config::{load_and_merge_configs, CliOverrides};
use axi2apb::simulator::utils::log::init_log;
use axi2apb::simulator::Simulator;
use clap::Parser;
use std::path::PathBuf;

/// axi2apb - cycle model of a burst-to-peripheral bus bridge
#[derive(Parser, Debug)]
#[command(name = "axi2apb")]
#[command(version = "0.1.0")]
#[command(about = "Drive a transaction workload through the AXI to APB bridge model", long_about = None)]
struct Args {
  /// User config file layered over the defaults
  #[arg(short, long, value_name = "FILE")]
  config: Option<String>,

  /// Transaction workload (TOML)
  #[arg(short, long, value_name = "FILE")]
  workload: Option<String>,

  /// Enable step mode (interactive stepping)
  #[arg(short, long)]
  step: bool,

  /// Quiet mode (suppress log messages)
  #[arg(short, long)]
  quiet: bool,

  /// Output trace file path
  #[arg(long, value_name = "FILE")]
  trace_file: Option<String>,

  /// Peer wait states per access
  #[arg(long, value_name = "N")]
  wait_states: Option<u32>,

  /// Cycle limit per transaction
  #[arg(long, value_name = "N")]
  max_cycles: Option<u64>,
}

fn main() -> std::io::Result<()> {
  init_log();

  let args = Args::parse();

  let cli = CliOverrides {
    quiet: args.quiet,
    step: args.step,
    trace_file: args.trace_file,
    workload: args.workload,
    wait_states: args.wait_states,
    max_cycles: args.max_cycles,
  };

  let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let app_config = load_and_merge_configs(args.config.as_deref(), &root, &cli)?;

  let mut simulator = Simulator::from_app_config(&app_config)?;
  simulator.run()?;
  simulator.print_summary();

  Ok(())
}
