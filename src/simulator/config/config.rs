use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::testbench::{BenchSettings, ConsumerReady};

/// Prefix of the environment layer, e.g. `AXI2APB_BRIDGE__PEER_WAIT_STATES=2`.
pub const ENV_PREFIX: &str = "AXI2APB";

/// Harness parameters around the bridge
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeSection {
  #[serde(default)]
  pub peer_wait_states: u32,
  #[serde(default)]
  pub write_peer_stall: bool,
  #[serde(default = "default_max_cycles")]
  pub max_cycles: u64,
  #[serde(default)]
  pub consumer_ready: ConsumerReady,
}

fn default_max_cycles() -> u64 {
  256
}

impl Default for BridgeSection {
  fn default() -> Self {
    Self {
      peer_wait_states: 0,
      write_peer_stall: false,
      max_cycles: default_max_cycles(),
      consumer_ready: ConsumerReady::default(),
    }
  }
}

impl BridgeSection {
  pub fn bench_settings(&self) -> BenchSettings {
    BenchSettings {
      peer_wait_states: self.peer_wait_states,
      write_peer_stall: self.write_peer_stall,
      max_cycles: self.max_cycles,
      consumer_ready: self.consumer_ready,
    }
  }
}

/// Simulation driver section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSection {
  #[serde(default)]
  pub quiet: bool,
  #[serde(default)]
  pub step_mode: bool,
  #[serde(default)]
  pub trace_file: String,
  #[serde(default = "default_workload")]
  pub workload: String,
}

fn default_workload() -> String {
  "workloads/demo.toml".to_string()
}

impl Default for SimulationSection {
  fn default() -> Self {
    Self {
      quiet: false,
      step_mode: false,
      trace_file: String::new(),
      workload: default_workload(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
  #[serde(default)]
  pub bridge: BridgeSection,
  #[serde(default)]
  pub simulation: SimulationSection,
}

/// Values given on the command line; `None`/`false` leaves the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
  pub quiet: bool,
  pub step: bool,
  pub trace_file: Option<String>,
  pub workload: Option<String>,
  pub wait_states: Option<u32>,
  pub max_cycles: Option<u64>,
}

pub fn default_config_path() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("src")
    .join("simulator")
    .join("config")
    .join("default.toml")
}

/// Load one TOML file on its own
pub fn load_config_file(path: &Path) -> io::Result<AppConfig> {
  let content = fs::read_to_string(path)
    .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("cannot read config file {:?}: {}", path, e)))?;

  toml::from_str::<AppConfig>(&content)
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("parse TOML config failed: {}", e)))
}

/// Layer the default file, an optional user file and the environment
pub fn load_layered(default_path: &Path, custom_path: Option<&Path>) -> io::Result<AppConfig> {
  let mut builder = Config::builder().add_source(File::from(default_path).required(true));
  if let Some(path) = custom_path {
    builder = builder.add_source(File::from(path).required(true));
  }
  builder = builder.add_source(
    Environment::with_prefix(ENV_PREFIX)
      .prefix_separator("_")
      .separator("__")
      .try_parsing(true),
  );

  builder
    .build()
    .and_then(|cfg| cfg.try_deserialize::<AppConfig>())
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("load config failed: {}", e)))
}

pub fn apply_cli_overrides(config: &mut AppConfig, cli: &CliOverrides) {
  if cli.quiet {
    config.simulation.quiet = true;
  }
  if cli.step {
    config.simulation.step_mode = true;
  }
  if let Some(file) = &cli.trace_file {
    config.simulation.trace_file = file.clone();
  }
  if let Some(workload) = &cli.workload {
    config.simulation.workload = workload.clone();
  }
  if let Some(wait_states) = cli.wait_states {
    config.bridge.peer_wait_states = wait_states;
  }
  if let Some(max_cycles) = cli.max_cycles {
    config.bridge.max_cycles = max_cycles;
  }
}

pub fn validate_config(config: &AppConfig) -> io::Result<()> {
  if config.bridge.max_cycles == 0 {
    return Err(io::Error::new(
      io::ErrorKind::InvalidData,
      "max_cycles must be greater than 0",
    ));
  }

  if config.simulation.workload.trim().is_empty() {
    return Err(io::Error::new(
      io::ErrorKind::InvalidData,
      "workload cannot be empty, please specify it through the configuration file or CLI parameters",
    ));
  }

  Ok(())
}

/// Resolve relative paths against the crate root
pub fn resolve_paths(config: &mut AppConfig, root: &Path) {
  config.simulation.workload = resolve_single_path(&config.simulation.workload, root);
  config.simulation.trace_file = resolve_single_path(&config.simulation.trace_file, root);
}

fn resolve_single_path(path_str: &str, root: &Path) -> String {
  if path_str.is_empty() {
    return path_str.to_string();
  }

  let path = Path::new(path_str);
  if path.is_absolute() {
    return path_str.to_string();
  }

  root.join(path).to_string_lossy().to_string()
}

/// Load and merge configs
///
/// 1. default.toml
/// 2. user config file, if given
/// 3. `AXI2APB_*` environment variables
/// 4. CLI overrides
/// 5. relative path resolution
/// 6. validation
pub fn load_and_merge_configs(
  custom_config_path: Option<&str>,
  root: &Path,
  cli: &CliOverrides,
) -> io::Result<AppConfig> {
  let custom_path = custom_config_path.map(|custom| {
    let custom = PathBuf::from(custom);
    if custom.is_absolute() {
      custom
    } else {
      root.join(custom)
    }
  });

  let mut config = load_layered(&default_config_path(), custom_path.as_deref())?;
  apply_cli_overrides(&mut config, cli);
  resolve_paths(&mut config, root);
  validate_config(&config)?;

  Ok(config)
}
