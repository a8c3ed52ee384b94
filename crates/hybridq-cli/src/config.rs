//! Configuration for the hybridq CLI.
//!
//! Precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (`HYBRIDQ_` prefix)
//! 3. Configuration file (YAML)
//! 4. Default values

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hybridq_adapter_sim::DEFAULT_MAX_QUBITS;
use hybridq_variational::OptimizerConfig;
use hybridq_walk::WalkConfig;

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridqConfig {
    /// Variational loop settings
    pub optimizer: OptimizerSection,

    /// Local simulator settings
    pub simulator: SimulatorSection,

    /// Quantum walk settings
    pub walk: WalkSection,
}

/// Variational loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSection {
    /// Maximum number of oracle evaluations per run
    pub max_iterations: usize,

    /// Convergence tolerance
    pub tolerance: f64,

    /// Per-call oracle timeout in seconds
    pub timeout_secs: u64,

    /// Concurrent random restarts
    pub restarts: usize,

    /// Seed for initial parameters
    pub seed: Option<u64>,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            timeout_secs: 30,
            restarts: 1,
            seed: None,
        }
    }
}

impl OptimizerSection {
    /// Loop settings for the variational crate.
    pub fn to_optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            timeout: Duration::from_secs(self.timeout_secs),
            ..OptimizerConfig::default()
        }
    }
}

/// Local simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    /// Widest register the simulator accepts
    pub max_qubits: usize,

    /// Shots for final sampling
    pub shots: u32,

    /// Seed for measurement sampling
    pub seed: Option<u64>,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            shots: 1024,
            seed: None,
        }
    }
}

/// Quantum walk settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkSection {
    /// Number of time steps
    pub num_steps: usize,

    /// Time between snapshots
    pub dt: f64,

    /// Shots for final sampling
    pub shots: u32,

    /// Final sampling timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WalkSection {
    fn default() -> Self {
        let defaults = WalkConfig::default();
        Self {
            num_steps: defaults.num_steps,
            dt: defaults.dt,
            shots: defaults.shots,
            timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

impl WalkSection {
    /// Run settings for the walk crate.
    pub fn to_walk_config(&self) -> WalkConfig {
        WalkConfig {
            num_steps: self.num_steps,
            dt: self.dt,
            shots: self.shots,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Overwrite `target` when `value` is present and parses.
fn set_parsed<T: std::str::FromStr>(target: &mut T, value: Option<String>) {
    if let Some(v) = value {
        match v.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring unparsable environment override"),
        }
    }
}

impl HybridqConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.as_ref().display())))?;

        let config: HybridqConfig =
            serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// File (or defaults), then environment overrides, then validation.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => HybridqConfig::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Apply `HYBRIDQ_*` environment variables.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        // Optimizer
        set_parsed(
            &mut self.optimizer.max_iterations,
            var("HYBRIDQ_MAX_ITERATIONS"),
        );
        set_parsed(&mut self.optimizer.tolerance, var("HYBRIDQ_TOLERANCE"));
        set_parsed(&mut self.optimizer.timeout_secs, var("HYBRIDQ_TIMEOUT_SECS"));
        set_parsed(&mut self.optimizer.restarts, var("HYBRIDQ_RESTARTS"));
        if let Some(Ok(seed)) = var("HYBRIDQ_SEED").map(|v| v.parse()) {
            self.optimizer.seed = Some(seed);
        }

        // Simulator
        set_parsed(&mut self.simulator.max_qubits, var("HYBRIDQ_MAX_QUBITS"));
        set_parsed(&mut self.simulator.shots, var("HYBRIDQ_SHOTS"));
        if let Some(Ok(seed)) = var("HYBRIDQ_SIM_SEED").map(|v| v.parse()) {
            self.simulator.seed = Some(seed);
        }

        // Walk
        set_parsed(&mut self.walk.num_steps, var("HYBRIDQ_WALK_STEPS"));
        set_parsed(&mut self.walk.dt, var("HYBRIDQ_WALK_DT"));
        set_parsed(&mut self.walk.shots, var("HYBRIDQ_WALK_SHOTS"));
        set_parsed(
            &mut self.walk.timeout_secs,
            var("HYBRIDQ_WALK_TIMEOUT_SECS"),
        );

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.optimizer.max_iterations == 0 {
            return Err(ConfigError::Validation(
                "optimizer.max_iterations must be greater than 0".to_string(),
            ));
        }
        if !(self.optimizer.tolerance.is_finite() && self.optimizer.tolerance > 0.0) {
            return Err(ConfigError::Validation(format!(
                "optimizer.tolerance must be positive, got {}",
                self.optimizer.tolerance
            )));
        }
        if self.optimizer.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "optimizer.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.optimizer.restarts == 0 {
            return Err(ConfigError::Validation(
                "optimizer.restarts must be greater than 0".to_string(),
            ));
        }

        if self.simulator.max_qubits == 0 {
            return Err(ConfigError::Validation(
                "simulator.max_qubits must be greater than 0".to_string(),
            ));
        }
        if self.simulator.shots == 0 || self.walk.shots == 0 {
            return Err(ConfigError::Validation(
                "shots must be greater than 0".to_string(),
            ));
        }

        if !(self.walk.dt.is_finite() && self.walk.dt > 0.0) {
            return Err(ConfigError::Validation(format!(
                "walk.dt must be positive, got {}",
                self.walk.dt
            )));
        }
        if self.walk.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "walk.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
