use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::geodesic::{self, SolverParams};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "lightpath.yaml";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(version, about = "Trace light rays around a compact mass in the terminal")]
pub struct Cli {
    /// YAML configuration file (defaults to ./lightpath.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// On-screen diameter of the central body, in pixels
    #[arg(short, long)]
    pub body_diameter: Option<f64>,
    /// Start with gravity disabled (straight rays)
    #[arg(long)]
    pub no_gravity: bool,
    /// Pick distance around ray markers, in pixels
    #[arg(long)]
    pub hit_radius: Option<f64>,
    /// Show the debug overlay
    #[arg(short, long)]
    pub debug: bool,
    /// Write log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub body_diameter: f64,
    pub gravity: bool,
    pub step_fraction: f64,
    pub capture_factor: f64,
    pub escape_factor: f64,
    pub escape_margin: f64,
    pub max_steps: usize,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub hit_radius: f64,
    pub target_fps: u64,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            body_diameter: 24.0,
            gravity: true,
            step_fraction: geodesic::STEP_FRACTION,
            capture_factor: geodesic::CAPTURE_FACTOR,
            escape_factor: geodesic::ESCAPE_FACTOR,
            escape_margin: geodesic::ESCAPE_MARGIN,
            max_steps: geodesic::MAX_STEPS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hit_radius: 2.5,
            target_fps: 30,
            debug: false,
        }
    }
}

impl DisplayConfig {
    /// Redraw interval for `target_fps`, at least one millisecond
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis((1000 / self.target_fps.max(1)).max(1))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value: value.to_string(),
        })
    }
}

impl Config {
    /// Rejects values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("body_diameter", self.physics.body_diameter)?;
        positive("hit_radius", self.display.hit_radius)?;
        positive("step_fraction", self.physics.step_fraction)?;
        if self.physics.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "max_steps",
                value: "0".into(),
            });
        }
        if !(1..=1000).contains(&self.display.target_fps) {
            return Err(ConfigError::Invalid {
                field: "target_fps",
                value: self.display.target_fps.to_string(),
            });
        }
        Ok(())
    }

    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            step_fraction: self.physics.step_fraction,
            capture_factor: self.physics.capture_factor,
            escape_factor: self.physics.escape_factor,
            escape_margin: self.physics.escape_margin,
            max_steps: self.physics.max_steps,
        }
    }

    /// Command line values win over the file
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(d) = cli.body_diameter {
            self.physics.body_diameter = d;
        }
        if cli.no_gravity {
            self.physics.gravity = false;
        }
        if let Some(r) = cli.hit_radius {
            self.display.hit_radius = r;
        }
        if cli.debug {
            self.display.debug = true;
        }
    }

    /// Loads the file named on the command line (an error if it fails) or
    /// the default file, then applies and checks command line overrides.
    pub fn resolve(cli: &Cli) -> Result<Config, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => load_from(path)?,
            None => load(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Reads `lightpath.yaml` if present, falling back to defaults on any problem
pub fn load() -> Config {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if !path.exists() {
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
    }
}
