//! Service configuration loaded from a TOML file.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::heat::{axis_len, MAX_AXIS_POINTS};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub region: RegionConfig,
    pub heat: HeatConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RegionConfig {
    /// File path or http(s) URL of the region GeoJSON. Without one, lookups
    /// use the bounding box.
    pub asset: Option<String>,
}

/// Forecast grid sampled for the heatmap overlay
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HeatConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub lat_start: f64,
    pub lat_end: f64,
    pub lon_start: f64,
    pub lon_end: f64,
    pub step: f64,
    /// Maximum forecast requests in flight
    pub concurrency: usize,
    pub timeout_secs: u64,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
            lat_start: 47.5,
            lat_end: 54.5,
            lon_start: 6.0,
            lon_end: 14.5,
            step: 1.0,
            concurrency: 8,
            timeout_secs: 30,
        }
    }
}

impl HeatConfig {
    /// Reject grids that are empty or too large to sample
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.step.is_finite() && self.step > 0.0,
            "heat.step must be a positive number, got {}",
            self.step
        );
        for (name, start, end) in [
            ("lat", self.lat_start, self.lat_end),
            ("lon", self.lon_start, self.lon_end),
        ] {
            ensure!(
                axis_len(start, end, self.step).is_some(),
                "heat.{0}_start..heat.{0}_end ({1}..{2}) with step {3} must give 1..{4} points",
                name,
                start,
                end,
                self.step,
                MAX_AXIS_POINTS
            );
        }
        Ok(())
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config.heat.validate()?;
        Ok(config)
    }
}
