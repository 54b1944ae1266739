//! Engine configuration, built in code or loaded from a TOML file.
//!
//! A configuration file holds a single `[engine]` table:
//!
//! ```toml
//! [engine]
//! opt-level = "speed-and-size"
//! consume-fuel = true
//! initial-fuel = 100000
//! debug-info = false
//! max-wasm-stack = "512Ki"
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use crate::Own;
use anyhow::{Context, Result};
use log::trace;
use serde::{
    Deserialize,
    de::{self, Deserializer},
};
use std::fs;
use std::path::Path;

// wrapped, so the file has a named section
#[derive(serde_derive::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    engine: Config,
}

/// How aggressively the code generator optimizes.
#[derive(serde_derive::Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OptLevel {
    None,
    #[default]
    Speed,
    SpeedAndSize,
}

impl OptLevel {
    fn to_wasmtime(self) -> wasmtime::OptLevel {
        match self {
            OptLevel::None => wasmtime::OptLevel::None,
            OptLevel::Speed => wasmtime::OptLevel::Speed,
            OptLevel::SpeedAndSize => wasmtime::OptLevel::SpeedAndSize,
        }
    }
}

/// Settings an [`Engine`](crate::Engine) is created from.
#[derive(serde_derive::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, rename = "opt-level")]
    opt_level: OptLevel,
    #[serde(default, rename = "consume-fuel")]
    consume_fuel: bool,
    #[serde(default, rename = "initial-fuel")]
    initial_fuel: u64,
    #[serde(default, rename = "debug-info")]
    debug_info: bool,
    #[serde(
        default,
        rename = "max-wasm-stack",
        deserialize_with = "deserialize_stack_size"
    )]
    max_wasm_stack: Option<usize>,
}

impl Config {
    /// The default configuration.
    pub fn make() -> Own<Config> {
        Own::new(Config::default())
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Config> {
        let file = toml::from_str::<ConfigFile>(text).context("failed to parse engine config")?;
        Ok(file.engine)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        trace!("Loading engine config, path: {}", path.display());
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let file = toml::from_str::<ConfigFile>(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(file.engine)
    }

    pub fn opt_level(&mut self, level: OptLevel) -> &mut Config {
        self.opt_level = level;
        self
    }

    /// Enables fuel metering. Execution traps once a store runs out of fuel.
    pub fn consume_fuel(&mut self, enable: bool) -> &mut Config {
        self.consume_fuel = enable;
        self
    }

    /// Fuel every new store starts with when fuel metering is enabled.
    pub fn initial_fuel(&mut self, fuel: u64) -> &mut Config {
        self.initial_fuel = fuel;
        self
    }

    pub fn debug_info(&mut self, enable: bool) -> &mut Config {
        self.debug_info = enable;
        self
    }

    /// Maximum stack space, in bytes, wasm code may consume.
    pub fn max_wasm_stack(&mut self, size: usize) -> &mut Config {
        self.max_wasm_stack = Some(size);
        self
    }

    pub(crate) fn fuel_budget(&self) -> Option<u64> {
        self.consume_fuel.then_some(self.initial_fuel)
    }

    pub(crate) fn to_wasmtime(&self) -> wasmtime::Config {
        let mut config = wasmtime::Config::new();
        // Relaxed SIMD depends on SIMD, so it has to go first.
        config
            .wasm_relaxed_simd(false)
            .wasm_simd(false)
            .cranelift_opt_level(self.opt_level.to_wasmtime())
            .consume_fuel(self.consume_fuel)
            .debug_info(self.debug_info);
        if let Some(size) = self.max_wasm_stack {
            config.max_wasm_stack(size);
        }
        config
    }
}

/// Accepts a byte count with an optional binary suffix, e.g. `"1Mi"`.
fn deserialize_stack_size<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let text = text.trim();
    let split_point = text.find(|c: char| !c.is_ascii_digit());
    let (num, unit) = split_point.map_or_else(|| (text, ""), |p| text.split_at(p));
    let size = num.parse::<usize>().ok().and_then(|num| match unit.trim() {
        "" => Some(num),
        "Ki" => num.checked_mul(1 << 10),
        "Mi" => num.checked_mul(1 << 20),
        "Gi" => num.checked_mul(1 << 30),
        _ => None,
    });
    match size {
        Some(size) => Ok(Some(size)),
        None => Err(de::Error::custom(format!(
            "invalid stack size `{text}`, expected a byte count such as \"512Ki\""
        ))),
    }
}
