//! Testbed configuration loading and parsing

use anyhow::{bail, Context, Result};
use interface_report::{CaptureSource, DeviceSpec, Platform};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Report file name used when neither the testbed nor the command line names one
pub const DEFAULT_OUTPUT: &str = "interfaces.csv";

/// Testbed description (loaded from testbed.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestbedConfig {
    /// Directory holding `<device>.json` captures
    #[serde(default = "default_capture_dir")]
    pub capture_dir: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    pub name: String,
    #[serde(default = "default_os")]
    pub os: String,
    pub capture: Option<PathBuf>,
}

fn default_capture_dir() -> PathBuf {
    PathBuf::from("captures")
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_os() -> String {
    "iosxe".to_string()
}

impl TestbedConfig {
    /// Devices in testbed order
    pub fn device_specs(&self) -> Vec<DeviceSpec> {
        self.devices
            .iter()
            .map(|device| {
                let spec =
                    DeviceSpec::new(&device.name).with_platform(Platform::from_os(&device.os));
                match &device.capture {
                    Some(capture) => spec.with_capture(capture),
                    None => spec,
                }
            })
            .collect()
    }

    pub fn capture_source(&self) -> CaptureSource {
        CaptureSource::new(&self.capture_dir)
    }

    /// Make relative paths relative to `base` (the testbed file's directory)
    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.capture_dir);
        resolve(&mut self.output.path);
        for device in &mut self.devices {
            if let Some(capture) = device.capture.as_mut() {
                resolve(capture);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.name.trim().is_empty() {
                bail!("Device with an empty name in testbed");
            }
            if !seen.insert(device.name.as_str()) {
                bail!("Device '{}' is listed more than once in testbed", device.name);
            }
        }
        Ok(())
    }
}

/// Load a testbed from a TOML file
pub fn load_config(path: &Path) -> Result<TestbedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read testbed file: {:?}", path))?;

    let mut config: TestbedConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse testbed file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid testbed file: {:?}", path))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.resolve_paths(base);

    Ok(config)
}
