//! Interface detail sources
//!
//! Connecting to devices and parsing their CLI output is the job of an external
//! network automation layer. This module defines the seam the report consumes
//! ([`InterfaceSource`]) and a file-backed implementation that reads parser
//! output previously captured as JSON, one file per device.

use crate::details::{DeviceInterfaceDetails, InterfaceMap};
use crate::platform::Platform;
use crate::types::{ReportError, Result};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A device to collect interface details from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    pub name: String,
    pub platform: Platform,
    /// Explicit capture file, overriding the source's default location
    pub capture: Option<PathBuf>,
}

impl DeviceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: Platform::default(),
            capture: None,
        }
    }

    /// Builder method: set the device platform
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Builder method: set an explicit capture file
    pub fn with_capture(mut self, capture: impl Into<PathBuf>) -> Self {
        self.capture = Some(capture.into());
        self
    }
}

/// Provides parsed `show interfaces` output for a device
///
/// Implementations are expected to return the IOS interface schema: interface
/// name mapped to an attribute object that may hold `mac_address`.
pub trait InterfaceSource {
    fn show_interfaces(&self, device: &DeviceSpec) -> Result<InterfaceMap>;
}

/// Already collected details can serve as a source themselves
impl InterfaceSource for DeviceInterfaceDetails {
    fn show_interfaces(&self, device: &DeviceSpec) -> Result<InterfaceMap> {
        self.get(&device.name)
            .cloned()
            .ok_or_else(|| ReportError::DeviceNotFound(device.name.clone()))
    }
}

/// Reads captured parser output from JSON files
///
/// A device's capture is its explicit `capture` path, or `<capture_dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct CaptureSource {
    capture_dir: PathBuf,
}

impl CaptureSource {
    pub fn new(capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            capture_dir: capture_dir.into(),
        }
    }

    pub fn capture_dir(&self) -> &Path {
        &self.capture_dir
    }

    /// Where the capture for `device` is expected
    pub fn capture_path(&self, device: &DeviceSpec) -> PathBuf {
        match &device.capture {
            Some(path) => path.clone(),
            None => self.capture_dir.join(format!("{}.json", device.name)),
        }
    }
}

impl InterfaceSource for CaptureSource {
    fn show_interfaces(&self, device: &DeviceSpec) -> Result<InterfaceMap> {
        let path = self.capture_path(device);
        log::debug!(
            "Reading '{}' output for {} from {:?}",
            device.platform.show_interfaces_command(),
            device.name,
            path
        );

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ReportError::CaptureNotFound {
                    device: device.name.clone(),
                    path,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let value: Value = serde_json::from_str(&content)?;
        InterfaceMap::from_value(&device.name, value)
    }
}

/// Collect interface details for every device, in the given order
///
/// The first device that fails aborts collection; a report is never built from
/// a partial testbed.
pub fn collect_details<'a, S, I>(devices: I, source: &S) -> Result<DeviceInterfaceDetails>
where
    S: InterfaceSource + ?Sized,
    I: IntoIterator<Item = &'a DeviceSpec>,
{
    let mut details = DeviceInterfaceDetails::new();

    for device in devices {
        if !device.platform.uses_ios_interface_schema() {
            log::warn!(
                "Device {} runs {}; its '{}' output may not match the IOS interface schema",
                device.name,
                device.platform,
                device.platform.show_interfaces_command()
            );
        }

        let interfaces = source.show_interfaces(device)?;
        log::info!("Collected {} interfaces from {}", interfaces.len(), device.name);
        details.insert(device.name.clone(), interfaces);
    }

    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::InterfaceAttributes;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_capture_path_resolution() {
        let source = CaptureSource::new("captures");

        let default = DeviceSpec::new("iosv-1");
        assert_eq!(source.capture_path(&default), PathBuf::from("captures/iosv-1.json"));

        let explicit = DeviceSpec::new("iosv-2").with_capture("/tmp/iosv-2-show-int.json");
        assert_eq!(
            source.capture_path(&explicit),
            PathBuf::from("/tmp/iosv-2-show-int.json")
        );
    }

    #[test]
    fn test_reads_capture_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("iosv-1.json"),
            r#"{"GigabitEthernet0/0": {"mac_address": "5254.0011.2233"}, "Loopback0": {}}"#,
        )
        .unwrap();

        let source = CaptureSource::new(dir.path());
        let interfaces = source.show_interfaces(&DeviceSpec::new("iosv-1")).unwrap();

        assert_eq!(interfaces.len(), 2);
        assert_eq!(
            interfaces.get("GigabitEthernet0/0").unwrap().mac_address(),
            Some("5254.0011.2233")
        );
    }

    #[test]
    fn test_reads_explicit_capture() {
        let mut capture = NamedTempFile::new().unwrap();
        capture
            .write_all(br#"{"Ethernet1/1": {"mac_address": "0050.56ff.0001"}}"#)
            .unwrap();
        capture.flush().unwrap();

        let device = DeviceSpec::new("nx-1")
            .with_platform(Platform::Nxos)
            .with_capture(capture.path());
        let interfaces = CaptureSource::new("unused").show_interfaces(&device).unwrap();
        assert_eq!(interfaces.len(), 1);
    }

    #[test]
    fn test_missing_capture() {
        let dir = TempDir::new().unwrap();
        let err = CaptureSource::new(dir.path())
            .show_interfaces(&DeviceSpec::new("iosv-9"))
            .unwrap_err();

        match err {
            ReportError::CaptureNotFound { device, path } => {
                assert_eq!(device, "iosv-9");
                assert_eq!(path, dir.path().join("iosv-9.json"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_capture_names_device() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("iosv-1.json"), r#"{"Loopback0": "up"}"#).unwrap();

        let err = CaptureSource::new(dir.path())
            .show_interfaces(&DeviceSpec::new("iosv-1"))
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedInput { ref path, .. } if path == "iosv-1.Loopback0"
        ));
    }

    #[test]
    fn test_collect_details_in_device_order() {
        let available = DeviceInterfaceDetails::new()
            .with_device(
                "iosv-1",
                InterfaceMap::new().with_interface("Gi0/0", InterfaceAttributes::new()),
            )
            .with_device(
                "iosv-2",
                InterfaceMap::new()
                    .with_interface("Gi0/0", InterfaceAttributes::new())
                    .with_interface("Gi0/1", InterfaceAttributes::new()),
            );

        let devices = vec![DeviceSpec::new("iosv-2"), DeviceSpec::new("iosv-1")];
        let details = collect_details(&devices, &available).unwrap();

        let names: Vec<&str> = details.iter().map(|(d, _)| d).collect();
        assert_eq!(names, vec!["iosv-2", "iosv-1"]);
        assert_eq!(details.interface_count(), 3);
    }

    #[test]
    fn test_collect_details_aborts_on_failure() {
        let available = DeviceInterfaceDetails::new().with_device("iosv-1", InterfaceMap::new());
        let devices = vec![DeviceSpec::new("iosv-1"), DeviceSpec::new("iosv-2")];

        let err = collect_details(&devices, &available).unwrap_err();
        assert!(matches!(err, ReportError::DeviceNotFound(ref d) if d == "iosv-2"));
    }
}
