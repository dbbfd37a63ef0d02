//! Device operating system handling
//!
//! The report assumes IOS-style parsed `show interfaces` output, where each
//! interface is keyed by name and carries a `mac_address` attribute. Other
//! platforms use a different command and may shape their output differently.

use std::fmt;

/// Operating system of a testbed device
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    #[default]
    IosXe,
    IosXr,
    Nxos,
    Other(String),
}

impl Platform {
    /// Parse a testbed `os` value, case-insensitively
    pub fn from_os(os: &str) -> Self {
        match os.trim().to_lowercase().as_str() {
            "ios" => Platform::Ios,
            "iosxe" | "ios-xe" => Platform::IosXe,
            "iosxr" | "ios-xr" => Platform::IosXr,
            "nxos" | "nx-os" => Platform::Nxos,
            _ => Platform::Other(os.trim().to_string()),
        }
    }

    /// Command whose parsed output feeds the report
    pub fn show_interfaces_command(&self) -> &'static str {
        match self {
            Platform::Nxos => "show interface",
            _ => "show interfaces",
        }
    }

    /// True when parsed output is known to match the IOS interface schema
    pub fn uses_ios_interface_schema(&self) -> bool {
        matches!(self, Platform::Ios | Platform::IosXe)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ios => write!(f, "ios"),
            Platform::IosXe => write!(f, "iosxe"),
            Platform::IosXr => write!(f, "iosxr"),
            Platform::Nxos => write!(f, "nxos"),
            Platform::Other(os) => write!(f, "{}", os),
        }
    }
}
