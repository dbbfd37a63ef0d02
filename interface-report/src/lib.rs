//! Interface MAC Report Library
//!
//! Builds a CSV report of the MAC address of every interface on a set of network
//! devices, from parsed `show interfaces` output.
//!
//! # Architecture
//!
//! - Parsed output is validated into typed, order-preserving details
//! - Details are collected per device through the [`InterfaceSource`] seam
//! - The report generator emits one row per (device, interface) pair, writing
//!   `N/A` for interfaces without a MAC address (loopbacks, tunnels)
//!
//! The library does NOT connect to devices or parse CLI output; that belongs to
//! the network automation layer whose JSON output it consumes.
//!
//! # Example Usage
//!
//! ```no_run
//! use interface_report::{collect_details, generate, write_report, CaptureSource, DeviceSpec};
//! use std::path::Path;
//!
//! let devices = vec![DeviceSpec::new("iosv-1"), DeviceSpec::new("iosv-2")];
//! let details = collect_details(&devices, &CaptureSource::new("captures")).unwrap();
//!
//! let csv = generate(&details).unwrap();
//! write_report(Path::new("interfaces.csv"), &csv).unwrap();
//! ```

// Public modules
pub mod details;
pub mod platform;
pub mod report;
pub mod source;
pub mod types;

// Re-export main types for convenience
pub use details::{DeviceInterfaceDetails, InterfaceAttributes, InterfaceMap};
pub use platform::Platform;
pub use report::{
    generate, generate_single, parse_report, report_rows, rows_for_details, write_report,
    Report, ReportLayout, ReportRow,
};
pub use source::{collect_details, CaptureSource, DeviceSpec, InterfaceSource};
pub use types::{ReportError, Result, MAC_ADDRESS_FIELD, NOT_AVAILABLE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
