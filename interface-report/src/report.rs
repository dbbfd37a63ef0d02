//! Report generation
//!
//! Turns collected interface details into a CSV document with one row per
//! (device, interface) pair. Interfaces without a MAC address are reported with
//! the `N/A` sentinel rather than being skipped.
//!
//! Two layouts share a single generator: the multi-device layout carries a
//! leading `Device` column, the single-device layout omits it.

use crate::details::{DeviceInterfaceDetails, InterfaceMap};
use crate::types::{ReportError, Result, NOT_AVAILABLE};
use csv::{StringRecord, Writer};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const DEVICE_COLUMN: &str = "Device";
const INTERFACE_COLUMN: &str = "Interface";
const MAC_ADDRESS_COLUMN: &str = "MAC Address";

/// Column layout of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLayout {
    /// `Device, Interface, MAC Address`
    MultiDevice,
    /// `Interface, MAC Address`
    SingleDevice,
}

impl ReportLayout {
    /// Header fields, in column order
    pub fn header(self) -> &'static [&'static str] {
        match self {
            ReportLayout::MultiDevice => &[DEVICE_COLUMN, INTERFACE_COLUMN, MAC_ADDRESS_COLUMN],
            ReportLayout::SingleDevice => &[INTERFACE_COLUMN, MAC_ADDRESS_COLUMN],
        }
    }

    fn from_header(header: &StringRecord) -> Option<Self> {
        [ReportLayout::MultiDevice, ReportLayout::SingleDevice]
            .into_iter()
            .find(|layout| header.iter().eq(layout.header().iter().copied()))
    }
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Absent in the single-device layout
    pub device: Option<String>,
    pub interface: String,
    /// The interface's MAC address verbatim, or `N/A`
    pub mac_address: String,
}

impl ReportRow {
    /// False when the row carries the `N/A` sentinel
    pub fn has_mac_address(&self) -> bool {
        self.mac_address != NOT_AVAILABLE
    }

    fn fields(&self) -> impl Iterator<Item = &str> {
        self.device
            .as_deref()
            .into_iter()
            .chain([self.interface.as_str(), self.mac_address.as_str()])
    }
}

/// Rows for one device's interfaces, in interface order
///
/// `device` fills the leading column; pass `None` for the single-device layout.
pub fn report_rows<'a>(
    device: Option<&'a str>,
    interfaces: &'a InterfaceMap,
) -> impl Iterator<Item = ReportRow> + 'a {
    interfaces.iter().map(move |(interface, attributes)| ReportRow {
        device: device.map(str::to_string),
        interface: interface.to_string(),
        mac_address: attributes.mac_address().unwrap_or(NOT_AVAILABLE).to_string(),
    })
}

/// Rows for every device, devices in collection order
pub fn rows_for_details(details: &DeviceInterfaceDetails) -> Vec<ReportRow> {
    details
        .iter()
        .flat_map(|(device, interfaces)| report_rows(Some(device), interfaces))
        .collect()
}

/// A generated report: layout plus its rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    layout: ReportLayout,
    rows: Vec<ReportRow>,
}

impl Report {
    /// Build the multi-device report
    pub fn for_devices(details: &DeviceInterfaceDetails) -> Self {
        Self {
            layout: ReportLayout::MultiDevice,
            rows: rows_for_details(details),
        }
    }

    /// Build the single-device report
    pub fn for_device(interfaces: &InterfaceMap) -> Self {
        Self {
            layout: ReportLayout::SingleDevice,
            rows: report_rows(None, interfaces).collect(),
        }
    }

    /// Read a previously written report back, detecting its layout from the header
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let header = reader.headers()?.clone();
        let layout = ReportLayout::from_header(&header).ok_or_else(|| {
            ReportError::MalformedReport(format!(
                "unrecognised header: {:?}",
                header.iter().collect::<Vec<_>>()
            ))
        })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = match layout {
                ReportLayout::MultiDevice => ReportRow {
                    device: Some(record[0].to_string()),
                    interface: record[1].to_string(),
                    mac_address: record[2].to_string(),
                },
                ReportLayout::SingleDevice => ReportRow {
                    device: None,
                    interface: record[0].to_string(),
                    mac_address: record[1].to_string(),
                },
            };
            rows.push(row);
        }

        log::debug!("Read back {} report rows ({:?})", rows.len(), layout);
        Ok(Self { layout, rows })
    }

    pub fn layout(&self) -> ReportLayout {
        self.layout
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ReportRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows reported with the `N/A` sentinel
    pub fn missing_mac_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.has_mac_address()).count()
    }

    /// Render as CSV text: header, then one CRLF-terminated line per row
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = Writer::from_writer(vec![]);

        writer.write_record(self.layout.header())?;
        for row in &self.rows {
            writer.write_record(row.fields())?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| ReportError::MalformedReport(e.to_string()))
    }
}

/// Generate the multi-device CSV report
pub fn generate(details: &DeviceInterfaceDetails) -> Result<String> {
    Report::for_devices(details).to_csv()
}

/// Generate the single-device CSV report
pub fn generate_single(interfaces: &InterfaceMap) -> Result<String> {
    Report::for_device(interfaces).to_csv()
}

/// Parse a CSV report of either layout back into rows
pub fn parse_report(text: &str) -> Result<Vec<ReportRow>> {
    Ok(Report::from_csv(text)?.into_rows())
}

/// Write a report to `path`, replacing any existing file
///
/// The text goes to a temporary file in the destination directory first and is
/// renamed over `path` only once fully written, so a failure never leaves a
/// truncated report behind.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;

    // Temp files are created owner-only; reports are meant to be shared
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    file.persist(path).map_err(|e| ReportError::Io(e.error))?;

    log::info!("Report written: {:?} ({} bytes)", path, contents.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::InterfaceAttributes;

    fn router() -> InterfaceMap {
        InterfaceMap::new()
            .with_interface(
                "GigabitEthernet0/0",
                InterfaceAttributes::new().with_mac_address("5254.0001.0000"),
            )
            .with_interface("Loopback0", InterfaceAttributes::new())
    }

    #[test]
    fn test_report_rows_substitute_sentinel() {
        let interfaces = router();
        let rows: Vec<ReportRow> = report_rows(Some("iosv-1"), &interfaces).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].device.as_deref(), Some("iosv-1"));
        assert_eq!(rows[0].mac_address, "5254.0001.0000");
        assert!(rows[0].has_mac_address());
        assert_eq!(rows[1].interface, "Loopback0");
        assert_eq!(rows[1].mac_address, NOT_AVAILABLE);
        assert!(!rows[1].has_mac_address());
    }

    #[test]
    fn test_multi_device_csv() {
        let details = DeviceInterfaceDetails::new().with_device("iosv-1", router());
        let csv = generate(&details).unwrap();

        assert_eq!(
            csv,
            "Device,Interface,MAC Address\r\n\
             iosv-1,GigabitEthernet0/0,5254.0001.0000\r\n\
             iosv-1,Loopback0,N/A\r\n"
        );
    }

    #[test]
    fn test_single_device_csv() {
        let csv = generate_single(&router()).unwrap();

        assert_eq!(
            csv,
            "Interface,MAC Address\r\n\
             GigabitEthernet0/0,5254.0001.0000\r\n\
             Loopback0,N/A\r\n"
        );
    }

    #[test]
    fn test_fields_needing_quotes() {
        let interfaces = InterfaceMap::new().with_interface(
            "Port-channel1, member",
            InterfaceAttributes::new().with_mac_address("aaaa.bbbb.cccc"),
        );
        let csv = generate_single(&interfaces).unwrap();
        assert!(csv.contains("\"Port-channel1, member\",aaaa.bbbb.cccc\r\n"));

        let rows = parse_report(&csv).unwrap();
        assert_eq!(rows[0].interface, "Port-channel1, member");
    }

    #[test]
    fn test_lines_end_with_crlf() {
        let details = DeviceInterfaceDetails::new().with_device(
            "r1",
            InterfaceMap::new().with_interface("Lo0", InterfaceAttributes::new()),
        );
        let csv = generate(&details).unwrap();

        assert_eq!(csv, "Device,Interface,MAC Address\r\nr1,Lo0,N/A\r\n");
        assert_eq!(csv.matches("\r\n").count(), csv.matches('\n').count());
    }

    #[test]
    fn test_present_but_empty_mac_is_not_sentinel() {
        let interfaces =
            InterfaceMap::from_json_str(r#"{"Tunnel0": {"mac_address": null}}"#).unwrap();
        let report = Report::for_device(&interfaces);

        assert_eq!(report.rows()[0].mac_address, "");
        assert_eq!(report.missing_mac_count(), 0);
        assert_eq!(report.to_csv().unwrap(), "Interface,MAC Address\r\nTunnel0,\r\n");
    }

    #[test]
    fn test_missing_mac_count() {
        let details = DeviceInterfaceDetails::new()
            .with_device("r1", router())
            .with_device("r2", router());
        let report = Report::for_devices(&details);

        assert_eq!(report.len(), 4);
        assert_eq!(report.missing_mac_count(), 2);
        assert_eq!(report.layout(), ReportLayout::MultiDevice);
    }

    #[test]
    fn test_parse_report_rejects_unknown_header() {
        let err = parse_report("Host,Port\nr1,Gi0/0\n").unwrap_err();
        assert!(matches!(err, ReportError::MalformedReport(_)));
    }

    #[test]
    fn test_parse_report_rejects_ragged_rows() {
        let err = parse_report("Interface,MAC Address\nGi0/0\n").unwrap_err();
        assert!(matches!(err, ReportError::Csv(_)));
    }

    #[test]
    fn test_parse_report_empty_text() {
        let err = parse_report("").unwrap_err();
        assert!(matches!(err, ReportError::MalformedReport(_)));
    }
}
