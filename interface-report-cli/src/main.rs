//! Interface Report CLI Application
//!
//! Command-line front end for the interface-report library. It adds:
//! - Testbed loading (TOML)
//! - Collection of captured `show interfaces` output per device
//! - Batch (all devices) and single-device report modes
//! - Logging and report read-back

use anyhow::{Context, Result};
use clap::Parser;
use interface_report::{
    collect_details, write_report, DeviceInterfaceDetails, Report, ReportLayout,
};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

mod config;

/// Interface Report - Write the MAC address of every device interface to CSV
#[derive(Parser, Debug)]
#[command(name = "interface-report")]
#[command(
    about = "Report interface MAC addresses from parsed 'show interfaces' output",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Path to the testbed file listing devices and their captures
    #[arg(short, long, value_name = "FILE", default_value = "testbed.toml")]
    testbed: PathBuf,

    /// Pre-collected details as JSON ({device: {interface: {...}}}), bypasses the testbed
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Report on a single device only (omits the Device column)
    #[arg(short, long, value_name = "NAME")]
    device: Option<String>,

    /// Output CSV file (default: from testbed, else interfaces.csv)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the written report to stdout
    #[arg(long)]
    print: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// What a run produced
#[derive(Debug)]
struct RunSummary {
    output: PathBuf,
    layout: ReportLayout,
    rows: usize,
    missing_mac: usize,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Interface Report CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using report library v{}", interface_report::VERSION);

    let summary = run(&args)?;

    log::info!(
        "{} rows written to {:?} ({} without a MAC address, {:?})",
        summary.rows,
        summary.output,
        summary.missing_mac,
        summary.layout
    );

    if args.print {
        print_report(&summary.output, &mut io::stdout().lock())?;
    }

    Ok(())
}

/// Copy the report as written on disk to `out`
fn print_report(path: &Path, out: &mut impl Write) -> Result<()> {
    let written = fs::read_to_string(path)
        .with_context(|| format!("Failed to read back report: {:?}", path))?;
    out.write_all(written.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Collect details, generate the report and write it
fn run(args: &Args) -> Result<RunSummary> {
    let (details, default_output) = match &args.input {
        Some(input) => (load_input(input)?, PathBuf::from(config::DEFAULT_OUTPUT)),
        None => collect_from_testbed(&args.testbed, args.device.as_deref())?,
    };
    let output = args.output.clone().unwrap_or(default_output);

    let report = match &args.device {
        Some(device) => Report::for_device(&details.into_device(device)?),
        None => Report::for_devices(&details),
    };

    let csv = report.to_csv()?;
    write_report(&output, &csv)
        .with_context(|| format!("Failed to write report: {:?}", output))?;

    Ok(RunSummary {
        output,
        layout: report.layout(),
        rows: report.len(),
        missing_mac: report.missing_mac_count(),
    })
}

/// Load pre-collected details from a JSON file
fn load_input(path: &Path) -> Result<DeviceInterfaceDetails> {
    log::info!("Loading interface details from: {:?}", path);
    let file =
        File::open(path).with_context(|| format!("Failed to open input file: {:?}", path))?;

    let details = DeviceInterfaceDetails::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load input file: {:?}", path))?;
    log::debug!(
        "Loaded {} devices, {} interfaces",
        details.len(),
        details.interface_count()
    );

    Ok(details)
}

/// Collect details for the testbed's devices (or just `only`, if given)
fn collect_from_testbed(
    path: &Path,
    only: Option<&str>,
) -> Result<(DeviceInterfaceDetails, PathBuf)> {
    log::info!("Loading testbed from: {:?}", path);
    let testbed = config::load_config(path)?;
    log::debug!("Testbed loaded: {} devices", testbed.devices.len());

    let mut devices = testbed.device_specs();
    if let Some(name) = only {
        devices.retain(|device| device.name == name);
        if devices.is_empty() {
            anyhow::bail!("Device '{}' is not in testbed {:?}", name, path);
        }
    }

    let source = testbed.capture_source();
    log::debug!("Reading captures from: {:?}", source.capture_dir());

    let details = collect_details(&devices, &source).with_context(|| {
        format!("Failed to collect interface details for testbed {:?}", path)
    })?;

    Ok((details, testbed.output.path))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
