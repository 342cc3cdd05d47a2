//! Binix GfxInfo - feature blocklist query tool
//!
//! Evaluates the built-in graphics blocklist for a system described on the
//! command line or in a JSON file.

use std::path::PathBuf;
use std::process::ExitCode;

use binix_gfxinfo::{
    AdapterInfo, BlocklistConfig, Feature, FeatureDecision, GfxInfo, GfxInfoError, NAME,
    OperatingSystem, Result, StaticProbe, SystemDescriptor, SystemProbe, VERSION,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "binix-gfxinfo", version, about = "Query the Binix graphics feature blocklist")]
struct Args {
    /// JSON file with a full system descriptor
    #[arg(long, conflicts_with_all = ["os", "vendor", "device", "driver_version"])]
    descriptor: Option<PathBuf>,

    /// Operating system, e.g. "Windows 10", "Linux", "macOS 13"
    #[arg(long)]
    os: Option<String>,

    /// OS version, e.g. "13.4"
    #[arg(long)]
    os_version: Option<String>,

    /// Adapter PCI vendor id, e.g. 0x10de
    #[arg(long)]
    vendor: Option<String>,

    /// Adapter device id, e.g. 0x1b80
    #[arg(long)]
    device: Option<String>,

    /// Driver version in the platform's native format
    #[arg(long)]
    driver_version: Option<String>,

    /// Driver vendor on Linux, e.g. mesa/radeonsi
    #[arg(long)]
    driver_vendor: Option<String>,

    /// Screen size in pixels, WIDTHxHEIGHT
    #[arg(long, value_parser = parse_screen)]
    screen: Option<(u32, u32)>,

    /// Whether the system runs on a battery
    #[arg(long)]
    battery: bool,

    /// Window protocol, e.g. x11 or wayland
    #[arg(long)]
    protocol: Option<String>,

    /// Monitor refresh rate in Hz; repeat for several monitors
    #[arg(long = "refresh-rate")]
    refresh_rates: Vec<u32>,

    /// Feature to query, e.g. WEBRENDER; repeat for several (default: all)
    #[arg(long = "feature")]
    features: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn parse_screen(value: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", value))?;
    let width = width.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let height = height.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    Ok((width, height))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let descriptor = build_descriptor(args)?;
    let features = selected_features(&args.features)?;

    let gfx = GfxInfo::new(BlocklistConfig::from_env()?);
    let probe = StaticProbe::new(descriptor);
    let decisions: Vec<(Feature, FeatureDecision)> = match features {
        Some(features) => features
            .into_iter()
            .map(|feature| (feature, gfx.feature_status_for(&probe, feature)))
            .collect(),
        None => gfx.all_feature_statuses_for(&probe),
    };
    let system = probe.probe();

    if args.json {
        let report: Vec<serde_json::Value> = decisions
            .iter()
            .map(|(feature, decision)| {
                serde_json::json!({
                    "feature": feature.as_str(),
                    "status": decision.status.as_str(),
                    "suggested_version": &decision.suggested_version,
                    "rule_id": &decision.rule_id,
                })
            })
            .collect();
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| GfxInfoError::Other(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    println!("🚀 {} v{}", NAME, VERSION);
    println!(
        "   {} / {} {} / driver {}",
        system.os.as_str(),
        system.adapter.vendor_id,
        system.adapter.device_id,
        system.adapter.driver_version
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (feature, decision) in &decisions {
        let marker = if decision.status.is_allowed() { "✅" } else { "⛔" };
        print!("{} {:<28} {}", marker, feature.as_str(), decision.status.as_str());
        if let Some(rule_id) = &decision.rule_id {
            print!("  [{}]", rule_id);
        }
        if let Some(version) = &decision.suggested_version {
            print!("  (update to {})", version);
        }
        println!();
    }

    Ok(())
}

fn build_descriptor(args: &Args) -> Result<SystemDescriptor> {
    if let Some(path) = &args.descriptor {
        let json = std::fs::read_to_string(path)?;
        return SystemDescriptor::from_json(&json)
            .map_err(|e| GfxInfoError::Other(format!("{}: {}", path.display(), e)));
    }

    let os = match &args.os {
        Some(name) => OperatingSystem::from_str(name)
            .ok_or_else(|| GfxInfoError::Other(format!("unknown operating system {:?}", name)))?,
        None => OperatingSystem::Unknown,
    };

    let mut adapter = AdapterInfo::new(
        args.vendor.clone().unwrap_or_default(),
        args.device.clone().unwrap_or_default(),
        args.driver_version.clone().unwrap_or_default(),
    );
    if let Some(driver_vendor) = &args.driver_vendor {
        adapter = adapter.with_driver_vendor(driver_vendor.clone());
    }

    let (width, height) = args.screen.unwrap_or((0, 0));
    let mut descriptor = SystemDescriptor::new(os)
        .with_adapter(adapter)
        .with_screen(width, height)
        .with_battery(args.battery)
        .with_window_protocol(args.protocol.clone().unwrap_or_default());
    if let Some(version) = &args.os_version {
        descriptor = descriptor.with_os_version(version.clone());
    }
    descriptor.refresh_rates = args.refresh_rates.clone();

    Ok(descriptor)
}

fn selected_features(names: &[String]) -> Result<Option<Vec<Feature>>> {
    if names.is_empty() {
        return Ok(None);
    }
    names
        .iter()
        .map(|name| {
            Feature::from_str(name)
                .ok_or_else(|| GfxInfoError::Other(format!("unknown feature {:?}", name)))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
