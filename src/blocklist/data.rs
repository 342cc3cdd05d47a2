//! Compiled-in blocklist
//!
//! Order matters: a query stops at the first decisive rule, so narrow
//! exclusions go before broader rules for the same feature.

use std::sync::{Arc, LazyLock};

use super::{Feature, FeatureSelector, FeatureStatus, RateBound, Rule, RuleTable, VersionCondition};
use crate::device::{DeviceFamily, DeviceSet, DriverVendor, WindowProtocol};
use crate::system::{AndroidDevice, BatteryStatus, OperatingSystem, RefreshRateStatus, ScreenSizeStatus};
use crate::utils::BlocklistError;
use crate::version::{DriverVersionFormat, VersionComparisonOp::*, VersionTuple};

static BUILTIN_DECIMAL: LazyLock<Arc<RuleTable>> =
    LazyLock::new(|| load_builtin(DriverVersionFormat::Decimal));
static BUILTIN_PADDED: LazyLock<Arc<RuleTable>> =
    LazyLock::new(|| load_builtin(DriverVersionFormat::PaddedDecimal));
static BUILTIN_INTEGER: LazyLock<Arc<RuleTable>> =
    LazyLock::new(|| load_builtin(DriverVersionFormat::Integer));

impl RuleTable {
    /// The compiled-in blocklist for `format`, built once per process
    pub fn builtin(format: DriverVersionFormat) -> Arc<RuleTable> {
        let table = match format {
            DriverVersionFormat::Decimal => &BUILTIN_DECIMAL,
            DriverVersionFormat::PaddedDecimal => &BUILTIN_PADDED,
            DriverVersionFormat::Integer => &BUILTIN_INTEGER,
        };
        Arc::clone(LazyLock::force(table))
    }
}

fn load_builtin(format: DriverVersionFormat) -> Arc<RuleTable> {
    match builtin_rules(format) {
        Ok(table) => {
            log::debug!(
                "Built-in blocklist loaded: {} rules ({})",
                table.len(),
                format.as_str()
            );
            Arc::new(table)
        }
        // The data set is part of the build; a bad entry is a programming error.
        Err(err) => panic!("built-in blocklist is invalid: {err}"),
    }
}

/// Build the compiled-in rule set, with version literals in `format`
pub fn builtin_rules(format: DriverVersionFormat) -> Result<RuleTable, BlocklistError> {
    let v = |a, b, c, d| format.version(a, b, c, d);
    let mut table = RuleTable::new(format);

    /* Windows */

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::IntelGma500,
            FeatureSelector::Optional,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_GMA500",
        )
        .build()?,
    );

    for (family, rule_id) in [
        (DeviceFamily::IntelGma900, "FEATURE_FAILURE_GMA900"),
        (DeviceFamily::IntelGma950, "FEATURE_FAILURE_GMA950"),
        (DeviceFamily::IntelGma3150, "FEATURE_FAILURE_GMA3150"),
        (DeviceFamily::IntelGmaX3000, "FEATURE_FAILURE_GMAX3000"),
    ] {
        table.push(
            Rule::builder(
                OperatingSystem::Windows,
                family,
                Feature::Direct2d,
                FeatureStatus::BlockedDevice,
                rule_id,
            )
            .build()?,
        );
    }

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaBlockD3d9Layers,
            Feature::Direct3d9Layers,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_NV_D3D9",
        )
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::IntelHdGraphicsToSandyBridge,
            Feature::Direct3d11Layers,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_SNB_D3D11",
        )
        .driver_version(LessThan, v(8, 15, 10, 2202))
        .suggested_version("8.15.10.2202")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::IntelHaswell,
            Feature::WebGlAngle,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_HASWELL_WEBGL",
        )
        .driver_version_range(BetweenInclusiveStart, v(10, 18, 14, 4264), v(10, 18, 14, 4332))
        .suggested_version("10.18.14.4332")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows7,
            DeviceFamily::IntelGen7Baytrail,
            FeatureSelector::Optional,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_BAYTRAIL_WIN7",
        )
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::Direct2d,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_NV_D2D",
        )
        .driver_version(LessThan, v(8, 17, 12, 5896))
        .suggested_version("257.21")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::RadeonCaicos,
            Feature::Direct3d11Layers,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_CAICOS_D3D11",
        )
        .driver_version(LessThan, v(15, 201, 1151, 1008))
        .suggested_version("15.201.1151.1008")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::Bug1447141,
            Feature::GpuProcess,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_BUG_1447141",
        )
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::AtiAll,
            FeatureSelector::Optional,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_AMD_OLD",
        )
        .driver_version(LessThan, v(8, 56, 1, 15))
        .suggested_version("8.56.1.15")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::RadeonBlockZeroVideoCopy,
            Feature::HardwareVideoDecoding,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_AMD_ZERO_COPY",
        )
        .driver_version_range(BetweenInclusive, v(26, 20, 15000, 37), v(26, 20, 15000, 57))
        .build()?,
    );

    // Hybrid laptops decoding on the discrete NVIDIA adapter
    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaAll,
            Feature::HardwareVideoDecoding,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_NV_OPTIMUS_DECODE",
        )
        .gpu2()
        .driver_version(LessThan, v(21, 21, 13, 4201))
        .suggested_version("21.21.13.4201")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaWebRenderBlocked,
            Feature::WebRender,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_NV_WR_BLOCKED",
        )
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::IntelWebRenderBlocked,
            Feature::WebRender,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_INTEL_WR_BLOCKED",
        )
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::NvidiaPascal,
            Feature::WebRenderCompositor,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_PASCAL_DCOMP",
        )
        .driver_version(LessThan, v(27, 21, 14, 5638))
        .suggested_version("27.21.14.5638")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::AtiAll,
            Feature::WebRenderCompositor,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_AMD_MIXED_REFRESH",
        )
        .refresh_rate(
            RefreshRateStatus::Mixed,
            RateBound::new(LessThanOrEqual, 60),
            RateBound::new(GreaterThan, 60),
        )
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::IntelAll,
            Feature::WebRenderPartialPresent,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_INTEL_LARGE_SCREEN_BATTERY",
        )
        .screen(ScreenSizeStatus::Large)
        .battery(BatteryStatus::Present)
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::IntelGen12,
            Feature::H264HwDecode,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_GEN12_H264",
        )
        .driver_version(LessThan, v(30, 0, 101, 1191))
        .suggested_version("30.0.101.1191")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Windows,
            DeviceFamily::MicrosoftAll,
            FeatureSelector::Optional,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_MICROSOFT_BASIC",
        )
        .build()?,
    );

    /* macOS */

    table.push(
        Rule::builder(
            OperatingSystem::MacOs,
            DeviceFamily::RadeonX1000,
            Feature::OpenGlLayers,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_OSX_RADEON_X1000",
        )
        .build()?,
    );

    for (family, rule_id) in [
        (DeviceFamily::Geforce7300Gt, "FEATURE_FAILURE_OSX_7300GT"),
        (DeviceFamily::Nvidia8800Gts, "FEATURE_FAILURE_OSX_8800GTS"),
    ] {
        table.push(
            Rule::builder(
                OperatingSystem::MacOs,
                family,
                Feature::WebGlOpenGl,
                FeatureStatus::BlockedDevice,
                rule_id,
            )
            .build()?,
        );
    }

    table.push(
        Rule::builder(
            OperatingSystem::MacOs,
            DeviceFamily::All,
            Feature::WebGpu,
            FeatureStatus::BlockedOsVersion,
            "FEATURE_FAILURE_WEBGPU_OLD_MACOS",
        )
        .os_version(VersionCondition::new(LessThan, VersionTuple::new(13, 0, 0, 0)))
        .build()?,
    );

    /* Linux */

    table.push(
        Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::All,
            FeatureSelector::Optional,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_SOFTWARE_GL",
        )
        .driver_vendor(DriverVendor::SoftwareMesaAll)
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::AmdR600,
            Feature::WebRender,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_R600",
        )
        .driver_vendor(DriverVendor::MesaR600)
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::NvidiaAll,
            Feature::WebRender,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_NOUVEAU_OLD",
        )
        .driver_vendor(DriverVendor::MesaNouveau)
        .driver_version(LessThan, VersionTuple::new(21, 0, 0, 0))
        .suggested_version("21.0.0")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::NvidiaAll,
            FeatureSelector::Optional,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_OLD_NV_PROPRIETARY",
        )
        .driver_vendor(DriverVendor::NonMesaAll)
        .driver_version(LessThan, VersionTuple::new(470, 82, 0, 0))
        .suggested_version("470.82.0")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::All,
            FeatureSelector::Optional,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_OLD_MESA",
        )
        .driver_vendor(DriverVendor::HardwareMesaAll)
        .driver_version(LessThan, VersionTuple::new(17, 0, 0, 0))
        .suggested_version("17.0.0")
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::All,
            Feature::WebRenderCompositor,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_X11_COMPOSITOR",
        )
        .window_protocol(WindowProtocol::X11All)
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Linux,
            DeviceFamily::All,
            Feature::HardwareVideoDecoding,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_VIDEO_DECODING_NON_MESA",
        )
        .driver_vendor(DriverVendor::NonMesaAll)
        .window_protocol(WindowProtocol::X11)
        .build()?,
    );

    /* Android */

    table.push(
        Rule::builder(
            OperatingSystem::Android,
            DeviceFamily::All,
            Feature::WebRender,
            FeatureStatus::BlockedDevice,
            "FEATURE_FAILURE_ADRENO_50X",
        )
        .devices(Arc::new(DeviceSet::from_ids([
            "Adreno (TM) 505",
            "Adreno (TM) 506",
        ])))
        .build()?,
    );

    table.push(
        Rule::builder(
            OperatingSystem::Android,
            DeviceFamily::All,
            Feature::WebGl2,
            FeatureStatus::BlockedDriverVersion,
            "FEATURE_FAILURE_AMAZON_WEBGL2",
        )
        .android(AndroidDevice {
            manufacturer: "Amazon".to_string(),
            ..AndroidDevice::default()
        })
        .driver_version(LessThan, v(0, 0, 0, 300))
        .build()?,
    );

    Ok(table)
}
