//! Data types served by the HTTP API.
//! Keep this module minimal and stable: it defines the wire format.
//!
//! Numeric readings travel as pre-formatted strings ("37.50", "53.0") rather
//! than floats; the dashboard re-parses what it charts and shows the rest as-is.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    /// Percent of CPU in use, two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization: Option<String>,
    /// Degrees Celsius with one decimal, or the literal "N/A".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RamInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_percent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub name: String,
    pub vram: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization: Option<String>,
    pub temperature: String,
}

impl GpuInfo {
    /// A freshly discovered device. VRAM and temperature hold placeholder
    /// values until later report lines fill them in.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vram: "-".to_string(),
            utilization: None,
            temperature: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionInfo {
    pub mount: String,
    pub total: String,
    pub used: String,
    pub available: String,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partitions: Option<Vec<PartitionInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
    /// Cumulative sent traffic, "512.00 MB" or "1.21 GB".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_average: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartInfo {
    pub status: String,
}

impl Default for SmartInfo {
    fn default() -> Self {
        Self {
            status: "unknown".to_string(),
        }
    }
}

/// One full reading of the host. Every section serializes even when empty so
/// clients can bind to a stable shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub cpu: CpuInfo,
    pub ram: RamInfo,
    /// The wire key stays singular; dashboards bind `gpu[0]`, `gpu[1]`.
    #[serde(rename = "gpu")]
    pub gpus: Vec<GpuInfo>,
    pub disk: DiskInfo,
    pub network: NetworkInfo,
    pub system: SystemInfo,
    pub smart: SmartInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_keeps_every_section() {
        let v = serde_json::to_value(MetricsSnapshot::default()).unwrap();
        for key in ["cpu", "ram", "gpu", "disk", "network", "system", "smart"] {
            assert!(v.get(key).is_some(), "missing section {key}");
        }
        assert_eq!(v["smart"]["status"], "unknown");
        assert_eq!(v["gpu"], serde_json::json!([]));
    }

    #[test]
    fn gpu_list_serializes_under_the_singular_key() {
        let mut snap = MetricsSnapshot::default();
        snap.gpus.push(GpuInfo::named("Card A"));
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["gpu"][0]["name"], "Card A");
        assert!(v.get("gpus").is_none());
    }

    #[test]
    fn multiword_fields_serialize_camel_case() {
        let mut snap = MetricsSnapshot::default();
        snap.ram.free_percent = Some("40.00".into());
        snap.ram.used_percent = Some("60.00".into());
        snap.system.boot_time = Some("2025-08-20 08:15:02".into());
        snap.system.load_average = Some("0.42".into());
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["ram"]["freePercent"], "40.00");
        assert_eq!(v["ram"]["usedPercent"], "60.00");
        assert_eq!(v["system"]["bootTime"], "2025-08-20 08:15:02");
        assert_eq!(v["system"]["loadAverage"], "0.42");
    }

    #[test]
    fn absent_readings_are_omitted() {
        let v = serde_json::to_value(MetricsSnapshot::default()).unwrap();
        assert!(v["cpu"].get("utilization").is_none());
        assert!(v["disk"].get("partitions").is_none());
    }

    #[test]
    fn new_gpu_carries_placeholders() {
        let gpu = GpuInfo::named("Test GPU");
        assert_eq!(gpu.vram, "-");
        assert_eq!(gpu.temperature, "N/A");
        assert!(gpu.utilization.is_none());
        let v = serde_json::to_value(&gpu).unwrap();
        assert!(v.get("utilization").is_none());
    }
}
