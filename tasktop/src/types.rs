//! Types that mirror the agent's JSON schema.
//!
//! Every field defaults so a thin or partial payload still deserializes; the
//! panels show placeholders for whatever is missing.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CpuInfo {
    pub model: Option<String>,
    pub cores: Option<String>,
    pub speed: Option<String>,
    pub utilization: Option<String>,
    pub temperature: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RamInfo {
    pub total: Option<String>,
    pub available: Option<String>,
    pub free_percent: Option<String>,
    pub used_percent: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GpuInfo {
    pub name: String,
    pub vram: String,
    pub utilization: Option<String>,
    pub temperature: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PartitionInfo {
    pub mount: String,
    pub total: String,
    pub used: String,
    pub available: String,
    pub used_percent: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DiskInfo {
    pub total: Option<String>,
    pub used: Option<String>,
    pub available: Option<String>,
    pub partitions: Option<Vec<PartitionInfo>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkInfo {
    pub adapter: Option<String>,
    pub tx: Option<String>,
    pub rx: Option<String>,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemInfo {
    pub platform: Option<String>,
    pub uptime: Option<String>,
    pub boot_time: Option<String>,
    pub load_average: Option<String>,
    pub processes: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
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

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub cpu: CpuInfo,
    pub ram: RamInfo,
    /// The agent serializes this list under the singular `gpu` key.
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
    fn full_payload_deserializes() {
        let json = r#"{
            "cpu": {"model": "Test CPU", "cores": "8 physical / 16 logical",
                    "speed": "3.6 GHz", "utilization": "37.50", "temperature": "53.0"},
            "ram": {"total": "31Gi", "available": "26Gi",
                    "freePercent": "40.00", "usedPercent": "60.00"},
            "gpu": [{"name": "Card A", "vram": "-", "utilization": "12.00", "temperature": "65.0"}],
            "disk": {"total": "500GB", "used": "200GB", "available": "300GB",
                     "partitions": [{"mount": "/", "total": "468G", "used": "201G",
                                     "available": "244G", "usedPercent": 46.0}]},
            "network": {"adapter": "eth0", "tx": "2.00 GB", "rx": "512.00 MB",
                        "ipv4": "192.168.1.50", "ipv6": "fe80::1"},
            "system": {"platform": "linux", "uptime": "6 days",
                       "bootTime": "2025-08-20 08:15:02", "loadAverage": "0.42",
                       "processes": "284 total"},
            "smart": {"status": "PASSED"}
        }"#;
        let snap: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.cpu.utilization.as_deref(), Some("37.50"));
        assert_eq!(snap.ram.free_percent.as_deref(), Some("40.00"));
        assert_eq!(snap.gpus[0].temperature, "65.0");
        let parts = snap.disk.partitions.unwrap();
        assert_eq!(parts[0].mount, "/");
        assert!((parts[0].used_percent - 46.0).abs() < f64::EPSILON);
        assert_eq!(snap.system.boot_time.as_deref(), Some("2025-08-20 08:15:02"));
        assert_eq!(snap.smart.status, "PASSED");
    }

    #[test]
    fn sparse_payload_fills_defaults() {
        let snap: MetricsSnapshot = serde_json::from_str(r#"{"cpu": {"utilization": "5.00"}}"#).unwrap();
        assert_eq!(snap.cpu.utilization.as_deref(), Some("5.00"));
        assert!(snap.cpu.model.is_none());
        assert!(snap.gpus.is_empty());
        assert_eq!(snap.smart.status, "unknown");
    }

    #[test]
    fn gpu_list_reads_from_the_singular_key() {
        let snap: MetricsSnapshot = serde_json::from_str(
            r#"{"gpu": [{"name": "Card A", "vram": "-", "temperature": "65.0"}]}"#,
        )
        .unwrap();
        assert_eq!(snap.gpus.len(), 1);
        assert_eq!(snap.gpus[0].name, "Card A");
    }
}
