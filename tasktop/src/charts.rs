//! Chart-shaped views over snapshot and history data.
//!
//! Every panel that plots something goes through `ChartInput`, a plain
//! labels-plus-series bundle with no drawing types in it. The ui modules
//! decide how a series turns into lines, bars, or gauges.

use crate::history::{parse_or_zero, CpuChartWindow, HistoryBuffer, HistoryMetric};
use crate::types::{DiskInfo, GpuInfo, RamInfo};
use crate::units::normalize_to_gb;

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartInput {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

/// Live CPU chart: usage and temperature over the short window.
pub fn cpu_chart(window: &CpuChartWindow) -> ChartInput {
    ChartInput {
        labels: window.labels().iter().cloned().collect(),
        series: vec![
            Series {
                name: "CPU Usage (%)".to_string(),
                points: window.usage().iter().copied().collect(),
            },
            Series {
                name: "CPU Temperature (°C)".to_string(),
                points: window.temperature().iter().copied().collect(),
            },
        ],
    }
}

/// One temperature bar per device, labeled with the device name.
/// An unreadable temperature ("N/A") plots as zero.
pub fn gpu_chart(gpus: &[GpuInfo]) -> ChartInput {
    ChartInput {
        labels: gpus.iter().map(|g| g.name.clone()).collect(),
        series: vec![Series {
            name: "GPU Temperature (°C)".to_string(),
            points: gpus
                .iter()
                .map(|g| g.temperature.parse().unwrap_or(0.0))
                .collect(),
        }],
    }
}

/// Used/free split of RAM in percent, latest snapshot only.
pub fn ram_chart(ram: &RamInfo) -> ChartInput {
    ChartInput {
        labels: vec!["Used".to_string(), "Free".to_string()],
        series: vec![Series {
            name: "RAM (%)".to_string(),
            points: vec![
                parse_or_zero(ram.used_percent.as_deref()),
                parse_or_zero(ram.free_percent.as_deref()),
            ],
        }],
    }
}

/// Used/free split of total disk space in gigabytes, latest snapshot only.
pub fn disk_chart(disk: &DiskInfo) -> ChartInput {
    ChartInput {
        labels: vec!["Used".to_string(), "Free".to_string()],
        series: vec![Series {
            name: "Disk (GB)".to_string(),
            points: vec![
                normalize_to_gb(disk.used.as_deref().unwrap_or("")),
                normalize_to_gb(disk.available.as_deref().unwrap_or("")),
            ],
        }],
    }
}

/// The long trend window for whichever metric the history panel is showing.
pub fn history_chart(buffer: &HistoryBuffer, metric: HistoryMetric) -> ChartInput {
    ChartInput {
        labels: buffer
            .iter()
            .map(|s| s.time.format("%H:%M:%S").to_string())
            .collect(),
        series: vec![Series {
            name: metric.label().to_string(),
            points: buffer.iter().map(|s| s.value).collect(),
        }],
    }
}
