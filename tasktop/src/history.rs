//! Bounded history buffers feeding the charts.
//!
//! Two windows with different depths: each trend metric keeps the last 100
//! samples, while the live CPU chart keeps a short 20-slot window so recent
//! movement stays readable.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::types::MetricsSnapshot;

pub const HISTORY_CAP: usize = 100;
pub const CPU_WINDOW_CAP: usize = 20;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

#[derive(Debug, Clone)]
pub struct Sample {
    pub time: DateTime<Local>,
    pub value: f64,
}

/// One trend series, oldest first, never longer than `HISTORY_CAP`.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    samples: VecDeque<Sample>,
}

impl HistoryBuffer {
    pub fn push(&mut self, time: DateTime<Local>, value: f64) {
        push_capped(&mut self.samples, Sample { time, value }, HISTORY_CAP);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The trend metric the history panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMetric {
    Memory,
    Cpu,
    Temperature,
    Network,
}

impl HistoryMetric {
    /// Cycle order for the `m` key.
    pub fn next(self) -> Self {
        match self {
            Self::Memory => Self::Cpu,
            Self::Cpu => Self::Temperature,
            Self::Temperature => Self::Network,
            Self::Network => Self::Memory,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Memory => "Memory Usage (%)",
            Self::Cpu => "CPU Usage (%)",
            Self::Temperature => "CPU Temperature (°C)",
            Self::Network => "Network Usage",
        }
    }
}

/// All trend buffers. The network buffer is wired through the panel cycle
/// but nothing records into it yet; it draws empty.
#[derive(Debug, Default)]
pub struct HistoryStore {
    pub memory: HistoryBuffer,
    pub cpu: HistoryBuffer,
    pub temperature: HistoryBuffer,
    pub network: HistoryBuffer,
}

impl HistoryStore {
    /// Appends one sample per recorded metric. Fields the snapshot lacks, or
    /// carries unparseably ("N/A"), record as zero.
    pub fn record(&mut self, now: DateTime<Local>, snapshot: &MetricsSnapshot) {
        self.memory
            .push(now, parse_or_zero(snapshot.ram.used_percent.as_deref()));
        self.cpu
            .push(now, parse_or_zero(snapshot.cpu.utilization.as_deref()));
        self.temperature
            .push(now, parse_or_zero(snapshot.cpu.temperature.as_deref()));
    }

    pub fn buffer(&self, metric: HistoryMetric) -> &HistoryBuffer {
        match metric {
            HistoryMetric::Memory => &self.memory,
            HistoryMetric::Cpu => &self.cpu,
            HistoryMetric::Temperature => &self.temperature,
            HistoryMetric::Network => &self.network,
        }
    }
}

/// Short parallel window for the live CPU chart: a time label plus usage and
/// temperature per slot, all three evicted together.
#[derive(Debug, Default)]
pub struct CpuChartWindow {
    labels: VecDeque<String>,
    usage: VecDeque<f64>,
    temperature: VecDeque<f64>,
}

impl CpuChartWindow {
    pub fn record(&mut self, now: DateTime<Local>, snapshot: &MetricsSnapshot) {
        push_capped(
            &mut self.labels,
            now.format("%H:%M:%S").to_string(),
            CPU_WINDOW_CAP,
        );
        push_capped(
            &mut self.usage,
            parse_or_zero(snapshot.cpu.utilization.as_deref()),
            CPU_WINDOW_CAP,
        );
        push_capped(
            &mut self.temperature,
            parse_or_zero(snapshot.cpu.temperature.as_deref()),
            CPU_WINDOW_CAP,
        );
    }

    pub fn labels(&self) -> &VecDeque<String> {
        &self.labels
    }

    pub fn usage(&self) -> &VecDeque<f64> {
        &self.usage
    }

    pub fn temperature(&self) -> &VecDeque<f64> {
        &self.temperature
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub fn parse_or_zero(value: Option<&str>) -> f64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0.0)
}
