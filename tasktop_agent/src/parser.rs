//! Marker scanner for the report text produced by the metrics script.
//! Pure functions only. No I/O here, just line scanning.

use crate::types::{GpuInfo, MetricsSnapshot};

/// Scanner state threaded through the rule table. `active_gpu` points at the
/// record in `snap.gpus` that per-device lines attach to; it moves only when a
/// `GPU:` line appends a new record.
struct Scan {
    snap: MetricsSnapshot,
    active_gpu: Option<usize>,
}

enum Marker {
    /// Matches anywhere in the line, captures the text after the marker.
    Contains(&'static str),
    /// Matches only at the start of the line.
    Prefix(&'static str),
}

impl Marker {
    fn rest<'a>(&self, line: &'a str) -> Option<&'a str> {
        match self {
            Marker::Contains(m) => line.find(m).map(|at| line[at + m.len()..].trim()),
            Marker::Prefix(m) => line.strip_prefix(m).map(str::trim),
        }
    }
}

type Apply = fn(&mut Scan, &str);

/// Ordered rule table, first match wins. Device-scoped GPU markers sit above
/// the bare `GPU:` discovery marker so a device line never reads as a name.
const RULES: &[(Marker, Apply)] = &[
    (Marker::Contains("CPU Model:"), cpu_model),
    (Marker::Contains("CPU Cores:"), cpu_cores),
    (Marker::Contains("CPU Speed:"), cpu_speed),
    (Marker::Contains("CPU Utilization:"), cpu_utilization),
    (Marker::Contains("CPU Temperature:"), cpu_temperature),
    (Marker::Contains("Total RAM:"), ram_total),
    (Marker::Contains("Free RAM:"), ram_free_percent),
    (Marker::Contains("Utilized RAM:"), ram_used_percent),
    (Marker::Contains("GPU Type:"), discard),
    (Marker::Contains("GPU Utilization:"), gpu_utilization),
    (Marker::Contains("GPU Temperature:"), gpu_temperature),
    (Marker::Contains("GPU:"), gpu_record),
    (Marker::Contains("Total Disk Space:"), disk_total),
    (Marker::Contains("Used Disk Space:"), disk_used),
    (Marker::Contains("Available Disk Space:"), disk_available),
    (Marker::Contains("Network Adapter Model:"), network_adapter),
    (Marker::Contains("Sent:"), network_tx),
    (Marker::Contains("Received:"), network_rx),
    (Marker::Contains("IPV4 Address:"), network_ipv4),
    (Marker::Contains("IPV6 Address:"), network_ipv6),
    (Marker::Contains("Uptime:"), system_uptime),
    (Marker::Contains("Startup time:"), system_boot_time),
    (Marker::Contains("Average process waiting time:"), system_load_average),
    (Marker::Contains("Processes:"), system_processes),
    (Marker::Contains("All disks passed S.M.A.R.T. tests"), smart_passed),
    (Marker::Contains("S.M.A.R.T. test FAILED"), smart_failed),
    (Marker::Prefix("SMART Status:"), smart_status),
];

/// Scans a full report and builds the snapshot a marker at a time.
/// Unknown lines are skipped and unparseable numbers leave their field unset,
/// so a ragged report still yields whatever it did carry. Text markers with
/// an empty payload record "-".
pub fn parse_report(report: &str) -> MetricsSnapshot {
    let mut scan = Scan {
        snap: MetricsSnapshot::default(),
        active_gpu: None,
    };
    for line in report.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        for (marker, apply) in RULES {
            if let Some(rest) = marker.rest(line) {
                apply(&mut scan, rest);
                break;
            }
        }
    }
    scan.snap
}

fn discard(_: &mut Scan, _: &str) {}

fn cpu_model(s: &mut Scan, rest: &str) {
    s.snap.cpu.model = Some(text_or_dash(rest));
}

fn cpu_cores(s: &mut Scan, rest: &str) {
    s.snap.cpu.cores = Some(text_or_dash(rest));
}

fn cpu_speed(s: &mut Scan, rest: &str) {
    s.snap.cpu.speed = Some(text_or_dash(rest));
}

fn cpu_utilization(s: &mut Scan, rest: &str) {
    if let Some(v) = first_number(rest) {
        s.snap.cpu.utilization = Some(format!("{v:.2}"));
    }
}

fn cpu_temperature(s: &mut Scan, rest: &str) {
    // Scripts report "N/A" where no sensor exists and an install hint where
    // the sensors tooling is missing. Only the first is worth forwarding.
    if rest == "N/A" {
        s.snap.cpu.temperature = Some("N/A".into());
    } else if !rest.contains("command not found") && !rest.contains("install") {
        if let Some(v) = first_number(rest) {
            s.snap.cpu.temperature = Some(format!("{v:.1}"));
        }
    }
}

fn ram_total(s: &mut Scan, rest: &str) {
    s.snap.ram.total = Some(text_or_dash(rest));
}

fn ram_free_percent(s: &mut Scan, rest: &str) {
    if let Some(v) = first_number(rest) {
        s.snap.ram.free_percent = Some(format!("{v:.2}"));
    }
}

fn ram_used_percent(s: &mut Scan, rest: &str) {
    if let Some(v) = first_number(rest) {
        s.snap.ram.used_percent = Some(format!("{v:.2}"));
    }
}

fn gpu_record(s: &mut Scan, rest: &str) {
    if rest.is_empty() || s.snap.gpus.iter().any(|g| g.name == rest) {
        return;
    }
    s.snap.gpus.push(GpuInfo::named(rest));
    s.active_gpu = Some(s.snap.gpus.len() - 1);
}

fn gpu_utilization(s: &mut Scan, rest: &str) {
    let Some(at) = s.active_gpu else { return };
    if let Some(v) = first_number(rest) {
        s.snap.gpus[at].utilization = Some(format!("{v:.2}"));
    }
}

fn gpu_temperature(s: &mut Scan, rest: &str) {
    let Some(at) = s.active_gpu else { return };
    s.snap.gpus[at].temperature = match first_number(rest) {
        Some(v) => format!("{v:.1}"),
        None => "N/A".into(),
    };
}

fn disk_total(s: &mut Scan, rest: &str) {
    s.snap.disk.total = Some(text_or_dash(rest));
}

fn disk_used(s: &mut Scan, rest: &str) {
    s.snap.disk.used = Some(text_or_dash(rest));
}

fn disk_available(s: &mut Scan, rest: &str) {
    s.snap.disk.available = Some(text_or_dash(rest));
}

fn network_adapter(s: &mut Scan, rest: &str) {
    s.snap.network.adapter = Some(text_or_dash(rest));
}

fn network_tx(s: &mut Scan, rest: &str) {
    if let Some(mb) = first_number(rest) {
        s.snap.network.tx = Some(scale_mb(mb));
    }
}

fn network_rx(s: &mut Scan, rest: &str) {
    if let Some(mb) = first_number(rest) {
        s.snap.network.rx = Some(scale_mb(mb));
    }
}

fn network_ipv4(s: &mut Scan, rest: &str) {
    s.snap.network.ipv4 = Some(text_or_dash(rest));
}

fn network_ipv6(s: &mut Scan, rest: &str) {
    s.snap.network.ipv6 = Some(text_or_dash(rest));
}

fn system_uptime(s: &mut Scan, rest: &str) {
    s.snap.system.uptime = Some(text_or_dash(rest));
}

fn system_boot_time(s: &mut Scan, rest: &str) {
    s.snap.system.boot_time = Some(text_or_dash(rest));
}

fn system_load_average(s: &mut Scan, rest: &str) {
    s.snap.system.load_average = Some(text_or_dash(rest));
}

fn system_processes(s: &mut Scan, rest: &str) {
    s.snap.system.processes = Some(text_or_dash(rest));
}

fn smart_passed(s: &mut Scan, _: &str) {
    s.snap.smart.status = "PASSED".into();
}

fn smart_failed(s: &mut Scan, _: &str) {
    s.snap.smart.status = "FAILED".into();
}

fn smart_status(s: &mut Scan, rest: &str) {
    s.snap.smart.status = if rest.is_empty() {
        "unknown".into()
    } else {
        rest.to_string()
    };
}

/// A text marker with nothing after it still records a reading, as "-".
fn text_or_dash(rest: &str) -> String {
    if rest.is_empty() {
        "-".into()
    } else {
        rest.into()
    }
}

/// Scripts wrap readings in loose prose ("+53.0°C", "37.5%", "512 MB").
/// Pulls the first decimal number out, keeping a directly attached sign.
fn first_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digit_at = bytes.iter().position(|b| b.is_ascii_digit())?;
    let start = if digit_at > 0 && matches!(bytes[digit_at - 1], b'-' | b'+') {
        digit_at - 1
    } else {
        digit_at
    };
    let mut end = digit_at;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b if b.is_ascii_digit() => end += 1,
            b'.' if !seen_dot && end + 1 < bytes.len() && bytes[end + 1].is_ascii_digit() => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    text[start..end].parse().ok()
}

/// The script reports traffic counters in megabytes. Promote to GB once the
/// number reads better there.
fn scale_mb(mb: f64) -> String {
    if mb >= 1024.0 {
        format!("{:.2} GB", mb / 1024.0)
    } else {
        format!("{mb:.2} MB")
    }
}
