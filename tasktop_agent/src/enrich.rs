//! Auxiliary host queries layered over what the script reported.
//!
//! Four independent probes run concurrently: disk partitions (`df -h`), CPU
//! topology (`lscpu`), memory headroom (`free -h`), and host activity
//! (`uptime` plus `ps aux`). Each failure is logged and skipped; a probe
//! going dark never costs the fields the script already provided.

use tracing::warn;

use crate::exec::{run_with_limits, CommandOutput, ExecError, Limits};
use crate::settings;
use crate::types::{MetricsSnapshot, PartitionInfo};

/// Auxiliary commands are terse; anything past this is runaway output.
const AUX_OUTPUT_CAP: usize = 1024 * 1024;

/// Filesystems `df` lists that say nothing about real disks.
const VIRTUAL_FS: &[&str] = &["tmpfs", "devtmpfs"];

#[derive(Debug, Default)]
pub struct Enrichment {
    pub partitions: Vec<PartitionInfo>,
    pub cores: Option<String>,
    pub speed: Option<String>,
    pub ram_available: Option<String>,
    pub uptime: Option<String>,
    pub processes: Option<String>,
}

/// Runs all probes and collects whatever succeeded.
pub async fn gather() -> Enrichment {
    let (partitions, topology, ram_available, activity) = tokio::join!(
        query_partitions(),
        query_cpu_topology(),
        query_mem_available(),
        query_activity(),
    );
    let (cores, speed) = topology;
    let (uptime, processes) = activity;
    Enrichment {
        partitions,
        cores,
        speed,
        ram_available,
        uptime,
        processes,
    }
}

/// Merges probe results into the snapshot. Probe data wins over the script's
/// values for the fields it covers; absent results change nothing.
pub fn apply(snapshot: &mut MetricsSnapshot, found: Enrichment) {
    if !found.partitions.is_empty() {
        snapshot.disk.partitions = Some(found.partitions);
    }
    if found.cores.is_some() {
        snapshot.cpu.cores = found.cores;
    }
    if found.speed.is_some() {
        snapshot.cpu.speed = found.speed;
    }
    if found.ram_available.is_some() {
        snapshot.ram.available = found.ram_available;
    }
    if found.uptime.is_some() {
        snapshot.system.uptime = found.uptime;
    }
    if found.processes.is_some() {
        snapshot.system.processes = found.processes;
    }
}

async fn run_aux(program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
    let limits = Limits {
        timeout: settings::aux_timeout(),
        max_output_bytes: AUX_OUTPUT_CAP,
    };
    run_with_limits(program, args, &limits).await
}

async fn query_partitions() -> Vec<PartitionInfo> {
    match run_aux("df", &["-h"]).await {
        Ok(out) => parse_partitions(&out.stdout),
        Err(e) => {
            warn!("disk partition query failed: {e}");
            Vec::new()
        }
    }
}

async fn query_cpu_topology() -> (Option<String>, Option<String>) {
    match run_aux("lscpu", &[]).await {
        Ok(out) => parse_cpu_topology(&out.stdout),
        Err(e) => {
            warn!("cpu topology query failed: {e}");
            (None, None)
        }
    }
}

async fn query_mem_available() -> Option<String> {
    match run_aux("free", &["-h"]).await {
        Ok(out) => parse_mem_available(&out.stdout),
        Err(e) => {
            warn!("memory headroom query failed: {e}");
            None
        }
    }
}

/// Uptime and process count travel together; either can still land if the
/// other command fails.
async fn query_activity() -> (Option<String>, Option<String>) {
    let uptime = match run_aux("uptime", &[]).await {
        Ok(out) => parse_uptime(&out.stdout),
        Err(e) => {
            warn!("uptime query failed: {e}");
            None
        }
    };
    let processes = match run_aux("ps", &["aux"]).await {
        Ok(out) => Some(format!("{} total", out.stdout.lines().count())),
        Err(e) => {
            warn!("process count query failed: {e}");
            None
        }
    };
    (uptime, processes)
}

/// Rows from `df -h` output. Skips the header, virtual filesystems, and any
/// row too short to carry a mount point.
pub fn parse_partitions(df_output: &str) -> Vec<PartitionInfo> {
    let mut rows = Vec::new();
    for line in df_output.lines().skip(1) {
        if line.is_empty() || VIRTUAL_FS.iter().any(|fs| line.contains(fs)) {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 6 {
            continue;
        }
        let Ok(used_percent) = cols[4].trim_end_matches('%').parse::<f64>() else {
            continue;
        };
        rows.push(PartitionInfo {
            mount: cols[5].to_string(),
            total: cols[1].to_string(),
            used: cols[2].to_string(),
            available: cols[3].to_string(),
            used_percent,
        });
    }
    rows
}

/// Core count and clock speed from `lscpu` output. The core summary needs
/// both the per-socket count and the socket count; threads default to one
/// per core when the line is missing.
pub fn parse_cpu_topology(lscpu_output: &str) -> (Option<String>, Option<String>) {
    let mut cores_per_socket: Option<u64> = None;
    let mut threads_per_core: Option<u64> = None;
    let mut sockets: Option<u64> = None;
    let mut mhz: Option<f64> = None;
    for line in lscpu_output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Core(s) per socket" => cores_per_socket = value.parse().ok(),
            "Thread(s) per core" => threads_per_core = value.parse().ok(),
            "Socket(s)" => sockets = value.parse().ok(),
            "CPU MHz" => mhz = value.parse().ok(),
            _ => {}
        }
    }
    let cores = match (cores_per_socket, sockets) {
        (Some(per_socket), Some(sockets)) => {
            let physical = per_socket * sockets;
            let logical = physical * threads_per_core.unwrap_or(1);
            Some(format!("{physical} physical / {logical} logical"))
        }
        _ => None,
    };
    let speed = mhz.map(|m| format!("{:.1} GHz", m / 1000.0));
    (cores, speed)
}

/// Available memory from `free -h`: the last column of the `Mem:` row.
pub fn parse_mem_available(free_output: &str) -> Option<String> {
    let mem = free_output.lines().find(|l| l.starts_with("Mem:"))?;
    let mut cols = mem.split_whitespace();
    let _label = cols.next();
    cols.last().map(str::to_string)
}

/// The human-readable duration from `uptime`: text between "up " and the
/// first comma.
pub fn parse_uptime(uptime_output: &str) -> Option<String> {
    let (_, rest) = uptime_output.split_once("up ")?;
    let phrase = rest.split(',').next()?.trim();
    if phrase.is_empty() {
        None
    } else {
        Some(phrase.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_report;

    const DF_FIXTURE: &str = "\
Filesystem      Size  Used Avail Use% Mounted on
/dev/nvme0n1p2  468G  201G  244G  46% /
tmpfs            16G  1.2M   16G   1% /run
devtmpfs        7.8G     0  7.8G   0% /dev
/dev/sda1       1.8T  1.1T  680G  62% /data
/dev/sdb1       500G
";

    #[test]
    fn df_rows_skip_virtual_and_short_lines() {
        let rows = parse_partitions(DF_FIXTURE);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mount, "/");
        assert_eq!(rows[0].total, "468G");
        assert_eq!(rows[0].used, "201G");
        assert_eq!(rows[0].available, "244G");
        assert!((rows[0].used_percent - 46.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].mount, "/data");
    }

    #[test]
    fn df_rows_with_bad_percent_are_dropped() {
        let rows = parse_partitions(
            "Filesystem Size Used Avail Use% Mounted on\n/dev/sda1 10G 5G 5G ?? /\n",
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn lscpu_topology_combines_sockets_and_threads() {
        let text = "\
Architecture:        x86_64
Thread(s) per core:  2
Core(s) per socket:  8
Socket(s):           1
CPU MHz:             3600.000
";
        let (cores, speed) = parse_cpu_topology(text);
        assert_eq!(cores.as_deref(), Some("8 physical / 16 logical"));
        assert_eq!(speed.as_deref(), Some("3.6 GHz"));
    }

    #[test]
    fn lscpu_without_sockets_yields_no_core_summary() {
        let (cores, speed) = parse_cpu_topology("CPU MHz: 2400.000\n");
        assert!(cores.is_none());
        assert_eq!(speed.as_deref(), Some("2.4 GHz"));
    }

    #[test]
    fn free_available_is_the_last_mem_column() {
        let text = "\
              total        used        free      shared  buff/cache   available
Mem:           31Gi       4.2Gi        24Gi        85Mi       3.4Gi        26Gi
Swap:         8.0Gi          0B       8.0Gi
";
        assert_eq!(parse_mem_available(text).as_deref(), Some("26Gi"));
    }

    #[test]
    fn free_without_a_mem_row_yields_nothing() {
        assert!(parse_mem_available("Swap: 0 0 0\n").is_none());
        assert!(parse_mem_available("Mem:").is_none());
    }

    #[test]
    fn uptime_phrase_stops_at_the_first_comma() {
        let text = " 14:32:01 up 6 days,  3:14,  2 users,  load average: 0.42, 0.38, 0.35\n";
        assert_eq!(parse_uptime(text).as_deref(), Some("6 days"));
        assert_eq!(parse_uptime("up 2:11, 1 user").as_deref(), Some("2:11"));
        assert!(parse_uptime("no such phrase").is_none());
    }

    #[test]
    fn probe_results_overwrite_script_fields() {
        let mut snap = parse_report("CPU Cores: 4\nCPU Speed: 2.0 GHz\nUptime: 1 day\n");
        let found = Enrichment {
            cores: Some("8 physical / 16 logical".into()),
            speed: Some("3.6 GHz".into()),
            uptime: Some("6 days".into()),
            ..Enrichment::default()
        };
        apply(&mut snap, found);
        assert_eq!(snap.cpu.cores.as_deref(), Some("8 physical / 16 logical"));
        assert_eq!(snap.cpu.speed.as_deref(), Some("3.6 GHz"));
        assert_eq!(snap.system.uptime.as_deref(), Some("6 days"));
    }

    #[test]
    fn failed_probes_leave_script_fields_alone() {
        let mut snap = parse_report("CPU Cores: 4\nCPU Speed: 2.0 GHz\n");
        apply(&mut snap, Enrichment::default());
        assert_eq!(snap.cpu.cores.as_deref(), Some("4"));
        assert_eq!(snap.cpu.speed.as_deref(), Some("2.0 GHz"));
        assert!(snap.disk.partitions.is_none());
    }
}
