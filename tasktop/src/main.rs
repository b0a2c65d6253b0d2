//! Entry point for the tasktop TUI. Parses args and runs the App.

use std::env;
use std::io::{self, Write};

use tasktop::app::App;
use tasktop::profiles::{
    load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile,
};

#[derive(Debug)]
struct ParsedArgs {
    url: Option<String>,
    profile: Option<String>,
    save: bool,
    demo: bool,
    dry_run: bool,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--profile NAME|-P NAME] [--save] [--demo] [--dry-run] [http://HOST:PORT]"
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "tasktop".into());
    let mut url: Option<String> = None;
    let mut profile: Option<String> = None;
    let mut save = false; // --save
    let mut demo = false; // --demo
    let mut dry_run = false; // --dry-run

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--profile" | "-P" => {
                profile = it.next();
            }
            "--save" => {
                save = true;
            }
            "--demo" => {
                demo = true;
            }
            "--dry-run" => {
                dry_run = true;
            }
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        profile = Some(v.to_string());
                    }
                }
            }
            _ => {
                if url.is_none() {
                    url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
            }
        }
    }
    Ok(ParsedArgs {
        url,
        profile,
        save,
        demo,
        dry_run,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reuse the same parsing logic for testability
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    // Demo mode short-circuit ("demo" is also a reserved profile name)
    if parsed.demo || matches!(parsed.profile.as_deref(), Some("demo")) {
        if parsed.dry_run {
            eprintln!("Dry run: would start a local demo agent.");
            return Ok(());
        }
        return run_demo_mode().await;
    }

    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
    };
    let resolved = req.resolve(&profiles_file);

    // Determine the final URL (and maybe mutated profiles to persist)
    let mut profiles_mut = profiles_file.clone();
    let url: String = match resolved {
        ResolveProfile::Direct(u) => {
            // Possibly save if a profile was named alongside the URL
            if let Some(name) = parsed.profile.as_ref() {
                match profiles_mut.profiles.get(name) {
                    None => {
                        // New profile: auto-save immediately
                        profiles_mut
                            .profiles
                            .insert(name.clone(), ProfileEntry { url: u.clone() });
                        save_profiles(&profiles_mut)?;
                    }
                    Some(entry) if entry.url != u => {
                        let overwrite = parsed.save
                            || (!parsed.dry_run
                                && prompt_yes_no(&format!(
                                    "Overwrite existing profile '{name}'? [y/N]: "
                                )));
                        if overwrite {
                            profiles_mut
                                .profiles
                                .insert(name.clone(), ProfileEntry { url: u.clone() });
                            save_profiles(&profiles_mut)?;
                        }
                    }
                    Some(_) => {}
                }
            }
            u
        }
        ResolveProfile::Loaded(u) => u,
        ResolveProfile::PromptSelect(mut names) => {
            if parsed.dry_run {
                eprintln!("Dry run: {} saved profile(s), nothing selected.", names.len());
                return Ok(());
            }
            // Always offer demo as a way to try the dashboard out
            if !names.iter().any(|n| n == "demo") {
                names.push("demo".into());
            }
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Ok(idx) = line.trim().parse::<usize>() else {
                return Ok(());
            };
            if idx < 1 || idx > names.len() {
                return Ok(());
            }
            let name = &names[idx - 1];
            if name == "demo" {
                return run_demo_mode().await;
            }
            match profiles_mut.profiles.get(name) {
                Some(entry) => entry.url.clone(),
                None => return Ok(()),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            if parsed.dry_run {
                eprintln!("Dry run: profile '{name}' does not exist.");
                return Ok(());
            }
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT): ")?;
            if url.trim().is_empty() {
                return Ok(());
            }
            profiles_mut.profiles.insert(
                name.clone(),
                ProfileEntry {
                    url: url.trim().to_string(),
                },
            );
            save_profiles(&profiles_mut)?;
            url.trim().to_string()
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            eprintln!("{}", usage("tasktop"));
            return Ok(());
        }
    };

    if parsed.dry_run {
        eprintln!("Dry run: would connect to {url}");
        return Ok(());
    }

    let mut app = App::new(url);
    app.run().await
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// --- Demo Mode ---

async fn run_demo_mode() -> Result<(), Box<dyn std::error::Error>> {
    let port = 3231;
    let url = format!("http://127.0.0.1:{port}");
    let child = spawn_demo_agent(port)?;
    // Use select to handle Ctrl-C and normal quit
    let mut app = App::new(url);
    tokio::select! {
        res = app.run() => { drop(child); res }
        _ = tokio::signal::ctrl_c() => {
            // Drop child (kills agent) then return
            drop(child);
            Ok(())
        }
    }
}

struct DemoGuard(std::sync::Arc<std::sync::Mutex<Option<std::process::Child>>>);

impl Drop for DemoGuard {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.0.lock() {
            if let Some(mut ch) = slot.take() {
                let _ = ch.kill();
                let _ = ch.wait();
            }
        }
    }
}

/// Synthetic report so the demo needs no real host tooling. Readings jitter
/// via $RANDOM to keep the charts moving.
const DEMO_SCRIPT: &str = r#"#!/bin/bash
cpu_util=$((20 + RANDOM % 60))
cpu_temp=$((45 + RANDOM % 20))
ram_used=$((30 + RANDOM % 40))
gpu_util=$((10 + RANDOM % 80))
gpu_temp=$((50 + RANDOM % 25))
sent=$((100 + RANDOM % 900))
recv=$((200 + RANDOM % 1800))
echo "CPU Model: Demo CPU (8) @ 3.20GHz"
echo "CPU Cores: 4 physical / 8 logical"
echo "CPU Speed: 3.2 GHz"
echo "CPU Utilization: ${cpu_util}.25%"
echo "CPU Temperature: +${cpu_temp}.0°C"
echo "Total RAM: 16G"
echo "Free RAM: 8.2G"
echo "Utilized RAM: ${ram_used}.50%"
echo "GPU: Demo GPU 4000"
echo "GPU Utilization: ${gpu_util}%"
echo "GPU Temperature: ${gpu_temp}°C"
echo "Total Disk Space: 512G"
echo "Used Disk Space: 281G"
echo "Available Disk Space: 231G"
echo "Network Adapter Model: Demo Ethernet I225-V"
echo "Sent: ${sent} MB"
echo "Received: ${recv} MB"
echo "IPV4 Address: 192.168.1.42"
echo "IPV6 Address: fe80::1"
echo "Uptime: up 3 days, 4 hours, 12 minutes"
echo "Startup time: 2024-01-01 08:00:00"
echo "Processes: 237 total"
echo "SMART Status: PASSED"
"#;

fn write_demo_script() -> io::Result<std::path::PathBuf> {
    let path = env::temp_dir().join("tasktop-demo.sh");
    std::fs::write(&path, DEMO_SCRIPT)?;
    Ok(path)
}

fn spawn_demo_agent(port: u16) -> Result<DemoGuard, Box<dyn std::error::Error>> {
    let script = write_demo_script()?;
    let candidate = find_agent_executable();
    let mut cmd = std::process::Command::new(candidate);
    cmd.arg("--port").arg(port.to_string());
    cmd.arg("--script").arg(&script);
    let child = cmd.spawn()?;
    // Give the agent a brief moment to start
    std::thread::sleep(std::time::Duration::from_millis(300));
    Ok(DemoGuard(std::sync::Arc::new(std::sync::Mutex::new(Some(
        child,
    )))))
}

fn find_agent_executable() -> std::path::PathBuf {
    let self_exe = std::env::current_exe().ok();
    if let Some(exe) = self_exe {
        if let Some(parent) = exe.parent() {
            #[cfg(windows)]
            let name = "tasktop_agent.exe";
            #[cfg(not(windows))]
            let name = "tasktop_agent";
            let candidate = parent.join(name);
            if candidate.exists() {
                return candidate;
            }
        }
    }
    // Fallback to relying on PATH
    std::path::PathBuf::from("tasktop_agent")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(list: &[&str]) -> Vec<String> {
        std::iter::once("tasktop")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_profile_and_url() {
        let parsed = parse_args(argv(&["--profile", "home", "http://host:3000"])).unwrap();
        assert_eq!(parsed.profile.as_deref(), Some("home"));
        assert_eq!(parsed.url.as_deref(), Some("http://host:3000"));
        assert!(!parsed.save);
        assert!(!parsed.demo);
    }

    #[test]
    fn parses_equals_form_and_flags() {
        let parsed = parse_args(argv(&["--profile=lab", "--save", "--dry-run"])).unwrap();
        assert_eq!(parsed.profile.as_deref(), Some("lab"));
        assert!(parsed.save);
        assert!(parsed.dry_run);
        assert!(parsed.url.is_none());
    }

    #[test]
    fn rejects_second_positional() {
        let err = parse_args(argv(&["http://a", "http://b"])).unwrap_err();
        assert!(err.contains("Unexpected argument"));
    }

    #[test]
    fn help_is_usage_error() {
        let err = parse_args(argv(&["--help"])).unwrap_err();
        assert!(err.starts_with("Usage:"));
    }

    #[test]
    fn short_profile_flag() {
        let parsed = parse_args(argv(&["-P", "demo"])).unwrap();
        assert_eq!(parsed.profile.as_deref(), Some("demo"));
    }

    // The agent only scans known markers, so every demo line has to use one.
    #[test]
    fn demo_script_emits_the_disk_markers_the_agent_scans() {
        assert!(DEMO_SCRIPT.contains("Total Disk Space:"));
        assert!(DEMO_SCRIPT.contains("Used Disk Space:"));
        assert!(DEMO_SCRIPT.contains("Available Disk Space:"));
        assert!(!DEMO_SCRIPT.contains("Free Disk Space:"));
        assert!(!DEMO_SCRIPT.contains("Utilized Disk Space:"));
    }
}
