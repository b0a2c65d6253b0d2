//! Entry point for the tasktop agent. Parses args and serves the metrics API.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tasktop_agent::http::router;
use tasktop_agent::settings;
use tasktop_agent::state::AppState;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug)]
struct ParsedArgs {
    port: Option<u16>,
    script: Option<PathBuf>,
    bind: Option<IpAddr>,
}

fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--port PORT | -p PORT] [--script FILE | -s FILE] [--bind ADDR]")
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "tasktop_agent".to_string());
    let mut port: Option<u16> = None;
    let mut script: Option<PathBuf> = None;
    let mut bind: Option<IpAddr> = None;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--port" | "-p" => port = it.next().and_then(|v| v.parse().ok()),
            "--script" | "-s" => script = it.next().map(PathBuf::from),
            "--bind" => bind = it.next().and_then(|v| v.parse().ok()),
            _ if arg.starts_with("--port=") => {
                port = arg.split_once('=').and_then(|(_, v)| v.parse().ok());
            }
            _ if arg.starts_with("--script=") => {
                script = arg.split_once('=').map(|(_, v)| PathBuf::from(v));
            }
            _ if arg.starts_with("--bind=") => {
                bind = arg.split_once('=').and_then(|(_, v)| v.parse().ok());
            }
            _ => return Err(format!("Unexpected argument: {arg}\n{}", usage(&prog))),
        }
    }
    Ok(ParsedArgs { port, script, bind })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let parsed = match parse_args(std::env::args()) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let script = parsed.script.unwrap_or_else(settings::default_script);
    let state = Arc::new(AppState::new(script));
    let app = router(state.clone());

    let ip = parsed.bind.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let addr = SocketAddr::new(ip, parsed.port.unwrap_or(DEFAULT_PORT));
    info!(
        "tasktop agent listening on http://{addr} (script: {})",
        state.script.display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tasktop_agent")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn long_and_short_flags_parse() {
        let parsed = parse_args(args(&["--port", "9000", "--script", "x.sh"])).unwrap();
        assert_eq!(parsed.port, Some(9000));
        assert_eq!(parsed.script.as_deref(), Some(std::path::Path::new("x.sh")));

        let parsed = parse_args(args(&["-p", "9001", "-s", "y.sh"])).unwrap();
        assert_eq!(parsed.port, Some(9001));
        assert_eq!(parsed.script.as_deref(), Some(std::path::Path::new("y.sh")));
    }

    #[test]
    fn equals_forms_parse() {
        let parsed = parse_args(args(&["--port=9002", "--script=z.sh"])).unwrap();
        assert_eq!(parsed.port, Some(9002));
        assert_eq!(parsed.script.as_deref(), Some(std::path::Path::new("z.sh")));
    }

    #[test]
    fn bind_address_parses() {
        let parsed = parse_args(args(&["--bind", "127.0.0.1"])).unwrap();
        assert_eq!(parsed.bind, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        let parsed = parse_args(args(&["--bind=::1"])).unwrap();
        assert_eq!(parsed.bind, Some("::1".parse::<IpAddr>().unwrap()));
        let parsed = parse_args(args(&["--bind", "not-an-ip"])).unwrap();
        assert_eq!(parsed.bind, None);
    }

    #[test]
    fn bad_port_values_fall_back_to_default() {
        let parsed = parse_args(args(&["--port", "not-a-port"])).unwrap();
        assert_eq!(parsed.port, None);
        let parsed = parse_args(args(&["--port", "99999"])).unwrap();
        assert_eq!(parsed.port, None);
    }

    #[test]
    fn help_and_unknown_args_return_usage() {
        assert!(parse_args(args(&["--help"])).unwrap_err().contains("Usage:"));
        assert!(parse_args(args(&["--frobnicate"]))
            .unwrap_err()
            .contains("Usage:"));
    }
}
