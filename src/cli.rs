//! Command-line interface definitions for portscan.
//!
//! Uses `clap` derive macros for declarative argument parsing. Values left
//! unset on the command line fall back to the settings file, then to the
//! built-in defaults.

use crate::config::AppSettings;
use crate::error::CliResult;
use crate::pipeline::{ScanConfig, DEFAULT_HOST};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Try to open TCP connections to a range of ports on a host.
#[derive(Parser, Debug)]
#[command(name = "portscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP connect port scanner", long_about = None)]
pub struct Args {
    /// Host or IP to scan
    #[arg(value_name = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port ranges to scan, e.g. 80 443 200-1000 [default: 22-9999]
    #[arg(value_name = "PORTS")]
    pub ports: Vec<String>,

    /// Timeout per port (e.g. "1s", "500ms", "2m"; a bare number is milliseconds) [default: 1s]
    #[arg(short = 't', long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Number of concurrent workers [default: 100]
    #[arg(short = 'c', long)]
    pub threads: Option<usize>,

    /// Show errors for failed ports
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTSCAN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Load the settings file named by `--config`, or the default one.
    pub fn load_settings(&self) -> CliResult<AppSettings> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };
        Ok(settings)
    }

    /// Merge the arguments over `settings` into a validated scan configuration.
    pub fn into_config(self, settings: &AppSettings) -> CliResult<ScanConfig> {
        let ports = if self.ports.is_empty() {
            settings.ports.clone()
        } else {
            self.ports
        };

        let config = ScanConfig::new(self.host)
            .with_ports(ports)
            .with_timeout(
                self.timeout
                    .unwrap_or(Duration::from_millis(settings.timeout_ms)),
            )
            .with_threads(self.threads.unwrap_or(settings.threads))
            .with_verbose(self.verbose || settings.verbose);

        config.validate()?;
        Ok(config)
    }
}

/// Parse a timeout such as `"1s"`, `"250ms"`, `"2m"` or `"1500"` (milliseconds).
pub fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (value, unit) = s.split_at(split);

    let value: u64 = value
        .parse()
        .map_err(|_| format!("invalid timeout: {:?}", s))?;

    let duration = match unit {
        "" | "ms" => Duration::from_millis(value),
        "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        "us" | "µs" => Duration::from_micros(value),
        "ns" => Duration::from_nanos(value),
        _ => return Err(format!("invalid timeout unit {:?} in {:?}", unit, s)),
    };
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("portscan").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_timeout_units() {
        assert_eq!(parse_timeout("1s"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_timeout("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_timeout("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_timeout("1500"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_timeout("10us"), Ok(Duration::from_micros(10)));
    }

    #[test]
    fn test_parse_timeout_rejects_garbage() {
        assert!(parse_timeout("").is_err());
        assert!(parse_timeout("s").is_err());
        assert!(parse_timeout("1x").is_err());
        assert!(parse_timeout("-1s").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).into_config(&AppSettings::default()).unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_positional_host_and_ports() {
        let args = parse(&["example.com", "80", "443", "200-1000", "-v", "--threads", "8"]);
        assert_eq!(args.host, "example.com");
        assert_eq!(args.ports, vec!["80", "443", "200-1000"]);

        let config = args.into_config(&AppSettings::default()).unwrap();
        assert_eq!(config.ports, vec!["80", "443", "200-1000"]);
        assert_eq!(config.threads, 8);
        assert!(config.verbose);
    }

    #[test]
    fn test_cli_overrides_settings() {
        let settings = AppSettings {
            threads: 20,
            timeout_ms: 300,
            verbose: true,
            ports: vec!["1-10".into()],
        };

        let config = parse(&[]).into_config(&settings).unwrap();
        assert_eq!(config.threads, 20);
        assert_eq!(config.timeout, Duration::from_millis(300));
        assert_eq!(config.ports, vec!["1-10"]);
        assert!(config.verbose);

        let config = parse(&["h", "22", "--timeout", "2s", "-c", "5"])
            .into_config(&settings)
            .unwrap();
        assert_eq!(config.threads, 5);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.ports, vec!["22"]);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = parse(&["--threads", "0"])
            .into_config(&AppSettings::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_bad_range_token_is_not_a_cli_error() {
        let config = parse(&["localhost", "abc-90"])
            .into_config(&AppSettings::default())
            .unwrap();
        assert_eq!(config.ports, vec!["abc-90"]);
    }
}
