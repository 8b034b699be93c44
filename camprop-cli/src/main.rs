use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use camprop_sdk::{DeviceCatalog, SdkConfig};
use clap::{Parser, Subcommand};
use tracing::{error, info};

pub mod commands;
pub mod output;
pub mod value_arg;

const DEFAULT_STATE_TIMEOUT_MS: u64 = 4000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// camprop - capture-device property tool
///
/// Lists, reads and writes the properties of a video-capture device. Devices
/// come from a JSON profile catalog, or the built-in simulated cameras when
/// none is configured.
#[derive(Parser, Debug)]
#[command(name = "camprop")]
#[command(about = "List, read and write capture-device properties")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Serial of the device to open (default: first in catalog)
    #[arg(long, global = true)]
    pub serial: Option<String>,

    /// Device profile catalog (JSON array of profiles)
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Maximum wait for a lifecycle transition, in milliseconds [default: 4000]
    #[arg(long, global = true)]
    pub state_timeout_ms: Option<u64>,

    /// Log level (error, warn, info, debug, trace) [default: info]
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Do not start the device before get/set/trigger/demo
    #[arg(long, global = true)]
    pub no_start: bool,

    /// Print descriptors as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List devices in the catalog
    Devices,
    /// List the properties visible on the device
    List {
        /// Start the device first, revealing software-emulated properties
        #[arg(long)]
        active: bool,
    },
    /// Print one property
    Get { name: String },
    /// Write one property
    Set { name: String, value: String },
    /// Fire a button property
    Trigger { name: String },
    /// List properties across both lifecycle states
    Survey,
    /// Disable auto exposure and gain, then set brightness to 200
    Demo,
}

impl Args {
    /// Fill unset options from environment variables
    ///
    /// Explicit command-line options win over the environment, which wins
    /// over the built-in defaults.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if self.serial.is_none() {
            self.serial = lookup("CAMPROP_SERIAL");
        }

        if self.profile.is_none() {
            self.profile = lookup(camprop_sdk::ENV_PROFILE).map(PathBuf::from);
        }

        if self.state_timeout_ms.is_none() {
            if let Some(timeout) = lookup(camprop_sdk::ENV_STATE_TIMEOUT_MS) {
                self.state_timeout_ms = Some(
                    timeout
                        .trim()
                        .parse()
                        .context("Invalid CAMPROP_STATE_TIMEOUT_MS environment variable")?,
                );
            }
        }

        if self.log_level.is_none() {
            self.log_level = lookup("CAMPROP_LOG_LEVEL");
        }

        Ok(())
    }

    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.state_timeout_ms == Some(0) {
            return Err(anyhow::anyhow!("State timeout must be positive"));
        }

        if let Some(level) = &self.log_level {
            match level.to_lowercase().as_str() {
                "error" | "warn" | "info" | "debug" | "trace" => {}
                _ => {
                    return Err(anyhow::anyhow!(
                        "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                        level
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments and environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub serial: Option<String>,
    pub sdk: SdkConfig,
    pub log_level: String,
    pub auto_start: bool,
    pub json: bool,
}

impl TryFrom<&Args> for Config {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self> {
        let mut sdk = SdkConfig::default().with_state_timeout(Duration::from_millis(
            args.state_timeout_ms.unwrap_or(DEFAULT_STATE_TIMEOUT_MS),
        ));
        if let Some(path) = &args.profile {
            sdk = sdk.with_profile_path(path);
        }
        sdk.validate().context("Invalid SDK configuration")?;

        Ok(Self {
            serial: args.serial.clone(),
            sdk,
            log_level: args
                .log_level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            auto_start: !args.no_start,
            json: args.json,
        })
    }
}

impl Config {
    /// Create configuration from command line arguments and environment variables
    pub fn from_env(args: &mut Args) -> Result<Self> {
        args.apply_env(|key| std::env::var(key).ok())?;
        args.validate()?;
        Config::try_from(&*args)
    }

    pub fn print_summary(&self) {
        info!("Configuration:");
        info!("  Serial: {}", self.serial.as_deref().unwrap_or("<first>"));
        info!("  State timeout: {:?}", self.sdk.state_timeout);
        match &self.sdk.profile_path {
            Some(path) => info!("  Profiles: {}", path.display()),
            None => info!("  Profiles: default"),
        }
        info!("  Auto start: {}", self.auto_start);
    }
}

/// Initialize tracing/logging with the specified log level
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = match log_level.to_lowercase().as_str() {
        "error" => "error",
        "warn" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

fn run(command: &Command, config: &Config, out: &mut dyn Write) -> Result<()> {
    let catalog: DeviceCatalog = config.sdk.catalog().context("Failed to load device catalog")?;

    match command {
        Command::Devices => commands::devices(&catalog, out),
        Command::List { active } => commands::list(config, &catalog, *active, out),
        Command::Get { name } => commands::get(config, &catalog, name, out),
        Command::Set { name, value } => commands::set(config, &catalog, name, value, out),
        Command::Trigger { name } => commands::trigger(config, &catalog, name, out),
        Command::Survey => commands::survey(config, &catalog, out),
        Command::Demo => commands::demo(config, &catalog, out),
    }
}

fn main() -> Result<()> {
    let mut args = Args::parse();
    let config = Config::from_env(&mut args).context("Failed to parse configuration")?;

    init_tracing(&config.log_level).context("Failed to initialize logging")?;
    config.print_summary();

    camprop_sdk::initialize().context("Failed to initialize SDK")?;

    let stdout = std::io::stdout();
    let result = run(&args.command, &config, &mut stdout.lock());

    camprop_sdk::shutdown();

    if let Err(e) = result {
        error!("camprop failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("camprop").chain(argv.iter().copied())).unwrap()
    }

    #[rstest]
    #[case(&["devices"], Command::Devices)]
    #[case(&["list"], Command::List { active: false })]
    #[case(&["list", "--active"], Command::List { active: true })]
    #[case(&["get", "Brightness"], Command::Get { name: "Brightness".to_string() })]
    #[case(
        &["set", "Exposure Auto", "Off"],
        Command::Set { name: "Exposure Auto".to_string(), value: "Off".to_string() }
    )]
    #[case(&["trigger", "Software Trigger"], Command::Trigger { name: "Software Trigger".to_string() })]
    #[case(&["survey"], Command::Survey)]
    #[case(&["demo"], Command::Demo)]
    fn test_subcommands(#[case] argv: &[&str], #[case] expected: Command) {
        assert_eq!(parse(argv).command, expected);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = parse(&["get", "Gain", "--serial", "46810320", "--no-start"]);
        assert_eq!(args.serial.as_deref(), Some("46810320"));
        assert!(args.no_start);
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["demo"]);
        let config = Config::try_from(&args).unwrap();
        assert_eq!(config.sdk.state_timeout, Duration::from_millis(4000));
        assert_eq!(config.log_level, "info");
        assert!(config.auto_start);
        assert!(config.serial.is_none());
    }

    #[test]
    fn test_env_fills_unset_options() {
        let mut args = parse(&["list"]);
        args.apply_env(env(&[
            ("CAMPROP_SERIAL", "46810320"),
            ("CAMPROP_STATE_TIMEOUT_MS", "250"),
            ("CAMPROP_LOG_LEVEL", "debug"),
            ("CAMPROP_PROFILE", "/tmp/devices.json"),
        ]))
        .unwrap();

        let config = Config::try_from(&args).unwrap();
        assert_eq!(config.serial.as_deref(), Some("46810320"));
        assert_eq!(config.sdk.state_timeout, Duration::from_millis(250));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.sdk.profile_path, Some(PathBuf::from("/tmp/devices.json")));
    }

    #[test]
    fn test_command_line_wins_over_env() {
        let mut args = parse(&["list", "--serial", "27710767", "--state-timeout-ms", "900"]);
        args.apply_env(env(&[
            ("CAMPROP_SERIAL", "46810320"),
            ("CAMPROP_STATE_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(args.serial.as_deref(), Some("27710767"));
        assert_eq!(args.state_timeout_ms, Some(900));
    }

    #[test]
    fn test_invalid_env_timeout() {
        let mut args = parse(&["list"]);
        assert!(args
            .apply_env(env(&[("CAMPROP_STATE_TIMEOUT_MS", "soon")]))
            .is_err());
    }

    #[rstest]
    #[case(&["list", "--log-level", "loud"])]
    #[case(&["list", "--state-timeout-ms", "0"])]
    fn test_validate_rejects(#[case] argv: &[&str]) {
        assert!(parse(argv).validate().is_err());
    }
}
