pub mod structured_console_encoder;

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::{Context, anyhow};
use log::{debug, info};
use log4rs::{
    Config,
    config::{Deserializers, RawConfig},
};

use crate::log::structured_console_encoder::StructuredConsoleEncoderDeserializer;

/// Environment variable naming an external log4rs file.
pub const LOG_CONFIG_ENV: &str = "JMRPC_LOG_CONFIG";
const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";
const REVEAL_PII_ENV: &str = "JMRPC_REVEAL_PII";

fn deserializers() -> Deserializers {
    let mut deserializers = Deserializers::default();
    deserializers.insert("structured_console", StructuredConsoleEncoderDeserializer);
    deserializers
}

/// Path of the external logging configuration, if one should be used.
fn external_config() -> Option<PathBuf> {
    let path = std::env::var_os(LOG_CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_CONFIG));
    path.exists().then_some(path)
}

/// Initializes logging for the `jmrpc` binary.
///
/// Uses the file named by `JMRPC_LOG_CONFIG`, else `log4rs.yml` in the
/// working directory, else the embedded defaults. The library itself only
/// emits records and never calls this.
pub fn init_logging() -> anyhow::Result<()> {
    if let Some(path) = external_config() {
        return init_from_file(&path);
    }

    let raw_config: RawConfig = serde_yaml::from_str(include_str!("../../resources/default_log4rs.yml"))
        .context("Embedded logging configuration is invalid YAML")?;
    let config = build_config(raw_config)?;
    log4rs::init_config(config).context("Failed to initialize logging from embedded config")?;

    debug!("Logging initialized from embedded defaults");
    Ok(())
}

fn init_from_file(path: &Path) -> anyhow::Result<()> {
    log4rs::init_file(path, deserializers())
        .with_context(|| format!("Failed to load logging configuration {}", path.display()))?;
    info!(path:% = path.display(); "Logging initialized from external configuration");
    Ok(())
}

fn build_config(raw_config: RawConfig) -> anyhow::Result<Config> {
    let (appenders, errors) = raw_config.appenders_lossy(&deserializers());
    if !errors.is_empty() {
        return Err(anyhow!("Errors parsing embedded appenders: {:?}", errors));
    }
    Config::builder()
        .appenders(appenders)
        .loggers(raw_config.loggers())
        .build(raw_config.root())
        .context("Failed to build logging config")
}

fn reveal_pii() -> bool {
    static REVEAL_PII_CACHE: OnceLock<bool> = OnceLock::new();

    *REVEAL_PII_CACHE.get_or_init(|| {
        std::env::var(REVEAL_PII_ENV)
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false)
    })
}

/// Shortens a bearer token or address to its first and last six characters.
/// Values of twelve characters or fewer are hidden entirely.
pub fn mask_string(s: &str) -> String {
    if reveal_pii() {
        return s.to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn mask_amount(amount_sats: u64) -> String {
    if reveal_pii() {
        return amount_sats.to_string();
    }

    "<REDACTED>".to_string()
}
