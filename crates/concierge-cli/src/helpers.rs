//! Shared helper functions used across CLI subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use concierge_context::AgentConfig;
use concierge_skills::SkillResponse;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the agent config file.
pub const CONFIG_ENV: &str = "CONCIERGE_CONFIG";

/// Config file used when neither the flag nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Pick the config path: explicit flag, then `$CONCIERGE_CONFIG`, then the
/// default location.
pub fn resolve_config_path(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load the agent config.  A missing default file is not an error; a
/// missing file the user asked for is.
pub fn load_agent_config(flag: Option<PathBuf>) -> Result<AgentConfig> {
    let explicit = flag.is_some() || env_non_empty(CONFIG_ENV).is_some();
    let path = resolve_config_path(flag, env_non_empty(CONFIG_ENV));
    ensure_file(&path)?;

    if explicit {
        AgentConfig::load(&path)
            .with_context(|| format!("failed to load agent config from {}", path.display()))
    } else {
        AgentConfig::load_or_default(&path)
            .with_context(|| format!("failed to load agent config from {}", path.display()))
    }
}

/// Read a non-empty environment variable.
pub fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Arguments and output
// ---------------------------------------------------------------------------

/// Parse an optional JSON command-line value.
pub fn parse_json_arg(label: &str, raw: Option<&str>) -> Result<Option<Value>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("--{label} is not valid JSON"))?;
    Ok(Some(value))
}

/// Pretty-print a response envelope.
pub fn render_response(response: &SkillResponse) -> Result<String> {
    serde_json::to_string_pretty(&response.to_value()).context("failed to serialize response")
}

/// Fail if `path` exists but is not a file.
pub fn ensure_file(path: &Path) -> Result<()> {
    if path.exists() && !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    Ok(())
}
