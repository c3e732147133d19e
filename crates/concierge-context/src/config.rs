//! Agent configuration.
//!
//! Loaded from TOML.  Per-skill settings live under `[skills.<skill-id>]`:
//!
//! ```toml
//! agent_id = "concierge"
//! fetch_timeout_secs = 5
//!
//! [data]
//! menu = "data/menu.json"
//!
//! [skills.show-menu]
//! not_found_message = "The menu is not available right now."
//!
//! [skills.show-menu.context]
//! header = "Today's menu."
//! instructions = ["Recommend dishes when asked."]
//! reminder = "Only mention items listed above."
//! currency = { code = "EUR", locale = "de-DE" }
//! category_names = [
//!     { key = "appetizers", label = "STARTERS" },
//!     { key = "mains", label = "MAINS" },
//! ]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ContextError, ContextResult};
use crate::formatter::FormatterConfig;

/// Default bound on a single data fetch.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Settings for one skill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSettings {
    /// Formatter config for data-backed context.
    pub context: Option<FormatterConfig>,
    /// Message returned when a catalog skill finds no data.
    pub not_found_message: Option<String>,
}

/// Paths of the catalog data files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub menu: Option<PathBuf>,
    pub wellness: Option<PathBuf>,
}

/// Configuration of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub agent_id: String,
    pub fetch_timeout_secs: u64,
    pub data: DataPaths,
    pub skills: HashMap<String, SkillSettings>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_id: "concierge".into(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            data: DataPaths::default(),
            skills: HashMap::new(),
        }
    }
}

impl AgentConfig {
    pub fn from_toml_str(text: &str) -> ContextResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`.  Relative data paths are resolved against the
    /// project root when the file lives in a `config/` directory, and
    /// against the file's own directory otherwise.
    pub fn load(path: &Path) -> ContextResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.resolve_data_paths(&base_dir(path));
        info!(path = %path.display(), agent_id = %config.agent_id, "agent config loaded");
        Ok(config)
    }

    /// Like [`AgentConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> ContextResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn resolve_data_paths(&mut self, base: &Path) {
        for slot in [&mut self.data.menu, &mut self.data.wellness] {
            if let Some(p) = slot
                && p.is_relative()
            {
                *p = base.join(&*p);
            }
        }
    }

    /// Formatter config for `skill_id`, if any.
    pub fn context_for(&self, skill_id: &str) -> Option<&FormatterConfig> {
        self.skills.get(skill_id)?.context.as_ref()
    }

    pub fn not_found_message(&self, skill_id: &str) -> Option<&str> {
        self.skills.get(skill_id)?.not_found_message.as_deref()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    pub fn with_skill_context(
        mut self,
        skill_id: impl Into<String>,
        context: FormatterConfig,
    ) -> Self {
        self.skills.entry(skill_id.into()).or_default().context = Some(context);
        self
    }
}

fn base_dir(config_path: &Path) -> PathBuf {
    let dir = config_path.parent().unwrap_or(Path::new(""));
    match (dir.file_name(), dir.parent()) {
        (Some(name), Some(root)) if name == "config" => root.to_path_buf(),
        _ => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;

    const SAMPLE: &str = r#"
agent_id = "front-desk"
fetch_timeout_secs = 2

[data]
menu = "data/menu.json"

[skills.show-menu]
not_found_message = "Kitchen closed"

[skills.show-menu.context]
header = "Menu."
instructions = ["Be brief."]
reminder = "Only listed items."
currency = { code = "EUR", locale = "de-DE" }
category_names = [
    { key = "appetizers", label = "STARTERS" },
    { key = "mains", label = "MAINS" },
]
"#;

    #[test]
    fn parses_skill_tables() {
        let c = AgentConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(c.agent_id, "front-desk");
        assert_eq!(c.fetch_timeout(), Duration::from_secs(2));
        assert_eq!(c.not_found_message("show-menu"), Some("Kitchen closed"));

        let ctx = c.context_for("show-menu").unwrap();
        assert_eq!(ctx.currency, Currency::new("EUR", "de-DE"));
        assert_eq!(ctx.category_names[0].label, "STARTERS");
        assert_eq!(ctx.category_names[1].key, "mains");
        // Unset fields keep their defaults.
        assert_eq!(ctx.section_header, FormatterConfig::default().section_header);

        assert!(c.context_for("show-wellness").is_none());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AgentConfig::from_toml_str("").unwrap(), AgentConfig::default());
        assert!(AgentConfig::from_toml_str("fetch_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn data_paths_resolve_against_project_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("config")).unwrap();
        let path = dir.path().join("config").join("default.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let c = AgentConfig::load(&path).unwrap();
        assert_eq!(c.data.menu, Some(dir.path().join("data/menu.json")));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = AgentConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(c, AgentConfig::default());
        assert!(AgentConfig::load(&dir.path().join("nope.toml")).is_err());
    }
}
