use std::path::PathBuf;

use anyhow::Context;
use seqer_core::EditorConfig;

#[derive(serde::Serialize, serde::Deserialize, Default)]
pub(crate) struct CliConfig {
    #[serde(default)]
    pub editor: EditorConfig,
}

pub(crate) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("seqer")
        .join("config.toml")
}

/// Missing file means defaults; a malformed one is an error
pub(crate) fn load_config() -> anyhow::Result<CliConfig> {
    let path = config_path();
    let Ok(text) = std::fs::read_to_string(&path) else {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(CliConfig::default());
    };
    let config: CliConfig = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.editor.validate()?;
    Ok(config)
}

pub(crate) fn save_config(config: &CliConfig) -> anyhow::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, toml::to_string_pretty(config)?)?;
    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}
