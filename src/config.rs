use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from ftl-report.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub paths: PathsConfig,
    pub extract: ExtractConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `<ftl>-para-j<job>.out` logs and their CSVs.
    pub output_dir: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ExtractConfig {
    /// Reject logs whose metric counts differ instead of truncating.
    pub strict_alignment: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
        }
    }
}

/// Load config from `path`, or defaults when the file is absent or unparsable.
pub fn load_config(path: &Path) -> ReportConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(cfg) => {
                tracing::debug!(path = %path.display(), "loaded config");
                cfg
            }
            Err(e) => {
                tracing::warn!("failed to parse {}: {e}", path.display());
                ReportConfig::default()
            }
        },
        Err(_) => ReportConfig::default(),
    }
}
