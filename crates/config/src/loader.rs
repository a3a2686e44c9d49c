use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::DrapeConfig};

/// File stem every discovered config file shares.
const CONFIG_STEM: &str = "drape";

/// Supported file formats, in discovery preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    const EXTENSIONS: &'static [(&'static str, Self)] = &[
        ("toml", Self::Toml),
        ("yaml", Self::Yaml),
        ("yml", Self::Yaml),
        ("json", Self::Json),
    ];

    /// Extensionless paths are read as TOML.
    fn of(path: &Path) -> anyhow::Result<Self> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok(Self::Toml);
        };
        Self::EXTENSIONS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, format)| *format)
            .ok_or_else(|| anyhow::anyhow!("unsupported config format: .{ext}"))
    }

    fn parse(self, raw: &str) -> anyhow::Result<DrapeConfig> {
        Ok(match self {
            Self::Toml => toml::from_str(raw)?,
            Self::Yaml => serde_yaml::from_str(raw)?,
            Self::Json => serde_json::from_str(raw)?,
        })
    }
}

/// Load config from the given path, substituting `${VAR}` references first.
pub fn load_config(path: &Path) -> anyhow::Result<DrapeConfig> {
    let format = Format::of(path)?;
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    format.parse(&substitute_env(&raw))
}

/// Discover and load config from the working directory, then the user config
/// directory. Falls back to defaults when nothing is found or the file found
/// does not parse.
pub fn discover_and_load() -> DrapeConfig {
    discover().0
}

/// Load from an explicit path when given, otherwise discover.
///
/// An explicit path that fails to load is an error, not a fallback to defaults.
pub fn load_or_discover(
    explicit: Option<&Path>,
) -> anyhow::Result<(DrapeConfig, Option<PathBuf>)> {
    match explicit {
        Some(path) => Ok((load_config(path)?, Some(path.to_path_buf()))),
        None => Ok(discover()),
    }
}

/// First config file found in the standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    dirs.extend(config_dir());
    find_config_file_in(&dirs)
}

/// Returns the user-global config directory (`~/.config/drape/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", CONFIG_STEM).map(|d| d.config_dir().to_path_buf())
}

fn find_config_file_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| {
            Format::EXTENSIONS
                .iter()
                .map(move |(ext, _)| dir.join(format!("{CONFIG_STEM}.{ext}")))
        })
        .find(|candidate| candidate.is_file())
}

fn discover() -> (DrapeConfig, Option<PathBuf>) {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return (DrapeConfig::default(), None);
    };
    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            (DrapeConfig::default(), Some(path))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drape.toml");
        std::fs::write(&path, "[routing]\nclassifier_timeout_secs = 5\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.routing.classifier_timeout_secs, 5);
    }

    #[test]
    fn loads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drape.yml");
        std::fs::write(&path, "classifier:\n  model: local-mini\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.classifier.model, "local-mini");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drape.ini");
        std::fs::write(&path, "").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_or_discover(Some(&missing)).is_err());
    }

    #[test]
    fn discovery_prefers_earlier_dirs_then_toml() {
        let local = tempfile::tempdir().unwrap();
        let global = tempfile::tempdir().unwrap();
        std::fs::write(global.path().join("drape.toml"), "").unwrap();
        let dirs = [local.path().to_path_buf(), global.path().to_path_buf()];

        assert_eq!(
            find_config_file_in(&dirs),
            Some(global.path().join("drape.toml"))
        );

        std::fs::write(local.path().join("drape.json"), "{}").unwrap();
        std::fs::write(local.path().join("drape.yaml"), "").unwrap();
        assert_eq!(
            find_config_file_in(&dirs),
            Some(local.path().join("drape.yaml"))
        );
    }

    #[test]
    fn discovery_skips_directories_named_like_configs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("drape.toml")).unwrap();
        assert_eq!(find_config_file_in(&[dir.path().to_path_buf()]), None);
    }
}
