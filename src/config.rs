use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default holdings CSV file, relative to the data directory.
fn default_holdings_file() -> PathBuf {
    PathBuf::from("holdings.csv")
}

/// Quote provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Yahoo Finance chart API.
    #[default]
    Yahoo,
    /// No live lookups; every ticker resolves as absent.
    None,
}

/// Quote provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file location.
    /// If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    /// Holdings CSV file. If relative, resolved from the data directory.
    #[serde(default = "default_holdings_file")]
    pub holdings_file: PathBuf,

    /// Quote provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            holdings_file: default_holdings_file(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to `config_dir`.
    /// If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }

    /// Resolve the holdings file path relative to the data directory.
    pub fn resolve_holdings_file(&self, data_dir: &Path) -> PathBuf {
        if self.holdings_file.is_absolute() {
            self.holdings_file.clone()
        } else {
            data_dir.join(&self.holdings_file)
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The resolved data directory path.
    pub data_dir: PathBuf,

    /// The resolved holdings CSV path.
    pub holdings_file: PathBuf,

    /// Quote provider settings.
    pub provider: ProviderConfig,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./foliostat.toml` if it exists in current directory
/// 2. `~/.local/share/foliostat/foliostat.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("foliostat.toml");
    if local_config.exists() {
        return local_config;
    }

    // XDG data directory fallback
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("foliostat").join("foliostat.toml");
    }

    // Final fallback to local
    local_config
}

impl ResolvedConfig {
    /// Load and resolve config from a file path.
    ///
    /// The data directory is resolved relative to the config file's parent directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        let data_dir = config.resolve_data_dir(config_dir);
        let holdings_file = config.resolve_holdings_file(&data_dir);

        Ok(Self {
            data_dir,
            holdings_file,
            provider: config.provider,
        })
    }

    /// Load config, creating a default if the file doesn't exist.
    ///
    /// If the config file doesn't exist, uses the config file's intended
    /// parent directory as the data directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            // Resolve the config path relative to current directory
            let config_path = if config_path.is_relative() {
                std::env::current_dir()
                    .context("Failed to get current directory")?
                    .join(config_path)
            } else {
                config_path.to_path_buf()
            };

            // Use the intended config directory as data dir
            let config_dir = config_path
                .parent()
                .context("Config path has no parent directory")?;

            let config = Config::default();
            let holdings_file = config.resolve_holdings_file(config_dir);

            Ok(Self {
                data_dir: config_dir.to_path_buf(),
                holdings_file,
                provider: config.provider,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_data_dir_is_config_dir() {
        let config = Config::default();
        let config_dir = Path::new("/home/user/portfolio");
        assert_eq!(
            config.resolve_data_dir(config_dir),
            PathBuf::from("/home/user/portfolio")
        );
    }

    #[test]
    fn test_relative_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("data")),
            ..Default::default()
        };
        let config_dir = Path::new("/home/user/portfolio");
        assert_eq!(
            config.resolve_data_dir(config_dir),
            PathBuf::from("/home/user/portfolio/data")
        );
    }

    #[test]
    fn test_absolute_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/var/foliostat/data")),
            ..Default::default()
        };
        let config_dir = Path::new("/home/user/portfolio");
        assert_eq!(
            config.resolve_data_dir(config_dir),
            PathBuf::from("/var/foliostat/data")
        );
    }

    #[test]
    fn test_holdings_file_defaults_inside_data_dir() {
        let config = Config::default();
        let data_dir = Path::new("/var/foliostat/data");
        assert_eq!(
            config.resolve_holdings_file(data_dir),
            PathBuf::from("/var/foliostat/data/holdings.csv")
        );
    }

    #[test]
    fn test_absolute_holdings_file() {
        let config = Config {
            holdings_file: PathBuf::from("/exports/degiro.csv"),
            ..Default::default()
        };
        let data_dir = Path::new("/var/foliostat/data");
        assert_eq!(
            config.resolve_holdings_file(data_dir),
            PathBuf::from("/exports/degiro.csv")
        );
    }

    #[test]
    fn test_load_config() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("foliostat.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "data_dir = \"./my-data\"")?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.data_dir, Some(PathBuf::from("./my-data")));

        Ok(())
    }

    #[test]
    fn test_load_empty_config() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("foliostat.toml");

        std::fs::File::create(&config_path)?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.data_dir, None);
        assert_eq!(config.holdings_file, PathBuf::from("holdings.csv"));
        assert_eq!(config.provider.kind, ProviderKind::Yahoo);

        Ok(())
    }

    #[test]
    fn test_load_provider_config() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("foliostat.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "[provider]")?;
        writeln!(file, "kind = \"none\"")?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.provider.kind, ProviderKind::None);

        Ok(())
    }

    #[test]
    fn test_config_load_or_default_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("missing.toml");

        let config = Config::load_or_default(&config_path)?;
        assert_eq!(config.data_dir, None);
        assert_eq!(config.provider.kind, ProviderKind::Yahoo);

        Ok(())
    }

    #[test]
    fn test_resolved_config_load_or_default_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("foliostat.toml");

        let resolved = ResolvedConfig::load_or_default(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path());
        assert_eq!(resolved.holdings_file, dir.path().join("holdings.csv"));

        Ok(())
    }

    #[test]
    fn test_resolved_config_resolves_relative_data_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("foliostat.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "data_dir = \"./data\"")?;

        let resolved = ResolvedConfig::load(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path().join("data"));
        assert_eq!(
            resolved.holdings_file,
            dir.path().join("data").join("holdings.csv")
        );

        Ok(())
    }
}
