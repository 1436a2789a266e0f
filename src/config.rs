use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const DEFAULT_MOUNT_CLASS: &str = "player-skin";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub skin: SkinConfig,
    pub fetch: FetchConfig,
    pub logging: LogConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join("player-skin.toml"));
            candidates.push(current_dir.join("config").join("player-skin.toml"));
        }

        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("player-skin.toml"));
                candidates.push(dir.join("config").join("player-skin.toml"));
            }
        }

        Self::load_first(&candidates)
    }

    pub fn load_first(candidates: &[PathBuf]) -> anyhow::Result<Self> {
        for path in candidates {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Config::default())
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> anyhow::Result<Self> {
        let doc: ConfigDocument = toml::from_str(data)?;
        Ok(doc.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkinConfig {
    /// Class added to every mount element.
    pub mount_class: String,
    pub default_album_cover: String,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            mount_class: DEFAULT_MOUNT_CLASS.to_string(),
            default_album_cover: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    /// Used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".logs"),
            file_prefix: "player-skin".to_string(),
            filter: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    skin: SkinSection,
    #[serde(default)]
    fetch: FetchSection,
    #[serde(default)]
    logging: LoggingSection,
}

impl From<ConfigDocument> for Config {
    fn from(value: ConfigDocument) -> Self {
        let skin_defaults = SkinConfig::default();
        let fetch_defaults = FetchConfig::default();
        let log_defaults = LogConfig::default();

        Config {
            skin: SkinConfig {
                mount_class: value.skin.mount_class.unwrap_or(skin_defaults.mount_class),
                default_album_cover: value
                    .skin
                    .default_album_cover
                    .unwrap_or(skin_defaults.default_album_cover),
            },
            fetch: FetchConfig {
                base_url: value.fetch.base_url,
                timeout_secs: value.fetch.timeout_secs.unwrap_or(fetch_defaults.timeout_secs),
            },
            logging: LogConfig {
                directory: value.logging.directory.unwrap_or(log_defaults.directory),
                file_prefix: value.logging.file_prefix.unwrap_or(log_defaults.file_prefix),
                filter: value.logging.filter,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SkinSection {
    mount_class: Option<String>,
    default_album_cover: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FetchSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingSection {
    directory: Option<PathBuf>,
    file_prefix: Option<String>,
    filter: Option<String>,
}
