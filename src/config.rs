use crate::gui::dial::{DEFAULT_HANDLE_SIZE, DEFAULT_TEXT_SIZE};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// A `#rgb` / `#rrggbb` color as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn rgb(&self) -> Srgb<u8> {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(s.trim())
            .map(Self)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.0.into_components();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DialConfig {
    pub padding: f64,
    pub text_size: f64,
    pub handle_size: f64,
    pub handle_icon: Option<PathBuf>,
    pub width: i32,
    pub height: i32,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            padding: 0.0,
            text_size: DEFAULT_TEXT_SIZE,
            handle_size: DEFAULT_HANDLE_SIZE,
            handle_icon: None,
            width: 400,
            height: 400,
        }
    }
}

/// Unset colors fall back to the GTK theme.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ColorConfig {
    pub background: Option<HexColor>,
    pub light: Option<HexColor>,
    pub dark: Option<HexColor>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dial: DialConfig,
    #[serde(default)]
    pub colors: ColorConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Invalid color '{0}', expected #rgb or #rrggbb")]
    InvalidColor(String),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "ringtimer").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("RINGTIMER").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(path) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Failed to write default config: {}", e),
        }
    }

    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parsing() {
        let cases = vec![
            ("\"#ffffff\"", (255, 255, 255)),
            ("\"#FFF\"", (255, 255, 255)),
            ("\"#1e1e1e\"", (30, 30, 30)),
            ("\"7f7f7f\"", (127, 127, 127)),
        ];

        for (json, (r, g, b)) in cases {
            let color: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(color.rgb(), Srgb::new(r, g, b));
        }
    }

    #[test]
    fn test_invalid_hex_color_is_rejected() {
        assert!(serde_json::from_str::<HexColor>("\"#zzzzzz\"").is_err());
        assert!(matches!(
            "not a color".parse::<HexColor>(),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_hex_color_display_round_trips() {
        let color: HexColor = "#0a0b0c".parse().unwrap();
        assert_eq!(color.to_string(), "#0a0b0c");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r##"{"dial": {"padding": 12.0}, "colors": {"light": "#eeeeee"}}"##)
                .unwrap();

        assert_eq!(config.dial.padding, 12.0);
        assert_eq!(config.dial.text_size, DEFAULT_TEXT_SIZE);
        assert_eq!(config.dial.width, 400);
        assert!(config.dial.handle_icon.is_none());
        assert!(config.colors.background.is_none());
        assert_eq!(config.colors.light.map(|c| c.rgb()), Some(Srgb::new(238, 238, 238)));
    }

    #[test]
    fn test_default_config_file_parses() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap();
        let config: Config = s.try_deserialize().unwrap();

        assert_eq!(config.dial.text_size, DEFAULT_TEXT_SIZE);
        assert!(config.colors.dark.is_some());
    }
}
