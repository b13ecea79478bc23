use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::str::FromStr as _;

use crate::color::Color;

#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub ui: UiConfig,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
            ui: UiConfig::default(),
            log_level: LogLevel(log::LevelFilter::Info),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: Cow<'static, str>,
    pub instance_name: Cow<'static, str>,
    pub class_name: Cow<'static, str>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: Cow::Borrowed("WaveDock"),
            instance_name: Cow::Borrowed("wavedock"),
            class_name: Cow::Borrowed("WaveDock"),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub num_widgets: usize,
    pub widget_size: f64,
    pub num_anim: usize,
    pub zoom_factor: f64,
    pub jump_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Wave,
            num_widgets: 7,
            widget_size: 32.0,
            num_anim: 3,
            zoom_factor: 1.8,
            jump_factor: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Wave,
    Coverflow,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    pub bar_background: Color,
    pub widget_background: Color,
    pub pressed_widget_background: Color,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bar_background: Color::from_rgba(0x21272bc0),
            widget_background: Color::from_rgb(0x1c95e6),
            pressed_widget_background: Color::from_rgb(0xe8eaeb),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LogLevel(log::LevelFilter);

impl From<LogLevel> for log::LevelFilter {
    fn from(log_level: LogLevel) -> Self {
        log_level.0
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match log::LevelFilter::from_str(&s) {
            Ok(level_filter) => Ok(LogLevel(level_filter)),
            Err(error) => Err(de::Error::custom(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let yaml_string = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.yml"));
        let config: Config = serde_yaml::from_str(&yaml_string).unwrap();
        pretty_assertions::assert_eq!(config, Config::default(),);
    }

    #[test]
    fn test_layout_mode_names() {
        let config: LayoutConfig = serde_yaml::from_str("mode: coverflow").unwrap();
        assert_eq!(config.mode, LayoutMode::Coverflow);
        assert!(serde_yaml::from_str::<LayoutConfig>("mode: carousel").is_err());
    }
}
