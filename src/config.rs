//! Configuration loader - YAML settings + .env overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::grid::GridStyle;
use crate::layout::{LayoutStyle, Quadrant};
use crate::scene::LayoutPreset;

/// Main configuration loaded from numeral_order.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub background: String,
    pub layout: LayoutStyle,
    pub grid: GridStyle,
    pub palette: PaletteConfig,
    /// Where `<language>.json` files live: a directory or an http(s) base URL
    pub data_source: String,
    pub languages: Vec<LanguageConfig>,
    pub presets: Vec<LayoutPreset>,
    pub default_preset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Frames per second while waiting for data
    pub frame_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub base_colors: Vec<String>,
    pub shades: usize,
}

/// A language and the locale its words are collated with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub code: String,
    pub locale: String,
}

/// Overrides loaded from .env
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub data_dir: Option<String>,
    pub numbers_url: Option<String>,
    pub log_dir: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            frame_rate: 20,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            base_colors: ["#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            shades: 4,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let language = |code: &str, locale: &str| LanguageConfig {
            code: code.to_string(),
            locale: locale.to_string(),
        };
        let preset = |name: &str, codes: [&str; 4]| LayoutPreset {
            name: name.to_string(),
            quadrants: Quadrant::ALL
                .into_iter()
                .zip(codes)
                .map(|(q, code)| (q, vec![code.to_string()]))
                .collect::<BTreeMap<_, _>>(),
        };

        Self {
            canvas: CanvasConfig::default(),
            background: "#222222".to_string(),
            layout: LayoutStyle::default(),
            grid: GridStyle::default(),
            palette: PaletteConfig::default(),
            data_source: "data/numbers".to_string(),
            languages: vec![
                language("english", "en"),
                language("spanish", "es"),
                language("french", "fr"),
                language("german", "de"),
                language("swedish", "sv"),
                language("norwegian", "nb"),
                language("danish", "da"),
                language("finnish", "fi"),
            ],
            presets: vec![
                preset("classic", ["english", "spanish", "french", "german"]),
                preset("nordic", ["swedish", "norwegian", "danish", "finnish"]),
            ],
            default_preset: "classic".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply .env overrides
    pub fn with_env(mut self, env: &Env) -> Self {
        if let Some(url) = &env.numbers_url {
            self.data_source = url.clone();
        } else if let Some(dir) = &env.data_dir {
            self.data_source = dir.clone();
        }
        self
    }

    /// Get language by code
    pub fn get_language(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|l| l.code == code)
    }

    pub fn language_codes(&self) -> Vec<String> {
        self.languages.iter().map(|l| l.code.clone()).collect()
    }
}

impl Env {
    /// Load overrides from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Env {
            data_dir: std::env::var("DATA_DIR").ok(),
            numbers_url: std::env::var("NUMBERS_URL").ok(),
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        }
    }
}
