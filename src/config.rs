use crate::error::SceneResult;
use crate::renderer::{FrameFormat, RenderSettings};
use crate::style::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub encode: EncodeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RenderConfig {
    pub quality: Quality,
    pub output_dir: PathBuf,
    pub format: FrameFormat,
    /// Hex colour used to clear every frame
    pub background: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EncodeConfig {
    pub enabled: bool,
    pub codec: String,
}

/// Output presets, named after their command-line letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
pub enum Quality {
    /// 854x480 at 15 fps
    #[default]
    #[serde(rename = "l")]
    #[value(name = "l")]
    Low,
    /// 1280x720 at 30 fps
    #[serde(rename = "m")]
    #[value(name = "m")]
    Medium,
    /// 1920x1080 at 60 fps
    #[serde(rename = "h")]
    #[value(name = "h")]
    High,
    /// 3840x2160 at 60 fps
    #[serde(rename = "k")]
    #[value(name = "k")]
    Production,
}

impl Quality {
    /// (width, height, fps)
    pub fn resolution(self) -> (u32, u32, u32) {
        match self {
            Quality::Low => (854, 480, 15),
            Quality::Medium => (1280, 720, 30),
            Quality::High => (1920, 1080, 60),
            Quality::Production => (3840, 2160, 60),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig {
                quality: Quality::Low,
                output_dir: PathBuf::from("media"),
                format: FrameFormat::Ppm,
                background: "#000000".to_string(),
            },
            encode: EncodeConfig {
                enabled: true,
                codec: "libx264".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("render.quality", "l")?
            .set_default("render.output_dir", "media")?
            .set_default("render.format", "ppm")?
            .set_default("render.background", "#000000")?
            .set_default("encode.enabled", true)?
            .set_default("encode.codec", "libx264")?
            // Load from file if exists
            .add_source(config::File::with_name("code_explainer").required(false))
            // Allow env var overrides (e.g. CODE_EXPLAINER_RENDER__QUALITY=h)
            .add_source(
                config::Environment::with_prefix("CODE_EXPLAINER")
                    .prefix_separator("_")
                    .separator("__"),
            );

        builder.build()?.try_deserialize()
    }
}

impl RenderConfig {
    /// Resolve the preset and background into engine settings
    pub fn settings(&self) -> SceneResult<RenderSettings> {
        let (width, height, fps) = self.quality.resolution();
        Ok(RenderSettings {
            width,
            height,
            fps,
            background: Color::from_hex(&self.background)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BLACK;

    #[test]
    fn test_defaults_resolve() {
        let config = AppConfig::default();
        let settings = config.render.settings().unwrap();
        assert_eq!((settings.width, settings.height, settings.fps), (854, 480, 15));
        assert_eq!(settings.background, BLACK);
        assert!(config.encode.enabled);
    }

    #[test]
    fn test_quality_presets() {
        assert_eq!(Quality::Medium.resolution(), (1280, 720, 30));
        assert_eq!(Quality::High.resolution(), (1920, 1080, 60));
        assert_eq!(Quality::Production.resolution(), (3840, 2160, 60));
    }

    #[test]
    fn test_bad_background_is_rejected() {
        let mut config = AppConfig::default();
        config.render.background = "not-a-colour".to_string();
        assert!(config.render.settings().is_err());
    }

    #[test]
    fn test_parses_from_toml() {
        let config: AppConfig = toml::from_str(
            r##"
            [render]
            quality = "h"
            output_dir = "out"
            format = "png"
            background = "#101010"

            [encode]
            enabled = false
            codec = "libx265"
            "##,
        )
        .unwrap();

        assert_eq!(config.render.quality, Quality::High);
        assert_eq!(config.render.format, FrameFormat::Png);
        assert!(!config.encode.enabled);

        let round = toml::to_string(&config).unwrap();
        assert!(round.contains("quality = \"h\""));
    }
}
