use crate::code::highlight::Theme;
use crate::error::{SceneError, SceneResult};
use serde::{Deserialize, Serialize};

/// RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> SceneResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(SceneError::invalid_style(format!(
                "colour '{}' is not #RRGGBB or #RRGGBBAA",
                hex
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| SceneError::invalid_style(format!("colour '{}' is not hex", hex)))
        };

        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Multiply the alpha channel by `factor` in `[0, 1]`
    pub fn fade(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        self.with_alpha((self.a as f32 * factor).round() as u8)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
pub const GREY: Color = Color::rgb(0x88, 0x88, 0x88);
pub const BLUE: Color = Color::rgb(0x58, 0xC4, 0xDD);
pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
pub const RED: Color = Color::rgb(0xFC, 0x62, 0x55);
pub const GREEN: Color = Color::rgb(0x83, 0xC1, 0x67);

/// Style options recognised by every text-like element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Color,
    pub font_size: f32,
    #[serde(default)]
    pub stroke_width: f32,
    #[serde(default)]
    pub stroke_color: Option<Color>,
    #[serde(default)]
    pub corner_radius: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: WHITE,
            font_size: 48.0,
            stroke_width: 0.0,
            stroke_color: None,
            corner_radius: 0.0,
        }
    }
}

impl Style {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke_color = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(SceneError::invalid_style(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(SceneError::invalid_style(format!(
                "stroke width must be >= 0, got {}",
                self.stroke_width
            )));
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(SceneError::invalid_style(format!(
                "corner radius must be >= 0, got {}",
                self.corner_radius
            )));
        }
        Ok(())
    }
}

/// Frame drawn behind a code block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CodeBackground {
    /// Rounded window with a title bar and three buttons
    #[default]
    Window,
    Rectangle,
}

/// Options for a syntax-highlighted code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeStyle {
    pub language: String,
    pub font_size: f32,
    pub tab_width: usize,
    pub background: CodeBackground,
    pub insert_line_no: bool,
    pub theme: Theme,
    pub background_stroke_width: f32,
    pub background_stroke_color: Color,
    pub corner_radius: f32,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            language: "python".into(),
            font_size: 24.0,
            tab_width: 3,
            background: CodeBackground::Rectangle,
            insert_line_no: true,
            theme: Theme::Monokai,
            background_stroke_width: 1.0,
            background_stroke_color: WHITE,
            corner_radius: 0.0,
        }
    }
}

impl CodeStyle {
    pub fn validate(&self) -> SceneResult<()> {
        if !self.language.eq_ignore_ascii_case("python") {
            return Err(SceneError::invalid_style(format!(
                "unsupported code language '{}'",
                self.language
            )));
        }
        if self.tab_width == 0 {
            return Err(SceneError::invalid_style("tab width must be at least 1"));
        }
        Style {
            color: WHITE,
            font_size: self.font_size,
            stroke_width: self.background_stroke_width,
            stroke_color: Some(self.background_stroke_color),
            corner_radius: self.corner_radius,
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#58C4DD").unwrap(), BLUE);
        assert_eq!(Color::from_hex("ffff00").unwrap(), YELLOW);
        assert_eq!(Color::from_hex("#00000080").unwrap().a, 0x80);
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(Color::from_hex("#123").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_fade() {
        assert_eq!(WHITE.fade(0.5).a, 128);
        assert_eq!(WHITE.fade(2.0).a, 255);
        assert_eq!(WHITE.fade(-1.0).a, 0);
    }

    #[test]
    fn test_style_validation() {
        assert!(Style::default().validate().is_ok());
        assert!(Style::default().with_font_size(0.0).validate().is_err());
        assert!(Style::default().with_stroke(WHITE, -1.0).validate().is_err());
        assert!(Style::default()
            .with_corner_radius(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_code_style_validation() {
        assert!(CodeStyle::default().validate().is_ok());

        let style = CodeStyle {
            language: "rust".into(),
            ..CodeStyle::default()
        };
        assert!(style.validate().is_err());

        let style = CodeStyle {
            tab_width: 0,
            ..CodeStyle::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_color_serde_default_alpha() {
        let color: Color = serde_json::from_str(r#"{"r": 1, "g": 2, "b": 3}"#).unwrap();
        assert_eq!(color.to_rgba(), [1, 2, 3, 255]);
    }
}
