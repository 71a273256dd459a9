//! Visual elements placed on the stage.

use crate::code::CodeBlock;
use crate::error::{SceneError, SceneResult};
use crate::geometry::{next_to_delta, Bounds, Frame, Point};
use crate::style::{Color, Style};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Glyph advance per font-size point, in scene units
pub const GLYPH_ADVANCE: f32 = 0.0075;
/// Line height per font-size point, in scene units
pub const LINE_HEIGHT: f32 = 0.014;

/// Handle to an element owned by a [`Timeline`](crate::renderer::Timeline)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ElementId(pub usize);

/// What an element is for. Drives stage audits, not drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Title,
    Code,
    Narration,
    Caption,
    Flash,
}

impl Role {
    /// Narration paragraphs and highlight captions share the caption slot below the code
    pub fn is_caption_slot(self) -> bool {
        matches!(self, Role::Narration | Role::Caption)
    }

    pub fn is_transient(self) -> bool {
        matches!(self, Role::Narration | Role::Caption | Role::Flash)
    }
}

/// One drawable character cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub line: usize,
    pub column: usize,
    pub bounds: Bounds,
    pub color: Color,
}

/// Lay out `lines` with the top-left corner at the origin. Whitespace gets no glyph.
pub(crate) fn layout_glyphs<F>(lines: &[String], font_size: f32, mut color_at: F) -> Vec<Glyph>
where
    F: FnMut(usize, usize) -> Color,
{
    let advance = GLYPH_ADVANCE * font_size;
    let line_height = LINE_HEIGHT * font_size;

    let mut glyphs = Vec::new();
    for (line, text) in lines.iter().enumerate() {
        for (column, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let center = Point::new(
                (column as f32 + 0.5) * advance,
                -(line as f32 + 0.5) * line_height,
            );
            glyphs.push(Glyph {
                ch,
                line,
                column,
                bounds: Bounds::new(center, advance * 0.8, line_height * 0.6),
                color: color_at(line, column),
            });
        }
    }
    glyphs
}

/// Box covering `lines` laid out by [`layout_glyphs`]
pub(crate) fn text_box(lines: &[String], font_size: f32) -> Bounds {
    let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = columns as f32 * GLYPH_ADVANCE * font_size;
    let height = lines.len() as f32 * LINE_HEIGHT * font_size;
    Bounds::new(Point::new(width / 2.0, -height / 2.0), width, height)
}

/// Layout operations shared by every element
pub trait Mobject {
    fn bounds(&self) -> Bounds;

    fn shift(&mut self, delta: Point);

    /// Scale about the element's own centre
    fn scale(&mut self, factor: f32);

    /// Number of drawn glyphs; drives write timing
    fn glyph_count(&self) -> usize;

    fn move_to(&mut self, target: Point) {
        let delta = target - self.bounds().center;
        self.shift(delta);
    }

    fn to_edge(&mut self, frame: &Frame, dir: Point, buff: f32) {
        let delta = frame.to_edge_delta(&self.bounds(), dir, buff);
        self.shift(delta);
    }

    fn next_to(&mut self, anchor: &Bounds, dir: Point, buff: f32) {
        let delta = next_to_delta(&self.bounds(), anchor, dir, buff);
        self.shift(delta);
    }
}

/// Plain text: a single label or a word-wrapped paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub content: String,
    pub lines: Vec<String>,
    pub style: Style,
    pub glyphs: Vec<Glyph>,
    bounds: Bounds,
}

impl TextBlock {
    /// Text kept on its own lines (explicit `\n` only), centred on the origin
    pub fn text(content: &str, style: Style) -> SceneResult<Self> {
        style.validate()?;
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        Self::from_lines(content, lines, style)
    }

    /// Text wrapped on word boundaries so no line is wider than `width`
    pub fn paragraph(content: &str, style: Style, width: f32) -> SceneResult<Self> {
        style.validate()?;
        let advance = GLYPH_ADVANCE * style.font_size;
        if !width.is_finite() || width < advance {
            return Err(SceneError::layout(format!(
                "paragraph width {} cannot fit a single glyph",
                width
            )));
        }
        let max_chars = (width / advance).floor() as usize;
        let lines = content
            .lines()
            .flat_map(|line| wrap_words(line, max_chars))
            .collect();
        Self::from_lines(content, lines, style)
    }

    fn from_lines(content: &str, lines: Vec<String>, style: Style) -> SceneResult<Self> {
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(SceneError::layout("text element has no visible characters"));
        }
        let color = style.color;
        let glyphs = layout_glyphs(&lines, style.font_size, |_, _| color);
        let bounds = text_box(&lines, style.font_size);
        let mut block = Self {
            content: content.to_string(),
            lines,
            style,
            glyphs,
            bounds,
        };
        block.move_to(Point::default());
        Ok(block)
    }
}

/// Greedy word wrap. Punctuation sticks to the preceding word.
fn wrap_words(line: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in line.split_word_bounds() {
        let len = piece.chars().count();
        let is_space = piece.chars().all(char::is_whitespace);
        let is_punct = !is_space && !piece.chars().any(char::is_alphanumeric);

        if is_space {
            if current_len > 0 && current_len + len <= max_chars {
                current.push_str(piece);
                current_len += len;
            }
            continue;
        }

        if current_len + len > max_chars && current_len > 0 && !is_punct {
            lines.push(current.trim_end().to_string());
            current.clear();
            current_len = 0;
        }
        current.push_str(piece);
        current_len += len;
    }

    if !current.trim().is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines
}

impl Mobject for TextBlock {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn shift(&mut self, delta: Point) {
        self.bounds = self.bounds.shifted(delta);
        for glyph in &mut self.glyphs {
            glyph.bounds = glyph.bounds.shifted(delta);
        }
    }

    fn scale(&mut self, factor: f32) {
        let about = self.bounds.center;
        self.bounds = self.bounds.scaled(factor, about);
        for glyph in &mut self.glyphs {
            glyph.bounds = glyph.bounds.scaled(factor, about);
        }
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// Stroked rectangle, used for highlight flashes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub bounds: Bounds,
    pub color: Color,
    pub stroke_width: f32,
    pub corner_radius: f32,
}

impl Outline {
    pub fn around(bounds: Bounds, color: Color, stroke_width: f32) -> Self {
        Self {
            bounds,
            color,
            stroke_width,
            corner_radius: 0.0,
        }
    }
}

impl Mobject for Outline {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn shift(&mut self, delta: Point) {
        self.bounds = self.bounds.shifted(delta);
    }

    fn scale(&mut self, factor: f32) {
        self.bounds = self.bounds.scaled(factor, self.bounds.center);
    }

    fn glyph_count(&self) -> usize {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Text(TextBlock),
    Code(CodeBlock),
    Outline(Outline),
}

impl Element {
    pub fn as_code(&self) -> Option<&CodeBlock> {
        match self {
            Element::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn as_code_mut(&mut self) -> Option<&mut CodeBlock> {
        match self {
            Element::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Element::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Mobject for Element {
    fn bounds(&self) -> Bounds {
        match self {
            Element::Text(t) => t.bounds(),
            Element::Code(c) => c.bounds(),
            Element::Outline(o) => o.bounds(),
        }
    }

    fn shift(&mut self, delta: Point) {
        match self {
            Element::Text(t) => t.shift(delta),
            Element::Code(c) => c.shift(delta),
            Element::Outline(o) => o.shift(delta),
        }
    }

    fn scale(&mut self, factor: f32) {
        match self {
            Element::Text(t) => t.scale(factor),
            Element::Code(c) => c.scale(factor),
            Element::Outline(o) => o.scale(factor),
        }
    }

    fn glyph_count(&self) -> usize {
        match self {
            Element::Text(t) => t.glyph_count(),
            Element::Code(c) => c.glyph_count(),
            Element::Outline(o) => o.glyph_count(),
        }
    }
}

impl From<TextBlock> for Element {
    fn from(value: TextBlock) -> Self {
        Element::Text(value)
    }
}

impl From<CodeBlock> for Element {
    fn from(value: CodeBlock) -> Self {
        Element::Code(value)
    }
}

impl From<Outline> for Element {
    fn from(value: Outline) -> Self {
        Element::Outline(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DOWN, UP};
    use crate::style::BLUE;

    #[test]
    fn test_text_is_centred() {
        let text = TextBlock::text("Hello world", Style::default()).unwrap();
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.glyph_count(), 10);
        let b = text.bounds();
        assert!(b.center.x.abs() < 1e-4 && b.center.y.abs() < 1e-4);
        assert!((b.width - 11.0 * GLYPH_ADVANCE * 48.0).abs() < 1e-4);
    }

    #[test]
    fn test_text_rejects_blank() {
        assert!(TextBlock::text("   ", Style::default()).is_err());
        assert!(TextBlock::text("x", Style::default().with_font_size(-2.0)).is_err());
    }

    #[test]
    fn test_paragraph_wraps_within_width() {
        let style = Style::default().with_font_size(20.0);
        let width = 3.0; // 20 glyphs at font size 20
        let para = TextBlock::paragraph(
            "The process_files function creates tasks for each file and processes them concurrently.",
            style,
            width,
        )
        .unwrap();
        assert!(para.lines.len() > 1);
        for line in &para.lines {
            assert!(line.chars().count() <= 20 || !line.contains(' '), "{line}");
        }
        assert!(para.lines.iter().any(|l| l.ends_with("concurrently.")));
        assert!(para.lines.iter().any(|l| l.contains("process_files")));
    }

    #[test]
    fn test_paragraph_rejects_tiny_width() {
        assert!(TextBlock::paragraph("abc", Style::default(), 0.01).is_err());
    }

    #[test]
    fn test_wrap_words_keeps_all_words() {
        let lines = wrap_words("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn test_layout_helpers() {
        let frame = Frame::default();
        let mut title = TextBlock::text("Title", Style::default().with_color(BLUE)).unwrap();
        title.to_edge(&frame, UP, 0.5);
        assert!((title.bounds().top() - 3.5).abs() < 1e-4);

        let mut below = TextBlock::text("below", Style::default()).unwrap();
        below.next_to(&title.bounds(), DOWN, 0.3);
        assert!((below.bounds().top() - (title.bounds().bottom() - 0.3)).abs() < 1e-4);
        assert!(below.glyphs.iter().all(|g| g.bounds.center.y < title.bounds().bottom()));
    }

    #[test]
    fn test_scale_keeps_centre() {
        let mut text = TextBlock::text("abc", Style::default()).unwrap();
        text.shift(Point::new(1.0, 1.0));
        let before = text.bounds();
        text.scale(0.5);
        let after = text.bounds();
        assert_eq!(before.center, after.center);
        assert!((after.width - before.width * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_roles() {
        assert!(Role::Narration.is_caption_slot());
        assert!(Role::Caption.is_caption_slot());
        assert!(!Role::Flash.is_caption_slot());
        assert!(Role::Flash.is_transient());
        assert!(!Role::Code.is_transient());
    }
}
