//! Syntax-highlighted code blocks and text-region lookup.

pub mod highlight;

use crate::error::SceneResult;
use crate::geometry::{Bounds, Point};
use crate::mobject::{layout_glyphs, text_box, Glyph, Mobject, GLYPH_ADVANCE, LINE_HEIGHT};
use crate::style::{CodeBackground, CodeStyle, Color};
use highlight::{tokenize_line, Token};
use serde::{Deserialize, Serialize};

/// Padding between the code text and the background edge, per font-size point
const PADDING: f32 = 0.0125;
/// Height of the window title bar, per font-size point
const TITLE_BAR: f32 = 0.025;

/// Line/column position in the normalized source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

/// Located sub-range of a code block. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub start: LineCol,
    pub end: LineCol,
    pub bounds: Bounds,
}

impl Region {
    pub fn contains(&self, at: LineCol) -> bool {
        self.start <= at && at < self.end
    }
}

/// Stroke applied to a region from a given timeline step onwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStroke {
    pub region: Region,
    pub color: Color,
    pub width: f32,
    pub from_step: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeLine {
    pub text: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Source after tab expansion and blank-edge trimming
    pub source: String,
    pub lines: Vec<CodeLine>,
    pub style: CodeStyle,
    pub glyphs: Vec<Glyph>,
    pub background: Bounds,
    /// Height of the window title bar in scene units (zero for plain backgrounds)
    pub title_bar: f32,
    pub strokes: Vec<RegionStroke>,
    /// Scale factor applied so far; stroke widths follow it
    pub scale_factor: f32,
}

impl CodeBlock {
    pub fn new(source: &str, style: CodeStyle) -> SceneResult<Self> {
        style.validate()?;

        let source = normalize_source(source, style.tab_width);
        let raw_lines: Vec<String> = source.lines().map(str::to_string).collect();
        let lines: Vec<CodeLine> = raw_lines
            .iter()
            .map(|text| CodeLine {
                tokens: tokenize_line(text),
                text: text.clone(),
            })
            .collect();

        let gutter = if style.insert_line_no {
            lines.len().max(1).to_string().len() + 1
        } else {
            0
        };

        let theme = style.theme;
        let mut glyphs = layout_glyphs(&raw_lines, style.font_size, |line, column| {
            lines[line]
                .tokens
                .iter()
                .find(|t| t.start <= column && column < t.end)
                .map(|t| theme.color(t.kind))
                .unwrap_or_else(|| theme.color(highlight::TokenKind::Text))
        });

        let advance = GLYPH_ADVANCE * style.font_size;
        let line_height = LINE_HEIGHT * style.font_size;
        let gutter_shift = Point::new(gutter as f32 * advance, 0.0);
        for glyph in &mut glyphs {
            glyph.bounds = glyph.bounds.shifted(gutter_shift);
        }
        if style.insert_line_no {
            glyphs.extend(line_number_glyphs(lines.len(), gutter, advance, line_height));
        }

        let text_bounds = text_box(&raw_lines, style.font_size);
        let text_bounds = Bounds::new(
            text_bounds.center + gutter_shift * 0.5,
            text_bounds.width + gutter_shift.x,
            text_bounds.height.max(line_height),
        );

        let pad = PADDING * style.font_size;
        let title_bar = match style.background {
            CodeBackground::Window => TITLE_BAR * style.font_size,
            CodeBackground::Rectangle => 0.0,
        };
        let padded = text_bounds.padded(pad);
        let background = Bounds::new(
            padded.center + Point::new(0.0, title_bar / 2.0),
            padded.width,
            padded.height + title_bar,
        );

        let mut block = Self {
            source,
            lines,
            style,
            glyphs,
            background,
            title_bar,
            strokes: Vec::new(),
            scale_factor: 1.0,
        };
        block.move_to(Point::default());
        Ok(block)
    }

    /// Find the first verbatim occurrence of `needle` in the source.
    ///
    /// Blank needles never match. Multi-line needles are allowed.
    pub fn find_region(&self, needle: &str) -> Option<Region> {
        if needle.trim().is_empty() {
            return None;
        }
        let byte = self.source.find(needle)?;
        let start = line_col_at(&self.source, byte);
        let end = line_col_at(&self.source, byte + needle.len());

        let bounds = Bounds::enclosing(
            self.glyphs
                .iter()
                .filter(|g| !self.is_gutter(g))
                .filter(|g| {
                    let at = LineCol {
                        line: g.line,
                        column: g.column,
                    };
                    start <= at && at < end
                })
                .map(|g| g.bounds),
        )?;

        Some(Region { start, end, bounds })
    }

    /// Stroke `region` from timeline step `from_step` onwards
    pub fn set_region_stroke(&mut self, region: &Region, color: Color, width: f32, from_step: usize) {
        self.strokes.push(RegionStroke {
            region: region.clone(),
            color,
            width,
            from_step,
        });
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn is_gutter(&self, glyph: &Glyph) -> bool {
        glyph.column == GUTTER_COLUMN
    }
}

/// Glyph column used for line-number digits so they never match a region
const GUTTER_COLUMN: usize = usize::MAX;

fn line_number_glyphs(count: usize, gutter: usize, advance: f32, line_height: f32) -> Vec<Glyph> {
    let digits_width = gutter.saturating_sub(1);
    let mut glyphs = Vec::new();
    for line in 0..count {
        let label = format!("{:>width$}", line + 1, width = digits_width);
        for (i, ch) in label.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let center = Point::new(
                (i as f32 + 0.5) * advance,
                -(line as f32 + 0.5) * line_height,
            );
            glyphs.push(Glyph {
                ch,
                line,
                column: GUTTER_COLUMN,
                bounds: Bounds::new(center, advance * 0.8, line_height * 0.6),
                color: Color::rgb(0x90, 0x90, 0x8A),
            });
        }
    }
    glyphs
}

fn normalize_source(source: &str, tab_width: usize) -> String {
    let expanded: Vec<String> = source
        .lines()
        .map(|line| expand_tabs(line.trim_end(), tab_width))
        .collect();

    let first = expanded.iter().position(|l| !l.trim().is_empty());
    let last = expanded.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => expanded[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn expand_tabs(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = tab_width - column % tab_width;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

fn line_col_at(source: &str, byte: usize) -> LineCol {
    let prefix = &source[..byte];
    let line = prefix.matches('\n').count();
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    LineCol {
        line,
        column: prefix[line_start..].chars().count(),
    }
}

/// Resolve `needle` to a region of `code`; `None` when it does not occur verbatim
pub fn find_region(code: &CodeBlock, needle: &str) -> Option<Region> {
    code.find_region(needle)
}

impl Mobject for CodeBlock {
    fn bounds(&self) -> Bounds {
        self.background
    }

    fn shift(&mut self, delta: Point) {
        self.background = self.background.shifted(delta);
        for glyph in &mut self.glyphs {
            glyph.bounds = glyph.bounds.shifted(delta);
        }
        for stroke in &mut self.strokes {
            stroke.region.bounds = stroke.region.bounds.shifted(delta);
        }
    }

    fn scale(&mut self, factor: f32) {
        let about = self.background.center;
        self.background = self.background.scaled(factor, about);
        self.title_bar *= factor;
        self.scale_factor *= factor;
        for glyph in &mut self.glyphs {
            glyph.bounds = glyph.bounds.scaled(factor, about);
        }
        for stroke in &mut self.strokes {
            stroke.region.bounds = stroke.region.bounds.scaled(factor, about);
        }
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::UP;

    const SNIPPET: &str = "\n\nimport asyncio\n\nasync def main():\n\tawait asyncio.sleep(1)\n\n";

    fn block() -> CodeBlock {
        CodeBlock::new(
            SNIPPET,
            CodeStyle {
                tab_width: 4,
                insert_line_no: false,
                background: CodeBackground::Window,
                ..CodeStyle::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_normalization() {
        let code = block();
        assert_eq!(code.line_count(), 4);
        assert!(code.source.starts_with("import asyncio"));
        assert!(code.source.contains("\n    await asyncio.sleep(1)"));
    }

    #[test]
    fn test_find_region_single_line() {
        let code = block();
        let region = code.find_region("async def main():").unwrap();
        assert_eq!(region.start, LineCol { line: 2, column: 0 });
        assert_eq!(region.end, LineCol { line: 2, column: 17 });
        assert!(region.bounds.width > 0.0);
        assert!(code.bounds().contains(region.bounds.center));
    }

    #[test]
    fn test_find_region_indented_and_multiline() {
        let code = block();
        let region = code.find_region("await asyncio.sleep(1)").unwrap();
        assert_eq!(region.start, LineCol { line: 3, column: 4 });

        let region = code.find_region("main():\n    await").unwrap();
        assert_eq!(region.start.line, 2);
        assert_eq!(region.end.line, 3);
    }

    #[test]
    fn test_find_region_missing() {
        let code = block();
        assert!(code.find_region("def nope():").is_none());
        assert!(code.find_region("").is_none());
        assert!(code.find_region("   ").is_none());
        assert!(find_region(&code, "import asyncio").is_some());
    }

    #[test]
    fn test_region_follows_transforms() {
        let mut code = block();
        let before = code.find_region("import asyncio").unwrap();
        code.scale(0.7);
        code.shift(UP * 0.5);
        let after = code.find_region("import asyncio").unwrap();
        assert!((after.bounds.width - before.bounds.width * 0.7).abs() < 1e-4);
        assert!(code.bounds().contains(after.bounds.center));
    }

    #[test]
    fn test_line_numbers_never_match() {
        let code = CodeBlock::new("a = 1\nb = 2", CodeStyle::default()).unwrap();
        let numbered = code.glyphs.iter().filter(|g| g.column == GUTTER_COLUMN).count();
        assert_eq!(numbered, 2);
        let region = code.find_region("a = 1").unwrap();
        assert!(region.bounds.left() > code.bounds().left());
    }

    #[test]
    fn test_syntax_colours_applied() {
        let code = block();
        let theme = code.style.theme;
        let keyword = code
            .glyphs
            .iter()
            .find(|g| g.line == 2 && g.column == 0)
            .unwrap();
        assert_eq!(keyword.color, theme.color(highlight::TokenKind::Keyword));
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tx", 4), "ab  x");
    }
}
