use super::content::{CODE_SOURCE, HIGHLIGHTS, NARRATION, TITLE};
use super::Scene;
use crate::animation::Animation;
use crate::code::highlight::Theme;
use crate::code::{find_region, CodeBlock};
use crate::error::{SceneError, SceneResult};
use crate::geometry::{Bounds, Frame, DOWN, UP};
use crate::mobject::{Element, ElementId, Mobject, Outline, Role, TextBlock};
use crate::renderer::Timeline;
use crate::style::{CodeBackground, CodeStyle, Style, BLUE, WHITE, YELLOW};
use tracing::{error, info};

const TITLE_FONT_SIZE: f32 = 48.0;
const TITLE_BUFF: f32 = 0.5;
const CODE_SCALE: f32 = 0.7;
const CODE_SHIFT: f32 = 0.5;
const NARRATION_FONT_SIZE: f32 = 20.0;
const NARRATION_BUFF: f32 = 0.3;
const NARRATION_WRITE_TIME: f32 = 2.0;
const NARRATION_HOLD: f32 = 1.0;
const HIGHLIGHT_STROKE: f32 = 2.0;
const CAPTION_FONT_SIZE: f32 = 24.0;
const CAPTION_BUFF: f32 = 0.5;
const CAPTION_HOLD: f32 = 2.0;
const FINAL_HOLD: f32 = 2.0;

/// Walkthrough of an asyncio snippet that fans file processing out to tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncProcessingExplanation;

impl AsyncProcessingExplanation {
    pub const NAME: &'static str = "AsyncProcessingExplanation";

    pub fn code_style() -> CodeStyle {
        CodeStyle {
            language: "python".into(),
            font_size: 16.0,
            tab_width: 4,
            background: CodeBackground::Window,
            insert_line_no: false,
            theme: Theme::Monokai,
            background_stroke_width: 1.0,
            background_stroke_color: WHITE,
            corner_radius: 0.1,
        }
    }

    /// The code block, scaled and placed as the scene shows it
    pub fn code_block() -> SceneResult<CodeBlock> {
        let mut code = CodeBlock::new(CODE_SOURCE, Self::code_style())?;
        code.scale(CODE_SCALE);
        code.shift(UP * CODE_SHIFT);
        Ok(code)
    }

    /// Flash `line` inside `code` and write `description` under the block.
    ///
    /// Returns `Ok(false)` without recording anything when `line` does not
    /// occur verbatim in the code.
    pub fn highlight_code(
        &self,
        timeline: &mut Timeline,
        code: ElementId,
        line: &str,
        description: &str,
    ) -> SceneResult<bool> {
        let block = timeline
            .element(code)
            .and_then(Element::as_code)
            .ok_or_else(|| SceneError::timeline(format!("element {:?} is not a code block", code)))?;

        let Some(region) = find_region(block, line) else {
            error!(
                target_line = line,
                "Error: Unable to highlight the code. Check the scene content and line text."
            );
            return Ok(false);
        };
        let code_bounds = block.bounds();

        let step = timeline.next_step_index();
        if let Some(block) = timeline.element_mut(code).and_then(Element::as_code_mut) {
            block.set_region_stroke(&region, YELLOW, HIGHLIGHT_STROKE, step);
        }

        let flash = timeline.add(
            Role::Flash,
            Outline::around(region.bounds, YELLOW, HIGHLIGHT_STROKE),
        );
        let mut caption = TextBlock::text(
            description,
            Style::default()
                .with_color(YELLOW)
                .with_font_size(CAPTION_FONT_SIZE),
        )?;
        caption.next_to(&code_bounds, DOWN, CAPTION_BUFF);
        let caption = timeline.add(Role::Caption, caption);

        timeline.play(
            vec![Animation::show_passing_flash(flash), Animation::write(caption)],
            None,
        )?;
        timeline.wait(CAPTION_HOLD)?;
        timeline.play(vec![Animation::fade_out(caption)], None)?;
        Ok(true)
    }

    fn narration_paragraphs(
        timeline: &mut Timeline,
        frame: &Frame,
        below: &Bounds,
    ) -> SceneResult<Vec<ElementId>> {
        let style = Style::default().with_font_size(NARRATION_FONT_SIZE);
        let mut ids = Vec::with_capacity(NARRATION.len());
        for text in NARRATION {
            let mut paragraph = TextBlock::paragraph(text, style.clone(), frame.width - 1.0)?;
            paragraph.next_to(below, DOWN, NARRATION_BUFF);
            ids.push(timeline.add(Role::Narration, paragraph));
        }
        Ok(ids)
    }
}

impl Scene for AsyncProcessingExplanation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn construct(&mut self, timeline: &mut Timeline) -> SceneResult<()> {
        let frame = timeline.frame();

        let mut title = TextBlock::text(
            TITLE,
            Style::default()
                .with_color(BLUE)
                .with_font_size(TITLE_FONT_SIZE),
        )?;
        title.to_edge(&frame, UP, TITLE_BUFF);
        let title = timeline.add(Role::Title, title);
        timeline.play(vec![Animation::write(title)], None)?;

        let code = Self::code_block()?;
        let code_bounds = code.bounds();
        let code = timeline.add(Role::Code, code);
        let paragraphs = Self::narration_paragraphs(timeline, &frame, &code_bounds)?;

        timeline.play(vec![Animation::create(code)], None)?;
        for paragraph in paragraphs {
            timeline.play(vec![Animation::write(paragraph)], Some(NARRATION_WRITE_TIME))?;
            timeline.wait(NARRATION_HOLD)?;
            timeline.play(vec![Animation::fade_out(paragraph)], None)?;
        }

        let mut highlighted = 0;
        for event in HIGHLIGHTS {
            if self.highlight_code(timeline, code, event.line, event.description)? {
                highlighted += 1;
            }
        }
        info!(highlighted, total = HIGHLIGHTS.len(), "highlights played");

        timeline.wait(FINAL_HOLD)?;
        Ok(())
    }
}
