use crate::animation::{flash_window, Animation, AnimationKind};
use crate::code::CodeBlock;
use crate::error::{SceneError, SceneResult};
use crate::geometry::{Bounds, Point};
use crate::mobject::{Element, ElementId, Glyph, Outline};
use crate::renderer::compositor::Viewport;
use crate::renderer::frame_buffer::FrameFormat;
use crate::renderer::{Compositor, FrameBuffer, Timeline};
use crate::style::{CodeBackground, Color, GREEN, RED};
use std::path::{Path, PathBuf};
use tracing::info;

const WINDOW_AMBER: Color = Color::rgb(0xFF, 0xBD, 0x2E);

/// Output size, rate and clear colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub background: Color,
}

#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub frames: u32,
    /// printf-style pattern of the written frames, as ffmpeg expects it
    pub frame_pattern: PathBuf,
    pub duration: f32,
}

/// How far an element's animation has got in the current frame
#[derive(Debug, Clone, Copy)]
struct DrawState {
    reveal: f32,
    alpha: f32,
    outline: f32,
    flash: Option<(f32, f32)>,
    step: usize,
}

impl DrawState {
    fn settled(step: usize) -> Self {
        Self {
            reveal: 1.0,
            alpha: 1.0,
            outline: 1.0,
            flash: None,
            step,
        }
    }

    fn new(anim: Option<&Animation>, t: f32, step: usize) -> Self {
        let mut state = Self::settled(step);
        let Some(anim) = anim else {
            return state;
        };
        let p = anim.progress(t);
        match anim.kind {
            AnimationKind::Write => state.reveal = p,
            AnimationKind::Create => {
                state.reveal = p;
                state.outline = p;
            }
            AnimationKind::FadeOut => state.alpha = 1.0 - p,
            AnimationKind::ShowPassingFlash { time_width } => {
                state.flash = Some(flash_window(p, time_width));
            }
        }
        state
    }
}

/// Evaluates a recorded timeline frame by frame
pub struct RenderEngine {
    timeline: Timeline,
    viewport: Viewport,
    frame_buffer: FrameBuffer,
    fps: u32,
    background: Color,
}

impl RenderEngine {
    pub fn new(timeline: Timeline, settings: &RenderSettings) -> SceneResult<Self> {
        if settings.fps == 0 {
            return Err(SceneError::render("fps must be greater than 0"));
        }
        if settings.width == 0 || settings.height == 0 {
            return Err(SceneError::render(format!(
                "invalid resolution {}x{}",
                settings.width, settings.height
            )));
        }

        let viewport = Viewport::new(timeline.frame(), settings.width, settings.height);
        Ok(Self {
            timeline,
            viewport,
            frame_buffer: FrameBuffer::new(settings.width, settings.height),
            fps: settings.fps,
            background: settings.background,
        })
    }

    pub fn total_frames(&self) -> u32 {
        self.timeline.frame_count(self.fps)
    }

    /// Render a single frame into the internal buffer
    pub fn render_frame(&mut self, frame_number: u32) -> SceneResult<()> {
        self.frame_buffer.clear(self.background.to_rgba());
        let t = Timeline::frame_to_time(frame_number, self.fps);

        let timeline = &self.timeline;
        let viewport = &self.viewport;
        let frame_buffer = &mut self.frame_buffer;

        match timeline.step_at(t) {
            Some(step) => {
                let progress = step.progress_at(t);
                for id in step.visible_during() {
                    let state = DrawState::new(step.animation_for(id), progress, step.index);
                    Self::draw_element(frame_buffer, viewport, timeline, id, state)?;
                }
            }
            None => {
                let state = DrawState::settled(timeline.steps().len());
                for id in timeline.stage() {
                    Self::draw_element(frame_buffer, viewport, timeline, *id, state)?;
                }
            }
        }

        Ok(())
    }

    fn draw_element(
        buffer: &mut FrameBuffer,
        viewport: &Viewport,
        timeline: &Timeline,
        id: ElementId,
        state: DrawState,
    ) -> SceneResult<()> {
        let element = timeline.element(id).ok_or_else(|| {
            SceneError::render(format!("stage references unknown element {:?}", id))
        })?;

        match element {
            Element::Text(text) => Self::draw_glyphs(buffer, viewport, &text.glyphs, state),
            Element::Code(code) => Self::draw_code(buffer, viewport, code, state),
            Element::Outline(outline) => Self::draw_outline(buffer, viewport, outline, state),
        }
        Ok(())
    }

    fn draw_glyphs(buffer: &mut FrameBuffer, viewport: &Viewport, glyphs: &[Glyph], state: DrawState) {
        let shown = (glyphs.len() as f32 * state.reveal).ceil() as usize;
        for glyph in glyphs.iter().take(shown) {
            Compositor::draw_glyph(buffer, viewport, glyph, state.alpha);
        }
    }

    fn draw_code(buffer: &mut FrameBuffer, viewport: &Viewport, code: &CodeBlock, state: DrawState) {
        let style = &code.style;
        let radius = style.corner_radius * code.scale_factor;
        let fill = style.theme.background().fade(state.alpha * state.outline);
        Compositor::fill_rounded(buffer, viewport, &code.background, radius, fill);

        let stroke_px = viewport.stroke_px(style.background_stroke_width * code.scale_factor);
        let stroke_color = style.background_stroke_color.fade(state.alpha);
        if state.outline >= 1.0 {
            Compositor::stroke_rounded(
                buffer,
                viewport,
                &code.background,
                radius,
                stroke_px,
                stroke_color,
            );
        } else {
            Compositor::stroke_perimeter(
                buffer,
                viewport,
                &code.background,
                0.0,
                state.outline,
                stroke_px,
                stroke_color,
            );
        }

        if style.background == CodeBackground::Window && code.title_bar > 0.0 {
            let bar = code.title_bar;
            let size = bar * 0.4;
            let y = code.background.top() - bar / 2.0;
            for (i, color) in [RED, WINDOW_AMBER, GREEN].into_iter().enumerate() {
                let x = code.background.left() + bar * 0.5 + i as f32 * bar * 0.6;
                let button = Bounds::new(Point::new(x, y), size, size);
                let color = color.fade(state.alpha * state.outline);
                Compositor::fill_rounded(buffer, viewport, &button, size / 2.0, color);
            }
        }

        Self::draw_glyphs(buffer, viewport, &code.glyphs, state);

        for stroke in code.strokes.iter().filter(|s| s.from_step <= state.step) {
            let pad = code.scale_factor * 0.02;
            Compositor::stroke_rounded(
                buffer,
                viewport,
                &stroke.region.bounds.padded(pad),
                0.0,
                viewport.stroke_px(stroke.width * code.scale_factor),
                stroke.color.fade(state.alpha),
            );
        }
    }

    fn draw_outline(buffer: &mut FrameBuffer, viewport: &Viewport, outline: &Outline, state: DrawState) {
        let width = viewport.stroke_px(outline.stroke_width);
        let color = outline.color.fade(state.alpha);
        match state.flash {
            Some((lower, upper)) => Compositor::stroke_perimeter(
                buffer,
                viewport,
                &outline.bounds,
                lower,
                upper,
                width,
                color,
            ),
            None if state.outline >= 1.0 => Compositor::stroke_rounded(
                buffer,
                viewport,
                &outline.bounds,
                outline.corner_radius,
                width,
                color,
            ),
            None => Compositor::stroke_perimeter(
                buffer,
                viewport,
                &outline.bounds,
                0.0,
                state.outline,
                width,
                color,
            ),
        }
    }

    pub fn save_frame(&self, path: &Path, format: FrameFormat) -> SceneResult<()> {
        self.frame_buffer.save(path, format)
    }

    /// Render every frame into `output_dir` as `frame_00000.<ext>`, `frame_00001.<ext>`, ...
    pub fn render(&mut self, output_dir: &Path, format: FrameFormat) -> SceneResult<RenderSummary> {
        std::fs::create_dir_all(output_dir)?;
        let total_frames = self.total_frames();
        let ext = format.extension();

        info!(total_frames, fps = self.fps, "rendering frames");
        for frame in 0..total_frames {
            if frame % self.fps == 0 {
                println!("  Rendering frame {}/{}", frame, total_frames);
            }

            self.render_frame(frame)?;
            let path = output_dir.join(format!("frame_{:05}.{}", frame, ext));
            self.save_frame(&path, format)?;
        }

        Ok(RenderSummary {
            frames: total_frames,
            frame_pattern: output_dir.join(format!("frame_%05d.{}", ext)),
            duration: self.timeline.total_duration(),
        })
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Frame;
    use crate::scene::{build, AsyncProcessingExplanation};
    use crate::style::{BLACK, BLUE, YELLOW};
    use tempfile::tempdir;

    fn engine(width: u32, height: u32, fps: u32) -> RenderEngine {
        let frame = Frame::for_resolution(width, height);
        let timeline = build(&mut AsyncProcessingExplanation, frame).unwrap();
        RenderEngine::new(
            timeline,
            &RenderSettings {
                width,
                height,
                fps,
                background: BLACK,
            },
        )
        .unwrap()
    }

    fn count(engine: &RenderEngine, color: Color) -> usize {
        engine.frame_buffer().count_pixels(|p| p == color.to_rgba())
    }

    #[test]
    fn test_render_engine_creation() {
        let engine = engine(854, 480, 15);
        assert_eq!(engine.total_frames(), 855); // 57s at 15fps
        assert_eq!(engine.fps(), 15);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let timeline = Timeline::new(Frame::default());
        let settings = RenderSettings {
            width: 10,
            height: 10,
            fps: 0,
            background: BLACK,
        };
        assert!(RenderEngine::new(timeline.clone(), &settings).is_err());
        let settings = RenderSettings {
            width: 0,
            fps: 30,
            ..settings
        };
        assert!(RenderEngine::new(timeline, &settings).is_err());
    }

    #[test]
    fn test_title_is_written() {
        let mut engine = engine(320, 180, 10);
        engine.render_frame(0).unwrap();
        assert_eq!(count(&engine, BLUE), 0);

        engine.render_frame(25).unwrap(); // 2.5s, title done, code being created
        assert!(count(&engine, BLUE) > 0);
    }

    #[test]
    fn test_flash_draws_yellow() {
        let mut engine = engine(640, 360, 10);
        engine.render_frame(349).unwrap(); // 34.9s, last narration fading
        assert_eq!(count(&engine, YELLOW), 0);

        engine.render_frame(355).unwrap(); // 35.5s, first highlight mid-flash
        assert!(count(&engine, YELLOW) > 0);
    }

    #[test]
    fn test_frames_after_end_show_final_stage() {
        let mut engine = engine(320, 180, 10);
        engine.render_frame(10_000).unwrap();
        assert!(count(&engine, BLUE) > 0);
    }

    #[test]
    fn test_render_to_directory() {
        let dir = tempdir().unwrap();
        let mut engine = engine(64, 36, 1);
        let summary = engine.render(dir.path(), FrameFormat::Ppm).unwrap();

        assert_eq!(summary.frames, 57);
        assert_eq!(summary.duration, 57.0);
        assert!(dir.path().join("frame_00000.ppm").exists());
        assert!(dir.path().join("frame_00056.ppm").exists());
        assert!(!dir.path().join("frame_00057.ppm").exists());
        assert!(summary.frame_pattern.ends_with("frame_%05d.ppm"));
    }
}
