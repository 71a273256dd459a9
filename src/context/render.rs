use crate::config::EncodeConfig;
use crate::geometry::Frame;
use crate::renderer::{FrameFormat, RenderEngine, RenderSettings, VideoEncoder};
use crate::scene::{build, scene_by_name};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where a render left its output
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub frames: u32,
    pub frame_dir: PathBuf,
    pub video: Option<PathBuf>,
}

pub struct RenderContext;

impl RenderContext {
    /// Build `scene_name`, render its frames under `<output_dir>/<scene>/`
    /// and encode `<output_dir>/<scene>.mp4` when encoding is enabled.
    pub fn run(
        scene_name: &str,
        settings: &RenderSettings,
        output_dir: &Path,
        format: FrameFormat,
        encode: &EncodeConfig,
    ) -> Result<RenderOutcome> {
        let mut scene = scene_by_name(scene_name)?;
        let frame = Frame::for_resolution(settings.width, settings.height);
        let timeline = build(scene.as_mut(), frame)
            .with_context(|| format!("failed to construct scene {}", scene_name))?;

        // 1. Rendering
        println!(
            "\n🎬 Rendering {} at {}x{} {}fps...",
            scene_name, settings.width, settings.height, settings.fps
        );
        let frame_dir = output_dir.join(scene_name);
        let mut engine = RenderEngine::new(timeline, settings)?;
        let summary = engine
            .render(&frame_dir, format)
            .with_context(|| format!("failed to render frames into {}", frame_dir.display()))?;
        println!(
            "  ✓ {} frames ({:.1}s) written to {}",
            summary.frames,
            summary.duration,
            frame_dir.display()
        );

        // 2. Video Encoding
        let mut video = None;
        if !encode.enabled {
            println!("ℹ️  Encoding disabled. Frames are saved in: {}", frame_dir.display());
        } else if VideoEncoder::is_available() {
            let output_video = output_dir.join(format!("{}.mp4", scene_name));
            VideoEncoder::encode(
                &summary.frame_pattern,
                &output_video,
                settings.fps,
                settings.width,
                settings.height,
                &encode.codec,
            )?;

            println!("✨ Video created successfully: {}", output_video.display());
            video = Some(output_video);
        } else {
            println!("⚠️  FFmpeg not found. Skipping video encoding.");
            println!("   Frames are saved in: {}", frame_dir.display());
            println!("\n💡 To enable video generation, install FFmpeg:");
            if cfg!(target_os = "macos") {
                println!("   brew install ffmpeg");
            } else if cfg!(target_os = "windows") {
                println!("   choco install ffmpeg");
            } else if cfg!(target_os = "linux") {
                println!("   sudo apt-get install ffmpeg");
            } else {
                println!("   Install FFmpeg from https://ffmpeg.org/download.html");
            }
        }

        Ok(RenderOutcome {
            frames: summary.frames,
            frame_dir,
            video,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BLACK;
    use tempfile::tempdir;

    #[test]
    fn test_render_without_encoding() {
        let dir = tempdir().unwrap();
        let settings = RenderSettings {
            width: 48,
            height: 27,
            fps: 1,
            background: BLACK,
        };
        let encode = EncodeConfig {
            enabled: false,
            codec: "libx264".to_string(),
        };

        let outcome = RenderContext::run(
            "AsyncProcessingExplanation",
            &settings,
            dir.path(),
            FrameFormat::Ppm,
            &encode,
        )
        .unwrap();

        assert_eq!(outcome.frames, 57);
        assert!(outcome.video.is_none());
        assert!(outcome.frame_dir.join("frame_00000.ppm").exists());
    }

    #[test]
    fn test_unknown_scene() {
        let dir = tempdir().unwrap();
        let settings = RenderSettings {
            width: 48,
            height: 27,
            fps: 1,
            background: BLACK,
        };
        let encode = EncodeConfig {
            enabled: false,
            codec: "libx264".to_string(),
        };
        let err = RenderContext::run("Nope", &settings, dir.path(), FrameFormat::Ppm, &encode)
            .unwrap_err();
        assert!(err.to_string().contains("unknown scene"));
    }
}
