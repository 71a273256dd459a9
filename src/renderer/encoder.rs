use crate::error::{SceneError, SceneResult};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Handles video encoding using external FFmpeg process
pub struct VideoEncoder;

impl VideoEncoder {
    /// Check if FFmpeg is available
    pub fn is_available() -> bool {
        Command::new("ffmpeg").arg("-version").output().is_ok()
    }

    /// Encode a sequence of frames to a video file
    ///
    /// # Arguments
    /// * `frame_pattern` - printf pattern of the input frames (e.g. "media/frame_%05d.ppm")
    /// * `output_path` - Path for the output video (e.g. "media/Scene.mp4")
    /// * `fps` - Frames per second
    /// * `codec` - ffmpeg video codec name
    pub fn encode(
        frame_pattern: &Path,
        output_path: &Path,
        fps: u32,
        width: u32,
        height: u32,
        codec: &str,
    ) -> SceneResult<()> {
        if !Self::is_available() {
            return Err(SceneError::encode(
                "FFmpeg not found. Please install ffmpeg to enable video encoding.",
            ));
        }

        info!(output = %output_path.display(), codec, "encoding video");

        let status = Command::new("ffmpeg")
            .args(Self::arguments(frame_pattern, output_path, fps, width, height, codec))
            .status()
            .map_err(|e| SceneError::encode(format!("failed to execute ffmpeg: {}", e)))?;

        if !status.success() {
            return Err(SceneError::encode(format!("ffmpeg exited with {}", status)));
        }

        Ok(())
    }

    fn arguments(
        frame_pattern: &Path,
        output_path: &Path,
        fps: u32,
        width: u32,
        height: u32,
        codec: &str,
    ) -> Vec<String> {
        vec![
            "-y".into(), // Overwrite output
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "image2".into(),
            "-framerate".into(),
            fps.to_string(),
            "-i".into(),
            frame_pattern.display().to_string(),
            "-c:v".into(),
            codec.into(),
            "-pix_fmt".into(),
            "yuv420p".into(), // Pixel format for compatibility
            "-s".into(),
            format!("{}x{}", width, height),
            output_path.display().to_string(),
        ]
    }
}
