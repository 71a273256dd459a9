use crate::error::{SceneError, SceneResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// On-disk format for rendered frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    #[default]
    Ppm,
    Png,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Ppm => "ppm",
            FrameFormat::Png => "png",
        }
    }
}

/// RGBA frame buffer for rendering
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>, // RGBA, 4 bytes per pixel
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            pixels: vec![0; size],
        }
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| ((y * self.width + x) * 4) as usize)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + 4].copy_from_slice(&color);
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|idx| {
            let mut pixel = [0u8; 4];
            pixel.copy_from_slice(&self.pixels[idx..idx + 4]);
            pixel
        })
    }

    /// Source-over blend; the buffer stays opaque
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if color[3] == 0 {
            return;
        }
        if color[3] == 255 {
            self.set_pixel(x, y, color);
            return;
        }
        if let Some(bg) = self.get_pixel(x, y) {
            let alpha = color[3] as f32 / 255.0;
            let inv_alpha = 1.0 - alpha;

            let blended = [
                (color[0] as f32 * alpha + bg[0] as f32 * inv_alpha) as u8,
                (color[1] as f32 * alpha + bg[1] as f32 * inv_alpha) as u8,
                (color[2] as f32 * alpha + bg[2] as f32 * inv_alpha) as u8,
                255,
            ];

            self.set_pixel(x, y, blended);
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Count pixels matching `predicate`; used by render checks
    pub fn count_pixels<F: Fn([u8; 4]) -> bool>(&self, predicate: F) -> usize {
        self.pixels
            .chunks_exact(4)
            .filter(|c| predicate([c[0], c[1], c[2], c[3]]))
            .count()
    }

    pub fn save(&self, path: &Path, format: FrameFormat) -> SceneResult<()> {
        match format {
            FrameFormat::Ppm => self.save_ppm(path),
            FrameFormat::Png => self.save_png(path),
        }
    }

    /// Binary PPM (P6), alpha dropped
    pub fn save_ppm(&self, path: &Path) -> SceneResult<()> {
        let file = File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);

        writeln!(writer, "P6")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for chunk in self.pixels.chunks_exact(4) {
            writer.write_all(&chunk[0..3])?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn save_png(&self, path: &Path) -> SceneResult<()> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| SceneError::render("frame buffer size does not match its dimensions"))?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| SceneError::render(format!("failed to write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frame_buffer_creation() {
        let fb = FrameBuffer::new(1920, 1080);
        assert_eq!(fb.dimensions(), (1920, 1080));
        assert_eq!(fb.pixels.len(), 1920 * 1080 * 4);
    }

    #[test]
    fn test_set_get_pixel() {
        let mut fb = FrameBuffer::new(100, 100);
        fb.set_pixel(10, 20, [100, 150, 200, 255]);

        assert_eq!(fb.get_pixel(10, 20), Some([100, 150, 200, 255]));
        assert_eq!(fb.get_pixel(100, 100), None);
        fb.set_pixel(500, 500, [1, 1, 1, 1]); // out of bounds is ignored
    }

    #[test]
    fn test_alpha_blending() {
        let mut fb = FrameBuffer::new(100, 100);
        fb.clear([255, 255, 255, 255]);

        fb.blend_pixel(50, 50, [255, 0, 0, 128]);

        let pixel = fb.get_pixel(50, 50).unwrap();
        assert!(pixel[0] == 255);
        assert!(pixel[1] > 120 && pixel[1] < 135);
        assert!(pixel[2] > 120 && pixel[2] < 135);

        fb.blend_pixel(10, 10, [0, 0, 0, 0]);
        assert_eq!(fb.get_pixel(10, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_count_pixels() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.clear([0, 0, 0, 255]);
        fb.set_pixel(1, 1, [255, 255, 0, 255]);
        fb.set_pixel(2, 1, [255, 255, 0, 255]);
        assert_eq!(fb.count_pixels(|p| p == [255, 255, 0, 255]), 2);
    }

    #[test]
    fn test_save_formats() {
        let dir = tempdir().unwrap();
        let mut fb = FrameBuffer::new(4, 3);
        fb.clear([10, 20, 30, 255]);

        let ppm = dir.path().join("frame.ppm");
        fb.save(&ppm, FrameFormat::Ppm).unwrap();
        let bytes = std::fs::read(&ppm).unwrap();
        assert!(bytes.starts_with(b"P6\n4 3\n255\n"));
        assert_eq!(bytes.len(), "P6\n4 3\n255\n".len() + 4 * 3 * 3);

        let png = dir.path().join("frame.png");
        fb.save(&png, FrameFormat::Png).unwrap();
        let img = image::open(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
