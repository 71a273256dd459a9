use crate::geometry::{Bounds, Frame, Point};
use crate::mobject::Glyph;
use crate::renderer::FrameBuffer;
use crate::style::Color;

/// Maps scene units onto a pixel grid
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    frame: Frame,
    width: u32,
    height: u32,
}

/// Pixel-space rectangle, `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Viewport {
    pub fn new(frame: Frame, width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.height as f32 / self.frame.height
    }

    pub fn to_pixel(&self, p: Point) -> (f32, f32) {
        let ppu = self.pixels_per_unit();
        (
            (p.x + self.frame.width / 2.0) * ppu,
            (self.frame.height / 2.0 - p.y) * ppu,
        )
    }

    pub fn to_pixel_rect(&self, b: &Bounds) -> PixelRect {
        let (x0, y0) = self.to_pixel(Point::new(b.left(), b.top()));
        let (x1, y1) = self.to_pixel(Point::new(b.right(), b.bottom()));
        PixelRect { x0, y0, x1, y1 }
    }

    /// Stroke width in pixels; stroke widths are hundredths of a scene unit
    pub fn stroke_px(&self, width: f32) -> f32 {
        (width * self.pixels_per_unit() * 0.01).max(1.0)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Layer compositor
pub struct Compositor;

impl Compositor {
    /// Blend a pixel-aligned rectangle, clipped to the buffer
    pub fn fill_rect(
        buffer: &mut FrameBuffer,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: [u8; 4],
    ) {
        let (buf_width, buf_height) = buffer.dimensions();
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + width as i32).min(buf_width as i32);
        let y_end = (y + height as i32).min(buf_height as i32);

        for py in y_start..y_end {
            for px in x_start..x_end {
                buffer.blend_pixel(px as u32, py as u32, color);
            }
        }
    }

    pub fn fill_bounds(buffer: &mut FrameBuffer, viewport: &Viewport, bounds: &Bounds, color: Color) {
        let r = viewport.to_pixel_rect(bounds);
        Self::fill_rect(
            buffer,
            r.x0.round() as i32,
            r.y0.round() as i32,
            (r.x1 - r.x0).round().max(1.0) as u32,
            (r.y1 - r.y0).round().max(1.0) as u32,
            color.to_rgba(),
        );
    }

    /// Placeholder glyph: a solid block filling the glyph cell
    pub fn draw_glyph(buffer: &mut FrameBuffer, viewport: &Viewport, glyph: &Glyph, alpha: f32) {
        Self::fill_bounds(buffer, viewport, &glyph.bounds, glyph.color.fade(alpha));
    }

    /// Fill a rounded rectangle. `radius` is in scene units.
    pub fn fill_rounded(
        buffer: &mut FrameBuffer,
        viewport: &Viewport,
        bounds: &Bounds,
        radius: f32,
        color: Color,
    ) {
        let r = viewport.to_pixel_rect(bounds);
        let radius_px = radius * viewport.pixels_per_unit();
        Self::for_each_pixel(
            buffer,
            &r,
            |px, py| inside_rounded(&r, radius_px, px, py),
            color.to_rgba(),
        );
    }

    /// Stroke the border of a rounded rectangle with `width_px` pixels inwards
    pub fn stroke_rounded(
        buffer: &mut FrameBuffer,
        viewport: &Viewport,
        bounds: &Bounds,
        radius: f32,
        width_px: f32,
        color: Color,
    ) {
        let outer = viewport.to_pixel_rect(bounds);
        let radius_px = radius * viewport.pixels_per_unit();
        let inner = PixelRect {
            x0: outer.x0 + width_px,
            y0: outer.y0 + width_px,
            x1: outer.x1 - width_px,
            y1: outer.y1 - width_px,
        };
        let inner_radius = (radius_px - width_px).max(0.0);
        Self::for_each_pixel(
            buffer,
            &outer,
            |px, py| {
                inside_rounded(&outer, radius_px, px, py)
                    && !inside_rounded(&inner, inner_radius, px, py)
            },
            color.to_rgba(),
        );
    }

    /// Stroke the part `[from, to]` of a rectangle's perimeter, measured
    /// clockwise from the top-left corner as a fraction of its length
    pub fn stroke_perimeter(
        buffer: &mut FrameBuffer,
        viewport: &Viewport,
        bounds: &Bounds,
        from: f32,
        to: f32,
        width_px: f32,
        color: Color,
    ) {
        let from = from.clamp(0.0, 1.0);
        let to = to.clamp(0.0, 1.0);
        if to <= from {
            return;
        }
        let r = viewport.to_pixel_rect(bounds);
        let w = r.x1 - r.x0;
        let h = r.y1 - r.y0;
        let perimeter = 2.0 * (w + h);
        if perimeter <= 0.0 {
            return;
        }

        let rgba = color.to_rgba();
        let half = width_px / 2.0;
        let dot = width_px.ceil().max(1.0) as u32;
        let samples = ((to - from) * perimeter * 2.0).ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=samples {
            let s = from + (to - from) * (i as f32 / samples as f32);
            let (x, y) = perimeter_point(&r, s * perimeter);
            let cell = ((x - half).round() as i32, (y - half).round() as i32);
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            Self::fill_rect(buffer, cell.0, cell.1, dot, dot, rgba);
        }
    }

    fn for_each_pixel<F>(buffer: &mut FrameBuffer, r: &PixelRect, inside: F, color: [u8; 4])
    where
        F: Fn(f32, f32) -> bool,
    {
        let (bw, bh) = buffer.dimensions();
        let x0 = r.x0.floor().max(0.0) as u32;
        let y0 = r.y0.floor().max(0.0) as u32;
        let x1 = (r.x1.ceil().max(0.0) as u32).min(bw);
        let y1 = (r.y1.ceil().max(0.0) as u32).min(bh);
        for py in y0..y1 {
            for px in x0..x1 {
                if inside(px as f32 + 0.5, py as f32 + 0.5) {
                    buffer.blend_pixel(px, py, color);
                }
            }
        }
    }
}

fn inside_rounded(r: &PixelRect, radius: f32, x: f32, y: f32) -> bool {
    if x < r.x0 || x >= r.x1 || y < r.y0 || y >= r.y1 {
        return false;
    }
    let radius = radius.min((r.x1 - r.x0) / 2.0).min((r.y1 - r.y0) / 2.0).max(0.0);
    let cx = x.clamp(r.x0 + radius, r.x1 - radius);
    let cy = y.clamp(r.y0 + radius, r.y1 - radius);
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= radius * radius
}

/// Point `distance` pixels along the perimeter, clockwise from top-left
fn perimeter_point(r: &PixelRect, distance: f32) -> (f32, f32) {
    let w = r.x1 - r.x0;
    let h = r.y1 - r.y0;
    let mut d = distance;
    if d <= w {
        return (r.x0 + d, r.y0);
    }
    d -= w;
    if d <= h {
        return (r.x1, r.y0 + d);
    }
    d -= h;
    if d <= w {
        return (r.x1 - d, r.y1);
    }
    d -= w;
    (r.x0, (r.y1 - d).max(r.y0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BLACK, YELLOW};

    fn viewport() -> Viewport {
        // 16 x 8 units on 160 x 80 pixels: 10 px per unit
        Viewport::new(Frame { width: 16.0, height: 8.0 }, 160, 80)
    }

    #[test]
    fn test_fill_rect() {
        let mut fb = FrameBuffer::new(100, 100);
        fb.clear([0, 0, 0, 255]);

        Compositor::fill_rect(&mut fb, 10, 10, 20, 20, [255, 0, 0, 255]);

        assert_eq!(fb.get_pixel(15, 15), Some([255, 0, 0, 255]));
        assert_eq!(fb.get_pixel(5, 5), Some([0, 0, 0, 255]));

        // partially off-screen rectangles are clipped
        Compositor::fill_rect(&mut fb, -10, -10, 15, 15, [0, 255, 0, 255]);
        assert_eq!(fb.get_pixel(0, 0), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_viewport_mapping() {
        let vp = viewport();
        assert_eq!(vp.pixels_per_unit(), 10.0);
        assert_eq!(vp.to_pixel(Point::new(0.0, 0.0)), (80.0, 40.0));
        assert_eq!(vp.to_pixel(Point::new(-8.0, 4.0)), (0.0, 0.0));
        assert_eq!(vp.stroke_px(2.0), 1.0);
    }

    #[test]
    fn test_stroke_rounded_leaves_inside_empty() {
        let vp = viewport();
        let mut fb = FrameBuffer::new(160, 80);
        fb.clear(BLACK.to_rgba());
        let b = Bounds::new(Point::new(0.0, 0.0), 4.0, 2.0);
        Compositor::stroke_rounded(&mut fb, &vp, &b, 0.5, 1.0, YELLOW);

        assert_eq!(fb.get_pixel(80, 40), Some(BLACK.to_rgba()));
        assert_eq!(fb.get_pixel(80, 30), Some(YELLOW.to_rgba())); // top edge
        // rounded corner pixel stays clear
        assert_eq!(fb.get_pixel(60, 30), Some(BLACK.to_rgba()));
    }

    #[test]
    fn test_stroke_perimeter_segment() {
        let vp = viewport();
        let mut fb = FrameBuffer::new(160, 80);
        fb.clear(BLACK.to_rgba());
        let b = Bounds::new(Point::new(0.0, 0.0), 4.0, 2.0);

        // first quarter of a 40x20 px box covers 30 px of the top edge
        Compositor::stroke_perimeter(&mut fb, &vp, &b, 0.0, 0.25, 1.0, YELLOW);
        let lit = fb.count_pixels(|p| p == YELLOW.to_rgba());
        assert!(lit >= 28 && lit <= 32, "{lit}");
        assert_eq!(fb.get_pixel(100, 50), Some(BLACK.to_rgba()));

        let mut empty = FrameBuffer::new(160, 80);
        Compositor::stroke_perimeter(&mut empty, &vp, &b, 0.5, 0.5, 1.0, YELLOW);
        assert_eq!(empty.count_pixels(|p| p == YELLOW.to_rgba()), 0);
    }

    #[test]
    fn test_fill_rounded() {
        let vp = viewport();
        let mut fb = FrameBuffer::new(160, 80);
        fb.clear(BLACK.to_rgba());
        let b = Bounds::new(Point::new(0.0, 0.0), 4.0, 2.0);
        Compositor::fill_rounded(&mut fb, &vp, &b, 0.5, YELLOW);
        assert_eq!(fb.get_pixel(80, 40), Some(YELLOW.to_rgba()));
        assert_eq!(fb.get_pixel(60, 30), Some(BLACK.to_rgba()));
    }
}
