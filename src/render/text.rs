//! Text drawing with alignment, multi-line blocks and arbitrary rotation
//!
//! plotters only rotates text by right angles, so rotated text is rasterised
//! into an offscreen bitmap first and composited pixel by pixel onto the target.
//! Raster text is drawn at `SUPERSAMPLE` times its size and averaged down, with
//! partial coverage lifted so one-pixel strokes such as `_` stay visible.

use super::render_err;
use crate::data::{Result, Rgba};
use crate::figure::{FontWeight, HAlign, VAlign};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, RGBAColor};

/// Line height as a multiple of the font size
const LINE_SPACING: f64 = 1.2;

/// Coverage below which rasterised pixels are dropped
const MIN_COVERAGE: f64 = 0.02;

/// Offscreen rasterisation scale
const SUPERSAMPLE: u32 = 3;

/// Exponent applied to averaged coverage (< 1 darkens thin strokes)
const COVERAGE_GAMMA: f64 = 0.6;

/// Font and color of a piece of text, with the size already in pixels
#[derive(Debug, Clone, Copy)]
pub struct TextSpec<'a> {
    pub family: &'a str,
    pub size_px: f64,
    pub weight: FontWeight,
    pub color: Rgba,
    /// Draw upright text through the offscreen rasteriser as well
    pub raster: bool,
}

impl<'a> TextSpec<'a> {
    fn font(&self) -> FontDesc<'a> {
        let style = match self.weight {
            FontWeight::Normal => FontStyle::Normal,
            FontWeight::Bold => FontStyle::Bold,
        };
        FontDesc::new(FontFamily::from(self.family), self.size_px, style)
    }

    fn line_height(&self) -> f64 {
        self.size_px * LINE_SPACING
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            size_px: self.size_px * factor,
            ..*self
        }
    }
}

/// Bounding box origin of a `w` x `h` block anchored at `anchor`
pub fn aligned_origin(anchor: (f64, f64), w: f64, h: f64, h_align: HAlign, v_align: VAlign) -> (f64, f64) {
    let left = match h_align {
        HAlign::Left => anchor.0,
        HAlign::Center => anchor.0 - w / 2.0,
        HAlign::Right => anchor.0 - w,
    };
    let top = match v_align {
        VAlign::Top => anchor.1,
        VAlign::Center => anchor.1 - h / 2.0,
        VAlign::Bottom => anchor.1 - h,
    };
    (left, top)
}

/// Size of a `w` x `h` box after a rotation by `degrees`
pub fn rotated_extent(w: f64, h: f64, degrees: f64) -> (f64, f64) {
    let (s, c) = degrees.to_radians().sin_cos();
    (
        w * c.abs() + h * s.abs(),
        w * s.abs() + h * c.abs(),
    )
}

fn is_upright(degrees: f64) -> bool {
    degrees.rem_euclid(360.0).abs() < 1e-9
}

fn hpos(h_align: HAlign) -> HPos {
    match h_align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    }
}

/// Draw `text` (may contain `\n`) so that its bounding box, after rotation by
/// `rotation` degrees counter-clockwise, is aligned on `anchor`
pub fn draw_text_block<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    spec: &TextSpec,
    anchor: (f64, f64),
    h_align: HAlign,
    v_align: VAlign,
    rotation: f64,
) -> Result<()> {
    if text.is_empty() || spec.color.is_transparent() {
        return Ok(());
    }

    let lines: Vec<&str> = text.split('\n').collect();

    if !is_upright(rotation) || spec.raster {
        let bitmap = rasterize_block(area, &lines, spec, h_align)?;
        return composite_rotated(area, &bitmap, spec.color, anchor, h_align, v_align, rotation);
    }

    let font = spec.font();
    let (block_w, block_h) = measure_block(area, &lines, spec)?;
    let (left, top) = aligned_origin(anchor, block_w, block_h, h_align, v_align);
    let x = match h_align {
        HAlign::Left => left,
        HAlign::Center => left + block_w / 2.0,
        HAlign::Right => left + block_w,
    };
    let color = spec.color.to_plotters();
    let style = font
        .color(&color)
        .pos(Pos::new(hpos(h_align), VPos::Top));

    for (i, line) in lines.iter().enumerate() {
        let y = top + i as f64 * spec.line_height();
        area.draw_text(line, &style, (x.round() as i32, y.round() as i32))
            .map_err(render_err)?;
    }
    Ok(())
}

/// Width of the widest line and total height of a block, in pixels
fn measure_block<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lines: &[&str],
    spec: &TextSpec,
) -> Result<(f64, f64)> {
    let measure_style = spec.font().color(&BLACK);
    let mut block_w: f64 = 0.0;
    for line in lines {
        let (w, _) = area
            .estimate_text_size(line, &measure_style)
            .map_err(render_err)?;
        block_w = block_w.max(w as f64);
    }
    Ok((block_w, spec.line_height() * lines.len() as f64))
}

/// Grayscale coverage of rasterised text (1.0 = fully inked)
#[derive(Debug, Clone)]
pub struct CoverageBitmap {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<f64>,
}

impl CoverageBitmap {
    fn at(&self, x: u32, y: u32) -> f64 {
        self.coverage[(y * self.width + x) as usize]
    }
}

/// Rasterise a block at `SUPERSAMPLE` times its size and reduce it to
/// target-resolution coverage
fn rasterize_block<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lines: &[&str],
    spec: &TextSpec,
    h_align: HAlign,
) -> Result<CoverageBitmap> {
    let big = spec.scaled(SUPERSAMPLE as f64);
    let (block_w, block_h) = measure_block(area, lines, &big)?;

    // Whole target pixels, so the downsampled grid lines up
    let width = (block_w / SUPERSAMPLE as f64).ceil().max(1.0) as u32;
    let height = (block_h / SUPERSAMPLE as f64).ceil().max(1.0) as u32;
    let (big_w, big_h) = (width * SUPERSAMPLE, height * SUPERSAMPLE);
    let mut buffer = vec![255u8; (big_w * big_h * 3) as usize];

    {
        let offscreen = BitMapBackend::with_buffer(&mut buffer, (big_w, big_h)).into_drawing_area();
        let style = big
            .font()
            .color(&BLACK)
            .pos(Pos::new(hpos(h_align), VPos::Top));
        let x = match h_align {
            HAlign::Left => 0.0,
            HAlign::Center => block_w / 2.0,
            HAlign::Right => block_w,
        };
        for (i, line) in lines.iter().enumerate() {
            let y = i as f64 * big.line_height();
            offscreen
                .draw_text(line, &style, (x.round() as i32, y.round() as i32))
                .map_err(render_err)?;
        }
        offscreen.present().map_err(render_err)?;
    }

    let ink: Vec<f64> = buffer
        .chunks_exact(3)
        .map(|px| 1.0 - px[0] as f64 / 255.0)
        .collect();

    Ok(downsample(&ink, width, height, SUPERSAMPLE))
}

/// Average `factor` x `factor` blocks of `ink` (row-major, `width * factor`
/// wide) and lift the result by `COVERAGE_GAMMA`
pub fn downsample(ink: &[f64], width: u32, height: u32, factor: u32) -> CoverageBitmap {
    let big_w = (width * factor) as usize;
    let area = (factor * factor) as f64;
    let mut coverage = Vec::with_capacity((width * height) as usize);

    for y in 0..height as usize {
        for x in 0..width as usize {
            let mut sum = 0.0;
            for dy in 0..factor as usize {
                let row = (y * factor as usize + dy) * big_w;
                for dx in 0..factor as usize {
                    sum += ink.get(row + x * factor as usize + dx).copied().unwrap_or(0.0);
                }
            }
            coverage.push((sum / area).clamp(0.0, 1.0).powf(COVERAGE_GAMMA));
        }
    }

    CoverageBitmap {
        width,
        height,
        coverage,
    }
}

/// Composite `bitmap` rotated by `degrees` (counter-clockwise, about its center)
/// with its rotated bounding box aligned on `anchor`
pub fn composite_rotated<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    bitmap: &CoverageBitmap,
    color: Rgba,
    anchor: (f64, f64),
    h_align: HAlign,
    v_align: VAlign,
    degrees: f64,
) -> Result<()> {
    let (src_w, src_h) = (bitmap.width as f64, bitmap.height as f64);
    let (rot_w, rot_h) = rotated_extent(src_w, src_h, degrees);
    let (left, top) = aligned_origin(anchor, rot_w, rot_h, h_align, v_align);
    let (cx, cy) = (left + rot_w / 2.0, top + rot_h / 2.0);
    let (s, c) = degrees.to_radians().sin_cos();

    let (area_w, area_h) = area.dim_in_pixel();

    let x_start = left.floor().max(0.0) as i32;
    let x_end = ((left + rot_w).ceil() as i32).min(area_w as i32);
    let y_start = top.floor().max(0.0) as i32;
    let y_end = ((top + rot_h).ceil() as i32).min(area_h as i32);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let dx = tx as f64 + 0.5 - cx;
            let dy = ty as f64 + 0.5 - cy;

            // Inverse rotation back into the source bitmap (screen y points down)
            let sx = dx * c - dy * s + src_w / 2.0;
            let sy = dx * s + dy * c + src_h / 2.0;
            if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
                continue;
            }

            let coverage = bitmap.at(sx as u32, sy as u32);
            if coverage < MIN_COVERAGE {
                continue;
            }

            let pixel = RGBAColor(color.r, color.g, color.b, color.alpha * coverage);
            area.draw_pixel((tx, ty), &pixel).map_err(render_err)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_aligned_origin() {
        assert_eq!(
            aligned_origin((100.0, 50.0), 20.0, 10.0, HAlign::Center, VAlign::Bottom),
            (90.0, 40.0)
        );
        assert_eq!(
            aligned_origin((100.0, 50.0), 20.0, 10.0, HAlign::Left, VAlign::Center),
            (100.0, 45.0)
        );
        assert_eq!(
            aligned_origin((100.0, 50.0), 20.0, 10.0, HAlign::Right, VAlign::Top),
            (80.0, 50.0)
        );
    }

    #[test]
    fn test_rotated_extent() {
        let (w, h) = rotated_extent(40.0, 10.0, 270.0);
        assert!(close(w, 10.0) && close(h, 40.0));

        let (w, h) = rotated_extent(40.0, 10.0, 45.0);
        let expected = 50.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert!(close(w, expected) && close(h, expected));
    }

    #[test]
    fn test_upright_detection() {
        assert!(is_upright(0.0));
        assert!(is_upright(360.0));
        assert!(is_upright(-720.0));
        assert!(!is_upright(45.0));
        assert!(!is_upright(270.0));
    }

    #[test]
    fn test_downsample_averages_and_lifts_coverage() {
        // 4x2 source, factor 2: a full block and a block with one inked pixel
        let ink = vec![
            1.0, 1.0, 1.0, 0.0, //
            1.0, 1.0, 0.0, 0.0,
        ];
        let bitmap = downsample(&ink, 2, 1, 2);
        assert_eq!((bitmap.width, bitmap.height), (2, 1));
        assert!(close(bitmap.coverage[0], 1.0));
        assert!(close(bitmap.coverage[1], 0.25f64.powf(COVERAGE_GAMMA)));
        assert!(bitmap.coverage[1] > 0.4);
    }

    fn strong_pixels(text: &str) -> usize {
        let mut buffer = vec![255u8; 200 * 50 * 3];
        let area = BitMapBackend::with_buffer(&mut buffer, (200, 50)).into_drawing_area();
        let spec = TextSpec {
            family: "sans-serif",
            size_px: 10.0 * 100.0 / 72.0,
            weight: FontWeight::Bold,
            color: Rgba::BLACK,
            raster: true,
        };
        let bitmap = rasterize_block(&area, &[text], &spec, HAlign::Center).unwrap();
        bitmap.coverage.iter().filter(|c| **c >= 0.5).count()
    }

    #[test]
    fn test_underscore_stays_visible_at_label_size() {
        let with_underscore = strong_pixels("Eco_S");
        let with_space = strong_pixels("Eco S");
        assert!(
            with_underscore >= with_space + 4,
            "underscore adds only {} strong pixels",
            with_underscore.saturating_sub(with_space)
        );
    }

    #[test]
    fn test_composite_quarter_turn() {
        // A 3x1 horizontal bar rotated 90 degrees becomes a 1x3 vertical bar
        let bitmap = CoverageBitmap {
            width: 3,
            height: 1,
            coverage: vec![1.0, 1.0, 1.0],
        };
        let mut buffer = vec![255u8; 5 * 5 * 3];
        {
            let area = BitMapBackend::with_buffer(&mut buffer, (5, 5)).into_drawing_area();
            composite_rotated(
                &area,
                &bitmap,
                Rgba::BLACK,
                (2.5, 2.5),
                HAlign::Center,
                VAlign::Center,
                90.0,
            )
            .unwrap();
            area.present().unwrap();
        }

        let dark = |x: usize, y: usize| buffer[(y * 5 + x) * 3] < 128;
        assert!(dark(2, 1) && dark(2, 2) && dark(2, 3));
        assert!(!dark(1, 2) && !dark(3, 2));
    }
}
