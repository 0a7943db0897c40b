//! Pixel-buffer wheel rendering: anti-aliased sector fills, rotated
//! labels, the fixed pointer and the winner's gold glow and star.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::{Color, RenderConfig};
use crate::layout::{normalize_deg, Item, SectorLayout};

pub struct Canvas<'a> {
    pub frame: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }
}

// ---------------------------------------------------------------------------
// Display policy: wheel size, font size and label truncation all key off
// the item count so crowded wheels stay legible.
// ---------------------------------------------------------------------------

pub fn wheel_size_for(count: usize, base: usize, max: usize) -> usize {
    if count <= 10 {
        base
    } else if count <= 50 {
        (base + (count - 10) * 5).min(max)
    } else if count <= 200 {
        (base + 200 + (count - 50) * 2).min(max)
    } else {
        max
    }
}

pub fn font_size_for(count: usize) -> f32 {
    if count <= 10 {
        16.0
    } else if count <= 30 {
        14.0
    } else if count <= 100 {
        12.0
    } else if count <= 300 {
        10.0
    } else {
        8.0
    }
}

pub fn max_label_len(count: usize) -> usize {
    if count <= 10 {
        15
    } else if count <= 30 {
        12
    } else if count <= 100 {
        8
    } else if count <= 300 {
        6
    } else {
        4
    }
}

pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        return label.to_string();
    }
    let mut truncated: String = label.chars().take(max_len.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

// ---------------------------------------------------------------------------
// Wheel face
// ---------------------------------------------------------------------------

/// Draws the whole wheel: filled sectors rotated by `rotation_deg`,
/// separators, rim, pointer, labels and, when settled, the winner glow
/// and star. The sector under any display angle is found by mapping back
/// through the same layout the winner resolution uses, so what is drawn
/// and what wins can never disagree.
#[allow(clippy::too_many_arguments)]
pub fn render_wheel(
    canvas: &mut Canvas,
    layout: &SectorLayout,
    items: &[Item],
    rotation_deg: f64,
    winner: Option<usize>,
    font: Option<&Font<'static>>,
    config: &RenderConfig,
) {
    canvas.clear(config.background);

    let cx = canvas.width as i32 / 2;
    let cy = canvas.height as i32 / 2;
    let r = (canvas.width.min(canvas.height) as i32) / 2 - config.margin;
    if r <= 0 || layout.is_empty() {
        return;
    }

    let fills: Vec<Color> = items
        .iter()
        .map(|item| Color::parse(&item.color).unwrap_or(config.fallback_fill))
        .collect();

    fill_sectors(canvas, layout, &fills, rotation_deg, winner, cx, cy, r, config);
    draw_separators(canvas, layout, rotation_deg, winner, cx, cy, r, config);
    draw_pointer(canvas, cx, cy, r, config);

    if let Some(font) = font {
        draw_labels(
            canvas,
            layout,
            items,
            rotation_deg,
            winner,
            font,
            cx,
            cy,
            r,
            config,
        );
    }

    if let Some(winner) = winner {
        if let Some(sector) = layout.sector(winner) {
            let mid = (sector.midpoint_deg() + rotation_deg).to_radians();
            let star_x = cx as f64 + mid.cos() * r as f64 * config.star_radius_factor;
            let star_y = cy as f64 + mid.sin() * r as f64 * config.star_radius_factor;
            draw_star(canvas, star_x, star_y, 5, 12.0, 6.0, config.winner_color);
        }
    }
}

/// Per-pixel sector fill. Each pixel inside the rim maps back to a layout
/// angle (display angle minus rotation) and takes that sector's color;
/// the winner blends toward gold from `glow_start` out to the rim.
#[allow(clippy::too_many_arguments)]
fn fill_sectors(
    canvas: &mut Canvas,
    layout: &SectorLayout,
    fills: &[Color],
    rotation_deg: f64,
    winner: Option<usize>,
    cx: i32,
    cy: i32,
    r: i32,
    config: &RenderConfig,
) {
    let r_f = r as f64;
    for y in (cy - r - 1).max(0)..(cy + r + 2).min(canvas.height as i32) {
        for x in (cx - r - 1).max(0)..(cx + r + 2).min(canvas.width as i32) {
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > r_f + 1.0 {
                continue;
            }
            let display_deg = dy.atan2(dx).to_degrees();
            let wheel_deg = normalize_deg(display_deg - rotation_deg);
            let index = layout.sector_at(wheel_deg);
            let mut color = fills.get(index).copied().unwrap_or(config.fallback_fill);
            if winner == Some(index) {
                let glow_from = r_f * config.glow_start;
                if dist > glow_from {
                    let t = (dist - glow_from) / (r_f - glow_from);
                    color = color.lerp(config.winner_color, t);
                }
            }
            // Soft rim edge, same falloff the one-pixel AA everywhere
            // else uses.
            let aa = if dist > r_f {
                1.0 - (dist - r_f).min(1.0)
            } else {
                1.0
            };
            set_pixel(
                canvas.frame,
                canvas.width,
                x as usize,
                y as usize,
                color.r,
                color.g,
                color.b,
                aa as f32,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_separators(
    canvas: &mut Canvas,
    layout: &SectorLayout,
    rotation_deg: f64,
    winner: Option<usize>,
    cx: i32,
    cy: i32,
    r: i32,
    config: &RenderConfig,
) {
    // Spokes at every sector start; skipped for a single-sector wheel.
    if layout.len() > 1 {
        for sector in layout.sectors() {
            let angle = (sector.start_deg + rotation_deg).to_radians();
            let ex = cx as f64 + angle.cos() * r as f64;
            let ey = cy as f64 + angle.sin() * r as f64;
            draw_thick_line_aa(
                canvas.frame,
                canvas.width,
                cx,
                cy,
                ex.round() as i32,
                ey.round() as i32,
                config.separator_thickness,
                config.separator_color.r,
                config.separator_color.g,
                config.separator_color.b,
            );
        }
    }
    // Rim stroke; the winner's share of it is drawn heavier in gold.
    draw_rim(canvas, cx, cy, r, layout, rotation_deg, winner, config);
}

#[allow(clippy::too_many_arguments)]
fn draw_rim(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    r: i32,
    layout: &SectorLayout,
    rotation_deg: f64,
    winner: Option<usize>,
    config: &RenderConfig,
) {
    let steps = (r.max(8) as usize) * 8;
    for step in 0..steps {
        let display_deg = step as f64 / steps as f64 * 360.0;
        let wheel_deg = normalize_deg(display_deg - rotation_deg);
        let is_winner = winner.is_some_and(|w| layout.sector_at(wheel_deg) == w);
        let (color, thickness) = if is_winner {
            (config.winner_color, 4.0_f32)
        } else {
            (config.separator_color, config.separator_thickness)
        };
        let rad = display_deg.to_radians();
        let px = cx as f64 + rad.cos() * r as f64;
        let py = cy as f64 + rad.sin() * r as f64;
        draw_circle_soft(
            canvas,
            px,
            py,
            thickness as f64 / 2.0,
            color,
        );
    }
}

/// Fixed pointer at 3 o'clock, nose touching the rim, pointing inward.
fn draw_pointer(canvas: &mut Canvas, cx: i32, cy: i32, r: i32, config: &RenderConfig) {
    let nose_x = cx + r - 2;
    let tail_x = cx + r + 16;
    let (cr, cg, cb) = config.pointer_color.as_tuple();
    for (x0, y0, x1, y1) in [
        (tail_x, cy - 10, nose_x, cy),
        (tail_x, cy + 10, nose_x, cy),
        (tail_x, cy - 10, tail_x, cy + 10),
    ] {
        draw_thick_line_aa(canvas.frame, canvas.width, x0, y0, x1, y1, 3.0, cr, cg, cb);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_labels(
    canvas: &mut Canvas,
    layout: &SectorLayout,
    items: &[Item],
    rotation_deg: f64,
    winner: Option<usize>,
    font: &Font<'static>,
    cx: i32,
    cy: i32,
    r: i32,
    config: &RenderConfig,
) {
    let count = items.len();
    let base_size = font_size_for(count);
    let max_len = max_label_len(count);
    for (index, (item, sector)) in items.iter().zip(layout.sectors()).enumerate() {
        let is_winner = winner == Some(index);
        let size = if is_winner {
            (base_size + 2.0).min(18.0)
        } else {
            base_size
        };
        let text = truncate_label(&item.label, max_len);
        let mid = (sector.midpoint_deg() + rotation_deg).to_radians();
        let tx = cx as f64 + mid.cos() * r as f64 * 0.55;
        let ty = cy as f64 + mid.sin() * r as f64 * 0.55;
        draw_rotated_text(
            canvas,
            font,
            &text,
            Scale::uniform(size),
            tx,
            ty,
            mid,
            config.text_color,
        );
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

pub fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, r: u8, g: u8, b: u8, alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let src = [r as f32, g as f32, b as f32, 255.0 * alpha];
        let dst = [
            frame[idx] as f32,
            frame[idx + 1] as f32,
            frame[idx + 2] as f32,
            frame[idx + 3] as f32,
        ];
        let a = src[3] / 255.0;
        let out = [
            (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
            (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
            (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
            0xff,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn draw_thick_line_aa(
    frame: &mut [u8],
    width: usize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: f32,
    r: u8,
    g: u8,
    b: u8,
) {
    let min_x = x0.min(x1) - thickness.ceil() as i32 - 1;
    let max_x = x0.max(x1) + thickness.ceil() as i32 + 1;
    let min_y = y0.min(y1) - thickness.ceil() as i32 - 1;
    let max_y = y0.max(y1) + thickness.ceil() as i32 + 1;
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = (dx * dx + dy * dy).max(1.0);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 - x0 as f32;
            let py = y as f32 - y0 as f32;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 && x >= 0 && y >= 0 {
                set_pixel(frame, width, x as usize, y as usize, r, g, b, aa);
            }
        }
    }
}

/// Small filled dot with a soft edge; the rim stroke is stamped out of
/// these.
fn draw_circle_soft(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    let reach = radius.ceil() as i32 + 1;
    let x0 = cx.round() as i32;
    let y0 = cy.round() as i32;
    for y in -reach..=reach {
        for x in -reach..=reach {
            let dist = (((x0 + x) as f64 - cx).powi(2) + ((y0 + y) as f64 - cy).powi(2)).sqrt();
            let aa = (1.0 - (dist - radius).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 && x0 + x >= 0 && y0 + y >= 0 {
                set_pixel(
                    canvas.frame,
                    canvas.width,
                    (x0 + x) as usize,
                    (y0 + y) as usize,
                    color.r,
                    color.g,
                    color.b,
                    aa as f32,
                );
            }
        }
    }
}

/// Axis-aligned centered text, used for the HUD readout lines.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    canvas: &mut Canvas,
    font: &Font<'static>,
    text: &str,
    scale: Scale,
    x: i32,
    y: i32,
    color: Color,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if px >= 0 && px < canvas.width as i32 && py >= 0 && py < canvas.height as i32 {
                    set_pixel(
                        canvas.frame,
                        canvas.width,
                        px as usize,
                        py as usize,
                        color.r,
                        color.g,
                        color.b,
                        v,
                    );
                }
            });
        }
    }
}

/// Text rotated about its own center, laid out along a sector's mid
/// angle. Each glyph pixel is rotated individually and stamped with
/// bilinear sub-pixel weights to keep the edges smooth.
#[allow(clippy::too_many_arguments)]
fn draw_rotated_text(
    canvas: &mut Canvas,
    font: &Font<'static>,
    text: &str,
    scale: Scale,
    center_x: f64,
    center_y: f64,
    rotation: f64,
    color: Color,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let boxes: Vec<_> = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).collect();
    if boxes.is_empty() {
        return;
    }
    let min_x = boxes.iter().map(|bb| bb.min.x).min().unwrap_or(0) as f64;
    let max_x = boxes.iter().map(|bb| bb.max.x).max().unwrap_or(0) as f64;
    let min_y = boxes.iter().map(|bb| bb.min.y).min().unwrap_or(0) as f64;
    let max_y = boxes.iter().map(|bb| bb.max.y).max().unwrap_or(0) as f64;
    let string_cx = (min_x + max_x) / 2.0;
    let string_cy = (min_y + max_y) / 2.0;
    let cos_r = rotation.cos();
    let sin_r = rotation.sin();

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                if v <= 0.001 {
                    return;
                }
                let local_x = gx as f64 + bb.min.x as f64 - string_cx;
                let local_y = gy as f64 + bb.min.y as f64 - string_cy;
                let rx = local_x * cos_r - local_y * sin_r;
                let ry = local_x * sin_r + local_y * cos_r;
                draw_antialiased_pixel(canvas, center_x + rx, center_y + ry, color, v);
            });
        }
    }
}

fn draw_antialiased_pixel(canvas: &mut Canvas, x: f64, y: f64, color: Color, alpha: f32) {
    let x_floor = x.floor() as i32;
    let y_floor = y.floor() as i32;
    let x_frac = x - x_floor as f64;
    let y_frac = y - y_floor as f64;
    let samples = [
        (x_floor, y_floor, (1.0 - x_frac) * (1.0 - y_frac)),
        (x_floor + 1, y_floor, x_frac * (1.0 - y_frac)),
        (x_floor, y_floor + 1, (1.0 - x_frac) * y_frac),
        (x_floor + 1, y_floor + 1, x_frac * y_frac),
    ];
    for (px, py, weight) in samples {
        if px >= 0 && px < canvas.width as i32 && py >= 0 && py < canvas.height as i32 {
            let final_alpha = alpha * weight as f32;
            if final_alpha > 0.001 {
                set_pixel(
                    canvas.frame,
                    canvas.width,
                    px as usize,
                    py as usize,
                    color.r,
                    color.g,
                    color.b,
                    final_alpha,
                );
            }
        }
    }
}

/// Five-point star outline for the winner marker: alternating outer and
/// inner vertices connected with thick lines, plus a filled core.
fn draw_star(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    spikes: usize,
    outer_radius: f64,
    inner_radius: f64,
    color: Color,
) {
    let step = std::f64::consts::PI / spikes as f64;
    let mut angle = -std::f64::consts::FRAC_PI_2;
    let mut points = Vec::with_capacity(spikes * 2 + 1);
    for i in 0..spikes * 2 {
        let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
        points.push((cx + angle.cos() * radius, cy + angle.sin() * radius));
        angle += step;
    }
    points.push(points[0]);
    for pair in points.windows(2) {
        draw_thick_line_aa(
            canvas.frame,
            canvas.width,
            pair[0].0.round() as i32,
            pair[0].1.round() as i32,
            pair[1].0.round() as i32,
            pair[1].1.round() as i32,
            2.0,
            color.r,
            color.g,
            color.b,
        );
    }
    draw_circle_soft(canvas, cx, cy, inner_radius * 0.8, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SectorLayout;

    #[test]
    fn display_tiers_match_item_count() {
        assert_eq!(font_size_for(10), 16.0);
        assert_eq!(font_size_for(30), 14.0);
        assert_eq!(font_size_for(100), 12.0);
        assert_eq!(font_size_for(300), 10.0);
        assert_eq!(font_size_for(301), 8.0);

        assert_eq!(max_label_len(10), 15);
        assert_eq!(max_label_len(30), 12);
        assert_eq!(max_label_len(100), 8);
        assert_eq!(max_label_len(300), 6);
        assert_eq!(max_label_len(301), 4);
    }

    #[test]
    fn wheel_size_grows_then_caps() {
        assert_eq!(wheel_size_for(6, 400, 800), 400);
        assert_eq!(wheel_size_for(30, 400, 800), 500);
        assert_eq!(wheel_size_for(60, 400, 800), 620);
        assert_eq!(wheel_size_for(500, 400, 800), 800);
    }

    #[test]
    fn truncation_keeps_short_labels_and_ellipsizes_long_ones() {
        assert_eq!(truncate_label("short", 15), "short");
        assert_eq!(truncate_label("exactly-15-char", 15), "exactly-15-char");
        assert_eq!(truncate_label("a label that is too long", 8), "a label…");
        // Multi-byte labels truncate on characters, not bytes.
        assert_eq!(truncate_label("ラーメン大好き", 4), "ラーメ…");
    }

    #[test]
    fn render_paints_sector_colors_at_the_right_pixels() {
        let items = vec![
            Item::new("right-half", Some(1.0), "#FF0000"),
            Item::new("left-half", Some(1.0), "#0000FF"),
        ];
        let layout = SectorLayout::compute(&items).unwrap();
        let size = 200usize;
        let mut frame = vec![0u8; size * size * 4];
        let mut canvas = Canvas::new(&mut frame, size, size);
        render_wheel(
            &mut canvas,
            &layout,
            &items,
            0.0,
            None,
            None,
            &RenderConfig::default(),
        );
        // Sector 0 covers display angles [0, 180): straight down from
        // center is inside it (y grows downward), straight up is not.
        let pixel = |x: usize, y: usize| {
            let idx = (y * size + x) * 4;
            (frame[idx], frame[idx + 1], frame[idx + 2])
        };
        assert_eq!(pixel(100, 130), (0xff, 0x00, 0x00));
        assert_eq!(pixel(100, 70), (0x00, 0x00, 0xff));
    }

    #[test]
    fn rotation_moves_the_fill() {
        let items = vec![
            Item::new("a", Some(1.0), "#FF0000"),
            Item::new("b", Some(1.0), "#0000FF"),
        ];
        let layout = SectorLayout::compute(&items).unwrap();
        let size = 200usize;
        let mut frame = vec![0u8; size * size * 4];
        let mut canvas = Canvas::new(&mut frame, size, size);
        // Half a turn swaps the halves.
        render_wheel(
            &mut canvas,
            &layout,
            &items,
            180.0,
            None,
            None,
            &RenderConfig::default(),
        );
        let idx = (130 * size + 100) * 4;
        assert_eq!((frame[idx], frame[idx + 1], frame[idx + 2]), (0x00, 0x00, 0xff));
    }
}
