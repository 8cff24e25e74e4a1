const ICON_SIZE: u32 = 22;
const BACKGROUND_ALPHA: u8 = 200;
const IDLE_RGB: (u8, u8, u8) = (110, 110, 110);

pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn muted_rgb(color: (u8, u8, u8)) -> (u8, u8, u8) {
    let (r, g, b) = color;
    (
        (r as f32 * 0.35) as u8,
        (g as f32 * 0.35) as u8,
        (b as f32 * 0.35) as u8,
    )
}

/// Draws the tray icon: a tile with a list glyph, plus a dot in the badge
/// colour while the badge has text.
pub struct IconRenderer {
    size: u32,
}

impl IconRenderer {
    pub fn new() -> Self {
        Self { size: ICON_SIZE }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// RGBA pixels, row-major.
    pub fn render(&self, badge_active: bool, badge_color: (u8, u8, u8)) -> Vec<u8> {
        let width = self.size as usize;
        let height = self.size as usize;
        let mut pixels = vec![0u8; width * height * 4];

        let base = if badge_active { badge_color } else { IDLE_RGB };
        let (r, g, b) = muted_rgb(base);
        self.draw_rounded_rect(&mut pixels, width, height, 5.0, (r, g, b, BACKGROUND_ALPHA));

        // Three rows standing in for a job list
        let row_height = (height as f64 * 0.12).max(1.0) as usize;
        let row_x = 4;
        let row_width = width - 8;
        for i in 0..3 {
            let y = 5 + i * (row_height + 3);
            self.fill_rect(&mut pixels, width, row_x, y, row_width, row_height, (235, 235, 235, 255));
        }

        if badge_active {
            let radius = width as f32 * 0.22;
            let cx = width as f32 - radius - 0.5;
            let cy = radius + 0.5;
            let (br, bg, bb) = badge_color;
            self.fill_circle(&mut pixels, width, cx, cy, radius, (br, bg, bb, 255));
        }

        pixels
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_rect(
        &self,
        pixels: &mut [u8],
        stride: usize,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        color: (u8, u8, u8, u8),
    ) {
        for dy in 0..height {
            for dx in 0..width {
                let idx = ((y + dy) * stride + x + dx) * 4;
                put(pixels, idx, color);
            }
        }
    }

    fn fill_circle(
        &self,
        pixels: &mut [u8],
        stride: usize,
        cx: f32,
        cy: f32,
        radius: f32,
        color: (u8, u8, u8, u8),
    ) {
        let rows = pixels.len() / 4 / stride;
        for y in 0..rows {
            for x in 0..stride {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    put(pixels, (y * stride + x) * 4, color);
                }
            }
        }
    }

    fn draw_rounded_rect(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        radius: f32,
        color: (u8, u8, u8, u8),
    ) {
        for y in 0..height {
            for x in 0..width {
                if inside_rounded_rect(x, y, width, height, radius) {
                    put(pixels, (y * width + x) * 4, color);
                }
            }
        }
    }
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn put(pixels: &mut [u8], idx: usize, color: (u8, u8, u8, u8)) {
    if idx + 3 < pixels.len() {
        let (r, g, b, a) = color;
        pixels[idx] = r;
        pixels[idx + 1] = g;
        pixels[idx + 2] = b;
        pixels[idx + 3] = a;
    }
}

/// StatusNotifierItem pixmaps are ARGB32 in network byte order.
pub fn rgba_to_argb(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(4)
        .flat_map(|px| [px[3], px[0], px[1], px[2]])
        .collect()
}

fn inside_rounded_rect(x: usize, y: usize, width: usize, height: usize, radius: f32) -> bool {
    let x = x as f32;
    let y = y as f32;
    let width = width as f32;
    let height = height as f32;
    let r = radius.max(0.0);

    if x >= r && x < width - r {
        return true;
    }
    if y >= r && y < height - r {
        return true;
    }

    let cx = if x < r { r } else { width - r };
    let cy = if y < r { r } else { height - r };
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_correct_size() {
        let renderer = IconRenderer::new();
        let pixels = renderer.render(false, (37, 99, 235));
        assert_eq!(pixels.len(), 22 * 22 * 4);
    }

    #[test]
    fn test_badge_dot_uses_badge_color() {
        let renderer = IconRenderer::new();
        let pixels = renderer.render(true, (37, 99, 235));
        // Centre of the dot in the top-right corner
        let idx = (5 * 22 + 17) * 4;
        assert_eq!(&pixels[idx..idx + 4], &[37, 99, 235, 255]);

        let idle = renderer.render(false, (37, 99, 235));
        assert_ne!(&idle[idx..idx + 4], &[37, 99, 235, 255]);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#2563eb"), Some((0x25, 0x63, 0xeb)));
        assert_eq!(parse_hex("2563eb"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_rgba_to_argb() {
        assert_eq!(rgba_to_argb(&[1, 2, 3, 4, 5, 6, 7, 8]), vec![4, 1, 2, 3, 8, 5, 6, 7]);
    }
}
