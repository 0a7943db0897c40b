//! Colors, palettes and the nested configuration structs for rendering
//! and audio.

use crate::layout::Item;

/// Color representation for wheel elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#RGB` / `#RRGGBB` hex or one of the named allow-list
    /// colors. Anything else is rejected so callers can fall back to a
    /// palette color.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        let lower = token.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).unwrap() as u8);
                let (r, g, b) = (
                    digits.next().unwrap(),
                    digits.next().unwrap(),
                    digits.next().unwrap(),
                );
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap();
                Some(Self::new(byte(0), byte(2), byte(4)))
            }
            _ => None,
        }
    }

    /// Linear blend toward `other`; used for the winner's gold rim glow.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

/// CSS color names accepted in the CSV color column.
pub const NAMED_COLORS: [(&str, Color); 22] = [
    ("red", Color::new(0xff, 0x00, 0x00)),
    ("green", Color::new(0x00, 0x80, 0x00)),
    ("blue", Color::new(0x00, 0x00, 0xff)),
    ("yellow", Color::new(0xff, 0xff, 0x00)),
    ("orange", Color::new(0xff, 0xa5, 0x00)),
    ("purple", Color::new(0x80, 0x00, 0x80)),
    ("pink", Color::new(0xff, 0xc0, 0xcb)),
    ("brown", Color::new(0xa5, 0x2a, 0x2a)),
    ("black", Color::new(0x00, 0x00, 0x00)),
    ("white", Color::new(0xff, 0xff, 0xff)),
    ("gray", Color::new(0x80, 0x80, 0x80)),
    ("grey", Color::new(0x80, 0x80, 0x80)),
    ("cyan", Color::new(0x00, 0xff, 0xff)),
    ("magenta", Color::new(0xff, 0x00, 0xff)),
    ("lime", Color::new(0x00, 0xff, 0x00)),
    ("navy", Color::new(0x00, 0x00, 0x80)),
    ("maroon", Color::new(0x80, 0x00, 0x00)),
    ("olive", Color::new(0x80, 0x80, 0x00)),
    ("aqua", Color::new(0x00, 0xff, 0xff)),
    ("silver", Color::new(0xc0, 0xc0, 0xc0)),
    ("teal", Color::new(0x00, 0x80, 0x80)),
    ("fuchsia", Color::new(0xff, 0x00, 0xff)),
];

/// Default palette cycled for items that arrive without a usable color.
pub const DEFAULT_PALETTE: [&str; 24] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD",
    "#FF9F43", "#10AC84", "#5F27CD", "#00D2D3", "#FF6348", "#2ED573",
    "#A742FF", "#FF5722", "#8BC34A", "#2196F3", "#FF9800", "#9C27B0",
    "#E91E63", "#795548", "#607D8B", "#FF7043", "#66BB6A", "#42A5F5",
];

/// Palette color for a given row position, cycling past the end.
pub fn palette_color(index: usize) -> &'static str {
    DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
}

/// Placeholder wheel installed when persistence has nothing to offer.
pub fn default_items() -> Vec<Item> {
    (1..=6)
        .map(|i| Item::new(format!("Option {i}"), Some(1.0), palette_color(i - 1)))
        .collect()
}

/// Configuration for the wheel face
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Gap between the wheel rim and the window edge; the pointer lives here.
    pub margin: i32,
    pub background: Color,
    pub separator_color: Color,
    pub separator_thickness: f32,
    pub text_color: Color,
    pub pointer_color: Color,
    /// Winner accents: gold glow, rim and star.
    pub winner_color: Color,
    /// Fallback fill when an item's color token fails to parse.
    pub fallback_fill: Color,
    /// Radius fraction where the winner glow starts blending toward gold.
    pub glow_start: f64,
    /// Radius fraction of the winner star's center.
    pub star_radius_factor: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            margin: 40,
            background: Color::new(0xff, 0xff, 0xff),
            separator_color: Color::new(0xff, 0xff, 0xff),
            separator_thickness: 2.0,
            text_color: Color::new(0x00, 0x00, 0x00),
            pointer_color: Color::new(0x22, 0x22, 0x22),
            winner_color: Color::new(0xff, 0xd7, 0x00),
            fallback_fill: Color::new(0xc0, 0xc0, 0xc0),
            glow_start: 0.7,
            star_radius_factor: 0.75,
        }
    }
}

/// Configuration for application window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub base_size: usize,
    pub max_size: usize,
    pub max_framerate: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            base_size: 400,
            max_size: 800,
            max_framerate: 60.0,
        }
    }
}

/// Configuration for the synthesized feedback sounds
#[derive(Debug, Clone, PartialEq)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// First click interval in milliseconds.
    pub click_start_ms: u64,
    /// Interval ceiling the clicks relax toward.
    pub click_ceiling_ms: u64,
    /// Geometric relaxation factor applied per click.
    pub click_relax: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            click_start_ms: 50,
            click_ceiling_ms: 300,
            click_relax: 1.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Color::parse("#FF6B6B"), Some(Color::new(0xff, 0x6b, 0x6b)));
        assert_eq!(Color::parse("#fff"), Some(Color::new(0xff, 0xff, 0xff)));
        assert_eq!(Color::parse("#a1b"), Some(Color::new(0xaa, 0x11, 0xbb)));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gggggg"), None);
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(Color::parse("Teal"), Some(Color::new(0x00, 0x80, 0x80)));
        assert_eq!(Color::parse("GREY"), Color::parse("gray"));
        assert_eq!(Color::parse("chartreuse"), None);
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), "#FF6B6B");
        assert_eq!(palette_color(24), "#FF6B6B");
        assert_eq!(palette_color(25), "#4ECDC4");
    }

    #[test]
    fn default_items_are_six_distinct_options() {
        let items = default_items();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].label, "Option 1");
        assert_eq!(items[5].color, DEFAULT_PALETTE[5]);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::new(0, 0, 0);
        let b = Color::new(255, 255, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(128, 128, 128));
    }
}
