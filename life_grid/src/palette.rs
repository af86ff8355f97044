//! Named color palettes for live cells.
//!
//! Colors are packed ARGB (`0xAARRGGBB`, alpha `0xFF`), ready for a
//! software framebuffer.  A cell's `color` is an index into
//! [`Palette::colors`].

/// Color of a dead cell inside the viewport.
pub const DEAD_COLOR: u32 = rgb(50, 50, 50);
/// Background showing through the 1 px gap between cells.
pub const BASE_COLOR: u32 = rgb(90, 90, 90);

/// Pack an RGB triple as opaque ARGB.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// An ordered list of cell colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<u32>,
    pub name:   &'static str,
}

impl Default for Palette {
    fn default() -> Self { Palette::vibrant_floral() }
}

impl Palette {
    pub fn light_green() -> Self {
        Palette { colors: vec![rgb(101, 243, 76)], name: "Light Green" }
    }
    pub fn light_blue() -> Self {
        Palette { colors: vec![rgb(141, 186, 242)], name: "Light Blue" }
    }
    pub fn cyber_soft() -> Self {
        Palette {
            colors: vec![rgb(77, 210, 255), rgb(255, 105, 180), rgb(127, 255, 212)],
            name:   "Cyber Soft",
        }
    }
    pub fn warm() -> Self {
        Palette {
            colors: vec![rgb(255, 159, 67), rgb(255, 215, 0), rgb(255, 127, 80)],
            name:   "Warm",
        }
    }
    /// Hibiscus, marigold, sunflower, iris, rose, morning glory.
    pub fn vibrant_floral() -> Self {
        Palette {
            colors: vec![
                rgb(255, 105, 180),
                rgb(255, 165,   0),
                rgb(255, 255,   0),
                rgb(138,  43, 226),
                rgb(220,  20,  60),
                rgb(  0, 191, 255),
            ],
            name: "Vibrant Floral",
        }
    }
    pub fn frutiger_aero() -> Self {
        Palette {
            colors: vec![
                rgb( 18, 153, 202),
                rgb( 53, 188, 222),
                rgb(111, 215, 236),
                rgb(156, 239, 242),
                rgb(241, 255, 205),
                rgb(204, 255, 124),
                rgb(159, 225,  29),
            ],
            name: "Frutiger Aero",
        }
    }
    pub fn cyberpunk_neon() -> Self {
        Palette {
            colors: vec![
                rgb(110, 203, 245),
                rgb(194,  82, 225),
                rgb(224, 217, 246),
                rgb( 88, 106, 226),
                rgb( 42,  35,  86),
            ],
            name: "Cyberpunk Neon",
        }
    }

    /// Every built-in palette, in menu order.
    pub fn all() -> Vec<Palette> {
        vec![
            Palette::light_green(),
            Palette::light_blue(),
            Palette::cyber_soft(),
            Palette::warm(),
            Palette::vibrant_floral(),
            Palette::frutiger_aero(),
            Palette::cyberpunk_neon(),
        ]
    }

    pub fn len(&self)      -> usize { self.colors.len() }
    pub fn is_empty(&self) -> bool  { self.colors.is_empty() }

    /// ARGB color for index `i`; out-of-range indices wrap.
    pub fn color(&self, i: u8) -> u32 {
        if self.colors.is_empty() { return DEAD_COLOR; }
        self.colors[i as usize % self.colors.len()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
