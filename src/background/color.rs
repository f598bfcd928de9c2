//! Brick colors

use rand::Rng;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel reduced by `amount`, floored at 0
    pub fn darken(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }

    /// Slow per-channel drift (±5) used to keep the wall alive
    pub fn shimmer(self, time: f32, phase: f32) -> Self {
        let drift = |base: u8, wave: f32| (base as f32 + wave * 5.0).round().clamp(6.0, 255.0) as u8;
        Self::new(
            drift(self.r, (time * 0.6 + phase).sin()),
            drift(self.g, (time * 0.62 + phase).cos()),
            drift(self.b, (time * 0.64 + phase).sin()),
        )
    }

    /// CSS `rgba()` string
    pub fn css(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }
}

/// Violet, cyan, aqua, warm orange
pub const PALETTE: [Rgb; 4] = [
    Rgb::new(0x8B, 0x5C, 0xF6),
    Rgb::new(0x06, 0xB6, 0xD4),
    Rgb::new(0x00, 0xE5, 0xFF),
    Rgb::new(0xFF, 0xB8, 0x6B),
];

/// Random palette entry
pub fn random_palette_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    PALETTE[rng.random_range(0..PALETTE.len())]
}
