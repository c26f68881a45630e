/// Popularity to font size and base color.
///
/// Font size:
///   t      = clamp((count - min) / (max - min), 0, 1)   (0 when max == min)
///   eased  = t ^ 0.65                                    (sub-linear)
///   size   = lerp(1.2, 8.0, eased)
///
/// Base color is a pure function of rank: 1 gold, 2 silver, 3 bronze,
/// everything else neutral. Hover highlight is not decided here; the
/// animator blends toward it.

use std::rc::Rc;

use crate::cloud::CloudData;
use crate::config::{CloudConfig, PaletteConfig};
use crate::error::CloudError;
use crate::render::sphere;

/// Linear RGBA, 0.0–1.0 per channel
pub type Color = [f32; 4];

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to normalized f32 (for rendering)
    #[inline(always)]
    pub fn to_f32(self) -> Color {
        const INV_255: f32 = 1.0 / 255.0;
        [
            self.r as f32 * INV_255,
            self.g as f32 * INV_255,
            self.b as f32 * INV_255,
            self.a as f32 * INV_255,
        ]
    }
}

#[inline]
fn hex_nibble(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Parse CSS hex color: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
pub fn parse_hex_color(s: &str) -> Result<Rgba, CloudError> {
    let invalid = || CloudError::InvalidColor(s.to_string());
    let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
    let nibbles = digits
        .bytes()
        .map(hex_nibble)
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(invalid)?;

    let short = match nibbles.len() {
        3 | 4 => true,
        6 | 8 => false,
        _ => return Err(invalid()),
    };
    let channel = |i: usize| -> u8 {
        if short {
            nibbles[i] << 4 | nibbles[i]
        } else {
            nibbles[2 * i] << 4 | nibbles[2 * i + 1]
        }
    };
    let has_alpha = matches!(nibbles.len(), 4 | 8);

    Ok(Rgba {
        r: channel(0),
        g: channel(1),
        b: channel(2),
        a: if has_alpha { channel(3) } else { 255 },
    })
}

// ── Rank tiers ──

/// Podium tier derived from rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
    Neutral,
}

impl Tier {
    pub fn from_rank(rank: u32) -> Self {
        match rank {
            1 => Tier::Gold,
            2 => Tier::Silver,
            3 => Tier::Bronze,
            _ => Tier::Neutral,
        }
    }
}

/// Resolved palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub gold: Color,
    pub silver: Color,
    pub bronze: Color,
    pub neutral: Color,
    pub highlight: Color,
}

impl Palette {
    pub fn from_config(cfg: &PaletteConfig) -> Result<Self, CloudError> {
        Ok(Self {
            gold: parse_hex_color(&cfg.gold)?.to_f32(),
            silver: parse_hex_color(&cfg.silver)?.to_f32(),
            bronze: parse_hex_color(&cfg.bronze)?.to_f32(),
            neutral: parse_hex_color(&cfg.neutral)?.to_f32(),
            highlight: parse_hex_color(&cfg.highlight)?.to_f32(),
        })
    }

    pub fn tier_color(&self, tier: Tier) -> Color {
        match tier {
            Tier::Gold => self.gold,
            Tier::Silver => self.silver,
            Tier::Bronze => self.bronze,
            Tier::Neutral => self.neutral,
        }
    }

    /// Resting color for an item of the given rank.
    pub fn base_color(&self, rank: u32) -> Color {
        self.tier_color(Tier::from_rank(rank))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            gold: Rgba::opaque(0xFF, 0xD7, 0x00).to_f32(),
            silver: Rgba::opaque(0xC0, 0xC0, 0xC0).to_f32(),
            bronze: Rgba::opaque(0xCD, 0x7F, 0x32).to_f32(),
            neutral: Rgba::WHITE.to_f32(),
            highlight: Rgba::opaque(0x00, 0xE5, 0xFF).to_f32(),
        }
    }
}

// ── Interpolation ──

#[inline(always)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
        lerp(a[3], b[3], t),
    ]
}

// ── Font size ──

/// Count → font size mapping for one batch
#[derive(Debug, Clone, Copy)]
pub struct SizeScale {
    pub min_count: u32,
    pub max_count: u32,
    pub min_size: f32,
    pub max_size: f32,
    pub exponent: f32,
}

impl SizeScale {
    pub fn new(count_range: Option<(u32, u32)>, cfg: &CloudConfig) -> Self {
        let (min_count, max_count) = count_range.unwrap_or((0, 0));
        Self {
            min_count,
            max_count,
            min_size: cfg.min_font_size,
            max_size: cfg.max_font_size,
            exponent: cfg.size_exponent,
        }
    }

    /// Normalized popularity in [0, 1]; 0 for every item when all counts match.
    pub fn normalized(&self, count: u32) -> f32 {
        if self.max_count <= self.min_count {
            return 0.0;
        }
        let span = (self.max_count - self.min_count) as f32;
        ((count as f32 - self.min_count as f32) / span).clamp(0.0, 1.0)
    }

    pub fn font_size(&self, count: u32) -> f32 {
        let eased = self.normalized(count).powf(self.exponent);
        lerp(self.min_size, self.max_size, eased)
    }
}

// ── Per-item visual encoding ──

/// Static visual encoding of one item: where it sits, how big, which color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    pub position: [f32; 3],
    pub font_size: f32,
    pub base_color: Color,
    /// Per-item bob phase (`rank * bob_phase_per_rank`)
    pub bob_phase: f32,
}

/// Encode every item of a batch. Index-aligned with `data.items()`.
pub fn encode_items(data: &CloudData, cfg: &CloudConfig, palette: &Palette) -> Vec<ItemVisual> {
    let scale = SizeScale::new(data.count_range(), cfg);
    let placements = sphere::layout(data.len(), cfg.sphere_radius);

    data.items()
        .iter()
        .zip(placements)
        .map(|(item, p)| ItemVisual {
            position: p.position,
            font_size: scale.font_size(item.count),
            base_color: palette.base_color(item.rank),
            bob_phase: item.rank as f32 * cfg.bob_phase_per_rank,
        })
        .collect()
}

/// Runs `encode_items` once per `CloudData` handle; remounts share the result.
#[derive(Debug, Default)]
pub struct VisualCache {
    source: Option<Rc<CloudData>>,
    visuals: Option<Rc<[ItemVisual]>>,
    builds: usize,
}

impl VisualCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded visuals for `data`, reused while the handle is unchanged.
    pub fn resolve(
        &mut self,
        data: &Rc<CloudData>,
        cfg: &CloudConfig,
        palette: &Palette,
    ) -> Rc<[ItemVisual]> {
        if let (Some(src), Some(visuals)) = (&self.source, &self.visuals) {
            if Rc::ptr_eq(src, data) {
                return Rc::clone(visuals);
            }
        }
        let visuals: Rc<[ItemVisual]> = encode_items(data, cfg, palette).into();
        self.source = Some(Rc::clone(data));
        self.visuals = Some(Rc::clone(&visuals));
        self.builds += 1;
        visuals
    }

    /// Number of encodings performed so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
