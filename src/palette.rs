//! Language color palette
//!
//! A palette is built once at startup from a handful of base hues. Each hue
//! yields `shades` lighter variants; the palette is then reordered so that
//! all shade-0 colors come first, then all shade-1 colors, and so on. The
//! first languages to be drawn therefore get distinct hues before any hue
//! family repeats.

use std::collections::HashMap;

use crate::color::{ColorError, Rgb};

/// Percentage step toward white between consecutive shades
pub const SHADE_STEP_PERCENT: i32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub base_index: usize,
    pub shade_index: usize,
    pub hex: String,
    pub rgb: Rgb,
}

/// Ordered palette in consumption order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entry for a registry slot; slots past the end wrap around
    pub fn for_slot(&self, slot: usize) -> Option<&PaletteEntry> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(slot % self.entries.len())
    }

    pub fn hex_colors(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.hex.clone()).collect()
    }
}

/// Build the shade-major palette for `base_colors`
pub fn build_palette<S: AsRef<str>>(
    base_colors: &[S],
    shades: usize,
) -> Result<Palette, ColorError> {
    let mut flat = Vec::with_capacity(base_colors.len() * shades);

    for (base_index, hex) in base_colors.iter().enumerate() {
        let base = Rgb::from_hex(hex.as_ref())?;
        for shade_index in 0..shades {
            let rgb = base.shade(shade_index as i32 * SHADE_STEP_PERCENT);
            flat.push(PaletteEntry {
                base_index,
                shade_index,
                hex: rgb.to_hex(),
                rgb,
            });
        }
    }

    // Stable: base order is kept within each shade group
    let mut indexed: Vec<(usize, PaletteEntry)> = flat.into_iter().enumerate().collect();
    indexed.sort_by_key(|(i, _)| i % shades);
    let entries = indexed.into_iter().map(|(_, e)| e).collect();

    tracing::debug!(
        "Built palette: {} base colors x {} shades",
        base_colors.len(),
        shades
    );
    Ok(Palette { entries })
}

/// Session-wide binding of languages to palette slots.
///
/// Append-only: a language keeps the slot it got on first encounter.
#[derive(Debug, Clone, Default)]
pub struct ColorRegistry {
    order: Vec<String>,
    slots: HashMap<String, usize>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot bound to `language`, binding the next free one if unseen
    pub fn slot_for(&mut self, language: &str) -> usize {
        if let Some(&slot) = self.slots.get(language) {
            return slot;
        }
        self.order.push(language.to_string());
        let slot = self.order.len() - 1;
        self.slots.insert(language.to_string(), slot);
        tracing::debug!("Language '{}' bound to color slot {}", language, slot);
        slot
    }

    /// Color for `language`; slots past the palette end wrap around
    pub fn color_for(&mut self, language: &str, palette: &Palette) -> Rgb {
        let slot = self.slot_for(language);
        palette.for_slot(slot).map(|e| e.rgb).unwrap_or(Rgb::gray(255))
    }

    pub fn get(&self, language: &str) -> Option<usize> {
        self.slots.get(language).copied()
    }

    /// Languages in first-seen order
    pub fn languages(&self) -> &[String] {
        &self.order
    }
}
