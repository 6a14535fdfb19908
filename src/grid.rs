//! Coordinate grid backdrop
//!
//! Level 0 splits the canvas in halves, level 1 in quarters, and so on.
//! Each finer level is drawn at half the alpha of the previous one.

use serde::{Deserialize, Serialize};

use crate::color::{ColorError, Rgb};
use crate::draw::DrawCommand;

/// Finest supported subdivision level
pub const MAX_LEVELS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub levels: u32,
    /// Alpha of the coarsest level (0-255)
    pub base_alpha: f64,
    pub color: String,
}

impl GridStyle {
    pub fn levels_in_range(&self) -> bool {
        self.levels <= MAX_LEVELS
    }
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            levels: 3,
            base_alpha: 200.0,
            color: "#dedede".to_string(),
        }
    }
}

/// Grid lines for a `width` x `height` canvas.
///
/// Levels past [`MAX_LEVELS`] are not drawn.
pub fn draw_grid(width: f64, height: f64, style: &GridStyle) -> Result<Vec<DrawCommand>, ColorError> {
    let color = Rgb::from_hex(&style.color)?;
    let mut cmds = Vec::new();

    for level in 0..style.levels.min(MAX_LEVELS) {
        let divisions = 2u64.pow(level + 1);
        let dx = width / divisions as f64;
        let dy = height / divisions as f64;
        let alpha = (style.base_alpha * 0.5f64.powi(level as i32)).round().clamp(0.0, 255.0) as u8;
        let stroke = color.with_alpha(alpha);
        let weight = if level == 0 { 2.0 } else { 1.0 };

        for k in 1..divisions {
            let x = dx * k as f64;
            cmds.push(DrawCommand::Line { x1: x, y1: 0.0, x2: x, y2: height, color: stroke, weight });
        }
        for k in 1..divisions {
            let y = dy * k as f64;
            cmds.push(DrawCommand::Line { x1: 0.0, y1: y, x2: width, y2: y, color: stroke, weight });
        }
    }

    Ok(cmds)
}

/// Optional dot lattice at the finest grid intersections
pub fn draw_dots(width: f64, height: f64, style: &GridStyle, diameter: f64) -> Result<Vec<DrawCommand>, ColorError> {
    let color = Rgb::from_hex(&style.color)?;
    let divisions = 2u64.pow(style.levels.clamp(1, MAX_LEVELS));
    let fill = color.with_alpha((style.base_alpha * 0.25).round().clamp(0.0, 255.0) as u8);
    let (dx, dy) = (width / divisions as f64, height / divisions as f64);

    let mut cmds = Vec::new();
    for i in 1..divisions {
        for j in 1..divisions {
            cmds.push(DrawCommand::Circle { x: dx * i as f64, y: dy * j as f64, diameter, fill });
        }
    }
    Ok(cmds)
}
