//! Draw commands
//!
//! The layout code speaks in canvas-style commands (push/pop, translate,
//! scale, primitives). Hosts call [`flatten`] to resolve the transform stack
//! into device-space primitives with a y-down origin at the top-left corner.

use serde::Serialize;

use crate::color::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Background {
        color: Rgba,
    },
    Push,
    Pop,
    Translate {
        x: f64,
        y: f64,
    },
    Scale {
        x: f64,
        y: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgba,
        weight: f64,
    },
    Circle {
        x: f64,
        y: f64,
        diameter: f64,
        fill: Rgba,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        align: TextAlign,
        fill: Rgba,
    },
}

/// Translate + axis-aligned scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { sx: 1.0, sy: 1.0, tx: 0.0, ty: 0.0 };

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.sx * x + self.tx, self.sy * y + self.ty)
    }

    fn translate(&self, x: f64, y: f64) -> Self {
        Self {
            tx: self.tx + self.sx * x,
            ty: self.ty + self.sy * y,
            ..*self
        }
    }

    fn scale(&self, x: f64, y: f64) -> Self {
        Self {
            sx: self.sx * x,
            sy: self.sy * y,
            ..*self
        }
    }
}

/// Device-space primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Background(Rgba),
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgba,
        weight: f64,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        fill: Rgba,
    },
    Text {
        pos: (f64, f64),
        text: String,
        size: f64,
        align: TextAlign,
        fill: Rgba,
    },
}

/// Resolve push/pop/translate/scale into device coordinates.
///
/// Text glyphs are always drawn upright; only their anchor is transformed.
/// A `Pop` without a matching `Push` is ignored.
pub fn flatten(commands: &[DrawCommand]) -> Vec<Primitive> {
    let mut stack: Vec<Affine> = Vec::new();
    let mut current = Affine::IDENTITY;
    let mut out = Vec::with_capacity(commands.len());

    for cmd in commands {
        match cmd {
            DrawCommand::Background { color } => out.push(Primitive::Background(*color)),
            DrawCommand::Push => stack.push(current),
            DrawCommand::Pop => match stack.pop() {
                Some(t) => current = t,
                None => tracing::warn!("Unbalanced pop in draw command list"),
            },
            DrawCommand::Translate { x, y } => current = current.translate(*x, *y),
            DrawCommand::Scale { x, y } => current = current.scale(*x, *y),
            DrawCommand::Line { x1, y1, x2, y2, color, weight } => out.push(Primitive::Line {
                from: current.apply(*x1, *y1),
                to: current.apply(*x2, *y2),
                color: *color,
                weight: *weight,
            }),
            DrawCommand::Circle { x, y, diameter, fill } => out.push(Primitive::Circle {
                center: current.apply(*x, *y),
                radius: diameter / 2.0,
                fill: *fill,
            }),
            DrawCommand::Text { x, y, text, size, align, fill } => out.push(Primitive::Text {
                pos: current.apply(*x, *y),
                text: text.clone(),
                size: *size,
                align: *align,
                fill: *fill,
            }),
        }
    }

    if !stack.is_empty() {
        tracing::warn!("{} unmatched push(es) in draw command list", stack.len());
    }
    out
}
