//! SVG export of a frame

use std::fmt::Write as _;
use std::path::Path;

use crate::draw::{flatten, DrawCommand, Primitive, TextAlign};

/// Serialize draw commands as a standalone SVG document
pub fn render_svg(commands: &[DrawCommand], width: f64, height: f64) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        "<!-- numeral_order, generated {} -->",
        chrono::Local::now().to_rfc3339()
    );

    for prim in flatten(commands) {
        match prim {
            Primitive::Background(c) => {
                let _ = writeln!(
                    svg,
                    r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}" fill-opacity="{:.3}"/>"#,
                    c.to_hex(),
                    c.opacity()
                );
            }
            Primitive::Line { from, to, color, weight } => {
                let _ = writeln!(
                    svg,
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-opacity="{:.3}" stroke-width="{}"/>"#,
                    from.0,
                    from.1,
                    to.0,
                    to.1,
                    color.to_hex(),
                    color.opacity(),
                    weight
                );
            }
            Primitive::Circle { center, radius, fill } => {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" fill-opacity="{:.3}"/>"#,
                    center.0,
                    center.1,
                    radius,
                    fill.to_hex(),
                    fill.opacity()
                );
            }
            Primitive::Text { pos, text, size, align, fill } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Right => "end",
                };
                let _ = writeln!(
                    svg,
                    r#"<text x="{:.2}" y="{:.2}" font-size="{}" font-family="sans-serif" text-anchor="{}" fill="{}">{}</text>"#,
                    pos.0,
                    pos.1,
                    size,
                    anchor,
                    fill.to_hex(),
                    escape_xml(&text)
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write the SVG to `path`
pub fn write_svg(commands: &[DrawCommand], width: f64, height: f64, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_svg(commands, width, height))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
