//! Quadrant layout engine
//!
//! Each language is drawn into one quarter of the canvas. Inside a quadrant
//! the x axis is counting order and the y axis is alphabetical rank, both
//! growing away from the canvas center:
//!
//! ```text
//!   +-----+-----+
//!   |  2  |  1  |
//!   +-----C-----+      C = canvas center
//!   |  3  |  4  |
//!   +-----+-----+
//! ```
//!
//! A language whose words sort in counting order lands on the diagonal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draw::{DrawCommand, TextAlign};
use crate::palette::{ColorRegistry, Palette};
use crate::rank::{compute_ranks, Collation, RankError, RankedEntry};

/// Gap between a point and its label
pub const LABEL_OFFSET: f64 = 5.0;
/// Leftward shift of a label anchor when it flips to right alignment
pub const LABEL_FLIP_SHIFT: f64 = 10.0;
/// In label mode only every n-th index or rank is drawn
pub const LANDMARK_EVERY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quadrant {
    One,
    Two,
    Three,
    Four,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::One, Quadrant::Two, Quadrant::Three, Quadrant::Four];

    pub fn number(self) -> u8 {
        match self {
            Quadrant::One => 1,
            Quadrant::Two => 2,
            Quadrant::Three => 3,
            Quadrant::Four => 4,
        }
    }
}

impl TryFrom<u8> for Quadrant {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Quadrant::One),
            2 => Ok(Quadrant::Two),
            3 => Ok(Quadrant::Three),
            4 => Ok(Quadrant::Four),
            other => Err(format!("quadrant must be 1-4, got {other}")),
        }
    }
}

impl From<Quadrant> for u8 {
    fn from(q: Quadrant) -> u8 {
        q.number()
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutStyle {
    pub text_size: f64,
    pub point_diameter: f64,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            text_size: 10.0,
            point_diameter: 4.0,
        }
    }
}

/// True for entries kept in label mode
pub fn is_landmark(entry: &RankedEntry) -> bool {
    entry.numeric_index % LANDMARK_EVERY == 0 || entry.alphabetical_rank % LANDMARK_EVERY == 0
}

/// Anchor x and alignment for a label next to a point at `x`.
///
/// Text width is estimated as `text_size` per character; a label that would
/// cross `half_width` is right-aligned instead so it stays in its quadrant.
pub fn label_anchor(x: f64, label: &str, text_size: f64, half_width: f64) -> (f64, TextAlign) {
    let anchor = x + LABEL_OFFSET;
    let right_edge = anchor + text_size * label.chars().count() as f64;
    if right_edge > half_width {
        (anchor - LABEL_FLIP_SHIFT, TextAlign::Right)
    } else {
        (anchor, TextAlign::Left)
    }
}

/// Lays out languages into the quadrants of a `width` x `height` canvas
#[derive(Debug, Clone)]
pub struct QuadrantLayout {
    width: f64,
    height: f64,
    style: LayoutStyle,
}

impl QuadrantLayout {
    pub fn new(width: f64, height: f64, style: LayoutStyle) -> Self {
        Self { width, height, style }
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    /// Canvas position of the quadrant's inner corner
    pub fn origin(&self, quadrant: Quadrant) -> (f64, f64) {
        let tx = match quadrant {
            Quadrant::One | Quadrant::Four => self.half_width(),
            Quadrant::Two | Quadrant::Three => 0.0,
        };
        let ty = match quadrant {
            Quadrant::One | Quadrant::Two => self.half_height(),
            Quadrant::Three | Quadrant::Four => self.height,
        };
        (tx, ty)
    }

    /// Quadrant-local position of an entry among `n`
    pub fn point(&self, entry: &RankedEntry, n: usize) -> (f64, f64) {
        let h_step = self.half_width() / (n + 1) as f64;
        let v_step = self.half_height() / (n + 1) as f64;
        (
            (entry.numeric_index + 1) as f64 * h_step,
            (entry.alphabetical_rank + 1) as f64 * v_step,
        )
    }

    /// Draw commands for one language in one quadrant.
    ///
    /// The language is bound to a palette color on first use; an empty list
    /// is rejected before any binding happens.
    #[allow(clippy::too_many_arguments)]
    pub fn layout_quadrant<C: Collation + ?Sized>(
        &self,
        quadrant: Quadrant,
        language: &str,
        numbers: &[String],
        collation: &C,
        show_labels: bool,
        palette: &Palette,
        colors: &mut ColorRegistry,
    ) -> Result<Vec<DrawCommand>, RankError> {
        let ranked = compute_ranks(numbers, collation)?;
        let fill = colors.color_for(language, palette).opaque();
        let n = ranked.len();
        let (tx, ty) = self.origin(quadrant);

        let mut cmds = vec![
            DrawCommand::Push,
            DrawCommand::Translate { x: tx, y: ty },
            DrawCommand::Scale { x: 1.0, y: -1.0 },
        ];

        for entry in &ranked {
            if show_labels && !is_landmark(entry) {
                continue;
            }
            let (x, y) = self.point(entry, n);
            cmds.push(DrawCommand::Circle {
                x,
                y,
                diameter: self.style.point_diameter,
                fill,
            });

            if show_labels {
                let (anchor, align) =
                    label_anchor(x, &entry.label, self.style.text_size, self.half_width());
                cmds.push(DrawCommand::Push);
                cmds.push(DrawCommand::Scale { x: 1.0, y: -1.0 });
                cmds.push(DrawCommand::Text {
                    x: anchor,
                    y: -y,
                    text: entry.label.clone(),
                    size: self.style.text_size,
                    align,
                    fill,
                });
                cmds.push(DrawCommand::Pop);
            }
        }

        cmds.push(DrawCommand::Pop);
        tracing::trace!(
            "Laid out {} entries of '{}' in {} (labels: {})",
            n,
            language,
            quadrant,
            show_labels
        );
        Ok(cmds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{flatten, Primitive};
    use crate::palette::build_palette;
    use std::cmp::Ordering;
    use std::collections::BTreeSet;

    fn code_points(a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }

    fn english(n: usize) -> Vec<String> {
        const ONES: [&str; 10] =
            ["", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine"];
        const TEENS: [&str; 10] = [
            "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
            "eighteen", "nineteen",
        ];
        const TENS: [&str; 10] =
            ["", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety"];
        (1..=n)
            .map(|k| match k {
                1..=9 => ONES[k].to_string(),
                10..=19 => TEENS[k - 10].to_string(),
                _ if k % 10 == 0 => TENS[k / 10].to_string(),
                _ => format!("{}-{}", TENS[k / 10], ONES[k % 10]),
            })
            .collect()
    }

    fn setup() -> (QuadrantLayout, Palette, ColorRegistry) {
        let layout = QuadrantLayout::new(400.0, 400.0, LayoutStyle::default());
        let palette = build_palette(&["#e6194b", "#3cb44b", "#4363d8"], 2).unwrap();
        (layout, palette, ColorRegistry::new())
    }

    fn circles(cmds: &[DrawCommand]) -> Vec<(f64, f64)> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_quadrant_origins() {
        let layout = QuadrantLayout::new(200.0, 100.0, LayoutStyle::default());
        assert_eq!(layout.origin(Quadrant::One), (100.0, 50.0));
        assert_eq!(layout.origin(Quadrant::Two), (0.0, 50.0));
        assert_eq!(layout.origin(Quadrant::Three), (0.0, 100.0));
        assert_eq!(layout.origin(Quadrant::Four), (100.0, 100.0));
    }

    #[test]
    fn test_first_quadrant_is_top_right() {
        let (layout, palette, mut colors) = setup();
        let words = english(3);
        let cmds = layout
            .layout_quadrant(Quadrant::One, "english", &words, &code_points, false, &palette, &mut colors)
            .unwrap();
        assert_eq!(cmds[1], DrawCommand::Translate { x: 200.0, y: 200.0 });

        let cmds = layout
            .layout_quadrant(Quadrant::Two, "english", &words, &code_points, false, &palette, &mut colors)
            .unwrap();
        assert_eq!(cmds[1], DrawCommand::Translate { x: 0.0, y: 200.0 });
    }

    #[test]
    fn test_quadrant_from_number() {
        assert_eq!(Quadrant::try_from(3), Ok(Quadrant::Three));
        assert!(Quadrant::try_from(0).is_err());
        assert!(Quadrant::try_from(5).is_err());
    }

    #[test]
    fn test_points_land_in_their_quadrant() {
        let (layout, palette, mut colors) = setup();
        let words = english(30);
        for quadrant in Quadrant::ALL {
            let cmds = layout
                .layout_quadrant(quadrant, "english", &words, &code_points, false, &palette, &mut colors)
                .unwrap();
            for prim in flatten(&cmds) {
                if let Primitive::Circle { center: (x, y), .. } = prim {
                    let right = x > 200.0;
                    let top = y < 200.0;
                    let expected = match quadrant {
                        Quadrant::One => (true, true),
                        Quadrant::Two => (false, true),
                        Quadrant::Three => (false, false),
                        Quadrant::Four => (true, false),
                    };
                    assert_eq!((right, top), expected, "{quadrant} point at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_sorted_language_sits_on_diagonal() {
        let (layout, palette, mut colors) = setup();
        let words: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let cmds = layout
            .layout_quadrant(Quadrant::One, "abc", &words, &code_points, false, &palette, &mut colors)
            .unwrap();
        let points = circles(&cmds);
        assert_eq!(points, vec![(40.0, 40.0), (80.0, 80.0), (120.0, 120.0), (160.0, 160.0)]);
    }

    #[test]
    fn test_all_points_without_labels() {
        let (layout, palette, mut colors) = setup();
        let words = english(45);
        let cmds = layout
            .layout_quadrant(Quadrant::Two, "english", &words, &code_points, false, &palette, &mut colors)
            .unwrap();
        assert_eq!(circles(&cmds).len(), 45);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Text { .. })));
    }

    #[test]
    fn test_label_mode_keeps_landmarks_only() {
        let (layout, palette, mut colors) = setup();
        let words = english(45);
        let ranked = compute_ranks(&words, &code_points).unwrap();
        let expected: BTreeSet<String> =
            ranked.iter().filter(|e| is_landmark(e)).map(|e| e.label.clone()).collect();

        let cmds = layout
            .layout_quadrant(Quadrant::Three, "english", &words, &code_points, true, &palette, &mut colors)
            .unwrap();
        let drawn: BTreeSet<String> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(drawn, expected);
        assert_eq!(circles(&cmds).len(), expected.len());
        assert!(expected.len() < words.len());
    }

    #[test]
    fn test_label_flips_at_quadrant_edge() {
        // 85 + 5 + 10 * 12 > 100
        assert_eq!(label_anchor(85.0, "twelve chars", 10.0, 100.0), (80.0, TextAlign::Right));
        assert_eq!(label_anchor(10.0, "one", 10.0, 100.0), (15.0, TextAlign::Left));
    }

    #[test]
    fn test_labels_are_drawn_upright() {
        let (layout, palette, mut colors) = setup();
        let words: Vec<String> = ["one", "two", "three"].iter().map(|s| s.to_string()).collect();
        let cmds = layout
            .layout_quadrant(Quadrant::One, "english", &words, &code_points, true, &palette, &mut colors)
            .unwrap();
        let prims = flatten(&cmds);

        let circle_y: Vec<f64> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle { center, .. } => Some(center.1),
                _ => None,
            })
            .collect();
        let text_y: Vec<f64> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { pos, .. } => Some(pos.1),
                _ => None,
            })
            .collect();
        assert_eq!(circle_y, text_y);
    }

    #[test]
    fn test_color_stays_bound_across_calls() {
        let (layout, palette, mut colors) = setup();
        let words = english(12);
        let fill_of = |cmds: &[DrawCommand]| {
            cmds.iter().find_map(|c| match c {
                DrawCommand::Circle { fill, .. } => Some(*fill),
                _ => None,
            })
        };

        let first = layout
            .layout_quadrant(Quadrant::One, "english", &words, &code_points, false, &palette, &mut colors)
            .unwrap();
        let other = layout
            .layout_quadrant(Quadrant::Two, "german", &words, &code_points, false, &palette, &mut colors)
            .unwrap();
        let again = layout
            .layout_quadrant(Quadrant::Four, "english", &words, &code_points, true, &palette, &mut colors)
            .unwrap();

        assert_eq!(fill_of(&first), fill_of(&again));
        assert_ne!(fill_of(&first), fill_of(&other));
    }

    #[test]
    fn test_empty_list_renders_nothing_and_binds_no_color() {
        let (layout, palette, mut colors) = setup();
        let err = layout
            .layout_quadrant(Quadrant::One, "klingon", &[], &code_points, false, &palette, &mut colors)
            .unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(_)));
        assert!(colors.languages().is_empty());
    }
}
