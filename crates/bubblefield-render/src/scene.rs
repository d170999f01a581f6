//! Builds a passive display list from a field snapshot.
//!
//! Nothing here mutates the field or talks to a GPU: the output is plain
//! geometry and color the host rasterizes however it likes.

use crate::theme::Theme;
use bubblefield_core::{BubbleField, SelectionMode};
use kurbo::{Circle, Point, Vec2};
use peniko::Color;
use std::f64::consts::PI;

/// Radius multiplier while the pointer is over a bubble.
pub const HOVER_SCALE: f64 = 1.05;
/// Maximum extra radius for a fully-selected bubble; intermediate levels
/// scale proportionally.
pub const SELECT_SCALE_MAX: f64 = 0.1;
/// Fills brighter than this get a dark text shadow for contrast.
pub const SHADOW_LUMINANCE_THRESHOLD: f64 = 0.5;

/// Indicator dot radius as a fraction of the token radius.
const DOT_RADIUS_FRACTION: f64 = 1.0 / 8.0;
/// Angular spacing between indicator dots, radians.
const DOT_SPACING: f64 = 0.35;
/// Dots sit on this fraction of the drawn radius, along the lower arc.
const DOT_RING_FRACTION: f64 = 0.65;

/// Label drawing instructions for one bubble.
#[derive(Debug, Clone)]
pub struct LabelSpec {
    /// Label anchor: the bubble center; hosts center the text on it.
    pub origin: Point,
    pub text: String,
    /// Font size in logical units.
    pub font_size: f64,
    pub color: Color,
    /// Whether to draw a dark shadow behind the text (light fills only).
    pub shadow: bool,
}

/// Everything needed to draw one bubble.
#[derive(Debug, Clone)]
pub struct BubbleVisual {
    /// Token id, for hosts that cache per-bubble resources.
    pub id: String,
    /// Outline circle, already scaled for hover and selection.
    pub circle: Circle,
    pub fill: Color,
    pub label: LabelSpec,
    /// One dot per quarter step of selection, along the lower arc.
    pub dots: Vec<Circle>,
}

/// A full frame description, bubbles in field insertion order.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    pub bubbles: Vec<BubbleVisual>,
}

/// Describe the current field state as a display list.
pub fn render_field(field: &BubbleField) -> Scene {
    let config = field.config();
    let theme = Theme::from_config(config);

    let bubbles = field
        .tokens()
        .iter()
        .map(|token| {
            let level = token.level.value();
            let blend = if token.selected {
                match config.selection_mode {
                    SelectionMode::Single => 1.0,
                    SelectionMode::Multiple => level,
                }
            } else {
                0.0
            };

            let mut scale = 1.0 + SELECT_SCALE_MAX * blend;
            if token.hovered {
                scale *= HOVER_SCALE;
            }
            let drawn_radius = token.radius * scale;

            let fill = theme.base.lerp(theme.selected, blend);
            let label = LabelSpec {
                origin: token.position,
                text: token.label.clone(),
                font_size: token.radius * config.text_scale_factor,
                color: theme.text.to_peniko(),
                shadow: fill.luminance() > SHADOW_LUMINANCE_THRESHOLD,
            };

            BubbleVisual {
                id: token.id.clone(),
                circle: Circle::new(token.position, drawn_radius),
                fill: fill.to_peniko(),
                label,
                dots: level_dots(token.position, token.radius, drawn_radius, level),
            }
        })
        .collect();

    Scene {
        background: theme.background.to_peniko(),
        bubbles,
    }
}

/// Discrete per-level indicator dots, fanned around the bottom of the
/// bubble (screen y grows downward).
fn level_dots(center: Point, base_radius: f64, drawn_radius: f64, level: f64) -> Vec<Circle> {
    let count = (level * 4.0).round() as usize;
    if count == 0 {
        return Vec::new();
    }
    let dot_radius = base_radius * DOT_RADIUS_FRACTION;
    let ring = drawn_radius * DOT_RING_FRACTION;
    let first = PI / 2.0 - DOT_SPACING * (count as f64 - 1.0) / 2.0;

    (0..count)
        .map(|i| {
            let angle = first + DOT_SPACING * i as f64;
            Circle::new(center + Vec2::new(angle.cos(), angle.sin()) * ring, dot_radius)
        })
        .collect()
}
