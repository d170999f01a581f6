//! BubbleField Render Library
//!
//! Turns a [`bubblefield_core::BubbleField`] snapshot into a passive
//! display list (circles, fills, labels, level-indicator dots). Hosts
//! rasterize the list with whatever drawing stack they have; this crate
//! deliberately stops at geometry and color.

pub mod scene;
pub mod theme;

pub use scene::{
    render_field, BubbleVisual, LabelSpec, Scene, HOVER_SCALE, SELECT_SCALE_MAX,
    SHADOW_LUMINANCE_THRESHOLD,
};
pub use theme::{Rgba, Theme};
