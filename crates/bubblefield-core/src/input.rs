//! Unified pointer/touch events and per-field pointer state.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A pointer event in surface coordinates.
///
/// Mouse and touch share one vocabulary; hosts translate their native
/// events into these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Up { position: Point },
    Move { position: Point },
}

/// Touch lifecycle phases, mapped 1:1 onto pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

impl PointerEvent {
    /// Translate a touch into the equivalent pointer event.
    pub fn from_touch(phase: TouchPhase, position: Point) -> Self {
        match phase {
            TouchPhase::Start => Self::Down { position },
            TouchPhase::Move => Self::Move { position },
            TouchPhase::End => Self::Up { position },
        }
    }

    /// The position carried by the event.
    pub fn position(&self) -> Point {
        match *self {
            Self::Down { position } | Self::Up { position } | Self::Move { position } => position,
        }
    }
}

/// Pointer state tracked across events.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Last known pointer position, clamped to the surface.
    pub position: Point,
    /// Whether the pointer is currently pressed.
    pub pressed: bool,
    /// Index of the token being dragged, if any.
    pub dragged: Option<usize>,
    /// Index of the token under the pointer, if any.
    pub hovered: Option<usize>,
}

impl PointerState {
    /// Drop any in-flight drag. Used both on pointer-up and when the drag
    /// target disappears.
    pub fn clear_drag(&mut self) {
        self.dragged = None;
    }
}
