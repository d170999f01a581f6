//! BubbleField Core Library
//!
//! A self-contained 2D physics-and-interaction widget engine: a field of
//! draggable, mutually-repelling circular tokens used to express weighted
//! preferences. The host drives the simulation by calling
//! [`BubbleField::tick`] each frame and translating its native input into
//! [`PointerEvent`]s; it reads the result as a [`SelectionMap`].

pub mod config;
pub mod error;
pub mod field;
pub mod input;
pub mod layout;
pub mod physics;
pub mod selection;
pub mod token;

pub use config::{ContributionScaling, FieldConfig, SelectionMode, MAX_SIZE_FACTOR, MIN_SURFACE};
pub use error::FieldError;
pub use field::BubbleField;
pub use input::{PointerEvent, PointerState, TouchPhase};
pub use selection::SelectionMap;
pub use token::{ItemSpec, SelectionLevel, Token};
