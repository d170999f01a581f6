//! Token (bubble) state and selection levels.

use crate::config::{ContributionScaling, SelectionMode};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Number of quarter steps that make up a full selection.
pub const LEVEL_STEPS: f64 = 4.0;

/// Quantized degree to which a token is chosen.
///
/// Only these five values exist, so the quantization invariant cannot be
/// violated by arithmetic drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionLevel {
    #[default]
    Zero,
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl SelectionLevel {
    /// The level as a fraction in `[0, 1]`.
    pub fn value(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
            Self::Full => 1.0,
        }
    }

    /// The next quarter step. Stepping past `Full` wraps back to `Zero`,
    /// which is what makes repeated clicks cycle a token off again.
    pub fn next(self) -> Self {
        match self {
            Self::Zero => Self::Quarter,
            Self::Quarter => Self::Half,
            Self::Half => Self::ThreeQuarters,
            Self::ThreeQuarters => Self::Full,
            Self::Full => Self::Zero,
        }
    }

    /// Quantize an arbitrary fraction to the nearest quarter step,
    /// clamping into `[0, 1]`. Non-finite input maps to `Zero`.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() {
            return Self::Zero;
        }
        let steps = (fraction * LEVEL_STEPS).round().clamp(0.0, LEVEL_STEPS);
        match steps as u8 {
            0 => Self::Zero,
            1 => Self::Quarter,
            2 => Self::Half,
            3 => Self::ThreeQuarters,
            _ => Self::Full,
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::Zero
    }
}

/// Caller-supplied description of one selectable option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Stable identifier, unique within the field.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Semantic importance of this option. Defaults to 1.0 when missing or
    /// invalid.
    #[serde(default, alias = "value")]
    pub weight: Option<f64>,
}

impl ItemSpec {
    /// Convenience constructor with the default weight.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            weight: None,
        }
    }

    /// Convenience constructor with an explicit weight.
    pub fn weighted(id: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            weight: Some(weight),
        }
    }
}

/// One selectable circular token in the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Stable identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Semantic importance, always positive.
    pub weight: f64,
    /// Center position in surface coordinates.
    pub position: Point,
    /// Velocity in logical units per step.
    pub velocity: Vec2,
    /// Radius in logical units, always positive.
    pub radius: f64,
    /// Whether the token is part of the current selection.
    pub selected: bool,
    /// Quantized selection level. `Zero` whenever `selected` is false.
    pub level: SelectionLevel,
    /// Whether the pointer is currently over the token.
    #[serde(skip)]
    pub hovered: bool,
}

impl Token {
    /// Create a token from a caller item. Missing or non-positive weights
    /// fall back to 1.0 with a log entry.
    pub fn from_spec(spec: &ItemSpec, radius: f64) -> Self {
        let weight = match spec.weight {
            Some(w) if w.is_finite() && w > 0.0 => w,
            Some(w) => {
                log::warn!("item '{}' has invalid weight {w}, using 1.0", spec.id);
                1.0
            }
            None => 1.0,
        };
        Self {
            id: spec.id.clone(),
            label: spec.label.clone(),
            weight,
            position: Point::ZERO,
            velocity: Vec2::ZERO,
            radius,
            selected: false,
            level: SelectionLevel::Zero,
            hovered: false,
        }
    }

    /// Whether a pointer position lands inside the token.
    pub fn hit_test(&self, point: Point) -> bool {
        (point - self.position).hypot() < self.radius
    }

    /// Mark the token selected at the given level. A `Zero` level
    /// deselects instead.
    pub fn select_at(&mut self, level: SelectionLevel) {
        if level.is_zero() {
            self.deselect();
        } else {
            self.selected = true;
            self.level = level;
        }
    }

    /// Return the token to the unselected state.
    pub fn deselect(&mut self) {
        self.selected = false;
        self.level = SelectionLevel::Zero;
    }

    /// The value this token reports in the selection mapping, or `None`
    /// when unselected.
    pub fn contribution(&self, mode: SelectionMode, scaling: ContributionScaling) -> Option<f64> {
        if !self.selected {
            return None;
        }
        let value = match mode {
            SelectionMode::Single => self.weight,
            SelectionMode::Multiple => match scaling {
                ContributionScaling::Legacy => self.weight * self.level.value() * LEVEL_STEPS,
                ContributionScaling::Normalized => self.weight * self.level.value(),
            },
        };
        Some(value)
    }

    /// Recover a level from a mapping value produced by [`Self::contribution`].
    pub fn level_for_contribution(&self, value: f64, scaling: ContributionScaling) -> SelectionLevel {
        let fraction = match scaling {
            ContributionScaling::Legacy => value / self.weight / LEVEL_STEPS,
            ContributionScaling::Normalized => value / self.weight,
        };
        SelectionLevel::from_fraction(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(weight: f64) -> Token {
        let mut t = Token::from_spec(&ItemSpec::weighted("a", "A", weight), 20.0);
        t.position = Point::new(100.0, 100.0);
        t
    }

    #[test]
    fn test_level_cycle_length_is_five() {
        let mut level = SelectionLevel::Zero;
        for _ in 0..5 {
            level = level.next();
        }
        assert_eq!(level, SelectionLevel::Zero);
    }

    #[test]
    fn test_level_quantization() {
        assert_eq!(SelectionLevel::from_fraction(0.25), SelectionLevel::Quarter);
        assert_eq!(SelectionLevel::from_fraction(0.3), SelectionLevel::Quarter);
        assert_eq!(SelectionLevel::from_fraction(0.4), SelectionLevel::Half);
        assert_eq!(SelectionLevel::from_fraction(2.0), SelectionLevel::Full);
        assert_eq!(SelectionLevel::from_fraction(-1.0), SelectionLevel::Zero);
        assert_eq!(SelectionLevel::from_fraction(f64::NAN), SelectionLevel::Zero);
    }

    #[test]
    fn test_hit_test() {
        let t = token(1.0);
        assert!(t.hit_test(Point::new(100.0, 100.0)));
        assert!(t.hit_test(Point::new(115.0, 100.0)));
        assert!(!t.hit_test(Point::new(121.0, 100.0)));
    }

    #[test]
    fn test_legacy_contribution_spans_weight_to_four_weight() {
        let mut t = token(1.5);
        t.select_at(SelectionLevel::Quarter);
        let c = t
            .contribution(SelectionMode::Multiple, ContributionScaling::Legacy)
            .unwrap();
        assert!((c - 1.5).abs() < f64::EPSILON);

        t.select_at(SelectionLevel::Full);
        let c = t
            .contribution(SelectionMode::Multiple, ContributionScaling::Legacy)
            .unwrap();
        assert!((c - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized_contribution_never_exceeds_weight() {
        let mut t = token(2.0);
        t.select_at(SelectionLevel::Full);
        let c = t
            .contribution(SelectionMode::Multiple, ContributionScaling::Normalized)
            .unwrap();
        assert!((c - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contribution_round_trips_through_level() {
        let mut t = token(3.0);
        for level in [
            SelectionLevel::Quarter,
            SelectionLevel::Half,
            SelectionLevel::ThreeQuarters,
            SelectionLevel::Full,
        ] {
            t.select_at(level);
            let c = t
                .contribution(SelectionMode::Multiple, ContributionScaling::Legacy)
                .unwrap();
            assert_eq!(t.level_for_contribution(c, ContributionScaling::Legacy), level);
        }
    }

    #[test]
    fn test_invalid_weight_falls_back() {
        let t = Token::from_spec(&ItemSpec::weighted("a", "A", -3.0), 10.0);
        assert!((t.weight - 1.0).abs() < f64::EPSILON);
        let t = Token::from_spec(&ItemSpec::weighted("a", "A", f64::NAN), 10.0);
        assert!((t.weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deselect_zeroes_level() {
        let mut t = token(1.0);
        t.select_at(SelectionLevel::Half);
        t.deselect();
        assert!(!t.selected);
        assert_eq!(t.level, SelectionLevel::Zero);
        assert!(t
            .contribution(SelectionMode::Multiple, ContributionScaling::Legacy)
            .is_none());
    }

    #[test]
    fn test_item_spec_value_alias() {
        let spec: ItemSpec =
            serde_json::from_str(r#"{"id": "cruiser", "label": "Cruiser", "value": 2.5}"#).unwrap();
        assert!((spec.weight.unwrap() - 2.5).abs() < f64::EPSILON);
    }
}
