//! Field configuration and sanitization.

use serde::{Deserialize, Serialize};

/// Minimum surface dimension in logical units.
///
/// Smaller surfaces produce degenerate layouts (tokens larger than the
/// surface), so both dimensions are floored here.
pub const MIN_SURFACE: f64 = 300.0;

/// Largest accepted `size_factor`. At 0.5 a token's diameter equals the
/// shorter surface dimension, the point where boundary containment stops
/// being satisfiable.
pub const MAX_SIZE_FACTOR: f64 = 0.5;

/// How a toggle affects the rest of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Selecting one token deselects all others.
    Single,
    /// Each token carries an independent quantized level.
    #[default]
    Multiple,
}

/// How a selected token's level maps to its reported contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContributionScaling {
    /// `weight × level × 4`: the four quarter steps span weight..4×weight.
    /// Matches the behavior callers already depend on, so it stays the
    /// default even though levels above one quarter exceed the nominal
    /// weight.
    #[default]
    Legacy,
    /// `weight × level`: level 1.0 yields exactly the nominal weight.
    Normalized,
}

/// Configuration for a [`crate::BubbleField`].
///
/// Every field has a documented default; [`FieldConfig::sanitized`] repairs
/// malformed values back to those defaults, so construction never fails on
/// bad configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Surface width in logical units (floored at [`MIN_SURFACE`]).
    pub width: f64,
    /// Surface height in logical units (floored at [`MIN_SURFACE`]).
    pub height: f64,
    /// Toggle behavior.
    pub selection_mode: SelectionMode,
    /// Contribution formula.
    pub scaling: ContributionScaling,
    /// Nominal token radius as a fraction of min(width, height), in
    /// `(0, MAX_SIZE_FACTOR]`.
    pub size_factor: f64,
    /// Minimum gap enforced between token rims by the collision pass.
    pub min_distance: f64,
    /// Bound on random initial speed; components are drawn uniformly from
    /// `[-v/2, v/2]`.
    pub max_initial_velocity: f64,
    /// Fraction of velocity removed per simulation step, in `[0, 1)`.
    pub friction: f64,
    /// Magnitude of the centering acceleration applied once a token strays
    /// beyond 40% of the surface width from the center.
    pub attraction: f64,
    /// Label font size as a fraction of token radius (rendering only).
    pub text_scale_factor: f64,
    /// Surface background color, hex string (rendering only).
    pub background: String,
    /// Unselected token fill, hex string (rendering only).
    pub bubble_base_color: String,
    /// Fully-selected token fill, hex string (rendering only).
    pub bubble_selected_color: String,
    /// Label color, hex string (rendering only).
    pub text_color: String,
    /// RNG seed for reproducible layouts and jitter. `None` seeds from
    /// entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            selection_mode: SelectionMode::default(),
            scaling: ContributionScaling::default(),
            size_factor: 0.09,
            min_distance: 2.0,
            max_initial_velocity: 2.0,
            friction: 0.05,
            attraction: 0.02,
            text_scale_factor: 0.35,
            background: "#12141c".to_string(),
            bubble_base_color: "#3b82c4".to_string(),
            bubble_selected_color: "#f29f3f".to_string(),
            text_color: "#ffffff".to_string(),
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Create a configuration with the given surface size and defaults for
    /// everything else.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Repair every malformed value back to its default, logging each
    /// repair. The returned configuration is always safe to simulate with.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut cfg = self.clone();

        cfg.width = sanitize_dimension("width", cfg.width);
        cfg.height = sanitize_dimension("height", cfg.height);

        // size_factor is a fraction of min(width, height); anything past
        // MAX_SIZE_FACTOR yields tokens wider than the surface they live on.
        if !cfg.size_factor.is_finite()
            || cfg.size_factor <= 0.0
            || cfg.size_factor > MAX_SIZE_FACTOR
        {
            log::warn!(
                "size_factor {} outside (0, {MAX_SIZE_FACTOR}], falling back to {}",
                cfg.size_factor,
                defaults.size_factor
            );
            cfg.size_factor = defaults.size_factor;
        }
        cfg.min_distance =
            sanitize_non_negative("min_distance", cfg.min_distance, defaults.min_distance);
        cfg.max_initial_velocity = sanitize_non_negative(
            "max_initial_velocity",
            cfg.max_initial_velocity,
            defaults.max_initial_velocity,
        );
        cfg.attraction = sanitize_non_negative("attraction", cfg.attraction, defaults.attraction);
        cfg.text_scale_factor = sanitize_positive(
            "text_scale_factor",
            cfg.text_scale_factor,
            defaults.text_scale_factor,
        );

        if !cfg.friction.is_finite() || !(0.0..1.0).contains(&cfg.friction) {
            log::warn!(
                "friction {} outside [0, 1), falling back to {}",
                cfg.friction,
                defaults.friction
            );
            cfg.friction = defaults.friction;
        }

        cfg
    }
}

fn sanitize_dimension(name: &str, value: f64) -> f64 {
    if !value.is_finite() || value < MIN_SURFACE {
        log::warn!("{name} {value} below minimum, using {MIN_SURFACE}");
        MIN_SURFACE
    } else {
        value
    }
}

fn sanitize_positive(name: &str, value: f64, default: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        log::warn!("{name} {value} is not positive, falling back to {default}");
        default
    } else {
        value
    }
}

fn sanitize_non_negative(name: &str, value: f64, default: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        log::warn!("{name} {value} is negative, falling back to {default}");
        default
    } else {
        value
    }
}
