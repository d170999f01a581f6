//! Initial placement and radius derivation.

use crate::config::FieldConfig;
use crate::token::Token;
use kurbo::{Point, Vec2};
use rand::Rng;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

/// Token count above which radii start shrinking.
const TAPER_START: usize = 8;
/// Token count at which the radius reduction reaches its maximum.
const TAPER_END: usize = 16;
/// Maximum fractional radius reduction for crowded fields.
const MAX_TAPER: f64 = 0.10;

/// Placement ring radius as a fraction of min(width, height).
const RING_FRACTION: f64 = 0.35;
/// Ring widening applied once the field holds more than this many tokens.
const CROWDED_COUNT: usize = 10;
const CROWDED_RING_SCALE: f64 = 1.2;

/// Randomized spread of the ring distance: `0.85 + 0.3 × rand`.
const RING_JITTER_BASE: f64 = 0.85;
const RING_JITTER_SPAN: f64 = 0.3;

/// Derive the token radius from the surface size and token count.
///
/// Denser fields get smaller tokens: a linear taper kicks in above
/// [`TAPER_START`] items and bottoms out at −10% by [`TAPER_END`].
pub fn token_radius(config: &FieldConfig, count: usize) -> f64 {
    let nominal = config.width.min(config.height) * config.size_factor;
    if count <= TAPER_START {
        return nominal;
    }
    let over = (count - TAPER_START) as f64 / (TAPER_END - TAPER_START) as f64;
    nominal * (1.0 - MAX_TAPER * over.min(1.0))
}

/// Distribute tokens on a jittered ring around the field center and give
/// each a small random initial velocity.
pub fn place_tokens(tokens: &mut [Token], config: &FieldConfig, rng: &mut StdRng) {
    let count = tokens.len();
    if count == 0 {
        return;
    }
    let center = Point::new(config.width / 2.0, config.height / 2.0);
    let crowded = if count > CROWDED_COUNT {
        CROWDED_RING_SCALE
    } else {
        1.0
    };
    let base_radius = RING_FRACTION * config.width.min(config.height) * crowded;

    for (i, token) in tokens.iter_mut().enumerate() {
        let angle = TAU * i as f64 / count as f64;
        let distance = base_radius * (RING_JITTER_BASE + RING_JITTER_SPAN * rng.gen_range(0.0..1.0));
        token.position = center + Vec2::new(angle.cos(), angle.sin()) * distance;
        token.velocity = initial_velocity(config.max_initial_velocity, rng);
    }
}

/// Velocity with both components drawn uniformly from `[-max/2, max/2]`.
pub fn initial_velocity(max_speed: f64, rng: &mut StdRng) -> Vec2 {
    if max_speed <= 0.0 {
        return Vec2::ZERO;
    }
    let half = max_speed / 2.0;
    Vec2::new(rng.gen_range(-half..=half), rng.gen_range(-half..=half))
}
