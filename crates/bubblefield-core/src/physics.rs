//! Per-tick simulation passes: integration, boundary, centering, collision.

use crate::config::FieldConfig;
use crate::token::Token;
use kurbo::{Point, Vec2};
use rand::Rng;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

/// Velocity retained when bouncing off a surface edge.
pub const BOUNDARY_RESTITUTION: f64 = 0.9;
/// Fraction of pairwise overlap corrected per tick.
pub const SEPARATION_CORRECTION: f64 = 0.7;
/// Fixed separating impulse applied to colliding tokens.
pub const SEPARATION_IMPULSE: f64 = 0.25;
/// Per-axis random impulse that breaks perfectly stacked tokens apart.
pub const SEPARATION_JITTER: f64 = 0.025;
/// Distance from center (as a fraction of surface width) beyond which the
/// centering pull engages.
pub const CENTER_PULL_RANGE: f64 = 0.4;

/// Integrate free tokens: position, friction, boundary reflection, and the
/// centering pull. The dragged token (if any) is pinned to the pointer and
/// skipped here.
pub fn free_motion_pass(tokens: &mut [Token], dragged: Option<usize>, config: &FieldConfig) {
    let center = Point::new(config.width / 2.0, config.height / 2.0);
    let pull_threshold = CENTER_PULL_RANGE * config.width;

    for (i, token) in tokens.iter_mut().enumerate() {
        if dragged == Some(i) {
            continue;
        }

        token.position += token.velocity;
        token.velocity = token.velocity * (1.0 - config.friction);

        reflect_at_boundary(token, config.width, config.height);

        let to_center = center - token.position;
        let distance = to_center.hypot();
        if distance > pull_threshold {
            token.velocity += to_center * (config.attraction / distance);
        }
    }
}

/// Reflect a token off the four surface edges, clamping the center so it
/// never leaves `[radius, extent - radius]` on either axis.
fn reflect_at_boundary(token: &mut Token, width: f64, height: f64) {
    let r = token.radius;
    if token.position.x < r {
        token.position.x = r;
        token.velocity.x = -token.velocity.x * BOUNDARY_RESTITUTION;
    } else if token.position.x > width - r {
        token.position.x = width - r;
        token.velocity.x = -token.velocity.x * BOUNDARY_RESTITUTION;
    }
    if token.position.y < r {
        token.position.y = r;
        token.velocity.y = -token.velocity.y * BOUNDARY_RESTITUTION;
    } else if token.position.y > height - r {
        token.position.y = height - r;
        token.velocity.y = -token.velocity.y * BOUNDARY_RESTITUTION;
    }
}

/// Separate overlapping pairs and push them apart.
///
/// A dragged token acts as an immovable obstacle: the other token in the
/// pair absorbs the whole positional correction and the impulse.
pub fn collision_pass(
    tokens: &mut [Token],
    dragged: Option<usize>,
    config: &FieldConfig,
    rng: &mut StdRng,
) {
    let count = tokens.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = tokens.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let target = a.radius + b.radius + config.min_distance;
            let mut axis = b.position - a.position;
            let distance = axis.hypot();
            if distance >= target {
                continue;
            }

            if distance < 1e-9 {
                // Coincident centers: pick a random separation axis.
                let angle = rng.gen_range(0.0..TAU);
                axis = Vec2::new(angle.cos(), angle.sin());
            } else {
                axis = axis * (1.0 / distance);
            }

            let correction = (target - distance) * SEPARATION_CORRECTION;
            let a_dragged = dragged == Some(i);
            let b_dragged = dragged == Some(j);

            match (a_dragged, b_dragged) {
                (false, false) => {
                    a.position -= axis * (correction / 2.0);
                    b.position += axis * (correction / 2.0);
                    a.velocity -= axis * SEPARATION_IMPULSE;
                    a.velocity += jitter(rng);
                    b.velocity += axis * SEPARATION_IMPULSE;
                    b.velocity += jitter(rng);
                }
                (true, false) => {
                    b.position += axis * correction;
                    b.velocity += axis * SEPARATION_IMPULSE;
                    b.velocity += jitter(rng);
                }
                (false, true) => {
                    a.position -= axis * correction;
                    a.velocity -= axis * SEPARATION_IMPULSE;
                    a.velocity += jitter(rng);
                }
                (true, true) => {}
            }
        }
    }
}

fn jitter(rng: &mut StdRng) -> Vec2 {
    Vec2::new(
        rng.gen_range(-SEPARATION_JITTER..=SEPARATION_JITTER),
        rng.gen_range(-SEPARATION_JITTER..=SEPARATION_JITTER),
    )
}

/// Largest rim-to-rim overlap among all pairs, zero when nothing touches.
/// Diagnostic helper for convergence checks.
pub fn max_pair_overlap(tokens: &[Token]) -> f64 {
    let mut max = 0.0f64;
    for i in 0..tokens.len() {
        for j in (i + 1)..tokens.len() {
            let distance = (tokens[j].position - tokens[i].position).hypot();
            let overlap = tokens[i].radius + tokens[j].radius - distance;
            max = max.max(overlap);
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ItemSpec;
    use rand::SeedableRng;

    fn token_at(x: f64, y: f64, radius: f64) -> Token {
        let mut t = Token::from_spec(&ItemSpec::new("t", "T"), radius);
        t.position = Point::new(x, y);
        t
    }

    #[test]
    fn test_friction_decays_velocity() {
        let cfg = FieldConfig::with_size(600.0, 600.0);
        let mut toks = vec![token_at(300.0, 300.0, 20.0)];
        toks[0].velocity = Vec2::new(10.0, 0.0);
        free_motion_pass(&mut toks, None, &cfg);
        assert!((toks[0].velocity.x - 10.0 * (1.0 - cfg.friction)).abs() < 1e-9);
        assert!((toks[0].position.x - 310.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_containment() {
        let cfg = FieldConfig::with_size(300.0, 300.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut toks = vec![token_at(15.0, 290.0, 20.0)];
        toks[0].velocity = Vec2::new(-50.0, 50.0);

        for _ in 0..200 {
            free_motion_pass(&mut toks, None, &cfg);
            let t = &toks[0];
            assert!(t.position.x >= t.radius && t.position.x <= cfg.width - t.radius);
            assert!(t.position.y >= t.radius && t.position.y <= cfg.height - t.radius);
            // Occasionally kick it again so the bounce keeps being exercised.
            if rng.gen_range(0.0..1.0) < 0.1 {
                toks[0].velocity = Vec2::new(rng.gen_range(-60.0..60.0), rng.gen_range(-60.0..60.0));
            }
        }
    }

    #[test]
    fn test_bounce_reverses_velocity_with_restitution() {
        let cfg = FieldConfig::with_size(400.0, 400.0);
        let mut toks = vec![token_at(25.0, 200.0, 20.0)];
        toks[0].velocity = Vec2::new(-30.0, 0.0);
        free_motion_pass(&mut toks, None, &cfg);
        assert!(toks[0].velocity.x > 0.0);
        let expected = 30.0 * (1.0 - cfg.friction) * BOUNDARY_RESTITUTION;
        assert!((toks[0].velocity.x - expected).abs() < 1e-9);
    }

    #[test]
    fn test_center_pull_engages_far_from_center() {
        let mut cfg = FieldConfig::with_size(600.0, 600.0);
        cfg.friction = 0.0;
        let mut toks = vec![token_at(560.0, 300.0, 20.0)];
        free_motion_pass(&mut toks, None, &cfg);
        // 260 units from center, past the 240-unit threshold: pulled left.
        assert!(toks[0].velocity.x < 0.0);

        let mut near = vec![token_at(320.0, 300.0, 20.0)];
        free_motion_pass(&mut near, None, &cfg);
        assert_eq!(near[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_dragged_token_skips_free_motion() {
        let cfg = FieldConfig::with_size(600.0, 600.0);
        let mut toks = vec![token_at(300.0, 300.0, 20.0)];
        toks[0].velocity = Vec2::new(10.0, 10.0);
        free_motion_pass(&mut toks, Some(0), &cfg);
        assert_eq!(toks[0].position, Point::new(300.0, 300.0));
    }

    #[test]
    fn test_collision_separates_pair() {
        let cfg = FieldConfig::with_size(600.0, 600.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut toks = vec![token_at(290.0, 300.0, 20.0), token_at(310.0, 300.0, 20.0)];
        let before = (toks[1].position - toks[0].position).hypot();
        collision_pass(&mut toks, None, &cfg, &mut rng);
        let after = (toks[1].position - toks[0].position).hypot();
        assert!(after > before);
        // Impulses point away from each other along the axis.
        assert!(toks[0].velocity.x < 0.0);
        assert!(toks[1].velocity.x > 0.0);
    }

    #[test]
    fn test_dragged_token_is_immovable_in_collision() {
        let cfg = FieldConfig::with_size(600.0, 600.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut toks = vec![token_at(290.0, 300.0, 20.0), token_at(310.0, 300.0, 20.0)];
        collision_pass(&mut toks, Some(0), &cfg, &mut rng);
        assert_eq!(toks[0].position, Point::new(290.0, 300.0));
        assert_eq!(toks[0].velocity, Vec2::ZERO);
        // The free token absorbed the full correction.
        assert!(toks[1].position.x > 310.0);
    }

    #[test]
    fn test_coincident_tokens_get_separated() {
        let cfg = FieldConfig::with_size(600.0, 600.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut toks = vec![token_at(300.0, 300.0, 20.0), token_at(300.0, 300.0, 20.0)];
        collision_pass(&mut toks, None, &cfg, &mut rng);
        assert!((toks[1].position - toks[0].position).hypot() > 0.0);
    }

    #[test]
    fn test_overlap_converges_over_window() {
        let cfg = FieldConfig::with_size(600.0, 600.0);
        let mut rng = StdRng::seed_from_u64(11);
        // Four heavily overlapping tokens in a tight clump.
        let mut toks = vec![
            token_at(295.0, 300.0, 30.0),
            token_at(305.0, 300.0, 30.0),
            token_at(300.0, 295.0, 30.0),
            token_at(300.0, 305.0, 30.0),
        ];

        let initial = max_pair_overlap(&toks);
        assert!(initial > 0.0);

        let window = 10;
        let mut early = 0.0;
        let mut late = 0.0;
        for step in 0..60 {
            free_motion_pass(&mut toks, None, &cfg);
            collision_pass(&mut toks, None, &cfg, &mut rng);
            let overlap = max_pair_overlap(&toks).max(0.0);
            if step < window {
                early += overlap;
            }
            if step >= 60 - window {
                late += overlap;
            }
        }
        // Average overlap over the last window is below the first window.
        assert!(late < early);
    }
}
