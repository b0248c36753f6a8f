//! Pairwise sphere-sphere collision response
//!
//! Every body shares one radius, so two bodies overlap when their centres are
//! closer than `2 * radius`. Overlapping pairs that are still approaching get
//! a mass-weighted impulse along the line of centres (restitution 1).
//!
//! ```text
//!   b ●──────● a        normal = (a.x - b.x) / |a.x - b.x|
//!        <- normal ->   closing = (a.v - b.v) . normal
//! ```
//!
//! There is no positional de-penetration: fast pairs may stay visually
//! overlapped for a few substeps.

use super::states::{NVec3, Particle};

/// Normal used when two centres coincide exactly and the line of centres is undefined
pub const FALLBACK_NORMAL: NVec3 = NVec3::new(1.0, 0.0, 0.0);

pub struct CollisionResolver;

impl CollisionResolver {
    /// Resolve one pair in place.
    ///
    /// Returns `true` when velocities were changed, `false` when the pair is
    /// apart or already separating.
    pub fn resolve_pair(a: &mut Particle, b: &mut Particle, radius: f64) -> bool {
        let delta = a.x - b.x;
        let distance = delta.norm();
        if distance >= 2.0 * radius {
            return false;
        }

        let normal = if distance > 0.0 {
            delta / distance
        } else {
            tracing::trace!("coincident bodies, resolving along +X");
            FALLBACK_NORMAL
        };

        let relative_velocity = a.v - b.v;
        let closing_speed = relative_velocity.dot(&normal);
        if closing_speed > 0.0 {
            return false;
        }

        let impulse = 2.0 * closing_speed / (a.m + b.m);
        a.v -= normal * (impulse * b.m);
        b.v += normal * (impulse * a.m);
        true
    }

    /// Resolve every unordered pair once, in index order (i < j).
    ///
    /// Later pairs see the velocities written by earlier ones, so the order is
    /// part of the observable behaviour. Returns how many pairs were resolved.
    pub fn resolve_all(particles: &mut [Particle], radius: f64) -> usize {
        let mut resolved = 0;
        for i in 0..particles.len() {
            let (head, tail) = particles.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if Self::resolve_pair(a, b, radius) {
                    resolved += 1;
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn closing_speed(a: &Particle, b: &Particle) -> f64 {
        let delta = a.x - b.x;
        let normal = if delta.norm() > 0.0 { delta / delta.norm() } else { FALLBACK_NORMAL };
        (a.v - b.v).dot(&normal)
    }

    #[test]
    fn head_on_pair_stops_closing_and_keeps_momentum() {
        let mut a = Particle::new(NVec3::new(-0.05, 0.0, 0.0), NVec3::new(1.0, 0.0, 0.0), 1.0);
        let mut b = Particle::new(NVec3::new(0.05, 0.0, 0.0), NVec3::new(-1.0, 0.0, 0.0), 2.0);
        let before = a.momentum() + b.momentum();

        assert!(CollisionResolver::resolve_pair(&mut a, &mut b, 0.1));

        let after = a.momentum() + b.momentum();
        assert_relative_eq!(before.x, after.x, epsilon = 1e-12);
        assert!(closing_speed(&a, &b) >= -1e-12);
        assert_relative_eq!(a.v.x, -5.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(b.v.x, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn distant_pair_is_untouched() {
        let mut a = Particle::new(NVec3::new(-1.0, 0.0, 0.0), NVec3::new(1.0, 0.0, 0.0), 1.0);
        let mut b = Particle::new(NVec3::new(1.0, 0.0, 0.0), NVec3::new(-1.0, 0.0, 0.0), 1.0);

        assert!(!CollisionResolver::resolve_pair(&mut a, &mut b, 0.1));
        assert_eq!(a.v, NVec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.v, NVec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn touching_exactly_at_contact_distance_is_not_a_collision() {
        let mut a = Particle::new(NVec3::new(0.2, 0.0, 0.0), NVec3::new(-1.0, 0.0, 0.0), 1.0);
        let mut b = Particle::new(NVec3::zeros(), NVec3::zeros(), 1.0);
        assert!(!CollisionResolver::resolve_pair(&mut a, &mut b, 0.1));
    }

    #[test]
    fn separating_pair_is_skipped() {
        let mut a = Particle::new(NVec3::new(0.05, 0.0, 0.0), NVec3::new(1.0, 0.0, 0.0), 1.0);
        let mut b = Particle::new(NVec3::new(-0.05, 0.0, 0.0), NVec3::new(-1.0, 0.0, 0.0), 1.0);

        assert!(!CollisionResolver::resolve_pair(&mut a, &mut b, 0.1));
        assert_eq!(a.v.x, 1.0);
        assert_eq!(b.v.x, -1.0);
    }

    #[test]
    fn coincident_pair_uses_x_axis_without_nan() {
        let mut a = Particle::new(NVec3::zeros(), NVec3::new(-1.0, 0.5, 0.0), 1.0);
        let mut b = Particle::new(NVec3::zeros(), NVec3::new(1.0, 0.5, 0.0), 1.0);

        assert!(CollisionResolver::resolve_pair(&mut a, &mut b, 0.1));
        assert!(a.is_finite() && b.is_finite());
        // equal masses swap their x components, y is untouched
        assert_relative_eq!(a.v.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(b.v.x, -1.0, epsilon = 1e-12);
        assert_eq!(a.v.y, 0.5);
        assert_eq!(b.v.y, 0.5);
    }

    #[test]
    fn oblique_impact_keeps_tangential_motion() {
        let mut a = Particle::new(NVec3::new(0.0, 0.1, 0.0), NVec3::new(1.0, -1.0, 0.0), 2.0);
        let mut b = Particle::new(NVec3::zeros(), NVec3::zeros(), 2.0);

        assert!(CollisionResolver::resolve_pair(&mut a, &mut b, 0.1));
        // normal is +Y, so the x component carries through
        assert_relative_eq!(a.v.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(a.v.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.v.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn resolve_all_visits_pairs_in_index_order() {
        // three bodies in a row: 0 hits 1 first, then 1 carries the momentum into 2
        let mut particles = vec![
            Particle::new(NVec3::new(-0.15, 0.0, 0.0), NVec3::new(1.0, 0.0, 0.0), 1.0),
            Particle::new(NVec3::new(0.0, 0.0, 0.0), NVec3::zeros(), 1.0),
            Particle::new(NVec3::new(0.15, 0.0, 0.0), NVec3::zeros(), 1.0),
        ];

        let resolved = CollisionResolver::resolve_all(&mut particles, 0.1);

        assert_eq!(resolved, 2);
        assert_relative_eq!(particles[0].v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(particles[1].v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(particles[2].v.x, 1.0, epsilon = 1e-12);
    }
}
