//! Gravitational potential of the central mass and its bodies at a query point.
//!
//! Every source contributes `−G·m / (r + ε)`, clamped in magnitude to a threshold so
//! that points close to a body do not swamp the rest of the field. Nothing here
//! mutates the system, so any number of readers may sample it between steps.

use glam::DVec3;

use crate::core::constants::{AU, G, SOFTENING};
use crate::core::system::OrbitalSystem;

/// One source's clamped contribution at `distance` metres.
///
/// The unclamped value is never positive, so a clamped term is `-threshold`.
#[inline]
pub fn term(mass: f64, distance: f64, threshold: f64) -> f64 {
    let potential = -G * mass / (distance + SOFTENING);
    if potential.abs() > threshold {
        -threshold
    } else {
        potential
    }
}

/// Clamped per-source terms at `point` (metres): one per body in system order,
/// followed by the central mass at the origin.
pub fn contributions(point: DVec3, system: &OrbitalSystem, threshold: f64) -> Vec<f64> {
    let mut terms = Vec::with_capacity(system.len() + 1);
    terms.extend(body_terms(point, system, threshold));
    terms.push(central_term(point, system, threshold));
    terms
}

/// Summed clamped potential at `point` (metres).
pub fn evaluate(point: DVec3, system: &OrbitalSystem, threshold: f64) -> f64 {
    let central = central_term(point, system, threshold);
    if system.is_empty() {
        return central;
    }
    body_terms(point, system, threshold).sum::<f64>() + central
}

fn body_terms(
    point: DVec3,
    system: &OrbitalSystem,
    threshold: f64,
) -> impl Iterator<Item = f64> + '_ {
    system
        .iter()
        .map(move |(body, _, position)| term(body.mass(), point.distance(position), threshold))
}

// Central mass sits at the origin.
fn central_term(point: DVec3, system: &OrbitalSystem, threshold: f64) -> f64 {
    term(system.central_mass(), point.length(), threshold)
}

/// [`evaluate`] with the query point given in astronomical units.
pub fn evaluate_au(point_au: DVec3, system: &OrbitalSystem, threshold: f64) -> f64 {
    evaluate(point_au * AU, system, threshold)
}

/// Square grid of potential samples on a plane of constant z.
///
/// Samples are stored row-major (`y` outer, `x` inner) and span
/// `[-extent, extent]` on both axes, edges included.
#[derive(Debug, Clone)]
pub struct PotentialGrid {
    resolution: usize,
    /// Half-width of the sampled square, metres.
    extent: f64,
    /// Height of the sampling plane, metres.
    z: f64,
    values: Vec<f64>,
}

impl PotentialGrid {
    pub fn new(resolution: usize, extent: f64, z: f64) -> Self {
        let resolution = resolution.max(1);
        Self {
            resolution,
            extent,
            z,
            values: vec![0.0; resolution * resolution],
        }
    }

    /// Sample point for column `ix`, row `iy`.
    pub fn point(&self, ix: usize, iy: usize) -> DVec3 {
        if self.resolution == 1 {
            return DVec3::new(0.0, 0.0, self.z);
        }
        let step = 2.0 * self.extent / (self.resolution - 1) as f64;
        DVec3::new(
            -self.extent + ix as f64 * step,
            -self.extent + iy as f64 * step,
            self.z,
        )
    }

    /// Re-evaluate every sample against the current state of `system`.
    pub fn sample(&mut self, system: &OrbitalSystem, threshold: f64) {
        let n = self.resolution;
        for iy in 0..n {
            for ix in 0..n {
                self.values[iy * n + ix] = evaluate(self.point(ix, iy), system, threshold);
            }
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.resolution || iy >= self.resolution {
            return None;
        }
        Some(self.values[iy * self.resolution + ix])
    }

    /// Smallest and largest sample, for colour scaling.
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::body::OrbitalBody;
    use crate::core::constants::{DEFAULT_THRESHOLD, SUN_MASS};

    fn two_planets() -> OrbitalSystem {
        let mut sys = OrbitalSystem::default();
        sys.append(OrbitalBody::new("earth", 6e24));
        sys.append(
            OrbitalBody::new("merc", 6e23)
                .with_semi_major_axis(0.4 * AU)
                .with_eccentricity(0.2)
                .with_inclination(0.1)
                .with_initial_anomaly(1.0),
        );
        sys
    }

    #[test]
    fn empty_system_is_central_term_only() {
        let sys = OrbitalSystem::default();
        let point = DVec3::new(0.0, AU, 0.0);
        let expected = term(SUN_MASS, AU, DEFAULT_THRESHOLD);
        assert_eq!(evaluate(point, &sys, DEFAULT_THRESHOLD), expected);
        // The sun is far above the default clamp anywhere near 1 AU.
        assert_eq!(expected, -DEFAULT_THRESHOLD);
    }

    #[test]
    fn empty_system_unclamped_matches_newton() {
        let sys = OrbitalSystem::default();
        let v = evaluate(DVec3::new(AU, 0.0, 0.0), &sys, f64::INFINITY);
        let expected = -G * SUN_MASS / (AU + SOFTENING);
        assert!((v - expected).abs() < 1e-6 * expected.abs());
    }

    #[test]
    fn every_term_respects_threshold() {
        let sys = two_planets();
        for &t in &[1e-3, 1.0, 100.0, 1e9] {
            for k in 0..20 {
                let point = DVec3::new(k as f64 * 0.1 * AU, -0.3 * AU, 0.01 * AU);
                for c in contributions(point, &sys, t) {
                    assert!(c.abs() <= t, "term {c} exceeds {t}");
                    assert!(c <= 0.0);
                }
            }
        }
    }

    #[test]
    fn sum_of_contributions_is_evaluate() {
        let sys = two_planets();
        let point = DVec3::new(0.7 * AU, 0.2 * AU, 0.0);
        let sum: f64 = contributions(point, &sys, 1e9).iter().sum();
        assert!((sum - evaluate(point, &sys, 1e9)).abs() < 1e-6);
        assert_eq!(contributions(point, &sys, 1e9).len(), 3);
    }

    #[test]
    fn evaluate_and_contributions_agree_exactly() {
        let mut sys = two_planets();
        for step in 0..5 {
            for &t in &[1.0, 100.0, f64::INFINITY] {
                let point = DVec3::new(0.3 * step as f64 * AU, -0.5 * AU, 0.02 * AU);
                let summed: f64 = contributions(point, &sys, t).iter().sum();
                assert_eq!(evaluate(point, &sys, t), summed, "step {step}, threshold {t}");
            }
            sys.step();
        }
    }

    #[test]
    fn query_on_a_body_is_finite_and_clamped() {
        let sys = two_planets();
        let on_earth = sys.position_of("earth").unwrap();
        let terms = contributions(on_earth, &sys, 100.0);
        assert_eq!(terms[0], -100.0);
        assert!(evaluate(on_earth, &sys, 100.0).is_finite());
    }

    #[test]
    fn term_at_exact_threshold_passes_through() {
        let distance = 1.0e6;
        let exact = G * 5.0e20 / (distance + SOFTENING);
        assert_eq!(term(5.0e20, distance, exact), -exact);
    }

    #[test]
    fn au_input_is_scaled() {
        let sys = two_planets();
        let au = DVec3::new(2.0, 1.0, 0.5);
        assert_eq!(
            evaluate_au(au, &sys, f64::INFINITY),
            evaluate(au * AU, &sys, f64::INFINITY)
        );
    }

    #[test]
    fn evaluate_does_not_touch_system() {
        let sys = two_planets();
        let angles = sys.angles().to_vec();
        let positions = sys.current_positions().to_vec();
        let _ = evaluate(DVec3::splat(AU), &sys, 100.0);
        assert_eq!(sys.angles(), angles.as_slice());
        assert_eq!(sys.current_positions(), positions.as_slice());
        assert_eq!(sys.steps(), 0);
    }

    #[test]
    fn grid_spans_extent_and_samples_everything() {
        let sys = two_planets();
        let mut grid = PotentialGrid::new(5, 2.0 * AU, 0.0);
        grid.sample(&sys, f64::INFINITY);
        assert_eq!(grid.values().len(), 25);
        assert_eq!(grid.point(0, 0), DVec3::new(-2.0 * AU, -2.0 * AU, 0.0));
        assert_eq!(grid.point(4, 4), DVec3::new(2.0 * AU, 2.0 * AU, 0.0));
        // The centre sample sits on the sun and is the deepest point.
        let (lo, hi) = grid.range();
        assert_eq!(grid.get(2, 2), Some(lo));
        assert!(hi < 0.0);
        assert_eq!(grid.get(5, 0), None);
    }

    #[test]
    fn single_cell_grid_samples_plane_centre() {
        let grid = PotentialGrid::new(0, AU, 3.0);
        assert_eq!(grid.resolution(), 1);
        assert_eq!(grid.point(0, 0), DVec3::new(0.0, 0.0, 3.0));
    }
}
