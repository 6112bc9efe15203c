//! The set of bodies circling one central mass, and their stepped state.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use glam::DVec3;

use super::body::{OrbitalBody, ShapeUpdate};
use super::constants::{LengthUnit, DAY, G, SUN_MASS};
use crate::error::Error;
use crate::Result;

/// Default step: ten days of simulated time.
pub const DEFAULT_DT: f64 = 10.0 * DAY;

/// Orbital period `2π·sqrt(a³ / (G·M))` in seconds.
pub fn orbital_period(semi_major_axis: f64, central_mass: f64) -> f64 {
    TAU * (semi_major_axis.powi(3) / (G * central_mass)).sqrt()
}

/// Per-step anomaly increments at aphelion (`min`) and perihelion (`max`).
///
/// The per-step sweep `π·dt·sqrt(1 − e²) / (2·P)` divided by the squared radius
/// ratio at each apsis. A circular orbit turns once every four periods.
pub fn rate_bounds(eccentricity: f64, period: f64, dt: f64) -> (f64, f64) {
    let sweep = PI * dt / 2.0 * (1.0 - eccentricity * eccentricity).sqrt() / period;
    let min = sweep / (1.0 + eccentricity).powi(2);
    let max = sweep / (1.0 - eccentricity).powi(2);
    (min, max)
}

/// Anomaly increment for a body currently at `theta`.
///
/// Linear in the angular distance from π, so it equals `max` at perihelion and `min`
/// at aphelion. The distance is taken on `theta` reduced to one turn; the stored angle
/// itself is never wrapped.
#[inline]
pub fn interpolate_rate(theta: f64, min: f64, max: f64) -> f64 {
    let phase = theta.rem_euclid(TAU);
    min + ((max - min) / PI) * (PI - phase).abs()
}

/// Bodies around a central mass plus their column-aligned dynamic state.
///
/// Index `i` in every per-body vector refers to `bodies[i]`; insertion order is the
/// index and names are unique. There is no internal locking: `step` and `append`
/// mutate in place and callers serialize access.
#[derive(Debug, Clone)]
pub struct OrbitalSystem {
    /// Step length in seconds.
    dt: f64,
    central_mass: f64,
    bodies: Vec<OrbitalBody>,

    angles: Vec<f64>,
    positions: Vec<DVec3>,

    periods: Vec<f64>,
    rate_min: Vec<f64>,
    rate_max: Vec<f64>,

    steps: u64,
}

impl Default for OrbitalSystem {
    fn default() -> Self {
        Self::new(DEFAULT_DT, SUN_MASS)
    }
}

impl OrbitalSystem {
    pub fn new(dt: f64, central_mass: f64) -> Self {
        Self {
            dt,
            central_mass,
            bodies: Vec::new(),
            angles: Vec::new(),
            positions: Vec::new(),
            periods: Vec::new(),
            rate_min: Vec::new(),
            rate_max: Vec::new(),
            steps: 0,
        }
    }

    /// Create a system with room for `capacity` bodies.
    pub fn with_capacity(dt: f64, central_mass: f64, capacity: usize) -> Self {
        Self {
            dt,
            central_mass,
            bodies: Vec::with_capacity(capacity),
            angles: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            periods: Vec::with_capacity(capacity),
            rate_min: Vec::with_capacity(capacity),
            rate_max: Vec::with_capacity(capacity),
            steps: 0,
        }
    }

    /// Register a body. Returns `false` (and changes nothing) if a body with the same
    /// name is already present.
    pub fn append(&mut self, body: OrbitalBody) -> bool {
        if self.index_of(body.name()).is_some() {
            log::debug!("append: '{}' already registered, ignoring", body.name());
            return false;
        }

        let theta = body.initial_anomaly();
        let position = body.position_at(theta);
        log::debug!(
            "append: '{}' at index {} (a = {:.4e} m, e = {})",
            body.name(),
            self.bodies.len(),
            body.semi_major_axis(),
            body.eccentricity()
        );

        self.bodies.push(body);
        self.angles.push(theta);
        self.positions.push(position);
        self.periods.push(0.0);
        self.rate_min.push(0.0);
        self.rate_max.push(0.0);
        self.recompute_rates();
        true
    }

    /// Change a registered body's shape. Its rate bounds and current position are
    /// refreshed; its current anomaly is kept.
    pub fn update_body(&mut self, name: &str, update: ShapeUpdate) -> Result<()> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| Error::UnknownBody(name.to_string()))?;
        self.bodies[idx].update(update);
        log::debug!("update_body: '{}' reshaped", name);
        self.recompute_rates();
        self.positions[idx] = self.bodies[idx].position_at(self.angles[idx]);
        Ok(())
    }

    /// Change the step length and recompute every body's rate bounds.
    pub fn set_dt(&mut self, dt: f64) {
        self.dt = dt;
        self.recompute_rates();
    }

    fn recompute_rates(&mut self) {
        for (i, body) in self.bodies.iter().enumerate() {
            let period = orbital_period(body.semi_major_axis(), self.central_mass);
            let (min, max) = rate_bounds(body.eccentricity(), period, self.dt);
            self.periods[i] = period;
            self.rate_min[i] = min;
            self.rate_max[i] = max;
        }
        log::debug!("rate bounds recomputed for {} bodies", self.bodies.len());
    }

    /// Advance every anomaly by one step and recompute positions.
    pub fn step(&mut self) {
        for i in 0..self.bodies.len() {
            let dtheta = interpolate_rate(self.angles[i], self.rate_min[i], self.rate_max[i]);
            log::trace!("step {}: '{}' dtheta = {:e}", self.steps, self.bodies[i].name(), dtheta);
            self.angles[i] += dtheta;
            self.positions[i] = self.bodies[i].position_at(self.angles[i]);
        }
        self.steps += 1;
    }

    /// Current positions keyed by body name, converted to `unit`. Does not advance.
    pub fn positions(&self, unit: LengthUnit) -> HashMap<String, DVec3> {
        let factor = unit.per_meter();
        self.bodies
            .iter()
            .zip(&self.positions)
            .map(|(body, pos)| (body.name().to_string(), *pos * factor))
            .collect()
    }

    /// Step once, then read positions.
    pub fn advance_and_fetch(&mut self, unit: LengthUnit) -> HashMap<String, DVec3> {
        self.step();
        self.positions(unit)
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn central_mass(&self) -> f64 {
        self.central_mass
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of `step` calls so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn bodies(&self) -> &[OrbitalBody] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&OrbitalBody> {
        self.bodies.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name() == name)
    }

    /// Current anomaly angles, index-aligned with [`bodies`](Self::bodies).
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Current positions in metres, index-aligned with [`bodies`](Self::bodies).
    pub fn current_positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn position_of(&self, name: &str) -> Option<DVec3> {
        self.index_of(name).map(|i| self.positions[i])
    }

    /// Orbital period of body `index` in seconds.
    pub fn period(&self, index: usize) -> Option<f64> {
        self.periods.get(index).copied()
    }

    /// `(min, max)` anomaly increment per step for body `index`.
    pub fn rate_bounds(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.rate_min.get(index)?, *self.rate_max.get(index)?))
    }

    /// The increment the next `step` would apply to body `index`.
    pub fn angular_step(&self, index: usize) -> Option<f64> {
        let (min, max) = self.rate_bounds(index)?;
        Some(interpolate_rate(self.angles[index], min, max))
    }

    /// Iterate `(body, anomaly, position in metres)`.
    pub fn iter(&self) -> impl Iterator<Item = (&OrbitalBody, f64, DVec3)> {
        self.bodies
            .iter()
            .zip(&self.angles)
            .zip(&self.positions)
            .map(|((body, theta), pos)| (body, *theta, *pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::AU;

    fn earth() -> OrbitalBody {
        OrbitalBody::new("earth", 6e24)
    }

    fn mercury() -> OrbitalBody {
        OrbitalBody::new("merc", 6e23)
            .with_eccentricity(0.2)
            .with_inclination(5f64.to_radians())
            .with_node_angle(45f64.to_radians())
            .with_periapsis_angle(10f64.to_radians())
            .with_initial_anomaly(5f64.to_radians())
    }

    #[test]
    fn unit_circle_body_starts_at_one_au_in_plane() {
        let mut sys = OrbitalSystem::default();
        sys.append(earth());
        let p = sys.current_positions()[0];
        assert!((p.length() - AU).abs() < 1e-3, "|p| = {}", p.length());
        assert!(p.z.abs() < 1e-9);
    }

    #[test]
    fn append_is_idempotent() {
        let mut sys = OrbitalSystem::default();
        assert!(sys.append(mercury()));
        let theta = sys.angles()[0];
        let pos = sys.current_positions()[0];

        assert!(!sys.append(mercury()));
        assert_eq!(sys.len(), 1);
        assert_eq!(sys.angles().len(), 1);
        assert_eq!(sys.current_positions().len(), 1);
        assert_eq!(sys.angles()[0], theta);
        assert_eq!(sys.current_positions()[0], pos);
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut sys = OrbitalSystem::default();
        sys.append(earth());
        sys.append(mercury());
        assert_eq!(sys.index_of("earth"), Some(0));
        assert_eq!(sys.index_of("merc"), Some(1));
        assert_eq!(sys.angles()[1], mercury().initial_anomaly());
    }

    #[test]
    fn step_strictly_increases_angles() {
        let mut sys = OrbitalSystem::default();
        sys.append(earth());
        sys.append(mercury());
        let before = sys.angles().to_vec();
        sys.step();
        for (b, a) in before.iter().zip(sys.angles()) {
            assert!(a > b, "angle went from {b} to {a}");
        }
        assert_eq!(sys.steps(), 1);
    }

    #[test]
    fn angles_are_never_wrapped() {
        let mut sys = OrbitalSystem::new(30.0 * DAY, SUN_MASS);
        sys.append(mercury());
        let mut last = sys.angles()[0];
        for _ in 0..200 {
            sys.step();
            let now = sys.angles()[0];
            assert!(now.is_finite());
            assert!(now > last);
            last = now;
        }
        assert!(last > TAU, "expected several turns, got {last}");
    }

    #[test]
    fn interpolated_rate_stays_within_bounds() {
        let (min, max) = (0.01, 0.05);
        for k in -200..200 {
            let theta = k as f64 * 0.173;
            let r = interpolate_rate(theta, min, max);
            assert!(r >= min - 1e-15 && r <= max + 1e-15, "theta {theta}: {r}");
        }
        assert!((interpolate_rate(0.0, min, max) - max).abs() < 1e-15);
        assert!((interpolate_rate(PI, min, max) - min).abs() < 1e-15);
    }

    #[test]
    fn rate_bounds_ordered_and_equal_when_circular() {
        let period = orbital_period(AU, SUN_MASS);
        let (min, max) = rate_bounds(0.3, period, DAY);
        assert!(min < max);
        let (cmin, cmax) = rate_bounds(0.0, period, DAY);
        assert_eq!(cmin, cmax);
    }

    #[test]
    fn earth_period_is_about_a_year() {
        let days = orbital_period(AU, SUN_MASS) / DAY;
        assert!((days - 365.25).abs() < 2.0, "period = {days} days");
    }

    #[test]
    fn circular_rate_is_quarter_pi_dt_over_period() {
        let period = orbital_period(AU, SUN_MASS);
        let dt = 10.0 * DAY;
        let (min, max) = rate_bounds(0.0, period, dt);
        let expected = PI * dt / (2.0 * period);
        assert!((min - expected).abs() < 1e-15, "min = {min}, expected {expected}");
        assert!((max - expected).abs() < 1e-15);
        // About 146 ten-day steps per turn for a 1 AU orbit.
        let steps_per_turn = TAU / min;
        assert!((steps_per_turn - 146.1).abs() < 0.5, "{steps_per_turn}");
    }

    #[test]
    fn circular_orbit_turns_once_in_four_periods() {
        let mut sys = OrbitalSystem::new(DAY, SUN_MASS);
        sys.append(earth());
        let steps = (4.0 * sys.period(0).unwrap() / DAY).round() as usize;
        for _ in 0..steps {
            sys.step();
        }
        assert!((sys.angles()[0] - TAU).abs() < 0.02, "theta = {}", sys.angles()[0]);
    }

    #[test]
    fn set_dt_rescales_bounds() {
        let mut sys = OrbitalSystem::new(DAY, SUN_MASS);
        sys.append(mercury());
        let (min1, max1) = sys.rate_bounds(0).unwrap();
        sys.set_dt(2.0 * DAY);
        let (min2, max2) = sys.rate_bounds(0).unwrap();
        assert!((min2 - 2.0 * min1).abs() < 1e-12);
        assert!((max2 - 2.0 * max1).abs() < 1e-12);
    }

    #[test]
    fn positions_convert_units_without_stepping() {
        let mut sys = OrbitalSystem::default();
        sys.append(earth());
        let au = sys.positions(LengthUnit::AstronomicalUnits);
        let m = sys.positions(LengthUnit::Meters);
        assert!((au["earth"].length() - 1.0).abs() < 1e-12);
        assert!((m["earth"].length() - AU).abs() < 1e-3);
        assert_eq!(sys.steps(), 0);
    }

    #[test]
    fn advance_and_fetch_steps_once() {
        let mut sys = OrbitalSystem::default();
        sys.append(earth());
        let before = sys.position_of("earth").unwrap();
        let fetched = sys.advance_and_fetch(LengthUnit::Meters);
        assert_eq!(sys.steps(), 1);
        assert_ne!(fetched["earth"], before);
        assert_eq!(fetched["earth"], sys.position_of("earth").unwrap());
    }

    #[test]
    fn update_body_refreshes_position_and_bounds() {
        let mut sys = OrbitalSystem::default();
        sys.append(earth());
        let (min, _) = sys.rate_bounds(0).unwrap();
        sys.update_body("earth", ShapeUpdate::new().semi_major_axis(4.0 * AU))
            .unwrap();
        let p = sys.position_of("earth").unwrap();
        assert!((p.length() - 4.0 * AU).abs() < 1e-2);
        // Period grows as a^1.5, so the rate drops by 8.
        let (min4, _) = sys.rate_bounds(0).unwrap();
        assert!((min / min4 - 8.0).abs() < 1e-9);
    }

    #[test]
    fn update_unknown_body_is_an_error() {
        let mut sys = OrbitalSystem::default();
        let err = sys.update_body("vulcan", ShapeUpdate::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownBody(ref n) if n == "vulcan"));
    }

    #[test]
    fn empty_system_steps_harmlessly() {
        let mut sys = OrbitalSystem::default();
        sys.step();
        assert!(sys.is_empty());
        assert!(sys.positions(LengthUnit::Meters).is_empty());
        assert_eq!(sys.angular_step(0), None);
    }
}
