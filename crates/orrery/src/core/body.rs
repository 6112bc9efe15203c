//! One body's orbital shape and the geometry derived from it.

use glam::DVec3;

use super::constants::AU;
use super::rotation::{rotation_matrix, Axis};

/// Partial change to a body's shape parameters. `None` leaves a field unchanged.
///
/// All values are in core units (metres, radians).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapeUpdate {
    pub semi_major_axis: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination: Option<f64>,
    /// Plane-intersection angle Ω.
    pub node_angle: Option<f64>,
    /// In-plane major-axis rotation ω.
    pub periapsis_angle: Option<f64>,
    pub initial_anomaly: Option<f64>,
}

impl ShapeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semi_major_axis(mut self, a: f64) -> Self {
        self.semi_major_axis = Some(a);
        self
    }

    pub fn eccentricity(mut self, e: f64) -> Self {
        self.eccentricity = Some(e);
        self
    }

    pub fn inclination(mut self, i: f64) -> Self {
        self.inclination = Some(i);
        self
    }

    pub fn node_angle(mut self, node: f64) -> Self {
        self.node_angle = Some(node);
        self
    }

    pub fn periapsis_angle(mut self, w: f64) -> Self {
        self.periapsis_angle = Some(w);
        self
    }

    pub fn initial_anomaly(mut self, theta: f64) -> Self {
        self.initial_anomaly = Some(theta);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A body orbiting the central mass.
///
/// Perihelion, aphelion and the orbital-plane normal are recomputed on every shape
/// change, so they never lag behind the parameters. Callers are expected to keep
/// `a > 0` and `0 <= e < 1`; other values produce meaningless geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    name: String,
    mass: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    node_angle: f64,
    periapsis_angle: f64,
    initial_anomaly: f64,

    perihelion: f64,
    aphelion: f64,
    plane_normal: DVec3,
}

impl OrbitalBody {
    /// A circular, uninclined orbit at 1 AU starting at anomaly 0.
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        let mut body = Self {
            name: name.into(),
            mass,
            semi_major_axis: AU,
            eccentricity: 0.0,
            inclination: 0.0,
            node_angle: 0.0,
            periapsis_angle: 0.0,
            initial_anomaly: 0.0,
            perihelion: 0.0,
            aphelion: 0.0,
            plane_normal: DVec3::Z,
        };
        body.recompute();
        body
    }

    pub fn with_shape(mut self, update: ShapeUpdate) -> Self {
        self.update(update);
        self
    }

    pub fn with_semi_major_axis(self, a: f64) -> Self {
        self.with_shape(ShapeUpdate::new().semi_major_axis(a))
    }

    pub fn with_eccentricity(self, e: f64) -> Self {
        self.with_shape(ShapeUpdate::new().eccentricity(e))
    }

    pub fn with_inclination(self, i: f64) -> Self {
        self.with_shape(ShapeUpdate::new().inclination(i))
    }

    pub fn with_node_angle(self, node: f64) -> Self {
        self.with_shape(ShapeUpdate::new().node_angle(node))
    }

    pub fn with_periapsis_angle(self, w: f64) -> Self {
        self.with_shape(ShapeUpdate::new().periapsis_angle(w))
    }

    pub fn with_initial_anomaly(self, theta: f64) -> Self {
        self.with_shape(ShapeUpdate::new().initial_anomaly(theta))
    }

    /// Apply the given fields and refresh the derived geometry.
    pub fn update(&mut self, update: ShapeUpdate) {
        if let Some(a) = update.semi_major_axis {
            self.semi_major_axis = a;
        }
        if let Some(e) = update.eccentricity {
            self.eccentricity = e;
        }
        if let Some(i) = update.inclination {
            self.inclination = i;
        }
        if let Some(node) = update.node_angle {
            self.node_angle = node;
        }
        if let Some(w) = update.periapsis_angle {
            self.periapsis_angle = w;
        }
        if let Some(theta) = update.initial_anomaly {
            self.initial_anomaly = theta;
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.perihelion = self.semi_major_axis * (1.0 - self.eccentricity);
        self.aphelion = self.semi_major_axis * (1.0 + self.eccentricity);
        self.plane_normal = plane_normal(self.inclination, self.node_angle);
    }

    /// Orbit radius at anomaly `theta`: `a·(1 − e·cos θ)`.
    #[inline]
    pub fn radius_at(&self, theta: f64) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * theta.cos())
    }

    /// Position relative to the central mass at anomaly `theta`.
    ///
    /// Unit x is turned by θ+ω about z, tilted by the inclination about x, then turned
    /// by Ω about z into the global frame, and finally scaled by [`radius_at`].
    ///
    /// [`radius_at`]: OrbitalBody::radius_at
    pub fn position_at(&self, theta: f64) -> DVec3 {
        let in_plane = rotation_matrix(theta + self.periapsis_angle, Axis::Z);
        let tilt = rotation_matrix(self.inclination, Axis::X);
        let orient = rotation_matrix(self.node_angle, Axis::Z);
        (orient * tilt * in_plane * DVec3::X) * self.radius_at(theta)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn node_angle(&self) -> f64 {
        self.node_angle
    }

    pub fn periapsis_angle(&self) -> f64 {
        self.periapsis_angle
    }

    pub fn initial_anomaly(&self) -> f64 {
        self.initial_anomaly
    }

    pub fn perihelion(&self) -> f64 {
        self.perihelion
    }

    pub fn aphelion(&self) -> f64 {
        self.aphelion
    }

    /// Unit normal of the orbital plane in the sun-centred frame.
    pub fn plane_normal(&self) -> DVec3 {
        self.plane_normal
    }
}

/// `(0, −sin i, cos i)` turned by Ω about z.
fn plane_normal(inclination: f64, node_angle: f64) -> DVec3 {
    let tilted = DVec3::new(0.0, -inclination.sin(), inclination.cos());
    rotation_matrix(node_angle, Axis::Z) * tilted
}
