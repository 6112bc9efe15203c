use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::body::{OrbitalBody, ShapeUpdate};
use crate::core::constants::{au_to_meters, deg_to_rad};
use crate::core::system::OrbitalSystem;
use crate::error::Error;
use crate::Result;

/// Named bodies with their default orbital parameters.
/// Loaded from a JSON file at runtime, or taken from [`BodyCatalog::solar_system`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyCatalog {
    pub bodies: Vec<BodyEntry>,
}

/// One catalog row, in display units: kilograms, AU and degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyEntry {
    pub name: String,
    /// Mass in kilograms.
    pub mass: f64,
    /// Semi-major axis in AU (default: 1).
    #[serde(default = "default_semi_major_axis")]
    pub semi_major_axis: f64,
    #[serde(default)]
    pub eccentricity: f64,
    /// Orbit inclination in degrees.
    #[serde(default)]
    pub inclination: f64,
    /// Plane-intersection angle Ω in degrees.
    #[serde(default)]
    pub node_angle: f64,
    /// Major-axis angle within the orbital plane ω in degrees.
    #[serde(default)]
    pub periapsis_angle: f64,
    /// Starting anomaly in degrees.
    #[serde(default)]
    pub initial_anomaly: f64,
}

fn default_semi_major_axis() -> f64 {
    1.0
}

impl BodyEntry {
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &str,
        mass: f64,
        semi_major_axis: f64,
        inclination: f64,
        eccentricity: f64,
        node_angle: f64,
        periapsis_angle: f64,
        initial_anomaly: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            mass,
            semi_major_axis,
            eccentricity,
            inclination,
            node_angle,
            periapsis_angle,
            initial_anomaly,
        }
    }

    /// Reject values the geometry cannot handle.
    pub fn validate(&self) -> Result<()> {
        if !(self.mass > 0.0) {
            return Err(Error::NonPositiveMass {
                name: self.name.clone(),
                mass: self.mass,
            });
        }
        if !(self.semi_major_axis > 0.0) {
            return Err(Error::NonPositiveSemiMajorAxis {
                name: self.name.clone(),
                semi_major_axis: self.semi_major_axis,
            });
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(Error::InvalidEccentricity {
                name: self.name.clone(),
                eccentricity: self.eccentricity,
            });
        }
        Ok(())
    }

    /// The same parameters in core units (metres, radians).
    pub fn shape(&self) -> ShapeUpdate {
        ShapeUpdate::new()
            .semi_major_axis(au_to_meters(self.semi_major_axis))
            .eccentricity(self.eccentricity)
            .inclination(deg_to_rad(self.inclination))
            .node_angle(deg_to_rad(self.node_angle))
            .periapsis_angle(deg_to_rad(self.periapsis_angle))
            .initial_anomaly(deg_to_rad(self.initial_anomaly))
    }

    /// Build the body, converting units. Does not validate.
    pub fn to_body(&self) -> OrbitalBody {
        OrbitalBody::new(self.name.clone(), self.mass).with_shape(self.shape())
    }
}

impl BodyCatalog {
    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The eight planets with their default parameters.
    #[rustfmt::skip]
    pub fn solar_system() -> Self {
        Self {
            bodies: vec![
                //             name       mass      a (AU)  i (deg) e      Ω (deg) ω (deg) θ₀ (deg)
                BodyEntry::new("Mercury", 3.3e23,  0.387,  7.0,    0.2,   10.0,   0.0,    10.0),
                BodyEntry::new("Venus",   4.87e24, 0.723,  3.39,   0.007, 150.0,  20.0,   110.0),
                BodyEntry::new("Earth",   5.97e24, 1.0,    0.0,    0.017, 0.0,    0.0,    50.0),
                BodyEntry::new("Mars",    6.42e23, 1.527,  1.85,   0.093, 310.0,  140.0,  170.0),
                BodyEntry::new("Jupiter", 1.9e27,  5.2,    1.31,   0.048, 20.0,   50.0,   240.0),
                BodyEntry::new("Saturn",  5.68e26, 9.54,   2.49,   0.056, 120.0,  20.0,   320.0),
                BodyEntry::new("Uranus",  8.68e25, 19.19,  0.77,   0.046, 10.0,   120.0,  110.0),
                BodyEntry::new("Neptune", 1.02e26, 30.06,  1.77,   0.01,  0.0,    30.0,   260.0),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&BodyEntry> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Validate every entry and reject repeated names.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.bodies.len());
        for entry in &self.bodies {
            if let Err(err) = entry.validate() {
                log::warn!("catalog: rejecting '{}': {}", entry.name, err);
                return Err(err);
            }
            if !seen.insert(entry.name.as_str()) {
                log::warn!("catalog: '{}' appears twice", entry.name);
                return Err(Error::DuplicateBody(entry.name.clone()));
            }
        }
        Ok(())
    }

    /// Validate, then register every entry in catalog order.
    pub fn build_system(&self, dt: f64, central_mass: f64) -> Result<OrbitalSystem> {
        if !(dt > 0.0) {
            return Err(Error::NonPositiveTimeStep(dt));
        }
        self.validate()?;
        let mut system = OrbitalSystem::with_capacity(dt, central_mass, self.bodies.len());
        for entry in &self.bodies {
            system.append(entry.to_body());
        }
        Ok(system)
    }
}
