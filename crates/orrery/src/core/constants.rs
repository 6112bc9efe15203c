//! Physical constants and unit conversions.
//!
//! Everything inside the core works in SI lengths (metres), seconds, kilograms and
//! radians. Conversions from the catalog's AU / degree units happen at the boundary.

/// Gravitational constant (m³ kg⁻¹ s⁻²).
pub const G: f64 = 6.67e-11;

/// One astronomical unit in metres.
pub const AU: f64 = 1.496e11;

/// Seconds per day.
pub const DAY: f64 = 86_400.0;

/// Mass of the sun (kg).
pub const SUN_MASS: f64 = 1.99e30;

pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Distance (m) added to every separation before dividing, so a query point sitting
/// on a body yields a finite potential.
pub const SOFTENING: f64 = 0.01;

/// Default clamp magnitude for a single potential term.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Length unit for position queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    /// Native core unit.
    Meters,
    /// Astronomical units.
    #[default]
    AstronomicalUnits,
}

impl LengthUnit {
    /// Factor converting a length in metres into this unit.
    #[inline]
    pub fn per_meter(self) -> f64 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::AstronomicalUnits => 1.0 / AU,
        }
    }
}

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * DEG_TO_RAD
}

/// Convert astronomical units to metres.
#[inline]
pub fn au_to_meters(au: f64) -> f64 {
    au * AU
}
