#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Body '{name}': eccentricity {eccentricity} outside [0, 1)")]
    InvalidEccentricity { name: String, eccentricity: f64 },
    #[error("Body '{name}': semi-major axis must be positive, got {semi_major_axis}")]
    NonPositiveSemiMajorAxis { name: String, semi_major_axis: f64 },
    #[error("Body '{name}': mass must be positive, got {mass}")]
    NonPositiveMass { name: String, mass: f64 },
    #[error("Body '{0}' listed more than once")]
    DuplicateBody(String),
    #[error("No body named '{0}' in the system")]
    UnknownBody(String),
    #[error("Time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),
    #[error("Steps per tick must be between 1 and {max}, got {0}", max = crate::api::config::MAX_STEPS_PER_TICK)]
    InvalidStepsPerTick(u32),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}
