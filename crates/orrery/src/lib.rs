#![forbid(unsafe_code)]

pub mod api;
pub mod assets;
pub mod bridge;
pub mod core;
pub mod error;
pub mod field;

pub type Result<T> = std::result::Result<T, crate::error::Error>;

// Re-export key types at crate root for convenience
pub use api::config::OrreryConfig;
pub use assets::catalog::{BodyCatalog, BodyEntry};
pub use bridge::protocol::{BodySample, PositionBuffer, PositionLayout};
pub use core::body::{OrbitalBody, ShapeUpdate};
pub use core::constants::{LengthUnit, AU, DAY, G, SOFTENING, SUN_MASS};
pub use core::rotation::{rotation_matrix, Axis};
pub use core::system::OrbitalSystem;
pub use core::time::{FixedTimestep, SimClock};
pub use error::Error;
pub use field::potential::PotentialGrid;
pub use glam::DVec3;
