// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
pub mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{near_zero, reflect, refract, unit};

/// RGB color in linear light. Components are unbounded above until encoded.
pub type Color = Vec3;
