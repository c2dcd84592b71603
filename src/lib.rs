pub mod error;
pub mod extrusion;
pub mod geometry;
pub mod math;

pub use error::{GyreError, Result};
