//! Public value types shared by the platsim engines and surfaces.

pub mod domain;
pub use domain::*;
