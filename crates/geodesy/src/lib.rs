pub mod coord;
pub mod distance;

// Geodesy crate: small, well-tested geographic primitives only.
pub use coord::*;
pub use distance::*;
