pub mod controller;
pub mod selection;

pub use controller::*;
pub use selection::*;
