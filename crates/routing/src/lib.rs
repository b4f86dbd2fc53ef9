pub mod client;
pub mod route;

pub use client::*;
pub use route::*;
