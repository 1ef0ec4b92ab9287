//! Computation engines and the values they produce.

pub mod ratio;
pub mod services;
