//! Geodetic computations

pub mod geodesy;

pub use geodesy::{destination, great_circle_distance};
