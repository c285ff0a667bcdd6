//! Sample processing

pub mod sample_filter;

pub use sample_filter::{SampleFilter, Verdict};
