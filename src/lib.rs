//! cp-font-gen
//!
//! Builds minimal bitmap fonts for CircuitPython displays: a configured
//! character set is subset out of an outline font, rasterized to BDF with
//! its encodings repaired, and optionally packed to PCF, once per point size.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod tools;

#[cfg(test)]
mod test_support;
