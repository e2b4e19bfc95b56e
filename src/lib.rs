//! Frame ingestion for RGB-D pipelines.
//!
//! Color and depth frames are read from a sensor (live or a recorded dataset), uploaded to a
//! compute device and normalized to one output resolution together with rescaled intrinsics.
//! Recorded datasets may carry a ground-truth trajectory which is replayed alongside the frames.

pub mod config;
pub mod session;
pub mod numerics;
pub mod sensors;
pub mod io;
pub mod gpu;
pub mod replay;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f32);

/// Marker written into float maps for pixels without a valid measurement.
pub const MINF: Float = float::NEG_INFINITY;
