extern crate nalgebra as na;

use na::Matrix4;
use crate::Float;
use self::pinhole::Pinhole;

pub mod pinhole;

/// Projection and pose of one modality of a sensor.
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Calibration {
    pub intrinsics: Pinhole,
    pub extrinsics: Matrix4<Float>,
    pub extrinsics_inv: Matrix4<Float>
}

impl Calibration {
    pub fn identity() -> Calibration {
        Calibration{intrinsics: Pinhole::identity(), extrinsics: Matrix4::<Float>::identity(), extrinsics_inv: Matrix4::<Float>::identity()}
    }

    /**
     * Calibration for frames resized from (native_width,native_height) to (width,height).
     * Intrinsics are scaled anisotropically, the rigid pose is left as is.
     */
    pub fn rescaled(&self, native_width: usize, native_height: usize, width: usize, height: usize) -> Calibration {
        let scale_x = width as Float / native_width as Float;
        let scale_y = height as Float / native_height as Float;
        Calibration{intrinsics: self.intrinsics.scale(scale_x,scale_y), extrinsics: self.extrinsics, extrinsics_inv: self.extrinsics_inv}
    }
}
