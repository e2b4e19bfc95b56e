extern crate nalgebra as na;

use na::Matrix4;
use crate::Float;
use crate::session::Session;
use self::camera::{Calibration,pinhole::Pinhole};

pub mod camera;

/// Host-side state every frame source carries: native resolutions, the buffers the
/// current frame is decoded into and the calibration of both modalities.
#[derive(Debug,Clone)]
pub struct SensorFrame {
    pub depth_width: usize,
    pub depth_height: usize,
    pub color_width: usize,
    pub color_height: usize,
    pub depth_float: Vec<Float>,
    pub color_rgbx: Vec<[u8;4]>,
    pub depth_calibration: Calibration,
    pub color_calibration: Calibration
}

impl SensorFrame {

    pub fn new(depth_width: usize, depth_height: usize, color_width: usize, color_height: usize) -> SensorFrame {
        SensorFrame {
            depth_width,
            depth_height,
            color_width,
            color_height,
            depth_float: vec![0.0; depth_width*depth_height],
            color_rgbx: vec![[0,0,0,255]; color_width*color_height],
            depth_calibration: Calibration::identity(),
            color_calibration: Calibration::identity()
        }
    }

    pub fn initialize_depth_intrinsics(&mut self, fx: Float, fy: Float, cx: Float, cy: Float) -> () {
        self.depth_calibration.intrinsics = Pinhole::new(fx,fy,cx,cy);
    }

    pub fn initialize_color_intrinsics(&mut self, fx: Float, fy: Float, cx: Float, cy: Float) -> () {
        self.color_calibration.intrinsics = Pinhole::new(fx,fy,cx,cy);
    }

    pub fn initialize_color_extrinsics(&mut self, extrinsics: &Matrix4<Float>) -> () {
        self.color_calibration.extrinsics = *extrinsics;
        self.color_calibration.extrinsics_inv = extrinsics.try_inverse().unwrap_or_else(Matrix4::<Float>::identity);
    }
}

/**
 * A source of color+depth frames.
 *
 * A frame is advanced in two phases, depth first and color second. Either call returning
 * `false` means the frame is unavailable and must not be consumed.
 */
pub trait RGBDSensor {
    fn process_depth(&mut self, session: &Session) -> bool;
    fn process_color(&mut self, session: &Session) -> bool;
    fn frame(&self) -> &SensorFrame;

    fn get_depth_width(&self) -> usize {
        self.frame().depth_width
    }

    fn get_depth_height(&self) -> usize {
        self.frame().depth_height
    }

    fn get_color_width(&self) -> usize {
        self.frame().color_width
    }

    fn get_color_height(&self) -> usize {
        self.frame().color_height
    }

    fn get_depth_float(&self) -> &[Float] {
        &self.frame().depth_float
    }

    fn get_color_rgbx(&self) -> &[[u8;4]] {
        &self.frame().color_rgbx
    }

    fn get_depth_intrinsics(&self) -> Matrix4<Float> {
        self.frame().depth_calibration.intrinsics.projection
    }

    fn get_depth_intrinsics_inv(&self) -> Matrix4<Float> {
        self.frame().depth_calibration.intrinsics.inverse_projection
    }

    fn get_depth_extrinsics(&self) -> Matrix4<Float> {
        self.frame().depth_calibration.extrinsics
    }

    fn get_depth_extrinsics_inv(&self) -> Matrix4<Float> {
        self.frame().depth_calibration.extrinsics_inv
    }

    fn get_color_intrinsics(&self) -> Matrix4<Float> {
        self.frame().color_calibration.intrinsics.projection
    }

    fn get_color_intrinsics_inv(&self) -> Matrix4<Float> {
        self.frame().color_calibration.intrinsics.inverse_projection
    }

    fn get_color_extrinsics(&self) -> Matrix4<Float> {
        self.frame().color_calibration.extrinsics
    }

    fn get_color_extrinsics_inv(&self) -> Matrix4<Float> {
        self.frame().color_calibration.extrinsics_inv
    }
}
