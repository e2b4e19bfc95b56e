extern crate nalgebra as na;

use std::time::Instant;
use na::Matrix4;
use tracing::{debug,warn};

use crate::Float;
use crate::session::Session;
use crate::sensors::{RGBDSensor,camera::Calibration};
use super::{ComputeBackend,DeviceError,map_len};

/**
 * Normalizes the frames of a sensor to one device-resident resolution.
 *
 * The adapter owns the backend, the sensor and every device buffer for the lifetime of the
 * session. Intrinsics are rescaled once on initialization, buffers are written on every
 * successful `process` and released by `teardown`. Dropping an adapter without `teardown`
 * leaves the release to the backend's buffer type.
 */
pub struct RGBDAdapter<B: ComputeBackend, S: RGBDSensor> {
    backend: B,
    sensor: S,
    width: usize,
    height: usize,
    depth_calibration: Calibration,
    color_calibration: Calibration,
    frame_number: usize,

    depth_map_float: Option<B::Buffer<Float>>,
    depth_map_resampled_float: Option<B::Buffer<Float>>,
    color_map_raw: Option<B::Buffer<[u8;4]>>,
    color_map_float4: Option<B::Buffer<[Float;4]>>,
    color_map_resampled_float4: Option<B::Buffer<[Float;4]>>
}

impl<B: ComputeBackend, S: RGBDSensor> RGBDAdapter<B,S> {

    /// Fails if the device cannot hold the buffers. Buffers reserved up to that point are released again.
    pub fn initialize(backend: B, sensor: S, width: usize, height: usize) -> Result<RGBDAdapter<B,S>, DeviceError> {
        let frame = sensor.frame();
        let depth_calibration = frame.depth_calibration.rescaled(frame.depth_width, frame.depth_height, width, height);
        let color_calibration = frame.color_calibration.rescaled(frame.color_width, frame.color_height, width, height);

        let buffer_dim_depth_input = map_len(frame.depth_width, frame.depth_height)?;
        let buffer_dim_color_input = map_len(frame.color_width, frame.color_height)?;
        let buffer_dim_output = map_len(width, height)?;

        debug!("adapter: depth {}x{}, color {}x{} -> {}x{}", frame.depth_width, frame.depth_height, frame.color_width, frame.color_height, width, height);

        let mut adapter = RGBDAdapter {
            backend,
            sensor,
            width,
            height,
            depth_calibration,
            color_calibration,
            frame_number: 0,
            depth_map_float: None,
            depth_map_resampled_float: None,
            color_map_raw: None,
            color_map_float4: None,
            color_map_resampled_float4: None
        };

        match adapter.allocate_buffers(buffer_dim_depth_input, buffer_dim_color_input, buffer_dim_output) {
            Ok(()) => Ok(adapter),
            Err(e) => {
                if let Err(release_error) = adapter.release_buffers() {
                    warn!("releasing partially allocated buffers failed: {}", release_error);
                }
                Err(e)
            }
        }
    }

    fn allocate_buffers(&mut self, buffer_dim_depth_input: usize, buffer_dim_color_input: usize, buffer_dim_output: usize) -> Result<(), DeviceError> {
        self.depth_map_float = Some(self.backend.alloc::<Float>(buffer_dim_depth_input)?);
        self.depth_map_resampled_float = Some(self.backend.alloc::<Float>(buffer_dim_output)?);
        self.color_map_raw = Some(self.backend.alloc::<[u8;4]>(buffer_dim_color_input)?);
        self.color_map_float4 = Some(self.backend.alloc::<[Float;4]>(buffer_dim_color_input)?);
        self.color_map_resampled_float4 = Some(self.backend.alloc::<[Float;4]>(buffer_dim_output)?);
        Ok(())
    }

    /**
     * Reads the next frame from the sensor and writes the normalized depth and color maps.
     *
     * Returns `Ok(false)` without touching any device buffer when the sensor has no frame.
     * The buffers then still hold the previous frame.
     */
    pub fn process(&mut self, session: &mut Session) -> Result<bool, DeviceError> {
        // depth has to be read before color
        if !self.sensor.process_depth(session) {
            return Ok(false);
        }
        if !self.sensor.process_color(session) {
            return Ok(false);
        }

        let timer = match session.timings_detailed() {
            true => {
                self.backend.synchronize()?;
                Some(Instant::now())
            },
            false => None
        };

        self.process_color()?;
        self.process_depth()?;

        if let Some(start) = timer {
            self.backend.synchronize()?;
            session.timing.record_rgbd_adapter(start.elapsed().as_secs_f64()*1000.0);
        }

        self.frame_number += 1;
        Ok(true)
    }

    fn process_color(&mut self) -> Result<(), DeviceError> {
        let color_width = self.sensor.get_color_width();
        let color_height = self.sensor.get_color_height();
        let (raw, float4, resampled) = match (self.color_map_raw.as_mut(), self.color_map_float4.as_mut(), self.color_map_resampled_float4.as_mut()) {
            (Some(raw), Some(float4), Some(resampled)) => (raw, float4, resampled),
            _ => return Err(DeviceError::Released)
        };

        self.backend.upload::<[u8;4]>(raw, self.sensor.get_color_rgbx())?;
        self.backend.convert_color_raw_to_float4(float4, raw, color_width, color_height)?;

        match color_width == self.width && color_height == self.height {
            true => self.backend.copy_float4_map(resampled, float4, self.width, self.height),
            false => self.backend.resample_float4_map(resampled, self.width, self.height, float4, color_width, color_height)
        }
    }

    fn process_depth(&mut self) -> Result<(), DeviceError> {
        let depth_width = self.sensor.get_depth_width();
        let depth_height = self.sensor.get_depth_height();
        let (float, resampled) = match (self.depth_map_float.as_mut(), self.depth_map_resampled_float.as_mut()) {
            (Some(float), Some(resampled)) => (float, resampled),
            _ => return Err(DeviceError::Released)
        };

        self.backend.upload::<Float>(float, self.sensor.get_depth_float())?;

        match depth_width == self.width && depth_height == self.height {
            true => self.backend.copy_float_map(resampled, float, self.width, self.height),
            false => self.backend.resample_float_map(resampled, self.width, self.height, float, depth_width, depth_height, None)
        }
    }

    /// Releases every device buffer and hands back the backend and the sensor.
    pub fn teardown(mut self) -> Result<(B,S), DeviceError> {
        self.release_buffers()?;
        let RGBDAdapter{backend, sensor, ..} = self;
        Ok((backend,sensor))
    }

    fn release_buffers(&mut self) -> Result<(), DeviceError> {
        let mut result = Ok(());
        if let Some(buffer) = self.depth_map_float.take() {
            result = result.and(self.backend.free::<Float>(buffer));
        }
        if let Some(buffer) = self.depth_map_resampled_float.take() {
            result = result.and(self.backend.free::<Float>(buffer));
        }
        if let Some(buffer) = self.color_map_raw.take() {
            result = result.and(self.backend.free::<[u8;4]>(buffer));
        }
        if let Some(buffer) = self.color_map_float4.take() {
            result = result.and(self.backend.free::<[Float;4]>(buffer));
        }
        if let Some(buffer) = self.color_map_resampled_float4.take() {
            result = result.and(self.backend.free::<[Float;4]>(buffer));
        }
        result
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frame_number(&self) -> usize {
        self.frame_number
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn depth_map(&self) -> Option<&B::Buffer<Float>> {
        self.depth_map_resampled_float.as_ref()
    }

    pub fn color_map(&self) -> Option<&B::Buffer<[Float;4]>> {
        self.color_map_resampled_float4.as_ref()
    }

    pub fn download_depth_map(&mut self) -> Result<Vec<Float>, DeviceError> {
        let mut out = vec![0.0; self.width*self.height];
        match self.depth_map_resampled_float.as_ref() {
            Some(buffer) => self.backend.download::<Float>(buffer, &mut out)?,
            None => return Err(DeviceError::Released)
        };
        Ok(out)
    }

    pub fn download_color_map(&mut self) -> Result<Vec<[Float;4]>, DeviceError> {
        let mut out = vec![[0.0;4]; self.width*self.height];
        match self.color_map_resampled_float4.as_ref() {
            Some(buffer) => self.backend.download::<[Float;4]>(buffer, &mut out)?,
            None => return Err(DeviceError::Released)
        };
        Ok(out)
    }

    pub fn get_depth_intrinsics(&self) -> Matrix4<Float> {
        self.depth_calibration.intrinsics.projection
    }

    pub fn get_depth_intrinsics_inv(&self) -> Matrix4<Float> {
        self.depth_calibration.intrinsics.inverse_projection
    }

    pub fn get_color_intrinsics(&self) -> Matrix4<Float> {
        self.color_calibration.intrinsics.projection
    }

    pub fn get_color_intrinsics_inv(&self) -> Matrix4<Float> {
        self.color_calibration.intrinsics.inverse_projection
    }

    pub fn get_depth_extrinsics(&self) -> Matrix4<Float> {
        self.depth_calibration.extrinsics
    }

    pub fn get_depth_extrinsics_inv(&self) -> Matrix4<Float> {
        self.depth_calibration.extrinsics_inv
    }

    pub fn get_color_extrinsics(&self) -> Matrix4<Float> {
        self.color_calibration.extrinsics
    }

    pub fn get_color_extrinsics_inv(&self) -> Matrix4<Float> {
        self.color_calibration.extrinsics_inv
    }
}

