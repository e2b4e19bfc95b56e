//! Device abstraction used by the frame adapter.
//!
//! The adapter only talks to a [`ComputeBackend`]: buffer allocation, host/device transfers
//! and the fixed set of conversion and resampling kernels. [`HostBackend`] runs the kernels
//! in host memory and is the reference the device kernels are checked against.

use std::fmt;
use crate::Float;

pub mod kernels;
pub mod host_backend;
pub mod adapter;

pub use self::host_backend::{HostBackend,HostBuffer};
pub use self::adapter::RGBDAdapter;

/// Device error types
#[derive(Debug,Clone,PartialEq)]
pub enum DeviceError {
    /// Allocation exceeds the memory left on the device
    OutOfMemory { requested: usize, available: usize },
    /// A buffer is smaller than the map written to or read from it
    SizeMismatch { expected: usize, actual: usize },
    /// Buffer used after the adapter released it
    Released,
    /// Other backend failure
    Other(String)
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeviceError::OutOfMemory{requested,available} => write!(f, "device out of memory: requested {} bytes, {} available", requested, available),
            DeviceError::SizeMismatch{expected,actual} => write!(f, "buffer size mismatch: expected {} elements, got {}", expected, actual),
            DeviceError::Released => write!(f, "device buffer used after release"),
            DeviceError::Other(msg) => write!(f, "device error: {}", msg)
        }
    }
}

impl std::error::Error for DeviceError {}

/// Element count of a width x height map. A count that does not fit in memory is reported as out of memory.
pub fn map_len(width: usize, height: usize) -> Result<usize, DeviceError> {
    width.checked_mul(height).ok_or(DeviceError::OutOfMemory{requested: usize::MAX, available: 0})
}

/// Element types a device buffer can hold.
pub trait Texel: Copy + Default + Send + 'static {}

impl Texel for Float {}
impl Texel for u16 {}
impl Texel for [u8;4] {}
impl Texel for [Float;4] {}

/**
 * Fixed call contract of the compute device.
 *
 * Kernel launches may be queued; results are only guaranteed to be visible on the host after
 * `synchronize` or a `download`. Work submitted through one backend executes in submission order.
 */
pub trait ComputeBackend {
    type Buffer<T: Texel>;

    fn alloc<T: Texel>(&mut self, len: usize) -> Result<Self::Buffer<T>, DeviceError>;
    fn free<T: Texel>(&mut self, buffer: Self::Buffer<T>) -> Result<(), DeviceError>;
    fn buffer_len<T: Texel>(&self, buffer: &Self::Buffer<T>) -> usize;
    fn upload<T: Texel>(&mut self, dst: &mut Self::Buffer<T>, src: &[T]) -> Result<(), DeviceError>;
    fn download<T: Texel>(&mut self, src: &Self::Buffer<T>, dst: &mut [T]) -> Result<(), DeviceError>;
    fn synchronize(&mut self) -> Result<(), DeviceError>;

    /// Scales packed bytes in [0,255] to floats in [0,1].
    fn convert_color_raw_to_float4(&mut self, output: &mut Self::Buffer<[Float;4]>, input: &Self::Buffer<[u8;4]>, width: usize, height: usize) -> Result<(), DeviceError>;
    /// Millimetres to metres. Values outside [min_depth,max_depth] become invalid.
    fn convert_depth_raw_to_float(&mut self, output: &mut Self::Buffer<Float>, input: &Self::Buffer<u16>, width: usize, height: usize, min_depth: Float, max_depth: Float) -> Result<(), DeviceError>;
    fn copy_float_map(&mut self, output: &mut Self::Buffer<Float>, input: &Self::Buffer<Float>, width: usize, height: usize) -> Result<(), DeviceError>;
    fn copy_float4_map(&mut self, output: &mut Self::Buffer<[Float;4]>, input: &Self::Buffer<[Float;4]>, width: usize, height: usize) -> Result<(), DeviceError>;
    /// Bilinear resample. Where a mask is given, pixels with a zero mask value become invalid.
    fn resample_float_map(&mut self, output: &mut Self::Buffer<Float>, output_width: usize, output_height: usize, input: &Self::Buffer<Float>, input_width: usize, input_height: usize, depth_mask: Option<&Self::Buffer<Float>>) -> Result<(), DeviceError>;
    fn resample_float4_map(&mut self, output: &mut Self::Buffer<[Float;4]>, output_width: usize, output_height: usize, input: &Self::Buffer<[Float;4]>, input_width: usize, input_height: usize) -> Result<(), DeviceError>;
}
