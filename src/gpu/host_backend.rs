use std::mem;
use crate::Float;
use super::{ComputeBackend,DeviceError,Texel,kernels};

/// Buffer living in host memory.
#[derive(Debug,Clone,PartialEq)]
pub struct HostBuffer<T> {
    data: Vec<T>
}

impl<T> HostBuffer<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/**
 * Backend executing every kernel synchronously in host memory.
 *
 * An optional memory budget makes allocations fail the way a full device would.
 */
#[derive(Debug,Clone,Default)]
pub struct HostBackend {
    memory_limit: Option<usize>,
    allocated_bytes: usize,
    synchronize_count: usize
}

impl HostBackend {

    pub fn new() -> HostBackend {
        HostBackend::default()
    }

    pub fn with_memory_limit(bytes: usize) -> HostBackend {
        HostBackend{memory_limit: Some(bytes), ..HostBackend::default()}
    }

    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes
    }

    pub fn synchronize_count(&self) -> usize {
        self.synchronize_count
    }
}

impl ComputeBackend for HostBackend {
    type Buffer<T: Texel> = HostBuffer<T>;

    fn alloc<T: Texel>(&mut self, len: usize) -> Result<HostBuffer<T>, DeviceError> {
        // host allocations are capped at isize::MAX bytes
        let limit = self.memory_limit.unwrap_or(isize::MAX as usize);
        let available = limit.saturating_sub(self.allocated_bytes);
        let requested = match len.checked_mul(mem::size_of::<T>()) {
            Some(bytes) if bytes <= available => bytes,
            Some(bytes) => return Err(DeviceError::OutOfMemory{requested: bytes, available}),
            None => return Err(DeviceError::OutOfMemory{requested: usize::MAX, available})
        };
        self.allocated_bytes += requested;
        Ok(HostBuffer{data: vec![T::default(); len]})
    }

    fn free<T: Texel>(&mut self, buffer: HostBuffer<T>) -> Result<(), DeviceError> {
        self.allocated_bytes = self.allocated_bytes.saturating_sub(buffer.len()*mem::size_of::<T>());
        Ok(())
    }

    fn buffer_len<T: Texel>(&self, buffer: &HostBuffer<T>) -> usize {
        buffer.len()
    }

    fn upload<T: Texel>(&mut self, dst: &mut HostBuffer<T>, src: &[T]) -> Result<(), DeviceError> {
        kernels::check_len(dst.data.len(), src.len())?;
        dst.data[..src.len()].copy_from_slice(src);
        Ok(())
    }

    fn download<T: Texel>(&mut self, src: &HostBuffer<T>, dst: &mut [T]) -> Result<(), DeviceError> {
        kernels::check_len(src.data.len(), dst.len())?;
        dst.copy_from_slice(&src.data[..dst.len()]);
        Ok(())
    }

    fn synchronize(&mut self) -> Result<(), DeviceError> {
        self.synchronize_count += 1;
        Ok(())
    }

    fn convert_color_raw_to_float4(&mut self, output: &mut HostBuffer<[Float;4]>, input: &HostBuffer<[u8;4]>, width: usize, height: usize) -> Result<(), DeviceError> {
        kernels::convert_color_raw_to_float4(&mut output.data, &input.data, width, height)
    }

    fn convert_depth_raw_to_float(&mut self, output: &mut HostBuffer<Float>, input: &HostBuffer<u16>, width: usize, height: usize, min_depth: Float, max_depth: Float) -> Result<(), DeviceError> {
        kernels::convert_depth_raw_to_float(&mut output.data, &input.data, width, height, min_depth, max_depth)
    }

    fn copy_float_map(&mut self, output: &mut HostBuffer<Float>, input: &HostBuffer<Float>, width: usize, height: usize) -> Result<(), DeviceError> {
        kernels::copy_map(&mut output.data, &input.data, width, height)
    }

    fn copy_float4_map(&mut self, output: &mut HostBuffer<[Float;4]>, input: &HostBuffer<[Float;4]>, width: usize, height: usize) -> Result<(), DeviceError> {
        kernels::copy_map(&mut output.data, &input.data, width, height)
    }

    fn resample_float_map(&mut self, output: &mut HostBuffer<Float>, output_width: usize, output_height: usize, input: &HostBuffer<Float>, input_width: usize, input_height: usize, depth_mask: Option<&HostBuffer<Float>>) -> Result<(), DeviceError> {
        kernels::resample_float_map(&mut output.data, output_width, output_height, &input.data, input_width, input_height, depth_mask.map(|m| m.as_slice()))
    }

    fn resample_float4_map(&mut self, output: &mut HostBuffer<[Float;4]>, output_width: usize, output_height: usize, input: &HostBuffer<[Float;4]>, input_width: usize, input_height: usize) -> Result<(), DeviceError> {
        kernels::resample_float4_map(&mut output.data, output_width, output_height, &input.data, input_width, input_height)
    }
}
