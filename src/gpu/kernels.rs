use crate::{Float,MINF};
use super::DeviceError;

trait Sample: Copy {
    fn is_valid(&self) -> bool;
    fn zero() -> Self;
    fn invalid() -> Self;
    fn add_weighted(self, other: Self, weight: Float) -> Self;
    fn divide(self, weight: Float) -> Self;
}

impl Sample for Float {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }

    fn zero() -> Self {
        0.0
    }

    fn invalid() -> Self {
        MINF
    }

    fn add_weighted(self, other: Self, weight: Float) -> Self {
        self + weight*other
    }

    fn divide(self, weight: Float) -> Self {
        self/weight
    }
}

impl Sample for [Float;4] {
    fn is_valid(&self) -> bool {
        self[0].is_finite()
    }

    fn zero() -> Self {
        [0.0;4]
    }

    fn invalid() -> Self {
        [MINF;4]
    }

    fn add_weighted(self, other: Self, weight: Float) -> Self {
        [self[0] + weight*other[0], self[1] + weight*other[1], self[2] + weight*other[2], self[3] + weight*other[3]]
    }

    fn divide(self, weight: Float) -> Self {
        [self[0]/weight, self[1]/weight, self[2]/weight, self[3]/weight]
    }
}

pub fn check_len(len: usize, expected: usize) -> Result<(), DeviceError> {
    match len >= expected {
        true => Ok(()),
        false => Err(DeviceError::SizeMismatch{expected, actual: len})
    }
}

pub fn convert_color_raw_to_float4(output: &mut [[Float;4]], input: &[[u8;4]], width: usize, height: usize) -> Result<(), DeviceError> {
    let size = width*height;
    check_len(output.len(), size)?;
    check_len(input.len(), size)?;
    for (out, raw) in output[..size].iter_mut().zip(input[..size].iter()) {
        *out = [raw[0] as Float/255.0, raw[1] as Float/255.0, raw[2] as Float/255.0, raw[3] as Float/255.0];
    }
    Ok(())
}

pub fn convert_depth_raw_to_float(output: &mut [Float], input: &[u16], width: usize, height: usize, min_depth: Float, max_depth: Float) -> Result<(), DeviceError> {
    let size = width*height;
    check_len(output.len(), size)?;
    check_len(input.len(), size)?;
    for (out, &raw) in output[..size].iter_mut().zip(input[..size].iter()) {
        let depth = raw as Float*0.001;
        *out = match depth >= min_depth && depth <= max_depth {
            true => depth,
            false => MINF
        };
    }
    Ok(())
}

pub fn copy_map<T: Copy>(output: &mut [T], input: &[T], width: usize, height: usize) -> Result<(), DeviceError> {
    let size = width*height;
    check_len(output.len(), size)?;
    check_len(input.len(), size)?;
    output[..size].copy_from_slice(&input[..size]);
    Ok(())
}

pub fn resample_float_map(output: &mut [Float], output_width: usize, output_height: usize, input: &[Float], input_width: usize, input_height: usize, depth_mask: Option<&[Float]>) -> Result<(), DeviceError> {
    resample(output, output_width, output_height, input, input_width, input_height)?;
    if let Some(mask) = depth_mask {
        check_len(mask.len(), output_width*output_height)?;
        for (out, &m) in output.iter_mut().zip(mask.iter()) {
            if m == 0.0 {
                *out = MINF;
            }
        }
    }
    Ok(())
}

pub fn resample_float4_map(output: &mut [[Float;4]], output_width: usize, output_height: usize, input: &[[Float;4]], input_width: usize, input_height: usize) -> Result<(), DeviceError> {
    resample(output, output_width, output_height, input, input_width, input_height)
}

/// Ratio mapping the first and last output pixel onto the first and last input pixel.
fn source_step(input_dim: usize, output_dim: usize) -> Float {
    match output_dim {
        0 | 1 => 0.0,
        _ => (input_dim.saturating_sub(1)) as Float/(output_dim - 1) as Float
    }
}

fn resample<T: Sample>(output: &mut [T], output_width: usize, output_height: usize, input: &[T], input_width: usize, input_height: usize) -> Result<(), DeviceError> {
    check_len(output.len(), output_width*output_height)?;
    check_len(input.len(), input_width*input_height)?;
    if input_width == 0 || input_height == 0 {
        return Err(DeviceError::Other(String::from("resample from an empty map")));
    }

    let step_x = source_step(input_width, output_width);
    let step_y = source_step(input_height, output_height);

    for y in 0..output_height {
        for x in 0..output_width {
            output[y*output_width + x] = bilinear(input, input_width, input_height, x as Float*step_x, y as Float*step_y);
        }
    }
    Ok(())
}

/// Samples with a zero weight or an invalid value are skipped and the rest renormalized.
fn bilinear<T: Sample>(input: &[T], width: usize, height: usize, x: Float, y: Float) -> T {
    let x0 = (x.floor() as usize).min(width - 1);
    let y0 = (y.floor() as usize).min(height - 1);
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let alpha = x - x0 as Float;
    let beta = y - y0 as Float;

    let neighbours = [
        (x0, y0, (1.0 - alpha)*(1.0 - beta)),
        (x1, y0, alpha*(1.0 - beta)),
        (x0, y1, (1.0 - alpha)*beta),
        (x1, y1, alpha*beta)
    ];

    let mut value = T::zero();
    let mut weight_sum = 0.0;
    for &(nx, ny, weight) in neighbours.iter() {
        let sample = input[ny*width + nx];
        if weight > 0.0 && sample.is_valid() {
            value = value.add_weighted(sample, weight);
            weight_sum += weight;
        }
    }

    match weight_sum > 0.0 {
        true => value.divide(weight_sum),
        false => T::invalid()
    }
}
