extern crate image as image_rs;

use std::path::Path;
use image_rs::DynamicImage;
use tracing::warn;

use crate::Float;

pub mod association;
pub mod trajectory;
pub mod local_data_reader;

/**
 * Writes a single channel 16 bit depth image into `depth` as physical depth, i.e. every
 * value divided by `scale_factor`. Nothing is written if the image has another format or size.
 */
pub fn decode_depth_image(image: &DynamicImage, scale_factor: u32, width: usize, height: usize, depth: &mut [Float]) -> bool {
    let depth_image = match image {
        DynamicImage::ImageLuma16(buffer) => buffer,
        _ => {
            warn!("depth image is not single channel 16 bit: {:?}", image.color());
            return false;
        }
    };

    let (image_width, image_height) = depth_image.dimensions();
    if image_width as usize != width || image_height as usize != height || depth.len() < width*height {
        warn!("depth image is {}x{}, expected {}x{}", image_width, image_height, width, height);
        return false;
    }
    if scale_factor == 0 {
        warn!("depth scale factor must not be zero");
        return false;
    }

    let scale = scale_factor as Float;
    for (out, &raw) in depth.iter_mut().zip(depth_image.as_raw().iter()) {
        *out = raw as Float/scale;
    }
    true
}

/**
 * Writes an 8 bit image into `color` as packed RGBX with an opaque fourth channel.
 * Gray images are expanded to three channels. Nothing is written if the image has a
 * deeper format or another size.
 */
pub fn decode_color_image(image: &DynamicImage, width: usize, height: usize, color: &mut [[u8;4]]) -> bool {
    let rgb_image = match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image.to_rgb8(),
        _ => {
            warn!("color image is not 8 bit: {:?}", image.color());
            return false;
        }
    };

    let (image_width, image_height) = rgb_image.dimensions();
    if image_width as usize != width || image_height as usize != height || color.len() < width*height {
        warn!("color image is {}x{}, expected {}x{}", image_width, image_height, width, height);
        return false;
    }

    for (out, pixel) in color.iter_mut().zip(rgb_image.pixels()) {
        *out = [pixel[0], pixel[1], pixel[2], 255];
    }
    true
}

pub fn load_depth_image(file_path: &Path, scale_factor: u32, width: usize, height: usize, depth: &mut [Float]) -> bool {
    match image_rs::open(file_path) {
        Ok(image) => {
            let decoded = decode_depth_image(&image, scale_factor, width, height, depth);
            if !decoded {
                warn!("cannot read depth image {}", file_path.display());
            }
            decoded
        },
        Err(e) => {
            warn!("cannot read depth image {}: {}", file_path.display(), e);
            false
        }
    }
}

pub fn load_color_image(file_path: &Path, width: usize, height: usize, color: &mut [[u8;4]]) -> bool {
    match image_rs::open(file_path) {
        Ok(image) => {
            let decoded = decode_color_image(&image, width, height, color);
            if !decoded {
                warn!("cannot read color image {}", file_path.display());
            }
            decoded
        },
        Err(e) => {
            warn!("cannot read color image {}: {}", file_path.display(), e);
            false
        }
    }
}
