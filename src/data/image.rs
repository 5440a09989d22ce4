//! Image preprocessing: decodes an image into a row-major intensity matrix.
//!
//! Dark pixels map to 1.0 and white to 0.0, matching the synthetic shapes
//! where ink is lit and background is zero.

use std::path::Path;

use crate::error::Result;

/// Decodes the image at `path` into a `height × width` matrix in `[0, 1]`.
pub fn image_to_intensity<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let img = image::open(path)?;
    Ok(luma_to_intensity(&img.to_luma8()))
}

fn luma_to_intensity(gray: &image::GrayImage) -> Vec<Vec<f64>> {
    let (width, height) = gray.dimensions();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| 1.0 - gray.get_pixel(x, y).0[0] as f64 / 255.0)
                .collect()
        })
        .collect()
}
