//! Equirectangular (lat/lon) PNG maps of the displaced surface radius.
//!
//! The surface is sampled directly from the layer stack at each pixel
//! direction, independent of any mesh resolution.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::Vec3;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use rayon::prelude::*;
use thiserror::Error;

use crate::deform::SphereDeformer;
use crate::error::DeformError;
use crate::layers::LayerSet;
use crate::noise::NoiseSource;

/// Errors that can occur during displacement map export.
#[derive(Error, Debug)]
pub enum DisplacementMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid value range: min ({0}) >= max ({1})")]
    InvalidRange(f32, f32),
    #[error("Invalid output dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),
    #[error(transparent)]
    Deform(#[from] DeformError),
}

/// Options for displacement map export.
#[derive(Debug, Clone)]
pub struct DisplacementMapOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Radius mapped to black and white. If None, the sampled range is used.
    pub range: Option<(f32, f32)>,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for DisplacementMapOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
            range: None,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Unit direction for a latitude/longitude pair in radians.
///
/// `lon = 0` on the equator points toward +Z; latitude grows toward +Y.
#[inline]
pub fn lat_lon_to_dir(lat: f32, lon: f32) -> Vec3 {
    let (slon, clon) = lon.sin_cos();
    let (slat, clat) = lat.sin_cos();
    Vec3::new(clat * slon, slat, clat * clon)
}

/// Writes a 16-bit grayscale equirectangular map of the displaced radius.
///
/// # Arguments
/// * `deformer` - Supplies the noise field
/// * `layers` - Noise layers summed at each pixel direction
/// * `base_radius` - Sphere radius before displacement
/// * `path` - Output PNG path; parent directories are created
/// * `options` - Image size, value range and PNG settings
///
/// # Returns
/// The `(min, max)` radius mapped to black and white.
pub fn export_displacement_png<N: NoiseSource>(
    deformer: &SphereDeformer<N>,
    layers: &LayerSet,
    base_radius: f32,
    path: &Path,
    options: &DisplacementMapOptions,
) -> Result<(f32, f32), DisplacementMapError> {
    let (width, height) = (options.width, options.height);
    if width < 2 || height < 2 {
        return Err(DisplacementMapError::InvalidDimensions(width, height));
    }
    if let Some((min, max)) = options.range {
        if !(min < max) {
            return Err(DisplacementMapError::InvalidRange(min, max));
        }
    }
    if !(base_radius.is_finite() && base_radius > 0.0) {
        return Err(DeformError::argument(format!(
            "base_radius must be finite and > 0, got {}",
            base_radius
        ))
        .into());
    }
    layers.validate()?;

    let radii: Vec<f32> = (0..width as usize * height as usize)
        .into_par_iter()
        .map(|i| {
            let x = (i % width as usize) as f32;
            let y = (i / width as usize) as f32;
            // Pixel centres: lat from +pi/2 (top) to -pi/2, lon from -pi to pi
            let lat = FRAC_PI_2 - (y + 0.5) / height as f32 * PI;
            let lon = -PI + (x + 0.5) / width as f32 * (2.0 * PI);
            deformer
                .displace(lat_lon_to_dir(lat, lon), base_radius, layers)
                .length()
        })
        .collect();

    if let Some(index) = radii.iter().position(|r| !r.is_finite()) {
        return Err(DeformError::NumericOverflow { index }.into());
    }

    let (min, max) = match options.range {
        Some(range) => range,
        None => {
            let (min, max) = radii
                .iter()
                .fold((f32::MAX, f32::MIN), |(lo, hi), &r| (lo.min(r), hi.max(r)));
            // A flat surface still needs a non-empty range
            if max > min { (min, max) } else { (min, min + 1e-6) }
        }
    };

    let range = max - min;
    let pixels: Vec<u16> = radii
        .iter()
        .map(|&r| (((r - min) / range).clamp(0.0, 1.0) * 65535.0) as u16)
        .collect();
    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(width, height, pixels)
        .ok_or(DisplacementMapError::InvalidDimensions(width, height))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    tracing::debug!(path = %path.display(), width, height, min, max, "wrote displacement map");
    Ok((min, max))
}
