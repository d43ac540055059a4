//! PNG sample loading and result export

use crate::io::error::{Result, SolverError};
use image::{ImageBuffer, Rgba};
use ndarray::{Array2, Array3};
use std::path::Path;

/// RGBA colour used as a tile value
pub type Color = [u8; 4];

/// Colour written for cells that did not resolve to a single tile
pub const UNRESOLVED_COLOR: Color = [0, 0, 0, 0];

/// Load a PNG as a grid of colours indexed `[y, x]`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_sample(path: &Path) -> Result<Array2<Color>> {
    let img = image::open(path).map_err(|e| SolverError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rgba_img = img.to_rgba8();

    let (width, height) = (rgba_img.width() as usize, rgba_img.height() as usize);
    let mut sample = Array2::from_elem((height, width), UNRESOLVED_COLOR);
    for (x, y, pixel) in rgba_img.enumerate_pixels() {
        if let Some(cell) = sample.get_mut((y as usize, x as usize)) {
            *cell = pixel.0;
        }
    }

    if sample.is_empty() {
        return Err(SolverError::InvalidSourceData {
            reason: format!("'{}' has no pixels", path.display()),
        });
    }
    Ok(sample)
}

/// Write layer `z` of a solved grid as a PNG, one pixel per cell
///
/// Unresolved cells are written fully transparent.
///
/// # Errors
///
/// Returns an error if:
/// - The layer does not exist
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_values_as_png(
    values: &Array3<Option<Color>>,
    z: usize,
    output_path: &Path,
) -> Result<()> {
    let (depth, height, width) = values.dim();
    if z >= depth {
        return Err(crate::io::error::invalid_parameter(
            "layer",
            &z,
            &format!("grid has {depth} layers"),
        ));
    }

    let mut img = ImageBuffer::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let color = values
                .get((z, y, x))
                .copied()
                .flatten()
                .unwrap_or(UNRESOLVED_COLOR);
            img.put_pixel(x as u32, y as u32, Rgba(color));
        }
    }

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SolverError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path).map_err(|e| SolverError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
