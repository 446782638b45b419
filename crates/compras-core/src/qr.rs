//! QR code decoding for photographed receipts.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::QrError;

/// Decode the first readable QR code in the image at `path`.
pub fn decode_url(path: impl AsRef<Path>) -> Result<String, QrError> {
    let path = path.as_ref();
    debug!("Decoding QR code from {}", path.display());
    let img = image::open(path)?;
    decode_image(&img)
}

/// Decode the first readable QR code in `img`.
pub fn decode_image(img: &DynamicImage) -> Result<String, QrError> {
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| luma.get_pixel(x as u32, y as u32).0[0],
    );

    let grids = prepared.detect_grids();
    debug!("Detected {} QR grids", grids.len());

    let mut last_error = None;
    for grid in grids {
        match grid.decode() {
            Ok((_, content)) => return Ok(content.trim().to_string()),
            Err(e) => last_error = Some(QrError::Decode(e.to_string())),
        }
    }

    Err(last_error.unwrap_or(QrError::NotFound))
}
