//! JPEG conversion helpers.
//!
//! The gallery serves a single format, so uploads and the `/convert` batch
//! command funnel everything through a JPEG re-encode. Format detection works
//! on the magic bytes, not the file name.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, ImageOutputFormat};

const JPEG_QUALITY: u8 = 90;

/// True if the data already is a JPEG file
pub fn is_jpeg(data: &[u8]) -> bool {
    matches!(image::guess_format(data), Ok(ImageFormat::Jpeg))
}

/// Re-encode arbitrary image data as JPEG
pub fn reencode_to_jpeg(data: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(data).context("could not decode image data")?;
    let mut out = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .context("could not encode JPEG")?;
    Ok(out)
}

/// Move the downloaded scratch file to its final local name, re-encoding to
/// JPEG first when the source is another format.
pub fn finalize_local_file(source: &Path, target: &Path) -> Result<()> {
    let data = std::fs::read(source)
        .with_context(|| format!("could not read {}", source.display()))?;
    if is_jpeg(&data) {
        std::fs::rename(source, target)
            .with_context(|| format!("could not rename to {}", target.display()))?;
    } else {
        let jpeg = reencode_to_jpeg(&data)?;
        std::fs::write(target, jpeg)
            .with_context(|| format!("could not write {}", target.display()))?;
        std::fs::remove_file(source)
            .with_context(|| format!("could not remove {}", source.display()))?;
    }
    Ok(())
}
