use std::path::Path;

use anyhow::Context;
use common::ImageUpload;

/// Reads an image from disk the way a browser file input would hand it over:
/// the bytes plus the bare file name.
pub fn read_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Image path {} has no file name", path.display()))?
        .to_string();

    Ok(ImageUpload { file_name, bytes })
}
