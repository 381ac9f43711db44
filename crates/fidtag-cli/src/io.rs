//! Image file loading and writing at the pipeline edges.

use std::path::Path;

use image::RgbImage;

/// Terminal pipeline failures. Both abort the run; neither is retried.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("could not load image from {path}: {source}")]
    Load {
        path: String,
        source: image::ImageError,
    },
    #[error("could not write annotated image to {path}: {source}")]
    Write {
        path: String,
        source: image::ImageError,
    },
}

/// Decode the input image into a color buffer.
pub fn load_color(path: &Path) -> Result<RgbImage, PipelineError> {
    let img = image::open(path).map_err(|source| PipelineError::Load {
        path: path.display().to_string(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Encode the annotated buffer to `path`, creating or overwriting the file.
///
/// The format follows the path extension. A failed write leaves the
/// destination in an unspecified state; there is no partial-write recovery.
pub fn save_color(img: &RgbImage, path: &Path) -> Result<(), PipelineError> {
    img.save(path).map_err(|source| PipelineError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_names_the_path() {
        let err = load_color(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }

    #[test]
    fn write_error_names_the_path() {
        let img = RgbImage::new(4, 4);
        let err = save_color(&img, Path::new("/definitely/not/a/dir/out.png")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/a/dir/out.png"));
    }
}
