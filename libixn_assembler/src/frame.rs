use ndarray::Array2;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};

use super::error::FrameError;

/// A single 2-D plane, indexed `[row, column]`
pub type Frame = Array2<u16>;

/// Decode the first page of an image into a 16 bit frame. 8 bit planes are widened.
pub fn read_frame(path: &Path) -> Result<Frame, FrameError> {
    let unreadable = |e: tiff::TiffError| FrameError::Unreadable(path.to_path_buf(), e);

    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file)).map_err(unreadable)?;
    let (width, height) = decoder.dimensions().map_err(unreadable)?;
    let pixels: Vec<u16> = match decoder.read_image().map_err(unreadable)? {
        DecodingResult::U16(v) => v,
        DecodingResult::U8(v) => v.into_iter().map(u16::from).collect(),
        _ => return Err(FrameError::UnsupportedPixelType(path.to_path_buf())),
    };

    // Multi-sample images decode to more values than pixels
    Array2::from_shape_vec((height as usize, width as usize), pixels)
        .map_err(|_| FrameError::UnsupportedPixelType(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_read_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Plate_A01_s1_w1.tif");
        test_support::write_image(&path, 5, 3, 42, "Phase");
        let frame = read_frame(&path).unwrap();
        assert_eq!(frame.dim(), (3, 5));
        assert!(frame.iter().all(|v| *v == 42));
    }

    #[test]
    fn test_unreadable_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Plate_A01_s1_w1.tif");
        std::fs::write(&path, b"definitely not a tiff").unwrap();
        assert!(matches!(
            read_frame(&path),
            Err(FrameError::Unreadable(_, _))
        ));
    }

    #[test]
    fn test_missing_frame() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_frame(&dir.path().join("missing.tif")),
            Err(FrameError::IOError(_))
        ));
    }
}
