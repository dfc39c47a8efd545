use ndarray::Array3;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tiff::encoder::{colortype::Gray16, TiffEncoder, TiffKind};
use tiff::tags::Tag;

use super::constants::BIG_TIFF_THRESHOLD_BYTES;
use super::error::StackWriterError;

/// Write one page per timepoint. The first page carries the stack shape so readers
/// which understand shaped descriptions recover the 3-D array.
fn write_pages<W: Write + Seek, K: TiffKind>(
    mut encoder: TiffEncoder<W, K>,
    stack: &Array3<u16>,
    description: &str,
) -> Result<(), StackWriterError> {
    let (_, height, width) = stack.dim();
    for (k, frame) in stack.outer_iter().enumerate() {
        let owned: Vec<u16>;
        let data = match frame.as_slice() {
            Some(slice) => slice,
            None => {
                owned = frame.iter().copied().collect();
                &owned
            }
        };
        let mut image = encoder.new_image::<Gray16>(width as u32, height as u32)?;
        if k == 0 {
            image.encoder().write_tag(Tag::ImageDescription, description)?;
        }
        image.write_data(data)?;
    }
    Ok(())
}

/// Write a `[timepoint, row, column]` stack as a single multi-page TIFF.
///
/// The stack is written to a temporary file next to `path` and renamed into place,
/// so `path` either holds a complete stack or does not exist.
pub fn write_stack(path: &Path, stack: &Array3<u16>) -> Result<(), StackWriterError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let (frames, height, width) = stack.dim();
    let description = serde_json::to_string(&serde_json::json!({
        "shape": [frames, height, width]
    }))?;
    let n_bytes = (stack.len() * std::mem::size_of::<u16>()) as u64;

    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        if n_bytes > BIG_TIFF_THRESHOLD_BYTES {
            log::info!(
                "Stack {} exceeds plain TIFF limits, writing BigTIFF",
                path.display()
            );
            write_pages(TiffEncoder::new_big(&mut writer)?, stack, &description)?;
        } else {
            write_pages(TiffEncoder::new(&mut writer)?, stack, &description)?;
        }
        writer.flush()?;
    }
    temp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use tiff::decoder::Decoder;

    #[test]
    fn test_write_stack_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.tif");
        let stack = Array3::from_shape_fn((3, 4, 5), |(t, r, c)| (t * 100 + r * 10 + c) as u16);
        write_stack(&path, &stack).unwrap();

        let (width, height, pages) = test_support::read_pages(&path);
        assert_eq!((width, height), (5, 4));
        assert_eq!(pages.len(), 3);
        for (t, page) in pages.iter().enumerate() {
            assert_eq!(page[0], (t * 100) as u16);
            assert_eq!(page[19], (t * 100 + 34) as u16);
        }

        let mut decoder = Decoder::new(std::fs::File::open(&path).unwrap()).unwrap();
        let description = decoder
            .find_tag(Tag::ImageDescription)
            .unwrap()
            .unwrap()
            .into_string()
            .unwrap();
        assert_eq!(description, r#"{"shape":[3,4,5]}"#);
    }

    #[test]
    fn test_no_temporary_files_left() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.tif");
        write_stack(&path, &Array3::zeros((1, 2, 2))).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
