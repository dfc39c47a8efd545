use std::path::PathBuf;

use super::error::LoaderError;
use super::experiment::{list_image_names, ExperimentDescriptor};
use super::filename::PositionStub;
use super::frame::{read_frame, Frame};

/// Whatever displays the preview of a loaded position (a viewer, a GUI panel, ...)
pub trait PreviewSink {
    /// Remove every previously added image
    fn clear(&mut self);
    /// Add a named image. Only the first image of a position is visible.
    fn add_image(&mut self, name: &str, image: Frame, visible: bool);
}

/// The record of a preview load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPosition {
    pub well: String,
    pub position: String,
    pub stub: PositionStub,
    /// Files loaded into the preview, in wavelength order
    pub current_names: Vec<PathBuf>,
}

/// Load the first-timepoint images of a well/position into `sink`, one per wavelength.
///
/// Wavelength 1 is conventionally phase contrast, so the first loaded image is
/// shown and the rest are hidden.
pub fn load_position<S: PreviewSink + ?Sized>(
    descriptor: &ExperimentDescriptor,
    well: &str,
    position: &str,
    sink: &mut S,
) -> Result<LoadedPosition, LoaderError> {
    if !descriptor.has_well(well) {
        return Err(LoaderError::UnknownWell(well.to_string()));
    }
    if !descriptor.has_position(position) {
        return Err(LoaderError::UnknownPosition(position.to_string()));
    }

    let stub = descriptor.stub(well, position);
    let first_dir = descriptor.first_timepoint_directory();
    let file_names = list_image_names(&first_dir)?;

    sink.clear();
    let mut current_names = Vec::new();
    for index in descriptor.wavelength_indices() {
        for file_name in file_names.iter().filter(|name| stub.matches(name, index)) {
            let path = first_dir.join(file_name);
            let image = read_frame(&path)?;
            sink.add_image(&format!("{stub}{index}"), image, current_names.is_empty());
            current_names.push(path);
        }
    }

    if current_names.is_empty() {
        log::warn!("No images found for {stub} in {}", first_dir.display());
    }

    Ok(LoadedPosition {
        well: well.to_string(),
        position: position.to_string(),
        stub,
        current_names,
    })
}
