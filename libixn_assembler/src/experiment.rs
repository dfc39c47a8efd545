use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::constants::{METADATA_FILE_SUFFIX, TIMEPOINT_DIR_MARKER};
use super::error::DiscoveryError;
use super::filename::{is_thumbnail, wavelength_index, ImageName, NamePattern, PositionStub};
use super::metadata::{read_image_tags, read_plane_metadata};

/// Everything discovery learns about an experiment directory.
///
/// Built once per chosen root directory by [`ExperimentDescriptor::discover`] and
/// read-only afterwards. Selecting a new directory replaces it.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentDescriptor {
    root_directory: PathBuf,
    experiment_name: String,
    acquisition_date: String,
    wells: Vec<String>,
    positions: Vec<String>,
    wavelengths: Vec<String>,
    timepoint_directories: Vec<String>,
    channel_names: Vec<String>,
    image_width: u32,
    image_height: u32,
}

/// Names of the subdirectories of `root` that hold a timepoint, sorted
fn find_timepoint_dirs(root: &Path) -> Result<Vec<String>, DiscoveryError> {
    let mut timepoints = Vec::new();
    for item in root.read_dir()? {
        let item = item?;
        if !item.file_type()?.is_dir() {
            continue;
        }
        let name = item.file_name().to_string_lossy().to_string();
        if name.contains(TIMEPOINT_DIR_MARKER) {
            timepoints.push(name);
        }
    }
    timepoints.sort();
    Ok(timepoints)
}

/// Names of the non-thumbnail files directly inside `dir`, sorted so that the
/// representative file is the same on every filesystem.
pub(crate) fn list_image_names(dir: &Path) -> Result<Vec<String>, std::io::Error> {
    let mut names = Vec::new();
    for item in dir.read_dir()? {
        let item = item?;
        if !item.file_type()?.is_file() {
            continue;
        }
        let name = item.file_name().to_string_lossy().to_string();
        if !is_thumbnail(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

impl ExperimentDescriptor {
    /// Infer the structure of the experiment stored under `root`.
    ///
    /// As a side effect, writes `<date>_<wavelength>_metadata.txt` into `root` for
    /// every wavelength. Any unreadable file or missing tag aborts discovery.
    pub fn discover(root: &Path) -> Result<Self, DiscoveryError> {
        let timepoint_directories = find_timepoint_dirs(root)?;
        let first_dir = match timepoint_directories.first() {
            Some(tp) => root.join(tp),
            None => return Err(DiscoveryError::NoTimepointsFound(root.to_path_buf())),
        };

        let pattern = NamePattern::new()?;
        let mut images: Vec<(String, ImageName)> = Vec::new();
        for file_name in list_image_names(&first_dir)? {
            match pattern.parse(&file_name) {
                Ok(image) => images.push((file_name, image)),
                Err(e) => log::warn!("Rejecting {}: {e}", first_dir.join(&file_name).display()),
            }
        }

        let (representative_name, representative) = match images.first() {
            Some(first) => first,
            None => return Err(DiscoveryError::NoImagesFound(first_dir)),
        };
        let tags = read_image_tags(&first_dir.join(representative_name))?;
        let acquisition_date = tags.acquisition_date().to_string();
        let experiment_name = representative.experiment.clone();

        let mut wells = BTreeSet::new();
        let mut positions = BTreeSet::new();
        let mut wavelengths = BTreeSet::new();
        for (file_name, image) in images.iter() {
            if image.experiment != experiment_name {
                log::warn!(
                    "{file_name} names experiment {} but the experiment is {experiment_name}",
                    image.experiment
                );
            }
            wells.insert(image.well.clone());
            positions.insert(image.position.clone());
            wavelengths.insert(image.wavelength.clone());
        }
        let wavelengths: Vec<String> = wavelengths.into_iter().collect();

        let mut channel_names = Vec::with_capacity(wavelengths.len());
        for wavelength in wavelengths.iter() {
            // Every wavelength in the set came from at least one parsed image
            let Some((file_name, _)) = images.iter().find(|(_, image)| &image.wavelength == wavelength)
            else {
                continue;
            };
            let metadata = read_plane_metadata(&first_dir.join(file_name))?;
            channel_names.push(metadata.filter_cube()?);

            let summary_path =
                root.join(format!("{acquisition_date}_{wavelength}_{METADATA_FILE_SUFFIX}"));
            std::fs::write(&summary_path, metadata.summary()?)?;
            log::info!("Metadata file {} written", summary_path.display());
        }

        let descriptor = Self {
            root_directory: root.to_path_buf(),
            experiment_name,
            acquisition_date,
            wells: wells.into_iter().collect(),
            positions: positions.into_iter().collect(),
            wavelengths,
            timepoint_directories,
            channel_names,
            image_width: tags.width,
            image_height: tags.height,
        };
        log::info!(
            "Discovered experiment {} acquired {}: {} wells, {} positions, {} wavelengths, {} timepoints, {}x{} images",
            descriptor.experiment_name,
            descriptor.acquisition_date,
            descriptor.wells.len(),
            descriptor.positions.len(),
            descriptor.wavelengths.len(),
            descriptor.timepoint_directories.len(),
            descriptor.image_width,
            descriptor.image_height
        );
        Ok(descriptor)
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    pub fn acquisition_date(&self) -> &str {
        &self.acquisition_date
    }

    pub fn wells(&self) -> &[String] {
        &self.wells
    }

    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    pub fn wavelengths(&self) -> &[String] {
        &self.wavelengths
    }

    pub fn timepoint_directories(&self) -> &[String] {
        &self.timepoint_directories
    }

    /// Filter cube names parallel to [`Self::wavelengths`]
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn n_timepoints(&self) -> usize {
        self.timepoint_directories.len()
    }

    /// Directory of the (lexicographically) first timepoint
    pub fn first_timepoint_directory(&self) -> PathBuf {
        match self.timepoint_directories.first() {
            Some(tp) => self.root_directory.join(tp),
            None => self.root_directory.clone(),
        }
    }

    /// 1-based wavelength indices, in wavelength order
    pub fn wavelength_indices(&self) -> Vec<u32> {
        self.wavelengths
            .iter()
            .filter_map(|code| wavelength_index(code))
            .collect()
    }

    pub fn has_well(&self, well: &str) -> bool {
        self.wells.iter().any(|w| w == well)
    }

    pub fn has_position(&self, position: &str) -> bool {
        self.positions.iter().any(|p| p == position)
    }

    /// The stub shared by all wavelengths of a well/position
    pub fn stub(&self, well: &str, position: &str) -> PositionStub {
        PositionStub::new(&self.experiment_name, well, position)
    }
}
