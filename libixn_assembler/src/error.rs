use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilenameError {
    #[error("File name {0} does not follow the <name>_<well>_<position>_w<index> convention")]
    NonConforming(String),
    #[error("Stub {0:?} is not of the form <name>_<well>_<position>_w")]
    BadStub(String),
    #[error("Filename pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Metadata reader failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Metadata reader failed to decode TIFF: {0}")]
    TiffError(#[from] tiff::TiffError),
    #[error("Image {1:?} has no {0} tag")]
    MissingTag(&'static str, PathBuf),
    #[error("Image {0:?} carries no MetaSeries metadata block")]
    MissingBlock(PathBuf),
    #[error("Metadata key {0:?} is missing from the PlaneInfo of {1:?}")]
    MissingKey(String, PathBuf),
    #[error("Metadata block of {0:?} is not valid XML: {1}")]
    BadXml(PathBuf, String),
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Frame reader failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Image {0:?} could not be decoded: {1}")]
    Unreadable(PathBuf, tiff::TiffError),
    #[error("Image {0:?} is not an 8 or 16 bit greyscale image")]
    UnsupportedPixelType(PathBuf),
    #[error("Image {0:?} is {1}x{2} pixels; the experiment images are {3}x{4}")]
    ShapeMismatch(PathBuf, usize, usize, usize, usize),
}

#[derive(Debug, Error)]
pub enum StackWriterError {
    #[error("StackWriter failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("StackWriter failed to encode TIFF: {0}")]
    TiffError(#[from] tiff::TiffError),
    #[error("StackWriter failed to move the finished stack into place: {0}")]
    PersistError(#[from] tempfile::PersistError),
    #[error("StackWriter failed to serialize the image description: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("No TimePoint directories were found in {0:?}")]
    NoTimepointsFound(PathBuf),
    #[error("No images following the IXN naming convention were found in {0:?}")]
    NoImagesFound(PathBuf),
    #[error("Discovery failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Discovery failed due to metadata error: {0}")]
    MetadataError(#[from] MetadataError),
    #[error("Discovery failed due to filename error: {0}")]
    FilenameError(#[from] FilenameError),
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Well {0} is not part of the experiment")]
    UnknownWell(String),
    #[error("Position {0} is not part of the experiment")]
    UnknownPosition(String),
    #[error("Position loader failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Position loader failed due to frame error: {0}")]
    FrameError(#[from] FrameError),
}

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Assembler failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Assembler failed due to frame error: {0}")]
    FrameError(#[from] FrameError),
    #[error("Assembler failed due to StackWriter error: {0}")]
    StackWriterError(#[from] StackWriterError),
    #[error("Assembler was given a bad target: {0}")]
    FilenameError(#[from] FilenameError),
    #[error("Assembler failed to build a search pattern: {0}")]
    PatternError(#[from] glob::PatternError),
    #[error("Assembler failed while searching the experiment: {0}")]
    GlobError(#[from] glob::GlobError),
    #[error("Image {0:?} is not inside a directory ending in a timepoint number")]
    BadTimepointDirectory(PathBuf),
    #[error("Found {1} images for {0} but the experiment only has {2} timepoints")]
    TooManyFrames(String, usize, usize),
    #[error("No channel name was given for wavelength w{0}")]
    MissingChannelName(u32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No experiment directory has been selected")]
    NoExperiment,
    #[error("No well and position have been loaded")]
    NoSelection,
    #[error("The experiment directory {0} does not exist")]
    BadDataPath(PathBuf),
    #[error("Session failed due to Discovery error: {0}")]
    DiscoveryError(#[from] DiscoveryError),
    #[error("Session failed due to PositionLoader error: {0}")]
    LoaderError(#[from] LoaderError),
    #[error("Session failed due to Assembler error: {0}")]
    AssemblerError(#[from] AssemblerError),
}
