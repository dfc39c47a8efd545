/// Substring identifying a timepoint directory in an experiment root
pub const TIMEPOINT_DIR_MARKER: &str = "TimePoint";
/// Substring (compared case-insensitively) marking thumbnail images
pub const THUMBNAIL_MARKER: &str = "thumb";

/// Number of channel-name slots offered to the operator
pub const MAX_CHANNELS: usize = 4;
/// Slot 1 is always the phase/brightfield channel
pub const DEFAULT_PHASE_NAME: &str = "phs";

/// MetaSeries key holding the optical filter configuration of a plane
pub const FILTER_CUBE_KEY: &str = "ImageXpress Micro Filter Cube";

/// PlaneInfo keys copied into the per-wavelength metadata summary, in file order
pub const METADATA_KEYS: [&str; 8] = [
    "spatial-calibration-x",
    "camera-binning-x",
    "_MagNA_",
    "_MagSetting_",
    "Exposure Time",
    "_IllumSetting_",
    FILTER_CUBE_KEY,
    "Lumencor Intensity",
];

/// Suffix of the per-wavelength metadata summary written into the root
pub const METADATA_FILE_SUFFIX: &str = "metadata.txt";
/// Extension of assembled stacks
pub const STACK_EXTENSION: &str = "tif";

// Plain TIFF offsets are 32 bit; leave headroom for the directories
pub const BIG_TIFF_THRESHOLD_BYTES: u64 = 0xF000_0000;
