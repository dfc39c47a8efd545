//! The IXN file naming convention.
//!
//! Every plane the instrument writes is named
//! `<experiment>_<well>_<position>_w<index><anything>`, for example
//! `Plate_A01_s1_w2B7C41D6A-1C5B-4F36-93D2-6A5D8F63D3E1.tif`. Thumbnails share the
//! same name with "thumb" somewhere in it and never count as data.
use regex::Regex;
use std::fmt::Display;

use super::constants::{STACK_EXTENSION, THUMBNAIL_MARKER};
use super::error::FilenameError;

const IMAGE_NAME_RE: &str =
    r"^(?P<name>[^_]+)_(?P<well>[^_]+)_(?P<position>[^_]+)_(?P<wavelength>w(?P<index>\d))";

/// Check whether a file name denotes a thumbnail (case-insensitive)
pub fn is_thumbnail(file_name: &str) -> bool {
    file_name.to_lowercase().contains(THUMBNAIL_MARKER)
}

/// The fields encoded in a conforming image file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    pub experiment: String,
    pub well: String,
    pub position: String,
    /// Two character code, e.g. `w1`
    pub wavelength: String,
    /// 1-based wavelength index
    pub index: u32,
}

impl ImageName {
    pub fn stub(&self) -> PositionStub {
        PositionStub::new(&self.experiment, &self.well, &self.position)
    }
}

/// The compiled naming convention. Build it once and parse every listing with it.
#[derive(Debug, Clone)]
pub struct NamePattern {
    re: Regex,
}

impl NamePattern {
    pub fn new() -> Result<Self, FilenameError> {
        Ok(Self {
            re: Regex::new(IMAGE_NAME_RE)?,
        })
    }

    /// Parse a file name, rejecting anything that does not follow the convention
    pub fn parse(&self, file_name: &str) -> Result<ImageName, FilenameError> {
        let cap = self
            .re
            .captures(file_name)
            .ok_or_else(|| FilenameError::NonConforming(file_name.to_string()))?;
        let index = cap["index"]
            .parse()
            .map_err(|_| FilenameError::NonConforming(file_name.to_string()))?;
        Ok(ImageName {
            experiment: cap["name"].to_string(),
            well: cap["well"].to_string(),
            position: cap["position"].to_string(),
            wavelength: cap["wavelength"].to_string(),
            index,
        })
    }
}

/// Parse the 1-based index out of a wavelength code like `w3`
pub fn wavelength_index(code: &str) -> Option<u32> {
    code.strip_prefix('w')?.parse().ok()
}

/// `<experiment>_<well>_<position>_w`, the name prefix shared by every wavelength
/// of one well/position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionStub(String);

impl PositionStub {
    pub fn new(experiment: &str, well: &str, position: &str) -> Self {
        Self(format!("{experiment}_{well}_{position}_w"))
    }

    /// Validate a stub typed or edited by the operator
    pub fn parse(text: &str) -> Result<Self, FilenameError> {
        let text = text.trim();
        match text.strip_suffix("_w") {
            Some(head) if head.split('_').count() == 3 && !head.split('_').any(str::is_empty) => {
                Ok(Self(text.to_string()))
            }
            _ => Err(FilenameError::BadStub(text.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The well and position parts of the stub
    pub fn well_and_position(&self) -> Option<(&str, &str)> {
        let mut parts = self.0.strip_suffix("_w")?.split('_').skip(1);
        Some((parts.next()?, parts.next()?))
    }

    /// Does `file_name` belong to wavelength `index` of this stub?
    ///
    /// Anything may follow the index, including the hex GUID MetaXpress appends.
    pub fn matches(&self, file_name: &str, index: u32) -> bool {
        file_name.starts_with(&format!("{}{}", self.0, index))
    }

    /// Name of the assembled stack: `<date>_<experiment>_<well>_<position>_<channel>.tif`
    pub fn output_file_name(&self, date: &str, channel_name: &str) -> String {
        let head = &self.0[..self.0.len() - 1];
        format!("{date}_{head}{channel_name}.{STACK_EXTENSION}")
    }
}

impl Display for PositionStub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
