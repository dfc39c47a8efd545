//! Reading acquisition metadata embedded in IXN images.
//!
//! MetaXpress stores the acquisition settings of every plane as a MetaSeries XML
//! block in the TIFF `ImageDescription` tag:
//!
//! ```text
//! <MetaData>
//! <prop id="Description" type="string" value="..."/>
//! <PlaneInfo>
//! <prop id="spatial-calibration-x" type="float" value="0.6842"/>
//! <prop id="ImageXpress Micro Filter Cube" type="string" value="FITC"/>
//! ...
//! </PlaneInfo>
//! <SetInfo>...</SetInfo>
//! </MetaData>
//! ```
//!
//! Only the `PlaneInfo` properties are kept.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tiff::decoder::Decoder;
use tiff::tags::Tag;

use super::constants::{FILTER_CUBE_KEY, METADATA_KEYS};
use super::error::MetadataError;

#[derive(Debug, Deserialize)]
struct MetaDataXml {
    #[serde(rename = "PlaneInfo")]
    plane_info: Option<PropGroupXml>,
}

#[derive(Debug, Deserialize)]
struct PropGroupXml {
    #[serde(rename = "prop", default)]
    props: Vec<PropXml>,
}

#[derive(Debug, Deserialize)]
struct PropXml {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@value", default)]
    value: String,
}

/// A typed MetaSeries property value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl MetaValue {
    /// Convert the raw attribute text using the declared MetaSeries type.
    /// Values that do not parse as their declared type stay text.
    fn from_prop(kind: &str, raw: &str) -> Self {
        let parsed = match kind {
            "int" => raw.trim().parse().ok().map(Self::Int),
            "float" => raw.trim().parse().ok().map(Self::Float),
            "bool" => match raw.trim().to_lowercase().as_str() {
                "on" | "true" | "1" => Some(Self::Bool(true)),
                "off" | "false" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Text(raw.to_string()))
    }
}

impl Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // Whole numbers keep their decimal point, e.g. 1.0
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// The PlaneInfo properties of one image
#[derive(Debug, Clone, Serialize)]
pub struct PlaneMetadata {
    #[serde(skip)]
    source: PathBuf,
    values: BTreeMap<String, MetaValue>,
}

impl PlaneMetadata {
    /// Parse the content of an `ImageDescription` tag. `source` is only used for error reporting.
    pub fn from_description(description: &str, source: &Path) -> Result<Self, MetadataError> {
        if !description.trim_start().starts_with("<MetaData") {
            return Err(MetadataError::MissingBlock(source.to_path_buf()));
        }
        let xml: MetaDataXml = quick_xml::de::from_str(description)
            .map_err(|e| MetadataError::BadXml(source.to_path_buf(), e.to_string()))?;
        let plane_info = xml
            .plane_info
            .ok_or_else(|| MetadataError::MissingBlock(source.to_path_buf()))?;

        let values = plane_info
            .props
            .into_iter()
            .map(|prop| {
                let value = MetaValue::from_prop(&prop.kind, &prop.value);
                (prop.id, value)
            })
            .collect();

        Ok(Self {
            source: source.to_path_buf(),
            values,
        })
    }

    /// Look up a PlaneInfo key
    pub fn get(&self, key: &str) -> Result<&MetaValue, MetadataError> {
        self.values
            .get(key)
            .ok_or_else(|| MetadataError::MissingKey(key.to_string(), self.source.clone()))
    }

    /// The optical filter configuration, used as the channel name of the wavelength
    pub fn filter_cube(&self) -> Result<String, MetadataError> {
        Ok(self.get(FILTER_CUBE_KEY)?.to_string())
    }

    /// The fixed set of acquisition keys, in summary file order
    pub fn relevant(&self) -> Result<Vec<(&'static str, &MetaValue)>, MetadataError> {
        METADATA_KEYS
            .iter()
            .map(|key| Ok((*key, self.get(key)?)))
            .collect()
    }

    /// Render the `key:value` lines of the per-wavelength summary file
    pub fn summary(&self) -> Result<String, MetadataError> {
        let mut text = String::new();
        for (key, value) in self.relevant()? {
            text.push_str(&format!("{key}:{value}\n"));
        }
        Ok(text)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// The baseline TIFF tags discovery needs from a representative image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTags {
    pub date_time: String,
    pub width: u32,
    pub height: u32,
}

impl ImageTags {
    /// Calendar date part of `DateTime`, i.e. everything before the first space
    pub fn acquisition_date(&self) -> &str {
        self.date_time
            .split(' ')
            .next()
            .unwrap_or(self.date_time.as_str())
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, MetadataError> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

fn read_ascii_tag(
    decoder: &mut Decoder<BufReader<File>>,
    tag: Tag,
    tag_name: &'static str,
    path: &Path,
) -> Result<String, MetadataError> {
    match decoder.find_tag(tag)? {
        Some(value) => Ok(value.into_string()?),
        None => Err(MetadataError::MissingTag(tag_name, path.to_path_buf())),
    }
}

/// Read `DateTime`, `ImageWidth` and `ImageLength` from the first page of an image
pub fn read_image_tags(path: &Path) -> Result<ImageTags, MetadataError> {
    let mut decoder = open_decoder(path)?;
    let date_time = read_ascii_tag(&mut decoder, Tag::DateTime, "DateTime", path)?;
    let width = decoder
        .find_tag(Tag::ImageWidth)?
        .ok_or_else(|| MetadataError::MissingTag("ImageWidth", path.to_path_buf()))?
        .into_u32()?;
    let height = decoder
        .find_tag(Tag::ImageLength)?
        .ok_or_else(|| MetadataError::MissingTag("ImageLength", path.to_path_buf()))?
        .into_u32()?;
    Ok(ImageTags {
        date_time: date_time.trim().to_string(),
        width,
        height,
    })
}

/// Read the PlaneInfo metadata embedded in an image
pub fn read_plane_metadata(path: &Path) -> Result<PlaneMetadata, MetadataError> {
    let mut decoder = open_decoder(path)?;
    let description = match decoder.find_tag(Tag::ImageDescription)? {
        Some(value) => value.into_string()?,
        None => return Err(MetadataError::MissingBlock(path.to_path_buf())),
    };
    PlaneMetadata::from_description(&description, path)
}
