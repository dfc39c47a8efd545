//! Synthetic IXN experiments for unit tests
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype::Gray16, TiffEncoder};
use tiff::tags::Tag;

pub const DATE_TIME: &str = "20231005 14:22:31.120";
pub const ACQUISITION_DATE: &str = "20231005";

/// The filter cube every wavelength reports in synthetic experiments
pub fn filter_cube_for(index: u32) -> &'static str {
    match index {
        1 => "Phase",
        2 => "FITC",
        3 => "TxRed",
        _ => "DAPI",
    }
}

pub fn metaseries_description(filter_cube: &str) -> String {
    format!(
        r#"<MetaData>
<prop id="Description" type="string" value="synthetic"/>
<PlaneInfo>
<prop id="spatial-calibration-x" type="float" value="0.6842"/>
<prop id="camera-binning-x" type="int" value="1"/>
<prop id="_MagNA_" type="float" value="0.45"/>
<prop id="_MagSetting_" type="string" value="20X Plan Fluor"/>
<prop id="Exposure Time" type="string" value="100 ms"/>
<prop id="_IllumSetting_" type="string" value="{filter_cube}"/>
<prop id="ImageXpress Micro Filter Cube" type="string" value="{filter_cube}"/>
<prop id="Lumencor Intensity" type="int" value="50"/>
</PlaneInfo>
</MetaData>"#
    )
}

/// Write a 16 bit IXN-style image filled with `fill`
pub fn write_image(path: &Path, width: u32, height: u32, fill: u16, filter_cube: &str) {
    let description = metaseries_description(filter_cube);
    let data = vec![fill; (width * height) as usize];
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(BufWriter::new(file)).unwrap();
    let mut image = encoder.new_image::<Gray16>(width, height).unwrap();
    image.encoder().write_tag(Tag::DateTime, DATE_TIME).unwrap();
    image
        .encoder()
        .write_tag(Tag::ImageDescription, description.as_str())
        .unwrap();
    image.write_data(&data).unwrap();
}

/// Write a 16 bit image with no DateTime and no MetaSeries block
pub fn write_plain_image(path: &Path, width: u32, height: u32) {
    let data = vec![0u16; (width * height) as usize];
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(BufWriter::new(file)).unwrap();
    encoder.write_image::<Gray16>(width, height, &data).unwrap();
}

/// Pixel value of the synthetic plane at a given timepoint and wavelength
pub fn fill_value(timepoint: u32, index: u32) -> u16 {
    (timepoint * 100 + index) as u16
}

/// Build `root/TimePoint_<t>/<stub><index>.tif` for every timepoint, stub and
/// wavelength, plus one thumbnail per stub and timepoint.
pub fn build_experiment(
    root: &Path,
    timepoints: &[u32],
    stubs: &[&str],
    n_wavelengths: u32,
    width: u32,
    height: u32,
) {
    for tp in timepoints {
        let tp_dir = root.join(format!("TimePoint_{tp}"));
        fs::create_dir_all(&tp_dir).unwrap();
        for stub in stubs {
            for index in 1..=n_wavelengths {
                write_image(
                    &tp_dir.join(format!("{stub}{index}.tif")),
                    width,
                    height,
                    fill_value(*tp, index),
                    filter_cube_for(index),
                );
            }
            write_image(
                &tp_dir.join(format!("{stub}1_Thumb.tif")),
                width / 2,
                height / 2,
                u16::MAX,
                filter_cube_for(1),
            );
        }
    }
}

/// Build `root/TimePoint_<t>/<stub><index><guid>.tif` the way MetaXpress names
/// files, with a hex GUID that starts with a digit after the wavelength index.
pub fn build_guid_experiment(
    root: &Path,
    timepoints: &[u32],
    stub: &str,
    n_wavelengths: u32,
    width: u32,
    height: u32,
) {
    for tp in timepoints {
        let tp_dir = root.join(format!("TimePoint_{tp}"));
        fs::create_dir_all(&tp_dir).unwrap();
        for index in 1..=n_wavelengths {
            write_image(
                &tp_dir.join(format!("{stub}{index}3E8F0A2C-{tp:04}-4B1D-9C{index}0.tif")),
                width,
                height,
                fill_value(*tp, index),
                filter_cube_for(index),
            );
        }
    }
}

/// Read every page of a stack: (width, height, pages)
pub fn read_pages(path: &Path) -> (u32, u32, Vec<Vec<u16>>) {
    let mut decoder = Decoder::new(File::open(path).unwrap()).unwrap();
    let (width, height) = decoder.dimensions().unwrap();
    let mut pages = Vec::new();
    loop {
        match decoder.read_image().unwrap() {
            DecodingResult::U16(v) => pages.push(v),
            _ => panic!("stack is not 16 bit"),
        }
        if !decoder.more_images() {
            break;
        }
        decoder.next_image().unwrap();
    }
    (width, height, pages)
}
