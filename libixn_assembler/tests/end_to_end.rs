use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use libixn_assembler::frame::Frame;
use libixn_assembler::position_loader::PreviewSink;
use libixn_assembler::session::Session;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype::Gray16, TiffEncoder};
use tiff::tags::Tag;

const SIZE: u32 = 2048;

#[derive(Default)]
struct Layers {
    names: Vec<(String, bool)>,
}

impl PreviewSink for Layers {
    fn clear(&mut self) {
        self.names.clear();
    }

    fn add_image(&mut self, name: &str, image: Frame, visible: bool) {
        assert_eq!(image.dim(), (SIZE as usize, SIZE as usize));
        self.names.push((name.to_string(), visible));
    }
}

fn write_plane(path: &Path, size: u32, fill: u16, filter_cube: &str) {
    let description = format!(
        r#"<MetaData><PlaneInfo>
<prop id="spatial-calibration-x" type="float" value="0.6842"/>
<prop id="camera-binning-x" type="int" value="1"/>
<prop id="_MagNA_" type="float" value="0.45"/>
<prop id="_MagSetting_" type="string" value="20X Plan Fluor"/>
<prop id="Exposure Time" type="string" value="100 ms"/>
<prop id="_IllumSetting_" type="string" value="{filter_cube}"/>
<prop id="ImageXpress Micro Filter Cube" type="string" value="{filter_cube}"/>
<prop id="Lumencor Intensity" type="int" value="50"/>
</PlaneInfo></MetaData>"#
    );
    let data = vec![fill; (size * size) as usize];
    let mut encoder = TiffEncoder::new(BufWriter::new(File::create(path).unwrap())).unwrap();
    let mut image = encoder.new_image::<Gray16>(size, size).unwrap();
    image
        .encoder()
        .write_tag(Tag::DateTime, "20240117 09:00:00.000")
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::ImageDescription, description.as_str())
        .unwrap();
    image.write_data(&data).unwrap();
}

fn first_pixels(path: &Path) -> (u32, u32, Vec<u16>) {
    let mut decoder = Decoder::new(File::open(path).unwrap()).unwrap();
    let (width, height) = decoder.dimensions().unwrap();
    let mut firsts = Vec::new();
    loop {
        match decoder.read_image().unwrap() {
            DecodingResult::U16(v) => firsts.push(v[0]),
            _ => panic!("expected 16 bit pages"),
        }
        if !decoder.more_images() {
            break;
        }
        decoder.next_image().unwrap();
    }
    (width, height, firsts)
}

#[test]
fn test_two_timepoint_experiment() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("exp");
    for tp in 1..=2u16 {
        let tp_dir = root.join(format!("TimePoint_{tp}"));
        fs::create_dir_all(&tp_dir).unwrap();
        write_plane(&tp_dir.join("Plate_A01_s1_w1.TIF"), SIZE, tp * 10 + 1, "Phase");
        write_plane(&tp_dir.join("Plate_A01_s1_w2.TIF"), SIZE, tp * 10 + 2, "FITC");
        write_plane(&tp_dir.join("Plate_A01_s1_w1_thumb.TIF"), 64, u16::MAX, "Phase");
    }

    let mut session = Session::new();
    let descriptor = session.select_directory(&root).unwrap();
    assert_eq!(descriptor.experiment_name(), "Plate");
    assert_eq!(descriptor.acquisition_date(), "20240117");
    assert_eq!(descriptor.wells(), &["A01"]);
    assert_eq!(descriptor.positions(), &["s1"]);
    assert_eq!(descriptor.wavelengths(), &["w1", "w2"]);
    assert_eq!(descriptor.timepoint_directories(), &["TimePoint_1", "TimePoint_2"]);
    assert_eq!((descriptor.image_width(), descriptor.image_height()), (SIZE, SIZE));
    assert!(root.join("20240117_w2_metadata.txt").exists());

    let mut layers = Layers::default();
    session.load_position("A01", "s1", &mut layers).unwrap();
    assert_eq!(
        layers.names,
        vec![
            (String::from("Plate_A01_s1_w1"), true),
            (String::from("Plate_A01_s1_w2"), false)
        ]
    );

    session.add_to_write_list().unwrap();
    session.channel_names_mut().slots_mut()[1] = String::from("gfp");
    assert_eq!(session.write_list().targets(), vec!["Plate_A01_s1_w"]);

    let mut last_percent = 0;
    let report = session
        .write_all(|status| last_percent = status.percent())
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.n_written(), 2);
    assert_eq!(last_percent, 100);

    let phase = root.join("20240117_Plate_A01_s1_phs.tif");
    let gfp = root.join("20240117_Plate_A01_s1_gfp.tif");
    assert_eq!(first_pixels(&phase), (SIZE, SIZE, vec![11, 21]));
    assert_eq!(first_pixels(&gfp), (SIZE, SIZE, vec![12, 22]));

    let rerun = session.write_all(|_| {}).unwrap();
    assert_eq!(rerun.n_written(), 0);
    assert_eq!(rerun.n_skipped(), 2);
}
