use common::Buffer2;
use common::test_utils::test_output_path;

use super::*;
use crate::config::{Connectivity, SameComponentPolicy};
use crate::graph::{GridContext, build_grid_edges};
use crate::segment::ChannelSegmenter;

/// Columns 0-1 dark, column 2 bright, column 3 dark again (not adjacent).
fn striped_labels() -> LabelMap {
    let channel = Buffer2::from_fn(4, 3, |_, col| if col == 2 { 250u8 } else { 5 });
    ChannelSegmenter::new(1.0, SameComponentPolicy::Skip)
        .unwrap()
        .segment(
            GridContext::new(4, 3),
            build_grid_edges(&channel, Connectivity::Eight),
        )
        .unwrap()
}

#[test]
fn test_format_report() {
    assert_eq!(format_report(&[]), "0\n");
    assert_eq!(format_report(&[3, 1]), "2\n3\n1\n");
}

#[test]
fn test_write_report_roundtrip_text() {
    let path = test_output_path("output_report.txt");
    write_report(&path, &[40, 12, 12, 1]).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, ["4", "40", "12", "12", "1"]);
}

#[test]
fn test_write_report_missing_directory() {
    let path = test_output_path("missing_dir/report.txt");
    assert!(matches!(
        write_report(&path, &[1]),
        Err(Error::WriteReport { .. })
    ));
}

#[test]
fn test_fixed_palette_cycles() {
    let colors = label_colors(8, Palette::Fixed);
    assert_eq!(colors.len(), 8);
    assert_eq!(colors[0], Rgb::new(255, 0, 0));
    assert_eq!(colors[5], Rgb::new(0, 255, 255));
    assert_eq!(colors[6], colors[0]);
    assert_eq!(colors[7], colors[1]);
}

#[test]
fn test_random_palette_is_seeded() {
    let a = label_colors(50, Palette::Random { seed: 11 });
    let b = label_colors(50, Palette::Random { seed: 11 });
    let c = label_colors(50, Palette::Random { seed: 12 });
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_render_labels_colors_by_label() {
    let labels = striped_labels();
    assert_eq!(labels.num_labels(), 3);

    let rendered = render_labels(&labels, Palette::Fixed);
    assert_eq!(rendered.dimensions(), (4, 3));
    for y in 0..3 {
        assert_eq!(rendered.get_pixel(0, y).0, [255, 0, 0]);
        assert_eq!(rendered.get_pixel(1, y).0, [255, 0, 0]);
        assert_eq!(rendered.get_pixel(2, y).0, [0, 255, 0]);
        assert_eq!(rendered.get_pixel(3, y).0, [0, 0, 255]);
    }
}

#[test]
fn test_save_visualization_png() {
    let labels = striped_labels();
    let path = test_output_path("output_visualization.png");
    save_visualization(&path, &labels, Palette::Fixed).unwrap();

    let loaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(loaded, render_labels(&labels, Palette::Fixed));
}

#[test]
fn test_save_visualization_unknown_extension() {
    let labels = striped_labels();
    let path = test_output_path("output_visualization.unknown");
    assert!(matches!(
        save_visualization(&path, &labels, Palette::Fixed),
        Err(Error::ImageSave { .. })
    ));
}
