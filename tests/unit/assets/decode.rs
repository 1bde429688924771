use std::io::Cursor;

use super::*;

const TRIANGLE_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
<rect x="0" y="0" width="5" height="10" fill="#ffffff"/>
</svg>"##;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn parse_svg_ok_and_err() {
    let ok = br##"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"##;
    parse_svg(ok).unwrap();
    assert!(parse_svg(br##"<svg"##).is_err());
}

#[test]
fn rasterize_svg_intrinsic_size() {
    let tree = parse_svg(TRIANGLE_SVG).unwrap();
    let img = rasterize_svg(&tree, None).unwrap();
    assert_eq!((img.width, img.height), (10, 10));
    assert_eq!(img.pixel(1, 5).unwrap()[3], 255);
    assert_eq!(img.pixel(8, 5).unwrap()[3], 0);
}

#[test]
fn rasterize_svg_stretches_to_requested_size() {
    let tree = parse_svg(TRIANGLE_SVG).unwrap();
    let img = rasterize_svg(&tree, Some(Canvas::new(40, 20).unwrap())).unwrap();
    assert_eq!((img.width, img.height), (40, 20));
    assert_eq!(img.pixel(5, 10).unwrap()[3], 255);
    assert_eq!(img.pixel(35, 10).unwrap()[3], 0);
}

#[test]
fn svg_sources_are_detected_by_extension() {
    assert!(is_svg_source("img/masks/prism-a.svg"));
    assert!(is_svg_source("A.SVG"));
    assert!(!is_svg_source("img/bird-a.jpg"));
    assert!(!is_svg_source("svg"));
}
