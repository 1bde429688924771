use super::*;
use crate::assets::store::PreparedImage;
use crate::render::pixmap::PixmapSurface;
use crate::render::recording::{RecordingSurface, SurfaceOp};

fn image(source: &str, w: u32, h: u32, rgba: [u8; 4]) -> ImageResource {
    ImageResource::new(source, PreparedImage::solid(w, h, rgba).unwrap()).unwrap()
}

#[test]
fn mask_rect_centers_container() {
    let r = mask_rect(Canvas::new(100, 80).unwrap(), Canvas::new(60, 40).unwrap());
    assert_eq!(r, Rect::new(20.0, 20.0, 80.0, 60.0));
    let same = Canvas::new(100, 80).unwrap();
    assert_eq!(mask_rect(same, same), same.rect());
}

#[test]
fn mask_is_drawn_once_in_copy_mode_and_state_restored() {
    let size = Canvas::new(100, 80).unwrap();
    let mut s = RecordingSurface::create(size).unwrap();
    render_mask(&mut s, &image("m.svg", 4, 4, [255; 4]), size).unwrap();

    let draws: Vec<_> = s.draws().cloned().collect();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].source, "m.svg");
    assert_eq!(draws[0].dest, size.rect());
    assert_eq!(draws[0].composite, CompositeMode::Copy);

    assert_eq!(s.save_depth(), 0);
    assert_eq!(s.composite(), CompositeMode::SourceOver);
    assert_eq!(s.ops().first(), Some(&SurfaceOp::Save));
    assert_eq!(s.ops().last(), Some(&SurfaceOp::Restore));
}

#[test]
fn repeated_mask_render_is_idempotent() {
    let size = Canvas::new(8, 4).unwrap();
    let mask = image("m", 2, 2, [255, 255, 255, 128]);
    let mut s = PixmapSurface::create(size).unwrap();
    render_mask(&mut s, &mask, size).unwrap();
    let once = s.pixels().to_vec();
    render_mask(&mut s, &mask, size).unwrap();
    assert_eq!(s.pixels(), once.as_slice());
    assert!(once[3] > 100 && once[3] < 160);
}
