use super::*;
use crate::foundation::core::Point;

#[test]
fn restore_without_save_is_ignored() {
    let mut s = StateStack::default();
    s.translate(5.0, 0.0);
    s.restore();
    assert_eq!(s.current().transform, Affine::translate((5.0, 0.0)));
}

#[test]
fn save_restore_round_trips_transform_and_mode() {
    let mut s = StateStack::default();
    s.set_composite(CompositeMode::SourceAtop);
    s.save();
    s.translate(10.0, 0.0);
    s.scale(-1.0, 1.0);
    s.set_composite(CompositeMode::Copy);
    assert_eq!(s.depth(), 1);
    s.restore();
    assert_eq!(s.depth(), 0);
    assert_eq!(s.current().transform, Affine::IDENTITY);
    assert_eq!(s.current().composite, CompositeMode::SourceAtop);
}

#[test]
fn transforms_post_multiply_like_a_canvas() {
    // translate(w, 0) then scale(-1, 1) mirrors x in [0, w].
    let mut s = StateStack::default();
    s.translate(100.0, 0.0);
    s.scale(-1.0, 1.0);
    let p = s.current().transform * Point::new(10.0, 7.0);
    assert!((p.x - 90.0).abs() < 1e-9);
    assert!((p.y - 7.0).abs() < 1e-9);
}

#[test]
fn rotation_about_center_keeps_center_fixed() {
    let (w, h) = (200.0, 100.0);
    let mut s = StateStack::default();
    s.translate(w / 2.0, h / 2.0);
    s.rotate(std::f64::consts::FRAC_PI_2);
    s.translate(-w / 2.0, -h / 2.0);
    let c = s.current().transform * Point::new(w / 2.0, h / 2.0);
    assert!((c.x - w / 2.0).abs() < 1e-9);
    assert!((c.y - h / 2.0).abs() < 1e-9);
}
