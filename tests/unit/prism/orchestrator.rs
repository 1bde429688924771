use std::time::Duration;

use super::*;
use crate::animation::ease::Ease;
use crate::assets::loader::ImmediateLoader;
use crate::assets::provider::MemoryImageProvider;
use crate::assets::store::PreparedImage;
use crate::encode::sink::InMemorySink;
use crate::engine::config::{EngineConfig, MaskDescriptor};
use crate::render::recording::RecordingSurface;
use crate::timing::scheduler::FixedStepScheduler;

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn left_half_mask() -> PreparedImage {
    let mut px = Vec::new();
    for _ in 0..4 {
        for x in 0..4 {
            px.extend_from_slice(&[255, 255, 255, if x < 2 { 255 } else { 0 }]);
        }
    }
    PreparedImage::from_straight(4, 4, px).unwrap()
}

fn provider() -> MemoryImageProvider {
    MemoryImageProvider::new()
        .with("a", PreparedImage::solid(2, 2, RED).unwrap())
        .with("b", PreparedImage::solid(2, 2, GREEN).unwrap())
        .with("c", PreparedImage::solid(2, 2, BLUE).unwrap())
        .with("m.svg", left_half_mask())
}

fn loader() -> Box<dyn ResourceLoader> {
    Box::new(ImmediateLoader::new(provider()))
}

fn config() -> PrismConfig {
    PrismConfig {
        container: Canvas::new(8, 4).unwrap(),
        slides: vec!["a".into(), "b".into(), "c".into()],
        masks: vec![MaskDescriptor::new("m.svg")],
        duration_ms: 100.0,
        easing: Ease::Linear,
        base_layer: true,
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 3)
}

fn ready<S: Surface>() -> Prism<S> {
    let mut p = Prism::<S>::from_config(&config(), loader).unwrap();
    p.init().unwrap();
    assert!(p.wait_for_loads().unwrap().is_empty());
    p
}

#[test]
fn layers_must_agree() {
    assert!(Prism::<RecordingSurface>::new(Vec::new()).is_err());

    let a = EngineConfig::new(
        Canvas::new(8, 4).unwrap(),
        vec!["a".into()],
        Duration::from_millis(100),
    );
    let mut b = a.clone();
    b.container = Canvas::new(4, 4).unwrap();
    let err = Prism::<RecordingSurface>::new(vec![
        Engine::new(a, loader()).unwrap(),
        Engine::new(b, loader()).unwrap(),
    ])
    .err()
    .unwrap();
    assert!(err.to_string().contains("layer 1"));
}

#[test]
fn from_config_builds_layers_bottom_to_top() {
    let p = ready::<RecordingSurface>();
    assert_eq!(p.layers().len(), 2);
    assert!(p.layers()[0].mask_slot().is_none());
    assert!(p.layers()[1].mask_slot().is_some());
    assert!(p.is_ready());
    assert_eq!(p.slide_count(), 3);
    assert_eq!(p.container(), Canvas::new(8, 4).unwrap());
}

#[test]
fn go_to_is_broadcast_and_gated_on_bottom_layer() {
    let mut p = ready::<RecordingSurface>();
    assert!(p.go_to(2, 0.0));
    assert!(p.layers().iter().all(|l| l.is_animating()));
    assert!(p.layers().iter().all(|l| l.current_index() == 2));

    assert!(!p.go_to(1, 10.0));
    assert!(p.layers().iter().all(|l| l.current_index() == 2));
}

#[test]
fn tick_reports_combined_status() {
    let mut p = ready::<RecordingSurface>();
    assert_eq!(p.tick(0.0).unwrap(), TickStatus::Idle);
    assert!(p.go_to(1, 0.0));
    assert_eq!(p.tick(10.0).unwrap(), TickStatus::Animating);
    assert_eq!(p.tick(100.0).unwrap(), TickStatus::Finished);
    assert!(!p.is_animating());
    assert_eq!(p.current_index(), 1);
}

#[test]
fn run_transition_counts_frames() {
    let mut p = ready::<RecordingSurface>();
    assert!(p.go_to(1, 0.0));
    // 100 - 10 * 6 = 40 < 50
    let frames = p
        .run_transition(&mut FixedStepScheduler::new(0.0, 10.0).unwrap())
        .unwrap();
    assert_eq!(frames, 6);
    assert!(!p.is_animating());
}

#[test]
fn compose_before_init_is_state_error() {
    let p = Prism::<PixmapSurface>::from_config(&config(), loader).unwrap();
    assert!(matches!(p.compose_frame().unwrap_err(), PrismError::State(_)));
}

#[test]
fn masked_layer_composites_over_base() {
    let base = EngineConfig::new(
        Canvas::new(8, 4).unwrap(),
        vec!["a".into()],
        Duration::from_millis(100),
    );
    let top = EngineConfig {
        slides: vec!["c".into()],
        ..base.clone()
    }
    .with_mask(MaskDescriptor::new("m.svg"));
    let mut p = Prism::<PixmapSurface>::new(vec![
        Engine::new(base, loader()).unwrap(),
        Engine::new(top, loader()).unwrap(),
    ])
    .unwrap();
    p.init().unwrap();
    p.wait_for_loads().unwrap();

    let f = p.compose_frame().unwrap();
    assert!(f.premultiplied);
    assert!(close(f.pixel(1, 1).unwrap(), BLUE));
    assert!(close(f.pixel(6, 1).unwrap(), RED));
}

#[test]
fn render_transition_pushes_every_tick() {
    let mut p = ready::<PixmapSurface>();
    let mut sink = InMemorySink::new();
    let mut sched = FixedStepScheduler::new(0.0, 10.0).unwrap();
    let frames = p.render_transition(1, 100.0, &mut sched, &mut sink).unwrap();

    assert_eq!(frames, 6);
    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().width, 8);
    let indices: Vec<u64> = sink.frames.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, [0, 1, 2, 3, 4, 5]);

    let (_, last) = sink.frames.last().unwrap();
    assert_eq!(last, &p.compose_frame().unwrap());
    assert!(close(last.pixel(1, 1).unwrap(), GREEN));
    assert!(close(last.pixel(6, 1).unwrap(), GREEN));
}

#[test]
fn render_transition_to_current_slide_is_rejected() {
    let mut p = ready::<PixmapSurface>();
    let mut sink = InMemorySink::new();
    let mut sched = FixedStepScheduler::new(0.0, 10.0).unwrap();
    let err = p
        .render_transition(0, 100.0, &mut sched, &mut sink)
        .unwrap_err();
    assert!(matches!(err, PrismError::State(_)));
    assert!(sink.config().is_none());
}

#[test]
fn jump_to_moves_every_layer() {
    let mut p = ready::<PixmapSurface>();
    assert!(p.jump_to(2).unwrap());
    assert!(!p.is_animating());
    let f = p.compose_frame().unwrap();
    assert!(close(f.pixel(1, 1).unwrap(), BLUE));
    assert!(close(f.pixel(6, 1).unwrap(), BLUE));
}
