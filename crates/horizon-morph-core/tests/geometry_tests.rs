//! Coordinate mapping across realistic surface layouts.

use horizon_morph_core::{
    Delta, GeometryError, GeometryTranslator, LayerChannel, Point, Rect, SurfaceId, SurfaceTree,
    SurfaceTreeDebug, TreeFormatOptions, delta,
};

struct Screen {
    tree: SurfaceTree,
    window: SurfaceId,
    overlay: SurfaceId,
    scroll: SurfaceId,
    card: SurfaceId,
    thumbnail: SurfaceId,
}

/// window (0,0 375x812)
/// ├── scroll (0,88 375x724), scrolled down by 200
/// │   └── card (16,300 343x200)
/// │       └── thumbnail (12,12 80x80)
/// └── overlay (0,0 375x812)
fn screen() -> Screen {
    let mut tree = SurfaceTree::new();
    let window = tree.create("window", Rect::new(0.0, 0.0, 375.0, 812.0));
    let scroll = tree
        .create_child(window, "scroll", Rect::new(0.0, 88.0, 375.0, 724.0))
        .unwrap();
    tree.set_offset(scroll, Delta::new(0.0, -200.0)).unwrap();
    let card = tree
        .create_child(scroll, "card", Rect::new(16.0, 300.0, 343.0, 200.0))
        .unwrap();
    let thumbnail = tree
        .create_child(card, "thumbnail", Rect::new(12.0, 12.0, 80.0, 80.0))
        .unwrap();
    let overlay = tree
        .create_child(window, "overlay", Rect::new(0.0, 0.0, 375.0, 812.0))
        .unwrap();

    Screen {
        tree,
        window,
        overlay,
        scroll,
        card,
        thumbnail,
    }
}

#[test]
fn test_nested_hero_in_scrolled_content() {
    let s = screen();
    let translator = GeometryTranslator::new(&s.tree);

    let frame = translator.frame_in(s.thumbnail, s.overlay).unwrap();
    assert_eq!(frame, Rect::new(28.0, 200.0, 80.0, 80.0));

    let target = translator.frame_in(s.overlay, s.overlay).unwrap();
    assert_eq!(delta(frame, target), Delta::new(-28.0, -200.0));
}

#[test]
fn test_mapping_composes_through_intermediate_space() {
    let s = screen();
    let translator = GeometryTranslator::new(&s.tree);
    let point = Point::new(5.0, 7.0);

    let direct = translator.convert_point(point, s.thumbnail, s.overlay).unwrap();
    let via_card = translator.convert_point(point, s.thumbnail, s.card).unwrap();
    let composed = translator.convert_point(via_card, s.card, s.overlay).unwrap();
    assert!(direct.approx_eq(composed));

    let back = translator.convert_point(direct, s.overlay, s.thumbnail).unwrap();
    assert!(back.approx_eq(point));
}

#[test]
fn test_results_follow_the_current_layout() {
    let mut s = screen();
    let before = GeometryTranslator::new(&s.tree)
        .frame_in(s.card, s.window)
        .unwrap();

    s.tree.set_offset(s.scroll, Delta::new(0.0, -300.0)).unwrap();
    let after = GeometryTranslator::new(&s.tree)
        .frame_in(s.card, s.window)
        .unwrap();
    assert_eq!(after.origin.y, before.origin.y - 100.0);
    assert_eq!(after.size, before.size);
}

#[test]
fn test_presentation_overrides_are_ignored() {
    let mut s = screen();
    s.tree
        .set_presentation(s.card, LayerChannel::OffsetX, 50.0)
        .unwrap();

    let frame = GeometryTranslator::new(&s.tree)
        .frame_in(s.card, s.overlay)
        .unwrap();
    assert_eq!(frame, Rect::new(16.0, 188.0, 343.0, 200.0));
}

#[test]
fn test_detached_subtree_cannot_be_mapped_until_attached() {
    let mut s = screen();
    s.tree.detach(s.scroll).unwrap();

    let error = GeometryTranslator::new(&s.tree)
        .frame_in(s.thumbnail, s.overlay)
        .unwrap_err();
    assert_eq!(
        error,
        GeometryError::UndefinedCoordinateMapping {
            from: s.thumbnail,
            to: s.overlay
        }
    );

    s.tree.set_parent(s.scroll, Some(s.overlay)).unwrap();
    let frame = GeometryTranslator::new(&s.tree)
        .frame_in(s.thumbnail, s.window)
        .unwrap();
    assert_eq!(frame, Rect::new(28.0, 200.0, 80.0, 80.0));
}

#[test]
fn test_destroyed_surface_is_invalid() {
    let mut s = screen();
    s.tree.destroy(s.card).unwrap();

    let error = GeometryTranslator::new(&s.tree)
        .frame_in(s.thumbnail, s.overlay)
        .unwrap_err();
    assert!(matches!(error, GeometryError::InvalidSurface(id) if id == s.thumbnail));
}

#[test]
fn test_debug_dump_of_layout() {
    let s = screen();
    let dump = SurfaceTreeDebug::with_options(TreeFormatOptions::minimal())
        .format_subtree(&s.tree, s.window)
        .unwrap();

    let names: Vec<&str> = dump
        .lines()
        .map(|line| line.trim_start_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    assert_eq!(names, vec!["window", "scroll", "card", "thumbnail", "overlay"]);
}
