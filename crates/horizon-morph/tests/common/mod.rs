//! Shared fixtures for the transition integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use horizon_morph::animation::AnimationTrack;
use horizon_morph::transition::Animatable;
use horizon_morph::{Point, Rect, SurfaceId, SurfaceTree};
use tracing_subscriber::EnvFilter;

/// One frame at 62.5 fps.
pub const FRAME: Duration = Duration::from_millis(16);

pub type Log = Rc<RefCell<Vec<String>>>;

/// Route engine logs to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("horizon_morph=trace,horizon_morph_core=debug"))
        .with_test_writer()
        .try_init();
}

/// A screen that records every hook call.
pub struct TestScreen {
    pub name: &'static str,
    pub container: Option<SurfaceId>,
    pub hero: Option<SurfaceId>,
    pub log: Log,
}

impl TestScreen {
    pub fn new(name: &'static str, container: SurfaceId, hero: SurfaceId, log: &Log) -> Self {
        Self {
            name,
            container: Some(container),
            hero: Some(hero),
            log: log.clone(),
        }
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(format!("{}: {entry}", self.name));
    }
}

impl Animatable for TestScreen {
    fn container(&self) -> Option<SurfaceId> {
        self.container
    }

    fn hero_element(&self) -> Option<SurfaceId> {
        self.hero
    }

    fn label(&self) -> &str {
        self.name
    }

    fn on_will_present(
        &self,
        _size: &mut AnimationTrack,
        _position: &mut AnimationTrack,
        _from: Rect,
        _to: Rect,
    ) {
        self.record("will present".into());
    }

    fn on_will_dismiss(
        &self,
        _size: &mut AnimationTrack,
        _position: &mut AnimationTrack,
        _from: Rect,
        _to: Rect,
    ) {
        self.record("will dismiss".into());
    }

    fn on_positioning(&self, _position: &mut AnimationTrack, from: Point, to: Point) {
        self.record(format!("positioning ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y));
    }

    fn on_resizing(&self, _size: &mut AnimationTrack, _from: Rect, to: Rect) {
        self.record(format!("resizing -> {}x{}", to.width(), to.height()));
    }

    fn on_transition_complete(&self, _tree: &mut SurfaceTree, completed: bool) {
        self.record(format!("complete {completed}"));
    }
}

/// The list/detail layout used throughout the tests.
///
/// ```text
/// overlay (0,0 320x568)
/// └── list (0,0 320x568)
///     ├── header (0,0 320x100)
///     ├── cell (40,120 150x150)
///     └── footer (0,400 320x100)
/// detail (0,0 320x568), not attached
/// └── photo (0,0 320x320)
/// ```
pub struct Layout {
    pub tree: SurfaceTree,
    pub overlay: SurfaceId,
    pub list: SurfaceId,
    pub cell: SurfaceId,
    pub detail: SurfaceId,
    pub photo: SurfaceId,
    pub log: Log,
}

impl Layout {
    pub fn new() -> Self {
        let mut tree = SurfaceTree::new();
        let overlay = tree.create("overlay", Rect::new(0.0, 0.0, 320.0, 568.0));
        let list = tree
            .create_child(overlay, "list", Rect::new(0.0, 0.0, 320.0, 568.0))
            .unwrap();
        tree.create_child(list, "header", Rect::new(0.0, 0.0, 320.0, 100.0))
            .unwrap();
        let cell = tree
            .create_child(list, "cell", Rect::new(40.0, 120.0, 150.0, 150.0))
            .unwrap();
        tree.create_child(list, "footer", Rect::new(0.0, 400.0, 320.0, 100.0))
            .unwrap();
        let detail = tree.create("detail", Rect::new(0.0, 0.0, 320.0, 568.0));
        let photo = tree
            .create_child(detail, "photo", Rect::new(0.0, 0.0, 320.0, 320.0))
            .unwrap();

        Self {
            tree,
            overlay,
            list,
            cell,
            detail,
            photo,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn list_screen(&self) -> Rc<dyn Animatable> {
        Rc::new(TestScreen::new("list", self.list, self.cell, &self.log))
    }

    pub fn detail_screen(&self) -> Rc<dyn Animatable> {
        Rc::new(TestScreen::new("detail", self.detail, self.photo, &self.log))
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}
