//! Horizon Morph - expand/collapse hero transitions.
//!
//! This is the main crate. It re-exports the core geometry and surface tree
//! and adds the transition engine on top:
//!
//! - [`animation`]: the position and size tracks and the frame timeline
//! - [`transition`]: the screen contract and the push/pop choreographer
//! - [`navigation`]: a navigation stack driving the choreographer
//! - [`config`]: track durations and curves, loadable from TOML
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use horizon_morph::animation::Timeline;
//! use horizon_morph::transition::{
//!     Animatable, Choreographer, RecordingContext, TransitionDirection,
//! };
//! use horizon_morph::{Delta, Rect, SurfaceId, SurfaceTree};
//!
//! struct Screen(SurfaceId, SurfaceId);
//!
//! impl Animatable for Screen {
//!     fn container(&self) -> Option<SurfaceId> {
//!         Some(self.0)
//!     }
//!     fn hero_element(&self) -> Option<SurfaceId> {
//!         Some(self.1)
//!     }
//! }
//!
//! let mut tree = SurfaceTree::new();
//! let overlay = tree.create("overlay", Rect::new(0.0, 0.0, 320.0, 568.0));
//! let list = tree.create_child(overlay, "list", Rect::new(0.0, 0.0, 320.0, 568.0))?;
//! let cell = tree.create_child(list, "cell", Rect::new(40.0, 120.0, 150.0, 150.0))?;
//! let detail = tree.create("detail", Rect::new(0.0, 0.0, 320.0, 568.0));
//! let photo = tree.create_child(detail, "photo", Rect::new(0.0, 0.0, 320.0, 320.0))?;
//!
//! let context = RecordingContext::new(
//!     overlay,
//!     TransitionDirection::Push,
//!     Some(Rc::new(Screen(list, cell))),
//!     Some(Rc::new(Screen(detail, photo))),
//! );
//! let handle = context.handle();
//!
//! let mut timeline = Timeline::new();
//! let choreographer = Choreographer::new(
//!     TransitionDirection::Push,
//!     Duration::from_millis(400),
//!     Duration::from_millis(200),
//! );
//! choreographer.run(Box::new(context), &mut tree, &mut timeline);
//!
//! while !handle.is_complete() {
//!     timeline.tick(&mut tree, Duration::from_millis(16));
//! }
//! assert_eq!(handle.outcome(), Some(true));
//! assert_eq!(tree.offset(detail)?, Delta::ZERO);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use horizon_morph_core::*;

pub mod animation;
pub mod config;
mod error;
pub mod navigation;
pub mod transition;

pub use config::TransitionConfig;
pub use error::{MorphError, MorphResult, ParticipantPart};
