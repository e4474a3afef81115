//! Animation tracks and the timeline that drives them.
//!
//! A transition animates through a [`TrackPair`]: a position track and a size
//! track, each with its own duration and [`TimingCurve`]. Tracks collect
//! mutation closures and completion callbacks, then start on a [`Timeline`],
//! which the host advances once per frame.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_morph::animation::{AnimationTrack, Easing, Timeline, TrackRole};
//! use horizon_morph::{Delta, Rect, SurfaceTree};
//!
//! let mut tree = SurfaceTree::new();
//! let card = tree.create("card", Rect::new(0.0, 0.0, 100.0, 100.0));
//! let mut timeline = Timeline::new();
//!
//! let duration = Duration::from_millis(100);
//! let mut track = AnimationTrack::eased(TrackRole::Position, duration, Easing::Linear);
//! track.add_mutations(move |tree| {
//!     let _ = tree.set_offset(card, Delta::new(50.0, 0.0));
//! });
//! track.start(&mut timeline, &mut tree)?;
//!
//! timeline.tick(&mut tree, Duration::from_millis(50));
//! assert_eq!(tree.presented_layer(card)?.offset, Delta::new(25.0, 0.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod curve;
mod easing;
mod pair;
mod spring;
mod timeline;
mod track;

pub use curve::TimingCurve;
pub use easing::Easing;
pub use pair::{PairIds, TrackPair};
pub use spring::Spring;
pub use timeline::{Timeline, TrackId};
pub use track::{AnimationTrack, Completion, Mutation, TrackPosition, TrackRole};
