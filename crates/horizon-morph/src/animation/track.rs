//! Animation tracks.
//!
//! A track is one interpolation run with its own duration and timing curve.
//! Before it starts, any number of mutation closures and completion callbacks
//! can be registered on it; starting hands them to a [`Timeline`].

use std::fmt;
use std::time::Duration;

use horizon_morph_core::{SurfaceTree, morph_trace, morph_warn};

use super::curve::TimingCurve;
use super::easing::Easing;
use super::spring::Spring;
use super::timeline::{Timeline, TrackId};
use crate::error::{MorphError, MorphResult};

/// A closure that changes model state when a track starts.
pub type Mutation = Box<dyn FnOnce(&mut SurfaceTree)>;

/// A closure run once when a track stops.
pub type Completion = Box<dyn FnOnce(&mut SurfaceTree, TrackPosition)>;

/// Which half of a transition a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackRole {
    /// Translation of the moving screen.
    Position,
    /// Size of the moving screen.
    Size,
}

impl fmt::Display for TrackRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::Size => write!(f, "size"),
        }
    }
}

/// Where a track stood when its completions ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackPosition {
    /// The track ran for its full duration.
    End,
    /// The track was stopped early and jumped to its end values.
    Current,
}

/// One interpolation run, configured before it starts.
pub struct AnimationTrack {
    role: TrackRole,
    duration: Duration,
    curve: TimingCurve,
    mutations: Vec<Mutation>,
    completions: Vec<Completion>,
    started: bool,
}

impl AnimationTrack {
    /// Create a track with the given timing.
    pub fn new(role: TrackRole, duration: Duration, curve: TimingCurve) -> Self {
        Self {
            role,
            duration,
            curve,
            mutations: Vec::new(),
            completions: Vec::new(),
            started: false,
        }
    }

    /// Create a spring-timed track.
    pub fn spring(
        role: TrackRole,
        duration: Duration,
        damping_ratio: f32,
        initial_velocity: f32,
    ) -> Self {
        Self::new(
            role,
            duration,
            TimingCurve::Spring(Spring::new(damping_ratio, initial_velocity)),
        )
    }

    /// Create an eased track.
    pub fn eased(role: TrackRole, duration: Duration, easing: Easing) -> Self {
        Self::new(role, duration, TimingCurve::ease(easing))
    }

    /// The role of this track.
    pub fn role(&self) -> TrackRole {
        self.role
    }

    /// The configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The configured timing curve.
    pub fn curve(&self) -> TimingCurve {
        self.curve
    }

    /// Whether [`start`](Self::start) has been called.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of registered mutation closures.
    pub fn mutation_count(&self) -> usize {
        self.mutations.len()
    }

    /// Number of registered completion callbacks.
    pub fn completion_count(&self) -> usize {
        self.completions.len()
    }

    /// Append a closure to run when the track starts.
    ///
    /// Closures run in registration order. Every animatable attribute they
    /// change is interpolated from its previous value over the track.
    pub fn add_mutations<F>(&mut self, mutation: F)
    where
        F: FnOnce(&mut SurfaceTree) + 'static,
    {
        self.mutations.push(Box::new(mutation));
    }

    /// Append a callback to run once the track stops.
    pub fn add_completion<F>(&mut self, completion: F)
    where
        F: FnOnce(&mut SurfaceTree, TrackPosition) + 'static,
    {
        self.completions.push(Box::new(completion));
    }

    /// Apply the mutations and begin interpolating on `timeline`.
    ///
    /// A track starts at most once. Starting it again is a programmer error:
    /// debug builds panic, release builds return [`MorphError::DoubleStart`].
    pub fn start(
        &mut self,
        timeline: &mut Timeline,
        tree: &mut SurfaceTree,
    ) -> MorphResult<TrackId> {
        debug_assert!(!self.started, "{} track started twice", self.role);
        if self.started {
            morph_warn!(track = %self.role, "track started twice");
            return Err(MorphError::DoubleStart { track: self.role });
        }
        self.started = true;
        morph_trace!(
            track = %self.role,
            duration = ?self.duration,
            mutations = self.mutations.len(),
            completions = self.completions.len(),
            "starting track"
        );

        Ok(timeline.launch(
            tree,
            self.role,
            self.duration,
            self.curve,
            std::mem::take(&mut self.mutations),
            std::mem::take(&mut self.completions),
        ))
    }
}

impl fmt::Debug for AnimationTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationTrack")
            .field("role", &self.role)
            .field("duration", &self.duration)
            .field("curve", &self.curve)
            .field("mutations", &self.mutations.len())
            .field("completions", &self.completions.len())
            .field("started", &self.started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_morph_core::Rect;

    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_mutations_and_completions_run_in_order() {
        let mut tree = SurfaceTree::new();
        let surface = tree.create("surface", Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut timeline = Timeline::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut track =
            AnimationTrack::eased(TrackRole::Size, Duration::from_millis(64), Easing::Linear);
        for n in 0..3 {
            let log = log.clone();
            track.add_mutations(move |tree| {
                log.borrow_mut().push(format!("mutation {n}"));
                let width = tree.frame(surface).unwrap().width();
                tree.set_frame(surface, Rect::new(0.0, 0.0, width + 10.0, 10.0))
                    .unwrap();
            });
        }
        for n in 0..2 {
            let log = log.clone();
            track.add_completion(move |_, position| {
                assert_eq!(position, TrackPosition::End);
                log.borrow_mut().push(format!("completion {n}"));
            });
        }
        assert_eq!(track.mutation_count(), 3);
        assert_eq!(track.completion_count(), 2);

        track.start(&mut timeline, &mut tree).unwrap();
        assert_eq!(tree.frame(surface).unwrap().width(), 40.0);
        assert_eq!(log.borrow().len(), 3);

        for _ in 0..4 {
            timeline.tick(&mut tree, FRAME);
        }
        assert_eq!(
            *log.borrow(),
            vec![
                "mutation 0",
                "mutation 1",
                "mutation 2",
                "completion 0",
                "completion 1"
            ]
        );

        // Nothing runs twice.
        timeline.tick(&mut tree, FRAME);
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn test_completion_waits_for_spring() {
        let mut tree = SurfaceTree::new();
        let mut timeline = Timeline::new();
        let done = Rc::new(RefCell::new(false));
        let sink = done.clone();

        let mut track =
            AnimationTrack::spring(TrackRole::Position, Duration::from_millis(400), 0.6, 0.0);
        track.add_completion(move |_, _| *sink.borrow_mut() = true);
        track.start(&mut timeline, &mut tree).unwrap();

        for _ in 0..24 {
            timeline.tick(&mut tree, FRAME);
        }
        assert!(!*done.borrow());
        timeline.tick(&mut tree, FRAME);
        assert!(*done.borrow());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "started twice")]
    fn test_double_start_panics_in_debug() {
        let mut tree = SurfaceTree::new();
        let mut timeline = Timeline::new();
        let mut track =
            AnimationTrack::eased(TrackRole::Size, Duration::from_millis(10), Easing::Linear);
        track.start(&mut timeline, &mut tree).unwrap();
        let _ = track.start(&mut timeline, &mut tree);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_double_start_is_an_error_in_release() {
        let mut tree = SurfaceTree::new();
        let mut timeline = Timeline::new();
        let mut track =
            AnimationTrack::eased(TrackRole::Size, Duration::from_millis(10), Easing::Linear);
        track.start(&mut timeline, &mut tree).unwrap();
        assert!(matches!(
            track.start(&mut timeline, &mut tree),
            Err(MorphError::DoubleStart {
                track: TrackRole::Size
            })
        ));
        assert_eq!(timeline.running_count(), 1);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(TrackRole::Position.to_string(), "position");
        assert_eq!(TrackRole::Size.to_string(), "size");
    }
}
