//! A navigation stack that animates pushes and pops.
//!
//! [`NavigationHost`] owns the surface tree, the timeline and the overlay, and
//! asks an injected [`TransitionFactory`] for a [`Choreographer`] whenever the
//! stack changes. It allows one transition in flight at a time.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use horizon_morph::navigation::{ConfiguredFactory, NavigationHost};
//! use horizon_morph::transition::Animatable;
//! use horizon_morph::{Rect, SurfaceId, SurfaceTree};
//!
//! struct Screen {
//!     root: SurfaceId,
//!     hero: SurfaceId,
//! }
//!
//! impl Animatable for Screen {
//!     fn container(&self) -> Option<SurfaceId> {
//!         Some(self.root)
//!     }
//!     fn hero_element(&self) -> Option<SurfaceId> {
//!         Some(self.hero)
//!     }
//! }
//!
//! let mut tree = SurfaceTree::new();
//! let overlay = tree.create("overlay", Rect::new(0.0, 0.0, 320.0, 568.0));
//! let list = tree.create("list", Rect::new(0.0, 0.0, 320.0, 568.0));
//! let cell = tree.create_child(list, "cell", Rect::new(40.0, 120.0, 150.0, 150.0))?;
//! let detail = tree.create("detail", Rect::new(0.0, 0.0, 320.0, 568.0));
//! let photo = tree.create_child(detail, "photo", Rect::new(0.0, 0.0, 320.0, 320.0))?;
//!
//! let mut host = NavigationHost::new(tree, overlay, ConfiguredFactory::default());
//! host.push(Rc::new(Screen { root: list, hero: cell }))?;
//! host.push(Rc::new(Screen { root: detail, hero: photo }))?;
//! assert!(host.is_transitioning());
//!
//! while host.is_transitioning() {
//!     host.tick(Duration::from_millis(16));
//! }
//! assert_eq!(host.depth(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use horizon_morph_core::logging::targets;
use horizon_morph_core::{SurfaceId, SurfaceTree};

use crate::animation::Timeline;
use crate::config::TransitionConfig;
use crate::error::{MorphError, MorphResult};
use crate::transition::{
    Animatable, Choreographer, ChoreographerState, ContextHandle, RecordingContext,
    TransitionDirection, TransitionRun,
};

/// Builds the choreographer for each transition.
///
/// Closures with the same signature implement this trait.
pub trait TransitionFactory {
    /// Create a choreographer for `direction` with the given track durations.
    fn create(
        &self,
        direction: TransitionDirection,
        positioning: Duration,
        resizing: Duration,
    ) -> Choreographer;
}

impl<F> TransitionFactory for F
where
    F: Fn(TransitionDirection, Duration, Duration) -> Choreographer,
{
    fn create(
        &self,
        direction: TransitionDirection,
        positioning: Duration,
        resizing: Duration,
    ) -> Choreographer {
        self(direction, positioning, resizing)
    }
}

/// A factory applying the curves of a [`TransitionConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredFactory {
    config: TransitionConfig,
}

impl ConfiguredFactory {
    /// Create a factory using the curves of `config`.
    pub fn new(config: TransitionConfig) -> Self {
        Self { config }
    }
}

impl TransitionFactory for ConfiguredFactory {
    fn create(
        &self,
        direction: TransitionDirection,
        positioning: Duration,
        resizing: Duration,
    ) -> Choreographer {
        Choreographer::new(direction, positioning, resizing)
            .with_curves(self.config.positioning_curve, self.config.resizing_curve)
    }
}

/// The transition currently running.
struct InFlight {
    direction: TransitionDirection,
    choreographer: Choreographer,
    handle: ContextHandle,
    /// The screen that was on top before the transition.
    from: Rc<dyn Animatable>,
}

/// A stack of screens presented through animated transitions.
pub struct NavigationHost<F> {
    tree: SurfaceTree,
    timeline: Timeline,
    overlay: SurfaceId,
    config: TransitionConfig,
    factory: F,
    stack: Vec<Rc<dyn Animatable>>,
    in_flight: Option<InFlight>,
}

impl<F: TransitionFactory> NavigationHost<F> {
    /// Create a host presenting into `overlay`, with default durations.
    pub fn new(tree: SurfaceTree, overlay: SurfaceId, factory: F) -> Self {
        Self {
            tree,
            timeline: Timeline::new(),
            overlay,
            config: TransitionConfig::default(),
            factory,
            stack: Vec::new(),
            in_flight: None,
        }
    }

    /// Use the durations of `config` for every following transition.
    pub fn with_config(mut self, config: TransitionConfig) -> MorphResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The surface tree.
    pub fn tree(&self) -> &SurfaceTree {
        &self.tree
    }

    /// Mutable access to the surface tree.
    pub fn tree_mut(&mut self) -> &mut SurfaceTree {
        &mut self.tree
    }

    /// The timeline transitions run on.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The surface screens are presented in.
    pub fn overlay(&self) -> SurfaceId {
        self.overlay
    }

    /// The top screen, if any.
    pub fn top(&self) -> Option<&Rc<dyn Animatable>> {
        self.stack.last()
    }

    /// Number of screens on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether a transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// State of the running transition's choreographer.
    pub fn transition_state(&self) -> ChoreographerState {
        self.in_flight
            .as_ref()
            .map_or(ChoreographerState::Idle, |in_flight| in_flight.choreographer.state())
    }

    /// How long a transition in `direction` takes.
    pub fn transition_duration(&self, direction: TransitionDirection) -> Duration {
        self.choreographer(direction).total_duration()
    }

    fn choreographer(&self, direction: TransitionDirection) -> Choreographer {
        self.factory
            .create(direction, self.config.positioning(), self.config.resizing())
    }

    /// Put `screen` on top of the stack.
    ///
    /// The first screen is shown directly. Every later push animates from
    /// the current top and returns what the choreographer did.
    #[tracing::instrument(skip_all, target = "horizon_morph::navigation", level = "debug")]
    pub fn push(&mut self, screen: Rc<dyn Animatable>) -> MorphResult<Option<TransitionRun>> {
        if self.in_flight.is_some() {
            return Err(MorphError::TransitionInFlight);
        }

        let Some(from) = self.stack.last().cloned() else {
            if let Some(container) = screen.container() {
                self.tree.set_parent(container, Some(self.overlay))?;
            }
            tracing::debug!(
                target: targets::NAVIGATION,
                screen = screen.label(),
                "presented root screen"
            );
            self.stack.push(screen);
            return Ok(None);
        };

        self.stack.push(screen.clone());
        let run = self.begin(TransitionDirection::Push, from, screen);
        Ok(Some(run))
    }

    /// Remove the top screen, animating back to the one below.
    #[tracing::instrument(skip_all, target = "horizon_morph::navigation", level = "debug")]
    pub fn pop(&mut self) -> MorphResult<TransitionRun> {
        if self.in_flight.is_some() {
            return Err(MorphError::TransitionInFlight);
        }
        if self.stack.len() < 2 {
            return Err(MorphError::EmptyStack);
        }

        let Some(from) = self.stack.pop() else {
            return Err(MorphError::EmptyStack);
        };
        let Some(to) = self.stack.last().cloned() else {
            return Err(MorphError::EmptyStack);
        };
        Ok(self.begin(TransitionDirection::Pop, from, to))
    }

    fn begin(
        &mut self,
        direction: TransitionDirection,
        from: Rc<dyn Animatable>,
        to: Rc<dyn Animatable>,
    ) -> TransitionRun {
        let choreographer = self.choreographer(direction);
        let context = RecordingContext::new(self.overlay, direction, Some(from.clone()), Some(to));
        let handle = context.handle();

        tracing::debug!(
            target: targets::NAVIGATION,
            %direction,
            duration = ?choreographer.total_duration(),
            "starting transition"
        );
        let run = choreographer.run(Box::new(context), &mut self.tree, &mut self.timeline);

        self.in_flight = Some(InFlight {
            direction,
            choreographer,
            handle,
            from,
        });
        self.settle_if_complete();
        run
    }

    /// Advance running animations by `dt`.
    ///
    /// Returns the outcome of a transition that finished during this frame.
    pub fn tick(&mut self, dt: Duration) -> Option<bool> {
        self.timeline.tick(&mut self.tree, dt);
        self.settle_if_complete()
    }

    /// Mark the running transition as cancelled.
    ///
    /// It keeps animating and reports failure when it ends, after which the
    /// stack is restored. Returns whether a transition was running.
    pub fn cancel_transition(&mut self) -> bool {
        match &self.in_flight {
            Some(in_flight) => {
                tracing::debug!(
                    target: targets::NAVIGATION,
                    direction = %in_flight.direction,
                    "cancelling transition"
                );
                in_flight.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Jump every running animation to its end.
    pub fn finish_all(&mut self) -> Option<bool> {
        self.timeline.finish_all(&mut self.tree);
        self.settle_if_complete()
    }

    fn settle_if_complete(&mut self) -> Option<bool> {
        let outcome = self.in_flight.as_ref()?.handle.outcome()?;
        let in_flight = self.in_flight.take()?;

        match (in_flight.direction, outcome) {
            (TransitionDirection::Push, true) => {
                if let Some(container) = in_flight.from.container() {
                    if self.tree.parent(container) == Ok(Some(self.overlay)) {
                        if let Err(error) = self.tree.detach(container) {
                            tracing::warn!(
                                target: targets::NAVIGATION,
                                %error,
                                "could not detach covered screen"
                            );
                        }
                    }
                }
            }
            (TransitionDirection::Push, false) => {
                self.stack.pop();
            }
            (TransitionDirection::Pop, true) => {}
            (TransitionDirection::Pop, false) => {
                self.stack.push(in_flight.from);
            }
        }

        tracing::debug!(
            target: targets::NAVIGATION,
            direction = %in_flight.direction,
            completed = outcome,
            depth = self.stack.len(),
            "transition settled"
        );
        Some(outcome)
    }
}

impl<F> fmt::Debug for NavigationHost<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationHost")
            .field("overlay", &self.overlay)
            .field("depth", &self.stack.len())
            .field("transitioning", &self.in_flight.is_some())
            .field("timeline", &self.timeline)
            .finish()
    }
}
