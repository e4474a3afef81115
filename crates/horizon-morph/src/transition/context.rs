//! The host side of a single transition.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_morph_core::SurfaceId;
use parking_lot::Mutex;

use super::animatable::Animatable;

/// Which way the navigation stack moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionDirection {
    /// Present a detail screen; the hero grows into it.
    Push,
    /// Dismiss the detail screen; it shrinks back into the hero.
    Pop,
}

impl fmt::Display for TransitionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Pop => write!(f, "pop"),
        }
    }
}

/// One of the two screens of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenRole {
    /// The screen being left.
    From,
    /// The screen being shown.
    To,
}

impl fmt::Display for ScreenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => write!(f, "from"),
            Self::To => write!(f, "to"),
        }
    }
}

/// What the host supplies for one transition.
///
/// The choreographer reads the context while the transition runs and calls
/// [`complete_transition`](Self::complete_transition) exactly once.
pub trait TransitionContext {
    /// The surface transition views are staged in.
    fn overlay(&self) -> SurfaceId;

    /// One of the participating screens.
    fn screen(&self, role: ScreenRole) -> Option<Rc<dyn Animatable>>;

    /// Push or pop.
    fn direction(&self) -> TransitionDirection;

    /// Whether the host cancelled the transition. Sampled when it completes.
    fn is_cancelled(&self) -> bool;

    /// Report the end of the transition.
    fn complete_transition(&mut self, success: bool);
}

#[derive(Debug, Default)]
struct Outcome {
    cancelled: AtomicBool,
    completions: Mutex<Vec<bool>>,
}

/// A thread-safe handle onto a [`RecordingContext`]'s cancellation flag and
/// reported outcome.
///
/// The handle stays usable after the context has been handed to the
/// choreographer.
#[derive(Debug, Clone, Default)]
pub struct ContextHandle {
    outcome: Arc<Outcome>,
}

impl ContextHandle {
    /// Mark the transition as cancelled.
    pub fn cancel(&self) {
        self.outcome.cancelled.store(true, Ordering::Release);
    }

    /// Whether the transition was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.outcome.cancelled.load(Ordering::Acquire)
    }

    /// The first reported outcome, if the transition has completed.
    pub fn outcome(&self) -> Option<bool> {
        self.outcome.completions.lock().first().copied()
    }

    /// How many times completion was reported.
    pub fn completion_count(&self) -> usize {
        self.outcome.completions.lock().len()
    }

    /// Whether completion has been reported.
    pub fn is_complete(&self) -> bool {
        self.completion_count() > 0
    }
}

/// A [`TransitionContext`] that records what the choreographer reports.
pub struct RecordingContext {
    overlay: SurfaceId,
    from: Option<Rc<dyn Animatable>>,
    to: Option<Rc<dyn Animatable>>,
    direction: TransitionDirection,
    handle: ContextHandle,
}

impl RecordingContext {
    /// Create a context for a transition between two screens.
    pub fn new(
        overlay: SurfaceId,
        direction: TransitionDirection,
        from: Option<Rc<dyn Animatable>>,
        to: Option<Rc<dyn Animatable>>,
    ) -> Self {
        Self {
            overlay,
            from,
            to,
            direction,
            handle: ContextHandle::default(),
        }
    }

    /// A handle to observe and cancel this transition.
    pub fn handle(&self) -> ContextHandle {
        self.handle.clone()
    }
}

impl TransitionContext for RecordingContext {
    fn overlay(&self) -> SurfaceId {
        self.overlay
    }

    fn screen(&self, role: ScreenRole) -> Option<Rc<dyn Animatable>> {
        match role {
            ScreenRole::From => self.from.clone(),
            ScreenRole::To => self.to.clone(),
        }
    }

    fn direction(&self) -> TransitionDirection {
        self.direction
    }

    fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    fn complete_transition(&mut self, success: bool) {
        self.handle.outcome.completions.lock().push(success);
    }
}

impl fmt::Debug for RecordingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingContext")
            .field("overlay", &self.overlay)
            .field("direction", &self.direction)
            .field("has_from", &self.from.is_some())
            .field("has_to", &self.to.is_some())
            .field("handle", &self.handle)
            .finish()
    }
}
