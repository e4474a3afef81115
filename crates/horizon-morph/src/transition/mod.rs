//! Transition choreography.
//!
//! - [`Animatable`]: what a screen exposes to take part
//! - [`TransitionContext`]: what the host supplies for one transition
//! - [`StagingLedger`]: scoped borrowing of surfaces into the overlay
//! - [`Choreographer`]: the push/pop state machine

mod animatable;
mod choreographer;
mod context;
mod staging;

pub use animatable::Animatable;
pub use choreographer::{Choreographer, ChoreographerState, TransitionRun};
pub use context::{
    ContextHandle, RecordingContext, ScreenRole, TransitionContext, TransitionDirection,
};
pub use staging::StagingLedger;
