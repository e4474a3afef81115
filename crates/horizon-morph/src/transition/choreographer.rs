//! Expand/collapse choreography.
//!
//! A [`Choreographer`] runs one transition at a time through
//!
//! ```text
//! Idle -> Resolving -> Staging -> Animating -> Finalizing -> Idle
//! ```
//!
//! **Push** grows the destination container out of the source screen's hero
//! element: the container starts on the hero's rectangle in overlay space and
//! its translation and size are animated to its own frame. The source hero is
//! moved into the overlay and hidden while this happens.
//!
//! **Pop** shrinks the departing container back onto the destination's hero
//! element: the vertical translation runs on the position track, the size and
//! horizontal translation on the size track. The destination hero is hidden in
//! place until the transition ends.
//!
//! Finalization is attached once, to the track with the longer configured
//! duration, and runs exactly once: it puts every borrowed or hidden surface
//! back, calls [`Animatable::on_transition_complete`] on both screens and
//! reports to the [`TransitionContext`].
//!
//! Screens that cannot be animated, and layouts whose coordinates cannot be
//! mapped into the overlay, degrade to a direct swap that still completes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use horizon_morph_core::logging::{span_names, targets};
use horizon_morph_core::{
    Delta, GeometryTranslator, PerfSpan, Rect, SurfaceId, SurfaceTree, SurfaceTreeDebug, delta,
};

use super::animatable::Animatable;
use super::context::{ScreenRole, TransitionContext, TransitionDirection};
use super::staging::StagingLedger;
use crate::animation::{PairIds, Timeline, TimingCurve, TrackPair, TrackRole};
use crate::config::TransitionConfig;
use crate::error::{MorphError, MorphResult, ParticipantPart};

/// Where a [`Choreographer`] is in its transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoreographerState {
    /// No transition running.
    #[default]
    Idle,
    /// Looking up the participating screens.
    Resolving,
    /// Moving surfaces into the overlay and measuring them.
    Staging,
    /// Tracks are running.
    Animating,
    /// Restoring surfaces and reporting completion.
    Finalizing,
}

/// What [`Choreographer::run`] did.
#[derive(Debug)]
pub enum TransitionRun {
    /// Both tracks were started.
    Animated {
        /// The started tracks.
        tracks: PairIds,
        /// The moving rectangle at the start, in overlay coordinates.
        origin: Rect,
        /// The moving rectangle at the end, in overlay coordinates.
        destination: Rect,
        /// Origin displacement from `origin` to `destination`.
        delta: Delta,
    },
    /// The transition completed immediately without animation.
    DirectSwap {
        /// Why the transition could not be animated.
        reason: MorphError,
    },
}

impl TransitionRun {
    /// Whether tracks were started.
    pub fn is_animated(&self) -> bool {
        matches!(self, TransitionRun::Animated { .. })
    }
}

/// Runs push and pop transitions for one direction.
pub struct Choreographer {
    direction: TransitionDirection,
    positioning: Duration,
    resizing: Duration,
    positioning_curve: TimingCurve,
    resizing_curve: TimingCurve,
    state: Rc<Cell<ChoreographerState>>,
}

impl Choreographer {
    /// Create a choreographer with the default curves.
    pub fn new(direction: TransitionDirection, positioning: Duration, resizing: Duration) -> Self {
        Self {
            direction,
            positioning,
            resizing,
            positioning_curve: TimingCurve::default_positioning(),
            resizing_curve: TimingCurve::default_resizing(),
            state: Rc::new(Cell::new(ChoreographerState::Idle)),
        }
    }

    /// Create a choreographer timed by a configuration.
    pub fn from_config(direction: TransitionDirection, config: &TransitionConfig) -> Self {
        Self::new(direction, config.positioning(), config.resizing())
            .with_curves(config.positioning_curve, config.resizing_curve)
    }

    /// Replace the timing curves.
    pub fn with_curves(mut self, positioning: TimingCurve, resizing: TimingCurve) -> Self {
        self.positioning_curve = positioning;
        self.resizing_curve = resizing;
        self
    }

    /// The direction this choreographer animates.
    pub fn direction(&self) -> TransitionDirection {
        self.direction
    }

    /// Current state.
    pub fn state(&self) -> ChoreographerState {
        self.state.get()
    }

    /// The longer of the two track durations.
    pub fn total_duration(&self) -> Duration {
        self.positioning.max(self.resizing)
    }

    /// The track that will carry finalization.
    pub fn finalizing_track(&self) -> TrackRole {
        self.tracks().longer_role()
    }

    fn tracks(&self) -> TrackPair {
        TrackPair::new(
            self.positioning,
            self.positioning_curve,
            self.resizing,
            self.resizing_curve,
        )
    }

    /// Run one transition.
    ///
    /// Returns once both tracks have started, or after a direct swap has
    /// completed. Either way the context's
    /// [`complete_transition`](TransitionContext::complete_transition) is
    /// called exactly once, from this call or from a later
    /// [`Timeline::tick`].
    #[tracing::instrument(
        name = "horizon_morph::transition",
        target = "horizon_morph::transition",
        level = "debug",
        skip_all,
        fields(direction = %self.direction)
    )]
    pub fn run(
        &self,
        mut context: Box<dyn TransitionContext>,
        tree: &mut SurfaceTree,
        timeline: &mut Timeline,
    ) -> TransitionRun {
        let _perf = PerfSpan::new(span_names::TRANSITION);

        if self.state() != ChoreographerState::Idle {
            tracing::warn!(
                target: targets::TRANSITION,
                state = ?self.state(),
                "transition already running"
            );
            context.complete_transition(false);
            return TransitionRun::DirectSwap {
                reason: MorphError::TransitionInFlight,
            };
        }
        if context.direction() != self.direction {
            tracing::warn!(
                target: targets::TRANSITION,
                context = %context.direction(),
                "context direction differs from choreographer direction"
            );
        }

        set_state(&self.state, ChoreographerState::Resolving);
        let from = context.screen(ScreenRole::From);
        let to = context.screen(ScreenRole::To);
        let (from_screen, to_screen) = match resolve(&from, &to) {
            Ok(participants) => participants,
            Err(reason) => return self.direct_swap(context, tree, reason, from, to),
        };

        set_state(&self.state, ChoreographerState::Staging);
        let overlay = context.overlay();
        let mut scene = Scene::default();
        let staged = match self.direction {
            TransitionDirection::Push => {
                stage_push(tree, overlay, &from_screen, &to_screen, &mut scene)
            }
            TransitionDirection::Pop => {
                stage_pop(tree, overlay, &from_screen, &to_screen, &mut scene)
            }
        };
        let stage = match staged {
            Ok(stage) => stage,
            Err(reason) => {
                scene.teardown(tree, false);
                return self.direct_swap(context, tree, reason, from, to);
            }
        };

        if tracing::enabled!(target: targets::TRANSITION, tracing::Level::TRACE) {
            if let Ok(dump) = SurfaceTreeDebug::new().format_subtree(tree, overlay) {
                tracing::trace!(target: targets::TRANSITION, "staged overlay:\n{dump}");
            }
        }

        set_state(&self.state, ChoreographerState::Animating);
        let mut tracks = self.tracks();
        let moving = stage.moving;
        let shift = delta(stage.origin, stage.destination);
        let size = stage.destination.size;

        match self.direction {
            TransitionDirection::Push => {
                tracks.position.add_mutations(move |tree| {
                    log_mutation(tree.set_offset(moving, shift));
                });
                tracks.size.add_mutations(move |tree| {
                    log_mutation(
                        tree.frame(moving)
                            .and_then(|frame| tree.set_frame(moving, frame.with_size(size))),
                    );
                });
            }
            TransitionDirection::Pop => {
                tracks.position.add_mutations(move |tree| {
                    log_mutation(tree.offset(moving).and_then(|offset| {
                        tree.set_offset(moving, Delta::new(offset.dx, shift.dy))
                    }));
                });
                tracks.size.add_mutations(move |tree| {
                    log_mutation(tree.frame(moving).and_then(|frame| {
                        tree.set_frame(moving, frame.with_size(size))?;
                        let offset = tree.offset(moving)?;
                        tree.set_offset(moving, Delta::new(shift.dx, offset.dy))
                    }));
                });
            }
        }

        let (moving_screen, origin, destination) = (
            match self.direction {
                TransitionDirection::Push => &to_screen,
                TransitionDirection::Pop => &from_screen,
            },
            stage.origin,
            stage.destination,
        );
        to_screen
            .screen
            .on_will_present(&mut tracks.size, &mut tracks.position, origin, destination);
        from_screen
            .screen
            .on_will_dismiss(&mut tracks.size, &mut tracks.position, origin, destination);
        moving_screen
            .screen
            .on_positioning(&mut tracks.position, origin.origin, destination.origin);
        moving_screen
            .screen
            .on_resizing(&mut tracks.size, origin, destination);

        let finalizer = Rc::new(RefCell::new(Some(Finalizer {
            context,
            from: from_screen.screen,
            to: to_screen.screen,
            scene,
            state: self.state.clone(),
        })));
        let slot = finalizer.clone();
        tracks.longer_mut().add_completion(move |tree, position| {
            tracing::debug!(target: targets::TRANSITION, ?position, "finalizing track completed");
            let pending = slot.borrow_mut().take();
            if let Some(finalizer) = pending {
                finalizer.finish(tree);
            }
        });

        tracing::debug!(
            target: targets::TRANSITION,
            ?origin,
            ?destination,
            delta = ?shift,
            finalizing = %tracks.longer_role(),
            "starting tracks"
        );

        match tracks.start(timeline, tree) {
            Ok(ids) => TransitionRun::Animated {
                tracks: ids,
                origin,
                destination,
                delta: shift,
            },
            Err(reason) => {
                tracing::warn!(target: targets::TRANSITION, %reason, "tracks failed to start");
                let pending = finalizer.borrow_mut().take();
                if let Some(finalizer) = pending {
                    finalizer.finish(tree);
                }
                TransitionRun::DirectSwap { reason }
            }
        }
    }

    /// Complete without animation.
    fn direct_swap(
        &self,
        mut context: Box<dyn TransitionContext>,
        tree: &mut SurfaceTree,
        reason: MorphError,
        from: Option<Rc<dyn Animatable>>,
        to: Option<Rc<dyn Animatable>>,
    ) -> TransitionRun {
        tracing::warn!(
            target: targets::TRANSITION,
            %reason,
            "transition degraded to a direct swap"
        );
        set_state(&self.state, ChoreographerState::Finalizing);

        let completed = !context.is_cancelled();
        if completed {
            let overlay = context.overlay();
            if let Some(container) = to.as_ref().and_then(|screen| screen.container()) {
                if let Err(error) = tree.set_parent(container, Some(overlay)) {
                    tracing::warn!(
                        target: targets::TRANSITION,
                        %error,
                        "could not attach destination"
                    );
                }
            }
            if self.direction == TransitionDirection::Pop {
                if let Some(container) = from.as_ref().and_then(|screen| screen.container()) {
                    if tree.parent(container) == Ok(Some(overlay)) {
                        log_mutation(tree.detach(container));
                    }
                }
            }
        }

        for screen in [&from, &to].into_iter().flatten() {
            screen.on_transition_complete(tree, completed);
        }
        context.complete_transition(completed);
        set_state(&self.state, ChoreographerState::Idle);
        TransitionRun::DirectSwap { reason }
    }
}

impl fmt::Debug for Choreographer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Choreographer")
            .field("direction", &self.direction)
            .field("positioning", &self.positioning)
            .field("resizing", &self.resizing)
            .field("state", &self.state.get())
            .finish()
    }
}

fn set_state(state: &Cell<ChoreographerState>, next: ChoreographerState) {
    let previous = state.replace(next);
    tracing::debug!(target: targets::TRANSITION, ?previous, ?next, "state changed");
}

fn log_mutation<E: fmt::Display>(result: Result<(), E>) {
    if let Err(error) = result {
        tracing::warn!(target: targets::TRANSITION, %error, "transition mutation skipped");
    }
}

/// A screen that has everything needed to animate.
struct Participant {
    screen: Rc<dyn Animatable>,
    container: SurfaceId,
    hero: SurfaceId,
}

fn resolve(
    from: &Option<Rc<dyn Animatable>>,
    to: &Option<Rc<dyn Animatable>>,
) -> MorphResult<(Participant, Participant)> {
    let missing = |role, part| MorphError::MissingParticipant { role, part };

    let from = from.clone().ok_or(missing(ScreenRole::From, ParticipantPart::Screen))?;
    let to = to.clone().ok_or(missing(ScreenRole::To, ParticipantPart::Screen))?;
    let from_container = from
        .container()
        .ok_or(missing(ScreenRole::From, ParticipantPart::Container))?;
    let to_container = to
        .container()
        .ok_or(missing(ScreenRole::To, ParticipantPart::Container))?;
    let from_hero = from
        .hero_element()
        .ok_or(missing(ScreenRole::From, ParticipantPart::HeroElement))?;
    let to_hero = to
        .hero_element()
        .ok_or(missing(ScreenRole::To, ParticipantPart::HeroElement))?;

    tracing::debug!(
        target: targets::TRANSITION,
        from = from.label(),
        to = to.label(),
        "resolved participants"
    );
    Ok((
        Participant {
            screen: from,
            container: from_container,
            hero: from_hero,
        },
        Participant {
            screen: to,
            container: to_container,
            hero: to_hero,
        },
    ))
}

/// Geometry of a staged transition.
struct Stage {
    moving: SurfaceId,
    origin: Rect,
    destination: Rect,
}

/// A departing container and where it was before staging.
struct Departing {
    surface: SurfaceId,
    parent: Option<SurfaceId>,
    index: Option<usize>,
    frame: Rect,
    offset: Delta,
}

/// Everything staging changed, and how to undo it.
#[derive(Default)]
struct Scene {
    ledger: StagingLedger,
    /// A container that had no parent and was attached to the overlay.
    attached: Option<SurfaceId>,
    /// A container to settle at its resting frame once the transition ends.
    settle: Option<(SurfaceId, Rect)>,
    departing: Option<Departing>,
}

impl Scene {
    /// Put a container into the overlay and return its frame there.
    fn attach(
        &mut self,
        tree: &mut SurfaceTree,
        container: SurfaceId,
        overlay: SurfaceId,
    ) -> MorphResult<Rect> {
        match tree.parent(container)? {
            None => {
                tree.set_parent(container, Some(overlay))?;
                self.attached = Some(container);
                Ok(tree.frame(container)?)
            }
            Some(parent) if parent == overlay => Ok(tree.frame(container)?),
            Some(_) => self.ledger.borrow_into(tree, container, overlay),
        }
    }

    /// Undo staging. A completed transition keeps newly attached containers
    /// and removes the departing one.
    fn teardown(self, tree: &mut SurfaceTree, completed: bool) {
        if let Some((surface, frame)) = self.settle {
            log_mutation(
                tree.set_frame(surface, frame)
                    .and_then(|()| tree.set_offset(surface, Delta::ZERO)),
            );
        }

        if !completed {
            if let Some(container) = self.attached {
                log_mutation(tree.detach(container));
            }
        }

        if let Some(departing) = self.departing {
            let surface = departing.surface;
            log_mutation(
                tree.set_frame(surface, departing.frame)
                    .and_then(|()| tree.set_offset(surface, departing.offset)),
            );
            let placed = match (completed, departing.parent) {
                (false, Some(parent)) => {
                    tree.insert_child(parent, surface, departing.index.unwrap_or(usize::MAX))
                }
                _ => tree.detach(surface),
            };
            log_mutation(placed);
        }

        self.ledger.release(tree);
    }
}

fn stage_push(
    tree: &mut SurfaceTree,
    overlay: SurfaceId,
    from: &Participant,
    to: &Participant,
    scene: &mut Scene,
) -> MorphResult<Stage> {
    let origin = GeometryTranslator::new(tree).frame_in(from.hero, overlay)?;
    let destination = scene.attach(tree, to.container, overlay)?;

    scene.ledger.borrow_into(tree, from.hero, overlay)?;
    scene.ledger.hide(tree, from.hero)?;

    tree.set_frame(to.container, origin)?;
    tree.set_offset(to.container, Delta::ZERO)?;
    scene.settle = Some((to.container, destination));

    Ok(Stage {
        moving: to.container,
        origin,
        destination,
    })
}

fn stage_pop(
    tree: &mut SurfaceTree,
    overlay: SurfaceId,
    from: &Participant,
    to: &Participant,
    scene: &mut Scene,
) -> MorphResult<Stage> {
    let layer = tree.layer(from.container)?;
    let parent = tree.parent(from.container)?;
    let origin = match parent {
        None => layer.visual_frame(),
        Some(_) => GeometryTranslator::new(tree).frame_in(from.container, overlay)?,
    };
    scene.departing = Some(Departing {
        surface: from.container,
        parent,
        index: tree.sibling_index(from.container)?,
        frame: layer.frame,
        offset: layer.offset,
    });

    scene.attach(tree, to.container, overlay)?;
    tree.set_parent(from.container, Some(overlay))?;
    tree.set_frame(from.container, origin)?;
    tree.set_offset(from.container, Delta::ZERO)?;

    let destination = GeometryTranslator::new(tree).frame_in(to.hero, overlay)?;
    scene.ledger.hide(tree, to.hero)?;

    Ok(Stage {
        moving: from.container,
        origin,
        destination,
    })
}

/// Teardown owned by the finalizing track's completion.
struct Finalizer {
    context: Box<dyn TransitionContext>,
    from: Rc<dyn Animatable>,
    to: Rc<dyn Animatable>,
    scene: Scene,
    state: Rc<Cell<ChoreographerState>>,
}

impl Finalizer {
    fn finish(mut self, tree: &mut SurfaceTree) {
        set_state(&self.state, ChoreographerState::Finalizing);
        let completed = !self.context.is_cancelled();

        self.scene.teardown(tree, completed);
        self.from.on_transition_complete(tree, completed);
        self.to.on_transition_complete(tree, completed);

        tracing::debug!(target: targets::TRANSITION, completed, "transition finished");
        self.context.complete_transition(completed);
        set_state(&self.state, ChoreographerState::Idle);
    }
}
