//! Frame timeline driving animation tracks.
//!
//! The timeline is advanced explicitly by the host, once per frame, with the
//! time elapsed since the previous frame. There is no clock and no thread:
//! every mutation and completion closure runs inside [`Timeline::tick`] or
//! [`Timeline::finish_all`] on the caller's thread.
//!
//! # Channel ownership
//!
//! A running track owns every `(surface, channel)` pair it interpolates and
//! writes that channel's presentation override each frame. A newer track only
//! claims the channels its own mutations change. When one of those is already
//! owned, it takes over ownership and starts from the value currently drawn,
//! so two tracks never write the same channel in one frame. Channels it did
//! not change stay with their track, whatever is drawn for them.

use std::collections::HashMap;
use std::time::Duration;

use horizon_morph_core::logging::{span_names, targets};
use horizon_morph_core::{GEOMETRY_EPSILON, LayerChannel, SurfaceId, SurfaceTree};
use slotmap::{SlotMap, new_key_type};

use super::curve::TimingCurve;
use super::track::{Completion, Mutation, TrackPosition, TrackRole};

new_key_type! {
    /// A unique identifier for a track started on a [`Timeline`].
    pub struct TrackId;
}

/// One attribute being interpolated by a track.
#[derive(Debug, Clone, Copy)]
struct AnimatedChannel {
    surface: SurfaceId,
    channel: LayerChannel,
    from: f32,
    to: f32,
}

/// Internal data stored for each running track.
struct RunningTrack {
    role: TrackRole,
    duration: Duration,
    curve: TimingCurve,
    elapsed: Duration,
    channels: Vec<AnimatedChannel>,
    completions: Vec<Completion>,
}

impl RunningTrack {
    /// Linear progress through the duration, clamped to `[0, 1]`.
    fn linear_progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Drives started tracks frame by frame.
pub struct Timeline {
    /// All running tracks.
    tracks: SlotMap<TrackId, RunningTrack>,
    /// Running tracks in start order.
    order: Vec<TrackId>,
    /// Which track writes each animated channel.
    owners: HashMap<(SurfaceId, LayerChannel), TrackId>,
    /// Total time advanced.
    now: Duration,
    /// Number of ticks during which at least one track was running.
    animated_frames: u64,
}

impl Timeline {
    /// Create an idle timeline.
    pub fn new() -> Self {
        Self {
            tracks: SlotMap::with_key(),
            order: Vec::new(),
            owners: HashMap::new(),
            now: Duration::ZERO,
            animated_frames: 0,
        }
    }

    /// Total time advanced through [`tick`](Self::tick).
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Whether no track is running.
    pub fn is_idle(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of running tracks.
    pub fn running_count(&self) -> usize {
        self.order.len()
    }

    /// Whether the given track is still running.
    pub fn is_running(&self, id: TrackId) -> bool {
        self.tracks.contains_key(id)
    }

    /// Number of ticks that advanced at least one track.
    pub fn animated_frames(&self) -> u64 {
        self.animated_frames
    }

    /// Apply a track's mutations and begin interpolating what they changed.
    ///
    /// Mutations run immediately, in order, against the model layer. Every
    /// channel whose model value changed is then held at its previous value
    /// through a presentation override and interpolated to the new one.
    pub(crate) fn launch(
        &mut self,
        tree: &mut SurfaceTree,
        role: TrackRole,
        duration: Duration,
        curve: TimingCurve,
        mutations: Vec<Mutation>,
        completions: Vec<Completion>,
    ) -> TrackId {
        let before = tree.snapshot_layers();
        let mutation_count = mutations.len();
        for mutation in mutations {
            mutation(tree);
        }

        let mut channels = Vec::new();
        for (surface, old) in before {
            // Surfaces destroyed by a mutation have nothing left to animate.
            let Ok(new) = tree.layer(surface) else {
                continue;
            };
            let presented = tree.presented_layer(surface).unwrap_or(new);
            for channel in LayerChannel::ALL {
                let to = new.channel(channel);
                // Only channels this launch's own mutations changed belong to it.
                if (to - old.channel(channel)).abs() <= GEOMETRY_EPSILON {
                    continue;
                }
                let from = if self.owners.contains_key(&(surface, channel)) {
                    presented.channel(channel)
                } else {
                    old.channel(channel)
                };
                if (to - from).abs() > GEOMETRY_EPSILON {
                    channels.push(AnimatedChannel {
                        surface,
                        channel,
                        from,
                        to,
                    });
                }
            }
        }

        let id = self.tracks.insert(RunningTrack {
            role,
            duration,
            curve,
            elapsed: Duration::ZERO,
            channels: Vec::new(),
            completions,
        });

        for animated in &channels {
            if let Some(previous) = self
                .owners
                .insert((animated.surface, animated.channel), id)
            {
                tracing::trace!(
                    target: targets::TIMELINE,
                    ?previous,
                    surface = ?animated.surface,
                    channel = ?animated.channel,
                    "channel taken over by newer track"
                );
            }
            // The surface was just read, so this cannot fail.
            let _ = tree.set_presentation(animated.surface, animated.channel, animated.from);
        }

        tracing::debug!(
            target: targets::TIMELINE,
            ?id,
            %role,
            ?duration,
            mutations = mutation_count,
            channels = channels.len(),
            "track started"
        );

        if let Some(track) = self.tracks.get_mut(id) {
            track.channels = channels;
        }
        self.order.push(id);
        id
    }

    /// Advance every running track by `dt`.
    ///
    /// Tracks that reach their duration are retired in start order: their
    /// presentation overrides are dropped, so the model values are drawn, and
    /// their completions run with [`TrackPosition::End`].
    pub fn tick(&mut self, tree: &mut SurfaceTree, dt: Duration) {
        self.now += dt;
        if self.order.is_empty() {
            return;
        }

        let _span =
            tracing::trace_span!(target: targets::TIMELINE, span_names::FRAME, now = ?self.now)
                .entered();
        self.animated_frames += 1;

        let Self {
            tracks,
            order,
            owners,
            ..
        } = self;

        let mut finished = Vec::new();
        for &id in order.iter() {
            let Some(track) = tracks.get_mut(id) else {
                continue;
            };
            track.elapsed += dt;
            let progress = track.curve.value(track.linear_progress());
            for animated in &track.channels {
                if owners.get(&(animated.surface, animated.channel)) != Some(&id) {
                    continue;
                }
                let value = animated.from + (animated.to - animated.from) * progress;
                if tree
                    .set_presentation(animated.surface, animated.channel, value)
                    .is_err()
                {
                    tracing::trace!(
                        target: targets::TIMELINE,
                        surface = ?animated.surface,
                        "animated surface no longer exists"
                    );
                }
            }
            if track.is_finished() {
                finished.push(id);
            }
        }

        for id in finished {
            self.retire(tree, id, TrackPosition::End);
        }
    }

    /// Stop every running track at once.
    ///
    /// Each track jumps to its end values and its completions run with
    /// [`TrackPosition::Current`], in start order.
    pub fn finish_all(&mut self, tree: &mut SurfaceTree) {
        let running = std::mem::take(&mut self.order);
        if !running.is_empty() {
            tracing::debug!(
                target: targets::TIMELINE,
                count = running.len(),
                "finishing all tracks"
            );
        }
        for id in running {
            self.retire(tree, id, TrackPosition::Current);
        }
    }

    fn retire(&mut self, tree: &mut SurfaceTree, id: TrackId, position: TrackPosition) {
        self.order.retain(|&running| running != id);
        let Some(track) = self.tracks.remove(id) else {
            return;
        };

        for animated in &track.channels {
            let key = (animated.surface, animated.channel);
            if self.owners.get(&key) == Some(&id) {
                self.owners.remove(&key);
                let _ = tree.clear_presentation(animated.surface, animated.channel);
            }
        }

        tracing::debug!(
            target: targets::TIMELINE,
            ?id,
            role = %track.role,
            ?position,
            elapsed = ?track.elapsed,
            completions = track.completions.len(),
            "track finished"
        );

        for completion in track.completions {
            completion(tree, position);
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("running", &self.order.len())
            .field("now", &self.now)
            .field("animated_frames", &self.animated_frames)
            .finish()
    }
}
