//! The position and size tracks of one transition.

use std::time::Duration;

use horizon_morph_core::{SurfaceTree, morph_debug};

use super::curve::TimingCurve;
use super::timeline::{Timeline, TrackId};
use super::track::{AnimationTrack, TrackRole};
use crate::config::TransitionConfig;
use crate::error::MorphResult;

/// Two independently timed tracks that start together.
#[derive(Debug)]
pub struct TrackPair {
    /// Drives translation.
    pub position: AnimationTrack,
    /// Drives size.
    pub size: AnimationTrack,
}

/// Ids of a started [`TrackPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIds {
    /// The position track.
    pub position: TrackId,
    /// The size track.
    pub size: TrackId,
}

impl TrackPair {
    /// Create a pair with explicit timing.
    pub fn new(
        positioning: Duration,
        positioning_curve: TimingCurve,
        resizing: Duration,
        resizing_curve: TimingCurve,
    ) -> Self {
        Self {
            position: AnimationTrack::new(TrackRole::Position, positioning, positioning_curve),
            size: AnimationTrack::new(TrackRole::Size, resizing, resizing_curve),
        }
    }

    /// Create a pair timed by a configuration.
    pub fn from_config(config: &TransitionConfig) -> Self {
        Self::new(
            config.positioning(),
            config.positioning_curve,
            config.resizing(),
            config.resizing_curve,
        )
    }

    /// The track with the longer configured duration. Ties go to the size track.
    pub fn longer_role(&self) -> TrackRole {
        if self.position.duration() > self.size.duration() {
            TrackRole::Position
        } else {
            TrackRole::Size
        }
    }

    /// Mutable access to the longer track.
    pub fn longer_mut(&mut self) -> &mut AnimationTrack {
        match self.longer_role() {
            TrackRole::Position => &mut self.position,
            TrackRole::Size => &mut self.size,
        }
    }

    /// The duration of the whole pair.
    pub fn total_duration(&self) -> Duration {
        self.position.duration().max(self.size.duration())
    }

    /// Start both tracks in one step, position first.
    pub fn start(
        mut self,
        timeline: &mut Timeline,
        tree: &mut SurfaceTree,
    ) -> MorphResult<PairIds> {
        let position = self.position.start(timeline, tree)?;
        let size = self.size.start(timeline, tree)?;
        morph_debug!(?position, ?size, "track pair started");
        Ok(PairIds { position, size })
    }
}
