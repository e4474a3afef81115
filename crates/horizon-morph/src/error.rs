//! Error types for the transition engine.

use std::fmt;

use horizon_morph_core::{GeometryError, SurfaceError};
use thiserror::Error;

use crate::animation::TrackRole;
use crate::transition::ScreenRole;

/// The part of a participant that was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantPart {
    /// The context did not supply a screen at all.
    Screen,
    /// The screen has no root container.
    Container,
    /// The screen has no hero element.
    HeroElement,
}

impl fmt::Display for ParticipantPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Screen => write!(f, "screen"),
            Self::Container => write!(f, "container"),
            Self::HeroElement => write!(f, "hero element"),
        }
    }
}

/// Errors that can occur while configuring or running transitions.
#[derive(Error, Debug)]
pub enum MorphError {
    /// A participating screen lacks a required surface.
    #[error("{role} participant is missing its {part}")]
    MissingParticipant {
        role: ScreenRole,
        part: ParticipantPart,
    },

    /// Coordinate mapping failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A surface tree operation failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// A track was started more than once.
    #[error("{track} track was started twice")]
    DoubleStart { track: TrackRole },

    /// The navigation host already has a transition in flight.
    #[error("a transition is already in flight")]
    TransitionInFlight,

    /// There is no screen to pop back to.
    #[error("navigation stack has no screen to return to")]
    EmptyStack,

    /// The configuration holds out-of-range values.
    #[error("invalid transition configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("failed to parse transition configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read transition configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl MorphError {
    /// Whether this error only downgrades a transition to a direct swap.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingParticipant { .. }
                | Self::Geometry(GeometryError::UndefinedCoordinateMapping { .. })
        )
    }
}

/// Result type for transition engine operations.
pub type MorphResult<T> = Result<T, MorphError>;
