//! Error types for the core crate.

use thiserror::Error;

use crate::surface::SurfaceId;

/// Errors raised by surface tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface ID is invalid or the surface has been destroyed.
    #[error("invalid or destroyed surface {0:?}")]
    InvalidSurface(SurfaceId),

    /// Attempted to make a surface its own parent or ancestor.
    #[error("cannot make {child:?} a descendant of itself via {parent:?}")]
    CircularParentage { child: SurfaceId, parent: SurfaceId },
}

/// Errors raised by the geometry translator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The two spaces do not share a common ancestor, so no mapping exists.
    #[error("no coordinate mapping between {from:?} and {to:?}: surfaces are not in the same tree")]
    UndefinedCoordinateMapping { from: SurfaceId, to: SurfaceId },

    /// One of the spaces does not exist.
    #[error("invalid or destroyed surface {0:?}")]
    InvalidSurface(SurfaceId),
}

impl From<SurfaceError> for GeometryError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::InvalidSurface(id) => Self::InvalidSurface(id),
            SurfaceError::CircularParentage { child, .. } => Self::InvalidSurface(child),
        }
    }
}

/// Result type for surface tree operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Result type for coordinate mapping.
pub type GeometryResult<T> = Result<T, GeometryError>;
