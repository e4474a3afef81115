//! Coordinate mapping between surfaces.
//!
//! Each surface has a local space whose origin is the surface's top-left
//! corner. Mapping a point walks up the tree, adding every ancestor's frame
//! origin and offset, until both spaces meet at their common root.
//!
//! Results are only valid for the layout at call time: the translator holds
//! no state and reads the model layer, never presentation overrides.

use glam::Vec2;

use crate::error::{GeometryError, GeometryResult};
use crate::logging::targets;
use crate::surface::{SurfaceId, SurfaceTree};
use crate::types::{Delta, Point, Rect};

/// Stateless view over a [`SurfaceTree`] that converts between surface spaces.
#[derive(Debug, Clone, Copy)]
pub struct GeometryTranslator<'a> {
    tree: &'a SurfaceTree,
}

impl<'a> GeometryTranslator<'a> {
    /// Create a translator reading the given tree.
    pub fn new(tree: &'a SurfaceTree) -> Self {
        Self { tree }
    }

    /// Position of `space`'s local origin in its root's coordinate space.
    fn origin_in_root(&self, space: SurfaceId) -> GeometryResult<(SurfaceId, Vec2)> {
        let mut position = Vec2::ZERO;
        let mut current = space;
        loop {
            let layer = self
                .tree
                .layer(current)
                .map_err(|_| GeometryError::InvalidSurface(current))?;
            match self.tree.parent(current)? {
                Some(parent) => {
                    position += layer.frame.origin.to_vec2() + layer.offset.to_vec2();
                    current = parent;
                }
                // A root's own frame places it in window space, which every
                // surface of the tree shares, so it cancels out.
                None => return Ok((current, position)),
            }
        }
    }

    /// Map a point from `from`'s local space into `to`'s local space.
    ///
    /// Fails with [`GeometryError::UndefinedCoordinateMapping`] when the two
    /// surfaces are not part of the same tree.
    pub fn convert_point(
        &self,
        point: Point,
        from: SurfaceId,
        to: SurfaceId,
    ) -> GeometryResult<Point> {
        let (from_root, from_origin) = self.origin_in_root(from)?;
        let (to_root, to_origin) = self.origin_in_root(to)?;
        if from_root != to_root {
            tracing::debug!(
                target: targets::CORE,
                ?from,
                ?to,
                ?from_root,
                ?to_root,
                "spaces have no common root"
            );
            return Err(GeometryError::UndefinedCoordinateMapping { from, to });
        }
        Ok(Point::from_vec2(point.to_vec2() + from_origin - to_origin))
    }

    /// Map a rectangle's origin between spaces, keeping its size.
    pub fn convert_rect(&self, rect: Rect, from: SurfaceId, to: SurfaceId) -> GeometryResult<Rect> {
        let origin = self.convert_point(rect.origin, from, to)?;
        Ok(rect.with_origin(origin))
    }

    /// Where `surface` is drawn, expressed in `space`'s coordinates.
    ///
    /// Includes the surface's own offset.
    pub fn frame_in(&self, surface: SurfaceId, space: SurfaceId) -> GeometryResult<Rect> {
        let size = self.tree.frame(surface)?.size;
        let origin = self.convert_point(Point::ZERO, surface, space)?;
        Ok(Rect::from_origin_size(origin, size))
    }
}

/// The origin displacement that moves `from` onto `to`.
///
/// Sizes are ignored: translation and resizing are animated independently.
#[inline]
pub fn delta(from: Rect, to: Rect) -> Delta {
    Delta::between(from.origin, to.origin)
}
