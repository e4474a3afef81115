//! Core systems for Horizon Morph.
//!
//! This crate provides the foundations the transition engine animates:
//!
//! - **Geometry**: `Point`, `Size`, `Rect` and `Delta` value types
//! - **Surface Tree**: the drawable hierarchy, with re-parenting, visibility,
//!   model layers and presentation overrides
//! - **Geometry Translator**: coordinate mapping between surface spaces
//! - **Logging**: tracing targets and a surface tree debug formatter
//!
//! # Example
//!
//! ```
//! use horizon_morph_core::{GeometryTranslator, Point, Rect, SurfaceTree};
//!
//! let mut tree = SurfaceTree::new();
//! let window = tree.create("window", Rect::new(0.0, 0.0, 320.0, 568.0));
//! let list = tree.create_child(window, "list", Rect::new(0.0, 64.0, 320.0, 504.0))?;
//! let cell = tree.create_child(list, "cell", Rect::new(40.0, 56.0, 150.0, 150.0))?;
//!
//! let translator = GeometryTranslator::new(&tree);
//! let frame = translator.frame_in(cell, window)?;
//! assert_eq!(frame.origin, Point::new(40.0, 120.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod surface;
mod types;

pub use error::{GeometryError, GeometryResult, SurfaceError, SurfaceResult};
pub use geometry::{GeometryTranslator, delta};
pub use logging::{PerfSpan, SurfaceTreeDebug, TreeFormatOptions, TreeStyle};
pub use surface::{Layer, LayerChannel, SurfaceId, SurfaceTree};
pub use types::{Delta, GEOMETRY_EPSILON, Point, Rect, Size};
