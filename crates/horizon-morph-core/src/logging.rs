//! Logging and debugging facilities for Horizon Morph.
//!
//! Horizon Morph uses the `tracing` crate for instrumentation. Install a
//! subscriber in your application to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_morph=debug")
//!     .init();
//! ```
//!
//! Use [`SurfaceTreeDebug`] to dump a surface hierarchy, for example the
//! overlay while a transition is staged:
//!
//! ```ignore
//! use horizon_morph_core::logging::SurfaceTreeDebug;
//!
//! println!("{}", SurfaceTreeDebug::new().format_subtree(&tree, overlay)?);
//! ```

use std::fmt::Write as FmtWrite;

use crate::error::SurfaceResult;
use crate::surface::{SurfaceId, SurfaceTree};

/// Span names used throughout Horizon Morph.
pub mod span_names {
    /// One full transition run.
    pub const TRANSITION: &str = "horizon_morph::transition";
    /// One frame of the animation timeline.
    pub const FRAME: &str = "horizon_morph::frame";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_morph_core";
    /// Surface tree target.
    pub const SURFACE: &str = "horizon_morph_core::surface";
    /// Animation timeline target.
    pub const TIMELINE: &str = "horizon_morph::timeline";
    /// Transition choreography target.
    pub const TRANSITION: &str = "horizon_morph::transition";
    /// Navigation host target.
    pub const NAVIGATION: &str = "horizon_morph::navigation";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_morph::config";
}

/// Style options for surface tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for surface tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to print each surface's model frame.
    pub show_frames: bool,
    /// Whether to mark hidden surfaces and active presentation overrides.
    pub show_state: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_frames: true,
            show_state: true,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Names only.
    pub fn minimal() -> Self {
        Self {
            show_frames: false,
            show_state: false,
            ..Default::default()
        }
    }
}

/// Debug utility for rendering a surface hierarchy as text.
#[derive(Debug, Clone, Default)]
pub struct SurfaceTreeDebug {
    options: TreeFormatOptions,
}

impl SurfaceTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, tree: &SurfaceTree, root: SurfaceId) -> SurfaceResult<String> {
        let mut output = String::new();
        self.format_into(tree, root, "", true, 0, &mut output)?;
        Ok(output)
    }

    fn format_into(
        &self,
        tree: &SurfaceTree,
        id: SurfaceId,
        prefix: &str,
        is_last: bool,
        depth: usize,
        output: &mut String,
    ) -> SurfaceResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let (corner, tee, pipe) = match self.options.style {
            TreeStyle::Ascii => ("`-- ", "+-- ", "|   "),
            TreeStyle::Unicode => (
                "\u{2514}\u{2500}\u{2500} ",
                "\u{251c}\u{2500}\u{2500} ",
                "\u{2502}   ",
            ),
        };

        output.push_str(prefix);
        if depth > 0 {
            output.push_str(if is_last { corner } else { tee });
        }

        let name = tree.name(id)?;
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });

        if self.options.show_frames {
            let frame = tree.frame(id)?;
            // Writing to a String cannot fail.
            let _ = write!(
                output,
                " ({}, {} {}x{})",
                frame.origin.x, frame.origin.y, frame.size.width, frame.size.height
            );
        }
        if self.options.show_state {
            if tree.is_hidden(id)? {
                output.push_str(" [hidden]");
            }
            if tree.is_presenting(id)? {
                output.push_str(" [animating]");
            }
        }
        output.push('\n');

        let child_prefix = if depth == 0 {
            String::new()
        } else if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}{pipe}")
        };

        let children = tree.children(id)?;
        for (i, &child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            self.format_into(tree, child, &child_prefix, last, depth + 1, output)?;
        }
        Ok(())
    }
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a `perf` span for the named operation.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_morph::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Trace-level event on the `horizon_morph` target.
#[macro_export]
macro_rules! morph_trace {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "horizon_morph", $($arg)*)
    };
}

/// Debug-level event on the `horizon_morph` target.
#[macro_export]
macro_rules! morph_debug {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "horizon_morph", $($arg)*)
    };
}

/// Warn-level event on the `horizon_morph` target.
#[macro_export]
macro_rules! morph_warn {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "horizon_morph", $($arg)*)
    };
}
