//! Scoped borrowing of surfaces into the transition overlay.
//!
//! While a transition runs, elements that belong to a screen are moved into
//! the overlay and others are hidden. [`StagingLedger`] remembers where every
//! borrowed element lives and what it hid, and puts everything back in
//! [`StagingLedger::release`].

use horizon_morph_core::logging::targets;
use horizon_morph_core::{Delta, GeometryTranslator, Rect, SurfaceId, SurfaceResult, SurfaceTree};

use crate::error::MorphResult;

/// Where a borrowed element came from.
#[derive(Debug, Clone, Copy)]
struct Home {
    element: SurfaceId,
    parent: Option<SurfaceId>,
    index: Option<usize>,
    frame: Rect,
    offset: Delta,
}

/// Record of everything a transition moved or hid.
#[derive(Debug, Default)]
#[must_use = "borrowed elements stay in the overlay until the ledger is released"]
pub struct StagingLedger {
    borrowed: Vec<Home>,
    hidden: Vec<SurfaceId>,
}

impl StagingLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been borrowed or hidden.
    pub fn is_empty(&self) -> bool {
        self.borrowed.is_empty() && self.hidden.is_empty()
    }

    /// Whether `element` is currently borrowed.
    pub fn is_borrowed(&self, element: SurfaceId) -> bool {
        self.borrowed.iter().any(|home| home.element == element)
    }

    /// Whether `element` was hidden by this ledger.
    pub fn is_hidden(&self, element: SurfaceId) -> bool {
        self.hidden.contains(&element)
    }

    /// Move `element` into `overlay`, keeping it where it is drawn.
    ///
    /// Returns the element's new frame in overlay coordinates. Nothing is
    /// changed if the element's position cannot be mapped into the overlay.
    pub fn borrow_into(
        &mut self,
        tree: &mut SurfaceTree,
        element: SurfaceId,
        overlay: SurfaceId,
    ) -> MorphResult<Rect> {
        let staged = GeometryTranslator::new(tree).frame_in(element, overlay)?;
        let layer = tree.layer(element)?;
        let home = Home {
            element,
            parent: tree.parent(element)?,
            index: tree.sibling_index(element)?,
            frame: layer.frame,
            offset: layer.offset,
        };

        tree.set_parent(element, Some(overlay))?;
        tree.set_frame(element, staged)?;
        tree.set_offset(element, Delta::ZERO)?;
        self.borrowed.push(home);

        tracing::trace!(
            target: targets::TRANSITION,
            ?element,
            parent = ?home.parent,
            ?staged,
            "borrowed into overlay"
        );
        Ok(staged)
    }

    /// Hide `element` until release. Already hidden elements are left alone.
    pub fn hide(&mut self, tree: &mut SurfaceTree, element: SurfaceId) -> MorphResult<()> {
        if !tree.is_hidden(element)? {
            tree.set_hidden(element, true)?;
            self.hidden.push(element);
        }
        Ok(())
    }

    /// Show hidden elements and return borrowed ones to their homes.
    ///
    /// Elements go back to the same parent, sibling index, frame and offset
    /// they had when borrowed. Failures are logged and skipped so that one
    /// destroyed surface does not strand the others.
    pub fn release(self, tree: &mut SurfaceTree) {
        for element in self.hidden {
            if let Err(error) = tree.set_hidden(element, false) {
                tracing::warn!(
                    target: targets::TRANSITION,
                    ?element,
                    %error,
                    "could not unhide element"
                );
            }
        }

        for home in self.borrowed.into_iter().rev() {
            let result = return_home(tree, &home);
            match result {
                Ok(()) => {
                    tracing::trace!(
                        target: targets::TRANSITION,
                        element = ?home.element,
                        "returned home"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        target: targets::TRANSITION,
                        element = ?home.element,
                        %error,
                        "could not return element home"
                    );
                }
            }
        }
    }
}

fn return_home(tree: &mut SurfaceTree, home: &Home) -> SurfaceResult<()> {
    match home.parent {
        Some(parent) => tree.insert_child(parent, home.element, home.index.unwrap_or(usize::MAX))?,
        None => tree.detach(home.element)?,
    }
    tree.set_frame(home.element, home.frame)?;
    tree.set_offset(home.element, home.offset)
}

#[cfg(test)]
mod tests {
    use horizon_morph_core::Point;

    use super::*;

    /// overlay (0,0 320x568)
    /// └── list (0,0 320x568)
    ///     ├── first (0,0 320x100)
    ///     ├── cell (40,120 150x150)
    ///     └── last (0,300 320x100)
    fn layout() -> (SurfaceTree, SurfaceId, SurfaceId, SurfaceId) {
        let mut tree = SurfaceTree::new();
        let overlay = tree.create("overlay", Rect::new(0.0, 0.0, 320.0, 568.0));
        let list = tree
            .create_child(overlay, "list", Rect::new(0.0, 0.0, 320.0, 568.0))
            .unwrap();
        tree.create_child(list, "first", Rect::new(0.0, 0.0, 320.0, 100.0))
            .unwrap();
        let cell = tree
            .create_child(list, "cell", Rect::new(40.0, 120.0, 150.0, 150.0))
            .unwrap();
        tree.create_child(list, "last", Rect::new(0.0, 300.0, 320.0, 100.0))
            .unwrap();
        (tree, overlay, list, cell)
    }

    #[test]
    fn test_borrow_keeps_visual_position() {
        let (mut tree, overlay, list, cell) = layout();
        tree.set_offset(list, Delta::new(0.0, -20.0)).unwrap();
        tree.set_offset(cell, Delta::new(5.0, 0.0)).unwrap();

        let mut ledger = StagingLedger::new();
        let staged = ledger.borrow_into(&mut tree, cell, overlay).unwrap();

        assert_eq!(staged.origin, Point::new(45.0, 100.0));
        assert_eq!(tree.parent(cell).unwrap(), Some(overlay));
        assert_eq!(tree.frame(cell).unwrap(), staged);
        assert_eq!(tree.offset(cell).unwrap(), Delta::ZERO);
        assert!(ledger.is_borrowed(cell));

        ledger.release(&mut tree);
        assert_eq!(tree.parent(cell).unwrap(), Some(list));
        assert_eq!(tree.sibling_index(cell).unwrap(), Some(1));
        assert_eq!(tree.frame(cell).unwrap(), Rect::new(40.0, 120.0, 150.0, 150.0));
        assert_eq!(tree.offset(cell).unwrap(), Delta::new(5.0, 0.0));
    }

    #[test]
    fn test_hide_and_release() {
        let (mut tree, _, list, cell) = layout();
        tree.set_hidden(list, true).unwrap();

        let mut ledger = StagingLedger::new();
        ledger.hide(&mut tree, cell).unwrap();
        ledger.hide(&mut tree, list).unwrap();
        assert!(ledger.is_hidden(cell));
        assert!(!ledger.is_hidden(list));

        ledger.release(&mut tree);
        assert!(!tree.is_hidden(cell).unwrap());
        // Was hidden before staging.
        assert!(tree.is_hidden(list).unwrap());
    }

    #[test]
    fn test_unmappable_borrow_changes_nothing() {
        let (mut tree, _, list, cell) = layout();
        let elsewhere = tree.create("elsewhere", Rect::new(0.0, 0.0, 320.0, 568.0));

        let mut ledger = StagingLedger::new();
        assert!(ledger.borrow_into(&mut tree, cell, elsewhere).is_err());
        assert!(ledger.is_empty());
        assert_eq!(tree.parent(cell).unwrap(), Some(list));
        ledger.release(&mut tree);
    }

    #[test]
    fn test_release_survives_destroyed_surfaces() {
        let (mut tree, overlay, list, cell) = layout();
        let first = tree.children(list).unwrap()[0];

        let mut ledger = StagingLedger::new();
        ledger.borrow_into(&mut tree, cell, overlay).unwrap();
        ledger.borrow_into(&mut tree, first, overlay).unwrap();
        tree.destroy(first).unwrap();

        ledger.release(&mut tree);
        assert_eq!(tree.parent(cell).unwrap(), Some(list));
    }
}
