//! Surface tree for Horizon Morph.
//!
//! A surface is a node of the drawable hierarchy that screens are built from.
//! The tree provides:
//! - Stable surface identifiers via arena-based storage
//! - Parent-child ownership with ordered children and cascade destroy
//! - Re-parenting that preserves the rest of the hierarchy
//! - Model layer state (frame, offset, alpha, corner radius, visibility)
//! - Per-channel presentation overrides written by running animations
//!
//! # Model and presentation
//!
//! Every animatable attribute exists twice. The *model* value is what layout,
//! coordinate mapping and mutation closures read and write. The *presentation*
//! value is an optional override owned by the animation timeline while a track
//! interpolates that attribute; renderers read [`SurfaceTree::presented_layer`].

use slotmap::{SlotMap, new_key_type};

use crate::error::{SurfaceError, SurfaceResult};
use crate::logging::targets;
use crate::types::{Delta, Rect};

new_key_type! {
    /// A unique identifier for a surface in a [`SurfaceTree`].
    ///
    /// Identifiers stay valid while the tree is re-arranged and become invalid
    /// once the surface is destroyed.
    pub struct SurfaceId;
}

/// One scalar animatable attribute of a [`Layer`].
///
/// Animations work per channel so that two tracks can animate different
/// components of the same attribute (for example the horizontal and vertical
/// halves of an offset) without fighting over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerChannel {
    X,
    Y,
    Width,
    Height,
    OffsetX,
    OffsetY,
    Alpha,
    CornerRadius,
}

impl LayerChannel {
    /// Number of channels in a layer.
    pub const COUNT: usize = 8;

    /// All channels, in storage order.
    pub const ALL: [LayerChannel; Self::COUNT] = [
        LayerChannel::X,
        LayerChannel::Y,
        LayerChannel::Width,
        LayerChannel::Height,
        LayerChannel::OffsetX,
        LayerChannel::OffsetY,
        LayerChannel::Alpha,
        LayerChannel::CornerRadius,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// The animatable state of a surface.
///
/// Laid out as eight consecutive `f32`s in [`LayerChannel`] order.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Layer {
    /// Frame in the parent surface's coordinate space.
    pub frame: Rect,
    /// Translation applied on top of the frame.
    pub offset: Delta,
    /// Opacity from 0.0 to 1.0.
    pub alpha: f32,
    /// Corner radius in points.
    pub corner_radius: f32,
}

impl Layer {
    /// A fully opaque layer with the given frame and no offset.
    pub fn with_frame(frame: Rect) -> Self {
        Self {
            frame,
            offset: Delta::ZERO,
            alpha: 1.0,
            corner_radius: 0.0,
        }
    }

    /// Read a single channel.
    #[inline]
    pub fn channel(&self, channel: LayerChannel) -> f32 {
        bytemuck::cast_ref::<Layer, [f32; LayerChannel::COUNT]>(self)[channel.index()]
    }

    /// Write a single channel.
    #[inline]
    pub fn set_channel(&mut self, channel: LayerChannel, value: f32) {
        bytemuck::cast_mut::<Layer, [f32; LayerChannel::COUNT]>(self)[channel.index()] = value;
    }

    /// The frame moved by the offset, i.e. where the surface is drawn.
    #[inline]
    pub fn visual_frame(&self) -> Rect {
        self.frame.translated(self.offset)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::with_frame(Rect::ZERO)
    }
}

/// Internal data stored for each surface.
struct SurfaceData {
    /// Human-readable name for debugging.
    name: String,
    /// Parent surface (if any).
    parent: Option<SurfaceId>,
    /// Child surfaces in back-to-front order.
    children: Vec<SurfaceId>,
    /// Model layer state.
    layer: Layer,
    /// Presentation overrides, indexed by channel.
    presentation: [Option<f32>; LayerChannel::COUNT],
    /// Whether this surface is hidden (its own state, not considering ancestors).
    hidden: bool,
}

impl SurfaceData {
    fn new(name: String, frame: Rect) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            layer: Layer::with_frame(frame),
            presentation: [None; LayerChannel::COUNT],
            hidden: false,
        }
    }
}

/// The tree of all surfaces taking part in presentation.
///
/// Uses arena-based storage via SlotMap for stable identifiers and cheap
/// re-parenting.
pub struct SurfaceTree {
    surfaces: SlotMap<SurfaceId, SurfaceData>,
}

impl SurfaceTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            surfaces: SlotMap::with_key(),
        }
    }

    /// Create a new root surface.
    pub fn create(&mut self, name: impl Into<String>, frame: Rect) -> SurfaceId {
        let name = name.into();
        let id = self.surfaces.insert(SurfaceData::new(name, frame));
        tracing::trace!(target: targets::SURFACE, ?id, "created surface");
        id
    }

    /// Create a surface and append it to `parent`.
    pub fn create_child(
        &mut self,
        parent: SurfaceId,
        name: impl Into<String>,
        frame: Rect,
    ) -> SurfaceResult<SurfaceId> {
        if !self.contains(parent) {
            return Err(SurfaceError::InvalidSurface(parent));
        }
        let id = self.create(name, frame);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Remove a surface and all its descendants.
    #[tracing::instrument(skip(self), target = "horizon_morph_core::surface", level = "trace")]
    pub fn destroy(&mut self, id: SurfaceId) -> SurfaceResult<()> {
        let descendants = self.depth_first_preorder(id)?;
        self.unlink_from_parent(id);
        for surface in descendants {
            self.surfaces.remove(surface);
        }
        Ok(())
    }

    /// Check if a surface exists.
    #[inline]
    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(id)
    }

    /// Number of live surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether the tree has no surfaces.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    fn data(&self, id: SurfaceId) -> SurfaceResult<&SurfaceData> {
        self.surfaces.get(id).ok_or(SurfaceError::InvalidSurface(id))
    }

    fn data_mut(&mut self, id: SurfaceId) -> SurfaceResult<&mut SurfaceData> {
        self.surfaces
            .get_mut(id)
            .ok_or(SurfaceError::InvalidSurface(id))
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Set the parent of a surface, appending it as the front-most child.
    ///
    /// Passing `None` detaches the surface, making it a root.
    pub fn set_parent(&mut self, id: SurfaceId, parent: Option<SurfaceId>) -> SurfaceResult<()> {
        match parent {
            Some(parent_id) => {
                let len = self.data(parent_id)?.children.len();
                self.insert_child(parent_id, id, len)
            }
            None => {
                self.data(id)?;
                self.unlink_from_parent(id);
                Ok(())
            }
        }
    }

    /// Insert `child` into `parent` at `index`, clamped to the child count.
    ///
    /// Moving a surface within its current parent is allowed.
    pub fn insert_child(
        &mut self,
        parent: SurfaceId,
        child: SurfaceId,
        index: usize,
    ) -> SurfaceResult<()> {
        self.data(child)?;
        self.data(parent)?;
        if self.is_ancestor_of(child, parent) {
            return Err(SurfaceError::CircularParentage { child, parent });
        }

        self.unlink_from_parent(child);

        let siblings = &mut self.data_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.data_mut(child)?.parent = Some(parent);

        tracing::trace!(target: targets::SURFACE, ?child, ?parent, index, "re-parented surface");
        Ok(())
    }

    /// Detach a surface from its parent.
    pub fn detach(&mut self, id: SurfaceId) -> SurfaceResult<()> {
        self.set_parent(id, None)
    }

    /// Move a surface to the front of its siblings.
    pub fn raise(&mut self, id: SurfaceId) -> SurfaceResult<()> {
        if let Some(parent) = self.parent(id)? {
            self.set_parent(id, Some(parent))?;
        }
        Ok(())
    }

    fn unlink_from_parent(&mut self, id: SurfaceId) {
        let old_parent = self.surfaces.get(id).and_then(|d| d.parent);
        if let Some(parent_id) = old_parent {
            if let Some(parent) = self.surfaces.get_mut(parent_id) {
                parent.children.retain(|&child| child != id);
            }
        }
        if let Some(data) = self.surfaces.get_mut(id) {
            data.parent = None;
        }
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, potential_ancestor: SurfaceId, id: SurfaceId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.surfaces.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Get the parent of a surface.
    pub fn parent(&self, id: SurfaceId) -> SurfaceResult<Option<SurfaceId>> {
        Ok(self.data(id)?.parent)
    }

    /// Get the children of a surface, back to front.
    pub fn children(&self, id: SurfaceId) -> SurfaceResult<&[SurfaceId]> {
        Ok(self.data(id)?.children.as_slice())
    }

    /// Position of a surface among its siblings, if it has a parent.
    pub fn sibling_index(&self, id: SurfaceId) -> SurfaceResult<Option<usize>> {
        let Some(parent) = self.parent(id)? else {
            return Ok(None);
        };
        Ok(self
            .children(parent)?
            .iter()
            .position(|&child| child == id))
    }

    /// All ancestors from the direct parent up to the root.
    pub fn ancestors(&self, id: SurfaceId) -> SurfaceResult<Vec<SurfaceId>> {
        let mut result = Vec::new();
        let mut current = self.parent(id)?;
        while let Some(parent) = current {
            result.push(parent);
            current = self.parent(parent)?;
        }
        Ok(result)
    }

    /// The root of the tree containing `id`.
    pub fn root_of(&self, id: SurfaceId) -> SurfaceResult<SurfaceId> {
        Ok(self.ancestors(id)?.last().copied().unwrap_or(id))
    }

    /// Check whether `descendant` lies in the subtree rooted at `ancestor`.
    pub fn is_descendant_of(&self, descendant: SurfaceId, ancestor: SurfaceId) -> bool {
        self.is_ancestor_of(ancestor, descendant)
    }

    /// All surfaces without a parent.
    pub fn roots(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.surfaces
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| id)
    }

    /// The subtree rooted at `id` in depth-first pre-order (including `id`).
    pub fn depth_first_preorder(&self, id: SurfaceId) -> SurfaceResult<Vec<SurfaceId>> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current)?.iter().rev().copied());
        }
        Ok(result)
    }

    // =========================================================================
    // Naming and visibility
    // =========================================================================

    /// Get the surface's name.
    pub fn name(&self, id: SurfaceId) -> SurfaceResult<&str> {
        Ok(self.data(id)?.name.as_str())
    }

    /// Rename a surface.
    pub fn set_name(&mut self, id: SurfaceId, name: impl Into<String>) -> SurfaceResult<()> {
        self.data_mut(id)?.name = name.into();
        Ok(())
    }

    /// Whether the surface itself is hidden.
    pub fn is_hidden(&self, id: SurfaceId) -> SurfaceResult<bool> {
        Ok(self.data(id)?.hidden)
    }

    /// Hide or show a surface.
    pub fn set_hidden(&mut self, id: SurfaceId, hidden: bool) -> SurfaceResult<()> {
        self.data_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Whether the surface and all its ancestors are shown.
    pub fn is_effectively_visible(&self, id: SurfaceId) -> SurfaceResult<bool> {
        if self.is_hidden(id)? {
            return Ok(false);
        }
        for ancestor in self.ancestors(id)? {
            if self.is_hidden(ancestor)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // =========================================================================
    // Model layer
    // =========================================================================

    /// The model layer of a surface.
    pub fn layer(&self, id: SurfaceId) -> SurfaceResult<Layer> {
        Ok(self.data(id)?.layer)
    }

    /// Replace the model layer of a surface.
    pub fn set_layer(&mut self, id: SurfaceId, layer: Layer) -> SurfaceResult<()> {
        self.data_mut(id)?.layer = layer;
        Ok(())
    }

    /// Frame in the parent's coordinate space.
    pub fn frame(&self, id: SurfaceId) -> SurfaceResult<Rect> {
        Ok(self.data(id)?.layer.frame)
    }

    /// Set the frame in the parent's coordinate space.
    pub fn set_frame(&mut self, id: SurfaceId, frame: Rect) -> SurfaceResult<()> {
        self.data_mut(id)?.layer.frame = frame;
        Ok(())
    }

    /// Translation applied on top of the frame.
    pub fn offset(&self, id: SurfaceId) -> SurfaceResult<Delta> {
        Ok(self.data(id)?.layer.offset)
    }

    /// Set the translation applied on top of the frame.
    pub fn set_offset(&mut self, id: SurfaceId, offset: Delta) -> SurfaceResult<()> {
        self.data_mut(id)?.layer.offset = offset;
        Ok(())
    }

    /// Opacity of the surface.
    pub fn alpha(&self, id: SurfaceId) -> SurfaceResult<f32> {
        Ok(self.data(id)?.layer.alpha)
    }

    /// Set the opacity of the surface.
    pub fn set_alpha(&mut self, id: SurfaceId, alpha: f32) -> SurfaceResult<()> {
        self.data_mut(id)?.layer.alpha = alpha;
        Ok(())
    }

    /// Corner radius of the surface.
    pub fn corner_radius(&self, id: SurfaceId) -> SurfaceResult<f32> {
        Ok(self.data(id)?.layer.corner_radius)
    }

    /// Set the corner radius of the surface.
    pub fn set_corner_radius(&mut self, id: SurfaceId, radius: f32) -> SurfaceResult<()> {
        self.data_mut(id)?.layer.corner_radius = radius;
        Ok(())
    }

    /// Copy every surface's model layer.
    ///
    /// Used by animation tracks to diff the tree around their mutation closures.
    pub fn snapshot_layers(&self) -> Vec<(SurfaceId, Layer)> {
        self.surfaces
            .iter()
            .map(|(id, data)| (id, data.layer))
            .collect()
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Override one channel of what is drawn, leaving the model untouched.
    pub fn set_presentation(
        &mut self,
        id: SurfaceId,
        channel: LayerChannel,
        value: f32,
    ) -> SurfaceResult<()> {
        self.data_mut(id)?.presentation[channel.index()] = Some(value);
        Ok(())
    }

    /// Drop a presentation override so the model value is drawn again.
    pub fn clear_presentation(
        &mut self,
        id: SurfaceId,
        channel: LayerChannel,
    ) -> SurfaceResult<()> {
        self.data_mut(id)?.presentation[channel.index()] = None;
        Ok(())
    }

    /// Whether any channel of the surface is currently overridden.
    pub fn is_presenting(&self, id: SurfaceId) -> SurfaceResult<bool> {
        Ok(self.data(id)?.presentation.iter().any(Option::is_some))
    }

    /// The layer as it should be drawn right now.
    pub fn presented_layer(&self, id: SurfaceId) -> SurfaceResult<Layer> {
        let data = self.data(id)?;
        let mut layer = data.layer;
        for channel in LayerChannel::ALL {
            if let Some(value) = data.presentation[channel.index()] {
                layer.set_channel(channel, value);
            }
        }
        Ok(layer)
    }
}

impl Default for SurfaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SurfaceTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceTree")
            .field("surfaces", &self.surfaces.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_root() -> (SurfaceTree, SurfaceId) {
        let mut tree = SurfaceTree::new();
        let root = tree.create("root", Rect::new(0.0, 0.0, 320.0, 568.0));
        (tree, root)
    }

    #[test]
    fn test_create_child() {
        let (mut tree, root) = tree_with_root();
        let child = tree
            .create_child(root, "child", Rect::new(10.0, 10.0, 50.0, 50.0))
            .unwrap();
        assert_eq!(tree.parent(child).unwrap(), Some(root));
        assert_eq!(tree.children(root).unwrap(), &[child]);
        assert_eq!(tree.name(child).unwrap(), "child");
    }

    #[test]
    fn test_reparent_moves_between_parents() {
        let (mut tree, root) = tree_with_root();
        let a = tree.create_child(root, "a", Rect::ZERO).unwrap();
        let b = tree.create_child(root, "b", Rect::ZERO).unwrap();
        let leaf = tree.create_child(a, "leaf", Rect::ZERO).unwrap();

        tree.set_parent(leaf, Some(b)).unwrap();
        assert!(tree.children(a).unwrap().is_empty());
        assert_eq!(tree.children(b).unwrap(), &[leaf]);
        assert_eq!(tree.ancestors(leaf).unwrap(), vec![b, root]);
    }

    #[test]
    fn test_insert_child_at_index() {
        let (mut tree, root) = tree_with_root();
        let a = tree.create_child(root, "a", Rect::ZERO).unwrap();
        let b = tree.create_child(root, "b", Rect::ZERO).unwrap();
        let c = tree.create("c", Rect::ZERO);

        tree.insert_child(root, c, 1).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[a, c, b]);
        assert_eq!(tree.sibling_index(c).unwrap(), Some(1));

        // Index is clamped.
        tree.insert_child(root, a, 99).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[c, b, a]);
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let (mut tree, root) = tree_with_root();
        let child = tree.create_child(root, "child", Rect::ZERO).unwrap();
        assert_eq!(
            tree.set_parent(root, Some(child)),
            Err(SurfaceError::CircularParentage {
                child: root,
                parent: child
            })
        );
        assert_eq!(
            tree.set_parent(root, Some(root)),
            Err(SurfaceError::CircularParentage {
                child: root,
                parent: root
            })
        );
    }

    #[test]
    fn test_raise_and_detach() {
        let (mut tree, root) = tree_with_root();
        let a = tree.create_child(root, "a", Rect::ZERO).unwrap();
        let b = tree.create_child(root, "b", Rect::ZERO).unwrap();

        tree.raise(a).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[b, a]);

        tree.detach(a).unwrap();
        assert_eq!(tree.parent(a).unwrap(), None);
        assert_eq!(tree.children(root).unwrap(), &[b]);
        assert_eq!(tree.roots().count(), 2);
    }

    #[test]
    fn test_cascade_destroy() {
        let (mut tree, root) = tree_with_root();
        let a = tree.create_child(root, "a", Rect::ZERO).unwrap();
        let leaf = tree.create_child(a, "leaf", Rect::ZERO).unwrap();

        tree.destroy(a).unwrap();
        assert!(!tree.contains(a));
        assert!(!tree.contains(leaf));
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_effective_visibility() {
        let (mut tree, root) = tree_with_root();
        let child = tree.create_child(root, "child", Rect::ZERO).unwrap();
        assert!(tree.is_effectively_visible(child).unwrap());

        tree.set_hidden(root, true).unwrap();
        assert!(!tree.is_hidden(child).unwrap());
        assert!(!tree.is_effectively_visible(child).unwrap());
    }

    #[test]
    fn test_layer_channels() {
        let mut layer = Layer::with_frame(Rect::new(1.0, 2.0, 3.0, 4.0));
        layer.offset = Delta::new(5.0, 6.0);
        layer.corner_radius = 8.0;

        let values: Vec<f32> = LayerChannel::ALL.iter().map(|&c| layer.channel(c)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 1.0, 8.0]);

        layer.set_channel(LayerChannel::Height, 40.0);
        assert_eq!(layer.frame.size.height, 40.0);
    }

    #[test]
    fn test_presentation_overrides_model() {
        let (mut tree, root) = tree_with_root();
        tree.set_presentation(root, LayerChannel::Alpha, 0.25).unwrap();

        assert_eq!(tree.alpha(root).unwrap(), 1.0);
        assert_eq!(tree.presented_layer(root).unwrap().alpha, 0.25);
        assert!(tree.is_presenting(root).unwrap());

        tree.clear_presentation(root, LayerChannel::Alpha).unwrap();
        assert_eq!(tree.presented_layer(root).unwrap().alpha, 1.0);
        assert!(!tree.is_presenting(root).unwrap());
    }

    #[test]
    fn test_invalid_surface() {
        let (mut tree, root) = tree_with_root();
        tree.destroy(root).unwrap();
        assert_eq!(tree.frame(root), Err(SurfaceError::InvalidSurface(root)));
    }
}
