//! The capability contract screens implement to take part in transitions.

use horizon_morph_core::{Point, Rect, SurfaceId, SurfaceTree};

use crate::animation::AnimationTrack;

/// A screen that can take part in an expand/collapse transition.
///
/// Only [`container`](Self::container) and [`hero_element`](Self::hero_element)
/// are required. The hooks default to doing nothing; a screen overrides them to
/// layer its own mutations and completions onto the tracks of a transition.
/// Hooks receive tracks before they start and can only add to them: starting
/// a track needs the [`Timeline`](crate::animation::Timeline), which hooks
/// never see.
///
/// All hooks run synchronously on the thread that runs the transition.
///
/// # Example
///
/// ```
/// use horizon_morph::animation::AnimationTrack;
/// use horizon_morph::transition::Animatable;
/// use horizon_morph::{Rect, SurfaceId};
///
/// struct DetailScreen {
///     root: SurfaceId,
///     photo: SurfaceId,
///     caption: SurfaceId,
/// }
///
/// impl Animatable for DetailScreen {
///     fn container(&self) -> Option<SurfaceId> {
///         Some(self.root)
///     }
///
///     fn hero_element(&self) -> Option<SurfaceId> {
///         Some(self.photo)
///     }
///
///     fn on_will_present(
///         &self,
///         _size: &mut AnimationTrack,
///         position: &mut AnimationTrack,
///         _from: Rect,
///         _to: Rect,
///     ) {
///         let caption = self.caption;
///         position.add_mutations(move |tree| {
///             let _ = tree.set_alpha(caption, 1.0);
///         });
///     }
/// }
/// ```
pub trait Animatable {
    /// The root surface of the screen.
    ///
    /// A screen without one cannot be animated and is swapped in directly.
    fn container(&self) -> Option<SurfaceId>;

    /// The element that visually morphs between the two screens.
    fn hero_element(&self) -> Option<SurfaceId>;

    /// Name used in logs.
    fn label(&self) -> &str {
        "screen"
    }

    /// Called on the destination screen of a push before the tracks start.
    ///
    /// `from` and `to` are the moving rectangle's start and end, in overlay
    /// coordinates.
    fn on_will_present(
        &self,
        size: &mut AnimationTrack,
        position: &mut AnimationTrack,
        from: Rect,
        to: Rect,
    ) {
        let _ = (size, position, from, to);
    }

    /// Called on the departing screen of a pop before the tracks start.
    fn on_will_dismiss(
        &self,
        size: &mut AnimationTrack,
        position: &mut AnimationTrack,
        from: Rect,
        to: Rect,
    ) {
        let _ = (size, position, from, to);
    }

    /// Called on the moving screen with the position track only.
    fn on_positioning(&self, position: &mut AnimationTrack, from: Point, to: Point) {
        let _ = (position, from, to);
    }

    /// Called on the moving screen with the size track only.
    fn on_resizing(&self, size: &mut AnimationTrack, from: Rect, to: Rect) {
        let _ = (size, from, to);
    }

    /// Called on both screens once the transition has been torn down.
    ///
    /// Borrowed and hidden elements are already back in place. `completed` is
    /// the same flag reported to the host.
    fn on_transition_complete(&self, tree: &mut SurfaceTree, completed: bool) {
        let _ = (tree, completed);
    }
}
