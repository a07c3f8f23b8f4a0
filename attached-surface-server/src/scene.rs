//! Seam to the compositor's rendering scene graph
//!
//! Attached surfaces never walk the scene graph themselves. They hold one
//! [`SceneNodeId`] per surface and drive it through the [`SceneGraph`] trait,
//! which the embedding compositor implements on top of whatever scene
//! structure it renders from.

use std::rc::Rc;

use crate::compositor::Drawable;

/// Identity of a node in the compositor's scene graph
///
/// Ids are chosen by the [`SceneGraph`] implementation and are opaque to this
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneNodeId(u64);

impl SceneNodeId {
    /// Wrap a raw id value
    pub fn from_raw(raw: u64) -> SceneNodeId {
        SceneNodeId(raw)
    }

    /// The raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Where attached surface nodes are inserted in the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodePlacement {
    /// As a child of the parent toplevel's node, positioned relative to it.
    ///
    /// The node then moves with the parent for free and is torn down with the
    /// parent's subtree.
    #[default]
    ParentSubtree,
    /// As a child of the scene root, positioned in absolute coordinates.
    Root,
}

/// Who destroys an attached surface's scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOwnership {
    /// The attached surface destroys the node when it is torn down.
    Owned,
    /// The node belongs to the parent's subtree and dies with it.
    OwnedByParent,
}

/// Error returned when the scene graph cannot allocate a node
#[derive(Debug, Clone, thiserror::Error)]
#[error("scene node allocation failed")]
pub struct NodeAllocError;

/// Operations attached surfaces need from the scene graph
///
/// All nodes handed out by [`create_node`][Self::create_node] display the
/// content of one drawable and start out at position (0, 0).
pub trait SceneGraph {
    /// Create a node displaying `drawable`
    ///
    /// The node becomes a child of `parent`, or of the scene root if `parent`
    /// is `None`.
    fn create_node(
        &self,
        drawable: &Rc<Drawable>,
        parent: Option<SceneNodeId>,
    ) -> Result<SceneNodeId, NodeAllocError>;

    /// Move `node` to (`x`, `y`) in its parent's coordinate space
    fn set_position(&self, node: SceneNodeId, x: i32, y: i32);

    /// Show or hide `node`
    fn set_enabled(&self, node: SceneNodeId, enabled: bool);

    /// Remove `node` from the graph and release it
    fn destroy_node(&self, node: SceneNodeId);

    /// Position of `node` in absolute scene coordinates
    fn absolute_position(&self, node: SceneNodeId) -> (i32, i32);

    /// Helper for forwarding a Debug implementation of your [`SceneGraph`]
    /// type
    ///
    /// By default will just print `SceneGraph { .. }`
    fn debug(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for dyn SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.debug(f)
    }
}
