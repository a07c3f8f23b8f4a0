//! Collaborator objects of the surrounding compositor
//!
//! These are the pieces of compositor state an attached surface hangs off:
//! the [`Drawable`] whose content it shows, the [`Toplevel`] it is positioned
//! against, and the [`OutputLayout`] bounding the space anchored surfaces may
//! grow into. The embedding compositor owns these objects and drives them
//! (committing content, moving windows, destroying both); this crate only
//! reads them and listens to their signals.

use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::{Rect, Size};
use crate::scene::SceneNodeId;
use crate::signal::{Signal, Subscription};

/// A client content surface
#[derive(Debug)]
pub struct Drawable {
    alive: Cell<bool>,
    role: Cell<Option<&'static str>>,
    committed_size: Cell<Size>,
    commit: Signal<()>,
    destroyed: Signal<()>,
}

impl Drawable {
    /// Create a drawable with no committed content and no role
    pub fn new() -> Rc<Drawable> {
        Rc::new(Drawable {
            alive: Cell::new(true),
            role: Cell::new(None),
            committed_size: Cell::new(Size::default()),
            commit: Signal::new(),
            destroyed: Signal::new(),
        })
    }

    /// Whether the backing client surface still exists
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// The role currently claimed on this drawable, if any
    pub fn role(&self) -> Option<&'static str> {
        self.role.get()
    }

    /// Claim `role` on this drawable
    ///
    /// A drawable carries at most one role at a time; returns false if one is
    /// already claimed.
    pub fn claim_role(&self, role: &'static str) -> bool {
        if self.role.get().is_none() {
            self.role.set(Some(role));
            true
        } else {
            false
        }
    }

    /// Release the current role, making the drawable attachable again
    pub fn release_role(&self) {
        self.role.set(None);
    }

    /// Size of the most recently committed content
    pub fn committed_size(&self) -> Size {
        self.committed_size.get()
    }

    /// Commit content of `size` to this drawable
    ///
    /// Listeners are notified after the committed size is updated.
    pub fn commit(&self, size: Size) {
        self.committed_size.set(size);
        self.commit.emit(&());
    }

    /// Destroy this drawable
    ///
    /// Notifies destruction listeners; further calls do nothing.
    pub fn destroy(&self) {
        if self.alive.replace(false) {
            self.destroyed.emit(&());
        }
    }

    /// Subscribe to content commits
    pub fn on_commit(&self, callback: impl Fn(&()) + 'static) -> Subscription {
        self.commit.subscribe(callback)
    }

    /// Subscribe to destruction
    pub fn on_destroy(&self, callback: impl Fn(&()) + 'static) -> Subscription {
        self.destroyed.subscribe(callback)
    }
}

/// A toplevel window
#[derive(Debug)]
pub struct Toplevel {
    alive: Cell<bool>,
    geometry: Cell<Rect>,
    scene_node: Cell<Option<SceneNodeId>>,
    destroyed: Signal<()>,
}

impl Toplevel {
    /// Create an unmapped toplevel at `geometry`
    ///
    /// The window has no scene node until the compositor maps it with
    /// [`set_scene_node`][Toplevel::set_scene_node].
    pub fn new(geometry: Rect) -> Rc<Toplevel> {
        Rc::new(Toplevel {
            alive: Cell::new(true),
            geometry: Cell::new(geometry),
            scene_node: Cell::new(None),
            destroyed: Signal::new(),
        })
    }

    /// Whether the window still exists
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Current absolute geometry of the window
    pub fn geometry(&self) -> Rect {
        self.geometry.get()
    }

    /// Update the window's absolute geometry
    ///
    /// After moving or resizing windows the compositor should invoke
    /// [`refresh_anchored_positions`][crate::AttachedSurfaceManager::refresh_anchored_positions]
    /// so anchored surfaces track the change.
    pub fn set_geometry(&self, geometry: Rect) {
        self.geometry.set(geometry);
    }

    /// The window's node in the scene graph, if any
    pub fn scene_node(&self) -> Option<SceneNodeId> {
        self.scene_node.get()
    }

    /// Attach or detach the window's scene node
    pub fn set_scene_node(&self, node: Option<SceneNodeId>) {
        self.scene_node.set(node);
    }

    /// Destroy this window
    ///
    /// Notifies destruction listeners; further calls do nothing.
    pub fn destroy(&self) {
        if self.alive.replace(false) {
            self.destroyed.emit(&());
        }
    }

    /// Subscribe to destruction
    pub fn on_destroy(&self, callback: impl Fn(&()) + 'static) -> Subscription {
        self.destroyed.subscribe(callback)
    }
}

/// Read access to the usable screen area
pub trait OutputLayout {
    /// Bounding box of the usable output area, in absolute coordinates
    fn screen_bounds(&self) -> Rect;

    /// Helper for forwarding a Debug implementation of your [`OutputLayout`]
    /// type
    ///
    /// By default will just print `OutputLayout { .. }`
    fn debug(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputLayout").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for dyn OutputLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.debug(f)
    }
}
