//! Attached surface objects
//!
//! One [`AttachedSurface`] exists per `get_attached_surface` request. It owns
//! the double-buffered presentation properties of the surface and the
//! configure/ack_configure handshake, and it reacts to three outside events:
//! commits of its drawable, destruction of its drawable, and destruction of
//! its parent toplevel.
//!
//! The life of a surface: created unconfigured, it sends its one configure on
//! the drawable's first commit, proposing a size that fits the space around
//! the parent. Once the client acknowledges that exact serial, the next
//! commit applies the pending properties, positions the scene node and maps
//! it. Every later commit re-applies pending state the same way. The surface
//! closes when the client destroys it, when the drawable disappears, or when
//! the parent dies; only the last of these is announced to the client, with
//! a single `closed` event.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use attached_surface_protocol::protocol::WEnum;
use attached_surface_protocol::surface::{Event, Request};
use attached_surface_protocol::Anchor;
use smallvec::SmallVec;

use crate::anchor::{anchored_position, constrain_size};
use crate::compositor::{Drawable, OutputLayout, Toplevel};
use crate::geometry::Size;
use crate::manager::{AttachedSurfaceId, AttachedSurfaceManager, SurfaceRegistry};
use crate::scene::{NodeOwnership, NodePlacement, SceneGraph, SceneNodeId};
use crate::serial::{Serial, SerialCounter};
use crate::signal::{Signal, Subscription};

/// Role claimed on drawables backing an attached surface
pub const ROLE: &str = "zext_attached_surface_v1";

/// The double-buffered presentation properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attributes {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    anchor: Anchor,
    margin: i32,
    offset: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes { x: 0, y: 0, width: 0, height: 0, anchor: Anchor::None, margin: 0, offset: 0 }
    }
}

/// A surface attached to a toplevel window
pub struct AttachedSurface {
    id: Cell<AttachedSurfaceId>,
    drawable: Rc<Drawable>,
    parent: RefCell<Weak<Toplevel>>,
    node: Cell<Option<SceneNodeId>>,
    ownership: NodeOwnership,
    placement: NodePlacement,
    pending: Cell<Attributes>,
    current: Cell<Attributes>,
    configure_serial: Cell<Option<Serial>>,
    configured: Cell<bool>,
    mapped: Cell<bool>,
    closed: Cell<bool>,
    destroyed: Cell<bool>,
    last_node_position: Cell<Option<(i32, i32)>>,
    events: Signal<Event>,
    subscriptions: RefCell<SmallVec<[Subscription; 3]>>,
    scene: Rc<dyn SceneGraph>,
    outputs: Rc<dyn OutputLayout>,
    serials: Rc<SerialCounter>,
    registry: Rc<RefCell<SurfaceRegistry>>,
}

impl AttachedSurface {
    pub(crate) fn new(
        manager: &AttachedSurfaceManager,
        drawable: &Rc<Drawable>,
        parent: &Rc<Toplevel>,
        node: SceneNodeId,
        ownership: NodeOwnership,
    ) -> Rc<AttachedSurface> {
        Rc::new_cyclic(|weak: &Weak<AttachedSurface>| {
            let mut subscriptions = SmallVec::new();
            let w = weak.clone();
            subscriptions.push(drawable.on_commit(move |_| {
                if let Some(surface) = w.upgrade() {
                    surface.handle_commit();
                }
            }));
            let w = weak.clone();
            subscriptions.push(drawable.on_destroy(move |_| {
                if let Some(surface) = w.upgrade() {
                    surface.destroy();
                }
            }));
            let w = weak.clone();
            subscriptions.push(parent.on_destroy(move |_| {
                if let Some(surface) = w.upgrade() {
                    surface.handle_parent_destroy();
                }
            }));
            AttachedSurface {
                id: Cell::new(AttachedSurfaceId::null()),
                drawable: drawable.clone(),
                parent: RefCell::new(Rc::downgrade(parent)),
                node: Cell::new(Some(node)),
                ownership,
                placement: manager.placement(),
                pending: Cell::new(Attributes::default()),
                current: Cell::new(Attributes::default()),
                configure_serial: Cell::new(None),
                configured: Cell::new(false),
                mapped: Cell::new(false),
                closed: Cell::new(false),
                destroyed: Cell::new(false),
                last_node_position: Cell::new(None),
                events: Signal::new(),
                subscriptions: RefCell::new(subscriptions),
                scene: manager.scene(),
                outputs: manager.outputs(),
                serials: manager.serials(),
                registry: manager.registry(),
            }
        })
    }

    pub(crate) fn set_id(&self, id: AttachedSurfaceId) {
        self.id.set(id);
    }

    /// Registry identity of this surface
    pub fn id(&self) -> AttachedSurfaceId {
        self.id.get()
    }

    /// The drawable whose content this surface shows
    pub fn drawable(&self) -> &Rc<Drawable> {
        &self.drawable
    }

    /// The parent toplevel, unless it has been destroyed
    pub fn parent(&self) -> Option<Rc<Toplevel>> {
        self.parent.borrow().upgrade()
    }

    /// The surface's scene node, unless it has been released
    pub fn node(&self) -> Option<SceneNodeId> {
        self.node.get()
    }

    /// Current position relative to the parent
    pub fn position(&self) -> (i32, i32) {
        let current = self.current.get();
        (current.x, current.y)
    }

    /// Current size
    pub fn size(&self) -> Size {
        let current = self.current.get();
        Size::new(current.width, current.height)
    }

    /// Current anchor edge
    pub fn anchor(&self) -> Anchor {
        self.current.get().anchor
    }

    /// Whether the client has acknowledged the outstanding configure
    pub fn is_configured(&self) -> bool {
        self.configured.get()
    }

    /// Whether the surface has been made visible
    pub fn is_mapped(&self) -> bool {
        self.mapped.get()
    }

    /// Whether the surface has been closed or destroyed
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Subscribe to the protocol events this surface sends to its client
    pub fn on_event(&self, callback: impl Fn(&Event) + 'static) -> Subscription {
        self.events.subscribe(callback)
    }

    /// Handle a protocol request from the client
    pub fn handle_request(&self, request: Request) {
        match request {
            Request::SetAnchor { anchor, margin, offset } => {
                self.set_anchor(anchor, margin, offset)
            }
            Request::SetPosition { x, y } => self.set_position(x, y),
            Request::SetSize { width, height } => self.set_size(width, height),
            Request::AckConfigure { serial } => self.ack_configure(serial),
            Request::Destroy => self.destroy(),
        }
    }

    fn set_anchor(&self, anchor: WEnum<Anchor>, margin: i32, offset: i32) {
        if self.closed.get() {
            return;
        }
        match anchor.into_result() {
            Ok(anchor) => {
                let mut pending = self.pending.get();
                pending.anchor = anchor;
                pending.margin = margin;
                pending.offset = offset;
                self.pending.set(pending);
            }
            Err(err) => crate::log_warn!("ignoring set_anchor on {:?}: {}", self.id.get(), err),
        }
    }

    fn set_position(&self, x: i32, y: i32) {
        if self.closed.get() {
            return;
        }
        let mut pending = self.pending.get();
        pending.x = x;
        pending.y = y;
        self.pending.set(pending);
    }

    fn set_size(&self, width: u32, height: u32) {
        if self.closed.get() {
            return;
        }
        let mut pending = self.pending.get();
        pending.width = width;
        pending.height = height;
        self.pending.set(pending);
    }

    fn ack_configure(&self, serial: u32) {
        if self.closed.get() {
            return;
        }
        match self.configure_serial.get() {
            Some(expected) if expected == Serial::from(serial) => {
                self.configured.set(true);
            }
            Some(expected) => {
                let relation = if Serial::from(serial) < expected { "stale" } else { "future" };
                crate::log_debug!(
                    "ignoring {} ack_configure serial {} on {:?} (expected {})",
                    relation,
                    serial,
                    self.id.get(),
                    u32::from(expected)
                );
            }
            None => {
                crate::log_debug!(
                    "ignoring ack_configure serial {} on {:?} before first configure",
                    serial,
                    self.id.get()
                );
            }
        }
    }

    /// Destroy this attached surface
    ///
    /// Handles the client's destroy request; also invoked when the drawable
    /// disappears. Releases the scene node (unless the parent's subtree
    /// already took it), the drawable's role and the registry entry. Safe to
    /// call more than once.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.closed.set(true);
        self.subscriptions.borrow_mut().clear();
        if let Some(node) = self.node.take() {
            self.scene.destroy_node(node);
        }
        self.drawable.release_role();
        *self.parent.borrow_mut() = Weak::new();
        self.registry.borrow_mut().remove(self.id.get());
        crate::log_debug!("destroyed attached surface {:?}", self.id.get());
    }

    fn handle_parent_destroy(&self) {
        if self.closed.replace(true) {
            return;
        }
        *self.parent.borrow_mut() = Weak::new();
        if self.ownership == NodeOwnership::OwnedByParent {
            // the node dies with the parent's subtree
            self.node.set(None);
        }
        // emitted last: a listener may call destroy() from inside the event
        self.send_closed();
    }

    fn handle_commit(&self) {
        if self.closed.get() {
            return;
        }
        let Some(parent) = self.parent.borrow().upgrade() else {
            return;
        };

        if self.configure_serial.get().is_none() {
            // first commit: propose a size that fits next to the parent
            let pending = self.pending.get();
            let size = constrain_size(
                pending.anchor,
                pending.margin,
                parent.geometry(),
                self.outputs.screen_bounds(),
                Size::new(pending.width, pending.height),
            );
            let serial = self.serials.next_serial();
            self.configure_serial.set(Some(serial));
            self.send_configure(serial, size);
            return;
        }

        if !self.configured.get() {
            // the outstanding configure has not been acked yet
            return;
        }

        self.current.set(self.pending.get());
        self.reposition(&parent);
        if let Some(node) = self.node.get() {
            self.scene.set_enabled(node, true);
            self.mapped.set(true);
        }
    }

    pub(crate) fn refresh_position(&self) {
        if self.closed.get() || !self.mapped.get() {
            return;
        }
        if self.current.get().anchor == Anchor::None {
            return;
        }
        let Some(parent) = self.parent.borrow().upgrade() else {
            return;
        };
        self.reposition(&parent);
    }

    fn reposition(&self, parent: &Rc<Toplevel>) {
        let Some(node) = self.node.get() else {
            return;
        };
        let mut current = self.current.get();
        let size = self.effective_size(&current);
        let (x, y) = anchored_position(
            current.anchor,
            current.margin,
            current.offset,
            (current.x, current.y),
            parent.geometry(),
            size,
        );
        if (x, y) != (current.x, current.y) {
            current.x = x;
            current.y = y;
            self.current.set(current);
        }
        let target = match self.placement {
            NodePlacement::ParentSubtree => (x, y),
            NodePlacement::Root => {
                let (px, py) = match parent.scene_node() {
                    Some(parent_node) => self.scene.absolute_position(parent_node),
                    None => (0, 0),
                };
                (px.saturating_add(x), py.saturating_add(y))
            }
        };
        if self.last_node_position.get() != Some(target) {
            self.scene.set_position(node, target.0, target.1);
            self.last_node_position.set(Some(target));
        }
    }

    // Zero means the client declined to pick that dimension; fall back to
    // what it actually committed.
    fn effective_size(&self, attrs: &Attributes) -> Size {
        let committed = self.drawable.committed_size();
        Size::new(
            if attrs.width != 0 { attrs.width } else { committed.width },
            if attrs.height != 0 { attrs.height } else { committed.height },
        )
    }

    fn send_configure(&self, serial: Serial, size: Size) {
        crate::log_debug!(
            "configuring attached surface {:?}: {}x{} (serial {})",
            self.id.get(),
            size.width,
            size.height,
            u32::from(serial)
        );
        self.events.emit(&Event::Configure {
            serial: serial.into(),
            width: size.width,
            height: size.height,
        });
    }

    fn send_closed(&self) {
        self.events.emit(&Event::Closed);
    }
}

impl std::fmt::Debug for AttachedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedSurface")
            .field("id", &self.id.get())
            .field("node", &self.node.get())
            .field("configured", &self.configured.get())
            .field("mapped", &self.mapped.get())
            .field("closed", &self.closed.get())
            .finish_non_exhaustive()
    }
}
