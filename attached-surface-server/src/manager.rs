//! The attached surface manager
//!
//! [`AttachedSurfaceManager`] is the server-side state behind the
//! `zext_attached_surface_manager_v1` global. It validates
//! `get_attached_surface` requests, allocates the scene node for the new
//! surface and tracks every live surface in a slot registry so the
//! compositor can enumerate them, close them in bulk or re-anchor them after
//! a layout change.
//!
//! Registry slots are reused, so a bare index would be ambiguous; an
//! [`AttachedSurfaceId`] pairs the slot with a generation counter and stops
//! matching once the slot has been given to a newer surface.

use std::cell::RefCell;
use std::rc::Rc;

use attached_surface_protocol::manager as proto;

use crate::compositor::{Drawable, OutputLayout, Toplevel};
use crate::scene::{NodeAllocError, NodeOwnership, NodePlacement, SceneGraph};
use crate::serial::SerialCounter;
use crate::surface::{AttachedSurface, ROLE};

/// Registry identity of an attached surface
///
/// Holds a slot index and the generation the slot had when the surface was
/// inserted. A stale id silently stops matching anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedSurfaceId {
    /// 1-based slot index, 0 meaning "not registered"
    slot: u32,
    serial: u32,
}

impl AttachedSurfaceId {
    /// The id of a surface that has not been registered
    pub fn null() -> AttachedSurfaceId {
        AttachedSurfaceId { slot: 0, serial: 0 }
    }

    /// Whether this id refers to no surface
    pub fn is_null(self) -> bool {
        self.slot == 0
    }
}

#[derive(Debug)]
struct RegisteredSurface {
    serial: u32,
    surface: Rc<AttachedSurface>,
}

#[derive(Debug, Default)]
pub(crate) struct SurfaceRegistry {
    slots: Vec<Option<RegisteredSurface>>,
    last_serial: u32,
}

impl SurfaceRegistry {
    fn insert(&mut self, surface: Rc<AttachedSurface>) -> AttachedSurfaceId {
        self.last_serial = self.last_serial.wrapping_add(1);
        let serial = self.last_serial;
        let entry = RegisteredSurface { serial, surface };
        let slot = match self.slots.iter_mut().position(|slot| slot.is_none()) {
            Some(free) => {
                self.slots[free] = Some(entry);
                free
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        AttachedSurfaceId { slot: slot as u32 + 1, serial }
    }

    pub(crate) fn remove(&mut self, id: AttachedSurfaceId) {
        if id.is_null() {
            return;
        }
        let Some(slot) = self.slots.get_mut(id.slot as usize - 1) else {
            return;
        };
        if slot.as_ref().map(|entry| entry.serial) == Some(id.serial) {
            *slot = None;
        }
    }

    fn live(&self) -> Vec<Rc<AttachedSurface>> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|entry| entry.surface.clone()))
            .collect()
    }
}

/// Server-side state of the attached surface manager global
#[derive(Debug)]
pub struct AttachedSurfaceManager {
    registry: Rc<RefCell<SurfaceRegistry>>,
    serials: Rc<SerialCounter>,
    scene: Rc<dyn SceneGraph>,
    outputs: Rc<dyn OutputLayout>,
    placement: NodePlacement,
}

impl AttachedSurfaceManager {
    /// Create a manager working against the given scene graph and output
    /// layout
    ///
    /// `placement` decides where the scene nodes of new surfaces live, see
    /// [`NodePlacement`].
    pub fn new(
        scene: Rc<dyn SceneGraph>,
        outputs: Rc<dyn OutputLayout>,
        placement: NodePlacement,
    ) -> AttachedSurfaceManager {
        AttachedSurfaceManager {
            registry: Rc::new(RefCell::new(SurfaceRegistry::default())),
            serials: Rc::new(SerialCounter::new()),
            scene,
            outputs,
            placement,
        }
    }

    /// Handle a `get_attached_surface` request
    ///
    /// The drawable must be alive and role-free, and the parent must be a
    /// live toplevel with a scene node. On success the drawable carries the
    /// [`ROLE`](crate::surface::ROLE) until the surface is destroyed.
    pub fn get_attached_surface(
        &self,
        drawable: &Rc<Drawable>,
        parent: &Rc<Toplevel>,
    ) -> Result<Rc<AttachedSurface>, CreateError> {
        if !drawable.is_alive() || !drawable.claim_role(ROLE) {
            return Err(CreateError::InvalidDrawable);
        }
        let parent_node = match parent.scene_node() {
            Some(node) if parent.is_alive() => node,
            _ => {
                drawable.release_role();
                return Err(CreateError::InvalidParent);
            }
        };
        let attach_to = match self.placement {
            NodePlacement::ParentSubtree => Some(parent_node),
            NodePlacement::Root => None,
        };
        let node = match self.scene.create_node(drawable, attach_to) {
            Ok(node) => node,
            Err(err) => {
                drawable.release_role();
                return Err(err.into());
            }
        };
        // hidden until the first commit after the ack maps it
        self.scene.set_enabled(node, false);
        let ownership = match self.placement {
            NodePlacement::ParentSubtree => NodeOwnership::OwnedByParent,
            NodePlacement::Root => NodeOwnership::Owned,
        };
        let surface = AttachedSurface::new(self, drawable, parent, node, ownership);
        let id = self.registry.borrow_mut().insert(surface.clone());
        surface.set_id(id);
        crate::log_debug!("created attached surface {:?} under {:?}", id, parent_node);
        Ok(surface)
    }

    /// Destroy every surface the manager knows about
    ///
    /// Used on compositor shutdown. Surfaces that are already gone are
    /// skipped.
    pub fn destroy_all(&self) {
        let live = self.registry.borrow().live();
        for surface in live {
            surface.destroy();
        }
    }

    /// Recompute the position of every mapped, anchored surface
    ///
    /// Call after moving or resizing toplevels; surfaces whose position is
    /// explicit are left alone.
    pub fn refresh_anchored_positions(&self) {
        let live = self.registry.borrow().live();
        for surface in live {
            surface.refresh_position();
        }
    }

    /// Snapshot of the currently registered surfaces, in slot order
    pub fn surfaces(&self) -> Vec<Rc<AttachedSurface>> {
        self.registry.borrow().live()
    }

    pub(crate) fn placement(&self) -> NodePlacement {
        self.placement
    }

    pub(crate) fn scene(&self) -> Rc<dyn SceneGraph> {
        self.scene.clone()
    }

    pub(crate) fn outputs(&self) -> Rc<dyn OutputLayout> {
        self.outputs.clone()
    }

    pub(crate) fn serials(&self) -> Rc<SerialCounter> {
        self.serials.clone()
    }

    pub(crate) fn registry(&self) -> Rc<RefCell<SurfaceRegistry>> {
        self.registry.clone()
    }
}

/// An error that can occur when creating an attached surface
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    /// The drawable is dead or already carries another role
    #[error("the drawable is dead or already has a role")]
    InvalidDrawable,
    /// The parent is dead or has no scene node
    #[error("the parent toplevel cannot host attached surfaces")]
    InvalidParent,
    /// The scene graph could not allocate a node
    #[error(transparent)]
    NodeAllocation(#[from] NodeAllocError),
}

impl CreateError {
    /// The protocol error to post for this failure, if it is the client's
    /// fault
    ///
    /// Allocation failures return `None`; those should kill the client with
    /// an out-of-memory error instead.
    pub fn protocol_error(&self) -> Option<proto::Error> {
        match self {
            CreateError::InvalidDrawable => Some(proto::Error::InvalidDrawable),
            CreateError::InvalidParent => Some(proto::Error::InvalidParent),
            CreateError::NodeAllocation(_) => None,
        }
    }
}
