// This module contains helper functions and types that
// are not tests in themselves, but are used by several tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use attached_surface_protocol::protocol::WEnum;
use attached_surface_protocol::surface as surface_proto;
use attached_surface_protocol::Anchor;
use attached_surface_server::compositor::{Drawable, OutputLayout, Toplevel};
use attached_surface_server::geometry::{Rect, Size};
use attached_surface_server::scene::{NodeAllocError, NodePlacement, SceneGraph, SceneNodeId};
use attached_surface_server::signal::Subscription;
use attached_surface_server::surface::AttachedSurface;
use attached_surface_server::AttachedSurfaceManager;

/// A scene graph operation observed by the [`RecordingScene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    Create { node: SceneNodeId, parent: Option<SceneNodeId> },
    SetPosition { node: SceneNodeId, x: i32, y: i32 },
    SetEnabled { node: SceneNodeId, enabled: bool },
    Destroy { node: SceneNodeId },
}

#[derive(Debug)]
struct Node {
    parent: Option<SceneNodeId>,
    position: (i32, i32),
    enabled: bool,
    alive: bool,
}

/// A fake scene graph that records every operation performed on it
#[derive(Debug, Default)]
pub struct RecordingScene {
    nodes: RefCell<Vec<Node>>,
    ops: RefCell<Vec<SceneOp>>,
    fail_next_create: Cell<bool>,
}

impl RecordingScene {
    pub fn new() -> Rc<RecordingScene> {
        Rc::new(RecordingScene::default())
    }

    /// Create a node outside the recorded protocol flow, e.g. for a parent
    /// toplevel
    pub fn add_node(&self, x: i32, y: i32) -> SceneNodeId {
        self.alloc(None, (x, y))
    }

    pub fn ops(&self) -> Vec<SceneOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    pub fn node_position(&self, node: SceneNodeId) -> (i32, i32) {
        self.nodes.borrow()[Self::index(node)].position
    }

    pub fn node_enabled(&self, node: SceneNodeId) -> bool {
        self.nodes.borrow()[Self::index(node)].enabled
    }

    pub fn node_alive(&self, node: SceneNodeId) -> bool {
        self.nodes.borrow()[Self::index(node)].alive
    }

    pub fn fail_next_create(&self) {
        self.fail_next_create.set(true);
    }

    fn alloc(&self, parent: Option<SceneNodeId>, position: (i32, i32)) -> SceneNodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node { parent, position, enabled: true, alive: true });
        SceneNodeId::from_raw(nodes.len() as u64)
    }

    fn index(node: SceneNodeId) -> usize {
        node.raw() as usize - 1
    }
}

impl SceneGraph for RecordingScene {
    fn create_node(
        &self,
        _drawable: &Rc<Drawable>,
        parent: Option<SceneNodeId>,
    ) -> Result<SceneNodeId, NodeAllocError> {
        if self.fail_next_create.replace(false) {
            return Err(NodeAllocError);
        }
        let node = self.alloc(parent, (0, 0));
        self.ops.borrow_mut().push(SceneOp::Create { node, parent });
        Ok(node)
    }

    fn set_position(&self, node: SceneNodeId, x: i32, y: i32) {
        self.nodes.borrow_mut()[Self::index(node)].position = (x, y);
        self.ops.borrow_mut().push(SceneOp::SetPosition { node, x, y });
    }

    fn set_enabled(&self, node: SceneNodeId, enabled: bool) {
        self.nodes.borrow_mut()[Self::index(node)].enabled = enabled;
        self.ops.borrow_mut().push(SceneOp::SetEnabled { node, enabled });
    }

    fn destroy_node(&self, node: SceneNodeId) {
        self.nodes.borrow_mut()[Self::index(node)].alive = false;
        self.ops.borrow_mut().push(SceneOp::Destroy { node });
    }

    fn absolute_position(&self, node: SceneNodeId) -> (i32, i32) {
        let nodes = self.nodes.borrow();
        let mut current = Some(node);
        let mut position = (0, 0);
        while let Some(node) = current {
            let entry = &nodes[Self::index(node)];
            position.0 += entry.position.0;
            position.1 += entry.position.1;
            current = entry.parent;
        }
        position
    }
}

/// An output layout with fixed, test-controlled screen bounds
#[derive(Debug)]
pub struct FixedOutputs {
    bounds: Cell<Rect>,
}

impl FixedOutputs {
    pub fn new(bounds: Rect) -> Rc<FixedOutputs> {
        Rc::new(FixedOutputs { bounds: Cell::new(bounds) })
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }
}

impl OutputLayout for FixedOutputs {
    fn screen_bounds(&self) -> Rect {
        self.bounds.get()
    }
}

pub struct TestCompositor {
    pub scene: Rc<RecordingScene>,
    pub outputs: Rc<FixedOutputs>,
    pub manager: AttachedSurfaceManager,
}

impl TestCompositor {
    pub fn new(placement: NodePlacement) -> TestCompositor {
        Self::with_screen(placement, Rect::new(0, 0, 1920, 1080))
    }

    pub fn with_screen(placement: NodePlacement, screen: Rect) -> TestCompositor {
        let scene = RecordingScene::new();
        let outputs = FixedOutputs::new(screen);
        let manager = AttachedSurfaceManager::new(scene.clone(), outputs.clone(), placement);
        TestCompositor { scene, outputs, manager }
    }

    /// A live toplevel mapped to a scene node at the given absolute position
    pub fn new_parent(&self, geometry: Rect, at: (i32, i32)) -> Rc<Toplevel> {
        let parent = Toplevel::new(geometry);
        parent.set_scene_node(Some(self.scene.add_node(at.0, at.1)));
        parent
    }
}

/// Everything an attached surface sent to its client
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<surface_proto::Event>>,
}

impl EventLog {
    pub fn attach(surface: &AttachedSurface) -> (Rc<EventLog>, Subscription) {
        let log = Rc::new(EventLog::default());
        let sink = log.clone();
        let sub = surface.on_event(move |event| sink.events.borrow_mut().push(*event));
        (log, sub)
    }

    pub fn configures(&self) -> Vec<(u32, u32, u32)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                surface_proto::Event::Configure { serial, width, height } => {
                    Some((*serial, *width, *height))
                }
                surface_proto::Event::Closed => None,
            })
            .collect()
    }

    pub fn closed_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, surface_proto::Event::Closed))
            .count()
    }
}

/// Deliver a request the way a transport would, through its wire form
pub fn send_request(surface: &AttachedSurface, request: surface_proto::Request) {
    let msg = request.into_message(4u32);
    let parsed = surface_proto::Request::from_message(msg).expect("request survives the wire");
    surface.handle_request(parsed);
}

pub fn ack(surface: &AttachedSurface, serial: u32) {
    send_request(surface, surface_proto::Request::AckConfigure { serial });
}

pub fn set_anchor(surface: &AttachedSurface, anchor: Anchor, margin: i32, offset: i32) {
    send_request(
        surface,
        surface_proto::Request::SetAnchor { anchor: WEnum::Value(anchor), margin, offset },
    );
}

pub fn set_position(surface: &AttachedSurface, x: i32, y: i32) {
    send_request(surface, surface_proto::Request::SetPosition { x, y });
}

pub fn set_size(surface: &AttachedSurface, width: u32, height: u32) {
    send_request(surface, surface_proto::Request::SetSize { width, height });
}

/// Drive a fresh surface through its configure/ack/commit handshake until it
/// is mapped, returning the configure that was acked
pub fn map_surface(
    drawable: &Rc<Drawable>,
    surface: &AttachedSurface,
    log: &EventLog,
    content: Size,
) -> (u32, u32, u32) {
    drawable.commit(content);
    let configure = *log.configures().last().expect("first commit sends a configure");
    ack(surface, configure.0);
    drawable.commit(content);
    assert!(surface.is_mapped());
    configure
}
