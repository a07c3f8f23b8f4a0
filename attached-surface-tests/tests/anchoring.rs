mod helpers;

use helpers::*;

use attached_surface_protocol::Anchor;
use attached_surface_server::compositor::Drawable;
use attached_surface_server::geometry::{Rect, Size};
use attached_surface_server::scene::{NodePlacement, SceneGraph};

#[test]
fn sidebar_follows_the_parents_right_edge() {
    // 300px parent on a 390px screen: 80px of room right of it
    let fx = TestCompositor::with_screen(NodePlacement::ParentSubtree, Rect::new(0, 0, 390, 600));
    let parent = fx.new_parent(Rect::new(0, 0, 300, 600), (0, 0));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);

    set_anchor(&surface, Anchor::Right, 10, 0);
    set_size(&surface, 150, 400);
    drawable.commit(Size::new(150, 400));
    assert_eq!(log.configures(), vec![(1, 80, 400)]);

    // a well behaved client adopts the granted size
    set_size(&surface, 80, 400);
    ack(&surface, 1);
    drawable.commit(Size::new(80, 400));

    let node = surface.node().unwrap();
    assert!(surface.is_mapped());
    assert_eq!(surface.size(), Size::new(80, 400));
    assert_eq!(surface.position(), (310, 0));
    assert_eq!(fx.scene.node_position(node), (310, 0));
}

#[test]
fn parent_resize_moves_the_anchored_sidebar() {
    let fx = TestCompositor::with_screen(NodePlacement::ParentSubtree, Rect::new(0, 0, 390, 600));
    let parent = fx.new_parent(Rect::new(0, 0, 300, 600), (0, 0));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);
    set_anchor(&surface, Anchor::Right, 10, 0);
    set_size(&surface, 80, 400);
    map_surface(&drawable, &surface, &log, Size::new(80, 400));
    let node = surface.node().unwrap();
    assert_eq!(fx.scene.node_position(node), (310, 0));

    parent.set_geometry(Rect::new(0, 0, 260, 600));
    fx.manager.refresh_anchored_positions();

    assert_eq!(surface.position(), (270, 0));
    assert_eq!(fx.scene.node_position(node), (270, 0));

    // a second refresh without any geometry change pushes nothing
    fx.scene.clear_ops();
    fx.manager.refresh_anchored_positions();
    assert!(fx.scene.ops().is_empty());
}

#[test]
fn refresh_leaves_free_and_unmapped_surfaces_alone() {
    let fx = TestCompositor::new(NodePlacement::ParentSubtree);
    let parent = fx.new_parent(Rect::new(0, 0, 300, 200), (0, 0));

    // mapped but not anchored
    let free_drawable = Drawable::new();
    let free = fx.manager.get_attached_surface(&free_drawable, &parent).unwrap();
    let (free_log, _sub1) = EventLog::attach(&free);
    set_position(&free, 5, 7);
    map_surface(&free_drawable, &free, &free_log, Size::new(64, 64));

    // anchored but never acked, so never mapped
    let stuck_drawable = Drawable::new();
    let stuck = fx.manager.get_attached_surface(&stuck_drawable, &parent).unwrap();
    set_anchor(&stuck, Anchor::Bottom, 0, 0);
    stuck_drawable.commit(Size::new(64, 64));

    fx.scene.clear_ops();
    fx.manager.refresh_anchored_positions();
    assert!(fx.scene.ops().is_empty());
    assert_eq!(fx.scene.node_position(free.node().unwrap()), (5, 7));
}

#[test]
fn margin_and_offset_slide_the_surface() {
    let fx = TestCompositor::new(NodePlacement::ParentSubtree);
    let parent = fx.new_parent(Rect::new(0, 0, 300, 200), (0, 0));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);

    set_anchor(&surface, Anchor::Bottom, 8, 12);
    set_size(&surface, 100, 60);
    map_surface(&drawable, &surface, &log, Size::new(100, 60));

    // below the parent's bottom edge, slid 12px along it
    assert_eq!(surface.position(), (12, 208));
}

#[test]
fn committed_content_backfills_an_unset_size() {
    let fx = TestCompositor::new(NodePlacement::ParentSubtree);
    let parent = fx.new_parent(Rect::new(200, 0, 300, 200), (200, 0));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);

    set_anchor(&surface, Anchor::Left, 0, 0);
    // the client never picks a size, it just commits a 120x40 buffer
    drawable.commit(Size::new(120, 40));
    let serial = log.configures()[0].0;
    ack(&surface, serial);
    drawable.commit(Size::new(120, 40));

    // the left-anchored x derives from the committed width
    let node = surface.node().unwrap();
    assert_eq!(fx.scene.node_position(node), (-120, 0));
}

#[test]
fn extreme_margins_saturate_the_anchor_edge() {
    let fx = TestCompositor::new(NodePlacement::Root);
    let parent = fx.new_parent(Rect::new(10, 20, 300, 200), (10, 20));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);

    set_anchor(&surface, Anchor::Right, i32::MAX, 0);
    set_size(&surface, 80, 400);
    let (_, width, height) = map_surface(&drawable, &surface, &log, Size::new(80, 400));

    // no space is left past an edge pushed out that far, so the size is
    // granted and the position pins to the edge of the coordinate space
    assert_eq!((width, height), (80, 400));
    let node = surface.node().unwrap();
    assert_eq!(fx.scene.node_position(node), (i32::MAX, 20));
}

#[test]
fn oversized_content_cannot_overflow_the_position() {
    // parent flush with the left screen edge: no room, the request is granted
    let fx = TestCompositor::new(NodePlacement::ParentSubtree);
    let parent = fx.new_parent(Rect::new(0, 0, 300, 600), (0, 0));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);

    set_anchor(&surface, Anchor::Left, 0, 0);
    set_size(&surface, 1 << 31, 64);
    let (_, width, _) = map_surface(&drawable, &surface, &log, Size::new(64, 64));

    assert_eq!(width, 1 << 31);
    let node = surface.node().unwrap();
    assert_eq!(fx.scene.node_position(node), (i32::MIN, 0));
}

#[test]
fn root_placement_tracks_the_parent_absolutely() {
    let fx = TestCompositor::new(NodePlacement::Root);
    let parent = fx.new_parent(Rect::new(100, 50, 300, 200), (100, 50));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);
    let node = surface.node().unwrap();

    // the node sits at the scene root, not under the toplevel
    assert_eq!(fx.scene.ops()[0], SceneOp::Create { node, parent: None });

    set_anchor(&surface, Anchor::Right, 10, 0);
    set_size(&surface, 80, 400);
    map_surface(&drawable, &surface, &log, Size::new(80, 400));

    // relative (310, 0) plus the parent's absolute (100, 50)
    assert_eq!(surface.position(), (310, 0));
    assert_eq!(fx.scene.node_position(node), (410, 50));

    // moving the parent re-derives the absolute position on refresh
    fx.scene.set_position(parent.scene_node().unwrap(), 130, 80);
    fx.manager.refresh_anchored_positions();
    assert_eq!(fx.scene.node_position(node), (440, 80));
}

#[test]
fn root_placement_keeps_its_node_past_the_parent() {
    let fx = TestCompositor::new(NodePlacement::Root);
    let parent = fx.new_parent(Rect::new(0, 0, 300, 200), (0, 0));
    let drawable = Drawable::new();
    let surface = fx.manager.get_attached_surface(&drawable, &parent).unwrap();
    let (log, _sub) = EventLog::attach(&surface);
    let node = surface.node().unwrap();
    map_surface(&drawable, &surface, &log, Size::new(64, 64));

    // the root-parented node is not part of the parent's subtree, so it
    // outlives the parent and stays with the surface
    parent.destroy();
    assert_eq!(log.closed_count(), 1);
    assert_eq!(surface.node(), Some(node));
    assert!(fx.scene.node_alive(node));

    surface.destroy();
    assert!(!fx.scene.node_alive(node));
}
