//! Node drag state machine: `Idle -> Dragging -> Idle`.
//!
//! Pointer coordinates are in scene space (already mapped through the
//! inverse view transform).

use log::{debug, trace};

use super::edges::EdgeGeometry;
use super::scene::Scene;

/// Offset between the pointer and the node, captured at drag start.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
	pub node: String,
	pub origin: (f64, f64),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging(DragSession),
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
	state: DragState,
	live_edges: bool,
}

impl DragController {
	pub fn new(live_edges: bool) -> Self {
		Self {
			state: DragState::Idle,
			live_edges,
		}
	}

	pub fn state(&self) -> &DragState {
		&self.state
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.state, DragState::Dragging(_))
	}

	pub fn active_node(&self) -> Option<&str> {
		match &self.state {
			DragState::Dragging(session) => Some(session.node.as_str()),
			DragState::Idle => None,
		}
	}

	/// Begin dragging `node`. Returns `true` when a session was opened, in
	/// which case the gesture must not reach pan/zoom handling.
	pub fn start(
		&mut self,
		scene: &mut Scene,
		edges: &mut EdgeGeometry,
		node: &str,
		pointer: (f64, f64),
	) -> bool {
		let Some((x, y)) = scene.placement_position(node) else {
			debug!("drag start on unknown node {node:?}");
			return false;
		};
		if self.is_dragging() {
			self.end(scene, edges);
		}

		let origin = (pointer.0 - x, pointer.1 - y);
		scene.set_dragging(node, true);
		debug!("drag start {node:?} at ({x}, {y}), origin {origin:?}");
		self.state = DragState::Dragging(DragSession {
			node: node.to_string(),
			origin,
		});
		true
	}

	/// Move the active node so it keeps its offset to the pointer.
	pub fn drag(
		&mut self,
		scene: &mut Scene,
		edges: &mut EdgeGeometry,
		pointer: (f64, f64),
	) -> bool {
		let DragState::Dragging(session) = &self.state else {
			return false;
		};
		let (x, y) = (pointer.0 - session.origin.0, pointer.1 - session.origin.1);
		trace!("drag {:?} to ({x}, {y})", session.node);
		if !scene.move_node(&session.node, x, y) {
			return false;
		}
		if self.live_edges {
			edges.recompute_incident(scene, &session.node);
		}
		true
	}

	/// Close the session and run one full edge pass.
	pub fn end(&mut self, scene: &mut Scene, edges: &mut EdgeGeometry) -> bool {
		let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
			return false;
		};
		scene.set_dragging(&session.node, false);
		edges.recompute_all(scene);
		debug!(
			"drag end {:?} at {:?}",
			session.node,
			scene.store().get(&session.node)
		);
		true
	}
}
