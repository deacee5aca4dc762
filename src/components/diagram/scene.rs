//! Node and edge handles built once from [`DiagramData`].

use std::collections::HashMap;

use log::{debug, warn};

use super::store::NodeStore;
use super::transform::Affine;
use super::types::{DiagramConfig, DiagramData};

/// Visual handle of a node: the placement the renderer draws it at.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeHandle {
	pub name: String,
	pub placement: Affine,
	/// Style flag while the node is the active drag target.
	pub dragging: bool,
}

/// Line primitive of an edge, in scene coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Line {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeHandle {
	pub output: String,
	pub input: String,
	/// `None` until the edge has been computed at least once.
	pub line: Option<Line>,
}

impl EdgeHandle {
	pub fn touches(&self, node: &str) -> bool {
		self.output == node || self.input == node
	}
}

pub struct Scene {
	store: NodeStore,
	nodes: Vec<NodeHandle>,
	index: HashMap<String, usize>,
	edges: Vec<EdgeHandle>,
	node_width: f64,
	node_height: f64,
	port_height: f64,
}

impl Scene {
	/// Build handles for every node and edge and apply the initial layout:
	/// node `i` sits at `(0, i * spacing)`.
	pub fn compose(data: &DiagramData, config: &DiagramConfig) -> Self {
		let mut scene = Scene {
			store: NodeStore::new(),
			nodes: Vec::with_capacity(data.nodes.len()),
			index: HashMap::with_capacity(data.nodes.len()),
			edges: Vec::with_capacity(data.links.len()),
			node_width: config.node_width,
			node_height: config.node_height,
			port_height: config.port_height,
		};

		for (i, node) in data.nodes.iter().enumerate() {
			if scene.index.contains_key(&node.name) {
				warn!("duplicate node name {:?}, keeping the first", node.name);
				continue;
			}
			scene.index.insert(node.name.clone(), scene.nodes.len());
			scene.nodes.push(NodeHandle {
				name: node.name.clone(),
				placement: Affine::IDENTITY,
				dragging: false,
			});
			scene.move_node(&node.name, 0.0, i as f64 * config.spacing);
		}

		for link in &data.links {
			let dangling =
				!scene.index.contains_key(&link.output) || !scene.index.contains_key(&link.input);
			if dangling {
				warn!(
					"edge {:?} -> {:?} references an unknown node",
					link.output, link.input
				);
			}
			scene.edges.push(EdgeHandle {
				output: link.output.clone(),
				input: link.input.clone(),
				line: None,
			});
		}

		debug!(
			"composed scene with {} nodes and {} edges",
			scene.nodes.len(),
			scene.edges.len()
		);
		scene
	}

	/// Store a new node position and write the matching placement.
	///
	/// Returns `false` when the node is unknown or the position is not finite.
	pub fn move_node(&mut self, name: &str, x: f64, y: f64) -> bool {
		let Some(&idx) = self.index.get(name) else {
			return false;
		};
		if !x.is_finite() || !y.is_finite() {
			warn!("refusing to move {name:?} to ({x}, {y})");
			return false;
		}
		self.store.set(name, x, y);
		self.nodes[idx].placement = Affine::translate(x, y);
		true
	}

	pub fn set_dragging(&mut self, name: &str, dragging: bool) {
		if let Some(&idx) = self.index.get(name) {
			self.nodes[idx].dragging = dragging;
		}
	}

	pub fn store(&self) -> &NodeStore {
		&self.store
	}

	pub fn node(&self, name: &str) -> Option<&NodeHandle> {
		self.index.get(name).map(|&idx| &self.nodes[idx])
	}

	/// Node position as decoded from its placement.
	pub fn placement_position(&self, name: &str) -> Option<(f64, f64)> {
		self.node(name).map(|n| n.placement.translation())
	}

	pub fn nodes(&self) -> &[NodeHandle] {
		&self.nodes
	}

	pub fn edges(&self) -> &[EdgeHandle] {
		&self.edges
	}

	pub(super) fn edges_mut(&mut self) -> &mut [EdgeHandle] {
		&mut self.edges
	}

	/// Topmost node whose body or ports contain the scene point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&str> {
		let half_w = self.node_width / 2.0;
		let half_h = self.node_height / 2.0 + self.port_height;
		self.nodes
			.iter()
			.rev()
			.find(|node| {
				let (nx, ny) = node.placement.translation();
				(x - nx).abs() <= half_w && (y - ny).abs() <= half_h
			})
			.map(|node| node.name.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::types::{DiagramLink, DiagramNode};

	fn data(names: &[&str], links: &[(&str, &str)]) -> DiagramData {
		DiagramData {
			nodes: names.iter().map(|n| DiagramNode::new(*n)).collect(),
			links: links.iter().map(|(o, i)| DiagramLink::new(*o, *i)).collect(),
		}
	}

	fn compose(names: &[&str]) -> Scene {
		Scene::compose(&data(names, &[]), &DiagramConfig::default())
	}

	// ========================================================================
	// compose()
	// ========================================================================

	#[test]
	fn test_compose_stacks_nodes_vertically() {
		let scene = Scene::compose(
			&data(&["node1", "node2", "node3"], &[]),
			&DiagramConfig::default(),
		);
		assert_eq!(scene.store().get("node1"), Some((0.0, 0.0)));
		assert_eq!(scene.store().get("node2"), Some((0.0, 100.0)));
		assert_eq!(scene.store().get("node3"), Some((0.0, 200.0)));
		assert_eq!(
			scene.node("node3").unwrap().placement.to_string(),
			"translate(0,200)"
		);
	}

	#[test]
	fn test_compose_keeps_first_duplicate() {
		let scene = compose(&["a", "b", "a"]);
		assert_eq!(scene.nodes().len(), 2);
		assert_eq!(scene.store().get("a"), Some((0.0, 0.0)));
	}

	#[test]
	fn test_compose_keeps_edges_with_unknown_nodes() {
		let scene = Scene::compose(
			&data(&["a"], &[("a", "ghost")]),
			&DiagramConfig::default(),
		);
		assert_eq!(scene.edges().len(), 1);
		assert!(scene.edges()[0].line.is_none());
	}

	// ========================================================================
	// move_node()
	// ========================================================================

	#[test]
	fn test_move_node_updates_store_and_placement() {
		let mut scene = compose(&["a"]);
		assert!(scene.move_node("a", 12.0, -7.5));
		assert_eq!(scene.store().get("a"), Some((12.0, -7.5)));
		assert_eq!(scene.placement_position("a"), Some((12.0, -7.5)));
	}

	#[test]
	fn test_move_unknown_or_non_finite_is_rejected() {
		let mut scene = compose(&["a"]);
		assert!(!scene.move_node("b", 1.0, 1.0));
		assert!(!scene.move_node("a", f64::NAN, 1.0));
		assert_eq!(scene.store().get("a"), Some((0.0, 0.0)));
		assert_eq!(scene.placement_position("a"), Some((0.0, 0.0)));
	}

	// ========================================================================
	// node_at()
	// ========================================================================

	#[test]
	fn test_node_at_hits_body_and_ports() {
		let scene = compose(&["a", "b"]);
		assert_eq!(scene.node_at(0.0, 0.0), Some("a"));
		assert_eq!(scene.node_at(49.0, 9.0), Some("a"));
		// Output port sits just below the body.
		assert_eq!(scene.node_at(0.0, 11.5), Some("a"));
		assert_eq!(scene.node_at(0.0, 100.0), Some("b"));
		assert_eq!(scene.node_at(0.0, 50.0), None);
		assert_eq!(scene.node_at(51.0, 0.0), None);
	}

	#[test]
	fn test_node_at_prefers_topmost() {
		let mut scene = compose(&["a", "b"]);
		scene.move_node("b", 10.0, 0.0);
		assert_eq!(scene.node_at(5.0, 0.0), Some("b"));
	}
}
