//! Edge endpoint recomputation.
//!
//! An edge leaves its source just below the node body (output port) and
//! arrives above the target body (input port), with clearance for the
//! arrowhead. Endpoints are always derived from node placements.

use log::{trace, warn};

use super::scene::{EdgeHandle, Line, Scene};
use super::types::DiagramConfig;

#[derive(Clone, Debug)]
pub struct EdgeGeometry {
	output_offset: f64,
	input_offset: f64,
	passes: u64,
}

impl EdgeGeometry {
	pub fn new(config: &DiagramConfig) -> Self {
		Self {
			output_offset: config.output_port_offset(),
			input_offset: config.input_port_offset(),
			passes: 0,
		}
	}

	/// Number of full recomputation passes run so far.
	pub fn passes(&self) -> u64 {
		self.passes
	}

	/// Endpoints of `edge` for the current node placements, or `None` if either
	/// node is missing.
	pub fn endpoints(&self, scene: &Scene, edge: &EdgeHandle) -> Option<Line> {
		let (x1, y1) = scene.placement_position(&edge.output)?;
		let (x2, y2) = scene.placement_position(&edge.input)?;
		Some(Line {
			x1,
			y1: y1 + self.output_offset,
			x2,
			y2: y2 - self.input_offset,
		})
	}

	/// Recompute every edge. Edges with a missing node keep their old line.
	///
	/// Returns how many edges were updated.
	pub fn recompute_all(&mut self, scene: &mut Scene) -> usize {
		self.passes += 1;
		let updated = self.recompute_where(scene, |_| true);
		trace!("edge pass {}: {updated} edge(s) updated", self.passes);
		updated
	}

	/// Recompute only the edges that start or end at `node`.
	pub fn recompute_incident(&mut self, scene: &mut Scene, node: &str) -> usize {
		self.recompute_where(scene, |edge| edge.touches(node))
	}

	fn recompute_where<F>(&self, scene: &mut Scene, include: F) -> usize
	where
		F: Fn(&EdgeHandle) -> bool,
	{
		let current: &Scene = scene;
		let lines: Vec<Option<Option<Line>>> = current
			.edges()
			.iter()
			.map(|edge| include(edge).then(|| self.endpoints(current, edge)))
			.collect();

		let mut updated = 0;
		for (edge, line) in scene.edges_mut().iter_mut().zip(lines) {
			match line {
				Some(Some(line)) => {
					edge.line = Some(line);
					updated += 1;
				}
				Some(None) => {
					warn!(
						"skipping edge {:?} -> {:?}: node not found",
						edge.output, edge.input
					);
				}
				None => {}
			}
		}
		updated
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::types::{DiagramData, DiagramLink, DiagramNode};

	fn chain() -> (Scene, EdgeGeometry) {
		let config = DiagramConfig::default();
		let data = DiagramData {
			nodes: ["node1", "node2", "node3"]
				.into_iter()
				.map(DiagramNode::new)
				.collect(),
			links: vec![
				DiagramLink::new("node1", "node2"),
				DiagramLink::new("node2", "node3"),
			],
		};
		(Scene::compose(&data, &config), EdgeGeometry::new(&config))
	}

	// ========================================================================
	// recompute_all()
	// ========================================================================

	#[test]
	fn test_recompute_all_uses_port_offsets() {
		let (mut scene, mut edges) = chain();
		assert_eq!(edges.recompute_all(&mut scene), 2);

		// Output: y + (20 + 2) / 2. Input: y - (20 / 2 + 2 * 1.5).
		assert_eq!(
			scene.edges()[0].line,
			Some(Line {
				x1: 0.0,
				y1: 11.0,
				x2: 0.0,
				y2: 87.0
			})
		);
		assert_eq!(
			scene.edges()[1].line,
			Some(Line {
				x1: 0.0,
				y1: 111.0,
				x2: 0.0,
				y2: 187.0
			})
		);
	}

	#[test]
	fn test_recompute_all_counts_passes() {
		let (mut scene, mut edges) = chain();
		assert_eq!(edges.passes(), 0);
		edges.recompute_all(&mut scene);
		edges.recompute_all(&mut scene);
		assert_eq!(edges.passes(), 2);
	}

	#[test]
	fn test_recompute_all_tracks_moved_nodes() {
		let (mut scene, mut edges) = chain();
		edges.recompute_all(&mut scene);
		scene.move_node("node3", -40.0, 300.0);
		edges.recompute_all(&mut scene);

		let line = scene.edges()[1].line.unwrap();
		assert_eq!((line.x2, line.y2), (-40.0, 287.0));
	}

	#[test]
	fn test_missing_node_skips_only_that_edge() {
		let config = DiagramConfig::default();
		let data = DiagramData {
			nodes: vec![DiagramNode::new("a"), DiagramNode::new("b")],
			links: vec![
				DiagramLink::new("a", "ghost"),
				DiagramLink::new("a", "b"),
			],
		};
		let mut scene = Scene::compose(&data, &config);
		let mut edges = EdgeGeometry::new(&config);

		assert_eq!(edges.recompute_all(&mut scene), 1);
		assert!(scene.edges()[0].line.is_none());
		assert!(scene.edges()[1].line.is_some());
	}

	// ========================================================================
	// recompute_incident()
	// ========================================================================

	#[test]
	fn test_recompute_incident_leaves_other_edges_stale() {
		let (mut scene, mut edges) = chain();
		edges.recompute_all(&mut scene);
		scene.move_node("node1", 5.0, 0.0);
		scene.move_node("node3", 5.0, 200.0);

		assert_eq!(edges.recompute_incident(&mut scene, "node1"), 1);
		assert_eq!(scene.edges()[0].line.unwrap().x1, 5.0);
		// node2 -> node3 was not touched.
		assert_eq!(scene.edges()[1].line.unwrap().x2, 0.0);
		assert_eq!(edges.passes(), 1);
	}

	#[test]
	fn test_endpoints_without_writing() {
		let (scene, edges) = chain();
		let line = edges.endpoints(&scene, &scene.edges()[0]).unwrap();
		assert_eq!(line.y1, 11.0);
		assert!(scene.edges()[0].line.is_none());
	}
}
